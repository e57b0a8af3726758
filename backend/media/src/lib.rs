//! Media upload providers for pixdrop.
//!
//! - `cloudinary`: signed uploads to the hosted Cloudinary API
//! - `fanout`: batched, bounded-concurrency forwarding of a request's files
//! - `mock`: scriptable in-memory provider for tests and local runs
//! - `mime_detect`: extension-based MIME detection for local files

pub mod cloudinary;
pub mod fanout;
pub mod mime_detect;
pub mod mock;

pub use cloudinary::{CloudinaryCredentials, CloudinaryUploader};
pub use fanout::UploadFanout;
pub use mime_detect::{detect_mime_type, is_image};
pub use mock::MockMediaService;
