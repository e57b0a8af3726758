//! Client side of a pixdrop upload: a queue of picked files, one multipart
//! request per submission, byte-level progress, and terminal UI state.

pub mod controller;
pub mod notification;
pub mod progress;
pub mod transport;

pub use controller::{
    ControllerState, SubmitOutcome, UploadController, GENERIC_FAILURE_MESSAGE,
    NETWORK_ERROR_MESSAGE, SUCCESS_MESSAGE,
};
pub use notification::{Notification, NotificationKind, NOTIFICATION_TTL};
pub use progress::ProgressState;
pub use transport::{HttpTransport, ProgressFn, TransportError, TransportResponse, UploadTransport};
