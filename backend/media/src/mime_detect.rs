//! MIME labels for local image files, by extension.
//!
//! The CLI client uses these before queueing; the gateway still validates
//! whatever type a part declares.

use std::path::Path;

const FALLBACK: &str = "application/octet-stream";

const IMAGE_EXTENSIONS: &[(&[&str], &str)] = &[
    (&["jpg", "jpeg", "jpe", "jfif"], "image/jpeg"),
    (&["png"], "image/png"),
    (&["webp"], "image/webp"),
    (&["gif"], "image/gif"),
    (&["avif"], "image/avif"),
    (&["heic", "heif"], "image/heic"),
    (&["bmp"], "image/bmp"),
    (&["tif", "tiff"], "image/tiff"),
    (&["svg"], "image/svg+xml"),
];

/// MIME type for `path`, or `application/octet-stream` when the extension is unknown.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FALLBACK;
    };
    IMAGE_EXTENSIONS
        .iter()
        .find(|(exts, _)| exts.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .map(|(_, mime)| *mime)
        .unwrap_or(FALLBACK)
}

pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_case_is_ignored() {
        assert_eq!(detect_mime_type(Path::new("IMG_0001.JPEG")), "image/jpeg");
        assert_eq!(detect_mime_type(Path::new("shots/cat.WebP")), "image/webp");
    }

    #[test]
    fn accepted_upload_types_are_detected() {
        for (name, mime) in [("a.jpg", "image/jpeg"), ("b.png", "image/png"), ("c.webp", "image/webp")] {
            assert_eq!(detect_mime_type(Path::new(name)), mime);
        }
    }

    #[test]
    fn non_images_fall_back() {
        for name in ["notes.txt", "Makefile", "archive.tar.gz"] {
            let mime = detect_mime_type(Path::new(name));
            assert_eq!(mime, FALLBACK);
            assert!(!is_image(mime));
        }
        assert!(is_image(detect_mime_type(Path::new("anim.gif"))));
    }
}
