//! Request validation and result aggregation.
//!
//! Validation is all-or-nothing: any violation rejects the whole request
//! before a single file reaches the media service.

use crate::error::UploadError;
use crate::policy::UploadPolicy;
use crate::types::{PendingFile, UploadOutcome, ValidationError, ValidationReason};

/// Check presence, then count, then each file's type and size.
pub fn validate_files(policy: &UploadPolicy, files: &[PendingFile]) -> Result<(), UploadError> {
    if files.is_empty() {
        return Err(UploadError::NoFilesProvided);
    }
    if files.len() > policy.max_files {
        return Err(UploadError::TooManyFiles { max: policy.max_files });
    }

    let errors: Vec<ValidationError> = files
        .iter()
        .filter_map(|file| check_file(policy, file))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(UploadError::InvalidFiles(errors))
    }
}

/// First violated rule for one file. Type is checked before size.
pub fn check_file(policy: &UploadPolicy, file: &PendingFile) -> Option<ValidationError> {
    if !policy.allows_type(&file.mime_type) {
        return Some(ValidationError::new(&file.name, ValidationReason::InvalidType));
    }
    if !policy.allows_size(file.byte_size) {
        return Some(ValidationError::new(
            &file.name,
            ValidationReason::TooLarge { max_bytes: policy.max_file_size },
        ));
    }
    None
}

/// Successful URLs in submission order, or `AllUploadsFailed` if there are none.
pub fn collect_urls(outcomes: &[UploadOutcome]) -> Result<Vec<String>, UploadError> {
    let urls: Vec<String> = outcomes
        .iter()
        .filter_map(|o| o.url().map(str::to_string))
        .collect();
    if urls.is_empty() {
        return Err(UploadError::AllUploadsFailed);
    }
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DEFAULT_MAX_FILE_SIZE;

    fn png(name: &str, size: usize) -> PendingFile {
        PendingFile::new(name, "image/png", vec![0u8; size])
    }

    #[test]
    fn empty_request_is_rejected() {
        let err = validate_files(&UploadPolicy::default(), &[]).unwrap_err();
        assert_eq!(err.to_string(), "No files uploaded");
    }

    #[test]
    fn six_files_are_rejected_before_per_file_checks() {
        let mut files: Vec<_> = (0..5).map(|i| png(&format!("{i}.png"), 1)).collect();
        files.push(PendingFile::new("x.gif", "image/gif", vec![1u8]));
        let err = validate_files(&UploadPolicy::default(), &files).unwrap_err();
        assert_eq!(err, UploadError::TooManyFiles { max: 5 });
    }

    #[test]
    fn reports_one_reason_per_offending_file() {
        let mut huge_gif = PendingFile::new("huge.gif", "image/gif", vec![]);
        huge_gif.byte_size = DEFAULT_MAX_FILE_SIZE + 1;
        let mut big = png("big.png", 0);
        big.byte_size = DEFAULT_MAX_FILE_SIZE + 1;
        let files = vec![png("ok.png", 3), huge_gif, big];

        let err = validate_files(&UploadPolicy::default(), &files).unwrap_err();
        match &err {
            UploadError::InvalidFiles(errors) => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].reason, ValidationReason::InvalidType);
                assert!(matches!(errors[1].reason, ValidationReason::TooLarge { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "huge.gif: Invalid file type, big.png: File too large (max 5MB)"
        );
    }

    #[test]
    fn valid_files_pass() {
        let files = vec![
            png("a.png", 10),
            PendingFile::new("b.jpg", "image/jpeg", vec![0u8; 10]),
            PendingFile::new("c.webp", "image/webp", vec![0u8; 10]),
        ];
        assert!(validate_files(&UploadPolicy::default(), &files).is_ok());
    }

    #[test]
    fn collect_urls_keeps_order_and_drops_failures() {
        let outcomes = vec![
            UploadOutcome::Success { file_name: "a".into(), url: "u1".into() },
            UploadOutcome::Failure { file_name: "b".into(), cause: "x".into() },
            UploadOutcome::Success { file_name: "c".into(), url: "u3".into() },
        ];
        assert_eq!(collect_urls(&outcomes).unwrap(), vec!["u1", "u3"]);
    }

    #[test]
    fn collect_urls_all_failed() {
        let outcomes = vec![UploadOutcome::Failure { file_name: "b".into(), cause: "x".into() }];
        assert_eq!(collect_urls(&outcomes).unwrap_err(), UploadError::AllUploadsFailed);
    }
}
