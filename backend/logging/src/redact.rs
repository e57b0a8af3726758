//! Log Redaction Layer
//!
//! Scrubs media service credentials and request signatures from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static CREDENTIAL_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"cloudinary://[^\s@]+@").unwrap());
static SECRET_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(api_key|api_secret|signature)=([^&\s,]+)").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = CREDENTIAL_URL_RE.replace_all(input, "cloudinary://[REDACTED]@");
    SECRET_PARAM_RE
        .replace_all(&redacted, "$1=[REDACTED]")
        .to_string()
}
