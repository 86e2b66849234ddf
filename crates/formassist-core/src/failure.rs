//! Failure reason extraction.
//!
//! The backend reports failures as `{"error": "..."}`. Binary endpoints send
//! the same JSON with a binary content type, so the body is decoded from raw
//! bytes rather than trusting the response's declared type.

use formassist_types::backend::ErrorBody;
use formassist_types::error::BackendError;

/// The backend-supplied reason for a failure, if one can be recovered.
pub fn failure_reason(err: &BackendError) -> Option<String> {
    match err {
        BackendError::Rejected { body, .. } => reason_from_body(body),
        BackendError::Transport(_) | BackendError::Decode(_) => None,
    }
}

/// Decode `body` as UTF-8 and parse it as a structured error.
///
/// Returns `None` for non-UTF-8 bodies, non-JSON bodies, and blank reasons.
pub fn reason_from_body(body: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(body).ok()?;
    let text = text.trim_start_matches('\u{feff}').trim();
    let parsed: ErrorBody = serde_json::from_str(text).ok()?;
    let reason = parsed.error.trim();
    (!reason.is_empty()).then(|| reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(body: &[u8]) -> BackendError {
        BackendError::Rejected {
            status: 500,
            body: body.to_vec(),
        }
    }

    #[test]
    fn test_reason_from_json_body() {
        let err = rejected(br#"{"error":"template missing"}"#);
        assert_eq!(failure_reason(&err).as_deref(), Some("template missing"));
    }

    #[test]
    fn test_reason_ignores_extra_fields_and_bom() {
        let body = "\u{feff}{\"error\":\"rate limited\",\"retry\":3}\n";
        assert_eq!(reason_from_body(body.as_bytes()).as_deref(), Some("rate limited"));
    }

    #[test]
    fn test_no_reason_for_non_json() {
        assert_eq!(failure_reason(&rejected(b"<html>502 Bad Gateway</html>")), None);
    }

    #[test]
    fn test_no_reason_for_invalid_utf8() {
        assert_eq!(failure_reason(&rejected(&[0x25, 0x50, 0xff, 0xfe])), None);
    }

    #[test]
    fn test_no_reason_for_blank_error() {
        assert_eq!(failure_reason(&rejected(br#"{"error":"  "}"#)), None);
    }

    #[test]
    fn test_no_reason_for_transport() {
        let err = BackendError::Transport("connection refused".to_string());
        assert_eq!(failure_reason(&err), None);
    }
}
