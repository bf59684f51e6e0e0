use std::fmt;

use serde::Deserialize;
use serde_json::{json, Value};

/// Message used when a failure response body is not JSON.
pub const NON_JSON_RESPONSE: &str = "Server returned non-JSON response";

/// Error body of a failed backend call, kept verbatim for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPayload(pub Value);

impl ErrorPayload {
    /// `{"error": "Server returned non-JSON response"}`
    pub fn placeholder() -> Self {
        Self(json!({ "error": NON_JSON_RESPONSE }))
    }

    pub fn parse(body: &[u8]) -> Self {
        serde_json::from_slice(body)
            .map(Self)
            .unwrap_or_else(|_| Self::placeholder())
    }

    /// `detail` wins over `error`. FastAPI sends `detail` as a list of
    /// validation problems, which is rendered as JSON.
    pub fn message(&self) -> Option<String> {
        let pick = |key: &str| match self.0.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };
        pick("detail").or_else(|| pick("error"))
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnhanceResponse {
    #[serde(default)]
    pub improved: Option<String>,
}

/// `/analyze_resume` reports failures as `{"error": ...}`, sometimes with HTTP 200.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewResponse {
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparsable_body_becomes_placeholder() {
        let payload = ErrorPayload::parse(b"<html>Internal Server Error</html>");
        assert_eq!(payload, ErrorPayload::placeholder());
        assert_eq!(payload.message().as_deref(), Some(NON_JSON_RESPONSE));
        assert_eq!(
            payload.to_string(),
            r#"{"error":"Server returned non-JSON response"}"#
        );
    }

    #[test]
    fn test_detail_takes_precedence_over_error() {
        let payload = ErrorPayload::parse(br#"{"error": "boom", "detail": "bad file"}"#);
        assert_eq!(payload.message().as_deref(), Some("bad file"));
    }

    #[test]
    fn test_structured_detail_is_rendered_as_json() {
        let payload = ErrorPayload::parse(br#"{"detail": [{"loc": ["body", "file"]}]}"#);
        assert_eq!(
            payload.message().as_deref(),
            Some(r#"[{"loc":["body","file"]}]"#)
        );
    }

    #[test]
    fn test_message_absent_when_no_known_keys() {
        let payload = ErrorPayload::parse(br#"{"status": "failed"}"#);
        assert_eq!(payload.message(), None);
    }
}
