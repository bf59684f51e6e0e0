use thiserror::Error;

use crate::backend::BackendError;
use crate::form::FieldId;
use crate::models::response::ErrorPayload;

/// Problems caught before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in the required field: {0}")]
    MissingField(FieldId),

    #[error("Please enter some text in {0} first")]
    EmptyInput(String),

    #[error("Please select a resume file first")]
    MissingFile,

    #[error("Please wait: {0} is already being enhanced")]
    InFlight(FieldId),
}

/// Failure of one form operation. Never fatal to the form as a whole.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("{payload}")]
    Server { status: u16, payload: ErrorPayload },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Could not save download: {0}")]
    Save(String),
}

impl From<BackendError> for SyncError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Transport(msg) => SyncError::Transport(msg),
            BackendError::Server { status, payload } => SyncError::Server { status, payload },
            BackendError::Json(e) => SyncError::Decode(e.to_string()),
            BackendError::Decode(msg) => SyncError::Decode(msg),
        }
    }
}

impl SyncError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SyncError::Validation(_))
    }

    /// Text of the blocking alert shown for this error. `action` names the
    /// operation, e.g. "Resume generation".
    pub fn alert_message(&self, action: &str) -> String {
        match self {
            SyncError::Validation(_) | SyncError::Transport(_) | SyncError::Save(_) => {
                self.to_string()
            }
            SyncError::Server { .. } | SyncError::Decode(_) => format!("{action} failed: {self}"),
        }
    }

    /// Short message for the status line (shown after "❌ ").
    pub fn status_message(&self) -> String {
        match self {
            SyncError::Server { status, payload } => payload
                .message()
                .unwrap_or_else(|| format!("Request failed with status {status}")),
            SyncError::Transport(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_alert_contains_full_payload() {
        let err = SyncError::Server {
            status: 500,
            payload: ErrorPayload::parse(br#"{"error": "docx failed"}"#),
        };
        assert_eq!(
            err.alert_message("Resume generation"),
            r#"Resume generation failed: {"error":"docx failed"}"#
        );
        assert_eq!(err.status_message(), "docx failed");
    }

    #[test]
    fn test_transport_alert_carries_raw_message() {
        let err = SyncError::Transport("connection refused".to_string());
        assert_eq!(
            err.alert_message("Resume generation"),
            "Network error: connection refused"
        );
        assert_eq!(err.status_message(), "connection refused");
    }

    #[test]
    fn test_server_without_message_falls_back_to_status() {
        let err = SyncError::Server {
            status: 502,
            payload: ErrorPayload::parse(b"{}"),
        };
        assert_eq!(err.status_message(), "Request failed with status 502");
    }

    #[test]
    fn test_validation_alert_names_field() {
        let err = SyncError::from(ValidationError::MissingField(FieldId::Phone));
        assert!(err.is_validation());
        assert_eq!(
            err.alert_message("Resume generation"),
            "Please fill in the required field: phone"
        );
    }
}
