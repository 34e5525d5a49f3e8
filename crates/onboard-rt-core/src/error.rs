//! Workspace-wide error type.
//!
//! Leaf crates keep their own error enums (`IntakeError`, `DomainError`, `RelayError`)
//! and convert into [`OnboardError`] at crate boundaries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OnboardError {
    /// Payload could not be parsed into any recognised request shape.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Payload was recognised but required fields were absent or empty.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// A field was present but semantically invalid.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("internal error: {0}")]
    Internal(String),

    /// Request body was not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("method not found: {0}")]
    MethodNotFound(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OnboardError {
    /// True for errors a caller fixes by resubmitting a corrected request.
    pub fn needs_input(&self) -> bool {
        matches!(
            self,
            OnboardError::MalformedInput(_) | OnboardError::MissingFields(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, OnboardError>;

#[cfg(test)]
mod tests {
    use super::OnboardError;

    #[test]
    fn missing_fields_message_lists_every_field() {
        let err = OnboardError::MissingFields(vec!["firstName".into(), "role".into()]);
        assert_eq!(err.to_string(), "missing required fields: firstName, role");
        assert!(err.needs_input());
    }

    #[test]
    fn validation_is_not_an_input_request() {
        let err = OnboardError::Validation {
            field: "startDate".into(),
            reason: "expected YYYY-MM-DD".into(),
        };
        assert!(err.to_string().contains("startDate"));
        assert!(!err.needs_input());
    }
}
