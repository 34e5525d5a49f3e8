use onboard_rt_core::OnboardError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<DomainError> for OnboardError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { field, reason } => OnboardError::Validation { field, reason },
            DomainError::Internal(message) => OnboardError::Internal(message),
        }
    }
}
