use onboard_rt_core::OnboardError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Field names are reported in schema order.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

impl From<IntakeError> for OnboardError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::MalformedInput(reason) => OnboardError::MalformedInput(reason),
            IntakeError::MissingFields(fields) => OnboardError::MissingFields(fields),
        }
    }
}
