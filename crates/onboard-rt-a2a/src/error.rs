use crate::a2a_types::TaskState;
use onboard_rt_core::OnboardError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// An event arrived after the task reached a terminal state.
    #[error("task already reached terminal state {0}")]
    AfterTerminal(TaskState),

    #[error("{0}")]
    Unsupported(String),

    /// The consumer of the event stream went away.
    #[error("event sink closed")]
    Closed,
}

impl From<RelayError> for OnboardError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Unsupported(message) => OnboardError::Unsupported(message),
            other => OnboardError::Internal(other.to_string()),
        }
    }
}
