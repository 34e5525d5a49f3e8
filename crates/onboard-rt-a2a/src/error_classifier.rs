use onboard_rt_core::OnboardError;

/// Maps errors onto the low-cardinality `error_type` metric label.
pub trait ErrorClassifier: Send + Sync {
    fn classify(&self, error: &OnboardError) -> &'static str;
}

pub struct A2aErrorClassifier;

impl ErrorClassifier for A2aErrorClassifier {
    fn classify(&self, error: &OnboardError) -> &'static str {
        match error {
            OnboardError::InvalidArgument(_) => "invalid_argument",
            OnboardError::InvalidParams(_) => "invalid_params",
            OnboardError::MethodNotFound(_) => "method_not_found",
            OnboardError::TaskNotFound(_) => "task_not_found",
            OnboardError::Unsupported(_) => "unsupported",
            OnboardError::Parse(_) => "parse",
            OnboardError::Json(_) => "json",
            _ => "internal",
        }
    }
}
