//! Onboarding runtime core types and shared utilities.

pub mod context;
pub mod error;
pub mod ids;

pub use error::{OnboardError, Result};
pub use ids::{
    ArtifactId, ContextId, CorrelationId, DirectoryUserId, EmployeeId, MessageId, TaskId,
};
