//! Tracing, span and metrics helpers shared by the onboarding runtime crates.

pub mod metrics;
pub mod spans;
pub mod tracing_setup;
