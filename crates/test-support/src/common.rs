//! Common fixtures and agent setup.

pub use crate::support::a2a::*;
pub use crate::support::chat::*;

use onboard_rt_a2a::workflow::WorkflowKind;
use onboard_rt_a2a::{OnboardAgent, RelayConfig};
use serde_json::{Value, json};
use std::path::PathBuf;

pub const QUICK_HIRE_SENTENCE: &str = "Onboard Sarah Williams as a Software Engineer";
pub const NEW_HIRE_SENTENCE: &str = "Onboard John Smith as an Analyst";

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|path| path.parent())
        .expect("test-support crate should be under crates/")
        .to_path_buf()
}

pub fn fixture_path(relative_path: &str) -> PathBuf {
    workspace_root()
        .join("tests")
        .join("fixtures")
        .join(relative_path)
}

pub fn agent(kind: WorkflowKind) -> OnboardAgent {
    OnboardAgent::builder().with_workflow_kind(kind).build()
}

pub fn agent_with_chunk_size(kind: WorkflowKind, chunk_size: usize) -> OnboardAgent {
    OnboardAgent::builder()
        .with_workflow_kind(kind)
        .with_relay_config(RelayConfig::default().with_chunk_size(chunk_size))
        .build()
}

/// A complete extended-onboarding payload.
pub fn onboarding_payload(start_date: &str) -> Value {
    json!({
        "firstName": "Sarah",
        "lastName": "Williams",
        "email": "sarah@personal.example",
        "role": "software engineer",
        "department": "Engineering",
        "location": "Berlin",
        "startDate": start_date
    })
}

pub fn provisioning_payload() -> Value {
    json!({
        "employeeId": "E-0000BEEF",
        "fullName": "Ada Lovelace",
        "email": "ada.lovelace@example.com",
        "jobTitle": "CTO"
    })
}
