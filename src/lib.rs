//! HR/IT onboarding agent runtime.
//!
//! Inbound payloads are normalized against a workflow's field schema, processed by a
//! pure domain processor, and relayed back as A2A task updates or chat-completions
//! chunks.

pub mod config;

pub use onboard_rt_core::{OnboardError, Result, context, ids};

pub mod intake {
    pub use onboard_rt_intake::*;
}

pub mod domain {
    pub use onboard_rt_domain::*;
}

pub mod relay {
    pub use onboard_rt_a2a::*;
}

pub mod observability {
    pub use onboard_rt_observability::*;
}

pub use config::{AgentConfig, ServerConfig};
pub use onboard_rt_a2a::workflow::WorkflowKind;
pub use onboard_rt_a2a::{
    A2aRequestHandler, ChatCompletionsHandler, ChatResponse, OnboardAgent, OnboardAgentBuilder,
    SseFrame,
};

/// Build an agent from a loaded configuration.
pub fn build_agent(config: &AgentConfig) -> OnboardAgent {
    OnboardAgent::builder()
        .with_workflow_kind(config.agent)
        .with_domain_config(config.domain.clone())
        .with_relay_config(config.relay.clone())
        .with_card_config(config.card_config())
        .build()
}
