//! Task/response relay: task events, A2A JSON-RPC and chat-completions streaming.

pub mod a2a;
pub mod a2a_store;
pub mod a2a_transport;
pub mod a2a_types;
pub mod agent_card;
pub mod chat;
pub mod config;
pub mod error;
pub mod error_classifier;
pub mod events;
pub mod executor;
pub mod handlers;
pub mod push;
pub mod request_router;
pub mod response;
pub mod sink;
pub mod sse;
pub mod task_event;
pub mod workflow;

pub use a2a::{A2aMethod, A2aOutcome, A2aRequest};
pub use a2a_transport::{
    A2aRequestHandler, ChatCompletionsHandler, OnboardAgent, OnboardAgentBuilder,
};
pub use agent_card::{AgentCard, agent_card, health};
pub use chat::{ChatRelay, ChatRequest, ChatResponse};
pub use config::{AgentCardConfig, RelayConfig};
pub use error::RelayError;
pub use executor::OnboardingExecutor;
pub use push::{PushNotification, PushNotificationSender, PushOutbox};
pub use sink::{ChannelSink, CollectingSink, EventSink, TaskStoreSink};
pub use sse::SseFrame;
pub use task_event::{TaskArtifact, TaskEvent, TaskLifecycle};
pub use workflow::{PreparedRequest, Workflow, WorkflowKind};
