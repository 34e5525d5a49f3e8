//! Span helpers for the onboarding relay.
//!
//! All span names use the `onboard_rt.` prefix for low cardinality.

use onboard_rt_core::context::current_correlation_id;
use tracing::Span;

fn correlation_field() -> String {
    current_correlation_id()
        .map(|id| id.into_string())
        .unwrap_or_else(|| "none".to_string())
}

/// Create span for handling a one-shot A2A JSON-RPC request.
#[inline]
pub fn a2a_request(method: &str, correlation_id: &str) -> Span {
    tracing::info_span!(
        "onboard_rt.a2a_request",
        method = method,
        correlation_id = correlation_id,
    )
}

/// Create span for handling a streaming A2A JSON-RPC request.
#[inline]
pub fn a2a_stream(method: &str, correlation_id: &str) -> Span {
    tracing::info_span!(
        "onboard_rt.a2a_stream",
        method = method,
        correlation_id = correlation_id,
    )
}

/// Create span for a chat-completions request.
#[inline]
pub fn chat_completion(model: &str, stream: bool) -> Span {
    tracing::info_span!(
        "onboard_rt.chat_completion",
        model = model,
        stream = stream,
        correlation_id = correlation_field(),
    )
}

/// Create span for one task execution.
///
/// Parent: a2a_request, a2a_stream or chat_completion
#[inline]
pub fn execute_task(workflow: &str, task_id: &str) -> Span {
    tracing::info_span!(
        "onboard_rt.execute_task",
        workflow = workflow,
        task_id = task_id,
        correlation_id = correlation_field(),
    )
}

/// Create span for payload normalization.
///
/// Parent: execute_task
#[inline]
pub fn normalize(schema: &str) -> Span {
    tracing::debug_span!("onboard_rt.normalize", schema = schema)
}
