//! Task-local request scope.
//!
//! A relay invocation runs inside a context scope (the A2A conversation it belongs to)
//! and a correlation scope (the inbound request that triggered it), so spans and log
//! records emitted deep in the pipeline can be tied back to the caller.

use crate::ids::{ContextId, CorrelationId};
use std::future::Future;

tokio::task_local! {
    static CONTEXT_ID: ContextId;
    static CORRELATION_ID: CorrelationId;
}

pub fn generate_context_id() -> ContextId {
    ContextId::generate()
}

pub fn current_context_id() -> Option<ContextId> {
    CONTEXT_ID.try_with(|id| id.clone()).ok()
}

pub fn generate_correlation_id() -> CorrelationId {
    CorrelationId::generate()
}

pub fn current_correlation_id() -> Option<CorrelationId> {
    CORRELATION_ID.try_with(|id| id.clone()).ok()
}

/// Run `fut` with both IDs in scope.
pub async fn with_request_scope<F, T>(context_id: ContextId, correlation_id: CorrelationId, fut: F) -> T
where
    F: Future<Output = T>,
{
    CONTEXT_ID
        .scope(context_id, CORRELATION_ID.scope(correlation_id, fut))
        .await
}
