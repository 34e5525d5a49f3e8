//! Transport-facing entry points: A2A JSON-RPC and chat completions.

use crate::a2a;
use crate::a2a_store::{TaskStore, TaskStoreBackend, TaskUpdateEvent};
use crate::agent_card::{self, AgentCard};
use crate::chat::{ChatRelay, ChatRequest, ChatResponse};
use crate::config::{AgentCardConfig, RelayConfig};
use crate::error_classifier::{A2aErrorClassifier, ErrorClassifier};
use crate::events::{BroadcastEventEmitter, EventEmitter};
use crate::executor::OnboardingExecutor;
use crate::handlers::{DefaultTaskHandler, TaskHandler};
use crate::push::{PushNotification, PushNotifyingEmitter, PushOutbox};
use crate::request_router::{MethodBasedRouter, RequestRouter};
use crate::response::{JsonRpcResponseFormatter, ResponseFormatter};
use crate::workflow::WorkflowKind;
use async_trait::async_trait;
use onboard_rt_core::context;
use onboard_rt_core::ids::CorrelationId;
use onboard_rt_core::{OnboardError, Result};
use onboard_rt_domain::DomainConfig;
use onboard_rt_observability::{metrics, spans};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, broadcast};
use tracing::{Instrument, warn};

const UPDATE_CHANNEL_CAPACITY: usize = 256;
const PUSH_OUTBOX_CAPACITY: usize = 256;

/// Top-level agent that owns the workflow, the task store and both transports.
#[derive(Clone)]
pub struct OnboardAgent {
    kind: WorkflowKind,
    executor: Arc<OnboardingExecutor>,
    chat: ChatRelay,
    card: AgentCardConfig,
    task_store: Arc<dyn TaskStoreBackend>,
    response_formatter: Arc<dyn ResponseFormatter>,
    request_router: Arc<dyn RequestRouter>,
    error_classifier: Arc<dyn ErrorClassifier>,
    updates: Arc<BroadcastEventEmitter>,
    push_outbox: Arc<PushOutbox>,
}

impl OnboardAgent {
    /// Create an agent serving the default workflow.
    pub fn new() -> Self {
        OnboardAgent::builder().build()
    }

    pub fn builder() -> OnboardAgentBuilder {
        OnboardAgentBuilder::new()
    }

    pub fn kind(&self) -> WorkflowKind {
        self.kind
    }

    pub fn executor(&self) -> Arc<OnboardingExecutor> {
        self.executor.clone()
    }

    pub fn task_store(&self) -> Arc<dyn TaskStoreBackend> {
        self.task_store.clone()
    }

    /// Subscribe to task update events for this agent instance.
    pub fn subscribe_task_updates(&self) -> broadcast::Receiver<TaskUpdateEvent> {
        self.updates.subscribe()
    }

    /// Webhook deliveries for tasks that registered a push-notification config.
    /// The embedding HTTP server drains this and POSTs each payload.
    pub fn subscribe_push_notifications(&self) -> broadcast::Receiver<PushNotification> {
        self.push_outbox.subscribe()
    }

    pub fn card(&self) -> AgentCard {
        agent_card::agent_card(&self.card)
    }

    pub fn health(&self) -> Value {
        agent_card::health()
    }
}

impl Default for OnboardAgent {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for configuring an onboarding agent and its subcomponents.
pub struct OnboardAgentBuilder {
    kind: WorkflowKind,
    domain: DomainConfig,
    relay: RelayConfig,
    card: AgentCardConfig,
    task_store: Option<Arc<dyn TaskStoreBackend>>,
}

impl OnboardAgentBuilder {
    pub fn new() -> Self {
        Self {
            kind: WorkflowKind::default(),
            domain: DomainConfig::default(),
            relay: RelayConfig::default(),
            card: AgentCardConfig::default(),
            task_store: None,
        }
    }

    pub fn with_workflow_kind(mut self, kind: WorkflowKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_domain_config(mut self, domain: DomainConfig) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_relay_config(mut self, relay: RelayConfig) -> Self {
        self.relay = relay;
        self
    }

    pub fn with_card_config(mut self, card: AgentCardConfig) -> Self {
        self.card = card;
        self
    }

    /// Provide a custom task store backend.
    pub fn with_task_store_backend(mut self, task_store: Arc<dyn TaskStoreBackend>) -> Self {
        self.task_store = Some(task_store);
        self
    }

    pub fn build(self) -> OnboardAgent {
        let updates = Arc::new(BroadcastEventEmitter::with_capacity(UPDATE_CHANNEL_CAPACITY));
        let task_store: Arc<dyn TaskStoreBackend> = match self.task_store {
            Some(task_store) => task_store,
            None => Arc::new(Mutex::new(TaskStore::new())),
        };

        let executor = Arc::new(OnboardingExecutor::new(self.kind.build(&self.domain)));
        let push_outbox = Arc::new(PushOutbox::with_capacity(PUSH_OUTBOX_CAPACITY));
        let emitter: Arc<dyn EventEmitter> = Arc::new(PushNotifyingEmitter::new(
            updates.clone(),
            task_store.clone(),
            push_outbox.clone(),
        ));
        let task_handler: Arc<dyn TaskHandler> = Arc::new(DefaultTaskHandler::new(
            task_store.clone(),
            emitter,
            executor.clone(),
        ));
        let request_router: Arc<dyn RequestRouter> =
            Arc::new(MethodBasedRouter::new(task_handler));

        OnboardAgent {
            kind: self.kind,
            chat: ChatRelay::new(executor.clone(), self.relay),
            executor,
            card: self.card,
            task_store,
            response_formatter: Arc::new(JsonRpcResponseFormatter),
            request_router,
            error_classifier: Arc::new(A2aErrorClassifier),
            updates,
            push_outbox,
        }
    }
}

impl Default for OnboardAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw-JSON A2A transport.
///
/// Protocol failures come back as JSON-RPC error responses, never as `Err`.
#[async_trait]
pub trait A2aRequestHandler: Send + Sync {
    async fn handle_a2a(&self, request: Value) -> Result<Vec<Value>>;

    /// Raw request body; undecodable JSON yields a `-32700` error response.
    async fn handle_a2a_text(&self, body: &str) -> Result<Vec<Value>>;
}

#[async_trait]
impl A2aRequestHandler for OnboardAgent {
    async fn handle_a2a(&self, request: Value) -> Result<Vec<Value>> {
        let request_id = a2a::extract_jsonrpc_id(&request);
        let parsed_request = match a2a::A2aRequest::from_value(request) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(error = %err, "rejected A2A request");
                metrics::record_a2a_error("unknown", self.error_classifier.classify(&err));
                return Ok(vec![self.response_formatter.format_error(request_id, &err)]);
            }
        };
        let correlation_id = parsed_request
            .correlation_id()
            .map(CorrelationId::from)
            .unwrap_or_else(context::generate_correlation_id);

        let method = parsed_request.method;
        let is_stream = parsed_request.is_stream;
        let span = if is_stream {
            spans::a2a_stream(method.as_str(), correlation_id.as_str())
        } else {
            spans::a2a_request(method.as_str(), correlation_id.as_str())
        };
        let request_context_id = parsed_request
            .context_id
            .clone()
            .unwrap_or_else(context::generate_context_id);

        let start = Instant::now();
        let outcome = context::with_request_scope(
            request_context_id,
            correlation_id,
            self.request_router.route(&parsed_request),
        )
        .instrument(span)
        .await;

        let duration = start.elapsed();
        match &outcome {
            Ok(_) => metrics::record_a2a_request(method.as_str(), "success", is_stream, duration),
            Err(err) => {
                metrics::record_a2a_request(method.as_str(), "error", is_stream, duration);
                metrics::record_a2a_error(method.as_str(), self.error_classifier.classify(err));
            }
        }

        let responses = match outcome {
            Ok(a2a::A2aOutcome::Response(result)) => {
                vec![self.response_formatter.format_success(request_id, result)]
            }
            Ok(a2a::A2aOutcome::Stream(chunks)) => {
                metrics::record_stream_chunks("a2a", chunks.len());
                self.response_formatter.format_stream(request_id, chunks)
            }
            Err(err) => vec![self.response_formatter.format_error(request_id, &err)],
        };
        Ok(responses)
    }

    async fn handle_a2a_text(&self, body: &str) -> Result<Vec<Value>> {
        match serde_json::from_str::<Value>(body) {
            Ok(request) => self.handle_a2a(request).await,
            Err(err) => {
                let err = OnboardError::Parse(err.to_string());
                warn!(error = %err, "undecodable A2A request body");
                metrics::record_a2a_error("unknown", self.error_classifier.classify(&err));
                Ok(vec![self.response_formatter.format_error(None, &err)])
            }
        }
    }
}

/// Chat-completions transport: one JSON body or a stream of SSE frames.
#[async_trait]
pub trait ChatCompletionsHandler: Send + Sync {
    async fn complete(&self, body: Value) -> Result<ChatResponse>;
}

#[async_trait]
impl ChatCompletionsHandler for OnboardAgent {
    async fn complete(&self, body: Value) -> Result<ChatResponse> {
        let request = ChatRequest::from_value(body)?;
        Ok(self.chat.handle(request).await)
    }
}
