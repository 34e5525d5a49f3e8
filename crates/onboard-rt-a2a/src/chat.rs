//! Chat-completions relay: one-shot JSON or an SSE chunk stream.

use crate::config::RelayConfig;
use crate::executor::OnboardingExecutor;
use crate::sink::CollectingSink;
use crate::sse::{CompletionMeta, SseFrame, chunk_text};
use crate::task_event::TaskEvent;
use onboard_rt_core::{OnboardError, Result};
use onboard_rt_intake::InboundPayload;
use onboard_rt_observability::{metrics, spans};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{Instrument, debug};

/// A parsed chat-completions request body.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: Option<String>,
    pub stream: bool,
    pub payload: InboundPayload,
}

impl ChatRequest {
    pub fn from_value(body: Value) -> Result<Self> {
        let Value::Object(map) = &body else {
            return Err(OnboardError::InvalidArgument(
                "chat request body must be a JSON object".to_string(),
            ));
        };
        if !map.get("messages").is_some_and(Value::is_array) {
            return Err(OnboardError::InvalidArgument(
                "chat request requires a messages array".to_string(),
            ));
        }
        let model = map.get("model").and_then(Value::as_str).map(str::to_string);
        let stream = map.get("stream").and_then(Value::as_bool).unwrap_or(false);
        Ok(Self {
            model,
            stream,
            payload: InboundPayload::from_value(body),
        })
    }
}

pub enum ChatResponse {
    Json(Value),
    Stream(ReceiverStream<SseFrame>),
}

#[derive(Clone)]
pub struct ChatRelay {
    executor: Arc<OnboardingExecutor>,
    config: RelayConfig,
}

impl ChatRelay {
    pub fn new(executor: Arc<OnboardingExecutor>, config: RelayConfig) -> Self {
        Self { executor, config }
    }

    pub async fn handle(&self, request: ChatRequest) -> ChatResponse {
        let meta = CompletionMeta::new(
            request
                .model
                .clone()
                .unwrap_or_else(|| self.config.model.clone()),
        );
        if request.stream {
            ChatResponse::Stream(self.stream(meta, request.payload))
        } else {
            ChatResponse::Json(self.complete(meta, request.payload).await)
        }
    }

    /// Run the workflow and return one `chat.completion` body.
    pub async fn complete(&self, meta: CompletionMeta, payload: InboundPayload) -> Value {
        let span = spans::chat_completion(&meta.model, false);
        let content = self.render(&meta.id, payload).instrument(span).await;
        meta.completion(&content)
    }

    /// Stream the result: role chunk, content chunks, stop chunk, then `[DONE]`.
    ///
    /// The work starts only after the role chunk is handed to the channel, and the
    /// producer yields between content chunks.
    pub fn stream(&self, meta: CompletionMeta, payload: InboundPayload) -> ReceiverStream<SseFrame> {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let relay = self.clone();
        let span = spans::chat_completion(&meta.model, true);
        tokio::spawn(
            async move {
                if let Err(err) = relay.produce(meta, payload, tx).await {
                    debug!(error = %err, "chat stream consumer went away");
                }
            }
            .instrument(span),
        );
        ReceiverStream::new(rx)
    }

    async fn produce(
        &self,
        meta: CompletionMeta,
        payload: InboundPayload,
        tx: mpsc::Sender<SseFrame>,
    ) -> std::result::Result<(), mpsc::error::SendError<SseFrame>> {
        tx.send(SseFrame::Data(meta.role_chunk())).await?;
        tokio::task::yield_now().await;

        let content = self.render(&meta.id, payload).await;
        let chunks = chunk_text(&content, self.config.chunk_size);
        for chunk in &chunks {
            tx.send(SseFrame::Data(meta.content_chunk(chunk))).await?;
            tokio::task::yield_now().await;
        }

        tx.send(SseFrame::Data(meta.stop_chunk())).await?;
        tx.send(SseFrame::Done).await?;
        metrics::record_stream_chunks("chat", chunks.len());
        Ok(())
    }

    /// Execute and render the terminal event as chat content.
    async fn render(&self, completion_id: &str, payload: InboundPayload) -> String {
        let sink = CollectingSink::new();
        let terminal = match self.executor.execute(completion_id, payload, &sink).await {
            Ok(_) => sink.terminal().await,
            Err(err) => Some(TaskEvent::Failed {
                message: err.to_string(),
            }),
        };
        match terminal {
            Some(TaskEvent::Completed { artifact }) => artifact.text,
            Some(TaskEvent::NeedsInput { guidance }) => error_body(&guidance),
            Some(TaskEvent::Failed { message }) => error_body(&message),
            Some(TaskEvent::Progress { .. }) | None => error_body("no result produced"),
        }
    }
}

fn error_body(message: &str) -> String {
    json!({ "error": message }).to_string()
}
