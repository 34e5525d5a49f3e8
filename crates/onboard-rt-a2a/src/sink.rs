//! Destinations for relay events.

use crate::a2a_store::{TaskEventRecorder, TaskStoreBackend};
use crate::a2a_types::{Artifact, Message, Part, TaskStatus};
use crate::error::RelayError;
use crate::events::EventEmitter;
use crate::task_event::TaskEvent;
use async_trait::async_trait;
use onboard_rt_core::ids::{ArtifactId, ContextId, TaskId};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: TaskEvent) -> Result<(), RelayError>;
}

/// Forwards events over a bounded channel; emitting waits for the consumer.
pub struct ChannelSink {
    tx: mpsc::Sender<TaskEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<TaskEvent>) -> Self {
        Self { tx }
    }

    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<TaskEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn emit(&self, event: TaskEvent) -> Result<(), RelayError> {
        self.tx.send(event).await.map_err(|_| RelayError::Closed)
    }
}

/// Buffers every event; used for one-shot responses and tests.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<TaskEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<TaskEvent> {
        self.events.lock().await.clone()
    }

    pub async fn terminal(&self) -> Option<TaskEvent> {
        self.events
            .lock()
            .await
            .iter()
            .rev()
            .find(|event| event.is_terminal())
            .cloned()
    }
}

#[async_trait]
impl EventSink for CollectingSink {
    async fn emit(&self, event: TaskEvent) -> Result<(), RelayError> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// Records events as A2A status and artifact updates on a stored task.
pub struct TaskStoreSink {
    store: Arc<dyn TaskStoreBackend>,
    emitter: Arc<dyn EventEmitter>,
    task_id: TaskId,
    context_id: ContextId,
}

impl TaskStoreSink {
    pub fn new(
        store: Arc<dyn TaskStoreBackend>,
        emitter: Arc<dyn EventEmitter>,
        task_id: TaskId,
        context_id: ContextId,
    ) -> Self {
        Self {
            store,
            emitter,
            task_id,
            context_id,
        }
    }
}

#[async_trait]
impl EventSink for TaskStoreSink {
    async fn emit(&self, event: TaskEvent) -> Result<(), RelayError> {
        let state = event.state();
        let message = match &event {
            TaskEvent::Completed { artifact } => {
                let artifact = Artifact {
                    artifact_id: ArtifactId::generate(),
                    name: Some(artifact.name.clone()),
                    parts: vec![Part::text(&artifact.text), Part::data(artifact.data.clone())],
                    metadata: None,
                };
                let update = self
                    .store
                    .record_artifact_update(&self.task_id, &self.context_id, artifact)
                    .await
                    .ok_or(RelayError::Closed)?;
                self.emitter.emit(update).await;
                None
            }
            other => Some(Message::agent_text(
                other.text(),
                &self.task_id,
                &self.context_id,
            )),
        };

        let update = self
            .store
            .record_status_update(
                &self.task_id,
                &self.context_id,
                TaskStatus::new(state, message),
            )
            .await
            .ok_or(RelayError::Closed)?;
        self.emitter.emit(update).await;
        Ok(())
    }
}
