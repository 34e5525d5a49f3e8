use crate::a2a_store::TaskUpdateEvent;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::trace;

/// Fan-out of recorded task updates to push-style subscribers.
#[async_trait]
pub trait EventEmitter: Send + Sync {
    async fn emit(&self, event: TaskUpdateEvent);
}

/// Emitter backed by a bounded broadcast channel. Slow subscribers lag rather
/// than block task execution.
pub struct BroadcastEventEmitter {
    updates: broadcast::Sender<TaskUpdateEvent>,
}

impl BroadcastEventEmitter {
    pub fn with_capacity(capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(capacity);
        Self { updates }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TaskUpdateEvent> {
        self.updates.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.updates.receiver_count()
    }
}

#[async_trait]
impl EventEmitter for BroadcastEventEmitter {
    async fn emit(&self, event: TaskUpdateEvent) {
        let task_id = event.task_id().clone();
        match self.updates.send(event) {
            Ok(delivered) => trace!(%task_id, delivered, "task update broadcast"),
            Err(_) => trace!(%task_id, "task update dropped, no subscribers"),
        }
    }
}
