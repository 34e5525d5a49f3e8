//! Push-notification delivery for tasks with a registered webhook.
//!
//! Updates are matched against the task's stored config and handed to a
//! [`PushNotificationSender`]. The default sender is an outbox the embedding HTTP
//! server drains and POSTs from.

use crate::a2a_store::{PushConfigRepository, TaskStoreBackend, TaskUpdateEvent};
use crate::events::EventEmitter;
use async_trait::async_trait;
use onboard_rt_core::ids::TaskId;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// One update addressed to a client webhook.
#[derive(Debug, Clone, PartialEq)]
pub struct PushNotification {
    pub task_id: TaskId,
    pub url: String,
    pub token: Option<String>,
    pub payload: Value,
}

#[async_trait]
pub trait PushNotificationSender: Send + Sync {
    async fn send(&self, notification: PushNotification);
}

/// Bounded broadcast outbox of pending webhook deliveries.
pub struct PushOutbox {
    pending: broadcast::Sender<PushNotification>,
}

impl PushOutbox {
    pub fn with_capacity(capacity: usize) -> Self {
        let (pending, _) = broadcast::channel(capacity);
        Self { pending }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PushNotification> {
        self.pending.subscribe()
    }
}

#[async_trait]
impl PushNotificationSender for PushOutbox {
    async fn send(&self, notification: PushNotification) {
        let task_id = notification.task_id.clone();
        if self.pending.send(notification).is_err() {
            debug!(%task_id, "push notification dropped, no deliverer attached");
        }
    }
}

/// Emitter that forwards every update to `inner` and, when the task has a webhook,
/// to the push sender as well.
pub struct PushNotifyingEmitter {
    inner: Arc<dyn EventEmitter>,
    configs: Arc<dyn TaskStoreBackend>,
    sender: Arc<dyn PushNotificationSender>,
}

impl PushNotifyingEmitter {
    pub fn new(
        inner: Arc<dyn EventEmitter>,
        configs: Arc<dyn TaskStoreBackend>,
        sender: Arc<dyn PushNotificationSender>,
    ) -> Self {
        Self {
            inner,
            configs,
            sender,
        }
    }
}

#[async_trait]
impl EventEmitter for PushNotifyingEmitter {
    async fn emit(&self, event: TaskUpdateEvent) {
        let config = self.configs.get_push_config(event.task_id().as_str()).await;
        if let Some(config) = config {
            match event.to_value() {
                Ok(payload) => {
                    let webhook = config.push_notification_config;
                    self.sender
                        .send(PushNotification {
                            task_id: config.task_id,
                            url: webhook.url,
                            token: webhook.token,
                            payload,
                        })
                        .await;
                }
                Err(err) => {
                    warn!(task_id = %event.task_id(), error = %err, "unserializable task update")
                }
            }
        }
        self.inner.emit(event).await;
    }
}
