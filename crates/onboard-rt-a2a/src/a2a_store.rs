//! In-memory task repository with a per-task update queue.

use crate::a2a_types::{
    Artifact, Message, PushNotificationConfig, Task, TaskArtifactUpdateEvent,
    TaskPushNotificationConfig, TaskState, TaskStatus, TaskStatusUpdateEvent,
};
use async_trait::async_trait;
use onboard_rt_core::ids::{ContextId, TaskId};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum TaskUpdateEvent {
    Status(TaskStatusUpdateEvent),
    Artifact(TaskArtifactUpdateEvent),
}

impl TaskUpdateEvent {
    pub fn task_id(&self) -> &TaskId {
        match self {
            TaskUpdateEvent::Status(event) => &event.task_id,
            TaskUpdateEvent::Artifact(event) => &event.task_id,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, TaskUpdateEvent::Status(event) if event.is_final)
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            TaskUpdateEvent::Status(event) => serde_json::to_value(event),
            TaskUpdateEvent::Artifact(event) => serde_json::to_value(event),
        }
    }
}

#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: HashMap<String, Task>,
    order: Vec<String>,
    updates: HashMap<String, Vec<TaskUpdateEvent>>,
    push_configs: HashMap<String, PushNotificationConfig>,
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn upsert(&self, task: Task) -> Task;
    /// Insert `task` unless its id is taken, in which case the existing state is returned.
    async fn open_or_reject(&self, task: Task) -> Result<Task, TaskState>;
    async fn get(&self, id: &str, history_length: Option<usize>) -> Option<Task>;
    async fn insert_message(&self, message: &Message);
}

#[async_trait]
pub trait TaskEventRecorder: Send + Sync {
    async fn record_status_update(
        &self,
        task_id: &TaskId,
        context_id: &ContextId,
        status: TaskStatus,
    ) -> Option<TaskUpdateEvent>;
    async fn record_artifact_update(
        &self,
        task_id: &TaskId,
        context_id: &ContextId,
        artifact: Artifact,
    ) -> Option<TaskUpdateEvent>;
}

#[async_trait]
pub trait TaskUpdateQueue: Send + Sync {
    async fn drain_updates(&self, task_id: &str) -> Vec<TaskUpdateEvent>;
}

#[async_trait]
pub trait PushConfigRepository: Send + Sync {
    /// Store a task's webhook. Returns `None` when the task does not exist.
    async fn set_push_config(
        &self,
        config: TaskPushNotificationConfig,
    ) -> Option<TaskPushNotificationConfig>;
    async fn get_push_config(&self, task_id: &str) -> Option<TaskPushNotificationConfig>;
}

pub trait TaskStoreBackend:
    TaskRepository + TaskEventRecorder + TaskUpdateQueue + PushConfigRepository
{
}

impl<T> TaskStoreBackend for T where
    T: TaskRepository + TaskEventRecorder + TaskUpdateQueue + PushConfigRepository
{
}

#[async_trait]
impl TaskRepository for Mutex<TaskStore> {
    async fn upsert(&self, task: Task) -> Task {
        let mut store = self.lock().await;
        store.upsert(task)
    }

    async fn open_or_reject(&self, task: Task) -> Result<Task, TaskState> {
        let mut store = self.lock().await;
        store.open_or_reject(task)
    }

    async fn get(&self, id: &str, history_length: Option<usize>) -> Option<Task> {
        let store = self.lock().await;
        store.get(id, history_length)
    }

    async fn insert_message(&self, message: &Message) {
        let mut store = self.lock().await;
        store.insert_message(message);
    }
}

#[async_trait]
impl TaskEventRecorder for Mutex<TaskStore> {
    async fn record_status_update(
        &self,
        task_id: &TaskId,
        context_id: &ContextId,
        status: TaskStatus,
    ) -> Option<TaskUpdateEvent> {
        let mut store = self.lock().await;
        store.record_status_update(task_id, context_id, status)
    }

    async fn record_artifact_update(
        &self,
        task_id: &TaskId,
        context_id: &ContextId,
        artifact: Artifact,
    ) -> Option<TaskUpdateEvent> {
        let mut store = self.lock().await;
        store.record_artifact_update(task_id, context_id, artifact)
    }
}

#[async_trait]
impl TaskUpdateQueue for Mutex<TaskStore> {
    async fn drain_updates(&self, task_id: &str) -> Vec<TaskUpdateEvent> {
        let mut store = self.lock().await;
        store.drain_updates(task_id)
    }
}

#[async_trait]
impl PushConfigRepository for Mutex<TaskStore> {
    async fn set_push_config(
        &self,
        config: TaskPushNotificationConfig,
    ) -> Option<TaskPushNotificationConfig> {
        let mut store = self.lock().await;
        store.set_push_config(config)
    }

    async fn get_push_config(&self, task_id: &str) -> Option<TaskPushNotificationConfig> {
        let store = self.lock().await;
        store.get_push_config(task_id)
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn upsert(&mut self, task: Task) -> Task {
        let id = task.id.as_str().to_string();
        if !self.tasks.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.tasks.insert(id, task.clone());
        task
    }

    pub fn open_or_reject(&mut self, task: Task) -> Result<Task, TaskState> {
        match self.tasks.get(task.id.as_str()) {
            Some(existing) => Err(existing.status.state),
            None => Ok(self.upsert(task)),
        }
    }

    pub fn get(&self, id: &str, history_length: Option<usize>) -> Option<Task> {
        let mut task = self.tasks.get(id).cloned()?;
        if let Some(limit) = history_length {
            truncate_history(&mut task, limit);
        }
        Some(task)
    }

    pub fn insert_message(&mut self, message: &Message) {
        let Some(task_id) = &message.task_id else {
            return;
        };
        if let Some(task) = self.tasks.get_mut(task_id.as_str()) {
            task.history.push(message.clone());
        }
    }

    /// Set the task's status, keep its message in history, and queue the update.
    ///
    /// Returns `None` for unknown tasks and for tasks already in a terminal state.
    pub fn record_status_update(
        &mut self,
        task_id: &TaskId,
        context_id: &ContextId,
        status: TaskStatus,
    ) -> Option<TaskUpdateEvent> {
        let task = self.open_task_mut(task_id)?;
        if let Some(message) = &status.message {
            task.history.push(message.clone());
        }
        task.status = status.clone();

        let event = TaskUpdateEvent::Status(TaskStatusUpdateEvent::new(
            task_id.clone(),
            context_id.clone(),
            status,
        ));
        self.queue(task_id, event.clone());
        Some(event)
    }

    pub fn record_artifact_update(
        &mut self,
        task_id: &TaskId,
        context_id: &ContextId,
        artifact: Artifact,
    ) -> Option<TaskUpdateEvent> {
        let task = self.open_task_mut(task_id)?;
        task.artifacts.push(artifact.clone());

        let event = TaskUpdateEvent::Artifact(TaskArtifactUpdateEvent::new(
            task_id.clone(),
            context_id.clone(),
            artifact,
        ));
        self.queue(task_id, event.clone());
        Some(event)
    }

    pub fn drain_updates(&mut self, task_id: &str) -> Vec<TaskUpdateEvent> {
        self.updates.remove(task_id).unwrap_or_default()
    }

    pub fn set_push_config(
        &mut self,
        config: TaskPushNotificationConfig,
    ) -> Option<TaskPushNotificationConfig> {
        if !self.tasks.contains_key(config.task_id.as_str()) {
            return None;
        }
        let TaskPushNotificationConfig {
            task_id,
            mut push_notification_config,
        } = config;
        push_notification_config
            .id
            .get_or_insert_with(|| task_id.as_str().to_string());
        self.push_configs
            .insert(task_id.as_str().to_string(), push_notification_config.clone());
        Some(TaskPushNotificationConfig {
            task_id,
            push_notification_config,
        })
    }

    pub fn get_push_config(&self, task_id: &str) -> Option<TaskPushNotificationConfig> {
        let config = self.push_configs.get(task_id)?;
        Some(TaskPushNotificationConfig {
            task_id: TaskId::from(task_id),
            push_notification_config: config.clone(),
        })
    }

    fn open_task_mut(&mut self, task_id: &TaskId) -> Option<&mut Task> {
        self.tasks
            .get_mut(task_id.as_str())
            .filter(|task| !task.status.state.is_terminal())
    }

    fn queue(&mut self, task_id: &TaskId, event: TaskUpdateEvent) {
        self.updates
            .entry(task_id.as_str().to_string())
            .or_default()
            .push(event);
    }
}

fn truncate_history(task: &mut Task, limit: usize) {
    if limit == 0 {
        task.history.clear();
        return;
    }
    if task.history.len() > limit {
        let start = task.history.len() - limit;
        task.history = task.history.split_off(start);
    }
}
