use crate::a2a;
use crate::a2a_store::{
    PushConfigRepository, TaskEventRecorder, TaskRepository, TaskStoreBackend, TaskUpdateEvent,
    TaskUpdateQueue,
};
use crate::a2a_types::{
    GetTaskPushNotificationConfigParams, Message, MessageSendParams, PushNotificationConfig,
    Task, TaskIdParams, TaskPushNotificationConfig, TaskQueryParams, TaskState, TaskStatus,
    TaskStatusUpdateEvent,
};
use crate::events::EventEmitter;
use crate::executor::OnboardingExecutor;
use crate::sink::TaskStoreSink;
use async_trait::async_trait;
use onboard_rt_core::context;
use onboard_rt_core::ids::{ContextId, TaskId};
use onboard_rt_core::{OnboardError, Result};
use onboard_rt_intake::InboundPayload;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle_send(
        &self,
        params: MessageSendParams,
        is_stream: bool,
    ) -> Result<a2a::A2aOutcome>;
    async fn handle_get(&self, params: TaskQueryParams) -> Result<a2a::A2aOutcome>;
    async fn handle_cancel(&self, params: TaskIdParams) -> Result<a2a::A2aOutcome>;
    async fn handle_resubscribe(&self, params: TaskIdParams) -> Result<a2a::A2aOutcome>;
    async fn handle_set_push_config(
        &self,
        params: TaskPushNotificationConfig,
    ) -> Result<a2a::A2aOutcome>;
    async fn handle_get_push_config(
        &self,
        params: GetTaskPushNotificationConfigParams,
    ) -> Result<a2a::A2aOutcome>;
}

pub struct DefaultTaskHandler {
    store: Arc<dyn TaskStoreBackend>,
    emitter: Arc<dyn EventEmitter>,
    executor: Arc<OnboardingExecutor>,
}

impl DefaultTaskHandler {
    pub fn new(
        store: Arc<dyn TaskStoreBackend>,
        emitter: Arc<dyn EventEmitter>,
        executor: Arc<OnboardingExecutor>,
    ) -> Self {
        Self {
            store,
            emitter,
            executor,
        }
    }

    /// Claim a fresh task. Every run ends in a terminal state, so an id that is
    /// already taken never accepts another message.
    async fn open_task(&self, task_id: &TaskId, requested: Option<ContextId>) -> Result<Task> {
        let context_id = requested
            .or_else(context::current_context_id)
            .unwrap_or_else(context::generate_context_id);
        self.store
            .open_or_reject(Task::new(task_id.clone(), context_id))
            .await
            .map_err(|state| {
                OnboardError::InvalidParams(format!(
                    "task {task_id} is already {state} and accepts no further messages"
                ))
            })
    }

    /// Close a run the executor abandoned, so the task still ends in one terminal state.
    async fn fail_abandoned(&self, task: &Task, reason: &OnboardError) {
        let message = Message::agent_text(reason.to_string(), &task.id, &task.context_id);
        let recorded = self
            .store
            .record_status_update(
                &task.id,
                &task.context_id,
                TaskStatus::new(TaskState::Failed, Some(message)),
            )
            .await;
        match recorded {
            Some(update) => self.emitter.emit(update).await,
            None => debug!(task_id = %task.id, "abandoned task already terminal or gone"),
        }
    }

    async fn register_push_config(
        &self,
        task_id: &TaskId,
        config: PushNotificationConfig,
    ) -> Result<TaskPushNotificationConfig> {
        if config.url.trim().is_empty() {
            return Err(OnboardError::InvalidParams(
                "pushNotificationConfig.url must not be empty".to_string(),
            ));
        }
        self.store
            .set_push_config(TaskPushNotificationConfig {
                task_id: task_id.clone(),
                push_notification_config: config,
            })
            .await
            .ok_or_else(|| OnboardError::TaskNotFound(task_id.to_string()))
    }

    async fn stream_from(&self, snapshot: &Task) -> Result<Vec<Value>> {
        let mut responses = vec![serde_json::to_value(snapshot)?];
        for update in self.store.drain_updates(snapshot.id.as_str()).await {
            responses.push(update.to_value()?);
        }
        Ok(responses)
    }

    async fn require(&self, task_id: &TaskId, history_length: Option<usize>) -> Result<Task> {
        self.store
            .get(task_id.as_str(), history_length)
            .await
            .ok_or_else(|| OnboardError::TaskNotFound(task_id.to_string()))
    }
}

#[async_trait]
impl TaskHandler for DefaultTaskHandler {
    async fn handle_send(
        &self,
        params: MessageSendParams,
        is_stream: bool,
    ) -> Result<a2a::A2aOutcome> {
        let MessageSendParams {
            mut message,
            configuration,
            ..
        } = params;
        let (history_length, push_config) = match configuration {
            Some(config) => (config.history_length, config.push_notification_config),
            None => (None, None),
        };
        let task_id = message.task_id.clone().unwrap_or_else(TaskId::generate);

        let task = self.open_task(&task_id, message.context_id.clone()).await?;
        if let Some(config) = push_config {
            self.register_push_config(&task_id, config).await?;
        }
        message.task_id = Some(task.id.clone());
        message.context_id = Some(task.context_id.clone());
        self.store.insert_message(&message).await;
        let snapshot = self.require(&task_id, None).await?;

        let parts = message
            .parts
            .iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<Value>>>()?;
        let sink = TaskStoreSink::new(
            self.store.clone(),
            self.emitter.clone(),
            task.id.clone(),
            task.context_id.clone(),
        );
        let run = self
            .executor
            .execute(task_id.as_str(), InboundPayload::MessageParts(parts), &sink)
            .await;
        let state = match run {
            Ok(state) => state,
            Err(err) => {
                let err = OnboardError::from(err);
                warn!(task_id = %task_id, error = %err, "task run aborted");
                self.fail_abandoned(&task, &err).await;
                return Err(err);
            }
        };
        info!(task_id = %task_id, %state, "task run finished");

        if is_stream {
            Ok(a2a::A2aOutcome::Stream(self.stream_from(&snapshot).await?))
        } else {
            // The caller gets the final task; nobody will drain this run's updates.
            self.store.drain_updates(task_id.as_str()).await;
            let task = self.require(&task_id, history_length).await?;
            Ok(a2a::A2aOutcome::Response(serde_json::to_value(task)?))
        }
    }

    async fn handle_get(&self, params: TaskQueryParams) -> Result<a2a::A2aOutcome> {
        let task = self.require(&params.id, params.history_length).await?;
        Ok(a2a::A2aOutcome::Response(serde_json::to_value(task)?))
    }

    async fn handle_cancel(&self, params: TaskIdParams) -> Result<a2a::A2aOutcome> {
        self.require(&params.id, Some(0)).await?;
        self.executor.cancel(params.id.as_str()).await?;
        let task = self.require(&params.id, None).await?;
        Ok(a2a::A2aOutcome::Response(serde_json::to_value(task)?))
    }

    async fn handle_resubscribe(&self, params: TaskIdParams) -> Result<a2a::A2aOutcome> {
        let task = self.require(&params.id, None).await?;
        let mut responses = self.stream_from(&task).await?;
        if responses.len() == 1 && task.status.state.is_terminal() {
            // Nothing queued: replay the terminal status so the stream still ends final.
            let status = TaskUpdateEvent::Status(TaskStatusUpdateEvent::new(
                task.id.clone(),
                task.context_id.clone(),
                task.status.clone(),
            ));
            responses.push(status.to_value()?);
        }
        Ok(a2a::A2aOutcome::Stream(responses))
    }

    async fn handle_set_push_config(
        &self,
        params: TaskPushNotificationConfig,
    ) -> Result<a2a::A2aOutcome> {
        let stored = self
            .register_push_config(&params.task_id, params.push_notification_config)
            .await?;
        Ok(a2a::A2aOutcome::Response(serde_json::to_value(stored)?))
    }

    async fn handle_get_push_config(
        &self,
        params: GetTaskPushNotificationConfigParams,
    ) -> Result<a2a::A2aOutcome> {
        self.require(&params.id, Some(0)).await?;
        let stored = self
            .store
            .get_push_config(params.id.as_str())
            .await
            .filter(|stored| match &params.push_notification_config_id {
                Some(wanted) => stored.push_notification_config.id.as_ref() == Some(wanted),
                None => true,
            })
            .ok_or_else(|| {
                OnboardError::InvalidParams(format!(
                    "no push notification config for task {}",
                    params.id
                ))
            })?;
        Ok(a2a::A2aOutcome::Response(serde_json::to_value(stored)?))
    }
}
