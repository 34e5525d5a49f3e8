use crate::a2a;
use crate::handlers::TaskHandler;
use async_trait::async_trait;
use onboard_rt_core::Result;
use std::sync::Arc;

#[async_trait]
pub trait RequestRouter: Send + Sync {
    async fn route(&self, request: &a2a::A2aRequest) -> Result<a2a::A2aOutcome>;
}

pub struct MethodBasedRouter {
    task_handler: Arc<dyn TaskHandler>,
}

impl MethodBasedRouter {
    pub fn new(task_handler: Arc<dyn TaskHandler>) -> Self {
        Self { task_handler }
    }
}

#[async_trait]
impl RequestRouter for MethodBasedRouter {
    async fn route(&self, request: &a2a::A2aRequest) -> Result<a2a::A2aOutcome> {
        match request.method {
            a2a::A2aMethod::MessageSend | a2a::A2aMethod::MessageStream => {
                self.task_handler
                    .handle_send(request.params()?, request.is_stream)
                    .await
            }
            a2a::A2aMethod::TasksGet => self.task_handler.handle_get(request.params()?).await,
            a2a::A2aMethod::TasksCancel => {
                self.task_handler.handle_cancel(request.params()?).await
            }
            a2a::A2aMethod::TasksResubscribe => {
                self.task_handler
                    .handle_resubscribe(request.params()?)
                    .await
            }
            a2a::A2aMethod::PushNotificationConfigSet => {
                self.task_handler
                    .handle_set_push_config(request.params()?)
                    .await
            }
            a2a::A2aMethod::PushNotificationConfigGet => {
                self.task_handler
                    .handle_get_push_config(request.params()?)
                    .await
            }
        }
    }
}
