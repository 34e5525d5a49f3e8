//! Runs one workflow invocation and reports it as a sequence of task events.

use crate::a2a_types::TaskState;
use crate::error::RelayError;
use crate::sink::EventSink;
use crate::task_event::{TaskArtifact, TaskEvent, TaskLifecycle};
use crate::workflow::{Workflow, WorkflowOutput};
use onboard_rt_domain::DomainError;
use onboard_rt_intake::{InboundPayload, Normalizer};
use onboard_rt_observability::{metrics, spans};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{Instrument, info, warn};

pub const RECEIVED_MESSAGE: &str = "Processing employee onboarding request...";
pub const CANCEL_UNSUPPORTED: &str = "Task cancellation is not supported";

pub struct OnboardingExecutor {
    workflow: Arc<dyn Workflow>,
}

impl OnboardingExecutor {
    pub fn new(workflow: Arc<dyn Workflow>) -> Self {
        Self { workflow }
    }

    pub fn workflow(&self) -> &Arc<dyn Workflow> {
        &self.workflow
    }

    /// Drive one request to a terminal state.
    ///
    /// Intake failures end in `input-required` with guidance; domain errors and panics
    /// inside the workflow end in `failed`. Only sink failures are returned as errors.
    pub async fn execute(
        &self,
        task_id: &str,
        payload: InboundPayload,
        sink: &dyn EventSink,
    ) -> Result<TaskState, RelayError> {
        let span = spans::execute_task(self.workflow.name(), task_id);
        let state = self.run(payload, sink).instrument(span).await?;
        metrics::record_task_outcome(self.workflow.name(), state.as_str());
        Ok(state)
    }

    /// Cancellation is rejected rather than silently ignored.
    pub async fn cancel(&self, task_id: &str) -> Result<(), RelayError> {
        warn!(task_id, "cancel requested for onboarding task");
        Err(RelayError::Unsupported(CANCEL_UNSUPPORTED.to_string()))
    }

    async fn run(
        &self,
        payload: InboundPayload,
        sink: &dyn EventSink,
    ) -> Result<TaskState, RelayError> {
        let mut lifecycle = TaskLifecycle::new();
        let workflow = self.workflow.as_ref();

        emit(&mut lifecycle, sink, TaskEvent::progress(RECEIVED_MESSAGE)).await?;

        let normalized = {
            let _span = spans::normalize(workflow.schema().name).entered();
            Normalizer::new(workflow.schema()).normalize(payload)
        };
        let fields = match normalized {
            Ok(fields) => fields,
            Err(err) => {
                info!(workflow = workflow.name(), reason = %err, "request needs more input");
                let guidance = format!("{err}\n\n{}", workflow.guidance());
                return emit(&mut lifecycle, sink, TaskEvent::NeedsInput { guidance }).await;
            }
        };

        let prepared = match guarded(|| workflow.prepare(&fields)) {
            Ok(prepared) => prepared,
            Err(message) => return fail(&mut lifecycle, sink, workflow.name(), message).await,
        };
        emit(
            &mut lifecycle,
            sink,
            TaskEvent::progress(format!(
                "Creating employee record for {}...",
                prepared.subject()
            )),
        )
        .await?;

        match guarded(|| prepared.run()) {
            Ok(WorkflowOutput { text, data }) => {
                info!(workflow = workflow.name(), "onboarding request completed");
                let artifact = TaskArtifact::onboarding_result(text, data);
                emit(&mut lifecycle, sink, TaskEvent::Completed { artifact }).await
            }
            Err(message) => fail(&mut lifecycle, sink, workflow.name(), message).await,
        }
    }
}

async fn emit(
    lifecycle: &mut TaskLifecycle,
    sink: &dyn EventSink,
    event: TaskEvent,
) -> Result<TaskState, RelayError> {
    let state = lifecycle.apply(&event)?;
    sink.emit(event).await?;
    Ok(state)
}

async fn fail(
    lifecycle: &mut TaskLifecycle,
    sink: &dyn EventSink,
    workflow: &str,
    message: String,
) -> Result<TaskState, RelayError> {
    warn!(workflow, error = %message, "onboarding request failed");
    emit(lifecycle, sink, TaskEvent::Failed { message }).await
}

/// Run a synchronous workflow step, turning errors and panics into a failure message.
fn guarded<T>(step: impl FnOnce() -> Result<T, DomainError>) -> Result<T, String> {
    match catch_unwind(AssertUnwindSafe(step)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(err.to_string()),
        Err(panic) => {
            let detail = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(format!("internal error: {detail}"))
        }
    }
}
