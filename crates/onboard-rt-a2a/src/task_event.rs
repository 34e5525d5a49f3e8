//! Relay events and the task state machine they drive.

use crate::a2a_types::TaskState;
use crate::error::RelayError;
use serde_json::Value;

pub const RESULT_ARTIFACT_NAME: &str = "onboarding_result";

/// The result payload of a completed task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskArtifact {
    pub name: String,
    pub text: String,
    pub data: Value,
}

impl TaskArtifact {
    pub fn onboarding_result(text: impl Into<String>, data: Value) -> Self {
        Self {
            name: RESULT_ARTIFACT_NAME.to_string(),
            text: text.into(),
            data,
        }
    }
}

/// What an executor reports to its sink.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    Progress { message: String },
    NeedsInput { guidance: String },
    Completed { artifact: TaskArtifact },
    Failed { message: String },
}

impl TaskEvent {
    pub fn progress(message: impl Into<String>) -> Self {
        TaskEvent::Progress {
            message: message.into(),
        }
    }

    /// State the task is in once this event is applied.
    pub fn state(&self) -> TaskState {
        match self {
            TaskEvent::Progress { .. } => TaskState::Working,
            TaskEvent::NeedsInput { .. } => TaskState::InputRequired,
            TaskEvent::Completed { .. } => TaskState::Completed,
            TaskEvent::Failed { .. } => TaskState::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Human-readable text carried by the event.
    pub fn text(&self) -> &str {
        match self {
            TaskEvent::Progress { message } | TaskEvent::Failed { message } => message,
            TaskEvent::NeedsInput { guidance } => guidance,
            TaskEvent::Completed { artifact } => &artifact.text,
        }
    }
}

/// Forward-only task state: any number of progress events, then exactly one terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskLifecycle {
    state: TaskState,
}

impl Default for TaskLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskLifecycle {
    pub fn new() -> Self {
        Self {
            state: TaskState::Working,
        }
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn apply(&mut self, event: &TaskEvent) -> Result<TaskState, RelayError> {
        if self.state.is_terminal() {
            return Err(RelayError::AfterTerminal(self.state));
        }
        self.state = event.state();
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn progress_keeps_task_working() {
        let mut lifecycle = TaskLifecycle::new();
        assert_eq!(
            lifecycle.apply(&TaskEvent::progress("one")).unwrap(),
            TaskState::Working
        );
        assert_eq!(
            lifecycle.apply(&TaskEvent::progress("two")).unwrap(),
            TaskState::Working
        );
        assert!(!lifecycle.is_finished());
    }

    #[test]
    fn nothing_follows_a_terminal_event() {
        let mut lifecycle = TaskLifecycle::new();
        lifecycle
            .apply(&TaskEvent::Completed {
                artifact: TaskArtifact::onboarding_result("done", json!({})),
            })
            .unwrap();

        let err = lifecycle.apply(&TaskEvent::progress("late")).unwrap_err();
        assert_eq!(err, RelayError::AfterTerminal(TaskState::Completed));
        let err = lifecycle
            .apply(&TaskEvent::Failed {
                message: "late".into(),
            })
            .unwrap_err();
        assert_eq!(err, RelayError::AfterTerminal(TaskState::Completed));
        assert_eq!(lifecycle.state(), TaskState::Completed);
    }

    #[test]
    fn input_required_is_terminal_for_the_run() {
        let mut lifecycle = TaskLifecycle::new();
        lifecycle
            .apply(&TaskEvent::NeedsInput {
                guidance: "more".into(),
            })
            .unwrap();
        assert!(lifecycle.is_finished());
        assert!(lifecycle.apply(&TaskEvent::progress("x")).is_err());
    }
}
