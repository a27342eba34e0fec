use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A single progress event from one step of one run.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct WorkflowEvent {
    /// When the event was emitted.
    pub when: DateTime<Utc>,
    /// Identifier of the run this event belongs to.
    pub run_id: String,
    /// Name of the step that emitted the event.
    pub step_id: String,
    /// Position of the step in the run's execution order.
    pub seq: u64,
    /// Short machine-readable label for the event kind.
    pub scope: String,
    /// Human-readable description.
    pub message: String,
}

impl WorkflowEvent {
    pub fn new(
        run_id: impl Into<String>,
        step_id: impl Into<String>,
        seq: u64,
        scope: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            when: Utc::now(),
            run_id: run_id.into(),
            step_id: step_id.into(),
            seq,
            scope: scope.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}@{}] {}: {}",
            self.step_id, self.seq, self.scope, self.message
        )
    }
}
