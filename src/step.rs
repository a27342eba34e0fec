//! The step abstraction: a node of the workflow graph.
//!
//! A step is a pure function from the current [`WorkflowState`] to a
//! [`StateUpdate`]; the router merges the update and picks the next step.
//!
//! # Error handling
//!
//! Steps have two failure channels:
//!
//! 1. **Captured errors**: put the failure text in `StateUpdate::with_error`
//!    and return `Ok`. The router then routes to the error-handling step,
//!    which surfaces the failure as an assistant message. This is the normal
//!    path for backend failures in the chat, refine, and generate steps.
//! 2. **Fatal errors**: return `Err(StepError)` to abort the run. Reserved
//!    for conditions with no sensible recovery, such as the classifier being
//!    unable to reach its backend at all.

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

use crate::backends::BackendError;
use crate::event_bus::WorkflowEvent;
use crate::state::{StateUpdate, WorkflowState};

/// A single node in the workflow graph.
#[async_trait]
pub trait Step: Send + Sync {
    /// Execute this step against a read view of the current state.
    async fn run(
        &self,
        snapshot: &WorkflowState,
        ctx: StepContext,
    ) -> Result<StateUpdate, StepError>;
}

/// Execution context handed to a step by the router.
#[derive(Clone, Debug)]
pub struct StepContext {
    /// Identifier of the enclosing run.
    pub run_id: String,
    /// Name of the executing step.
    pub step_id: String,
    /// Position of this step in the run's execution order.
    pub seq: u64,
    /// Channel for emitting progress events.
    pub events: flume::Sender<WorkflowEvent>,
}

impl StepContext {
    /// Emit a progress event enriched with this context's metadata.
    pub fn emit(
        &self,
        scope: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), EmitError> {
        self.events
            .send(WorkflowEvent::new(
                self.run_id.clone(),
                self.step_id.clone(),
                self.seq,
                scope,
                message,
            ))
            .map_err(|_| EmitError::BusUnavailable)
    }
}

/// Errors that can occur when emitting through a [`StepContext`].
#[derive(Debug, Error, Diagnostic)]
pub enum EmitError {
    #[error("failed to emit event: event bus unavailable")]
    #[diagnostic(code(imagineer::step::event_bus_unavailable))]
    BusUnavailable,
}

/// Fatal step failures that abort the workflow run.
///
/// Recoverable failures never take this form; they are captured into the
/// state instead (see the module docs).
#[derive(Debug, Error, Diagnostic)]
pub enum StepError {
    /// Expected input data is missing from the state.
    #[error("missing expected input: {what}")]
    #[diagnostic(
        code(imagineer::step::missing_input),
        help("Check that the run was started with an initial user message.")
    )]
    MissingInput { what: &'static str },

    /// A backend call failed in a step with no captured-error path.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Backend(#[from] BackendError),
}
