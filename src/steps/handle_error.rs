use async_trait::async_trait;

use crate::message::Message;
use crate::state::{StateUpdate, StepStatus, WorkflowState};
use crate::step::{Step, StepContext, StepError};

/// Universal recovery point before termination.
///
/// Surfaces the captured error to the user in a friendly wrapper, marks the
/// run completed, and clears the error so the terminal state carries no
/// pending failure. This step is a sink with no failure path of its own.
pub struct HandleErrorStep;

#[async_trait]
impl Step for HandleErrorStep {
    async fn run(
        &self,
        snapshot: &WorkflowState,
        ctx: StepContext,
    ) -> Result<StateUpdate, StepError> {
        let error = snapshot
            .error
            .as_deref()
            .unwrap_or("An unknown error occurred");

        let _ = ctx.emit("handle_error", format!("recovering from: {error}"));

        Ok(StateUpdate::new()
            .with_message(Message::assistant(format!(
                "Sorry, I encountered an error: {error}"
            )))
            .with_status(StepStatus::Completed)
            .clear_error())
    }
}
