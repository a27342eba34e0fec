use async_trait::async_trait;
use std::sync::Arc;

use crate::backends::ChatBackend;
use crate::message::Message;
use crate::prompts::REFINE_PROMPT;
use crate::state::{StateUpdate, StepStatus, WorkflowState};
use crate::step::{Step, StepContext, StepError};

/// Rewrites the raw user request into an enhanced image-generation prompt.
///
/// Success stores the refined prompt, marks the run in progress, and clears
/// any captured error so the terminal state is unambiguous. All failures are
/// captured into the state; this step never raises past its own boundary.
pub struct RefineStep {
    chat: Arc<dyn ChatBackend>,
}

impl RefineStep {
    pub fn new(chat: Arc<dyn ChatBackend>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl Step for RefineStep {
    async fn run(
        &self,
        snapshot: &WorkflowState,
        ctx: StepContext,
    ) -> Result<StateUpdate, StepError> {
        let _ = ctx.emit("refine", "refining prompt for image generation");

        let Some(latest) = snapshot.latest_message() else {
            return Ok(StateUpdate::new()
                .with_status(StepStatus::Error)
                .with_error("Error refining prompt: no user request to refine"));
        };

        let request = [Message::user(format!(
            "{REFINE_PROMPT}\n\nUser request: {}",
            latest.content
        ))];

        match self.chat.complete(&request).await {
            Ok(refined) => Ok(StateUpdate::new()
                .with_refined_prompt(refined)
                .with_status(StepStatus::InProgress)
                .clear_error()),
            Err(e) => Ok(StateUpdate::new()
                .with_status(StepStatus::Error)
                .with_error(format!("Error refining prompt: {e}"))),
        }
    }
}
