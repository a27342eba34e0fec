use async_trait::async_trait;
use std::sync::Arc;

use crate::backends::ChatBackend;
use crate::message::Message;
use crate::prompts::CHAT_SYSTEM_PROMPT;
use crate::state::{StateUpdate, StepStatus, WorkflowState};
use crate::step::{Step, StepContext, StepError};

/// Answers the latest user message directly.
///
/// Success appends one assistant turn and completes the run. A backend
/// failure is captured into the state so the error-handling step can surface
/// it; this step never fails fatally.
pub struct ChatStep {
    chat: Arc<dyn ChatBackend>,
}

impl ChatStep {
    pub fn new(chat: Arc<dyn ChatBackend>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl Step for ChatStep {
    async fn run(
        &self,
        snapshot: &WorkflowState,
        ctx: StepContext,
    ) -> Result<StateUpdate, StepError> {
        let _ = ctx.emit("chat", "answering directly");

        let Some(latest) = snapshot.latest_message() else {
            return Ok(StateUpdate::new()
                .with_status(StepStatus::Error)
                .with_error("Error completing chat: no user message to answer"));
        };

        let request = [
            Message::system(CHAT_SYSTEM_PROMPT),
            Message::user(latest.content.clone()),
        ];

        match self.chat.complete(&request).await {
            Ok(reply) => Ok(StateUpdate::new()
                .with_message(Message::assistant(reply))
                .with_status(StepStatus::Completed)),
            Err(e) => Ok(StateUpdate::new()
                .with_status(StepStatus::Error)
                .with_error(format!("Error completing chat: {e}"))),
        }
    }
}
