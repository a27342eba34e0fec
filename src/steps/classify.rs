use async_trait::async_trait;
use std::sync::Arc;

use crate::backends::ChatBackend;
use crate::message::Message;
use crate::prompts::CLASSIFY_SYSTEM_PROMPT;
use crate::state::{MessageCategory, StateUpdate, WorkflowState};
use crate::step::{Step, StepContext, StepError};

/// Assigns a [`MessageCategory`] to the latest user message.
///
/// The backend is instructed to reply with a closed two-valued enum; the
/// reply is validated locally and anything unparseable defaults to
/// [`MessageCategory::Chat`], failing open toward the simpler branch.
///
/// A backend failure here is fatal to the run: without a category there is
/// no branch to recover into.
pub struct ClassifyStep {
    chat: Arc<dyn ChatBackend>,
}

impl ClassifyStep {
    pub fn new(chat: Arc<dyn ChatBackend>) -> Self {
        Self { chat }
    }
}

/// Validate a classifier reply, tolerating the common failure shapes:
/// a JSON object with a `category` field, a bare JSON string, or the raw
/// tag with surrounding prose stripped by `MessageCategory::parse`.
fn parse_reply(raw: &str) -> MessageCategory {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw.trim()) {
        let tag = value
            .get("category")
            .and_then(|c| c.as_str())
            .or_else(|| value.as_str());
        if let Some(category) = tag.and_then(MessageCategory::parse) {
            return category;
        }
    }
    MessageCategory::parse(raw).unwrap_or(MessageCategory::Chat)
}

#[async_trait]
impl Step for ClassifyStep {
    async fn run(
        &self,
        snapshot: &WorkflowState,
        ctx: StepContext,
    ) -> Result<StateUpdate, StepError> {
        let latest = snapshot
            .latest_message()
            .ok_or(StepError::MissingInput {
                what: "user message",
            })?;

        let _ = ctx.emit("classify", "classifying latest user message");

        let request = [
            Message::system(CLASSIFY_SYSTEM_PROMPT),
            Message::user(latest.content.clone()),
        ];
        let reply = self.chat.complete(&request).await?;
        let category = parse_reply(&reply);

        let _ = ctx.emit("classify", format!("category: {category}"));
        Ok(StateUpdate::new().with_category(category))
    }
}
