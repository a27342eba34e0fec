//! Workflow state and merge semantics.
//!
//! A single [`WorkflowState`] is created per invocation from the initial user
//! message and owned by the router for the duration of the run. Steps never
//! mutate it: each step returns a [`StateUpdate`] describing the fields it
//! wants to change, and the router folds that update into a fresh state with
//! [`WorkflowState::merge`].
//!
//! Merge rules: every field present in the update overwrites the base field,
//! except `messages`, which is append-only (the update's messages are
//! concatenated after the base's). Fields absent from the update are left
//! untouched, so `merge(s, StateUpdate::default()) == s`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::message::Message;

/// Category assigned to the latest user message by the classify step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageCategory {
    /// The user wants visual content created.
    Image,
    /// Anything else: facts, information, general conversation.
    Chat,
}

impl MessageCategory {
    /// Lenient parse used when validating a classifier reply.
    ///
    /// Accepts the two canonical tags with surrounding whitespace or quotes,
    /// case-insensitively. Returns `None` for everything else so the caller
    /// can apply its own fallback.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().trim_matches(['"', '\'']).to_ascii_lowercase().as_str() {
            "image" => Some(MessageCategory::Image),
            "chat" => Some(MessageCategory::Chat),
            _ => None,
        }
    }
}

impl fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageCategory::Image => f.write_str("image"),
            MessageCategory::Chat => f.write_str("chat"),
        }
    }
}

/// Lifecycle marker used by the routing predicates.
///
/// This is not a step name: it only records whether the run is still in
/// flight, finished cleanly, or holds a captured error waiting for the
/// error-handling step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Error,
}

/// The mutable record threaded through every step of one workflow run.
///
/// Created by [`WorkflowState::new_with_user_message`], advanced only through
/// [`merge`](WorkflowState::merge), and returned to the caller once the
/// router reaches the terminal step. The externally meaningful output fields
/// are `messages`, `refined_prompt`, and `image_urls`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// Ordered conversation turns; append-only within a run.
    pub messages: Vec<Message>,
    /// Set once by the classify step, read by the router.
    pub category: Option<MessageCategory>,
    /// Set by the refine step, consumed by the generate step.
    pub refined_prompt: Option<String>,
    /// Produced by the generate step; possibly empty.
    pub image_urls: Vec<String>,
    /// Lifecycle marker for routing decisions.
    pub status: StepStatus,
    /// Captured error awaiting the error-handling step, if any.
    pub error: Option<String>,
}

impl WorkflowState {
    /// Creates the state for a fresh run from a single user message.
    ///
    /// # Examples
    ///
    /// ```
    /// use imagineer::state::{StepStatus, WorkflowState};
    ///
    /// let state = WorkflowState::new_with_user_message("draw a cat in space");
    /// assert_eq!(state.messages.len(), 1);
    /// assert_eq!(state.status, StepStatus::Pending);
    /// assert!(state.error.is_none());
    /// ```
    #[must_use]
    pub fn new_with_user_message(user_text: &str) -> Self {
        Self {
            messages: vec![Message::user(user_text)],
            ..Self::default()
        }
    }

    /// Folds a step's partial update into a new state, leaving `self` intact.
    ///
    /// Purity matters here: a failed step must not be able to corrupt the
    /// state the error path will observe.
    ///
    /// # Examples
    ///
    /// ```
    /// use imagineer::message::Message;
    /// use imagineer::state::{StateUpdate, StepStatus, WorkflowState};
    ///
    /// let base = WorkflowState::new_with_user_message("hello");
    /// let update = StateUpdate::new()
    ///     .with_message(Message::assistant("hi there"))
    ///     .with_status(StepStatus::Completed);
    ///
    /// let next = base.merge(update);
    /// assert_eq!(base.messages.len(), 1); // base untouched
    /// assert_eq!(next.messages.len(), 2);
    /// assert_eq!(next.status, StepStatus::Completed);
    /// ```
    #[must_use]
    pub fn merge(&self, update: StateUpdate) -> WorkflowState {
        let mut next = self.clone();
        if let Some(mut appended) = update.messages {
            next.messages.append(&mut appended);
        }
        if let Some(category) = update.category {
            next.category = Some(category);
        }
        if let Some(prompt) = update.refined_prompt {
            next.refined_prompt = Some(prompt);
        }
        if let Some(urls) = update.image_urls {
            next.image_urls = urls;
        }
        if let Some(status) = update.status {
            next.status = status;
        }
        if let Some(error) = update.error {
            next.error = error;
        }
        next
    }

    /// The most recent conversation turn, if any.
    #[must_use]
    pub fn latest_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Partial state update returned by step execution.
///
/// All fields are optional; a field left as `None` means "unchanged". The
/// `error` field is doubly wrapped so a step can distinguish "leave the
/// captured error alone" (`None`) from "explicitly clear it"
/// (`Some(None)`) from "capture this failure" (`Some(Some(text))`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateUpdate {
    /// Messages to append to the conversation.
    pub messages: Option<Vec<Message>>,
    /// New message category.
    pub category: Option<MessageCategory>,
    /// New refined image-generation prompt.
    pub refined_prompt: Option<String>,
    /// Replacement list of generated image URLs.
    pub image_urls: Option<Vec<String>>,
    /// New lifecycle status.
    pub status: Option<StepStatus>,
    /// Captured-error change: outer option is presence in the update, inner
    /// option is the new value.
    pub error: Option<Option<String>>,
}

impl StateUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single message.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.get_or_insert_with(Vec::new).push(message);
        self
    }

    /// Append several messages.
    #[must_use]
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages.get_or_insert_with(Vec::new).extend(messages);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: MessageCategory) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_refined_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.refined_prompt = Some(prompt.into());
        self
    }

    #[must_use]
    pub fn with_image_urls(mut self, urls: Vec<String>) -> Self {
        self.image_urls = Some(urls);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Capture a failure into the state.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(Some(error.into()));
        self
    }

    /// Explicitly clear any previously captured error.
    #[must_use]
    pub fn clear_error(mut self) -> Self {
        self.error = Some(None);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_update_is_identity() {
        let state = WorkflowState::new_with_user_message("hello");
        let merged = state.merge(StateUpdate::default());
        assert_eq!(merged, state);
    }

    #[test]
    fn messages_are_appended_not_replaced() {
        let state = WorkflowState::new_with_user_message("first");
        let merged = state.merge(StateUpdate::new().with_message(Message::assistant("second")));
        assert_eq!(merged.messages.len(), 2);
        assert_eq!(merged.messages[0].content, "first");
        assert_eq!(merged.messages[1].content, "second");
    }

    #[test]
    fn scalar_fields_overwrite() {
        let state = WorkflowState::new_with_user_message("x")
            .merge(StateUpdate::new().with_status(StepStatus::InProgress));
        let merged = state.merge(
            StateUpdate::new()
                .with_status(StepStatus::Completed)
                .with_image_urls(vec!["https://img.example/a.png".into()]),
        );
        assert_eq!(merged.status, StepStatus::Completed);
        assert_eq!(merged.image_urls.len(), 1);
    }

    #[test]
    fn error_tristate() {
        let state = WorkflowState::new_with_user_message("x");

        // Absent: unchanged.
        let with_error = state.merge(StateUpdate::new().with_error("boom"));
        let untouched = with_error.merge(StateUpdate::new().with_status(StepStatus::Error));
        assert_eq!(untouched.error.as_deref(), Some("boom"));

        // Present as Some(None): cleared.
        let cleared = with_error.merge(StateUpdate::new().clear_error());
        assert!(cleared.error.is_none());
    }

    #[test]
    fn category_parse_is_lenient() {
        assert_eq!(MessageCategory::parse("image"), Some(MessageCategory::Image));
        assert_eq!(MessageCategory::parse(" Chat "), Some(MessageCategory::Chat));
        assert_eq!(MessageCategory::parse("\"image\""), Some(MessageCategory::Image));
        assert_eq!(MessageCategory::parse("painting"), None);
    }
}
