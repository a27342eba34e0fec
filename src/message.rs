use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a message sender in a conversation.
///
/// Serializes to the lowercase string form used by OpenAI-style chat APIs
/// (`"user"`, `"assistant"`, `"system"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat turn: a role plus text content.
///
/// Messages are the conversation data threaded through the workflow state and
/// the payload sent to the chat backend.
///
/// # Examples
///
/// ```
/// use imagineer::message::{Message, Role};
///
/// let msg = Message::user("draw a cat in space");
/// assert_eq!(msg.role, Role::User);
/// assert!(msg.has_role(Role::User));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who produced this turn.
    pub role: Role,
    /// The text content of the turn.
    pub content: String,
}

impl Message {
    /// Creates a new message with the specified role and content.
    #[must_use]
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Creates a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// Returns true if this message has the specified role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}
