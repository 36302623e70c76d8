//! Message types for conversation history.

use crate::Role;
use serde::{Deserialize, Serialize};

/// A single chat message.
///
/// # Examples
///
/// ```
/// use prism_core::{Message, Role};
///
/// let message = Message::user("Describe the setting.");
/// assert_eq!(message.role, Role::User);
///
/// let built = Message::builder()
///     .role(Role::System)
///     .content("You are a creative writing assistant.")
///     .build()
///     .unwrap();
/// assert_eq!(built.role, Role::System);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct Message {
    /// The role of the message sender
    pub role: Role,
    /// The text content of the message
    pub content: String,
}

impl Message {
    /// Creates a new message builder.
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }

    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}
