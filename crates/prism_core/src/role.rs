//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Chat participant role.
///
/// Serialized in lowercase, matching chat-completion wire formats.
///
/// # Examples
///
/// ```
/// use prism_core::Role;
///
/// assert_ne!(Role::User, Role::Assistant);
/// assert_eq!(format!("{}", Role::System), "System");
/// assert_eq!(Role::System.as_wire(), "system");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System messages provide context and instructions
    System,
    /// User messages carry the stage request
    User,
    /// Assistant messages are from the model
    Assistant,
}

impl Role {
    /// Lowercase role name used on the wire.
    pub fn as_wire(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}
