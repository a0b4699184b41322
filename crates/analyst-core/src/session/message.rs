//! Conversation message types.
//!
//! Messages are immutable once created; a transcript only ever grows by
//! appending.

use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed by the user.
    User,
    /// Reply produced by the analysis endpoint.
    Bot,
}

/// A single message in a session transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The author of the message.
    pub sender: Sender,
    /// Message body. Bot replies are markdown; user text is shown verbatim.
    pub text: String,
    /// Name of the CSV file sent along with a user message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Image reference attached to a bot reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
}

impl Message {
    /// Creates a user message, optionally naming the attached file.
    pub fn user(text: impl Into<String>, file: Option<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            file,
            plot: None,
        }
    }

    /// Creates a bot reply, optionally carrying a plot reference.
    pub fn bot(text: impl Into<String>, plot: Option<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            file: None,
            plot,
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}
