//! Wire DTOs of the session store and their conversion to domain types.
//!
//! Decoding is lenient in the same places the store is: absent arrays are
//! empty, absent text is empty, and a `null` or empty plot means no plot.

use analyst_core::session::{AnalyzeReply, ChatSummary, Message, Sender, SessionId};
use serde::Deserialize;

/// Body of `GET /chats`.
#[derive(Debug, Deserialize)]
pub struct ChatListDto {
    #[serde(default)]
    pub chats: Vec<ChatSummaryDto>,
}

#[derive(Debug, Deserialize)]
pub struct ChatSummaryDto {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub preview: Option<String>,
}

/// Body of `GET /chat/{session_id}`.
#[derive(Debug, Deserialize)]
pub struct ChatHistoryDto {
    #[serde(default)]
    pub messages: Vec<MessageDto>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageDto {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
}

/// Body of `POST /analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeResponseDto {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ChatSummaryDto {
    /// Converts to the domain summary; entries without an id are dropped.
    pub fn into_domain(self) -> Option<ChatSummary> {
        let session_id = SessionId::parse(&self.session_id)?;
        Some(ChatSummary {
            session_id,
            title: self.title.unwrap_or_default(),
            preview: self.preview.unwrap_or_default(),
        })
    }
}

impl From<MessageDto> for Message {
    fn from(dto: MessageDto) -> Self {
        // Anything that is not the user is rendered as a bot reply.
        let sender = if dto.sender == "user" {
            Sender::User
        } else {
            Sender::Bot
        };
        Message {
            sender,
            text: dto.text.unwrap_or_default(),
            file: non_empty(dto.file),
            plot: non_empty(dto.plot),
        }
    }
}

impl From<AnalyzeResponseDto> for AnalyzeReply {
    fn from(dto: AnalyzeResponseDto) -> Self {
        AnalyzeReply {
            response: dto.response.unwrap_or_default(),
            plot: non_empty(dto.plot),
            session_id: dto.session_id.and_then(SessionId::parse),
        }
    }
}
