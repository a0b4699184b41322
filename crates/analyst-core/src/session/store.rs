//! Session store trait.
//!
//! Defines the interface to the remote service that persists chats and
//! produces analysis replies.

use async_trait::async_trait;

use super::id::SessionId;
use super::message::Message;
use super::summary::ChatSummary;
use crate::attachment::Attachment;
use crate::error::Result;

/// One outgoing message for the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    /// Session the message belongs to.
    pub session_id: SessionId,
    /// Text as typed; may be empty when only a file is sent.
    pub text: String,
    /// CSV file sent along with the text.
    pub attachment: Option<Attachment>,
}

/// Reply of the analysis endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalyzeReply {
    /// Markdown reply text.
    pub response: String,
    /// Image reference, if the analysis produced a chart.
    pub plot: Option<String>,
    /// Session id echoed back by the store, if it sent one.
    pub session_id: Option<SessionId>,
}

impl AnalyzeReply {
    /// The bot message this reply appends to a transcript.
    pub fn to_message(&self) -> Message {
        Message::bot(self.response.clone(), self.plot.clone())
    }
}

/// The external service that owns all persisted chat content.
///
/// The client treats it as the ground truth: transcripts are fetched from it
/// on load and never cached across sessions.
///
/// # Implementation Notes
///
/// Implementations report every failure (connection, status, decoding) as an
/// error; callers decide how to degrade. No retries are expected.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Lists the summaries of all known sessions.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<ChatSummary>)`: All sessions, in store order
    /// - `Err(_)`: The store could not be queried
    async fn list_chats(&self) -> Result<Vec<ChatSummary>>;

    /// Fetches the full transcript of one session.
    ///
    /// # Arguments
    ///
    /// * `session_id` - The session to fetch
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Message>)`: Stored messages, empty for an unknown session
    /// - `Err(_)`: The store could not be queried
    async fn fetch_chat(&self, session_id: &SessionId) -> Result<Vec<Message>>;

    /// Uploads one message and waits for the analysis reply.
    ///
    /// # Arguments
    ///
    /// * `request` - Text, optional CSV file and session id
    ///
    /// # Returns
    ///
    /// - `Ok(AnalyzeReply)`: The reply text and optional plot
    /// - `Err(_)`: Upload or analysis failed
    async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalyzeReply>;
}
