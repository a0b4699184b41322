//! Notebook view controller: the list of known sessions.

use std::sync::Arc;

use analyst_core::navigation::Navigator;
use analyst_core::session::{ChatSummary, SessionId, SessionIdMinter, SessionStore};

/// State of the notebook view for one mount.
pub struct NotebookView {
    chats: Vec<ChatSummary>,
    minter: Arc<dyn SessionIdMinter>,
}

impl NotebookView {
    pub fn mount(minter: Arc<dyn SessionIdMinter>) -> Self {
        Self {
            chats: Vec::new(),
            minter,
        }
    }

    /// Fetches the chat list once.
    ///
    /// A failed fetch is logged and leaves the list empty, which renders the
    /// same as having no chats.
    pub async fn load(&mut self, store: &dyn SessionStore) {
        match store.list_chats().await {
            Ok(chats) => {
                tracing::debug!("[NotebookView] Loaded {} chats", chats.len());
                self.chats = chats;
            }
            Err(err) => {
                tracing::error!("Failed to fetch chats: {}", err);
                self.chats.clear();
            }
        }
    }

    pub fn chats(&self) -> &[ChatSummary] {
        &self.chats
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    /// Finds a row by 1-based position or by session id.
    pub fn find(&self, selector: &str) -> Option<&ChatSummary> {
        let selector = selector.trim();
        if let Ok(position) = selector.parse::<usize>()
            && let Some(chat) = position.checked_sub(1).and_then(|i| self.chats.get(i))
        {
            return Some(chat);
        }
        self.chats
            .iter()
            .find(|chat| chat.session_id.as_str() == selector)
    }

    /// Opens the selected row in the chat view.
    ///
    /// Returns the opened session id, or `None` if nothing matched.
    pub fn open(&self, selector: &str, navigator: &mut dyn Navigator) -> Option<SessionId> {
        let session_id = self.find(selector)?.session_id.clone();
        navigator.open_session(&session_id);
        Some(session_id)
    }

    /// "New Chat": mints a fresh session id and opens it.
    pub fn new_chat(&self, navigator: &mut dyn Navigator) -> SessionId {
        let session_id = self.minter.mint();
        tracing::info!("[NotebookView] New chat {}", session_id);
        navigator.open_session(&session_id);
        session_id
    }
}

impl std::fmt::Debug for NotebookView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotebookView")
            .field("chats", &self.chats.len())
            .finish()
    }
}
