//! Chat view controller.
//!
//! Owns the live transcript of one session and implements the session
//! binding state machine:
//!
//! ```text
//! mount(/)            ──► Unbound
//! mount(/?chat=<id>)  ──► Bound(id) ──load──► transcript from the store
//! Unbound ──first send──► mint id, open /?chat=<id> ──► Bound(id)
//! ```
//!
//! A send is split into [`ChatView::begin_send`], which does all synchronous
//! work (validation, minting, navigation, optimistic append), and
//! [`ChatView::complete_send`], which applies the store's answer. The network
//! call in between is [`PendingSend::dispatch`] and can run on any task.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use analyst_core::attachment::Attachment;
use analyst_core::error::{AnalystError, Result};
use analyst_core::navigation::{Location, Navigator};
use analyst_core::session::{
    AnalyzeReply, AnalyzeRequest, Message, SessionBinding, SessionId, SessionIdMinter,
    SessionStore, Transcript,
};

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one mounted view instance.
///
/// Every mount gets a new id, so a reply addressed to a view that has since
/// been replaced can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

impl ViewId {
    fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A message that has been appended locally and still needs uploading.
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub view_id: ViewId,
    pub request: AnalyzeRequest,
}

impl PendingSend {
    /// Uploads the message and wraps the store's answer for `complete_send`.
    pub async fn dispatch(self, store: &dyn SessionStore) -> SendOutcome {
        let session_id = self.request.session_id.clone();
        let result = store.analyze(self.request).await;
        SendOutcome {
            view_id: self.view_id,
            session_id,
            result,
        }
    }
}

/// The resolution of a [`PendingSend`].
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub view_id: ViewId,
    pub session_id: SessionId,
    pub result: Result<AnalyzeReply>,
}

/// State of the chat view for one mount.
pub struct ChatView {
    id: ViewId,
    binding: SessionBinding,
    transcript: Transcript,
    input: String,
    staged: Option<Attachment>,
    in_flight: usize,
    minter: Arc<dyn SessionIdMinter>,
}

impl ChatView {
    /// Mounts a view for `location`; bound iff the location carries a session id.
    ///
    /// The transcript starts empty; call [`ChatView::load`] to fetch history.
    pub fn mount(location: &Location, minter: Arc<dyn SessionIdMinter>) -> Self {
        Self {
            id: ViewId::next(),
            binding: SessionBinding::from_location(location.session_id()),
            transcript: Transcript::new(),
            input: String::new(),
            staged: None,
            in_flight: 0,
            minter,
        }
    }

    /// Fetches the transcript of the bound session from the store.
    ///
    /// Does nothing while unbound. A failed fetch is logged and leaves the
    /// transcript empty; it is not retried.
    pub async fn load(&mut self, store: &dyn SessionStore) {
        let Some(session_id) = self.binding.session_id().cloned() else {
            return;
        };

        match store.fetch_chat(&session_id).await {
            Ok(messages) => {
                tracing::debug!(
                    "[ChatView] Loaded {} messages for session {}",
                    messages.len(),
                    session_id
                );
                self.transcript.replace(messages);
            }
            Err(err) => {
                tracing::error!("Failed to fetch chat {}: {}", session_id, err);
                self.transcript.replace(Vec::new());
            }
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn binding(&self) -> &SessionBinding {
        &self.binding
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.binding.session_id()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// True while at least one send is unresolved.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the text of the input field.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn staged_attachment(&self) -> Option<&Attachment> {
        self.staged.as_ref()
    }

    /// Stages a CSV file for the next send, replacing any staged file.
    ///
    /// # Errors
    ///
    /// Returns `NotCsv` (or `Io` for an unreadable path) without touching the
    /// currently staged file.
    pub fn stage_attachment(&mut self, path: impl AsRef<Path>) -> Result<&Attachment> {
        let attachment = Attachment::select(path)?;
        tracing::debug!("[ChatView] Staged attachment {}", attachment.name());
        let staged: &Attachment = self.staged.insert(attachment);
        Ok(staged)
    }

    /// Removes the staged file, returning it.
    pub fn clear_attachment(&mut self) -> Option<Attachment> {
        self.staged.take()
    }

    /// Starts sending the current input and staged file.
    ///
    /// On success the user message is already in the transcript, the input
    /// and staged file are cleared, and the view is loading. When the view
    /// was unbound, a new session id has been minted and `navigator` has been
    /// pointed at it before this returns.
    ///
    /// # Errors
    ///
    /// Returns `EmptyMessage` when the input is blank and no file is staged;
    /// nothing changes in that case.
    pub fn begin_send(&mut self, navigator: &mut dyn Navigator) -> Result<PendingSend> {
        if self.input.trim().is_empty() && self.staged.is_none() {
            return Err(AnalystError::EmptyMessage);
        }

        let session_id = match &self.binding {
            SessionBinding::Bound(id) => id.clone(),
            SessionBinding::Unbound => {
                let id = self.minter.mint();
                tracing::info!("[ChatView] Started new session {}", id);
                self.binding = SessionBinding::Bound(id.clone());
                navigator.open_session(&id);
                id
            }
        };

        let text = std::mem::take(&mut self.input);
        let attachment = self.staged.take();

        self.transcript.push(Message::user(
            text.clone(),
            attachment.as_ref().map(|a| a.name().to_string()),
        ));
        self.in_flight += 1;

        Ok(PendingSend {
            view_id: self.id,
            request: AnalyzeRequest {
                session_id,
                text,
                attachment,
            },
        })
    }

    /// Applies the answer to a send started by this view.
    ///
    /// Returns `false` if the outcome belongs to another view instance and
    /// was dropped.
    pub fn complete_send(&mut self, outcome: SendOutcome) -> bool {
        if outcome.view_id != self.id {
            tracing::debug!(
                "[ChatView] Dropping reply for session {} addressed to an unmounted view",
                outcome.session_id
            );
            return false;
        }

        self.in_flight = self.in_flight.saturating_sub(1);
        match outcome.result {
            Ok(reply) => self.transcript.push(reply.to_message()),
            Err(err) => {
                tracing::error!("Failed to analyze message for {}: {}", outcome.session_id, err);
            }
        }
        true
    }

    /// Sends and waits for the reply in one call.
    ///
    /// # Errors
    ///
    /// Only validation errors are returned; store failures are logged and
    /// leave the optimistic user message without a reply.
    pub async fn send(
        &mut self,
        store: &dyn SessionStore,
        navigator: &mut dyn Navigator,
    ) -> Result<()> {
        let pending = self.begin_send(navigator)?;
        let outcome = pending.dispatch(store).await;
        self.complete_send(outcome);
        Ok(())
    }
}

impl std::fmt::Debug for ChatView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatView")
            .field("id", &self.id)
            .field("binding", &self.binding)
            .field("messages", &self.transcript.len())
            .field("staged", &self.staged.as_ref().map(|a| a.name()))
            .field("in_flight", &self.in_flight)
            .finish()
    }
}
