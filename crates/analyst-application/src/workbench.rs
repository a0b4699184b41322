//! View routing.
//!
//! The workbench keeps the mounted view in step with the shell's location:
//! whenever the location names a different view or a different session than
//! the one mounted, the old view is dropped (its transcript with it) and a
//! new one is mounted and loaded.

use std::path::Path;
use std::sync::Arc;

use analyst_core::attachment::Attachment;
use analyst_core::error::{AnalystError, Result};
use analyst_core::navigation::{Location, Navigator, Route};
use analyst_core::session::{SessionId, SessionIdMinter, SessionStore};

use crate::chat_view::{ChatView, PendingSend, SendOutcome};
use crate::notebook_view::NotebookView;
use crate::shell::NavigationShell;

/// The view currently mounted.
#[derive(Debug)]
pub enum ActiveView {
    Chat(ChatView),
    Notebook(NotebookView),
}

impl ActiveView {
    fn matches(&self, location: &Location) -> bool {
        match (self, location.route()) {
            (ActiveView::Chat(chat), Route::Chat) => chat.session_id() == location.session_id(),
            (ActiveView::Notebook(_), Route::Notebook) => true,
            _ => false,
        }
    }
}

/// Shell plus mounted view, wired to one session store.
pub struct Workbench {
    shell: NavigationShell,
    view: ActiveView,
    store: Arc<dyn SessionStore>,
    minter: Arc<dyn SessionIdMinter>,
}

impl Workbench {
    /// Mounts and loads the view for `initial`.
    pub async fn start(
        initial: Location,
        store: Arc<dyn SessionStore>,
        minter: Arc<dyn SessionIdMinter>,
    ) -> Self {
        let view = Self::mount(&initial, store.as_ref(), &minter).await;
        Self {
            shell: NavigationShell::new(initial),
            view,
            store,
            minter,
        }
    }

    async fn mount(
        location: &Location,
        store: &dyn SessionStore,
        minter: &Arc<dyn SessionIdMinter>,
    ) -> ActiveView {
        tracing::debug!("[Workbench] Mounting view for {}", location);
        match location.route() {
            Route::Chat => {
                let mut chat = ChatView::mount(location, Arc::clone(minter));
                chat.load(store).await;
                ActiveView::Chat(chat)
            }
            Route::Notebook => {
                let mut notebook = NotebookView::mount(Arc::clone(minter));
                notebook.load(store).await;
                ActiveView::Notebook(notebook)
            }
        }
    }

    /// Remounts the view if it no longer matches the location.
    ///
    /// Returns `true` if a new view was mounted.
    async fn reconcile(&mut self) -> bool {
        if self.view.matches(self.shell.location()) {
            return false;
        }
        self.view = Self::mount(self.shell.location(), self.store.as_ref(), &self.minter).await;
        true
    }

    pub fn location(&self) -> &Location {
        self.shell.location()
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn store(&self) -> Arc<dyn SessionStore> {
        Arc::clone(&self.store)
    }

    pub fn chat(&self) -> Option<&ChatView> {
        match &self.view {
            ActiveView::Chat(chat) => Some(chat),
            ActiveView::Notebook(_) => None,
        }
    }

    pub fn notebook(&self) -> Option<&NotebookView> {
        match &self.view {
            ActiveView::Notebook(notebook) => Some(notebook),
            ActiveView::Chat(_) => None,
        }
    }

    fn chat_mut(&mut self) -> Result<&mut ChatView> {
        match &mut self.view {
            ActiveView::Chat(chat) => Ok(chat),
            ActiveView::Notebook(_) => Err(AnalystError::NoActiveChat),
        }
    }

    /// Goes to `location`, remounting the view when needed.
    pub async fn navigate(&mut self, location: Location) -> bool {
        self.shell.navigate(location);
        self.reconcile().await
    }

    /// Mounts the current location afresh, discarding local view state.
    pub async fn refresh(&mut self) {
        self.view = Self::mount(self.shell.location(), self.store.as_ref(), &self.minter).await;
    }

    /// Opens a notebook row (by 1-based position or session id).
    pub async fn open_chat(&mut self, selector: &str) -> Option<SessionId> {
        let ActiveView::Notebook(notebook) = &self.view else {
            return None;
        };
        let opened = notebook.open(selector, &mut self.shell)?;
        self.reconcile().await;
        Some(opened)
    }

    /// Notebook "New Chat": mints an id and opens it.
    ///
    /// From the chat view this goes to the unbound chat instead, so the id is
    /// minted on the first send.
    pub async fn new_chat(&mut self) -> Option<SessionId> {
        let minted = match &self.view {
            ActiveView::Notebook(notebook) => Some(notebook.new_chat(&mut self.shell)),
            ActiveView::Chat(_) => {
                self.shell.navigate(Location::new_chat());
                None
            }
        };
        self.reconcile().await;
        minted
    }

    /// Stages a CSV file in the chat view.
    pub fn stage_attachment(&mut self, path: impl AsRef<Path>) -> Result<&Attachment> {
        self.chat_mut()?.stage_attachment(path)
    }

    /// Removes the staged file from the chat view.
    pub fn clear_attachment(&mut self) -> Result<Option<Attachment>> {
        Ok(self.chat_mut()?.clear_attachment())
    }

    /// Puts `text` in the chat input and starts sending it.
    ///
    /// # Errors
    ///
    /// `NoActiveChat` outside the chat view, `EmptyMessage` for a blank
    /// message without a staged file.
    pub fn begin_send(&mut self, text: &str) -> Result<PendingSend> {
        let ActiveView::Chat(chat) = &mut self.view else {
            return Err(AnalystError::NoActiveChat);
        };
        let draft = chat.input().to_string();
        chat.set_input(text);
        let pending = chat.begin_send(&mut self.shell);
        if pending.is_err() {
            chat.set_input(draft);
        }
        pending
    }

    /// Applies a send outcome to the mounted chat view.
    ///
    /// Returns `false` when the outcome was dropped because its view is gone.
    pub fn complete_send(&mut self, outcome: SendOutcome) -> bool {
        match &mut self.view {
            ActiveView::Chat(chat) => chat.complete_send(outcome),
            ActiveView::Notebook(_) => {
                tracing::debug!(
                    "[Workbench] Dropping reply for session {}; notebook is shown",
                    outcome.session_id
                );
                false
            }
        }
    }
}
