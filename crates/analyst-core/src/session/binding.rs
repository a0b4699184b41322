//! Session binding state of a chat view.

use super::id::SessionId;

/// Whether a chat view knows which session it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionBinding {
    /// No session id yet; the first send mints one.
    #[default]
    Unbound,
    /// The view is attached to this session.
    Bound(SessionId),
}

impl SessionBinding {
    /// Binding derived from the `chat` query parameter of a location.
    pub fn from_location(chat: Option<&SessionId>) -> Self {
        match chat {
            Some(id) => Self::Bound(id.clone()),
            None => Self::Unbound,
        }
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            Self::Unbound => None,
            Self::Bound(id) => Some(id),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }
}
