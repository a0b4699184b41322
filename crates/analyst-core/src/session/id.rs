//! Session identifiers and the shared minting capability.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of one chat session.
///
/// Identifiers either come from the session store (listed chats) or are
/// minted locally by a [`SessionIdMinter`] when a new conversation starts.
/// The client never inspects their contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps an identifier received from the store or the location.
    ///
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first `len` characters, used for compact display.
    pub fn short(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Produces fresh session identifiers.
///
/// Both the chat view (first send of a new conversation) and the notebook view
/// ("New Chat") mint through the same implementation, so an id handed from one
/// to the other always has the same format.
pub trait SessionIdMinter: Send + Sync {
    /// Returns an identifier that has never been returned before.
    fn mint(&self) -> SessionId;
}

/// Default minter: random UUID v4 in hyphenated lowercase form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSessionIdMinter;

impl SessionIdMinter for UuidSessionIdMinter {
    fn mint(&self) -> SessionId {
        SessionId(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_rejects_blank() {
        assert!(SessionId::parse("").is_none());
        assert!(SessionId::parse("   ").is_none());
        assert_eq!(SessionId::parse(" abc ").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_uuid_minter_format() {
        let id = UuidSessionIdMinter.mint();
        let parsed = Uuid::parse_str(id.as_str()).expect("minted id should be a UUID");
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(id.as_str(), id.as_str().to_lowercase());
    }

    #[test]
    fn test_uuid_minter_never_repeats() {
        let minter = UuidSessionIdMinter;
        let ids: HashSet<SessionId> = (0..256).map(|_| minter.mint()).collect();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn test_short() {
        let id = SessionId::parse("0123456789").unwrap();
        assert_eq!(id.short(6), "012345");
        assert_eq!(id.short(50), "0123456789");
    }

    #[test]
    fn test_serde_transparent() {
        let id = SessionId::parse("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }
}
