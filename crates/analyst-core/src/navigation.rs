//! Addressable client state.
//!
//! The active view and session live in a location string shaped like a URL
//! path and query (`/?chat=<id>`, `/notebook`). Any location can be printed,
//! copied, and handed back to the client to reopen the same session.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{AnalystError, Result};
use crate::session::SessionId;

/// Query parameter that carries the active session id.
pub const CHAT_PARAM: &str = "chat";

/// `chat=` value that means "no session yet".
pub const NEW_CHAT_VALUE: &str = "new";

const NOTEBOOK_PATH: &str = "/notebook";
const LOCATION_BASE: &str = "http://analyst.local/";

/// The two top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Chat,
    Notebook,
}

/// Current route plus the session id carried by the query string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    route: Route,
    chat: Option<SessionId>,
}

impl Location {
    /// The chat view bound to `session_id` (`/?chat=<id>`).
    pub fn chat(session_id: SessionId) -> Self {
        Self {
            route: Route::Chat,
            chat: Some(session_id),
        }
    }

    /// The chat view with no session yet (`/`).
    pub fn new_chat() -> Self {
        Self::default()
    }

    /// The notebook list (`/notebook`).
    pub fn notebook() -> Self {
        Self {
            route: Route::Notebook,
            chat: None,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Session id carried by the location, if the chat view is active.
    pub fn session_id(&self) -> Option<&SessionId> {
        match self.route {
            Route::Chat => self.chat.as_ref(),
            Route::Notebook => None,
        }
    }

    /// Parses a path+query string or a full http(s) URL.
    ///
    /// Only the path and the `chat` parameter are significant. An empty
    /// `chat=` value and `chat=new` both mean "no session yet".
    ///
    /// # Errors
    ///
    /// Returns [`AnalystError::InvalidLocation`] if the input is not a URL
    /// or a URL path.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::new_chat());
        }

        let base = Url::parse(LOCATION_BASE)
            .map_err(|e| AnalystError::invalid_location(trimmed, e.to_string()))?;
        let url = Url::options()
            .base_url(Some(&base))
            .parse(trimmed)
            .map_err(|e| AnalystError::invalid_location(trimmed, e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AnalystError::invalid_location(
                trimmed,
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        let path = url.path().trim_end_matches('/');
        if path == NOTEBOOK_PATH {
            return Ok(Self::notebook());
        }

        let chat = url
            .query_pairs()
            .find(|(key, _)| key == CHAT_PARAM)
            .and_then(|(_, value)| {
                if value == NEW_CHAT_VALUE {
                    None
                } else {
                    SessionId::parse(value)
                }
            });

        Ok(Self {
            route: Route::Chat,
            chat,
        })
    }
}

impl FromStr for Location {
    type Err = AnalystError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.route, &self.chat) {
            (Route::Notebook, _) => f.write_str(NOTEBOOK_PATH),
            (Route::Chat, None) => f.write_str("/"),
            (Route::Chat, Some(id)) => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair(CHAT_PARAM, id.as_str())
                    .finish();
                write!(f, "/?{query}")
            }
        }
    }
}

/// Capability to change the active location.
///
/// Views receive a navigator instead of mutating the location themselves, so
/// the shell stays the single owner of "which session is active".
pub trait Navigator {
    /// The location currently shown.
    fn location(&self) -> &Location;

    /// Replaces the current location.
    fn navigate(&mut self, location: Location);

    /// Switches to the chat view bound to `session_id`.
    fn open_session(&mut self, session_id: &SessionId) {
        self.navigate(Location::chat(session_id.clone()));
    }
}
