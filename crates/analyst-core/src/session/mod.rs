//! Session domain module.
//!
//! This module contains all session-related domain models and the interface
//! to the remote session store.
//!
//! # Module Structure
//!
//! - `id`: Session identifiers and the shared minting capability
//! - `message`: Conversation message types (`Sender`, `Message`)
//! - `transcript`: Append-only message sequence of one session
//! - `binding`: Whether a chat view is attached to a session (`SessionBinding`)
//! - `summary`: Notebook list entries (`ChatSummary`)
//! - `store`: Trait for the remote session store
//!
//! # Usage
//!
//! ```ignore
//! use analyst_core::session::{SessionId, SessionIdMinter, UuidSessionIdMinter};
//! use analyst_core::session::{Message, Sender, Transcript, SessionBinding};
//! use analyst_core::session::{SessionStore, AnalyzeRequest, AnalyzeReply};
//! ```

mod binding;
mod id;
mod message;
mod store;
mod summary;
mod transcript;

// Re-export public API
pub use binding::SessionBinding;
pub use id::{SessionId, SessionIdMinter, UuidSessionIdMinter};
pub use message::{Message, Sender};
pub use store::{AnalyzeReply, AnalyzeRequest, SessionStore};
pub use summary::{ATTACHMENT_MARKER, ChatSummary};
pub use transcript::Transcript;
