//! Application layer for Analyst.
//!
//! This crate holds the view controllers (chat and notebook), the navigation
//! shell that owns the current location, and the workbench that keeps the
//! mounted view in step with that location. Everything here talks to the
//! remote store only through [`analyst_core::session::SessionStore`].

pub mod chat_view;
pub mod notebook_view;
pub mod shell;
pub mod workbench;

pub use chat_view::{ChatView, PendingSend, SendOutcome, ViewId};
pub use notebook_view::NotebookView;
pub use shell::NavigationShell;
pub use workbench::{ActiveView, Workbench};
