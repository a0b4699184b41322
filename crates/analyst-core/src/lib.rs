pub mod attachment;
pub mod config;
pub mod error;
pub mod navigation;
pub mod session;

// Re-export common error type
pub use error::AnalystError;

pub use attachment::Attachment;
pub use navigation::{Location, Navigator, Route};
