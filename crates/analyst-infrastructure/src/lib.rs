pub mod config_service;
pub mod dto;
pub mod http_session_store;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::http_session_store::HttpSessionStore;
pub use crate::paths::AnalystPaths;
