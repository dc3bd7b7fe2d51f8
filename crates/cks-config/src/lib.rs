//! Process-wide configuration: file plus environment, resolved once at startup.

pub mod config;

pub use config::{ApiConfig, Config, DiagramSettings};
pub use config::{API_KEY_ENV, DIAGRAM_TIMEOUT_ENV, DIAGRAM_TOOL_ENV};
