//! Configuration for the assistant (`~/.config/cloud-sketch/config.toml`).
//!
//! Resolution order: built-in defaults, then the optional config file, then
//! environment overrides. The result is immutable for the process lifetime
//! and passed by reference into each flow.

use anyhow::{Context, Result};
use cks_core::AppError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// XDG application name for the config directory.
pub const APP_NAME: &str = "cloud-sketch";

/// Environment variable holding the text-generation API credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment override for the diagram tool executable.
pub const DIAGRAM_TOOL_ENV: &str = "CKS_DIAGRAM_TOOL";
/// Environment override for the diagram subprocess timeout (seconds).
pub const DIAGRAM_TIMEOUT_ENV: &str = "CKS_DIAGRAM_TIMEOUT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub diagram: DiagramSettings,
}

/// Text-generation collaborator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API credential. The environment variable wins over the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
        }
    }
}

/// Diagram subprocess settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramSettings {
    /// Executable name or path of the external diagram tool.
    #[serde(default = "default_tool")]
    pub tool: String,
    /// Wall-clock limit for one diagram subprocess.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Directory the tool writes image files into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            timeout_secs: default_timeout_secs(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_tool() -> String {
    "q".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("generated-diagrams")
}

impl Config {
    /// Load the config file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config: {}", path.display()))?
            }
            _ => Self::default(),
        };
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Path to the config file: `~/.config/cloud-sketch/config.toml`.
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The credential gate for every chat/analysis operation.
    pub fn require_api_key(&self) -> Result<&str, AppError> {
        self.api
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AppError::MissingApiKey)
    }

    /// Create the diagram output directory if absent (startup contract).
    /// Files inside it are only ever read afterwards.
    pub fn ensure_output_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.diagram.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.diagram.output_dir.display()
            )
        })
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(key) = var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.api.api_key = Some(key);
            }
        }
        if let Some(tool) = var(DIAGRAM_TOOL_ENV) {
            if !tool.trim().is_empty() {
                self.diagram.tool = tool;
            }
        }
        if let Some(raw) = var(DIAGRAM_TIMEOUT_ENV) {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => self.diagram.timeout_secs = secs,
                _ => warn!(
                    value = %raw,
                    "Ignoring invalid {DIAGRAM_TIMEOUT_ENV}; keeping {}s",
                    self.diagram.timeout_secs
                ),
            }
        }
    }
}
