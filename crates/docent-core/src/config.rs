//! Configuration for the dispatcher and classifier
//!
//! All knobs have working defaults; a TOML file can override any subset.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocentConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
    #[serde(default)]
    pub services: ServicesConfig,
}

impl DocentConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// How many trailing history entries contribute to intent scores
    #[serde(default = "default_history_window")]
    pub history_window: usize,
    /// Base bonus for a keyword match in the most recent history entry;
    /// older entries receive `history_decay / (position_from_end + 1)`
    #[serde(default = "default_history_decay")]
    pub history_decay: f64,
    /// Fixed bonus added to the collection intent when a collection
    /// identifier appears in the message
    #[serde(default = "default_pattern_bonus")]
    pub pattern_bonus: f64,
}

fn default_history_window() -> usize {
    3
}

fn default_history_decay() -> f64 {
    0.2
}

fn default_pattern_bonus() -> f64 {
    0.5
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            history_decay: default_history_decay(),
            pattern_bonus: default_pattern_bonus(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Upper bound on a single agent invocation
    #[serde(default = "default_handler_timeout_secs")]
    pub handler_timeout_secs: u64,
}

fn default_handler_timeout_secs() -> u64 {
    30
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            handler_timeout_secs: default_handler_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Base URL of the museum service backend
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}
