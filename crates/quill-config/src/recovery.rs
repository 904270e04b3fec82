use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_badges() -> Vec<String> {
    vec!["error-badge".to_string(), "warning-badge".to_string()]
}

fn default_path_bar_label() -> String {
    "path-bar".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_dismiss_presses() -> u32 {
    3
}

fn default_settle_ms() -> u64 {
    1000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Interruption dialogs checked after every save, in this order
    #[serde(default = "default_badges")]
    pub badges: Vec<String>,
    #[serde(default = "default_path_bar_label")]
    pub path_bar_label: String,
    /// Retries allowed per save before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Escape presses sent before a retry
    #[serde(default = "default_dismiss_presses")]
    pub dismiss_presses: u32,
    /// Wait after saving before looking for dialogs
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

impl RecoveryConfig {
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            badges: default_badges(),
            path_bar_label: default_path_bar_label(),
            max_retries: default_max_retries(),
            dismiss_presses: default_dismiss_presses(),
            settle_ms: default_settle_ms(),
        }
    }
}
