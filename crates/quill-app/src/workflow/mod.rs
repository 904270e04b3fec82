use std::path::PathBuf;
use std::time::Duration;

use quill_config::Config;
use quill_desktop::DesktopError;
use quill_types::Shortcut;

pub mod launch;
pub mod recovery;
pub mod save;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Image '{0}' not found on screen")]
    MissingControl(String),

    #[error("Operator aborted the run")]
    Aborted,

    #[error("Prompt `{badge}` still showing after {retries} retries")]
    RetriesExhausted { badge: String, retries: u32 },

    #[error("Failed to create folder {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Desktop(#[from] DesktopError),
}

/// Everything the save-as sequence needs to know
#[derive(Debug, Clone)]
pub struct SaveSettings {
    pub folder: PathBuf,
    pub save_as: Shortcut,
    pub confirm: Shortcut,
    pub path_bar_label: String,
    pub confidence: f32,
    pub typing_interval: Duration,
    pub dialog_delay: Duration,
}

impl SaveSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            folder: config.output.resolve_folder(),
            save_as: config.input.save_as_shortcut.clone(),
            confirm: config.input.confirm_shortcut.clone(),
            path_bar_label: config.recovery.path_bar_label.clone(),
            confidence: config.matcher.confidence,
            typing_interval: config.input.typing_interval(),
            dialog_delay: config.input.dialog_delay(),
        }
    }
}
