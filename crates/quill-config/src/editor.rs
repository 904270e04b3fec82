use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_program() -> String {
    if cfg!(windows) {
        "notepad.exe".to_string()
    } else {
        "gedit".to_string()
    }
}

fn default_startup_wait_ms() -> u64 {
    1000
}

fn default_typing_settle_ms() -> u64 {
    500
}

fn default_shutdown_grace_ms() -> u64 {
    2000
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct EditorConfig {
    /// Editor executable, resolved through PATH
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// How long to wait after launch before checking the editor is still alive
    #[serde(default = "default_startup_wait_ms")]
    pub startup_wait_ms: u64,
    /// Pause between typing the document and saving it
    #[serde(default = "default_typing_settle_ms")]
    pub typing_settle_ms: u64,
    /// How long a closing editor gets to exit before it is killed
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl EditorConfig {
    pub fn startup_wait(&self) -> Duration {
        Duration::from_millis(self.startup_wait_ms)
    }

    pub fn typing_settle(&self) -> Duration {
        Duration::from_millis(self.typing_settle_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: vec![],
            startup_wait_ms: default_startup_wait_ms(),
            typing_settle_ms: default_typing_settle_ms(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}
