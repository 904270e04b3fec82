use std::time::Duration;

use quill_types::{Key, Shortcut};
use serde::{Deserialize, Serialize};

fn default_typing_interval_ms() -> u64 {
    25
}

fn default_failsafe() -> bool {
    true
}

fn default_save_as_shortcut() -> Shortcut {
    Shortcut::new(vec![Key::Control, Key::Shift, Key::Char('s')])
}

fn default_confirm_shortcut() -> Shortcut {
    Shortcut::new(vec![Key::Alt, Key::Char('s')])
}

fn default_dialog_delay_ms() -> u64 {
    500
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    /// Delay between typed characters
    #[serde(default = "default_typing_interval_ms")]
    pub typing_interval_ms: u64,
    /// Abort input when the cursor is parked in a screen corner
    #[serde(default = "default_failsafe")]
    pub failsafe: bool,
    #[serde(default = "default_save_as_shortcut")]
    pub save_as_shortcut: Shortcut,
    /// Sent once the destination folder has been entered
    #[serde(default = "default_confirm_shortcut")]
    pub confirm_shortcut: Shortcut,
    /// Time the save dialog gets to appear or react
    #[serde(default = "default_dialog_delay_ms")]
    pub dialog_delay_ms: u64,
}

impl InputConfig {
    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.typing_interval_ms)
    }

    pub fn dialog_delay(&self) -> Duration {
        Duration::from_millis(self.dialog_delay_ms)
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            typing_interval_ms: default_typing_interval_ms(),
            failsafe: default_failsafe(),
            save_as_shortcut: default_save_as_shortcut(),
            confirm_shortcut: default_confirm_shortcut(),
            dialog_delay_ms: default_dialog_delay_ms(),
        }
    }
}
