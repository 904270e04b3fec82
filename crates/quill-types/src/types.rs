use std::fmt;

use serde::{Deserialize, Serialize};

/// Rectangle on screen, in global pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenBox {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenBox {
    pub fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Center point, rounded down
    pub fn center(&self) -> (i32, i32) {
        (
            self.left + (self.width / 2) as i32,
            self.top + (self.height / 2) as i32,
        )
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left
            && y >= self.top
            && x < self.left + self.width as i32
            && y < self.top + self.height as i32
    }
}

impl fmt::Display for ScreenBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(left={}, top={}, width={}, height={})",
            self.left, self.top, self.width, self.height
        )
    }
}

/// A record from the remote posts API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
}

/// Operator answer to an unexpected dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogChoice {
    Retry,
    Ignore,
    Cancel,
}

impl DialogChoice {
    /// Button labels, in the order they are shown
    pub const LABELS: [&'static str; 3] = ["Retry", "Ignore", "Cancel"];

    pub fn label(&self) -> &'static str {
        match self {
            DialogChoice::Retry => "Retry",
            DialogChoice::Ignore => "Ignore",
            DialogChoice::Cancel => "Cancel",
        }
    }

    /// Map a button label back to a choice. Unknown labels count as Cancel.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "retry" => DialogChoice::Retry,
            "ignore" => DialogChoice::Ignore,
            _ => DialogChoice::Cancel,
        }
    }
}
