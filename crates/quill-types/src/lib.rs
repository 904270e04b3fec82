pub mod keys;
pub mod types;

pub use keys::{Key, KeyParseError, Shortcut};
pub use types::{DialogChoice, Post, ScreenBox};
