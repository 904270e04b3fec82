mod capture;
mod error;
mod finder;
mod ncc;
mod template;

pub use capture::{Capture, LiveScreen, ScreenSource, StillScreen};
pub use error::VisionError;
pub use finder::{Match, TemplateMatcher};
pub use ncc::find_best;
pub use template::{Template, TemplateStore};
