use std::path::Path;
use std::time::Duration;

use quill_config::Config;
use quill_types::{DialogChoice, Key, ScreenBox};
use quill_vision::{StillScreen, TemplateMatcher, TemplateStore};

use crate::controller::Controller;
use crate::error::DesktopError;
use crate::process::{AppHandle, CleanupReport};

/// Backend that touches nothing.
///
/// Every action is logged and recorded. Templates are matched against a
/// saved screenshot when one is configured, operator prompts get a fixed
/// answer and sleeps are skipped.
pub struct DryRunController {
    matcher: Option<TemplateMatcher<StillScreen>>,
    answer: DialogChoice,
    next_id: u64,
    open: Vec<u64>,
    actions: Vec<String>,
}

impl DryRunController {
    pub fn new(config: &Config) -> Result<Self, DesktopError> {
        let matcher = match &config.dry_run.screenshot {
            Some(path) => {
                let store = TemplateStore::new(
                    config.matcher.resources_path(),
                    config.matcher.extension.clone(),
                );
                Some(TemplateMatcher::new(store, StillScreen::open(Path::new(path))?))
            }
            None => None,
        };

        Ok(Self::with_matcher(matcher, config.dry_run.answer))
    }

    pub fn with_matcher(matcher: Option<TemplateMatcher<StillScreen>>, answer: DialogChoice) -> Self {
        Self {
            matcher,
            answer,
            next_id: 1,
            open: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Everything that would have been done, in order
    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    fn record(&mut self, action: String) {
        tracing::info!("[dry-run] {action}");
        self.actions.push(action);
    }
}

impl Controller for DryRunController {
    fn open_app(&mut self, program: &str, args: &[String]) -> Result<AppHandle, DesktopError> {
        let id = self.next_id;
        self.next_id += 1;
        self.open.push(id);
        self.record(format!("open {program} {}", args.join(" ")).trim_end().to_string());
        Ok(AppHandle::detached(id, program))
    }

    fn close_app(&mut self, handle: AppHandle) -> Result<(), DesktopError> {
        self.open.retain(|&id| id != handle.id());
        self.record(format!("close {}", handle.program()));
        Ok(())
    }

    fn find(&mut self, label: &str, confidence: f32) -> Result<Option<ScreenBox>, DesktopError> {
        let found = match &self.matcher {
            Some(matcher) => matcher.find(label, confidence)?,
            None => None,
        };
        match found {
            Some(bbox) => self.record(format!("find {label} -> {bbox}")),
            None => self.record(format!("find {label} -> not found")),
        }
        Ok(found)
    }

    fn click_at(&mut self, x: i32, y: i32) -> Result<(), DesktopError> {
        self.record(format!("click {x},{y}"));
        Ok(())
    }

    fn kb_type(&mut self, text: &str, _interval: Duration) -> Result<(), DesktopError> {
        self.record(format!("type {text:?}"));
        Ok(())
    }

    fn press(&mut self, key: Key) -> Result<(), DesktopError> {
        self.record(format!("press {key}"));
        Ok(())
    }

    fn hold(&mut self, key: Key) -> Result<(), DesktopError> {
        self.record(format!("hold {key}"));
        Ok(())
    }

    fn release(&mut self, key: Key) -> Result<(), DesktopError> {
        self.record(format!("release {key}"));
        Ok(())
    }

    fn sleep(&mut self, duration: Duration) {
        tracing::debug!("[dry-run] skip sleep {duration:?}");
    }

    fn wait_for_user(&mut self, message: &str) -> Result<DialogChoice, DesktopError> {
        self.record(format!("prompt {message:?} -> {}", self.answer.label()));
        Ok(self.answer)
    }

    fn cleanup(&mut self) -> CleanupReport {
        let open = std::mem::take(&mut self.open);
        if !open.is_empty() {
            self.record(format!("cleanup {} application(s)", open.len()));
        }
        CleanupReport {
            terminated: open.len(),
            ..Default::default()
        }
    }
}
