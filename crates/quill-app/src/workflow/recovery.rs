use std::time::Duration;

use quill_config::Config;
use quill_desktop::Controller;
use quill_types::{DialogChoice, Key};

use super::WorkflowError;

/// Prompt badges the run still watches for, in check order
#[derive(Debug, Clone, Default)]
pub struct BadgeRegistry {
    badges: Vec<(String, bool)>,
}

impl BadgeRegistry {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut badges: Vec<(String, bool)> = Vec::new();
        for label in labels {
            let label = label.into();
            if !badges.iter().any(|(known, _)| *known == label) {
                badges.push((label, true));
            }
        }
        Self { badges }
    }

    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.badges
            .iter()
            .filter(|(_, enabled)| *enabled)
            .map(|(label, _)| label.as_str())
    }

    pub fn is_enabled(&self, label: &str) -> bool {
        self.badges
            .iter()
            .any(|(known, enabled)| known == label && *enabled)
    }

    /// Stop watching `label`. Returns false if it was already off or unknown.
    pub fn disable(&mut self, label: &str) -> bool {
        match self.badges.iter_mut().find(|(known, _)| known == label) {
            Some((_, enabled)) if *enabled => {
                *enabled = false;
                true
            }
            _ => false,
        }
    }
}

/// How a save attempt finished
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub retries: u32,
    pub ignored: Option<String>,
}

/// Runs the save action and asks the operator what to do when an
/// unexpected prompt shows up afterwards
#[derive(Debug, Clone)]
pub struct PromptRecovery {
    registry: BadgeRegistry,
    max_retries: u32,
    dismiss_presses: u32,
    settle: Duration,
    confidence: f32,
}

impl PromptRecovery {
    pub fn from_config(config: &Config) -> Self {
        Self {
            registry: BadgeRegistry::new(config.recovery.badges.iter().cloned()),
            max_retries: config.recovery.max_retries,
            dismiss_presses: config.recovery.dismiss_presses,
            settle: config.recovery.settle(),
            confidence: config.matcher.confidence,
        }
    }

    pub fn registry(&self) -> &BadgeRegistry {
        &self.registry
    }

    /// First enabled badge visible on screen.
    ///
    /// Matching errors are logged and count as "not visible".
    pub fn check_for_prompts<C>(&self, ctrl: &mut C) -> Option<String>
    where
        C: Controller + ?Sized,
    {
        for badge in self.registry.enabled() {
            match ctrl.find(badge, self.confidence) {
                Ok(Some(_)) => return Some(badge.to_string()),
                Ok(None) => {}
                Err(e) => tracing::warn!("Could not look for `{badge}`: {e}"),
            }
        }
        None
    }

    pub fn save<C, F>(&mut self, ctrl: &mut C, mut save_action: F) -> Result<SaveReport, WorkflowError>
    where
        C: Controller + ?Sized,
        F: FnMut(&mut C) -> Result<(), WorkflowError>,
    {
        let mut retries = 0;
        loop {
            save_action(&mut *ctrl)?;
            ctrl.sleep(self.settle);

            let Some(badge) = self.check_for_prompts(ctrl) else {
                return Ok(SaveReport {
                    retries,
                    ignored: None,
                });
            };

            tracing::warn!("Unexpected prompt found: {badge}");
            match ctrl.wait_for_user(&prompt_message(&badge))? {
                DialogChoice::Retry => {
                    if retries >= self.max_retries {
                        return Err(WorkflowError::RetriesExhausted { badge, retries });
                    }
                    retries += 1;
                    for _ in 0..self.dismiss_presses {
                        ctrl.press(Key::Escape)?;
                    }
                    tracing::info!("Retrying save ({retries}/{})", self.max_retries);
                }
                DialogChoice::Ignore => {
                    tracing::info!("Ignoring `{badge}` for the rest of the run");
                    self.registry.disable(&badge);
                    return Ok(SaveReport {
                        retries,
                        ignored: Some(badge),
                    });
                }
                DialogChoice::Cancel => return Err(WorkflowError::Aborted),
            }
        }
    }
}

fn prompt_message(badge: &str) -> String {
    format!(
        "An unexpected prompt was found.\n\n{badge}\n\n\
         Retry dismisses it and saves again, Ignore stops checking for it, \
         Cancel aborts the run."
    )
}
