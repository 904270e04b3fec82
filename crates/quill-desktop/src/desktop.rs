use std::time::Duration;

use enigo::{Button, Coordinate, Direction, Enigo, Keyboard, Mouse, Settings};
use quill_config::Config;
use quill_types::{DialogChoice, Key, ScreenBox};
use quill_vision::{LiveScreen, TemplateMatcher, TemplateStore};

use crate::controller::Controller;
use crate::dialog;
use crate::error::DesktopError;
use crate::process::{AppHandle, CleanupReport, ProcessTracker};

const DIALOG_TITLE: &str = "Confirmation";

/// Drives the real desktop: enigo for input, xcap for the screen
pub struct DesktopController {
    enigo: Enigo,
    matcher: TemplateMatcher<LiveScreen>,
    processes: ProcessTracker,
    failsafe: bool,
}

impl DesktopController {
    pub fn new(config: &Config) -> Result<Self, DesktopError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| DesktopError::Input(format!("Failed to initialize input: {e}")))?;

        let store = TemplateStore::new(
            config.matcher.resources_path(),
            config.matcher.extension.clone(),
        );

        Ok(Self {
            enigo,
            matcher: TemplateMatcher::new(store, LiveScreen),
            processes: ProcessTracker::new(config.editor.startup_wait())
                .with_grace(config.editor.shutdown_grace()),
            failsafe: config.input.failsafe,
        })
    }

    /// Refuse to send input while the cursor sits in a screen corner
    fn check_failsafe(&self) -> Result<(), DesktopError> {
        if !self.failsafe {
            return Ok(());
        }
        let (x, y) = self.enigo.location().map_err(input_error)?;
        let (width, height) = self.enigo.main_display().map_err(input_error)?;
        if in_corner(x, y, width, height) {
            return Err(DesktopError::FailSafe { x, y });
        }
        Ok(())
    }

    fn key(&mut self, key: Key, direction: Direction) -> Result<(), DesktopError> {
        self.check_failsafe()?;
        self.enigo
            .key(to_enigo(key), direction)
            .map_err(input_error)
    }
}

impl Controller for DesktopController {
    fn open_app(&mut self, program: &str, args: &[String]) -> Result<AppHandle, DesktopError> {
        self.processes.launch(program, args)
    }

    fn close_app(&mut self, handle: AppHandle) -> Result<(), DesktopError> {
        self.processes.terminate(handle)
    }

    fn find(&mut self, label: &str, confidence: f32) -> Result<Option<ScreenBox>, DesktopError> {
        Ok(self.matcher.find(label, confidence)?)
    }

    fn click_at(&mut self, x: i32, y: i32) -> Result<(), DesktopError> {
        self.check_failsafe()?;
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(input_error)?;
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(input_error)
    }

    fn kb_type(&mut self, text: &str, interval: Duration) -> Result<(), DesktopError> {
        for c in text.chars() {
            self.check_failsafe()?;
            match c {
                '\n' => self.enigo.key(enigo::Key::Return, Direction::Click),
                '\t' => self.enigo.key(enigo::Key::Tab, Direction::Click),
                '\r' => Ok(()),
                _ => self.enigo.text(c.encode_utf8(&mut [0; 4])),
            }
            .map_err(input_error)?;

            if !interval.is_zero() {
                std::thread::sleep(interval);
            }
        }
        Ok(())
    }

    fn press(&mut self, key: Key) -> Result<(), DesktopError> {
        self.key(key, Direction::Click)
    }

    fn hold(&mut self, key: Key) -> Result<(), DesktopError> {
        self.key(key, Direction::Press)
    }

    fn release(&mut self, key: Key) -> Result<(), DesktopError> {
        // releasing must work even when the fail-safe trips mid-chord
        self.enigo
            .key(to_enigo(key), Direction::Release)
            .map_err(input_error)
    }

    fn wait_for_user(&mut self, message: &str) -> Result<DialogChoice, DesktopError> {
        Ok(dialog::confirm(DIALOG_TITLE, message))
    }

    fn cleanup(&mut self) -> CleanupReport {
        self.processes.cleanup()
    }
}

fn input_error(e: impl std::fmt::Display) -> DesktopError {
    DesktopError::Input(e.to_string())
}

fn to_enigo(key: Key) -> enigo::Key {
    match key {
        Key::Control => enigo::Key::Control,
        Key::Shift => enigo::Key::Shift,
        Key::Alt => enigo::Key::Alt,
        Key::Meta => enigo::Key::Meta,
        Key::Enter => enigo::Key::Return,
        Key::Escape => enigo::Key::Escape,
        Key::Space => enigo::Key::Space,
        Key::Backspace => enigo::Key::Backspace,
        Key::Tab => enigo::Key::Tab,
        Key::Char(c) => enigo::Key::Unicode(c),
    }
}

fn in_corner(x: i32, y: i32, width: i32, height: i32) -> bool {
    let at_x_edge = x <= 0 || x >= width - 1;
    let at_y_edge = y <= 0 || y >= height - 1;
    at_x_edge && at_y_edge
}
