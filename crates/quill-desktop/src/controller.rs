use std::time::Duration;

use quill_types::{DialogChoice, Key, ScreenBox};

use crate::error::DesktopError;
use crate::process::{AppHandle, CleanupReport};

/// Everything the workflows need from an automation backend
pub trait Controller {
    /// Launch an application and keep track of it for cleanup
    fn open_app(&mut self, program: &str, args: &[String]) -> Result<AppHandle, DesktopError>;

    fn close_app(&mut self, handle: AppHandle) -> Result<(), DesktopError>;

    /// Locate the reference image for `label` on screen
    fn find(&mut self, label: &str, confidence: f32) -> Result<Option<ScreenBox>, DesktopError>;

    fn click_at(&mut self, x: i32, y: i32) -> Result<(), DesktopError>;

    /// Type `text`, pausing `interval` after each character
    fn kb_type(&mut self, text: &str, interval: Duration) -> Result<(), DesktopError>;

    fn press(&mut self, key: Key) -> Result<(), DesktopError>;

    fn hold(&mut self, key: Key) -> Result<(), DesktopError>;

    fn release(&mut self, key: Key) -> Result<(), DesktopError>;

    /// Press a chord: keys go down in order and come up in reverse
    fn type_keys(&mut self, keys: &[Key]) -> Result<(), DesktopError> {
        let mut held = Vec::with_capacity(keys.len());
        let mut result = Ok(());
        for &key in keys {
            if let Err(e) = self.hold(key) {
                result = Err(e);
                break;
            }
            held.push(key);
        }

        // release whatever went down, even after a failure
        for &key in held.iter().rev() {
            let released = self.release(key);
            if result.is_ok() {
                result = released;
            }
        }
        result
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    /// Block until the operator picks Retry, Ignore or Cancel
    fn wait_for_user(&mut self, message: &str) -> Result<DialogChoice, DesktopError>;

    /// Terminate every application still running. Never fails.
    fn cleanup(&mut self) -> CleanupReport;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records key transitions, failing on a chosen key
    #[derive(Default)]
    struct KeyLog {
        events: Vec<String>,
        fail_on: Option<Key>,
    }

    impl Controller for KeyLog {
        fn open_app(&mut self, program: &str, _: &[String]) -> Result<AppHandle, DesktopError> {
            Ok(AppHandle::detached(0, program))
        }
        fn close_app(&mut self, _: AppHandle) -> Result<(), DesktopError> {
            Ok(())
        }
        fn find(&mut self, _: &str, _: f32) -> Result<Option<ScreenBox>, DesktopError> {
            Ok(None)
        }
        fn click_at(&mut self, _: i32, _: i32) -> Result<(), DesktopError> {
            Ok(())
        }
        fn kb_type(&mut self, _: &str, _: Duration) -> Result<(), DesktopError> {
            Ok(())
        }
        fn press(&mut self, key: Key) -> Result<(), DesktopError> {
            self.events.push(format!("press {key}"));
            Ok(())
        }
        fn hold(&mut self, key: Key) -> Result<(), DesktopError> {
            if self.fail_on == Some(key) {
                return Err(DesktopError::Input(format!("cannot hold {key}")));
            }
            self.events.push(format!("down {key}"));
            Ok(())
        }
        fn release(&mut self, key: Key) -> Result<(), DesktopError> {
            self.events.push(format!("up {key}"));
            Ok(())
        }
        fn wait_for_user(&mut self, _: &str) -> Result<DialogChoice, DesktopError> {
            Ok(DialogChoice::Cancel)
        }
        fn cleanup(&mut self) -> CleanupReport {
            CleanupReport::default()
        }
    }

    #[test]
    fn chord_releases_in_reverse_order() {
        let mut log = KeyLog::default();
        log.type_keys(&[Key::Control, Key::Shift, Key::Char('s')])
            .unwrap();
        assert_eq!(
            log.events,
            ["down ctrl", "down shift", "down s", "up s", "up shift", "up ctrl"]
        );
    }

    #[test]
    fn failed_chord_still_releases_held_keys() {
        let mut log = KeyLog {
            fail_on: Some(Key::Char('s')),
            ..Default::default()
        };
        assert!(log.type_keys(&[Key::Alt, Key::Char('s')]).is_err());
        assert_eq!(log.events, ["down alt", "up alt"]);
    }
}
