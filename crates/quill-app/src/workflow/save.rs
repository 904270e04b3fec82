use std::fs;

use quill_desktop::Controller;
use quill_types::Key;

use super::{SaveSettings, WorkflowError};

/// Drive the editor's "save as" dialog to store the open document as
/// `filename` inside the configured folder
pub fn save_as<C>(ctrl: &mut C, settings: &SaveSettings, filename: &str) -> Result<(), WorkflowError>
where
    C: Controller + ?Sized,
{
    let folder = &settings.folder;
    if !folder.exists() {
        tracing::info!("Directory {} does not exist. Creating it.", folder.display());
        fs::create_dir_all(folder).map_err(|source| WorkflowError::Io {
            path: folder.clone(),
            source,
        })?;
    }

    tracing::info!("Saving file {filename}");
    ctrl.type_keys(settings.save_as.keys())?;
    ctrl.sleep(settings.dialog_delay);
    ctrl.kb_type(filename, settings.typing_interval)?;
    // clears the extension the dialog suggests
    ctrl.press(Key::Space)?;
    ctrl.press(Key::Backspace)?;

    let label = &settings.path_bar_label;
    let Some(path_bar) = ctrl.find(label, settings.confidence)? else {
        return Err(WorkflowError::MissingControl(label.clone()));
    };

    let (x, y) = path_bar.center();
    ctrl.click_at(x, y)?;
    ctrl.kb_type(&folder.to_string_lossy(), settings.typing_interval)?;
    ctrl.press(Key::Enter)?;
    ctrl.sleep(settings.dialog_delay);
    ctrl.type_keys(settings.confirm.keys())?;

    Ok(())
}
