use quill_types::DialogChoice;
use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

/// Show a blocking Retry / Ignore / Cancel dialog
pub fn confirm(title: &str, message: &str) -> DialogChoice {
    let [retry, ignore, cancel] = DialogChoice::LABELS.map(str::to_string);
    let result = MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(message)
        .set_buttons(MessageButtons::YesNoCancelCustom(retry, ignore, cancel))
        .show();

    let choice = choice_from(result);
    tracing::info!("Operator chose {}", choice.label());
    choice
}

/// Platforms report either the custom label or the slot it was put in
fn choice_from(result: MessageDialogResult) -> DialogChoice {
    match result {
        MessageDialogResult::Custom(label) => DialogChoice::from_label(&label),
        MessageDialogResult::Yes => DialogChoice::Retry,
        MessageDialogResult::No => DialogChoice::Ignore,
        _ => DialogChoice::Cancel,
    }
}
