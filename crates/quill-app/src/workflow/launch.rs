use quill_desktop::{AppHandle, Controller, DesktopError};
use quill_types::DialogChoice;

use super::WorkflowError;

/// Launch the editor. When it fails to start, the operator decides whether
/// to try again, at most `max_retries` times.
pub fn open_editor<C>(
    ctrl: &mut C,
    program: &str,
    args: &[String],
    max_retries: u32,
) -> Result<AppHandle, WorkflowError>
where
    C: Controller + ?Sized,
{
    let mut retries = 0;
    loop {
        let err = match ctrl.open_app(program, args) {
            Ok(handle) => return Ok(handle),
            Err(e @ DesktopError::Launch { .. }) => e,
            Err(e) => return Err(e.into()),
        };

        tracing::warn!("{err}");
        let message = format!(
            "Failed to open `{program}`.\n\n{err}\n\nRetry launches it again, Cancel aborts the run."
        );
        match ctrl.wait_for_user(&message)? {
            DialogChoice::Retry if retries < max_retries => {
                retries += 1;
                tracing::info!("Relaunching `{program}` ({retries}/{max_retries})");
            }
            DialogChoice::Cancel => return Err(WorkflowError::Aborted),
            DialogChoice::Retry | DialogChoice::Ignore => return Err(err.into()),
        }
    }
}
