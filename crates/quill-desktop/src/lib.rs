mod controller;
mod desktop;
mod dialog;
mod dry_run;
mod error;
mod process;

pub use controller::Controller;
pub use desktop::DesktopController;
pub use dialog::confirm;
pub use dry_run::DryRunController;
pub use error::DesktopError;
pub use process::{AppHandle, ChildProcess, CleanupReport, ProcessTracker};

use quill_config::{Backend, Config};

/// Build the backend selected in `config`
pub fn controller_for(config: &Config) -> Result<Box<dyn Controller>, DesktopError> {
    tracing::info!("Initializing {} controller", config.backend);
    match config.backend {
        Backend::Desktop => Ok(Box::new(DesktopController::new(config)?)),
        Backend::DryRun => Ok(Box::new(DryRunController::new(config)?)),
    }
}
