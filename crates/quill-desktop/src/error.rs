use quill_vision::VisionError;

#[derive(Debug, thiserror::Error)]
pub enum DesktopError {
    #[error("Input failed: {0}")]
    Input(String),

    #[error("Failed to open `{program}`: {reason}")]
    Launch { program: String, reason: String },

    #[error("Fail-safe triggered, cursor parked at ({x}, {y})")]
    FailSafe { x: i32, y: i32 },

    #[error(transparent)]
    Vision(#[from] VisionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
