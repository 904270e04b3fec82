use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("No reference image for `{label}` at {}", path.display())]
    TemplateMissing { label: String, path: PathBuf },

    #[error("Cannot decode reference image {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to repair reference image {}", path.display())]
    RepairFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Screen capture failed: {0}")]
    Capture(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
