use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageError, ImageFormat, ImageReader};

use crate::error::VisionError;

/// A decoded reference image
pub struct Template {
    pub label: String,
    pub path: PathBuf,
    pub image: DynamicImage,
    /// The file had to be rewritten before it could be decoded
    pub repaired: bool,
}

/// Reference images stored as `<root>/<label>.<extension>`
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
    extension: String,
}

impl TemplateStore {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn path_for(&self, label: &str) -> PathBuf {
        self.root.join(format!("{label}.{}", self.extension))
    }

    /// Load the image for `label`.
    ///
    /// A file that does not decode in its stored format is repaired once and
    /// read again. If the second read also fails the error is returned as is.
    pub fn load(&self, label: &str) -> Result<Template, VisionError> {
        let path = self.path_for(label);
        if !path.is_file() {
            return Err(VisionError::TemplateMissing {
                label: label.to_string(),
                path,
            });
        }

        let (image, repaired) = match read_stored(&path) {
            Ok(image) => (image, false),
            Err(err) => {
                tracing::warn!(
                    "Cannot read reference image {} ({err}), attempting repair",
                    path.display()
                );
                repair(&path)?;
                let image = read_stored(&path).map_err(|source| VisionError::Decode {
                    path: path.clone(),
                    source,
                })?;
                (image, true)
            }
        };

        Ok(Template {
            label: label.to_string(),
            path,
            image,
            repaired,
        })
    }
}

/// Decode using the format implied by the file extension only
fn read_stored(path: &Path) -> Result<DynamicImage, ImageError> {
    ImageReader::open(path)
        .map_err(ImageError::IoError)?
        .decode()
}

/// Decode by content sniffing and rewrite as 8-bit RGB in the format the
/// extension asks for (JPEG when the extension is unknown).
fn repair(path: &Path) -> Result<(), VisionError> {
    let decoded = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|source| VisionError::RepairFailed {
            path: path.to_path_buf(),
            source,
        })?;

    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Jpeg);
    decoded
        .to_rgb8()
        .save_with_format(path, format)
        .map_err(|source| VisionError::RepairFailed {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!("Repaired reference image {}", path.display());
    Ok(())
}
