use std::path::Path;

use image::RgbaImage;
use xcap::Monitor;

use crate::error::VisionError;

/// A screenshot and the global position of its top-left pixel
pub struct Capture {
    pub image: RgbaImage,
    pub origin: (i32, i32),
}

/// Something that can produce the current screen contents
pub trait ScreenSource {
    fn capture(&self) -> Result<Capture, VisionError>;
}

/// The primary monitor, captured on every call
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveScreen;

impl ScreenSource for LiveScreen {
    fn capture(&self) -> Result<Capture, VisionError> {
        let monitors = Monitor::all()
            .map_err(|e| VisionError::Capture(format!("Failed to get monitors: {e}")))?;
        let monitor = monitors
            .first()
            .ok_or_else(|| VisionError::Capture("No monitor found".to_string()))?;

        let captured = monitor
            .capture_image()
            .map_err(|e| VisionError::Capture(format!("Failed to capture screen: {e}")))?;

        // rebuild through our own `image` so the buffer type does not depend
        // on the version xcap links against
        let (width, height) = (captured.width(), captured.height());
        let image = RgbaImage::from_raw(width, height, captured.into_raw())
            .ok_or_else(|| VisionError::Capture("Screen buffer has wrong size".to_string()))?;

        Ok(Capture {
            image,
            origin: (monitor.x(), monitor.y()),
        })
    }
}

/// A fixed image standing in for the screen
#[derive(Clone)]
pub struct StillScreen {
    image: RgbaImage,
    origin: (i32, i32),
}

impl StillScreen {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            origin: (0, 0),
        }
    }

    pub fn open(path: &Path) -> Result<Self, VisionError> {
        let image = image::open(path).map_err(|source| VisionError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(image.to_rgba8()))
    }

    /// Pretend the image sits at `origin` on a larger desktop
    pub fn with_origin(mut self, origin: (i32, i32)) -> Self {
        self.origin = origin;
        self
    }
}

impl ScreenSource for StillScreen {
    fn capture(&self) -> Result<Capture, VisionError> {
        Ok(Capture {
            image: self.image.clone(),
            origin: self.origin,
        })
    }
}
