use image::DynamicImage;
use quill_types::ScreenBox;

use crate::capture::ScreenSource;
use crate::error::VisionError;
use crate::ncc;
use crate::template::TemplateStore;

/// A located template and how closely it matched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub bbox: ScreenBox,
    pub score: f32,
}

/// Looks up reference images on a screen source
pub struct TemplateMatcher<S> {
    store: TemplateStore,
    screen: S,
}

impl<S: ScreenSource> TemplateMatcher<S> {
    pub fn new(store: TemplateStore, screen: S) -> Self {
        Self { store, screen }
    }

    /// Locate `label` with a similarity of at least `confidence`
    pub fn locate(&self, label: &str, confidence: f32) -> Result<Option<Match>, VisionError> {
        let template = self.store.load(label)?;
        tracing::debug!("Looking for image: {}", template.path.display());

        let capture = self.screen.capture()?;
        let haystack = DynamicImage::ImageRgba8(capture.image).to_luma8();
        let needle = template.image.to_luma8();

        match ncc::find_best(&haystack, &needle, confidence) {
            Some(hit) => {
                let bbox = ScreenBox::new(
                    capture.origin.0 + hit.x as i32,
                    capture.origin.1 + hit.y as i32,
                    needle.width(),
                    needle.height(),
                );
                tracing::debug!("Found `{label}` at {bbox} (score {:.3})", hit.score);
                Ok(Some(Match {
                    bbox,
                    score: hit.score,
                }))
            }
            None => {
                tracing::debug!("Image not found on screen: `{label}`");
                Ok(None)
            }
        }
    }

    pub fn find(&self, label: &str, confidence: f32) -> Result<Option<ScreenBox>, VisionError> {
        Ok(self.locate(label, confidence)?.map(|m| m.bbox))
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage, imageops};

    use super::*;
    use crate::capture::StillScreen;

    fn desktop() -> RgbaImage {
        RgbaImage::from_fn(200, 120, |x, y| {
            let (bx, by) = (x / 6, y / 6);
            let v = ((bx * 37 + by * 91) ^ (bx * by)).wrapping_mul(53) as u8;
            Rgba([v, v.wrapping_add(40), 255 - v, 255])
        })
    }

    fn matcher_with(label: &str, x: u32, y: u32) -> (tempfile::TempDir, TemplateMatcher<StillScreen>) {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(dir.path(), "png");
        let screen = desktop();
        imageops::crop_imm(&screen, x, y, 30, 14)
            .to_image()
            .save(store.path_for(label))
            .unwrap();

        let matcher = TemplateMatcher::new(store, StillScreen::new(screen).with_origin((1920, 0)));
        (dir, matcher)
    }

    #[test]
    fn found_box_is_positive_and_meets_confidence() {
        let (_dir, matcher) = matcher_with("path-bar", 70, 40);

        let found = matcher.locate("path-bar", 0.8).unwrap().unwrap();
        assert_eq!(found.bbox, ScreenBox::new(1920 + 70, 40, 30, 14));
        assert!(found.bbox.width > 0 && found.bbox.height > 0);
        assert!(found.score >= 0.8);
    }

    #[test]
    fn absent_label_reports_missing_template() {
        let (_dir, matcher) = matcher_with("path-bar", 70, 40);
        assert!(matches!(
            matcher.find("warning-badge", 0.8),
            Err(VisionError::TemplateMissing { .. })
        ));
    }

    #[test]
    fn image_not_on_screen_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = TemplateStore::new(dir.path(), "png");
        RgbaImage::from_fn(30, 14, |x, _| {
            if x % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
        .save(store.path_for("error-badge"))
        .unwrap();

        let matcher = TemplateMatcher::new(store, StillScreen::new(desktop()));
        assert_eq!(matcher.find("error-badge", 0.8).unwrap(), None);
    }
}
