//! Zero-mean normalized cross-correlation over grayscale images.
//!
//! imageproc computes the raw cross-correlation at every position; window
//! sums from summed-area tables turn it into a zero-mean score in `[-1, 1]`.
//! Every position is scored, so the best match is never pruned away.

use image::GrayImage;
use imageproc::template_matching::{MatchTemplateMethod, match_template_parallel};

/// Per-pixel variance below which a region counts as flat
const FLAT_VARIANCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub x: u32,
    pub y: u32,
    pub score: f32,
}

/// Best position of `needle` inside `haystack` scoring at least `threshold`
pub fn find_best(haystack: &GrayImage, needle: &GrayImage, threshold: f32) -> Option<Hit> {
    let (hw, hh) = haystack.dimensions();
    let (nw, nh) = needle.dimensions();
    if nw == 0 || nh == 0 || nw > hw || nh > hh {
        return None;
    }

    let cross = match_template_parallel(haystack, needle, MatchTemplateMethod::CrossCorrelation);
    let scorer = Scorer::new(haystack, needle);

    let mut best: Option<Hit> = None;
    for (x, y, value) in cross.enumerate_pixels() {
        let score = scorer.score_at(x, y, value[0] as f64);
        if best.is_none_or(|b| score > b.score) {
            best = Some(Hit { x, y, score });
        }
    }

    tracing::trace!(?best, "scored {} positions", cross.width() * cross.height());
    best.filter(|hit| hit.score >= threshold)
}

/// Summed-area table; entry (x, y) holds the sum over `[0, x) x [0, y)`
struct Integral {
    stride: usize,
    data: Vec<u64>,
}

impl Integral {
    fn build(image: &GrayImage, square: bool) -> Self {
        let (w, h) = (image.width() as usize, image.height() as usize);
        let stride = w + 1;
        let mut data = vec![0u64; stride * (h + 1)];
        let raw = image.as_raw();

        for y in 0..h {
            let mut row_sum = 0u64;
            for x in 0..w {
                let v = raw[y * w + x] as u64;
                row_sum += if square { v * v } else { v };
                data[(y + 1) * stride + x + 1] = data[y * stride + x + 1] + row_sum;
            }
        }

        Self { stride, data }
    }

    fn rect(&self, x: usize, y: usize, w: usize, h: usize) -> u64 {
        let s = self.stride;
        let a = self.data[y * s + x];
        let b = self.data[y * s + x + w];
        let c = self.data[(y + h) * s + x];
        let d = self.data[(y + h) * s + x + w];
        d + a - b - c
    }
}

/// Normalizes raw correlations for one needle
struct Scorer {
    sums: Integral,
    squares: Integral,
    width: usize,
    height: usize,
    mean: f64,
    /// Sum of squared deviations from `mean`
    energy: f64,
}

impl Scorer {
    fn new(haystack: &GrayImage, needle: &GrayImage) -> Self {
        let n = (needle.width() * needle.height()) as f64;
        let mean = needle.as_raw().iter().map(|&v| v as f64).sum::<f64>() / n;
        let energy = needle
            .as_raw()
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum();

        Self {
            sums: Integral::build(haystack, false),
            squares: Integral::build(haystack, true),
            width: needle.width() as usize,
            height: needle.height() as usize,
            mean,
            energy,
        }
    }

    /// Score the window at `(x, y)` given its raw cross-correlation
    fn score_at(&self, x: u32, y: u32, cross: f64) -> f32 {
        let (w, h) = (self.width, self.height);
        let n = (w * h) as f64;

        let sum = self.sums.rect(x as usize, y as usize, w, h) as f64;
        let squares = self.squares.rect(x as usize, y as usize, w, h) as f64;
        let window_energy = (squares - sum * sum / n).max(0.0);

        // correlation is undefined on flat regions, compare brightness instead
        if self.energy / n < FLAT_VARIANCE {
            if window_energy / n < FLAT_VARIANCE {
                return (1.0 - (sum / n - self.mean).abs() / 255.0) as f32;
            }
            return 0.0;
        }
        if window_energy / n < FLAT_VARIANCE {
            return 0.0;
        }

        // sum((I - mean_I)(T - mean_T)) == sum(I T) - mean_T sum(I)
        let centered = cross - self.mean * sum;
        (centered / (self.energy.sqrt() * window_energy.sqrt())).clamp(-1.0, 1.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use image::{Luma, imageops};

    use super::*;

    /// Per-pixel pseudo-random gray levels
    fn noise(width: u32, height: u32, seed: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let v = (x.wrapping_mul(73_856_093) ^ y.wrapping_mul(19_349_663) ^ seed)
                .wrapping_mul(2_654_435_761);
            Luma([(v >> 13) as u8])
        })
    }

    /// Rotate the pixels inside every 4x4 cell; cell averages stay the same
    fn shuffle_cells(image: &GrayImage) -> GrayImage {
        GrayImage::from_fn(image.width(), image.height(), |x, y| {
            let (cx, cy) = (x - x % 4, y - y % 4);
            let (i, j) = (x % 4, y % 4);
            *image.get_pixel(cx + (3 - j), cy + i)
        })
    }

    #[test]
    fn finds_small_template() {
        let screen = noise(64, 48, 1);
        let needle = imageops::crop_imm(&screen, 20, 11, 5, 4).to_image();

        let hit = find_best(&screen, &needle, 0.95).unwrap();
        assert_eq!((hit.x, hit.y), (20, 11));
        assert!(hit.score > 0.99);
    }

    #[test]
    fn finds_template_at_far_corner() {
        let screen = noise(200, 120, 2);
        let needle = imageops::crop_imm(&screen, 152, 88, 48, 32).to_image();

        let hit = find_best(&screen, &needle, 0.8).unwrap();
        assert_eq!((hit.x, hit.y), (152, 88));
    }

    #[test]
    fn true_match_wins_over_lookalike_decoys() {
        let mut screen = noise(360, 260, 3);
        let needle = noise(48, 32, 0xC0FFEE);
        let decoy = shuffle_cells(&needle);

        for row in 0..4 {
            for col in 0..4 {
                imageops::replace(&mut screen, &decoy, 8 + 64 * col, 8 + 48 * row);
            }
        }
        imageops::replace(&mut screen, &needle, 298, 202);

        let hit = find_best(&screen, &needle, 0.8).unwrap();
        assert_eq!((hit.x, hit.y), (298, 202));
        assert!(hit.score > 0.99);
    }

    #[test]
    fn unrelated_template_is_not_found() {
        let screen = noise(256, 160, 4);
        let needle = noise(48, 32, 0x5A5A_1234);

        assert_eq!(find_best(&screen, &needle, 0.8), None);
    }

    #[test]
    fn template_larger_than_screen_is_not_found() {
        let screen = noise(10, 10, 5);
        let needle = noise(11, 4, 6);
        assert_eq!(find_best(&screen, &needle, 0.1), None);
    }

    #[test]
    fn flat_template_matches_flat_region_of_same_brightness() {
        let mut screen = noise(40, 40, 7);
        for y in 10..20 {
            for x in 5..15 {
                screen.put_pixel(x, y, Luma([200]));
            }
        }
        let needle = GrayImage::from_pixel(4, 4, Luma([200]));

        let hit = find_best(&screen, &needle, 0.99).unwrap();
        assert!((5..=11).contains(&hit.x) && (10..=16).contains(&hit.y));
    }

    #[test]
    fn integral_rect_sums_match_direct_sums() {
        let image = noise(9, 7, 8);
        let table = Integral::build(&image, false);
        let direct: u64 = (2..6)
            .flat_map(|y| (3..8).map(move |x| (x, y)))
            .map(|(x, y)| image.get_pixel(x, y)[0] as u64)
            .sum();
        assert_eq!(table.rect(3, 2, 5, 4), direct);
    }
}
