// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Khmer-tuned OCR preprocessing: grayscale, 3x3 median denoise, contrast and
// sharpness boost, hard binarization. Deterministic: identical input bytes give
// identical output bytes.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;
use tracing::{debug, instrument};

/// Contrast multiplier around the mean gray level.
pub const CONTRAST_FACTOR: f32 = 2.5;
/// Sharpness multiplier applied to the detail layer (original minus blur).
pub const SHARPNESS_FACTOR: f32 = 2.0;
/// Luminance strictly above this becomes white, everything else black.
pub const BINARY_THRESHOLD: u8 = 128;
/// Standard deviation of the blur that defines the detail layer.
const SHARPEN_SIGMA: f32 = 1.0;

/// Run the full preprocessing pipeline on a decoded page.
///
/// The result is always an 8-bit luma image of the same dimensions whose pixels
/// are exactly `0` or `255`.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn preprocess(image: &DynamicImage) -> DynamicImage {
    ImagePreprocessor::grayscale(image)
        .median3x3()
        .contrast(CONTRAST_FACTOR)
        .sharpen(SHARPNESS_FACTOR)
        .threshold(BINARY_THRESHOLD)
        .into_dynamic()
}

/// Grayscale working image for the preprocessing steps.
///
/// Each step consumes `self` and returns a new `ImagePreprocessor`, so steps
/// chain and no intermediate buffer is ever shared.
pub struct ImagePreprocessor {
    image: GrayImage,
}

impl ImagePreprocessor {
    // -- Construction ---------------------------------------------------------

    /// Convert to single-channel luminance using ITU-R 601-2 weights
    /// (`L = R*299/1000 + G*587/1000 + B*114/1000`). Alpha is dropped.
    pub fn grayscale(image: &DynamicImage) -> Self {
        let gray = match image {
            DynamicImage::ImageLuma8(luma) => luma.clone(),
            DynamicImage::ImageLumaA8(_) | DynamicImage::ImageLuma16(_) => image.to_luma8(),
            other => {
                let rgb = other.to_rgb8();
                GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
                    let image::Rgb([r, g, b]) = *rgb.get_pixel(x, y);
                    Luma([luma_601(r, g, b)])
                })
            }
        };
        debug!(width = gray.width(), height = gray.height(), "Converted to grayscale");
        Self { image: gray }
    }

    /// Wrap an existing grayscale buffer.
    pub fn from_gray(image: GrayImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }

    pub fn into_gray(self) -> GrayImage {
        self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        DynamicImage::ImageLuma8(self.image)
    }

    // -- Steps ------------------------------------------------------------------

    /// Replace each pixel by the median of its 3x3 neighbourhood.
    ///
    /// Neighbourhoods at the border are clipped to the image; with an even
    /// number of samples the upper median is taken.
    pub fn median3x3(self) -> Self {
        let (width, height) = self.image.dimensions();
        let mut output = GrayImage::new(width, height);

        for y in 0..height {
            for x in 0..width {
                let mut window = [0u8; 9];
                let mut count = 0;
                for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
                    for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                        window[count] = self.image.get_pixel(nx, ny).0[0];
                        count += 1;
                    }
                }
                let samples = &mut window[..count];
                samples.sort_unstable();
                output.put_pixel(x, y, Luma([samples[count / 2]]));
            }
        }

        Self { image: output }
    }

    /// Linear contrast enhancement around the rounded mean gray level:
    /// `out = mean + factor * (p - mean)`, clamped and truncated to `u8`.
    pub fn contrast(self, factor: f32) -> Self {
        let mean = mean_gray(&self.image);
        debug!(mean, factor, "Adjusting contrast");

        let (width, height) = self.image.dimensions();
        let contrasted = GrayImage::from_fn(width, height, |x, y| {
            let p = self.image.get_pixel(x, y).0[0] as f32;
            let val = mean + factor * (p - mean);
            Luma([val.clamp(0.0, 255.0) as u8])
        });

        Self { image: contrasted }
    }

    /// Amplify high-frequency detail: `out = blur + factor * (p - blur)`.
    pub fn sharpen(self, factor: f32) -> Self {
        let (width, height) = self.image.dimensions();
        // A single pixel has no neighbourhood; its blur is itself.
        if width * height <= 1 {
            return self;
        }

        let blurred = gaussian_blur_f32(&self.image, SHARPEN_SIGMA);
        let sharpened = GrayImage::from_fn(width, height, |x, y| {
            let p = self.image.get_pixel(x, y).0[0] as f32;
            let b = blurred.get_pixel(x, y).0[0] as f32;
            let val = b + factor * (p - b);
            Luma([val.clamp(0.0, 255.0) as u8])
        });

        Self { image: sharpened }
    }

    /// Fixed global threshold: `p > threshold` becomes 255, otherwise 0.
    pub fn threshold(self, threshold: u8) -> Self {
        let (width, height) = self.image.dimensions();
        let mut output = GrayImage::new(width, height);

        for y in 0..height {
            for x in 0..width {
                let val = self.image.get_pixel(x, y).0[0];
                let binary = if val > threshold { 255u8 } else { 0u8 };
                output.put_pixel(x, y, Luma([binary]));
            }
        }

        Self { image: output }
    }
}

/// Fixed-point ITU-R 601-2 luma with rounding.
fn luma_601(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16) as u8
}

/// Mean gray level rounded to the nearest integer (128 for an empty image).
fn mean_gray(gray: &GrayImage) -> f32 {
    let total = gray.width() as u64 * gray.height() as u64;
    if total == 0 {
        return 128.0;
    }
    let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
    (sum as f64 / total as f64 + 0.5).floor() as f32
}
