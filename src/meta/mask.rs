//! Visibility mask and the descriptors derived from it.
//!
//! The mask is a boolean grid over a luminance+alpha view of a bitmap:
//! `true` means "ink". Centroid and padding read the mask; transparency
//! reads the alpha channel directly with its own, looser threshold.

use image::GrayAlphaImage;

use crate::meta::{Centroid, Padding};

/// Binary visibility grid over a bitmap's pixels.
///
/// Derived per computation and discarded; never persisted.
pub struct VisibilityMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl VisibilityMask {
    /// Classify every pixel of `image` against `threshold`.
    ///
    /// With `use_alpha` set, a pixel is ink when its alpha is strictly
    /// greater than the threshold; otherwise its luminance decides. Callers
    /// whose source never had a real alpha channel should pass `use_alpha:
    /// false` so fully-opaque conversions fall back to luminance.
    pub fn build(image: &GrayAlphaImage, threshold: u8, use_alpha: bool) -> Self {
        let (width, height) = image.dimensions();
        let mut bits = vec![false; width as usize * height as usize];

        for (bit, pixel) in bits.iter_mut().zip(image.pixels()) {
            let [luma, alpha] = pixel.0;
            let value = if use_alpha { alpha } else { luma };
            *bit = value > threshold;
        }

        Self {
            width,
            height,
            bits,
        }
    }

    #[inline]
    fn get(&self, x: u32, y: u32) -> bool {
        self.bits[y as usize * self.width as usize + x as usize]
    }

    /// Visual center of mass in percentage coordinates, snapped to `grid`.
    ///
    /// The mean pixel position of all ink converts to percent of canvas,
    /// then each coordinate snaps independently to the nearest grid
    /// multiple. An empty mask falls back to the geometric center before
    /// snapping. Snapped values are not clamped to 100.
    pub fn centroid(&self, grid: u32) -> Centroid {
        let mut count: u64 = 0;
        let mut sum_x: u64 = 0;
        let mut sum_y: u64 = 0;

        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    count += 1;
                    sum_x += u64::from(x);
                    sum_y += u64::from(y);
                }
            }
        }

        let (mean_x, mean_y) = if count == 0 {
            (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
        } else {
            (sum_x as f64 / count as f64, sum_y as f64 / count as f64)
        };

        let percent_x = mean_x / f64::from(self.width) * 100.0;
        let percent_y = mean_y / f64::from(self.height) * 100.0;

        Centroid(snap(percent_x, grid), snap(percent_y, grid))
    }

    /// Ink bounding box as `[top, right, bottom, left]` percentages.
    ///
    /// The far edges subtract one extra pixel; downstream consumers expect
    /// that exact arithmetic. An empty mask is full-bleed `[0, 0, 0, 0]`,
    /// not the centroid's center fallback.
    pub fn padding(&self) -> Padding {
        let mut min_x = u32::MAX;
        let mut max_x = 0;
        let mut min_y = u32::MAX;
        let mut max_y = 0;
        let mut any = false;

        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    any = true;
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
            }
        }

        if !any {
            return Padding(0, 0, 0, 0);
        }

        let width = f64::from(self.width);
        let height = f64::from(self.height);
        let top = (f64::from(min_y) / height * 100.0).round() as u32;
        let right = ((width - f64::from(max_x) - 1.0) / width * 100.0).round() as u32;
        let bottom = ((height - f64::from(max_y) - 1.0) / height * 100.0).round() as u32;
        let left = (f64::from(min_x) / width * 100.0).round() as u32;

        Padding(top, right, bottom, left)
    }
}

/// Snap a percentage to the nearest multiple of `grid`.
#[inline]
fn snap(value: f64, grid: u32) -> u32 {
    let grid = f64::from(grid);
    ((value / grid).round() * grid) as u32
}

/// Report whether any pixel's alpha is strictly below `threshold`.
///
/// Uses a much looser cutoff than the mask's ink threshold, so nearly-opaque
/// antialiased edges already count as transparency.
pub fn detect_transparency(image: &GrayAlphaImage, threshold: u8) -> bool {
    image.pixels().any(|pixel| pixel.0[1] < threshold)
}

// ============================================================================
// Tests
// ============================================================================
