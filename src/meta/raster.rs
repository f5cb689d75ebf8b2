//! Raster decoding.
//!
//! Thin wrapper over the `image` crate: guess the container from the
//! bytes, decode, and report whether the pixel format carries alpha.

use image::DynamicImage;

use crate::meta::error::MetaError;

/// Decode an in-memory raster image, guessing the format from its bytes.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, MetaError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Whether the decoded pixel format has an alpha channel at all.
///
/// Opaque formats (RGB JPEG, alpha-less PNG) skip the transparency scan:
/// a synthesized alpha channel would read fully opaque anyway.
#[inline]
pub fn has_native_alpha(image: &DynamicImage) -> bool {
    image.color().has_alpha()
}

// ============================================================================
// Tests
// ============================================================================
