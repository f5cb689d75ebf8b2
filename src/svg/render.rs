//! SVG rasterization through `usvg`/`resvg`.

use image::RgbaImage;
use tiny_skia::{Pixmap, Transform};

use crate::meta::MetaError;

/// Render SVG markup onto a square transparent canvas of `size` pixels.
///
/// The drawing is scaled to fit and centered, so undersized or
/// non-square content leaves transparent letterbox bands. Those bands are
/// part of the contract: centroid and padding measure them.
pub fn rasterize(markup: &[u8], size: u32) -> Result<RgbaImage, MetaError> {
    let tree = usvg::Tree::from_data(markup, &usvg::Options::default())
        .map_err(|e| MetaError::Render(e.to_string()))?;

    let mut pixmap = Pixmap::new(size, size)
        .ok_or_else(|| MetaError::Render(format!("cannot allocate {size}x{size} canvas")))?;

    let content = tree.size();
    let transform = fit_transform(content.width(), content.height(), size as f32);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied pixels; the analysis passes expect
    // straight alpha.
    let mut canvas = RgbaImage::new(size, size);
    for (dst, src) in canvas.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        dst.0 = [color.red(), color.green(), color.blue(), color.alpha()];
    }

    Ok(canvas)
}

/// Scale-to-fit transform, centered on the canvas.
fn fit_transform(width: f32, height: f32, size: f32) -> Transform {
    let scale = (size / width).min(size / height);
    let tx = (size - width * scale) / 2.0;
    let ty = (size - height * scale) / 2.0;
    Transform::from_scale(scale, scale).post_translate(tx, ty)
}

// ============================================================================
// Tests
// ============================================================================
