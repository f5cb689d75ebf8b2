//! Pipeline assembly.
//!
//! Resolves the source family from the bytes, runs the matching pipeline
//! and assembles the record. The vector pipeline rasterizes twice: a large
//! preview canvas for color work and a smaller analysis canvas for the
//! geometry passes.

use image::DynamicImage;

use crate::meta::mask::{self, VisibilityMask};
use crate::meta::mimetype::{self, SourceKind};
use crate::meta::options::ExtractOptions;
use crate::meta::orientation;
use crate::meta::palette;
use crate::meta::raster;
use crate::meta::{MetaError, PaletteColor, SourceTag, VisualMetadataRecord};
use crate::svg::{self, FillUsage, VectorDocument};

/// Dominant color stand-in when nothing is visible at all.
const FALLBACK_COLOR: PaletteColor = PaletteColor([0, 0, 0]);

/// Extract the full metadata record for one image.
///
/// `declared` is trusted over content sniffing when present and non-empty;
/// pass `None` to let the bytes speak for themselves.
pub fn extract_metadata(
    bytes: &[u8],
    declared: Option<&str>,
    options: &ExtractOptions,
) -> Result<VisualMetadataRecord, MetaError> {
    let (mimetype, kind) = mimetype::resolve(bytes, declared)?;
    match kind {
        SourceKind::Vector => extract_vector(bytes, mimetype, options),
        SourceKind::Raster => extract_raster(bytes, mimetype, options),
    }
}

/// Extract only the ranked palette for one image.
pub fn extract_palette(
    bytes: &[u8],
    declared: Option<&str>,
    options: &ExtractOptions,
) -> Result<Vec<PaletteColor>, MetaError> {
    let (_, kind) = mimetype::resolve(bytes, declared)?;
    match kind {
        SourceKind::Vector => {
            VectorDocument::parse(bytes)?;
            let preview = svg::rasterize(bytes, options.preview_size)?;
            Ok(palette::extract(&preview, options.palette_size))
        }
        SourceKind::Raster => {
            let decoded = raster::decode(bytes)?;
            Ok(palette::extract(&decoded.to_rgba8(), options.palette_size))
        }
    }
}

fn extract_vector(
    bytes: &[u8],
    mimetype: String,
    options: &ExtractOptions,
) -> Result<VisualMetadataRecord, MetaError> {
    // Well-formedness gate first: the renderer is more forgiving than the
    // scanner and would happily paint half a document.
    let document = VectorDocument::parse(bytes)?;

    let preview = svg::rasterize(bytes, options.preview_size)?;
    let colors = palette::extract(&preview, options.palette_size);
    let color = colors.first().copied().unwrap_or(FALLBACK_COLOR);

    let analysis = svg::rasterize(bytes, options.analysis_size)?;
    let analysis = DynamicImage::ImageRgba8(analysis).to_luma_alpha8();

    let visibility = VisibilityMask::build(&analysis, options.ink_threshold, true);
    let centroid = visibility.centroid(options.snap_grid);
    let padding = visibility.padding();
    let transparency = mask::detect_transparency(&analysis, options.alpha_threshold);

    // Fill classification abstains on a single plain color; the dominant
    // palette color steps in so the field is always populated for vectors.
    let fill = svg::classify_fills(&document.fills)
        .map(FillUsage::as_str)
        .map_or_else(|| color.to_hex(), str::to_string);

    Ok(VisualMetadataRecord {
        mimetype,
        fill: Some(fill),
        color,
        colors,
        width: document.width,
        height: document.height,
        orientation: orientation::classify(document.width, document.height),
        bytes: bytes.len() as u64,
        transparency,
        centroid: Some(centroid),
        padding: Some(padding),
        kind: Some(SourceTag::Svg),
    })
}

fn extract_raster(
    bytes: &[u8],
    mimetype: String,
    options: &ExtractOptions,
) -> Result<VisualMetadataRecord, MetaError> {
    let decoded = raster::decode(bytes)?;
    let (width, height) = (decoded.width(), decoded.height());

    let colors = palette::extract(&decoded.to_rgba8(), options.palette_size);
    let color = colors.first().copied().unwrap_or(FALLBACK_COLOR);

    // Only formats that actually store alpha can be transparent; a
    // synthesized channel would read fully opaque anyway.
    let transparency = raster::has_native_alpha(&decoded)
        && mask::detect_transparency(&decoded.to_luma_alpha8(), options.alpha_threshold);

    Ok(VisualMetadataRecord {
        mimetype,
        fill: None,
        color,
        colors,
        width: f64::from(width),
        height: f64::from(height),
        orientation: orientation::classify(f64::from(width), f64::from(height)),
        bytes: bytes.len() as u64,
        transparency,
        centroid: None,
        padding: None,
        kind: None,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::Orientation;
    use crate::meta::{Centroid, Padding};
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    const RED_SQUARE_SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><rect width="100" height="100" fill="#ff0000"/></svg>"##;
    const BLANK_SVG: &[u8] = br#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"/>"#;

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn opaque_raster_record() {
        let img = RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255]));
        let bytes = png_bytes(&img);
        let record = extract_metadata(&bytes, None, &ExtractOptions::default()).unwrap();

        assert_eq!(record.mimetype, "image/png");
        assert_eq!(record.width, 100.0);
        assert_eq!(record.height, 100.0);
        assert_eq!(record.orientation, Orientation::Square);
        assert_eq!(record.bytes, bytes.len() as u64);
        assert!(!record.transparency);
        assert_eq!(record.color.to_hex(), "#ff0000");
        assert_eq!(record.colors[0], record.color);
        // Raster records carry none of the vector-only fields.
        assert_eq!(record.fill, None);
        assert_eq!(record.centroid, None);
        assert_eq!(record.padding, None);
        assert_eq!(record.kind, None);
    }

    #[test]
    fn raster_with_soft_alpha_is_transparent() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 128, 0, 255]));
        img.put_pixel(9, 9, Rgba([0, 128, 0, 200]));
        let record = extract_metadata(&png_bytes(&img), None, &ExtractOptions::default()).unwrap();
        assert!(record.transparency);
    }

    #[test]
    fn alpha_less_raster_is_never_transparent() {
        let img = RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        let record =
            extract_metadata(&buf.into_inner(), None, &ExtractOptions::default()).unwrap();
        assert!(!record.transparency);
        assert_eq!(record.color.to_hex(), "#0a141e");
    }

    #[test]
    fn raster_orientation_tracks_pixel_dimensions() {
        let img = RgbaImage::from_pixel(100, 96, Rgba([5, 5, 5, 255]));
        let record = extract_metadata(&png_bytes(&img), None, &ExtractOptions::default()).unwrap();
        assert_eq!(record.orientation, Orientation::Square);

        let img = RgbaImage::from_pixel(100, 90, Rgba([5, 5, 5, 255]));
        let record = extract_metadata(&png_bytes(&img), None, &ExtractOptions::default()).unwrap();
        assert_eq!(record.orientation, Orientation::Landscape);
    }

    #[test]
    fn full_cover_vector_record() {
        let record = extract_metadata(RED_SQUARE_SVG, None, &ExtractOptions::default()).unwrap();

        assert_eq!(record.mimetype, "image/svg+xml");
        assert_eq!(record.kind, Some(SourceTag::Svg));
        assert_eq!(record.width, 100.0);
        assert_eq!(record.height, 100.0);
        assert_eq!(record.orientation, Orientation::Square);
        assert_eq!(record.color.to_hex(), "#ff0000");
        // One plain fill: classification abstains and the dominant palette
        // color takes over.
        assert_eq!(record.fill.as_deref(), Some("#ff0000"));
        assert_eq!(record.centroid, Some(Centroid(48, 48)));
        assert_eq!(record.padding, Some(Padding(0, 0, 0, 0)));
        assert!(!record.transparency);
    }

    #[test]
    fn blank_vector_falls_back_everywhere() {
        let record = extract_metadata(BLANK_SVG, None, &ExtractOptions::default()).unwrap();

        assert!(record.transparency);
        assert!(record.colors.is_empty());
        assert_eq!(record.color.to_hex(), "#000000");
        // Geometry falls back to the canvas center, padding to full bleed.
        assert_eq!(record.centroid, Some(Centroid(48, 48)));
        assert_eq!(record.padding, Some(Padding(0, 0, 0, 0)));
        // No fills and an empty palette leave black as the fill of record.
        assert_eq!(record.fill.as_deref(), Some("#000000"));
    }

    #[test]
    fn quadrant_content_shifts_centroid_and_padding() {
        let markup = br##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><rect width="50" height="50" fill="#222222"/></svg>"##;
        let record = extract_metadata(markup, None, &ExtractOptions::default()).unwrap();

        assert_eq!(record.centroid, Some(Centroid(24, 24)));
        assert_eq!(record.padding, Some(Padding(0, 50, 50, 0)));
        assert!(record.transparency);
    }

    #[test]
    fn current_color_fill_is_reported() {
        let markup = br#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><path d="M0 0h24v24H0z" fill="currentColor"/></svg>"#;
        let record = extract_metadata(markup, None, &ExtractOptions::default()).unwrap();
        assert_eq!(record.fill.as_deref(), Some("currentColor"));
    }

    #[test]
    fn distinct_fills_read_mixed() {
        let markup = br##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><rect width="12" height="24" fill="#ff0000"/><rect x="12" width="12" height="24" fill="#0000ff"/></svg>"##;
        let record = extract_metadata(markup, None, &ExtractOptions::default()).unwrap();
        assert_eq!(record.fill.as_deref(), Some("mixed"));
    }

    #[test]
    fn malformed_svg_is_a_parse_error() {
        let err =
            extract_metadata(b"<svg><rect></svg>", None, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, MetaError::Parse(_)));
    }

    #[test]
    fn truncated_svg_is_a_parse_error() {
        // Unclosed tags must fail the well-formedness gate, not leak
        // through to the renderer as a render failure.
        let err = extract_metadata(b"<svg><rect>", None, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, MetaError::Parse(_)));
    }

    #[test]
    fn unrecognizable_bytes_are_an_unknown_type() {
        let err = extract_metadata(b"hello there", None, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, MetaError::UnknownType));
    }

    #[test]
    fn non_image_mimetype_is_unsupported() {
        let err = extract_metadata(b"%PDF-1.4", Some("application/pdf"), &ExtractOptions::default())
            .unwrap_err();
        assert!(matches!(err, MetaError::UnsupportedType(m) if m == "application/pdf"));
    }

    #[test]
    fn palette_size_option_caps_colors() {
        let mut img = RgbaImage::new(8, 8);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            pixel.0 = match (x < 4, y < 4) {
                (true, true) => [250, 0, 0, 255],
                (false, true) => [0, 250, 0, 255],
                (true, false) => [0, 0, 250, 255],
                (false, false) => [250, 250, 250, 255],
            };
        }
        let options = ExtractOptions {
            palette_size: 2,
            ..Default::default()
        };
        let record = extract_metadata(&png_bytes(&img), None, &options).unwrap();
        assert_eq!(record.colors.len(), 2);
    }

    #[test]
    fn palette_helper_matches_record_colors() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([200, 40, 40, 255]));
        for x in 0..10 {
            img.put_pixel(x, 0, Rgba([20, 20, 180, 255]));
        }
        let bytes = png_bytes(&img);
        let options = ExtractOptions::default();

        let record = extract_metadata(&bytes, None, &options).unwrap();
        let colors = extract_palette(&bytes, None, &options).unwrap();
        assert_eq!(record.colors, colors);
    }

    #[test]
    fn extraction_is_deterministic() {
        let options = ExtractOptions::default();
        let first = extract_metadata(RED_SQUARE_SVG, None, &options).unwrap();
        let second = extract_metadata(RED_SQUARE_SVG, None, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn records_round_trip_through_json() {
        let record = extract_metadata(RED_SQUARE_SVG, None, &ExtractOptions::default()).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let back: VisualMetadataRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
