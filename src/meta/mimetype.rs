//! MIME type resolution and pipeline dispatch.
//!
//! Resolution prefers the caller's declared type, then falls back to
//! sniffing the content bytes: magic numbers for raster formats, a markup
//! check for SVG (which has no magic number).

use std::path::Path;

use crate::meta::MetaError;

/// MIME type constants for the supported image families.
pub mod types {
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const WEBP: &str = "image/webp";
    pub const SVG: &str = "image/svg+xml";
}

/// Pipeline dispatch over the two source families.
///
/// A closed enum so both pipelines are handled exhaustively at the
/// assembly site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Raster,
    Vector,
}

/// Guess MIME type from a file extension.
///
/// Returns `None` for extensions outside the supported set; the batch
/// driver uses this to filter walked directories.
pub fn from_path(path: &Path) -> Option<&'static str> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("svg") => Some(types::SVG),
        Some("png") => Some(types::PNG),
        Some("jpg" | "jpeg") => Some(types::JPEG),
        Some("webp") => Some(types::WEBP),
        _ => None,
    }
}

/// Check if the MIME type represents an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Sniff a MIME type from content bytes.
///
/// Only image types resolve. `infer` hits outside `image/*` fall through
/// to the SVG check: an SVG with an XML prolog sniffs as `text/xml` and
/// must still land in the vector pipeline.
pub fn sniff(bytes: &[u8]) -> Option<&'static str> {
    if let Some(kind) = infer::get(bytes) {
        let mime = kind.mime_type();
        if is_image(mime) {
            return Some(mime);
        }
    }
    if looks_like_svg(bytes) {
        return Some(types::SVG);
    }
    None
}

/// Resolve the MIME type and pipeline for one input.
///
/// An empty declared string counts as absent. Non-image resolutions are
/// `UnsupportedType`; unresolvable bytes are `UnknownType`.
pub fn resolve(bytes: &[u8], declared: Option<&str>) -> Result<(String, SourceKind), MetaError> {
    let mimetype = match declared {
        Some(m) if !m.is_empty() => m.to_string(),
        _ => sniff(bytes).ok_or(MetaError::UnknownType)?.to_string(),
    };

    if mimetype == types::SVG {
        Ok((mimetype, SourceKind::Vector))
    } else if is_image(&mimetype) {
        Ok((mimetype, SourceKind::Raster))
    } else {
        Err(MetaError::UnsupportedType(mimetype))
    }
}

/// Markup check for SVG: leading `<` after whitespace plus an `<svg` tag
/// somewhere in the document (doctype or comments may precede it).
fn looks_like_svg(bytes: &[u8]) -> bool {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with('<') && trimmed.contains("<svg")
}
