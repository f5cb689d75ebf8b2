//! Engine error taxonomy.

use thiserror::Error;

/// Errors produced by the extraction engine
///
/// Every variant is per-item: a failed input never aborts a batch, and the
/// engine never returns a partial record alongside an error.
#[derive(Debug, Error)]
pub enum MetaError {
    /// The MIME type could not be resolved from the declared value or the
    /// content bytes.
    #[error("unable to determine image type")]
    UnknownType,

    /// The resolved type is not a supported image family.
    #[error("unsupported media type `{0}`")]
    UnsupportedType(String),

    /// Vector markup is not well-formed XML.
    #[error("SVG markup is not well-formed")]
    Parse(#[from] quick_xml::Error),

    /// Raster bytes could not be decoded as an image.
    #[error("failed to decode raster image")]
    Decode(#[from] image::ImageError),

    /// Vector-to-raster conversion failed.
    #[error("failed to render SVG: {0}")]
    Render(String),
}
