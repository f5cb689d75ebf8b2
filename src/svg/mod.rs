//! SVG markup handling.
//!
//! Two independent views of the same markup. [`VectorDocument`] scans the
//! raw XML for declared dimensions and fill attributes without building a
//! render tree; [`rasterize`] hands the markup to `usvg`/`resvg` for an
//! actual bitmap. Fill classification sits on top of the scan.

mod document;
mod fill;
mod render;

pub use document::VectorDocument;
pub use fill::{FillUsage, classify_fills};
pub use render::rasterize;
