//! Visual metadata extraction engine.
//!
//! Turns raw image bytes (PNG/JPEG/WebP or SVG markup) into a
//! [`VisualMetadataRecord`]: dominant colors, visual center of mass,
//! transparent padding, transparency presence, fill usage and aspect
//! orientation. Every component is a pure function over immutable inputs;
//! the engine holds no state across calls.
//!
//! # Modules
//!
//! - [`mimetype`]: MIME resolution and pipeline dispatch
//! - [`palette`]: ranked dominant-color extraction
//! - [`mask`]: visibility mask, centroid, padding, transparency
//! - [`orientation`]: square/landscape/portrait classification
//! - [`raster`]: raster decoding
//! - [`extract`]: pipeline assembly
//!
//! # Architecture
//!
//! ```text
//! (bytes, declared mimetype)
//!         │
//!         ▼
//!    ┌──────────┐
//!    │ mimetype │ ──► SourceKind::{Raster, Vector}
//!    └────┬─────┘
//!         │
//!    ┌────┴─────────────────┐
//!    ▼                      ▼
//! raster::decode      svg::rasterize (preview + analysis canvas)
//!    │                      │
//!    ▼                      ▼
//! palette             palette, mask ──► centroid, padding
//!    │                      │           transparency, fill
//!    └──────────┬───────────┘
//!               ▼
//!       VisualMetadataRecord
//! ```

pub mod mimetype;

mod error;
mod extract;
mod mask;
mod options;
mod orientation;
mod palette;
mod raster;
mod record;

pub use error::MetaError;
pub use extract::{extract_metadata, extract_palette};
pub use options::ExtractOptions;
pub use orientation::Orientation;
pub use record::{Centroid, Padding, PaletteColor, SourceTag, VisualMetadataRecord};
