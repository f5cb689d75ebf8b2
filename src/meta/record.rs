//! The output record and its serialized shape.
//!
//! Field names and value shapes are a compatibility contract with the
//! downstream catalog merge step; they must not drift.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::meta::Orientation;

// ============================================================================
// PaletteColor
// ============================================================================

/// A palette color as an RGB triple.
///
/// Serializes as a lowercase `#rrggbb` hex string. Position in the ordered
/// palette carries the rank; `colors[0]` is the key color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteColor(pub [u8; 3]);

impl PaletteColor {
    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }

    /// Parse a `#rrggbb` string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        // from_str_radix tolerates a leading `+`, so every byte is checked.
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self([r, g, b]))
    }

    /// Packed numeric value (`r<<16 | g<<8 | b`), used for deterministic
    /// tie-breaks when two colors have equal pixel counts.
    pub fn numeric(self) -> u32 {
        (u32::from(self.0[0]) << 16) | (u32::from(self.0[1]) << 8) | u32::from(self.0[2])
    }
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            self.0[0], self.0[1], self.0[2]
        )
    }
}

impl Serialize for PaletteColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PaletteColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid hex color `{raw}`")))
    }
}

// ============================================================================
// Centroid and Padding
// ============================================================================

/// Snapped visual center of mass in percentage coordinates, `[x, y]`.
///
/// Values are whole multiples of the snap grid and may exceed 100 when the
/// grid does not evenly divide 100; they are never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Centroid(pub u32, pub u32);

/// Transparent margins as integer percentages, `[top, right, bottom, left]`.
///
/// Clockwise from top, not CSS box order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding(pub u32, pub u32, pub u32, pub u32);

// ============================================================================
// Source tag
// ============================================================================

/// Source family marker carried on vector records as `"type": "svg"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    Svg,
}

// ============================================================================
// VisualMetadataRecord
// ============================================================================

/// Metadata record for one visual asset.
///
/// Constructed once per input, immutable. Raster-sourced records omit
/// `fill`, `centroid`, `padding` and `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualMetadataRecord {
    /// Resolved MIME type of the input.
    pub mimetype: String,

    /// Fill usage for vector sources: `currentColor`, `mixed`, or the key
    /// palette color when classification yields nothing meaningful.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fill: Option<String>,

    /// Key color (`colors[0]`).
    pub color: PaletteColor,

    /// Ranked palette, most dominant first.
    pub colors: Vec<PaletteColor>,

    /// Declared width for vectors, actual pixel width for rasters.
    pub width: f64,

    /// Declared height for vectors, actual pixel height for rasters.
    pub height: f64,

    /// Aspect class of `width` x `height`.
    pub orientation: Orientation,

    /// Input length in bytes.
    pub bytes: u64,

    /// Whether any pixel's alpha falls below the opacity threshold.
    pub transparency: bool,

    /// Snapped visual center of mass. Vector only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub centroid: Option<Centroid>,

    /// Transparent margins. Vector only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub padding: Option<Padding>,

    /// Source family marker. Vector only.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub kind: Option<SourceTag>,
}

// ============================================================================
// Tests
// ============================================================================
