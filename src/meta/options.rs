//! Engine tuning options.

/// Options for a metadata extraction run
///
/// Shared read-only between concurrent extractions; all engine functions
/// take these by reference and never mutate them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Number of palette colors to extract (k).
    pub palette_size: usize,

    /// Visibility mask cutoff on a 0-255 scale. A pixel counts as ink when
    /// its alpha (or luminance) is strictly greater than this.
    pub ink_threshold: u8,

    /// Transparency detection cutoff on a 0-255 scale. Any pixel with alpha
    /// strictly below this marks the whole image transparent. Independent
    /// from `ink_threshold`.
    pub alpha_threshold: u8,

    /// Quantization step for centroid percentage coordinates.
    pub snap_grid: u32,

    /// Square canvas edge used when rasterizing vectors for mask analysis.
    pub analysis_size: u32,

    /// Square canvas edge used when rasterizing vectors for palette
    /// extraction.
    pub preview_size: u32,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            palette_size: 10,
            ink_threshold: 16,
            alpha_threshold: 250,
            snap_grid: 24,
            analysis_size: 512,
            preview_size: 1024,
        }
    }
}
