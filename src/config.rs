//! Tool configuration management for `visum.toml`.
//!
//! The config file is optional: when absent, built-in defaults apply.
//! CLI flags always win over file values.
//!
//! # Example
//!
//! ```toml
//! [extract]
//! palette_size = 10     # Number of palette colors (k)
//! ink_threshold = 16    # 0-255, mask visibility cutoff
//! alpha_threshold = 250 # 0-255, transparency detection cutoff
//! snap_grid = 24        # Centroid percentage quantization step
//! analysis_size = 512   # Canvas size for mask analysis of vectors
//! preview_size = 1024   # Canvas size for palette extraction of vectors
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::meta::ExtractOptions;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "visum.toml";

// ============================================================================
// ConfigError
// ============================================================================

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing visum.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisumConfig {
    /// Extraction tuning
    pub extract: ExtractSection,
}

/// `[extract]` section: engine tuning knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractSection {
    /// Number of palette colors to extract (k)
    pub palette_size: usize,

    /// Visibility mask cutoff on a 0-255 scale. A pixel is "ink" when its
    /// alpha (or luminance) is strictly greater than this.
    pub ink_threshold: u8,

    /// Transparency detection cutoff on a 0-255 scale. Any alpha strictly
    /// below this marks the image transparent.
    pub alpha_threshold: u8,

    /// Quantization step for centroid percentage coordinates
    pub snap_grid: u32,

    /// Square canvas size used when rasterizing vectors for mask analysis
    pub analysis_size: u32,

    /// Square canvas size used when rasterizing vectors for palette
    /// extraction
    pub preview_size: u32,
}

impl Default for ExtractSection {
    fn default() -> Self {
        let defaults = ExtractOptions::default();
        Self {
            palette_size: defaults.palette_size,
            ink_threshold: defaults.ink_threshold,
            alpha_threshold: defaults.alpha_threshold,
            snap_grid: defaults.snap_grid,
            analysis_size: defaults.analysis_size,
            preview_size: defaults.preview_size,
        }
    }
}

impl ExtractSection {
    /// Convert into the engine's options struct.
    pub fn to_options(&self) -> ExtractOptions {
        ExtractOptions {
            palette_size: self.palette_size,
            ink_threshold: self.ink_threshold,
            alpha_threshold: self.alpha_threshold,
            snap_grid: self.snap_grid,
            analysis_size: self.analysis_size,
            preview_size: self.preview_size,
        }
    }
}

impl VisumConfig {
    /// Load configuration for the current invocation.
    ///
    /// An explicit `--config` path must exist; the default `visum.toml` is
    /// optional and silently falls back to defaults when missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let default = Path::new(CONFIG_FILE);
                if default.exists() {
                    Self::from_path(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse and validate a config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate loaded values.
    ///
    /// Zero sizes would make the engine's percentage math divide by zero,
    /// so they are rejected here rather than checked per call.
    fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.extract;
        if e.palette_size == 0 {
            return Err(ConfigError::Validation(
                "extract.palette_size must be at least 1".into(),
            ));
        }
        if e.snap_grid == 0 {
            return Err(ConfigError::Validation(
                "extract.snap_grid must be at least 1".into(),
            ));
        }
        if e.analysis_size == 0 || e.preview_size == 0 {
            return Err(ConfigError::Validation(
                "extract canvas sizes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> VisumConfig {
        let config: VisumConfig = toml::from_str(raw).unwrap();
        config.validate().unwrap();
        config
    }

    #[test]
    fn test_defaults() {
        let config = parse("");
        assert_eq!(config.extract.palette_size, 10);
        assert_eq!(config.extract.ink_threshold, 16);
        assert_eq!(config.extract.alpha_threshold, 250);
        assert_eq!(config.extract.snap_grid, 24);
        assert_eq!(config.extract.analysis_size, 512);
        assert_eq!(config.extract.preview_size, 1024);
    }

    #[test]
    fn test_partial_override() {
        let config = parse("[extract]\npalette_size = 4\nsnap_grid = 10");
        assert_eq!(config.extract.palette_size, 4);
        assert_eq!(config.extract.snap_grid, 10);
        assert_eq!(config.extract.ink_threshold, 16);
    }

    #[test]
    fn test_zero_snap_grid_rejected() {
        let config: VisumConfig = toml::from_str("[extract]\nsnap_grid = 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_zero_canvas_rejected() {
        let config: VisumConfig = toml::from_str("[extract]\nanalysis_size = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_threshold_out_of_range_is_parse_error() {
        let result: Result<VisumConfig, _> = toml::from_str("[extract]\nink_threshold = 300");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_with_explicit_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = VisumConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_, _)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("visum.toml");
        fs::write(&path, "[extract]\npalette_size = 6").unwrap();
        let config = VisumConfig::from_path(&path).unwrap();
        assert_eq!(config.extract.palette_size, 6);
    }

    #[test]
    fn test_to_options_round_trip() {
        let config = parse("[extract]\nink_threshold = 32");
        let options = config.extract.to_options();
        assert_eq!(options.ink_threshold, 32);
        assert_eq!(options.palette_size, 10);
    }
}
