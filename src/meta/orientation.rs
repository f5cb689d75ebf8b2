//! Aspect orientation classification.

use serde::{Deserialize, Serialize};

/// Aspect class of a width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Square,
    Landscape,
    Portrait,
}

/// Classify a width/height pair.
///
/// Near-square shapes count as square: the tolerance is 5% of the shorter
/// side. Equal dimensions are square via the explicit equality branch, which
/// also covers the degenerate 0x0 case where the tolerance collapses to 0.
pub fn classify(width: f64, height: f64) -> Orientation {
    if width == height {
        return Orientation::Square;
    }

    let tolerance = width.min(height) * 0.05;
    if (width - height).abs() < tolerance {
        Orientation::Square
    } else if width > height {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    }
}
