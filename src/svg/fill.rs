//! Fill attribute classification.

/// Aggregate verdict over a document's fill attributes.
///
/// Only the two interesting outcomes get a variant; "one plain color" is
/// `None` at the classification boundary and the caller substitutes the
/// dominant palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillUsage {
    /// Every painted fill defers to the inherited `currentColor`.
    CurrentColor,
    /// At least two distinct painted fill values.
    Mixed,
}

impl FillUsage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CurrentColor => "currentColor",
            Self::Mixed => "mixed",
        }
    }
}

/// Classify a document's fill attributes.
///
/// `none` entries are dropped (case-insensitively) before anything else.
/// Distinctness is judged on the verbatim attribute text, so two spellings
/// of the same color count as mixed; only the `currentColor` keyword itself
/// is matched case-insensitively.
pub fn classify_fills(fills: &[String]) -> Option<FillUsage> {
    let mut painted = fills
        .iter()
        .map(String::as_str)
        .filter(|f| !f.eq_ignore_ascii_case("none"));

    let first = painted.next()?;
    if painted.any(|fill| fill != first) {
        return Some(FillUsage::Mixed);
    }

    first
        .eq_ignore_ascii_case("currentcolor")
        .then_some(FillUsage::CurrentColor)
}

// ============================================================================
// Tests
// ============================================================================
