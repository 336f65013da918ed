use serde::{Deserialize, Serialize};

use super::config::Orientation;

/// A single placed module.
///
/// Owned by the [`LayoutResult`] that produced it; results are plain value
/// records and are never mutated after being returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedModule {
    /// Lower-left corner (x, y) [m].
    pub position: (f64, f64),
    /// Geometric center (x, y) [m].
    pub center: (f64, f64),
    /// Row index, counted south to north over non-empty rows.
    pub row: usize,
    pub orientation: Orientation,
    /// Rotation about the vertical axis [degrees]; always 0 for
    /// north-south facing rows.
    pub rotation: f64,
}

/// Full placement output of `place_modules`.
///
/// Degenerate sites (margin swallows the area, sun never clears the
/// horizon) come back zero-valued with `error` set, so callers can render
/// a graceful message instead of handling a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub modules: Vec<PlacedModule>,
    /// Number of non-empty rows.
    pub rows: usize,
    /// Average modules per row.
    pub modules_per_row: f64,
    pub total_modules: usize,
    /// System capacity [kWp].
    pub capacity_kwp: f64,
    /// Achieved Ground Coverage Ratio.
    pub actual_gcr: f64,
    /// Usable site area after margin erosion [m²].
    pub usable_area: f64,
    /// Row-to-row pitch [m].
    pub row_pitch: f64,
    /// Pitch plus walkway [m].
    pub row_spacing: f64,
    /// Single module footprint [m²].
    pub module_area: f64,
    /// Winter-solstice solar elevation used to size the pitch [degrees].
    pub solar_elevation: f64,
    /// Reason the layout degenerated to zero modules, when it did.
    pub error: Option<String>,
}

impl LayoutResult {
    /// Zero-valued layout for degenerate sites.
    pub fn degenerate(usable_area: f64, reason: impl Into<String>) -> Self {
        Self {
            modules: Vec::new(),
            rows: 0,
            modules_per_row: 0.0,
            total_modules: 0,
            capacity_kwp: 0.0,
            actual_gcr: 0.0,
            usable_area,
            row_pitch: 0.0,
            row_spacing: 0.0,
            module_area: 0.0,
            solar_elevation: 0.0,
            error: Some(reason.into()),
        }
    }
}

/// Non-geometric sizing estimate from `optimize_layout`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingEstimate {
    pub recommended_modules: usize,
    /// Row-to-row pitch [m].
    pub row_pitch: f64,
    /// Achieved Ground Coverage Ratio after the shading floor is applied.
    pub gcr: f64,
    /// Expected capacity [kWp].
    pub capacity_kwp: f64,
    /// Single module footprint [m²].
    pub module_area: f64,
    /// Combined footprint of all recommended modules [m²].
    pub total_module_area: f64,
    /// Winter-solstice solar elevation used for the pitch floor [degrees].
    pub solar_elevation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_is_zero_valued() {
        let result = LayoutResult::degenerate(42.0, "usable area is zero after applying margins");
        assert_eq!(result.total_modules, 0);
        assert_eq!(result.rows, 0);
        assert_eq!(result.capacity_kwp, 0.0);
        assert_eq!(result.usable_area, 42.0);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_layout_result_serializes() {
        let result = LayoutResult::degenerate(0.0, "no area");
        let json = serde_json::to_string(&result).unwrap();
        let roundtrip: LayoutResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, roundtrip);
    }
}
