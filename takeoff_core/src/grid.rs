//! # Grid Geometry
//!
//! Turns the two horizontal axis inputs into absolute gridline coordinates.
//! Each axis is either a count with a uniform bay spacing, or an explicit
//! comma-separated list of bay spans which, when present, wins and fixes the
//! gridline count.
//!
//! Parsing is permissive: bad tokens are skipped, counts clamp to at least 1
//! and spans to at least 1 mm. Nothing here returns an error.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::grid::build_axis;
//!
//! let axis = build_axis(2, 6000.0, "3000, 4000,5000");
//! assert_eq!(axis.count, 4);
//! assert_eq!(axis.positions, vec![0.0, 3000.0, 7000.0, 12000.0]);
//! ```

use serde::{Deserialize, Serialize};

use crate::params::AxisInput;

/// Smallest accepted span or spacing (mm)
pub const MIN_SPAN_MM: f64 = 1.0;

/// Parse a comma-separated span list.
///
/// Tokens are trimmed; empty, non-numeric and non-finite tokens are dropped.
/// Returns `None` unless at least one token is a positive number; otherwise
/// every kept value is clamped to [`MIN_SPAN_MM`].
pub fn parse_spans(csv: &str) -> Option<Vec<f64>> {
    let values: Vec<f64> = csv
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter_map(|t| t.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect();

    if values.iter().any(|v| *v > 0.0) {
        Some(values.into_iter().map(|v| v.max(MIN_SPAN_MM)).collect())
    } else {
        None
    }
}

/// Gridline layout along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLayout {
    /// Bay spans (mm), one fewer than the gridlines
    pub spans: Vec<f64>,
    /// Absolute gridline coordinates (mm), starting at 0
    pub positions: Vec<f64>,
    /// Effective gridline count (`positions.len()`)
    pub count: usize,
    /// Whether the spans came from an explicit list
    pub explicit: bool,
}

impl AxisLayout {
    fn from_spans(spans: Vec<f64>, explicit: bool) -> Self {
        let mut positions = Vec::with_capacity(spans.len() + 1);
        let mut acc = 0.0;
        positions.push(acc);
        for span in &spans {
            acc += span;
            positions.push(acc);
        }
        AxisLayout {
            count: positions.len(),
            spans,
            positions,
            explicit,
        }
    }

    /// Number of bays (spans)
    pub fn bay_count(&self) -> usize {
        self.spans.len()
    }

    /// Overall length (mm)
    pub fn length(&self) -> f64 {
        self.positions.last().copied().unwrap_or(0.0)
    }

    /// Mean bay span (mm), 0 when there are no bays
    pub fn mean_span(&self) -> f64 {
        if self.spans.is_empty() {
            0.0
        } else {
            self.spans.iter().sum::<f64>() / self.spans.len() as f64
        }
    }

    /// Start and end coordinate of bay `i`
    pub fn bay(&self, i: usize) -> Option<(f64, f64)> {
        Some((*self.positions.get(i)?, *self.positions.get(i + 1)?))
    }

    /// Iterator over `(index, start, end)` for every bay
    pub fn bays(&self) -> impl Iterator<Item = (usize, f64, f64)> + '_ {
        self.positions
            .windows(2)
            .enumerate()
            .map(|(i, w)| (i, w[0], w[1]))
    }
}

/// Build one axis.
///
/// `count` clamps to at least 1 and `uniform_spacing` to at least
/// [`MIN_SPAN_MM`]. A usable `explicit_spans` list overrides both; read the
/// effective count back from [`AxisLayout::count`].
pub fn build_axis(count: u32, uniform_spacing: f64, explicit_spans: &str) -> AxisLayout {
    if let Some(spans) = parse_spans(explicit_spans) {
        return AxisLayout::from_spans(spans, true);
    }

    let count = count.max(1) as usize;
    let spacing = if uniform_spacing.is_finite() {
        uniform_spacing.max(MIN_SPAN_MM)
    } else {
        MIN_SPAN_MM
    };
    AxisLayout::from_spans(vec![spacing; count - 1], false)
}

/// Both horizontal axes of the column grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Axis 1 (X)
    pub x: AxisLayout,
    /// Axis 2 (Y)
    pub y: AxisLayout,
}

impl GridSpec {
    /// Build from already-resolved axes
    pub fn new(x: AxisLayout, y: AxisLayout) -> Self {
        GridSpec { x, y }
    }

    /// Resolve both axis inputs
    pub fn build(x: &AxisInput, y: &AxisInput) -> Self {
        GridSpec {
            x: x.layout(),
            y: y.layout(),
        }
    }

    /// Number of column positions (gridline intersections)
    pub fn intersection_count(&self) -> usize {
        self.x.count * self.y.count
    }

    /// Plan extents (mm)
    pub fn extents(&self) -> (f64, f64) {
        (self.x.length(), self.y.length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_axis() {
        let axis = build_axis(4, 6000.0, "");
        assert_eq!(axis.count, 4);
        assert_eq!(axis.spans, vec![6000.0; 3]);
        assert_eq!(axis.positions, vec![0.0, 6000.0, 12000.0, 18000.0]);
        assert!(!axis.explicit);
    }

    #[test]
    fn test_explicit_spans_override_count() {
        let axis = build_axis(9, 6000.0, "3000,4000,5000");
        assert_eq!(axis.count, 4);
        assert_eq!(axis.positions, vec![0.0, 3000.0, 7000.0, 12000.0]);
        assert!(axis.explicit);
    }

    #[test]
    fn test_single_gridline() {
        let axis = build_axis(1, 6000.0, "");
        assert_eq!(axis.positions, vec![0.0]);
        assert!(axis.spans.is_empty());
        assert_eq!(axis.length(), 0.0);
        assert_eq!(axis.bays().count(), 0);
    }

    #[test]
    fn test_zero_count_clamps_to_one() {
        let axis = build_axis(0, 6000.0, "");
        assert_eq!(axis.count, 1);
    }

    #[test]
    fn test_spacing_clamps() {
        let axis = build_axis(3, 0.0, "");
        assert_eq!(axis.spans, vec![1.0, 1.0]);
        let axis = build_axis(2, f64::NAN, "");
        assert_eq!(axis.spans, vec![1.0]);
    }

    #[test]
    fn test_malformed_tokens_dropped() {
        assert_eq!(parse_spans(" 3000 , abc, ,4000 "), Some(vec![3000.0, 4000.0]));
        assert_eq!(parse_spans("abc, ,"), None);
        assert_eq!(parse_spans(""), None);
    }

    #[test]
    fn test_non_positive_only_list_ignored() {
        assert_eq!(parse_spans("0, -5"), None);
        let axis = build_axis(3, 5000.0, "0,-5");
        assert!(!axis.explicit);
        assert_eq!(axis.count, 3);
    }

    #[test]
    fn test_small_spans_clamp_to_minimum() {
        assert_eq!(parse_spans("0.5, 2000, -10"), Some(vec![1.0, 2000.0, 1.0]));
    }

    #[test]
    fn test_mean_span_and_bays() {
        let axis = build_axis(1, 1.0, "2000,4000");
        assert_eq!(axis.mean_span(), 3000.0);
        assert_eq!(axis.bay(1), Some((2000.0, 6000.0)));
        assert_eq!(axis.bay(2), None);
        let bays: Vec<_> = axis.bays().collect();
        assert_eq!(bays, vec![(0, 0.0, 2000.0), (1, 2000.0, 6000.0)]);
    }

    #[test]
    fn test_grid_spec_build() {
        let grid = GridSpec::build(&AxisInput::uniform(2, 5000.0), &AxisInput::explicit("3000,4000"));
        assert_eq!(grid.x.positions, vec![0.0, 5000.0]);
        assert_eq!(grid.y.count, 3);
    }

    #[test]
    fn test_grid_spec() {
        let grid = GridSpec::new(build_axis(3, 6000.0, ""), build_axis(2, 8000.0, ""));
        assert_eq!(grid.intersection_count(), 6);
        assert_eq!(grid.extents(), (12000.0, 8000.0));
    }
}
