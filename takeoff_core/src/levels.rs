//! # Levels
//!
//! Floor and roof elevations at which horizontal framing is placed. Values are
//! absolute elevations above the column base, not storey heights. The base
//! (elevation 0) is implicit and never carries beams.

use serde::{Deserialize, Serialize};

/// Sorted, distinct, strictly positive elevations (mm).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelSet(Vec<f64>);

impl LevelSet {
    /// Elevations in ascending order
    pub fn elevations(&self) -> &[f64] {
        &self.0
    }

    /// Structure height: the top elevation, or 0 when there are no levels
    pub fn height(&self) -> f64 {
        self.0.last().copied().unwrap_or(0.0)
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no level carries framing
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Elevation directly below `z` (0 for the lowest level).
    ///
    /// Returns `None` if `z` is not one of the levels.
    pub fn storey_below(&self, z: f64) -> Option<f64> {
        let idx = self.0.iter().position(|v| *v == z)?;
        Some(if idx == 0 { 0.0 } else { self.0[idx - 1] })
    }

    /// True if `z` is one of the levels
    pub fn contains(&self, z: f64) -> bool {
        self.0.iter().any(|v| *v == z)
    }
}

/// Resolve raw level inputs into a [`LevelSet`].
///
/// Non-positive and non-finite values are dropped, the rest sorted ascending
/// with exact duplicates collapsed.
///
/// ```rust
/// use takeoff_core::levels::resolve_levels;
///
/// let levels = resolve_levels(&[4200.0, 0.0, 4200.0, 8400.0, -5.0]);
/// assert_eq!(levels.elevations(), &[4200.0, 8400.0]);
/// assert_eq!(levels.height(), 8400.0);
/// ```
pub fn resolve_levels(raw: &[f64]) -> LevelSet {
    let mut values: Vec<f64> = raw
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    LevelSet(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_drops_and_sorts() {
        let levels = resolve_levels(&[4200.0, 0.0, 4200.0, 8400.0, -5.0]);
        assert_eq!(levels.elevations(), &[4200.0, 8400.0]);
    }

    #[test]
    fn test_resolve_unsorted_input() {
        let levels = resolve_levels(&[12600.0, 4200.0, 8400.0]);
        assert_eq!(levels.elevations(), &[4200.0, 8400.0, 12600.0]);
        assert_eq!(levels.height(), 12600.0);
    }

    #[test]
    fn test_non_finite_dropped() {
        let levels = resolve_levels(&[f64::NAN, f64::INFINITY, 3000.0]);
        assert_eq!(levels.elevations(), &[3000.0]);
    }

    #[test]
    fn test_empty_height_is_zero() {
        let levels = resolve_levels(&[0.0, -1.0]);
        assert!(levels.is_empty());
        assert_eq!(levels.height(), 0.0);
    }

    #[test]
    fn test_storey_below() {
        let levels = resolve_levels(&[4200.0, 8400.0]);
        assert_eq!(levels.storey_below(4200.0), Some(0.0));
        assert_eq!(levels.storey_below(8400.0), Some(4200.0));
        assert_eq!(levels.storey_below(5000.0), None);
    }

    #[test]
    fn test_serializes_as_array() {
        let levels = resolve_levels(&[3000.0, 6000.0]);
        assert_eq!(serde_json::to_string(&levels).unwrap(), "[3000.0,6000.0]");
    }
}
