//! Secondary framing inside each bay: sub-beams and joists.
//!
//! Sub-beams run parallel to the axis with the shorter mean span
//! (ties go to X) and split each bay of the other axis at `k / (N + 1)`.
//! Joists run the other way, at a fixed spacing from each bay start, and
//! span every strip between adjacent framing lines (primary beams and
//! sub-beams).
//!
//! Internally the code works in a local (u, v) frame where u is the
//! sub-beam direction, then maps back to world X/Y.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{EffectiveProfile, Elevation, MemberId, MemberRecord};
use crate::grid::{AxisLayout, GridSpec};
use crate::levels::LevelSet;

/// Upper bound on sub-beams or joists along one bay; beyond it the bay gets none.
pub const MAX_INFILL_PER_BAY: usize = 10_000;

/// Direction sub-beams run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfillDirection {
    /// Sub-beams parallel to X, joists parallel to Y
    AlongX,
    /// Sub-beams parallel to Y, joists parallel to X
    AlongY,
}

impl InfillDirection {
    fn axes<'a>(&self, grid: &'a GridSpec) -> (&'a AxisLayout, &'a AxisLayout) {
        match self {
            InfillDirection::AlongX => (&grid.x, &grid.y),
            InfillDirection::AlongY => (&grid.y, &grid.x),
        }
    }

    fn point(&self, u: f64, v: f64, z: f64) -> DVec3 {
        match self {
            InfillDirection::AlongX => DVec3::new(u, v, z),
            InfillDirection::AlongY => DVec3::new(v, u, z),
        }
    }

    /// (ix, iy) from (u bay, v bay)
    fn bay_index(&self, iu: usize, iv: usize) -> (usize, usize) {
        match self {
            InfillDirection::AlongX => (iu, iv),
            InfillDirection::AlongY => (iv, iu),
        }
    }
}

/// Orientation heuristic: X when `mean(spans_x) <= mean(spans_y)`.
pub fn sub_beam_direction(grid: &GridSpec) -> InfillDirection {
    if grid.x.mean_span() <= grid.y.mean_span() {
        InfillDirection::AlongX
    } else {
        InfillDirection::AlongY
    }
}

/// Sub-beams at every level, `per_bay` in each bay.
pub fn sub_beams(
    grid: &GridSpec,
    levels: &LevelSet,
    per_bay: usize,
    profile: &EffectiveProfile,
) -> Vec<MemberRecord> {
    let mut out = Vec::new();
    if per_bay == 0 {
        return out;
    }
    if per_bay > MAX_INFILL_PER_BAY {
        warn!(per_bay, limit = MAX_INFILL_PER_BAY, "Too many sub-beams per bay, skipping");
        return out;
    }
    let dir = sub_beam_direction(grid);
    let (u_axis, v_axis) = dir.axes(grid);
    let divisions = (per_bay + 1) as f64;

    for &zv in levels.elevations() {
        let z = Elevation(zv);
        for (iv, v0, v1) in v_axis.bays() {
            for k in 1..=per_bay {
                let v = v0 + (v1 - v0) * k as f64 / divisions;
                for (iu, u0, u1) in u_axis.bays() {
                    let (ix, iy) = dir.bay_index(iu, iv);
                    out.push(MemberRecord::new(
                        MemberId::SubBeam { z, ix, iy, k },
                        dir.point(u0, v, zv),
                        dir.point(u1, v, zv),
                        profile.clone(),
                    ));
                }
            }
        }
    }
    out
}

/// Joist positions strictly inside `(start, end)`: `start + k * spacing`, k >= 1
///
/// Empty when the bay would need more than [`MAX_INFILL_PER_BAY`] joists.
pub fn joist_offsets(start: f64, end: f64, spacing: f64) -> Vec<f64> {
    let mut out = Vec::new();
    if !(spacing.is_finite() && spacing > 0.0) {
        return out;
    }
    let estimate = (end - start) / spacing;
    if !estimate.is_finite() || estimate > MAX_INFILL_PER_BAY as f64 {
        warn!(span = end - start, spacing, limit = MAX_INFILL_PER_BAY, "Too many joists in bay, skipping");
        return out;
    }
    let mut k = 1usize;
    loop {
        let pos = start + k as f64 * spacing;
        if pos >= end {
            break;
        }
        out.push(pos);
        k += 1;
    }
    out
}

/// Joists at every level.
///
/// `sub_beams_per_bay` fixes the strip boundaries: each bay of the
/// cross axis is split into `sub_beams_per_bay + 1` strips.
pub fn joists(
    grid: &GridSpec,
    levels: &LevelSet,
    sub_beams_per_bay: usize,
    spacing: f64,
    profile: &EffectiveProfile,
) -> Vec<MemberRecord> {
    let mut out = Vec::new();
    if sub_beams_per_bay > MAX_INFILL_PER_BAY {
        warn!(sub_beams_per_bay, limit = MAX_INFILL_PER_BAY, "Too many joist strips per bay, skipping");
        return out;
    }
    let dir = sub_beam_direction(grid);
    let (u_axis, v_axis) = dir.axes(grid);
    let strips = sub_beams_per_bay + 1;

    for &zv in levels.elevations() {
        let z = Elevation(zv);
        for (iv, v0, v1) in v_axis.bays() {
            let step = (v1 - v0) / strips as f64;
            for strip in 0..strips {
                let s0 = v0 + step * strip as f64;
                let s1 = if strip + 1 == strips { v1 } else { v0 + step * (strip + 1) as f64 };
                for (iu, u0, u1) in u_axis.bays() {
                    let (ix, iy) = dir.bay_index(iu, iv);
                    for (i, u) in joist_offsets(u0, u1, spacing).into_iter().enumerate() {
                        out.push(MemberRecord::new(
                            MemberId::Joist { z, ix, iy, strip, k: i + 1 },
                            dir.point(u, s0, zv),
                            dir.point(u, s1, zv),
                            profile.clone(),
                        ));
                    }
                }
            }
        }
    }
    out
}
