//! # Vertical Bracing
//!
//! Braces are placed per *face*: the rectangle between two adjacent columns
//! on one gridline, from one level down to the level below it (or the base).
//! A face carries at most one brace; toggling the same face again removes it.
//!
//! Corners are always derived from the current grid and levels, so a brace
//! follows span edits. A brace whose face disappears (gridline or level
//! removed) is skipped at enumeration time, but stays in the set.
//!
//! ```text
//!  TL ────── TR        TL ──┬── TR
//!   │ ╲    ╱ │          │   ╱╲  │
//!   │   ╳    │   X      │  ╱  ╲ │   Chevron
//!   │ ╱    ╲ │          │ ╱    ╲│
//!  BL ────── BR        BL ────── BR
//! ```

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{ProfileCatalog, ProfileSelection};
use crate::errors::TakeoffError;
use crate::grid::GridSpec;
use crate::levels::LevelSet;
use crate::members::{EffectiveProfile, Elevation, MemberId, MemberRecord};

/// Gridline family a face lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FaceAxis {
    /// Face runs along X, on a Y gridline
    X,
    /// Face runs along Y, on an X gridline
    Y,
}

/// Identity of one braceable face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaceKey {
    pub axis: FaceAxis,
    /// Gridline index on the perpendicular axis
    pub line: usize,
    /// Bay index along `axis`
    pub bay: usize,
    /// Top elevation (mm); must be one of the levels
    pub top: Elevation,
}

impl FaceKey {
    pub fn new(axis: FaceAxis, line: usize, bay: usize, top: f64) -> Self {
        FaceKey {
            axis,
            line,
            bay,
            top: Elevation(top),
        }
    }

    /// Corners `[BL, BR, TR, TL]` in the current geometry, or `None` if the
    /// face no longer exists.
    pub fn corners(&self, grid: &GridSpec, levels: &LevelSet) -> Option<[DVec3; 4]> {
        let top = self.top.mm();
        let bottom = levels.storey_below(top)?;
        let (run, cross) = match self.axis {
            FaceAxis::X => (&grid.x, &grid.y),
            FaceAxis::Y => (&grid.y, &grid.x),
        };
        let (s0, s1) = run.bay(self.bay)?;
        let c = *cross.positions.get(self.line)?;

        let at = |s: f64, z: f64| match self.axis {
            FaceAxis::X => DVec3::new(s, c, z),
            FaceAxis::Y => DVec3::new(c, s, z),
        };
        Some([at(s0, bottom), at(s1, bottom), at(s1, top), at(s0, top)])
    }
}

impl fmt::Display for FaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = match self.axis {
            FaceAxis::X => "FX",
            FaceAxis::Y => "FY",
        };
        write!(f, "{}_{}_{}_{}", axis, self.top, self.line, self.bay)
    }
}

impl FromStr for FaceKey {
    type Err = TakeoffError;

    /// Parse `"FX_{top}_{line}_{bay}"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TakeoffError::invalid_input("face", s, "expected FX_<top>_<line>_<bay> or FY_...");
        let parts: Vec<&str> = s.trim().split('_').collect();
        if parts.len() != 4 {
            return Err(bad());
        }
        let axis = match parts[0] {
            "FX" => FaceAxis::X,
            "FY" => FaceAxis::Y,
            _ => return Err(bad()),
        };
        Ok(FaceKey {
            axis,
            top: parts[1].parse().map_err(|_| bad())?,
            line: parts[2].parse().map_err(|_| bad())?,
            bay: parts[3].parse().map_err(|_| bad())?,
        })
    }
}

/// Brace pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BraceKind {
    /// Two crossing diagonals
    X,
    /// Two members meeting at the top midpoint ("S" in the picker)
    Chevron,
}

impl FromStr for BraceKind {
    type Err = TakeoffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(BraceKind::X),
            "S" | "CHEVRON" | "V" => Ok(BraceKind::Chevron),
            _ => Err(TakeoffError::invalid_input("brace_kind", s, "expected X or S")),
        }
    }
}

impl BraceKind {
    /// Segment endpoints for corners `[BL, BR, TR, TL]`
    pub fn segments(&self, corners: &[DVec3; 4]) -> [(DVec3, DVec3); 2] {
        let [bl, br, tr, tl] = *corners;
        match self {
            BraceKind::X => [(bl, tr), (br, tl)],
            BraceKind::Chevron => {
                let mid = (tl + tr) * 0.5;
                [(bl, mid), (br, mid)]
            }
        }
    }
}

/// One placed brace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BraceSpec {
    pub face: FaceKey,
    pub kind: BraceKind,
    /// Profile for this brace; `None` uses the brace role default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileSelection>,
}

/// Ordered collection of braces, at most one per face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BraceSet {
    braces: Vec<BraceSpec>,
}

impl BraceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a brace on `face`, or remove the existing one.
    ///
    /// Returns `true` when a brace was added.
    pub fn toggle(&mut self, face: FaceKey, kind: BraceKind, profile: Option<ProfileSelection>) -> bool {
        if self.remove(&face).is_some() {
            false
        } else {
            self.braces.push(BraceSpec { face, kind, profile });
            true
        }
    }

    /// Remove the brace on `face`
    pub fn remove(&mut self, face: &FaceKey) -> Option<BraceSpec> {
        let pos = self.braces.iter().position(|b| b.face == *face)?;
        Some(self.braces.remove(pos))
    }

    pub fn clear(&mut self) {
        self.braces.clear();
    }

    pub fn contains(&self, face: &FaceKey) -> bool {
        self.braces.iter().any(|b| b.face == *face)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BraceSpec> {
        self.braces.iter()
    }

    pub fn len(&self) -> usize {
        self.braces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.braces.is_empty()
    }
}

/// Brace members for the current geometry.
pub fn brace_members(
    braces: &BraceSet,
    grid: &GridSpec,
    levels: &LevelSet,
    default_profile: Option<&ProfileSelection>,
    catalog: &ProfileCatalog,
) -> Vec<MemberRecord> {
    let mut out = Vec::with_capacity(braces.len() * 2);
    for brace in braces.iter() {
        let Some(corners) = brace.face.corners(grid, levels) else {
            warn!(face = %brace.face, "Brace face no longer exists, skipping");
            continue;
        };
        let profile = EffectiveProfile::resolve(catalog, brace.profile.as_ref().or(default_profile));
        for (k, (a, b)) in brace.kind.segments(&corners).into_iter().enumerate() {
            out.push(MemberRecord::new(
                MemberId::Brace { face: brace.face, k },
                a,
                b,
                profile.clone(),
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_catalog;
    use crate::grid::build_axis;
    use crate::levels::resolve_levels;

    fn setup() -> (GridSpec, LevelSet) {
        (
            GridSpec::new(build_axis(3, 6000.0, ""), build_axis(2, 8000.0, "")),
            resolve_levels(&[4000.0, 8000.0]),
        )
    }

    #[test]
    fn test_toggle_is_idempotent_pair() {
        let face = FaceKey::new(FaceAxis::X, 0, 1, 4000.0);
        let mut set = BraceSet::new();
        let original = set.clone();
        assert!(set.toggle(face, BraceKind::X, None));
        assert!(set.contains(&face));
        assert!(!set.toggle(face, BraceKind::Chevron, None));
        assert_eq!(set, original);
    }

    #[test]
    fn test_corners_x_face() {
        let (grid, levels) = setup();
        let face = FaceKey::new(FaceAxis::X, 1, 1, 8000.0);
        let c = face.corners(&grid, &levels).unwrap();
        assert_eq!(c[0], DVec3::new(6000.0, 8000.0, 4000.0));
        assert_eq!(c[1], DVec3::new(12000.0, 8000.0, 4000.0));
        assert_eq!(c[2], DVec3::new(12000.0, 8000.0, 8000.0));
        assert_eq!(c[3], DVec3::new(6000.0, 8000.0, 8000.0));
    }

    #[test]
    fn test_corners_lowest_storey_starts_at_base() {
        let (grid, levels) = setup();
        let face = FaceKey::new(FaceAxis::Y, 2, 0, 4000.0);
        let c = face.corners(&grid, &levels).unwrap();
        assert_eq!(c[0], DVec3::new(12000.0, 0.0, 0.0));
        assert_eq!(c[2], DVec3::new(12000.0, 8000.0, 4000.0));
    }

    #[test]
    fn test_missing_face() {
        let (grid, levels) = setup();
        assert!(FaceKey::new(FaceAxis::X, 0, 2, 4000.0).corners(&grid, &levels).is_none());
        assert!(FaceKey::new(FaceAxis::X, 5, 0, 4000.0).corners(&grid, &levels).is_none());
        assert!(FaceKey::new(FaceAxis::X, 0, 0, 5000.0).corners(&grid, &levels).is_none());
    }

    #[test]
    fn test_x_and_chevron_segments() {
        let (grid, levels) = setup();
        let face = FaceKey::new(FaceAxis::X, 0, 0, 4000.0);
        let corners = face.corners(&grid, &levels).unwrap();

        let [(a0, b0), (a1, b1)] = BraceKind::X.segments(&corners);
        assert_eq!((a0, b0), (corners[0], corners[2]));
        assert_eq!((a1, b1), (corners[1], corners[3]));

        let [(a0, b0), (a1, b1)] = BraceKind::Chevron.segments(&corners);
        let mid = DVec3::new(3000.0, 0.0, 4000.0);
        assert_eq!((a0, b0), (corners[0], mid));
        assert_eq!((a1, b1), (corners[1], mid));
    }

    #[test]
    fn test_brace_members_length() {
        let (grid, levels) = setup();
        let mut set = BraceSet::new();
        set.toggle(FaceKey::new(FaceAxis::X, 0, 0, 4000.0), BraceKind::X, None);
        set.toggle(FaceKey::new(FaceAxis::X, 0, 9, 4000.0), BraceKind::X, None);
        let catalog = builtin_catalog();
        let default = ProfileSelection::new("KS", "L", "75x75x6");
        let members = brace_members(&set, &grid, &levels, Some(&default), &catalog);
        assert_eq!(members.len(), 2);
        let diag = (6000.0f64.powi(2) + 4000.0f64.powi(2)).sqrt();
        for m in &members {
            assert!((m.length_mm() - diag).abs() < 1e-9);
            assert_eq!(m.profile.kgm, Some(6.85));
        }
    }

    #[test]
    fn test_per_brace_profile_wins() {
        let (grid, levels) = setup();
        let mut set = BraceSet::new();
        set.toggle(
            FaceKey::new(FaceAxis::Y, 0, 0, 4000.0),
            BraceKind::Chevron,
            Some(ProfileSelection::new("KS", "L", "90x90x10")),
        );
        let members = brace_members(&set, &grid, &levels, None, &builtin_catalog());
        assert!(members.iter().all(|m| m.profile.kgm == Some(13.3)));
    }

    #[test]
    fn test_face_text_form() {
        let face = FaceKey::new(FaceAxis::Y, 2, 0, 4200.0);
        assert_eq!(face.to_string(), "FY_4200_2_0");
        assert_eq!("FY_4200_2_0".parse::<FaceKey>().unwrap(), face);
        assert!("FZ_4200_2_0".parse::<FaceKey>().is_err());
        assert!("FX_4200_2".parse::<FaceKey>().is_err());
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("x".parse::<BraceKind>().unwrap(), BraceKind::X);
        assert_eq!("S".parse::<BraceKind>().unwrap(), BraceKind::Chevron);
        assert!("Q".parse::<BraceKind>().is_err());
    }
}
