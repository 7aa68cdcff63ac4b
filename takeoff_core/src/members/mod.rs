//! # Member Enumeration
//!
//! Expands a grid, a level set and the role profile selections into the full
//! list of framing members: columns, primary beams, sub-beams, joists and
//! braces. Every member is a straight 3D segment in millimetres with a typed
//! [`MemberId`] and an effective (already resolved) profile.
//!
//! Enumeration is a pure function of its inputs. The same params always give
//! the same members in the same order:
//!
//! 1. columns, by `ix` then `iy`
//! 2. primary beams per level: X beams (every Y gridline, every X bay),
//!    then Y beams (every X gridline, every Y bay)
//! 3. sub-beams and joists per level (see [`infill`])
//! 4. braces in the order they were added
//!
//! Overrides are a separate pass ([`apply_overrides`]) that only swaps the
//! profile of a member; geometry is never touched.

pub mod infill;

use std::collections::BTreeMap;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::braces::{brace_members, BraceSet, FaceKey};
use crate::catalog::{ProfileCatalog, ProfileSelection, SectionDims};
use crate::errors::TakeoffError;
use crate::grid::GridSpec;
use crate::levels::LevelSet;
use crate::params::FrameParams;
use crate::units::{KgPerMeter, Meters, Millimeters};

/// Member category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Column,
    Beam,
    SubBeam,
    Joist,
    Brace,
}

impl MemberRole {
    /// All roles in table order
    pub const ALL: [MemberRole; 5] = [
        MemberRole::Column,
        MemberRole::Beam,
        MemberRole::SubBeam,
        MemberRole::Joist,
        MemberRole::Brace,
    ];

    /// Category label used in quantity tables
    pub fn label(&self) -> &'static str {
        match self {
            MemberRole::Column => "COLUMN",
            MemberRole::Beam => "BEAM",
            MemberRole::SubBeam => "SUB-BEAM",
            MemberRole::Joist => "JOIST",
            MemberRole::Brace => "BRACE",
        }
    }

    /// Lowercase key used in CSV exports
    pub fn key(&self) -> &'static str {
        match self {
            MemberRole::Column => "column",
            MemberRole::Beam => "beam",
            MemberRole::SubBeam => "sub_beam",
            MemberRole::Joist => "joist",
            MemberRole::Brace => "brace",
        }
    }

    /// Vertical members render with the column envelope
    pub fn is_vertical(&self) -> bool {
        matches!(self, MemberRole::Column)
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A level elevation (mm) usable as part of a map key.
///
/// Equality, hashing and ordering work on the exact bit pattern via
/// `total_cmp`, so two elevations are the same key only if they are the
/// same number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Elevation(pub f64);

impl Elevation {
    pub fn mm(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Elevation {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for Elevation {}

impl Hash for Elevation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for Elevation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Elevation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Elevation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // shortest text that parses back to the same f64
        write!(f, "{}", self.0)
    }
}

impl FromStr for Elevation {
    type Err = TakeoffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Elevation)
            .ok_or_else(|| TakeoffError::invalid_input("elevation", s, "not a number"))
    }
}

/// Stable identity of one member.
///
/// The text form (`C_0_0`, `BX_4200_0_1`, `SB_4200_0_0_1`, ...) round-trips
/// through `Display` / `FromStr` and is what JSON maps use as keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MemberId {
    /// Column at gridline intersection (ix, iy)
    Column { ix: usize, iy: usize },
    /// X-direction beam on Y gridline `iy`, X bay `ix`
    BeamX { z: Elevation, iy: usize, ix: usize },
    /// Y-direction beam on X gridline `ix`, Y bay `iy`
    BeamY { z: Elevation, ix: usize, iy: usize },
    /// k-th sub-beam (1-based) in bay (ix, iy)
    SubBeam { z: Elevation, ix: usize, iy: usize, k: usize },
    /// k-th joist (1-based) in strip `strip` of bay (ix, iy)
    Joist { z: Elevation, ix: usize, iy: usize, strip: usize, k: usize },
    /// k-th diagonal (0 or 1) of the brace on `face`
    Brace { face: FaceKey, k: usize },
}

impl MemberId {
    /// Role implied by the id
    pub fn role(&self) -> MemberRole {
        match self {
            MemberId::Column { .. } => MemberRole::Column,
            MemberId::BeamX { .. } | MemberId::BeamY { .. } => MemberRole::Beam,
            MemberId::SubBeam { .. } => MemberRole::SubBeam,
            MemberId::Joist { .. } => MemberRole::Joist,
            MemberId::Brace { .. } => MemberRole::Brace,
        }
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberId::Column { ix, iy } => write!(f, "C_{}_{}", ix, iy),
            MemberId::BeamX { z, iy, ix } => write!(f, "BX_{}_{}_{}", z, iy, ix),
            MemberId::BeamY { z, ix, iy } => write!(f, "BY_{}_{}_{}", z, ix, iy),
            MemberId::SubBeam { z, ix, iy, k } => write!(f, "SB_{}_{}_{}_{}", z, ix, iy, k),
            MemberId::Joist { z, ix, iy, strip, k } => {
                write!(f, "J_{}_{}_{}_{}_{}", z, ix, iy, strip, k)
            }
            MemberId::Brace { face, k } => write!(f, "BR_{}_{}", face, k),
        }
    }
}

impl FromStr for MemberId {
    type Err = TakeoffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TakeoffError::invalid_input("member_id", s, "unrecognised member id");
        let parts: Vec<&str> = s.trim().split('_').collect();
        let idx = |i: usize| -> Result<usize, TakeoffError> {
            parts.get(i).and_then(|p| p.parse().ok()).ok_or_else(bad)
        };
        let elev = |i: usize| -> Result<Elevation, TakeoffError> {
            parts.get(i).ok_or_else(bad)?.parse()
        };

        let id = match (parts[0], parts.len()) {
            ("C", 3) => MemberId::Column { ix: idx(1)?, iy: idx(2)? },
            ("BX", 4) => MemberId::BeamX { z: elev(1)?, iy: idx(2)?, ix: idx(3)? },
            ("BY", 4) => MemberId::BeamY { z: elev(1)?, ix: idx(2)?, iy: idx(3)? },
            ("SB", 5) => MemberId::SubBeam {
                z: elev(1)?,
                ix: idx(2)?,
                iy: idx(3)?,
                k: idx(4)?,
            },
            ("J", 6) => MemberId::Joist {
                z: elev(1)?,
                ix: idx(2)?,
                iy: idx(3)?,
                strip: idx(4)?,
                k: idx(5)?,
            },
            ("BR", 6) => MemberId::Brace {
                face: parts[1..5].join("_").parse()?,
                k: idx(5)?,
            },
            _ => return Err(bad()),
        };
        Ok(id)
    }
}

impl TryFrom<String> for MemberId {
    type Error = TakeoffError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.to_string()
    }
}

/// Profile of a member after catalog resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveProfile {
    /// What was selected, if anything
    pub selection: Option<ProfileSelection>,
    /// Display name ("-" when nothing is selected)
    pub name: String,
    /// Unit weight (kg/m), `None` when unknown
    pub kgm: Option<f64>,
    /// Section dimensions, when the catalog has them
    pub dims: Option<SectionDims>,
}

impl EffectiveProfile {
    /// Resolve an optional selection against the catalog
    pub fn resolve(catalog: &ProfileCatalog, selection: Option<&ProfileSelection>) -> Self {
        match selection {
            Some(sel) => {
                let resolved = catalog.resolve(sel);
                EffectiveProfile {
                    selection: Some(sel.clone()),
                    name: resolved.name,
                    kgm: resolved.kgm,
                    dims: resolved.dims,
                }
            }
            None => EffectiveProfile {
                selection: None,
                name: "-".to_string(),
                kgm: None,
                dims: None,
            },
        }
    }
}

/// One framing member as a 3D segment (mm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberRecord {
    pub id: MemberId,
    pub role: MemberRole,
    /// Start point (mm)
    pub a: DVec3,
    /// End point (mm)
    pub b: DVec3,
    pub profile: EffectiveProfile,
}

impl MemberRecord {
    pub fn new(id: MemberId, a: DVec3, b: DVec3, profile: EffectiveProfile) -> Self {
        MemberRecord {
            role: id.role(),
            id,
            a,
            b,
            profile,
        }
    }

    /// Euclidean length (mm)
    pub fn length_mm(&self) -> f64 {
        self.a.distance(self.b)
    }

    /// Length (m)
    pub fn length_m(&self) -> f64 {
        Meters::from(Millimeters(self.length_mm())).value()
    }

    /// Mass (kg), `None` when the unit weight is unknown
    pub fn mass_kg(&self) -> Option<f64> {
        self.profile
            .kgm
            .filter(|k| k.is_finite())
            .map(|kgm| KgPerMeter(kgm).over(Meters(self.length_m())).value())
    }

    /// Midpoint (mm)
    pub fn midpoint(&self) -> DVec3 {
        (self.a + self.b) * 0.5
    }
}

/// Enumerate every member of the frame.
///
/// Braces on faces that no longer exist in the current grid are skipped.
pub fn enumerate_members(
    params: &FrameParams,
    braces: &BraceSet,
    catalog: &ProfileCatalog,
) -> Vec<MemberRecord> {
    let grid = params.grid_spec();
    let levels = params.level_set();
    let profiles = &params.profiles;

    let mut members = Vec::new();

    let column = EffectiveProfile::resolve(catalog, profiles.column.as_ref());
    columns(&grid, &levels, &column, &mut members);

    let beam = EffectiveProfile::resolve(catalog, profiles.beam.as_ref());
    primary_beams(&grid, &levels, &beam, &mut members);

    if params.sub_beams_per_bay > 0 {
        let sub_beam = EffectiveProfile::resolve(catalog, profiles.sub_beam.as_ref());
        members.extend(infill::sub_beams(
            &grid,
            &levels,
            params.sub_beams_per_bay as usize,
            &sub_beam,
        ));
    }

    if params.joists.enabled {
        let joist = EffectiveProfile::resolve(catalog, profiles.joist.as_ref());
        members.extend(infill::joists(
            &grid,
            &levels,
            params.sub_beams_per_bay as usize,
            params.joist_spacing(),
            &joist,
        ));
    }

    members.extend(brace_members(
        braces,
        &grid,
        &levels,
        profiles.brace.as_ref(),
        catalog,
    ));

    debug!(
        members = members.len(),
        gridlines_x = grid.x.count,
        gridlines_y = grid.y.count,
        levels = levels.len(),
        "Enumerated members"
    );
    members
}

fn columns(grid: &GridSpec, levels: &LevelSet, profile: &EffectiveProfile, out: &mut Vec<MemberRecord>) {
    let height = levels.height();
    for (ix, &x) in grid.x.positions.iter().enumerate() {
        for (iy, &y) in grid.y.positions.iter().enumerate() {
            out.push(MemberRecord::new(
                MemberId::Column { ix, iy },
                DVec3::new(x, y, 0.0),
                DVec3::new(x, y, height),
                profile.clone(),
            ));
        }
    }
}

fn primary_beams(grid: &GridSpec, levels: &LevelSet, profile: &EffectiveProfile, out: &mut Vec<MemberRecord>) {
    for &zv in levels.elevations() {
        let z = Elevation(zv);
        for (iy, &y) in grid.y.positions.iter().enumerate() {
            for (ix, x0, x1) in grid.x.bays() {
                out.push(MemberRecord::new(
                    MemberId::BeamX { z, iy, ix },
                    DVec3::new(x0, y, zv),
                    DVec3::new(x1, y, zv),
                    profile.clone(),
                ));
            }
        }
        for (ix, &x) in grid.x.positions.iter().enumerate() {
            for (iy, y0, y1) in grid.y.bays() {
                out.push(MemberRecord::new(
                    MemberId::BeamY { z, ix, iy },
                    DVec3::new(x, y0, zv),
                    DVec3::new(x, y1, zv),
                    profile.clone(),
                ));
            }
        }
    }
}

/// Replace the profile of every member that has an override.
///
/// Returns how many members were changed. Overrides for ids not present in
/// `members` are left alone; they may match again after a grid change.
pub fn apply_overrides(
    members: &mut [MemberRecord],
    overrides: &BTreeMap<MemberId, ProfileSelection>,
    catalog: &ProfileCatalog,
) -> usize {
    if overrides.is_empty() {
        return 0;
    }
    let mut applied = 0;
    for member in members.iter_mut() {
        if let Some(sel) = overrides.get(&member.id) {
            member.profile = EffectiveProfile::resolve(catalog, Some(sel));
            applied += 1;
        }
    }
    debug!(applied, requested = overrides.len(), "Applied member overrides");
    applied
}
