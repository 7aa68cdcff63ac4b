//! # Render Envelope
//!
//! Everything a 3D viewer needs to draw the schematic frame without knowing
//! anything about catalogs or takeoff rules: one box-section envelope per
//! member, base gridlines, model bounds and a camera framing hint.
//!
//! Geometry stays in model millimetres (Z up). The camera hint is in metres
//! relative to the model center, which is how the viewer positions the root
//! of the scene.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::members::{MemberId, MemberRecord, MemberRole};
use crate::params::{DraftSettings, FrameParams};

/// One member as a box section between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneMember {
    pub id: MemberId,
    pub role: MemberRole,
    pub a: DVec3,
    pub b: DVec3,
    /// Section width (mm)
    pub width_mm: f64,
    /// Section depth (mm)
    pub depth_mm: f64,
}

/// Base gridline segment (z = 0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub a: DVec3,
    pub b: DVec3,
}

/// Axis-aligned model bounds (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelBounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl ModelBounds {
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }
}

/// Where to put the orbit camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraHint {
    /// Framing radius (m)
    pub radius_m: f64,
    /// Eye position (m, relative to the model center)
    pub eye_m: DVec3,
    /// Look-at target (m, relative to the model center)
    pub target_m: DVec3,
}

/// Render-facing view of one takeoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneModel {
    pub members: Vec<SceneMember>,
    pub grid_lines: Vec<GridLine>,
    pub bounds: ModelBounds,
    pub camera: CameraHint,
}

impl SceneModel {
    /// Build the envelope for `members` laid out on the grid in `params`.
    pub fn build(params: &FrameParams, members: &[MemberRecord]) -> Self {
        let grid = params.grid_spec();
        let height = params.level_set().height();
        let (size_x, size_y) = grid.extents();

        let mut grid_lines = Vec::with_capacity(grid.x.count + grid.y.count);
        for &x in &grid.x.positions {
            grid_lines.push(GridLine {
                a: DVec3::new(x, 0.0, 0.0),
                b: DVec3::new(x, size_y, 0.0),
            });
        }
        for &y in &grid.y.positions {
            grid_lines.push(GridLine {
                a: DVec3::new(0.0, y, 0.0),
                b: DVec3::new(size_x, y, 0.0),
            });
        }

        let bounds = ModelBounds {
            min: DVec3::ZERO,
            max: DVec3::new(size_x, size_y, height),
        };

        SceneModel {
            members: members
                .iter()
                .map(|m| scene_member(m, &params.settings))
                .collect(),
            grid_lines,
            bounds,
            camera: camera_hint(size_x, size_y, height),
        }
    }
}

fn scene_member(m: &MemberRecord, settings: &DraftSettings) -> SceneMember {
    let (width_mm, depth_mm) = match (m.profile.dims, m.role.is_vertical()) {
        (Some(dims), _) => (dims.width_mm, dims.depth_mm),
        (None, true) => (settings.nominal_column_mm, settings.nominal_column_mm),
        (None, false) => (settings.nominal_beam_width_mm, settings.nominal_beam_depth_mm),
    };
    SceneMember {
        id: m.id,
        role: m.role,
        a: m.a,
        b: m.b,
        width_mm,
        depth_mm,
    }
}

/// Framing radius `max(sizeX, sizeY, height) * 0.9 + 2` in metres.
pub fn framing_radius_m(size_x_mm: f64, size_y_mm: f64, height_mm: f64) -> f64 {
    size_x_mm.max(size_y_mm).max(height_mm) / 1000.0 * 0.9 + 2.0
}

fn camera_hint(size_x: f64, size_y: f64, height: f64) -> CameraHint {
    let r = framing_radius_m(size_x, size_y, height);
    let h_m = height / 1000.0;
    CameraHint {
        radius_m: r,
        eye_m: DVec3::new(r, r, r * 0.85 - h_m * 0.5),
        target_m: DVec3::new(0.0, 0.0, h_m * 0.45 - h_m * 0.5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::braces::BraceSet;
    use crate::catalog::{builtin_catalog, ProfileCatalog};
    use crate::members::enumerate_members;
    use crate::params::AxisInput;

    fn params() -> FrameParams {
        let mut p = FrameParams::default();
        p.grid.x = AxisInput::uniform(3, 6000.0);
        p.grid.y = AxisInput::uniform(2, 8000.0);
        p.levels_mm = vec![4000.0, 8000.0];
        p
    }

    #[test]
    fn test_bounds_and_center() {
        let p = params();
        let scene = SceneModel::build(&p, &[]);
        assert_eq!(scene.bounds.max, DVec3::new(12000.0, 8000.0, 8000.0));
        assert_eq!(scene.bounds.center(), DVec3::new(6000.0, 4000.0, 4000.0));
        assert_eq!(scene.grid_lines.len(), 5);
    }

    #[test]
    fn test_framing_radius() {
        assert!((framing_radius_m(12000.0, 8000.0, 8000.0) - 12.8).abs() < 1e-9);
        assert_eq!(framing_radius_m(0.0, 0.0, 0.0), 2.0);
    }

    #[test]
    fn test_sections_from_dims() {
        let p = params();
        let members = enumerate_members(&p, &BraceSet::new(), &builtin_catalog());
        let scene = SceneModel::build(&p, &members);
        let col = scene.members.iter().find(|m| m.role == MemberRole::Column).unwrap();
        assert_eq!((col.width_mm, col.depth_mm), (300.0, 300.0));
        let beam = scene.members.iter().find(|m| m.role == MemberRole::Beam).unwrap();
        assert_eq!((beam.width_mm, beam.depth_mm), (200.0, 400.0));
    }

    #[test]
    fn test_nominal_sections_without_dims() {
        let p = params();
        let members = enumerate_members(&p, &BraceSet::new(), &ProfileCatalog::new());
        let scene = SceneModel::build(&p, &members);
        let col = scene.members.iter().find(|m| m.role == MemberRole::Column).unwrap();
        assert_eq!((col.width_mm, col.depth_mm), (200.0, 200.0));
        let beam = scene.members.iter().find(|m| m.role == MemberRole::Beam).unwrap();
        assert_eq!((beam.width_mm, beam.depth_mm), (180.0, 220.0));
    }
}
