use std::collections::HashMap;

use tracing::debug;

use crate::fmt::format_decimal;
use crate::members::MemberRecord;

/// STAAD-style input block: joints and member incidences, geometry only.
///
/// Coordinates are written in metres with Y vertical, so a model point
/// (x, y, z) becomes joint (x, z, y). Coincident endpoints share a joint;
/// joints are numbered in first-seen order. Zero-length members are left out.
pub fn to_staad(members: &[MemberRecord]) -> String {
    let mut joints: Vec<[f64; 3]> = Vec::new();
    let mut index: HashMap<[i64; 3], usize> = HashMap::new();
    let mut incidences: Vec<(usize, usize)> = Vec::with_capacity(members.len());

    let mut joint_of = |p: glam::DVec3, key: [i64; 3]| -> usize {
        *index.entry(key).or_insert_with(|| {
            joints.push([p.x / 1000.0, p.z / 1000.0, p.y / 1000.0]);
            joints.len()
        })
    };

    for m in members {
        let (ka, kb) = (joint_key(m.a), joint_key(m.b));
        if ka == kb {
            debug!(id = %m.id, "Skipping zero-length member in STAAD export");
            continue;
        }
        let a = joint_of(m.a, ka);
        let b = joint_of(m.b, kb);
        incidences.push((a, b));
    }

    let mut out = String::new();
    out.push_str("STAAD SPACE\n");
    out.push_str("* steelgrid takeoff - geometry only, no loads or supports\n");
    out.push_str("UNIT METER KN\n");
    out.push_str("JOINT COORDINATES\n");
    for (i, [x, y, z]) in joints.iter().enumerate() {
        out.push_str(&format!(
            "{} {} {} {};\n",
            i + 1,
            format_decimal(*x, 4),
            format_decimal(*y, 4),
            format_decimal(*z, 4)
        ));
    }
    out.push_str("MEMBER INCIDENCES\n");
    for (i, (a, b)) in incidences.iter().enumerate() {
        out.push_str(&format!("{} {} {};\n", i + 1, a, b));
    }
    out.push_str("FINISH\n");
    out
}

/// Micrometre grid so float noise does not split joints
fn joint_key(p: glam::DVec3) -> [i64; 3] {
    [
        (p.x * 1000.0).round() as i64,
        (p.y * 1000.0).round() as i64,
        (p.z * 1000.0).round() as i64,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::members::{EffectiveProfile, Elevation, MemberId};
    use glam::DVec3;

    fn seg(id: MemberId, a: DVec3, b: DVec3) -> MemberRecord {
        MemberRecord::new(
            id,
            a,
            b,
            EffectiveProfile {
                selection: None,
                name: "-".into(),
                kgm: None,
                dims: None,
            },
        )
    }

    #[test]
    fn test_shared_joints_and_axis_swap() {
        let z = Elevation(4000.0);
        let members = vec![
            seg(MemberId::Column { ix: 0, iy: 0 }, DVec3::ZERO, DVec3::new(0.0, 0.0, 4000.0)),
            seg(MemberId::Column { ix: 1, iy: 0 }, DVec3::new(6000.0, 0.0, 0.0), DVec3::new(6000.0, 0.0, 4000.0)),
            seg(
                MemberId::BeamX { z, iy: 0, ix: 0 },
                DVec3::new(0.0, 0.0, 4000.0),
                DVec3::new(6000.0, 0.0, 4000.0),
            ),
        ];
        let text = to_staad(&members);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "STAAD SPACE");
        assert!(lines.contains(&"1 0 0 0;"));
        assert!(lines.contains(&"2 0 4 0;"));
        assert!(lines.contains(&"3 6 0 0;"));
        assert!(lines.contains(&"4 6 4 0;"));
        assert!(lines.contains(&"3 2 4;"));
        assert_eq!(lines.last(), Some(&"FINISH"));
        // 4 joints, not 6
        assert!(!text.contains("\n5 "));
    }

    #[test]
    fn test_zero_length_skipped() {
        let members = vec![seg(MemberId::Column { ix: 0, iy: 0 }, DVec3::ZERO, DVec3::ZERO)];
        let text = to_staad(&members);
        let after = text.split("MEMBER INCIDENCES\n").nth(1).unwrap();
        assert_eq!(after, "FINISH\n");
        // no joints left behind by the skipped member
        assert!(text.contains("JOINT COORDINATES\nMEMBER INCIDENCES\n"));
    }

    #[test]
    fn test_zero_length_columns_leave_no_joints() {
        let members = vec![
            seg(MemberId::Column { ix: 0, iy: 0 }, DVec3::ZERO, DVec3::ZERO),
            seg(
                MemberId::Column { ix: 1, iy: 0 },
                DVec3::new(6000.0, 0.0, 0.0),
                DVec3::new(6000.0, 0.0, 0.0),
            ),
            seg(
                MemberId::BeamX { z: Elevation(4000.0), iy: 0, ix: 0 },
                DVec3::new(0.0, 0.0, 4000.0),
                DVec3::new(6000.0, 0.0, 4000.0),
            ),
        ];
        let text = to_staad(&members);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.contains(&"1 0 4 0;"));
        assert!(lines.contains(&"2 6 4 0;"));
        assert!(!text.contains("\n3 "));
        assert!(lines.contains(&"1 1 2;"));
    }
}
