//! # Quantity Aggregation
//!
//! Groups members by (category, profile display name) and sums count,
//! length and mass. Rows keep the order in which their key first appears in
//! the member list, so the table follows enumeration order (columns, beams,
//! sub-beams, joists, braces).
//!
//! ## Unknown mass
//!
//! A member whose profile has no unit weight contributes 0 kg to its row.
//! A row is reported with `mass_kg: None` only when *none* of its members has
//! a known mass; grand totals are likewise `None` only when every row is.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::members::{MemberRecord, MemberRole};
use crate::units::{Kilograms, Tonnes};

/// One line of the bill of quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityRow {
    pub role: MemberRole,
    /// Category label ("COLUMN", "BEAM", ...)
    pub category: String,
    /// Profile display name
    pub profile: String,
    pub count: usize,
    /// Total length (m)
    pub length_m: f64,
    /// Total mass (kg), `None` when no member of the row has a known mass
    pub mass_kg: Option<f64>,
}

/// Grand totals over all rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub count: usize,
    pub length_m: f64,
    pub mass_kg: Option<f64>,
    pub mass_t: Option<f64>,
}

/// Aggregated table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantityTable {
    pub rows: Vec<QuantityRow>,
    pub totals: Totals,
}

impl QuantityTable {
    /// Rows of one category
    pub fn rows_for(&self, role: MemberRole) -> impl Iterator<Item = &QuantityRow> {
        self.rows.iter().filter(move |r| r.role == role)
    }

    /// Member count of one category
    pub fn count_for(&self, role: MemberRole) -> usize {
        self.rows_for(role).map(|r| r.count).sum()
    }

    /// Length (m) of one category
    pub fn length_for(&self, role: MemberRole) -> f64 {
        self.rows_for(role).map(|r| r.length_m).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Default)]
struct Accumulator {
    count: usize,
    length_mm: f64,
    mass_kg: f64,
    any_mass: bool,
}

/// Aggregate members into a [`QuantityTable`].
pub fn aggregate(members: &[MemberRecord]) -> QuantityTable {
    let mut groups: IndexMap<(MemberRole, &str), Accumulator> = IndexMap::new();

    for member in members {
        let acc = groups
            .entry((member.role, member.profile.name.as_str()))
            .or_default();
        acc.count += 1;
        acc.length_mm += member.length_mm();
        if let Some(mass) = member.mass_kg() {
            acc.mass_kg += mass;
            acc.any_mass = true;
        }
    }

    let rows: Vec<QuantityRow> = groups
        .into_iter()
        .map(|((role, profile), acc)| QuantityRow {
            role,
            category: role.label().to_string(),
            profile: profile.to_string(),
            count: acc.count,
            length_m: acc.length_mm / 1000.0,
            mass_kg: acc.any_mass.then_some(acc.mass_kg),
        })
        .collect();

    let totals = totals(&rows);
    QuantityTable { rows, totals }
}

fn totals(rows: &[QuantityRow]) -> Totals {
    let mass_kg = if rows.iter().any(|r| r.mass_kg.is_some()) {
        Some(rows.iter().filter_map(|r| r.mass_kg).map(Kilograms).sum::<Kilograms>())
    } else {
        None
    };
    Totals {
        count: rows.iter().map(|r| r.count).sum(),
        length_m: rows.iter().map(|r| r.length_m).sum(),
        mass_kg: mass_kg.map(|m| m.value()),
        mass_t: mass_kg.map(|m| Tonnes::from(m).value()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::members::{EffectiveProfile, Elevation, MemberId};
    use glam::DVec3;
    use pretty_assertions::assert_eq;

    fn member(id: MemberId, len: f64, name: &str, kgm: Option<f64>) -> MemberRecord {
        MemberRecord::new(
            id,
            DVec3::ZERO,
            DVec3::new(len, 0.0, 0.0),
            EffectiveProfile {
                selection: None,
                name: name.to_string(),
                kgm,
                dims: None,
            },
        )
    }

    fn col(ix: usize, len: f64, name: &str, kgm: Option<f64>) -> MemberRecord {
        member(MemberId::Column { ix, iy: 0 }, len, name, kgm)
    }

    fn beam(ix: usize, len: f64, name: &str, kgm: Option<f64>) -> MemberRecord {
        member(MemberId::BeamX { z: Elevation(4000.0), iy: 0, ix }, len, name, kgm)
    }

    #[test]
    fn test_groups_by_role_and_profile() {
        let members = vec![
            col(0, 4000.0, "H-300", Some(94.0)),
            beam(0, 6000.0, "H-400", Some(66.0)),
            col(1, 4000.0, "H-300", Some(94.0)),
            col(2, 4000.0, "H-200", Some(49.9)),
            beam(1, 6000.0, "H-300", Some(94.0)),
        ];
        let table = aggregate(&members);
        let keys: Vec<(&str, &str, usize)> = table
            .rows
            .iter()
            .map(|r| (r.category.as_str(), r.profile.as_str(), r.count))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("COLUMN", "H-300", 2),
                ("BEAM", "H-400", 1),
                ("COLUMN", "H-200", 1),
                ("BEAM", "H-300", 1),
            ]
        );
        assert_eq!(table.rows[0].length_m, 8.0);
        assert!((table.rows[0].mass_kg.unwrap() - 752.0).abs() < 1e-9);
        assert_eq!(table.totals.count, 5);
        assert_eq!(table.totals.length_m, 24.0);
    }

    #[test]
    fn test_row_with_no_mass_is_null() {
        let members = vec![col(0, 4000.0, "X", None), col(1, 4000.0, "X", None)];
        let table = aggregate(&members);
        assert_eq!(table.rows[0].mass_kg, None);
        assert_eq!(table.totals.mass_kg, None);
        assert_eq!(table.totals.mass_t, None);
        assert_eq!(table.totals.length_m, 8.0);
    }

    #[test]
    fn test_partial_mass_row_not_null() {
        // same display name, one member resolved with weight and one without
        let members = vec![col(0, 1000.0, "P", Some(10.0)), col(1, 1000.0, "P", None)];
        let table = aggregate(&members);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].mass_kg, Some(10.0));
    }

    #[test]
    fn test_totals_skip_null_rows() {
        let members = vec![col(0, 2000.0, "A", Some(50.0)), beam(0, 3000.0, "B", None)];
        let table = aggregate(&members);
        assert_eq!(table.rows[1].mass_kg, None);
        assert_eq!(table.totals.mass_kg, Some(100.0));
        assert_eq!(table.totals.mass_t, Some(0.1));
    }

    #[test]
    fn test_empty_members() {
        let table = aggregate(&[]);
        assert!(table.is_empty());
        assert_eq!(table.totals, Totals::default());
    }

    #[test]
    fn test_category_helpers() {
        let members = vec![col(0, 4000.0, "A", None), col(1, 4000.0, "B", None), beam(0, 6000.0, "A", None)];
        let table = aggregate(&members);
        assert_eq!(table.count_for(MemberRole::Column), 2);
        assert_eq!(table.length_for(MemberRole::Column), 8.0);
        assert_eq!(table.count_for(MemberRole::Brace), 0);
    }
}
