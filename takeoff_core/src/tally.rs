//! # Unit-Weight Calculator and Tally List
//!
//! Quick weight lookups outside the frame model: pick a profile, give a
//! length, get kilograms and tonnes. Results can be collected into a
//! [`Tally`], a running list with its own totals and TSV export.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::catalog::{builtin_catalog, ProfileSelection};
//! use takeoff_core::tally::{unit_weight, Tally};
//!
//! let catalog = builtin_catalog();
//! let sel = ProfileSelection::new("KS", "H", "200x200x8x12");
//!
//! let w = unit_weight(&catalog, &sel, 6.0, None);
//! assert!((w.kg.unwrap() - 299.4).abs() < 1e-9);
//!
//! let mut tally = Tally::new();
//! tally.add(&catalog, &sel, 6.0, None).unwrap();
//! assert!((tally.totals().kg - 299.4).abs() < 1e-9);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::catalog::{shape_label, standard_label, ProfileCatalog, ProfileSelection};
use crate::errors::{TakeoffError, TakeoffResult};
use crate::fmt::format_decimal;
use crate::units::{KgPerMeter, Kilograms, Meters, Tonnes};

/// Weight of one profile over one length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitWeight {
    /// Display name of the profile
    pub name: String,
    /// Unit weight used (kg/m)
    pub kgm: Option<f64>,
    /// Length (m), clamped to >= 0
    pub length_m: f64,
    pub kg: Option<f64>,
    pub t: Option<f64>,
    /// Whether `kgm` came from the user rather than the catalog
    pub custom: bool,
}

fn clamp_length(length_m: f64) -> f64 {
    if length_m.is_finite() {
        length_m.max(0.0)
    } else {
        0.0
    }
}

/// Weight of `selection` over `length_m`.
///
/// `custom_kgm`, when given, replaces the catalog unit weight; a non-finite
/// custom value counts as unknown. Unknown unit weight gives `None` weights.
pub fn unit_weight(
    catalog: &ProfileCatalog,
    selection: &ProfileSelection,
    length_m: f64,
    custom_kgm: Option<f64>,
) -> UnitWeight {
    let resolved = catalog.resolve(selection);
    let length_m = clamp_length(length_m);
    let (kgm, custom) = match custom_kgm {
        Some(v) => (Some(v).filter(|v| v.is_finite()), true),
        None => (resolved.kgm, false),
    };
    let kg = kgm.map(|k| KgPerMeter(k).over(Meters(length_m)));
    UnitWeight {
        name: resolved.name,
        kgm,
        length_m,
        kg: kg.map(|m| m.value()),
        t: kg.map(|m| Tonnes::from(m).value()),
        custom,
    }
}

/// One line of the tally list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyItem {
    pub id: Uuid,
    pub selection: ProfileSelection,
    pub name: String,
    /// Unit weight (kg/m), always known
    pub kgm: f64,
    /// Length (m), >= 0
    pub length_m: f64,
    pub added_at: DateTime<Utc>,
}

impl TallyItem {
    pub fn total_kg(&self) -> f64 {
        KgPerMeter(self.kgm).over(Meters(self.length_m)).value()
    }

    pub fn total_t(&self) -> f64 {
        Tonnes::from(Kilograms(self.total_kg())).value()
    }
}

/// Tally totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TallyTotals {
    pub kg: f64,
    pub t: f64,
}

/// Running list of weighed profiles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    items: Vec<TallyItem>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line.
    ///
    /// # Errors
    ///
    /// * `MissingSelection` when any of the three keys is blank
    /// * `ProfileNotFound` when the catalog has no such item
    /// * `UnknownMass` when neither the catalog nor `custom_kgm` gives a unit weight
    pub fn add(
        &mut self,
        catalog: &ProfileCatalog,
        selection: &ProfileSelection,
        length_m: f64,
        custom_kgm: Option<f64>,
    ) -> TakeoffResult<Uuid> {
        if !selection.is_complete() {
            return Err(TakeoffError::missing_selection("standard, shape and size are required"));
        }
        let item = catalog.require(selection)?;
        let kgm = match custom_kgm {
            Some(v) => Some(v).filter(|v| v.is_finite()),
            None => item.unit_weight(),
        }
        .ok_or_else(|| TakeoffError::unknown_mass(item.name.clone()))?;

        let id = Uuid::new_v4();
        self.items.push(TallyItem {
            id,
            selection: selection.clone(),
            name: item.name.clone(),
            kgm,
            length_m: clamp_length(length_m),
            added_at: Utc::now(),
        });
        debug!(%id, profile = %selection, "Added tally item");
        Ok(id)
    }

    /// Remove a line by id
    pub fn remove(&mut self, id: Uuid) -> Option<TallyItem> {
        let pos = self.items.iter().position(|it| it.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Change the length of a line (clamped to >= 0). Returns false for unknown ids.
    pub fn set_length(&mut self, id: Uuid, length_m: f64) -> bool {
        match self.items.iter_mut().find(|it| it.id == id) {
            Some(item) => {
                item.length_m = clamp_length(length_m);
                true
            }
            None => false,
        }
    }

    pub fn items(&self) -> &[TallyItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn totals(&self) -> TallyTotals {
        let kg: Kilograms = self.items.iter().map(|it| Kilograms(it.total_kg())).sum();
        TallyTotals {
            kg: kg.value(),
            t: Tonnes::from(kg).value(),
        }
    }

    /// Tab-separated list with a trailing TOTAL row.
    pub fn to_tsv(&self) -> String {
        let mut lines = vec!["standard\tshape\tsize\tkg_per_m\tlength_m\ttotal_kg\ttotal_ton".to_string()];
        for it in &self.items {
            lines.push(
                [
                    standard_label(&it.selection.standard).to_string(),
                    shape_label(&it.selection.shape)
                        .unwrap_or(&it.selection.shape)
                        .to_string(),
                    it.name.clone(),
                    format_decimal(it.kgm, 3),
                    format_decimal(it.length_m, 3),
                    format_decimal(it.total_kg(), 3),
                    format_decimal(it.total_t(), 6),
                ]
                .join("\t"),
            );
        }
        let totals = self.totals();
        lines.push(format!(
            "TOTAL\t\t\t\t\t{}\t{}",
            format_decimal(totals.kg, 3),
            format_decimal(totals.t, 6)
        ));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_catalog;

    fn h200() -> ProfileSelection {
        ProfileSelection::new("KS", "H", "200x200x8x12")
    }

    #[test]
    fn test_unit_weight_from_catalog() {
        let w = unit_weight(&builtin_catalog(), &h200(), 10.0, None);
        assert_eq!(w.kgm, Some(49.9));
        assert!((w.kg.unwrap() - 499.0).abs() < 1e-9);
        assert!((w.t.unwrap() - 0.499).abs() < 1e-12);
        assert!(!w.custom);
    }

    #[test]
    fn test_unit_weight_custom_kgm() {
        let w = unit_weight(&builtin_catalog(), &h200(), 2.0, Some(10.0));
        assert_eq!(w.kg, Some(20.0));
        assert!(w.custom);

        let w = unit_weight(&builtin_catalog(), &h200(), 2.0, Some(f64::NAN));
        assert_eq!(w.kg, None);
    }

    #[test]
    fn test_unit_weight_unknown() {
        let t = ProfileSelection::new("KS", "T", "100x100x5.5x8");
        let w = unit_weight(&builtin_catalog(), &t, 3.0, None);
        assert_eq!(w.kgm, None);
        assert_eq!(w.kg, None);
        assert_eq!(w.t, None);
    }

    #[test]
    fn test_negative_length_clamps() {
        let w = unit_weight(&builtin_catalog(), &h200(), -4.0, None);
        assert_eq!(w.length_m, 0.0);
        assert_eq!(w.kg, Some(0.0));
    }

    #[test]
    fn test_add_errors() {
        let catalog = builtin_catalog();
        let mut tally = Tally::new();

        let err = tally.add(&catalog, &ProfileSelection::new("KS", "", "x"), 1.0, None).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_SELECTION");

        let err = tally.add(&catalog, &ProfileSelection::new("KS", "H", "nope"), 1.0, None).unwrap_err();
        assert_eq!(err.error_code(), "PROFILE_NOT_FOUND");

        let t = ProfileSelection::new("KS", "T", "100x100x5.5x8");
        let err = tally.add(&catalog, &t, 1.0, None).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_MASS");
        assert!(err.is_recoverable());

        // a custom unit weight makes the T-bar addable
        assert!(tally.add(&catalog, &t, 1.0, Some(12.0)).is_ok());
        assert_eq!(tally.len(), 1);
    }

    #[test]
    fn test_edit_and_remove() {
        let catalog = builtin_catalog();
        let mut tally = Tally::new();
        let a = tally.add(&catalog, &h200(), 2.0, None).unwrap();
        let b = tally.add(&catalog, &ProfileSelection::new("KS", "C", "100x50x5x7.5"), 10.0, None).unwrap();

        assert!(tally.set_length(a, -3.0));
        assert_eq!(tally.items()[0].length_m, 0.0);
        assert!(!tally.set_length(Uuid::new_v4(), 1.0));

        assert!((tally.totals().kg - 93.6).abs() < 1e-9);
        assert!(tally.remove(b).is_some());
        assert!(tally.remove(b).is_none());
        assert_eq!(tally.totals(), TallyTotals { kg: 0.0, t: 0.0 });
    }

    #[test]
    fn test_tsv() {
        let catalog = builtin_catalog();
        let mut tally = Tally::new();
        tally.add(&catalog, &h200(), 2.0, None).unwrap();
        let tsv = tally.to_tsv();
        let lines: Vec<&str> = tsv.lines().collect();
        assert_eq!(lines[0], "standard\tshape\tsize\tkg_per_m\tlength_m\ttotal_kg\ttotal_ton");
        assert_eq!(lines[1], "KR · KS\tH-beam\tH-200x200x8x12\t49.9\t2\t99.8\t0.0998");
        assert_eq!(lines[2], "TOTAL\t\t\t\t\t99.8\t0.0998");
    }
}
