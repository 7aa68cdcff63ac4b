//! # Takeoff Session
//!
//! The one stateful object. A session owns the current [`FrameParams`], the
//! per-member override map and the brace set, and recomputes everything from
//! scratch on [`TakeoffSession::compute`]. Nothing is persisted; dropping the
//! session discards overrides and braces.
//!
//! ```text
//! TakeoffSession
//! ├── catalog: Arc<ProfileCatalog>   (shared, read-only)
//! ├── params: FrameParams
//! ├── overrides: MemberId → ProfileSelection
//! └── braces: BraceSet
//! ```
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::catalog::{builtin_catalog, ProfileSelection};
//! use takeoff_core::members::{MemberId, MemberRole};
//! use takeoff_core::params::FrameParams;
//! use takeoff_core::session::TakeoffSession;
//!
//! let mut session = TakeoffSession::new(builtin_catalog(), FrameParams::default());
//! session.set_override(
//!     MemberId::Column { ix: 0, iy: 0 },
//!     ProfileSelection::new("KS", "H", "200x200x8x12"),
//! );
//!
//! let takeoff = session.compute();
//! assert_eq!(takeoff.table.count_for(MemberRole::Column), 9);
//! assert_eq!(takeoff.table.rows_for(MemberRole::Column).count(), 2);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::braces::{BraceKind, BraceSet, BraceSpec, FaceKey};
use crate::catalog::{builtin_catalog, ProfileCatalog, ProfileSelection};
use crate::export::{members_to_csv, to_staad, to_tsv};
use crate::members::{apply_overrides, enumerate_members, MemberId, MemberRecord};
use crate::params::FrameParams;
use crate::quantities::{aggregate, QuantityTable};
use crate::scene::SceneModel;

/// Result of one recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Takeoff {
    /// Every member with its effective profile
    pub members: Vec<MemberRecord>,
    /// Bill of quantities
    pub table: QuantityTable,
}

impl Takeoff {
    /// Quantity table as TSV
    pub fn to_tsv(&self) -> String {
        to_tsv(&self.table)
    }

    /// Member list as CSV
    pub fn to_csv(&self) -> String {
        members_to_csv(&self.members)
    }

    /// STAAD-style geometry
    pub fn to_staad(&self) -> String {
        to_staad(&self.members)
    }
}

/// Editing session over one frame.
#[derive(Debug, Clone)]
pub struct TakeoffSession {
    id: Uuid,
    catalog: Arc<ProfileCatalog>,
    params: FrameParams,
    overrides: BTreeMap<MemberId, ProfileSelection>,
    braces: BraceSet,
}

impl TakeoffSession {
    /// Start a session with the given catalog and params
    pub fn new(catalog: Arc<ProfileCatalog>, params: FrameParams) -> Self {
        let id = Uuid::new_v4();
        info!(session = %id, catalog_items = catalog.len(), "Started takeoff session");
        TakeoffSession {
            id,
            catalog,
            params,
            overrides: BTreeMap::new(),
            braces: BraceSet::new(),
        }
    }

    /// Session over the built-in catalog with default params
    pub fn with_builtin() -> Self {
        Self::new(builtin_catalog(), FrameParams::default())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn catalog(&self) -> &ProfileCatalog {
        &self.catalog
    }

    pub fn params(&self) -> &FrameParams {
        &self.params
    }

    /// Replace the params. Overrides and braces are kept and re-matched by id.
    pub fn set_params(&mut self, params: FrameParams) {
        self.params = params;
    }

    /// Edit the params in place
    pub fn update_params(&mut self, edit: impl FnOnce(&mut FrameParams)) {
        edit(&mut self.params);
    }

    /// Pin a member to a specific profile
    pub fn set_override(&mut self, id: MemberId, selection: ProfileSelection) {
        debug!(member = %id, profile = %selection, "Set override");
        self.overrides.insert(id, selection);
    }

    /// Drop the override for one member
    pub fn clear_override(&mut self, id: &MemberId) -> Option<ProfileSelection> {
        self.overrides.remove(id)
    }

    /// Drop every override
    pub fn reset_overrides(&mut self) {
        self.overrides.clear();
    }

    pub fn overrides(&self) -> &BTreeMap<MemberId, ProfileSelection> {
        &self.overrides
    }

    /// Add a brace on `face`, or remove the one already there.
    ///
    /// Returns `true` when a brace was added.
    pub fn toggle_brace(&mut self, face: FaceKey, kind: BraceKind, profile: Option<ProfileSelection>) -> bool {
        let added = self.braces.toggle(face, kind, profile);
        debug!(face = %face, added, "Toggled brace");
        added
    }

    pub fn remove_brace(&mut self, face: &FaceKey) -> Option<BraceSpec> {
        self.braces.remove(face)
    }

    pub fn clear_braces(&mut self) {
        self.braces.clear();
    }

    pub fn braces(&self) -> &BraceSet {
        &self.braces
    }

    /// Back to default params with no overrides or braces
    pub fn reset(&mut self) {
        info!(session = %self.id, "Reset takeoff session");
        self.params = FrameParams::default();
        self.overrides.clear();
        self.braces.clear();
    }

    /// Enumerate members, apply overrides and aggregate.
    pub fn compute(&self) -> Takeoff {
        let mut members = enumerate_members(&self.params, &self.braces, &self.catalog);
        apply_overrides(&mut members, &self.overrides, &self.catalog);
        let table = aggregate(&members);
        debug!(
            session = %self.id,
            members = members.len(),
            rows = table.rows.len(),
            "Computed takeoff"
        );
        Takeoff { members, table }
    }

    /// Render envelope for the current state
    pub fn scene(&self) -> SceneModel {
        let takeoff = self.compute();
        SceneModel::build(&self.params, &takeoff.members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::braces::FaceAxis;
    use crate::members::MemberRole;
    use crate::params::AxisInput;

    fn session() -> TakeoffSession {
        let mut params = FrameParams::default();
        params.grid.x = AxisInput::uniform(2, 6000.0);
        params.grid.y = AxisInput::uniform(2, 6000.0);
        params.levels_mm = vec![4000.0];
        TakeoffSession::new(builtin_catalog(), params)
    }

    #[test]
    fn test_compute_default_frame() {
        let takeoff = session().compute();
        assert_eq!(takeoff.table.count_for(MemberRole::Column), 4);
        assert_eq!(takeoff.table.count_for(MemberRole::Beam), 4);
        assert_eq!(takeoff.table.length_for(MemberRole::Column), 16.0);
        assert_eq!(takeoff.members.len(), 8);
    }

    #[test]
    fn test_override_moves_one_member() {
        let mut s = session();
        let before = s.compute();
        s.set_override(
            MemberId::Column { ix: 0, iy: 0 },
            ProfileSelection::new("KS", "H", "200x200x8x12"),
        );
        let after = s.compute();

        let col_rows: Vec<_> = after.table.rows_for(MemberRole::Column).collect();
        assert_eq!(col_rows.len(), 2);
        assert_eq!(col_rows[0].count, 1);
        assert_eq!(col_rows[0].profile, "H-200x200x8x12");
        assert_eq!(col_rows[1].count, 3);
        assert_eq!(before.table.rows_for(MemberRole::Column).count(), 1);

        assert!(s.clear_override(&MemberId::Column { ix: 0, iy: 0 }).is_some());
        assert_eq!(s.compute(), before);
    }

    #[test]
    fn test_toggle_brace_twice_restores() {
        let mut s = session();
        let before = s.compute();
        let face = FaceKey::new(FaceAxis::X, 0, 0, 4000.0);
        assert!(s.toggle_brace(face, BraceKind::X, None));
        assert_eq!(s.compute().table.count_for(MemberRole::Brace), 2);
        assert!(!s.toggle_brace(face, BraceKind::X, None));
        assert_eq!(s.compute(), before);
    }

    #[test]
    fn test_overrides_survive_param_change() {
        let mut s = session();
        let id = MemberId::Column { ix: 1, iy: 1 };
        s.set_override(id, ProfileSelection::new("KS", "H", "200x200x8x12"));
        s.update_params(|p| p.grid.x = AxisInput::uniform(1, 6000.0));
        // column (1, 1) no longer exists
        let takeoff = s.compute();
        assert_eq!(takeoff.table.rows_for(MemberRole::Column).count(), 1);
        s.update_params(|p| p.grid.x = AxisInput::uniform(3, 6000.0));
        assert_eq!(s.compute().table.rows_for(MemberRole::Column).count(), 2);
        assert_eq!(s.overrides().len(), 1);
    }

    #[test]
    fn test_reset() {
        let mut s = session();
        s.set_override(MemberId::Column { ix: 0, iy: 0 }, ProfileSelection::new("KS", "H", "x"));
        s.toggle_brace(FaceKey::new(FaceAxis::Y, 0, 0, 4000.0), BraceKind::Chevron, None);
        s.reset();
        assert!(s.overrides().is_empty());
        assert!(s.braces().is_empty());
        assert_eq!(s.params(), &FrameParams::default());
    }

    #[test]
    fn test_reset_overrides_and_clear_braces() {
        let mut s = session();
        s.set_override(MemberId::Column { ix: 0, iy: 0 }, ProfileSelection::new("KS", "H", "x"));
        s.toggle_brace(FaceKey::new(FaceAxis::Y, 0, 0, 4000.0), BraceKind::X, None);
        s.reset_overrides();
        s.clear_braces();
        assert!(s.overrides().is_empty());
        assert!(s.braces().is_empty());
    }

    #[test]
    fn test_unknown_override_profile_nulls_mass() {
        let mut s = session();
        s.set_override(MemberId::Column { ix: 0, iy: 0 }, ProfileSelection::new("KS", "H", "nope"));
        let takeoff = s.compute();
        let row = takeoff
            .table
            .rows
            .iter()
            .find(|r| r.profile == "nope")
            .unwrap();
        assert_eq!(row.mass_kg, None);
        assert!(takeoff.table.totals.mass_kg.is_some());
    }

    #[test]
    fn test_exports_from_takeoff() {
        let takeoff = session().compute();
        assert!(takeoff.to_tsv().starts_with("category\t"));
        assert_eq!(takeoff.to_csv().lines().count(), 9);
        assert!(takeoff.to_staad().contains("MEMBER INCIDENCES"));
    }
}
