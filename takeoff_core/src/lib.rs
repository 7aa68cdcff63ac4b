//! # takeoff_core - Steel Quantity Takeoff Engine
//!
//! `takeoff_core` turns a handful of structural-grid parameters (bay spans,
//! level elevations, member profiles, per-member overrides, sub-beams, joists
//! and braces) into an exact bill of quantities and a geometric member list.
//! All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: every recomputation is a full re-derivation from the
//!   current inputs; identical inputs give identical member lists
//! - **Missing data is a value**: an unknown profile gives a `None` mass,
//!   never an error
//! - **Permissive input**: malformed numbers are clamped or dropped
//! - **Typed identities**: members are keyed by [`members::MemberId`], not by
//!   string prefixes
//!
//! ## Quick Start
//!
//! ```rust
//! use takeoff_core::{FrameParams, TakeoffSession};
//! use takeoff_core::catalog::builtin_catalog;
//!
//! let session = TakeoffSession::new(builtin_catalog(), FrameParams::default());
//! let takeoff = session.compute();
//!
//! println!("{}", takeoff.to_tsv());
//! ```
//!
//! ## Modules
//!
//! - [`catalog`] - Steel profile tables (built-in KS / JIS, or JSON)
//! - [`grid`] - Gridline coordinates from counts or span lists
//! - [`levels`] - Level elevations
//! - [`params`] - The immutable takeoff input
//! - [`members`] - Member enumeration and overrides
//! - [`braces`] - Vertical bracing faces
//! - [`quantities`] - Bill of quantities
//! - [`export`] - TSV / CSV / STAAD text
//! - [`session`] - Stateful editing session
//! - [`scene`] - Render envelope for 3D viewers
//! - [`tally`] - Unit-weight calculator and tally list
//! - [`report`] - PDF report
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod braces;
pub mod catalog;
pub mod errors;
pub mod export;
pub mod fmt;
pub mod grid;
pub mod levels;
pub mod members;
pub mod params;
pub mod quantities;
pub mod report;
pub mod scene;
pub mod session;
pub mod tally;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use catalog::{builtin_catalog, ProfileCatalog, ProfileSelection};
pub use errors::{TakeoffError, TakeoffResult};
pub use members::{MemberId, MemberRecord, MemberRole};
pub use params::{load_params, FrameParams};
pub use quantities::{aggregate, QuantityTable};
pub use session::{Takeoff, TakeoffSession};
