//! # Steel Profile Catalog
//!
//! Unit-weight tables for structural steel profiles, organised as
//! standard (KS, JIS, ...) → shape (H, C, L, ...) → ordered list of sizes.
//! The takeoff engine only ever queries the catalog by key; it never mutates it.
//!
//! ## Data Format
//!
//! Catalogs load from JSON in the layout exported from the unit-weight
//! spreadsheets:
//!
//! ```json
//! {
//!   "standards": {
//!     "KS": {
//!       "shapes": {
//!         "H": {
//!           "items": [
//!             { "key": "200x200x8x12", "name": "H-200x200x8x12", "kgm": 49.9 }
//!           ]
//!         }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! The outer `standards` wrapper is optional. `kgm` may be missing or `null`,
//! meaning the unit weight is unknown; that propagates as `None` everywhere and
//! is never coerced to zero.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::catalog::{builtin_catalog, ProfileSelection};
//!
//! let catalog = builtin_catalog();
//! let sel = ProfileSelection::new("KS", "H", "200x200x8x12");
//! let profile = catalog.resolve(&sel);
//! assert_eq!(profile.name, "H-200x200x8x12");
//! assert_eq!(profile.kgm, Some(49.9));
//! ```

pub mod builtin;

pub use builtin::builtin_catalog;

use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{TakeoffError, TakeoffResult};
use crate::fmt::format_display;

/// A (standard, shape, size) triple selecting one catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProfileSelection {
    /// Standard key (e.g. "KS", "JIS")
    pub standard: String,
    /// Shape key within the standard (e.g. "H", "C")
    pub shape: String,
    /// Item key within the shape (e.g. "200x200x8x12")
    pub size: String,
}

impl ProfileSelection {
    /// Create a selection from its three keys
    pub fn new(standard: impl Into<String>, shape: impl Into<String>, size: impl Into<String>) -> Self {
        ProfileSelection {
            standard: standard.into(),
            shape: shape.into(),
            size: size.into(),
        }
    }

    /// True when none of the three keys is blank
    pub fn is_complete(&self) -> bool {
        !self.standard.trim().is_empty() && !self.shape.trim().is_empty() && !self.size.trim().is_empty()
    }
}

impl fmt::Display for ProfileSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.standard, self.shape, self.size)
    }
}

impl FromStr for ProfileSelection {
    type Err = TakeoffError;

    /// Parse `"KS/H/200x200x8x12"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(3, '/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(standard), Some(shape), Some(size)) => {
                let sel = ProfileSelection::new(standard.trim(), shape.trim(), size.trim());
                if sel.is_complete() {
                    Ok(sel)
                } else {
                    Err(TakeoffError::missing_selection(format!("incomplete profile '{}'", s)))
                }
            }
            _ => Err(TakeoffError::invalid_input(
                "profile",
                s,
                "expected STANDARD/SHAPE/SIZE",
            )),
        }
    }
}

/// Structured cross-section dimensions (mm).
///
/// Carried explicitly on catalog items so renderers never have to parse
/// dimensions back out of display names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionDims {
    /// Overall depth (mm)
    pub depth_mm: f64,
    /// Overall width / flange width (mm)
    pub width_mm: f64,
    /// Web (or wall) thickness (mm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_mm: Option<f64>,
    /// Flange thickness (mm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flange_mm: Option<f64>,
}

impl SectionDims {
    /// Dimensions with depth and width only
    pub fn new(depth_mm: f64, width_mm: f64) -> Self {
        SectionDims {
            depth_mm,
            width_mm,
            web_mm: None,
            flange_mm: None,
        }
    }
}

/// One size entry within a shape table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Key, unique within its shape
    pub key: String,
    /// Display name (e.g. "H-200x200x8x12")
    pub name: String,
    /// Unit weight in kg/m; `None` when the table has no value
    #[serde(default)]
    pub kgm: Option<f64>,
    /// Section dimensions, when the table provides them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dims: Option<SectionDims>,
}

impl CatalogItem {
    /// Finite unit weight, if any
    pub fn unit_weight(&self) -> Option<f64> {
        self.kgm.filter(|v| v.is_finite())
    }

    /// Label used in size pickers: `"H-200x200x8x12 · 49.9 kg/m"`
    pub fn option_label(&self) -> String {
        match self.unit_weight() {
            Some(kgm) => format!("{} · {} kg/m", self.name, format_display(kgm, 3)),
            None => self.name.clone(),
        }
    }
}

/// Ordered items for one shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeTable {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

/// Shapes for one standard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardTable {
    #[serde(default)]
    pub shapes: BTreeMap<String, ShapeTable>,
}

/// Result of resolving a [`ProfileSelection`] against the catalog.
///
/// Resolution never fails: an unknown key gives `found == false` and no
/// unit weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedProfile {
    /// Display name (falls back to the size key, or "-" when blank)
    pub name: String,
    /// Unit weight in kg/m
    pub kgm: Option<f64>,
    /// Section dimensions
    pub dims: Option<SectionDims>,
    /// Whether the key was present in the catalog
    pub found: bool,
}

impl ResolvedProfile {
    /// Placeholder for a role with no selection at all
    pub fn unselected() -> Self {
        ResolvedProfile {
            name: "-".to_string(),
            kgm: None,
            dims: None,
            found: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { standards: BTreeMap<String, StandardTable> },
    Bare(BTreeMap<String, StandardTable>),
}

/// Steel profile catalog.
///
/// Shared read-only between sessions (wrap it in an `Arc`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileCatalog {
    standards: BTreeMap<String, StandardTable>,

    /// Catalog version / provenance tag
    pub version: Option<String>,
}

impl ProfileCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from JSON text
    pub fn from_json(json: &str) -> TakeoffResult<Self> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| TakeoffError::serialization(format!("Invalid catalog JSON: {}", e)))?;
        let standards = match file {
            CatalogFile::Wrapped { standards } => standards,
            CatalogFile::Bare(standards) => standards,
        };
        let catalog = ProfileCatalog {
            standards,
            version: None,
        };
        info!(
            standards = catalog.standards.len(),
            items = catalog.len(),
            "Loaded profile catalog"
        );
        Ok(catalog)
    }

    /// Parse a catalog from any reader
    pub fn from_reader(mut reader: impl Read) -> TakeoffResult<Self> {
        let mut contents = String::new();
        reader
            .read_to_string(&mut contents)
            .map_err(|e| TakeoffError::file_error("read", "<reader>", e.to_string()))?;
        Self::from_json(&contents)
    }

    /// Load a catalog JSON file
    pub fn load(path: &Path) -> TakeoffResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TakeoffError::file_error("read", path.display().to_string(), e.to_string()))?;
        let mut catalog = Self::from_json(&contents)?;
        catalog.version = Some(path.display().to_string());
        Ok(catalog)
    }

    /// Serialize to the wrapped JSON layout
    pub fn to_json(&self) -> TakeoffResult<String> {
        #[derive(Serialize)]
        struct Out<'a> {
            standards: &'a BTreeMap<String, StandardTable>,
        }
        Ok(serde_json::to_string_pretty(&Out {
            standards: &self.standards,
        })?)
    }

    /// Append an item to a shape table, creating the standard and shape as needed
    pub fn insert(&mut self, standard: &str, shape: &str, item: CatalogItem) {
        self.standards
            .entry(standard.to_string())
            .or_default()
            .shapes
            .entry(shape.to_string())
            .or_default()
            .items
            .push(item);
    }

    /// Standard keys, KS first, then JIS, then the rest alphabetically
    pub fn standards(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.standards.keys().map(|k| k.as_str()).collect();
        keys.sort_by_key(|k| (standard_rank(k), *k));
        keys
    }

    /// Shape keys for a standard, sorted
    pub fn shapes(&self, standard: &str) -> Vec<&str> {
        self.standards
            .get(standard)
            .map(|s| s.shapes.keys().map(|k| k.as_str()).collect())
            .unwrap_or_default()
    }

    /// Preferred shape for a standard: H when available, else the first
    pub fn default_shape(&self, standard: &str) -> Option<&str> {
        let shapes = self.shapes(standard);
        if shapes.contains(&"H") {
            Some("H")
        } else {
            shapes.first().copied()
        }
    }

    /// Items of a shape in table order (empty when either key is unknown)
    pub fn items(&self, standard: &str, shape: &str) -> &[CatalogItem] {
        self.standards
            .get(standard)
            .and_then(|s| s.shapes.get(shape))
            .map(|t| t.items.as_slice())
            .unwrap_or(&[])
    }

    /// Look up one item
    pub fn item(&self, selection: &ProfileSelection) -> Option<&CatalogItem> {
        self.items(&selection.standard, &selection.shape)
            .iter()
            .find(|it| it.key == selection.size)
    }

    /// Look up one item, failing with `ProfileNotFound`
    pub fn require(&self, selection: &ProfileSelection) -> TakeoffResult<&CatalogItem> {
        self.item(selection).ok_or_else(|| {
            TakeoffError::profile_not_found(&selection.standard, &selection.shape, &selection.size)
        })
    }

    /// Resolve a selection to display name, unit weight and dimensions.
    pub fn resolve(&self, selection: &ProfileSelection) -> ResolvedProfile {
        match self.item(selection) {
            Some(item) => ResolvedProfile {
                name: item.name.clone(),
                kgm: item.unit_weight(),
                dims: item.dims,
                found: true,
            },
            None => {
                debug!(profile = %selection, "Profile not in catalog");
                let name = if selection.size.trim().is_empty() {
                    "-".to_string()
                } else {
                    selection.size.clone()
                };
                ResolvedProfile {
                    name,
                    kgm: None,
                    dims: None,
                    found: false,
                }
            }
        }
    }

    /// Total number of items across all standards and shapes
    pub fn len(&self) -> usize {
        self.standards
            .values()
            .flat_map(|s| s.shapes.values())
            .map(|t| t.items.len())
            .sum()
    }

    /// Check if the catalog has no items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn standard_rank(key: &str) -> u8 {
    match key {
        "KS" => 0,
        "JIS" => 1,
        _ => 99,
    }
}

/// Human label for a standard key
pub fn standard_label(key: &str) -> &str {
    match key {
        "KS" => "KR · KS",
        "JIS" => "JP · JIS",
        other => other,
    }
}

/// Human label for a shape key, when it is a known family
pub fn shape_label(key: &str) -> Option<&'static str> {
    match key {
        "H" => Some("H-beam"),
        "C" => Some("C-channel"),
        "L" => Some("L-angle"),
        "LC" => Some("Lipped C"),
        "Rect" => Some("Rectangular tube"),
        "I" => Some("I-beam"),
        "T" => Some("T-bar"),
        _ => None,
    }
}

/// Shape picker label: `"H-beam (H)"`, or the bare key for unknown families
pub fn shape_option_label(key: &str) -> String {
    match shape_label(key) {
        Some(label) => format!("{} ({})", label, key),
        None => key.to_string(),
    }
}
