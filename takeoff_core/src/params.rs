//! # Frame Parameters
//!
//! The immutable input to one takeoff run. The CLI (or any other front end)
//! builds a `FrameParams`, hands it to a [`TakeoffSession`](crate::session::TakeoffSession),
//! and every recomputation derives members and quantities from it alone.
//!
//! Params serialize to human-readable JSON:
//!
//! ```text
//! FrameParams
//! ├── version: schema version string
//! ├── grid: { x: AxisInput, y: AxisInput }
//! ├── levels_mm: absolute elevations
//! ├── profiles: RoleProfiles (column, beam, sub_beam, joist, brace)
//! ├── sub_beams_per_bay
//! ├── joists: JoistOptions
//! └── settings: DraftSettings
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::ProfileSelection;
use crate::errors::{TakeoffError, TakeoffResult};
use crate::grid::{build_axis, AxisLayout, GridSpec};
use crate::levels::{resolve_levels, LevelSet};

/// Current schema version for params files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Input for one grid axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisInput {
    /// Gridline count (used when `spans` is empty or unusable)
    pub count: u32,
    /// Uniform bay spacing (mm)
    pub spacing_mm: f64,
    /// Explicit comma-separated bay spans (mm), e.g. "6000,8000,6000"
    #[serde(default)]
    pub spans: String,
}

impl AxisInput {
    /// Uniform axis
    pub fn uniform(count: u32, spacing_mm: f64) -> Self {
        AxisInput {
            count,
            spacing_mm,
            spans: String::new(),
        }
    }

    /// Axis from an explicit span list
    pub fn explicit(spans: impl Into<String>) -> Self {
        AxisInput {
            count: 1,
            spacing_mm: 6000.0,
            spans: spans.into(),
        }
    }

    /// Resolve into gridline coordinates
    pub fn layout(&self) -> AxisLayout {
        build_axis(self.count, self.spacing_mm, &self.spans)
    }
}

impl Default for AxisInput {
    fn default() -> Self {
        AxisInput::uniform(3, 6000.0)
    }
}

/// Both axis inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridInput {
    pub x: AxisInput,
    pub y: AxisInput,
}

/// Profile selection per member role. `None` means "not selected yet",
/// which resolves to an unknown mass rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleProfiles {
    #[serde(default)]
    pub column: Option<ProfileSelection>,
    #[serde(default)]
    pub beam: Option<ProfileSelection>,
    #[serde(default)]
    pub sub_beam: Option<ProfileSelection>,
    #[serde(default)]
    pub joist: Option<ProfileSelection>,
    #[serde(default)]
    pub brace: Option<ProfileSelection>,
}

impl Default for RoleProfiles {
    fn default() -> Self {
        RoleProfiles {
            column: Some(ProfileSelection::new("KS", "H", "300x300x10x15")),
            beam: Some(ProfileSelection::new("KS", "H", "400x200x8x13")),
            sub_beam: Some(ProfileSelection::new("KS", "H", "250x125x6x9")),
            joist: Some(ProfileSelection::new("KS", "C", "100x50x5x7.5")),
            brace: Some(ProfileSelection::new("KS", "L", "75x75x6")),
        }
    }
}

impl RoleProfiles {
    /// Every role left unselected
    pub fn none() -> Self {
        RoleProfiles {
            column: None,
            beam: None,
            sub_beam: None,
            joist: None,
            brace: None,
        }
    }
}

/// Joist infill options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoistOptions {
    /// Whether joists are generated at all
    #[serde(default)]
    pub enabled: bool,
    /// Spacing override (mm); falls back to [`DraftSettings::joist_spacing_mm`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing_mm: Option<f64>,
}

/// Drafting defaults that are configuration, not geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftSettings {
    /// Storey height used when adding a level (mm)
    pub default_level_height_mm: f64,
    /// Default joist spacing (mm)
    pub joist_spacing_mm: f64,
    /// Render size for column sections without dimensions (mm)
    pub nominal_column_mm: f64,
    /// Render width for beam sections without dimensions (mm)
    pub nominal_beam_width_mm: f64,
    /// Render depth for beam sections without dimensions (mm)
    pub nominal_beam_depth_mm: f64,
}

impl Default for DraftSettings {
    fn default() -> Self {
        DraftSettings {
            default_level_height_mm: 4200.0,
            joist_spacing_mm: 700.0,
            nominal_column_mm: 200.0,
            nominal_beam_width_mm: 180.0,
            nominal_beam_depth_mm: 220.0,
        }
    }
}

/// Complete takeoff input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameParams {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: String,

    /// Project title shown on reports
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub grid: GridInput,

    /// Absolute level elevations above the column base (mm)
    #[serde(default = "default_levels")]
    pub levels_mm: Vec<f64>,

    #[serde(default)]
    pub profiles: RoleProfiles,

    /// Sub-beams per bay (0 disables)
    #[serde(default)]
    pub sub_beams_per_bay: u32,

    #[serde(default)]
    pub joists: JoistOptions,

    #[serde(default)]
    pub settings: DraftSettings,
}

fn default_version() -> String {
    SCHEMA_VERSION.to_string()
}

fn default_levels() -> Vec<f64> {
    vec![4200.0, 8400.0]
}

impl Default for FrameParams {
    fn default() -> Self {
        FrameParams {
            version: default_version(),
            title: String::new(),
            grid: GridInput::default(),
            levels_mm: default_levels(),
            profiles: RoleProfiles::default(),
            sub_beams_per_bay: 0,
            joists: JoistOptions::default(),
            settings: DraftSettings::default(),
        }
    }
}

impl FrameParams {
    /// Resolved grid
    pub fn grid_spec(&self) -> GridSpec {
        GridSpec::build(&self.grid.x, &self.grid.y)
    }

    /// Resolved level set
    pub fn level_set(&self) -> LevelSet {
        resolve_levels(&self.levels_mm)
    }

    /// Effective joist spacing (mm), at least 1
    pub fn joist_spacing(&self) -> f64 {
        let raw = self.joists.spacing_mm.unwrap_or(self.settings.joist_spacing_mm);
        if raw.is_finite() {
            raw.max(1.0)
        } else {
            self.settings.joist_spacing_mm.max(1.0)
        }
    }

    /// Add a level one default storey height above the current top.
    ///
    /// Returns the new elevation.
    pub fn add_level(&mut self) -> f64 {
        let step = if self.settings.default_level_height_mm.is_finite()
            && self.settings.default_level_height_mm > 0.0
        {
            self.settings.default_level_height_mm
        } else {
            DraftSettings::default().default_level_height_mm
        };
        let next = self.level_set().height() + step;
        self.levels_mm.push(next);
        next
    }

    /// Remove the raw level entry at `index`.
    ///
    /// Out-of-range indices leave the list untouched and return `None`.
    pub fn remove_level(&mut self, index: usize) -> Option<f64> {
        if index < self.levels_mm.len() {
            Some(self.levels_mm.remove(index))
        } else {
            None
        }
    }

    /// Parse params from JSON, checking the schema version
    pub fn from_json(json: &str) -> TakeoffResult<Self> {
        let params: FrameParams = serde_json::from_str(json)
            .map_err(|e| TakeoffError::serialization(format!("Invalid params JSON: {}", e)))?;
        validate_version(&params.version)?;
        Ok(params)
    }

    /// Pretty JSON
    pub fn to_json(&self) -> TakeoffResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Load a params file.
///
/// # Errors
///
/// * `FileError` when the file cannot be read
/// * `SerializationError` when the JSON is malformed
/// * `VersionMismatch` when the file targets an incompatible schema
pub fn load_params(path: &Path) -> TakeoffResult<FrameParams> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| TakeoffError::file_error("read", path.display().to_string(), e.to_string()))?;
    let params = FrameParams::from_json(&contents)?;
    info!(path = %path.display(), "Loaded frame params");
    Ok(params)
}

/// Check that a file version is compatible with [`SCHEMA_VERSION`].
///
/// Major versions must match; during 0.x a newer minor version is rejected.
pub fn validate_version(file_version: &str) -> TakeoffResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || TakeoffError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }
    Ok(())
}
