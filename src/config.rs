use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::Role;
use crate::error::PipelineError;

/// Config file the binary picks up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "bubble_config.json";

// ---------------------------------------------------------------------------
// Indicator specifications
// ---------------------------------------------------------------------------

/// One measurable series in the source catalogue.
///
/// Serialized with the source table's capitalised column names so the
/// output's `meta.indicators` can be used directly as axis labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    #[serde(rename = "Item")]
    pub item: String,
    #[serde(rename = "Element")]
    pub element: String,
    #[serde(rename = "Unit")]
    pub unit: String,
}

impl IndicatorSpec {
    pub fn new(item: &str, element: &str, unit: &str) -> Self {
        Self {
            item: item.to_string(),
            element: element.to_string(),
            unit: unit.to_string(),
        }
    }
}

/// The three series plotted: x axis, y axis and bubble radius.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub x: IndicatorSpec,
    pub y: IndicatorSpec,
    pub r: IndicatorSpec,
}

impl IndicatorSet {
    pub fn get(&self, role: Role) -> &IndicatorSpec {
        match role {
            Role::X => &self.x,
            Role::Y => &self.y,
            Role::R => &self.r,
        }
    }

    /// Specifications in role order (x, y, r).
    pub fn iter(&self) -> impl Iterator<Item = (Role, &IndicatorSpec)> {
        Role::ALL.into_iter().map(move |role| (role, self.get(role)))
    }
}

impl Default for IndicatorSet {
    fn default() -> Self {
        Self {
            x: IndicatorSpec::new("Gross Domestic Product", "Value US$ per capita", "USD"),
            y: IndicatorSpec::new(
                "Value Added (Total Manufacturing)",
                "Share of GDP US$",
                "%",
            ),
            r: IndicatorSpec::new("Gross Domestic Product", "Value US$", "million USD"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Names of the fixed descriptor columns in the source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Country code column, first match wins.
    pub country_code_candidates: Vec<String>,
    pub area: String,
    pub item: String,
    pub element: String,
    pub unit: String,
    /// Single letter in front of the four year digits (`Y1970`).
    pub year_prefix: char,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            country_code_candidates: vec!["Area Code (M49)".to_string(), "Area Code".to_string()],
            area: "Area".to_string(),
            item: "Item".to_string(),
            element: "Element".to_string(),
            unit: "Unit".to_string(),
            year_prefix: 'Y',
        }
    }
}

impl ColumnNames {
    /// Columns that must exist besides the country code.
    pub fn required(&self) -> [&str; 4] {
        [&self.area, &self.item, &self.element, &self.unit]
    }
}

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

/// Everything a run depends on besides the input file contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub indicators: IndicatorSet,
    pub columns: ColumnNames,
    /// Inclusive lower bound; defaults to the earliest year column.
    pub year_min: Option<i32>,
    /// Inclusive upper bound; defaults to the latest year column.
    pub year_max: Option<i32>,
    pub drop_if_missing_xy: bool,
    /// Constant substituted for a missing radius.
    pub radius_fill: Option<f64>,
    /// Keep at most this many points per year, largest radius first.
    pub top_n_per_year: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data.csv"),
            output_path: PathBuf::from("bubble_data.json"),
            indicators: IndicatorSet::default(),
            columns: ColumnNames::default(),
            year_min: None,
            year_max: None,
            drop_if_missing_xy: true,
            radius_fill: None,
            top_n_per_year: None,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            log::info!("Using config {}", path.display());
            Self::load(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> std::result::Result<(), PipelineError> {
        if self.columns.country_code_candidates.is_empty() {
            return Err(PipelineError::Config(
                "country_code_candidates must not be empty".to_string(),
            ));
        }
        if !self.columns.year_prefix.is_ascii_alphabetic() {
            return Err(PipelineError::Config(format!(
                "year_prefix must be a single letter, got '{}'",
                self.columns.year_prefix
            )));
        }
        if let (Some(min), Some(max)) = (self.year_min, self.year_max) {
            if min > max {
                return Err(PipelineError::Config(format!(
                    "year_min ({min}) is after year_max ({max})"
                )));
            }
        }
        if let Some(fill) = self.radius_fill {
            if !fill.is_finite() {
                return Err(PipelineError::Config(format!(
                    "radius_fill must be a finite number, got {fill}"
                )));
            }
        }
        Ok(())
    }
}
