//! # Report Configuration
//!
//! Every path and label the pipeline uses lives in [`ReportConfig`]. Values
//! come from defaults, an optional TOML file, and finally command line
//! overrides applied by the caller.
//!
//! ## Example
//!
//! ```rust
//! use report_core::config::{OutputFormat, ReportConfig};
//!
//! let config = ReportConfig::from_toml_str(
//!     r#"
//!     input_path = "runs/beam-7.csv"
//!     format = "json"
//!
//!     [units]
//!     force = "kip"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.format, OutputFormat::Json);
//! assert_eq!(config.units.force, "kip");
//! assert_eq!(config.units.length, "m");
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Default location of the analysis table
pub const DEFAULT_INPUT_PATH: &str = "data/Force.xlsx";
/// Default location of the beam illustration
pub const DEFAULT_IMAGE_PATH: &str = "images/Beam.png";
/// Default location of the rendered report
pub const DEFAULT_OUTPUT_PATH: &str = "output/report.pdf";

/// Artifact produced by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PDF compiled with Typst
    #[default]
    Pdf,
    /// Typst markup only
    Typst,
    /// Document tree as JSON
    Json,
}

impl OutputFormat {
    /// File extension written for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Typst => "typ",
            OutputFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Typst => "typst",
            OutputFormat::Json => "json",
        };
        write!(f, "{}", name)
    }
}

/// Unit labels printed next to values. Not used for conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnitLabels {
    pub length: String,
    pub force: String,
    pub moment: String,
}

impl Default for UnitLabels {
    fn default() -> Self {
        UnitLabels {
            length: "m".to_string(),
            force: "kN".to_string(),
            moment: "kN·m".to_string(),
        }
    }
}

/// Explicit header names for the three required columns.
///
/// Unset fields fall back to the built-in aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnNames {
    pub position: Option<String>,
    pub shear: Option<String>,
    pub moment: Option<String>,
}

/// Settings for one report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Tabular data source
    pub input_path: PathBuf,

    /// Beam illustration; skipped if `None` or missing on disk
    pub image_path: Option<PathBuf>,

    /// Rendered artifact destination
    pub output_path: PathBuf,

    pub format: OutputFormat,

    /// Keep the intermediate Typst markup next to a PDF
    pub keep_source: bool,

    pub title: String,
    pub subtitle: String,
    pub author: String,

    pub units: UnitLabels,
    pub columns: ColumnNames,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            image_path: Some(PathBuf::from(DEFAULT_IMAGE_PATH)),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            format: OutputFormat::default(),
            keep_source: true,
            title: "Beam Analysis Report".to_string(),
            subtitle: "Simply Supported Beam".to_string(),
            author: "Generated using beam-report".to_string(),
            units: UnitLabels::default(),
            columns: ColumnNames::default(),
        }
    }
}

impl ReportConfig {
    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Read a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// The output path with its extension matched to `format`.
    pub fn artifact_path(&self) -> PathBuf {
        self.output_path.with_extension(self.format.extension())
    }
}
