//! Configuration type definitions.

use crate::constants::detector::DEFAULT_SIDECAR_SUFFIX;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default analysis settings.
    pub defaults: DefaultsConfig,

    /// Detection file lookup.
    pub detector: DetectorConfig,

    /// Reference temperature for field synthesis.
    pub reference: ReferenceConfig,

    /// Result database.
    pub store: StoreConfig,
}

/// Default analysis settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Result file formats.
    pub formats: Vec<OutputFormat>,

    /// Output directory (None = next to each image).
    pub output_dir: Option<PathBuf>,

    /// Write annotated images.
    pub annotate: bool,

    /// Write heat pattern images.
    pub heatmap: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            formats: vec![OutputFormat::Json],
            output_dir: None,
            annotate: true,
            heatmap: true,
        }
    }
}

/// Where detection sidecar files are found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Directory holding detection files (None = next to each image).
    pub detections_dir: Option<PathBuf>,

    /// Suffix appended to the image stem.
    pub suffix: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            detections_dir: None,
            suffix: DEFAULT_SIDECAR_SUFFIX.to_string(),
        }
    }
}

/// Reference temperature settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Fixed reference temperature in °C, e.g. from a calibrated camera.
    pub temperature: Option<f64>,
}

/// Result database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Save each analysis to the database.
    pub enabled: bool,

    /// Database path (None = platform data directory).
    pub path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

/// Supported result file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON document per image.
    Json,
    /// One CSV row per image.
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
