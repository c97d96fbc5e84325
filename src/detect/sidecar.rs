//! Detections read from CSV files written by an external detector.
//!
//! The file format is one box per row:
//!
//! ```text
//! class,x1,y1,x2,y2,confidence
//! body,120.4,88.0,410.9,360.2,0.91
//! 1,200,40,260,110,0.77
//! ```
//!
//! `class` is either the model class id (0=body, 1=head, 2=leg) or its name.
//! Coordinates are truncated toward zero.

use crate::detect::Detector;
use crate::error::{Error, Result};
use crate::regions::{BoundingBox, DetectedRegion, RegionClass};
use crate::thermal::ThermalImage;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct DetectionRecord {
    class: String,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    confidence: f32,
}

/// Parse a detection file, keeping rows at or above `min_confidence`.
///
/// Row order is preserved. Returns `Ok(vec![])` for an empty or header-only
/// file.
pub fn parse_detection_file(path: &Path, min_confidence: f32) -> Result<Vec<DetectedRegion>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::DetectionRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut regions = Vec::new();

    for (line_num, result) in reader.deserialize::<DetectionRecord>().enumerate() {
        let line = line_num + 2;
        let record = result.map_err(|e| Error::InvalidDetectionFormat {
            message: format!("line {line}: {e}"),
        })?;

        let class: RegionClass =
            record
                .class
                .parse()
                .map_err(|e: String| Error::InvalidDetectionFormat {
                    message: format!("line {line}: {e}"),
                })?;

        let coords = [record.x1, record.y1, record.x2, record.y2];
        if coords.iter().any(|c| !c.is_finite()) || !record.confidence.is_finite() {
            return Err(Error::InvalidDetectionFormat {
                message: format!("line {line}: non-finite value"),
            });
        }
        if record.x2 < record.x1 || record.y2 < record.y1 {
            return Err(Error::InvalidDetectionFormat {
                message: format!(
                    "line {line}: box ({}, {}, {}, {}) is inverted",
                    record.x1, record.y1, record.x2, record.y2
                ),
            });
        }

        if record.confidence < min_confidence {
            debug!(
                "line {line}: dropping {class} at confidence {:.3}",
                record.confidence
            );
            continue;
        }

        regions.push(DetectedRegion::new(
            class,
            BoundingBox::from_f64(record.x1, record.y1, record.x2, record.y2),
            record.confidence,
        ));
    }

    Ok(regions)
}

/// Detector backed by per-image sidecar CSV files.
#[derive(Debug, Clone)]
pub struct SidecarDetector {
    explicit: Option<PathBuf>,
    dir: Option<PathBuf>,
    suffix: String,
}

impl SidecarDetector {
    /// Look up `<stem><suffix>` in `dir`, or next to the image when `dir` is
    /// `None`.
    pub fn new(dir: Option<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            explicit: None,
            dir,
            suffix: suffix.into(),
        }
    }

    /// Always read the given file, regardless of the image.
    pub fn with_file(path: PathBuf) -> Self {
        Self {
            explicit: Some(path),
            dir: None,
            suffix: String::new(),
        }
    }

    /// Sidecar path for an image, if one can be derived.
    pub fn sidecar_path(&self, image_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(explicit) = &self.explicit {
            return Some(explicit.clone());
        }

        let image_path = image_path?;
        let stem = image_path.file_stem()?.to_string_lossy();
        let dir = self.dir.clone().unwrap_or_else(|| {
            image_path
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        });
        Some(dir.join(format!("{stem}{}", self.suffix)))
    }
}

impl Detector for SidecarDetector {
    fn name(&self) -> &'static str {
        "sidecar"
    }

    fn detect(&self, image: &ThermalImage, min_confidence: f32) -> Result<Vec<DetectedRegion>> {
        let Some(path) = self.sidecar_path(image.source()) else {
            warn!("No detection file can be derived for an in-memory image");
            return Ok(Vec::new());
        };

        if !path.exists() {
            warn!("Detection file not found: {}", path.display());
            return Ok(Vec::new());
        }

        debug!("Reading detections from {}", path.display());
        parse_detection_file(&path, min_confidence)
    }
}
