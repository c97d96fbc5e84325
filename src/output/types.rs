//! Output type definitions.

use crate::annotate::Annotation;
use crate::health::{HealthLabel, Sign};
use crate::pipeline::{AnalysisOutcome, ReportedTemperatures};
use crate::regions::{BoundingBox, RegionClass};
use crate::thermal::FieldOrigin;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// The result of analyzing one image, as written to result files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    /// Source image file name.
    pub source_file: String,
    /// Analysis timestamp.
    pub analysis_date: DateTime<Utc>,
    /// Screening label.
    pub label: HealthLabel,
    /// Signs that fired.
    pub signs: BTreeSet<Sign>,
    /// Reported temperatures.
    pub temperatures: ReportedTemperatures,
    /// Higher of head and body temperature.
    pub overall_temperature: Option<f64>,
    /// Where the temperature field came from.
    pub field_origin: FieldOrigin,
    /// Detected regions with their captions.
    pub detections: Vec<RegionEntry>,
    /// Annotated image path, when written.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub annotated_image: Option<String>,
    /// Heat pattern image path, when written.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub heatmap_image: Option<String>,
}

/// One detected region in a result file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionEntry {
    /// Region class.
    pub class: RegionClass,
    /// Pixel box.
    pub bbox: BoundingBox,
    /// Detector confidence.
    pub confidence: f32,
    /// Caption shown next to the box.
    pub caption: String,
}

impl ImageResult {
    /// Build a result record from an analysis of `source`.
    pub fn from_outcome(source: &Path, outcome: &AnalysisOutcome) -> Self {
        let detections = outcome
            .regions
            .iter()
            .zip(&outcome.annotations)
            .map(|(region, Annotation { caption, .. })| RegionEntry {
                class: region.class,
                bbox: region.bbox,
                confidence: region.confidence,
                caption: caption.clone(),
            })
            .collect();

        Self {
            source_file: source
                .file_name()
                .map_or_else(|| source.display().to_string(), |n| {
                    n.to_string_lossy().into_owned()
                }),
            analysis_date: Utc::now(),
            label: outcome.label(),
            signs: outcome.classification.signs().clone(),
            temperatures: outcome.reported,
            overall_temperature: outcome.reported.overall(),
            field_origin: outcome.field_origin,
            detections,
            annotated_image: None,
            heatmap_image: None,
        }
    }
}

/// Label counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// `Healthy` images.
    pub healthy: usize,
    /// `Fever Only` images.
    pub fever_only: usize,
    /// `Suspected Bird Flu` images.
    pub suspected: usize,
    /// `Detection Failed` images.
    pub detection_failed: usize,
    /// Images that could not be processed.
    pub errors: usize,
}

impl BatchSummary {
    /// Count one label.
    pub const fn record(&mut self, label: HealthLabel) {
        match label {
            HealthLabel::Healthy => self.healthy += 1,
            HealthLabel::FeverOnly => self.fever_only += 1,
            HealthLabel::SuspectedBirdFlu => self.suspected += 1,
            HealthLabel::DetectionFailed => self.detection_failed += 1,
        }
    }

    /// Images that produced a label.
    pub const fn analyzed(&self) -> usize {
        self.healthy + self.fever_only + self.suspected + self.detection_failed
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} analyzed: {} healthy, {} fever only, {} suspected bird flu, {} detection failed",
            self.analyzed(),
            self.healthy,
            self.fever_only,
            self.suspected,
            self.detection_failed
        )?;
        if self.errors > 0 {
            write!(f, " ({} failed to process)", self.errors)?;
        }
        Ok(())
    }
}
