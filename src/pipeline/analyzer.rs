//! Single-image analysis: detection, temperature field, statistics, label.

use crate::annotate::{Annotation, annotations_for, draw_annotations};
use crate::constants::DETECTION_CONFIDENCE_FLOOR;
use crate::detect::Detector;
use crate::error::Result;
use crate::health::{ClassificationResult, HealthLabel, classify_stats};
use crate::regions::{DetectedRegion, RegionStats, aggregate};
use crate::thermal::{FieldOrigin, ReferenceSource, TemperatureField, ThermalImage, synthesize};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Temperatures as reported to users and serialized in results.
///
/// `body` is the body mean, except for `Healthy` subjects where the 90th
/// percentile is reported instead. The label is never affected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportedTemperatures {
    /// Head maximum.
    pub head: Option<f64>,
    /// Displayed body temperature.
    pub body: Option<f64>,
    /// Body minimum.
    pub body_min: Option<f64>,
    /// Body 90th percentile.
    pub body_max: Option<f64>,
    /// Leg proxy mean.
    pub leg: Option<f64>,
}

impl ReportedTemperatures {
    /// Apply the display convention for `label` to raw statistics.
    pub fn from_stats(stats: &RegionStats, label: HealthLabel) -> Self {
        let body = match (label, stats.body_max) {
            (HealthLabel::Healthy, Some(p90)) => Some(p90),
            _ => stats.body_mean,
        };
        Self {
            head: stats.head,
            body,
            body_min: stats.body_min,
            body_max: stats.body_max,
            leg: stats.leg,
        }
    }

    /// The higher of head and displayed body temperature, whichever exist.
    pub fn overall(&self) -> Option<f64> {
        match (self.head, self.body) {
            (Some(h), Some(b)) => Some(h.max(b)),
            (h, b) => h.or(b),
        }
    }

    /// Overall temperature for storage, where "none" is recorded as `0.0`.
    pub fn overall_or_zero(&self) -> f64 {
        self.overall().unwrap_or(0.0)
    }
}

/// Everything produced by one analysis.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Label and contributing signs.
    pub classification: ClassificationResult,
    /// Raw region statistics.
    pub stats: RegionStats,
    /// Temperatures after the display convention.
    pub reported: ReportedTemperatures,
    /// Detector output, in detector order.
    pub regions: Vec<DetectedRegion>,
    /// Per-region annotations.
    pub annotations: Vec<Annotation>,
    /// Input image with region outlines drawn.
    pub annotated: RgbImage,
    /// Where the temperature field came from.
    pub field_origin: FieldOrigin,
}

impl AnalysisOutcome {
    /// The screening label.
    pub const fn label(&self) -> HealthLabel {
        self.classification.label()
    }
}

/// Runs the detector, builds the temperature field and classifies.
///
/// Holds no per-image state; one analyzer can serve any number of images.
pub struct Analyzer {
    detector: Box<dyn Detector>,
    reference: Box<dyn ReferenceSource>,
}

impl Analyzer {
    /// Create an analyzer around a detector and a reference source.
    pub fn new(detector: Box<dyn Detector>, reference: Box<dyn ReferenceSource>) -> Self {
        Self {
            detector,
            reference,
        }
    }

    /// Analyze an image using a synthesized temperature field.
    pub fn analyze(&self, image: &ThermalImage) -> Result<AnalysisOutcome> {
        self.analyze_with_field(image, None)
    }

    /// Analyze an image, using `radiometric` as the field when supplied.
    ///
    /// A supplied field bypasses synthesis entirely.
    pub fn analyze_with_field(
        &self,
        image: &ThermalImage,
        radiometric: Option<&TemperatureField>,
    ) -> Result<AnalysisOutcome> {
        let regions = self.detector.detect(image, DETECTION_CONFIDENCE_FLOOR)?;
        debug!(
            "{} detector returned {} region(s)",
            self.detector.name(),
            regions.len()
        );

        let (synthesized, field_origin);
        let field = if let Some(field) = radiometric {
            field_origin = FieldOrigin::Radiometric;
            field
        } else {
            let reference = self.reference.reference_temperature(image.source());
            (synthesized, field_origin) = synthesize(image.gray(), reference);
            &synthesized
        };

        if (field.width(), field.height()) != (image.width() as usize, image.height() as usize) {
            warn!(
                "Temperature field is {}x{} but image is {}x{}",
                field.width(),
                field.height(),
                image.width(),
                image.height()
            );
        }

        let stats = aggregate(field, &regions);
        let classification = classify_stats(&stats, !regions.is_empty());
        let reported = ReportedTemperatures::from_stats(&stats, classification.label());

        let annotations = annotations_for(field, &regions);
        let annotated = draw_annotations(image.rgb(), &annotations);

        info!(
            "Result: {} (signs: {})",
            classification.label(),
            if classification.signs().is_empty() {
                "none".to_string()
            } else {
                classification
                    .signs()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        );

        Ok(AnalysisOutcome {
            classification,
            stats,
            reported,
            regions,
            annotations,
            annotated,
            field_origin,
        })
    }
}
