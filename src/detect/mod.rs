//! Region detection collaborators.
//!
//! The object-detection model itself is out of process; a [`Detector`] is the
//! long-lived handle the analyzer is built with.

mod sidecar;

pub use sidecar::{SidecarDetector, parse_detection_file};

use crate::error::Result;
use crate::regions::DetectedRegion;
use crate::thermal::ThermalImage;

/// Produces labeled boxes for an image.
pub trait Detector: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Detect regions, dropping anything below `min_confidence`.
    ///
    /// Output order is the detector's own and is significant: when a class
    /// appears more than once the last box wins downstream.
    fn detect(&self, image: &ThermalImage, min_confidence: f32) -> Result<Vec<DetectedRegion>>;
}

/// Returns the same regions for every image.
///
/// Useful when boxes come from an interactive annotation or a test fixture.
#[derive(Debug, Clone, Default)]
pub struct FixedDetector {
    regions: Vec<DetectedRegion>,
}

impl FixedDetector {
    /// Create a detector that always yields `regions`.
    pub const fn new(regions: Vec<DetectedRegion>) -> Self {
        Self { regions }
    }
}

impl Detector for FixedDetector {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn detect(&self, _image: &ThermalImage, min_confidence: f32) -> Result<Vec<DetectedRegion>> {
        Ok(self
            .regions
            .iter()
            .filter(|r| r.confidence >= min_confidence)
            .copied()
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::regions::{BoundingBox, RegionClass};
    use image::{DynamicImage, RgbImage};

    #[test]
    fn test_fixed_detector_applies_floor() {
        let detector = FixedDetector::new(vec![
            DetectedRegion::new(RegionClass::Body, BoundingBox::new(0, 0, 4, 4), 0.9),
            DetectedRegion::new(RegionClass::Head, BoundingBox::new(0, 0, 2, 2), 0.1),
        ]);
        let image = ThermalImage::from_dynamic(DynamicImage::ImageRgb8(RgbImage::new(4, 4)), None);

        let regions = detector.detect(&image, 0.3).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].class, RegionClass::Body);
    }
}
