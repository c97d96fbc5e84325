//! End-to-end classification through the analyzer.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use image::{DynamicImage, GrayImage, Luma, RgbImage};
use thermocluck::detect::FixedDetector;
use thermocluck::health::{HealthLabel, Sign};
use thermocluck::pipeline::Analyzer;
use thermocluck::regions::{BoundingBox, DetectedRegion, RegionClass};
use thermocluck::thermal::{
    FieldOrigin, FixedReference, NoReference, TemperatureField, ThermalImage,
};

const SIZE: usize = 20;
const BACKGROUND: f64 = 30.0;

const HEAD_BOX: BoundingBox = BoundingBox::new(0, 0, 5, 5);
// Rows 10..20; the leg proxy covers rows 17..20.
const BODY_BOX: BoundingBox = BoundingBox::new(0, 10, 10, 20);

fn blank_image() -> ThermalImage {
    ThermalImage::from_dynamic(
        DynamicImage::ImageRgb8(RgbImage::new(SIZE as u32, SIZE as u32)),
        None,
    )
}

fn analyzer(regions: Vec<DetectedRegion>) -> Analyzer {
    Analyzer::new(Box::new(FixedDetector::new(regions)), Box::new(NoReference))
}

fn head_and_body() -> Vec<DetectedRegion> {
    vec![
        DetectedRegion::new(RegionClass::Head, HEAD_BOX, 0.9),
        DetectedRegion::new(RegionClass::Body, BODY_BOX, 0.9),
    ]
}

/// Field with a uniform head and one temperature per body row.
fn field(head: f64, body_rows: [f64; 10]) -> TemperatureField {
    let mut rows = vec![vec![BACKGROUND; SIZE]; SIZE];
    for row in rows.iter_mut().take(5) {
        row[..5].fill(head);
    }
    for (i, t) in body_rows.iter().enumerate() {
        rows[10 + i][..10].fill(*t);
    }
    TemperatureField::from_rows(rows).unwrap()
}

#[test]
fn test_fever_only() {
    // min 38, p90 40, leg rows 39
    let field = field(
        43.0,
        [38.0, 39.0, 39.0, 39.0, 39.0, 40.0, 40.0, 39.0, 39.0, 39.0],
    );
    let outcome = analyzer(head_and_body())
        .analyze_with_field(&blank_image(), Some(&field))
        .unwrap();

    assert_eq!(outcome.stats.head, Some(43.0));
    assert_eq!(outcome.stats.body_min, Some(38.0));
    assert_eq!(outcome.stats.body_max, Some(40.0));
    assert_eq!(outcome.stats.leg, Some(39.0));
    assert_eq!(
        outcome.classification.signs().iter().copied().collect::<Vec<_>>(),
        vec![Sign::HighHeadTemp]
    );
    assert_eq!(outcome.label(), HealthLabel::FeverOnly);
    assert_eq!(outcome.field_origin, FieldOrigin::Radiometric);
    // Mean is reported for non-healthy subjects.
    assert_eq!(outcome.reported.body, outcome.stats.body_mean);
}

#[test]
fn test_suspected_bird_flu() {
    // min 35, p90 42 (spread 7), leg rows 37
    let field = field(
        44.0,
        [35.0, 36.0, 36.0, 36.0, 42.0, 42.0, 42.0, 37.0, 37.0, 37.0],
    );
    let outcome = analyzer(head_and_body())
        .analyze_with_field(&blank_image(), Some(&field))
        .unwrap();

    assert_eq!(outcome.stats.body_min, Some(35.0));
    assert_eq!(outcome.stats.body_max, Some(42.0));
    assert_eq!(outcome.stats.leg, Some(37.0));
    assert_eq!(outcome.classification.signs().len(), 3);
    assert_eq!(outcome.label(), HealthLabel::SuspectedBirdFlu);
    assert_eq!(outcome.reported.overall(), Some(44.0));
}

#[test]
fn test_healthy_reports_percentile() {
    let field = field(
        40.0,
        [40.0, 40.0, 40.0, 40.0, 40.0, 41.0, 41.0, 40.0, 40.0, 40.0],
    );
    let outcome = analyzer(head_and_body())
        .analyze_with_field(&blank_image(), Some(&field))
        .unwrap();

    assert_eq!(outcome.label(), HealthLabel::Healthy);
    assert!(outcome.classification.signs().is_empty());
    assert_eq!(outcome.stats.body_max, Some(41.0));
    assert_eq!(outcome.reported.body, Some(41.0));
    assert!(outcome.stats.body_mean.unwrap() < 41.0);
}

#[test]
fn test_no_detections() {
    let field = field(44.0, [44.0; 10]);
    let outcome = analyzer(Vec::new())
        .analyze_with_field(&blank_image(), Some(&field))
        .unwrap();

    assert_eq!(outcome.label(), HealthLabel::DetectionFailed);
    assert_eq!(outcome.stats.head, None);
    assert!(!outcome.stats.has_body());
    assert_eq!(outcome.stats.leg, None);
    assert_eq!(outcome.reported.overall(), None);
    assert!(outcome.annotations.is_empty());
}

#[test]
fn test_body_outside_image_counts_as_present() {
    let regions = vec![DetectedRegion::new(
        RegionClass::Body,
        BoundingBox::new(50, 50, 60, 60),
        0.8,
    )];
    let outcome = analyzer(regions).analyze(&blank_image()).unwrap();

    assert_eq!(outcome.stats.body_mean, Some(0.0));
    assert_eq!(outcome.stats.body_min, Some(0.0));
    assert_eq!(outcome.stats.body_max, Some(0.0));
    assert_eq!(outcome.stats.leg, None);
    assert_eq!(outcome.label(), HealthLabel::Healthy);
}

#[test]
fn test_leg_box_alone_is_detection_failed() {
    let regions = vec![DetectedRegion::new(
        RegionClass::Leg,
        BoundingBox::new(0, 15, 5, 20),
        0.9,
    )];
    let field = field(44.0, [30.0; 10]);
    let outcome = analyzer(regions)
        .analyze_with_field(&blank_image(), Some(&field))
        .unwrap();

    assert_eq!(outcome.stats.leg, None);
    assert_eq!(outcome.label(), HealthLabel::DetectionFailed);
    assert_eq!(outcome.annotations.len(), 1);
    assert_eq!(outcome.annotations[0].caption, "Leg");
}

#[test]
fn test_low_confidence_boxes_are_ignored() {
    let regions = vec![DetectedRegion::new(RegionClass::Body, BODY_BOX, 0.29)];
    let outcome = analyzer(regions).analyze(&blank_image()).unwrap();
    assert_eq!(outcome.label(), HealthLabel::DetectionFailed);
    assert!(outcome.regions.is_empty());
}

#[test]
fn test_synthesized_field_with_reference() {
    // Uniform intensity 255 with reference 40: every pixel maps to 45 °C.
    let gray = GrayImage::from_pixel(SIZE as u32, SIZE as u32, Luma([255]));
    let image = ThermalImage::from_dynamic(DynamicImage::ImageLuma8(gray), None);
    let analyzer = Analyzer::new(
        Box::new(FixedDetector::new(head_and_body())),
        Box::new(FixedReference(40.0)),
    );

    let outcome = analyzer.analyze(&image).unwrap();

    assert_eq!(outcome.field_origin, FieldOrigin::Synthesized);
    assert_eq!(outcome.stats.head, Some(45.0));
    assert_eq!(outcome.stats.body_max, Some(45.0));
    assert_eq!(outcome.label(), HealthLabel::FeverOnly);
}

#[test]
fn test_annotated_image_keeps_dimensions() {
    let outcome = analyzer(head_and_body()).analyze(&blank_image()).unwrap();
    assert_eq!(outcome.annotated.dimensions(), (SIZE as u32, SIZE as u32));
    assert_eq!(outcome.annotations.len(), 2);
    assert!(outcome.annotations[0].caption.starts_with("Head: "));
    assert!(outcome.annotations[1].caption.starts_with("Body: "));
}
