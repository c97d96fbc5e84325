//! Detection sidecar lookup and parsing.

#![allow(clippy::unwrap_used)]

use image::{GrayImage, Luma};
use std::path::Path;
use thermocluck::Error;
use thermocluck::detect::{Detector, SidecarDetector, parse_detection_file};
use thermocluck::regions::{BoundingBox, RegionClass};
use thermocluck::thermal::ThermalImage;

fn write_image(path: &Path) -> ThermalImage {
    GrayImage::from_pixel(8, 8, Luma([100])).save(path).unwrap();
    ThermalImage::open(path).unwrap()
}

#[test]
fn test_sidecar_next_to_image() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir.path().join("hen_12.png"));
    std::fs::write(
        dir.path().join("hen_12.detections.csv"),
        "class,x1,y1,x2,y2,confidence\nbody,0,2,8,8,0.95\nhead,1,0,4,2.9,0.6\n",
    )
    .unwrap();

    let detector = SidecarDetector::new(None, ".detections.csv");
    let regions = detector.detect(&image, 0.3).unwrap();

    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].class, RegionClass::Body);
    assert_eq!(regions[1].bbox, BoundingBox::new(1, 0, 4, 2));
}

#[test]
fn test_sidecar_in_separate_directory() {
    let dir = tempfile::tempdir().unwrap();
    let detections = dir.path().join("detections");
    std::fs::create_dir(&detections).unwrap();
    let image = write_image(&dir.path().join("hen_13.png"));
    std::fs::write(
        detections.join("hen_13.boxes.csv"),
        "class,x1,y1,x2,y2,confidence\n2,0,6,3,8,0.4\n",
    )
    .unwrap();

    let detector = SidecarDetector::new(Some(detections), ".boxes.csv");
    let regions = detector.detect(&image, 0.3).unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].class, RegionClass::Leg);
}

#[test]
fn test_missing_sidecar_yields_no_detections() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir.path().join("hen_14.png"));

    let detector = SidecarDetector::new(None, ".detections.csv");
    assert!(detector.detect(&image, 0.3).unwrap().is_empty());
}

#[test]
fn test_explicit_file_overrides_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let image = write_image(&dir.path().join("hen_15.png"));
    let explicit = dir.path().join("manual.csv");
    std::fs::write(&explicit, "class,x1,y1,x2,y2,confidence\nhead,0,0,2,2,0.9\n").unwrap();

    let detector = SidecarDetector::with_file(explicit.clone());
    assert_eq!(detector.sidecar_path(image.source()), Some(explicit));
    assert_eq!(detector.detect(&image, 0.3).unwrap().len(), 1);
}

#[test]
fn test_malformed_rows_are_errors() {
    let dir = tempfile::tempdir().unwrap();

    let inverted = dir.path().join("inverted.csv");
    std::fs::write(&inverted, "class,x1,y1,x2,y2,confidence\nbody,10,0,5,5,0.9\n").unwrap();
    assert!(matches!(
        parse_detection_file(&inverted, 0.3),
        Err(Error::InvalidDetectionFormat { .. })
    ));

    let unknown = dir.path().join("unknown.csv");
    std::fs::write(&unknown, "class,x1,y1,x2,y2,confidence\nwing,0,0,5,5,0.9\n").unwrap();
    assert!(matches!(
        parse_detection_file(&unknown, 0.3),
        Err(Error::InvalidDetectionFormat { .. })
    ));
}

#[test]
fn test_zero_area_box_is_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flat.csv");
    std::fs::write(&path, "class,x1,y1,x2,y2,confidence\nbody,4,4,4,9,0.9\n").unwrap();

    let regions = parse_detection_file(&path, 0.3).unwrap();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].bbox.width(), 0);
}
