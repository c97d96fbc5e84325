//! Per-region temperature aggregation.

use crate::constants::regions::{BODY_MAX_PERCENTILE, LEG_PROXY_START};
use crate::regions::stats;
use crate::regions::{BoundingBox, DetectedRegion, RegionClass};
use crate::thermal::TemperatureField;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Region temperature statistics for one analysis, in °C.
///
/// A field is `None` when its region was never detected. A detected region
/// whose crop is empty after clamping reports `0.0` for head and body; this
/// mirrors the screening rules, where such a body still counts as present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    /// Maximum over the head box.
    pub head: Option<f64>,
    /// Mean over the body box.
    pub body_mean: Option<f64>,
    /// Minimum over the body box.
    pub body_min: Option<f64>,
    /// 90th percentile over the body box.
    pub body_max: Option<f64>,
    /// Mean over the bottom 30% of the body box.
    pub leg: Option<f64>,
}

impl RegionStats {
    /// Whether any body statistic is present.
    ///
    /// The aggregator sets all three together, so this agrees with the
    /// min-or-percentile presence test used by [`crate::health::classify`].
    pub const fn has_body(&self) -> bool {
        self.body_mean.is_some() || self.body_min.is_some() || self.body_max.is_some()
    }
}

/// Aggregate the field over detected regions.
///
/// Regions are processed in detector order; when a class appears more than
/// once the last box wins. Leg boxes never feed the leg statistic: legs are
/// read from the bottom 30% of the (last) body box instead.
pub fn aggregate(field: &TemperatureField, regions: &[DetectedRegion]) -> RegionStats {
    let mut stats = RegionStats::default();
    let mut body_box: Option<BoundingBox> = None;
    let mut seen_head = false;

    for region in regions {
        match region.class {
            RegionClass::Head => {
                if seen_head {
                    warn!("Multiple head detections, keeping the last one");
                }
                seen_head = true;
                stats.head = Some(head_max(field, &region.bbox));
            }
            RegionClass::Body => {
                if body_box.is_some() {
                    warn!("Multiple body detections, keeping the last one");
                }
                body_box = Some(region.bbox);
                let (mean, min, p90) = body_stats(field, &region.bbox);
                stats.body_mean = Some(mean);
                stats.body_min = Some(min);
                stats.body_max = Some(p90);
            }
            RegionClass::Leg => {
                debug!("Leg box at {:?} kept for annotation only", region.bbox);
            }
        }
    }

    stats.leg = body_box.and_then(|bbox| leg_proxy_mean(field, &bbox));
    stats
}

/// Maximum over the head crop, `0.0` for an empty crop.
pub(crate) fn head_max(field: &TemperatureField, bbox: &BoundingBox) -> f64 {
    let values = crop(field, bbox);
    stats::max(&values).unwrap_or(0.0)
}

/// Mean, minimum and 90th percentile over the body crop, zeros when empty.
pub(crate) fn body_stats(field: &TemperatureField, bbox: &BoundingBox) -> (f64, f64, f64) {
    let values = crop(field, bbox);
    match (
        stats::mean(&values),
        stats::min(&values),
        stats::percentile(&values, BODY_MAX_PERCENTILE),
    ) {
        (Some(mean), Some(min), Some(p90)) => (mean, min, p90),
        _ => {
            debug!("Body crop {:?} is empty after clamping", bbox);
            (0.0, 0.0, 0.0)
        }
    }
}

/// Rows from 70% of the body height down to its bottom edge.
pub fn leg_proxy_box(body: &BoundingBox) -> BoundingBox {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let start = (body.y1 as f64 + body.height() as f64 * LEG_PROXY_START) as i64;
    BoundingBox::new(body.x1, start, body.x2, body.y2)
}

fn leg_proxy_mean(field: &TemperatureField, body: &BoundingBox) -> Option<f64> {
    let values = crop(field, &leg_proxy_box(body));
    stats::mean(&values)
}

fn crop(field: &TemperatureField, bbox: &BoundingBox) -> Vec<f64> {
    let c = bbox.clamp(field.width(), field.height());
    field.window(c.x0, c.x1, c.y0, c.y1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    /// 10x10 field where each row holds `30 + row`.
    fn row_field() -> TemperatureField {
        let values = (0..10)
            .flat_map(|y| std::iter::repeat_n(30.0 + f64::from(y), 10))
            .collect();
        TemperatureField::new(10, 10, values).unwrap()
    }

    fn region(class: RegionClass, x1: i64, y1: i64, x2: i64, y2: i64) -> DetectedRegion {
        DetectedRegion::new(class, BoundingBox::new(x1, y1, x2, y2), 0.9)
    }

    #[test]
    fn test_no_regions_all_absent() {
        let stats = aggregate(&row_field(), &[]);
        assert_eq!(stats, RegionStats::default());
        assert!(!stats.has_body());
    }

    #[test]
    fn test_head_is_maximum() {
        let stats = aggregate(&row_field(), &[region(RegionClass::Head, 0, 0, 3, 4)]);
        assert_eq!(stats.head, Some(33.0));
        assert_eq!(stats.body_mean, None);
        assert_eq!(stats.leg, None);
    }

    #[test]
    fn test_degenerate_head_is_zero() {
        let stats = aggregate(&row_field(), &[region(RegionClass::Head, 4, 4, 4, 8)]);
        assert_eq!(stats.head, Some(0.0));
    }

    #[test]
    fn test_body_statistics() {
        let stats = aggregate(&row_field(), &[region(RegionClass::Body, 0, 0, 10, 10)]);
        assert!((stats.body_mean.unwrap() - 34.5).abs() < 1e-9);
        assert_eq!(stats.body_min, Some(30.0));
        // 100 samples, ten per row value: rank 89.1 sits between 38 and 39
        assert!((stats.body_max.unwrap() - 38.1).abs() < 1e-9);
    }

    #[test]
    fn test_leg_from_bottom_of_body() {
        // body rows 0..10, leg proxy starts at int(0 + 10 * 0.7) = 7 -> rows 7, 8, 9
        let stats = aggregate(&row_field(), &[region(RegionClass::Body, 0, 0, 10, 10)]);
        assert!((stats.leg.unwrap() - 38.0).abs() < 1e-9);
    }

    #[test]
    fn test_leg_box_without_body_is_absent() {
        let stats = aggregate(&row_field(), &[region(RegionClass::Leg, 0, 7, 10, 10)]);
        assert_eq!(stats.leg, None);
        assert!(!stats.has_body());
    }

    #[test]
    fn test_leg_box_is_ignored_for_leg_signal() {
        let regions = [
            region(RegionClass::Body, 0, 0, 10, 5),
            region(RegionClass::Leg, 0, 8, 10, 10),
        ];
        let stats = aggregate(&row_field(), &regions);
        // proxy rows int(0 + 5 * 0.7) = 3 -> rows 3, 4
        assert!((stats.leg.unwrap() - 33.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_body_crop_is_zero_and_present() {
        let stats = aggregate(&row_field(), &[region(RegionClass::Body, 20, 20, 30, 30)]);
        assert_eq!(stats.body_mean, Some(0.0));
        assert_eq!(stats.body_min, Some(0.0));
        assert_eq!(stats.body_max, Some(0.0));
        assert!(stats.has_body());
        assert_eq!(stats.leg, None);
    }

    #[test]
    fn test_last_detection_wins() {
        let regions = [
            region(RegionClass::Head, 0, 9, 1, 10),
            region(RegionClass::Head, 0, 0, 1, 1),
        ];
        let stats = aggregate(&row_field(), &regions);
        assert_eq!(stats.head, Some(30.0));
    }

    #[test]
    fn test_last_body_feeds_body_and_leg() {
        let regions = [
            region(RegionClass::Body, 0, 0, 10, 5),
            region(RegionClass::Body, 0, 5, 10, 10),
        ];
        let stats = aggregate(&row_field(), &regions);
        // Second box covers rows 5..10, ten samples per value 35..39.
        assert!((stats.body_mean.unwrap() - 37.0).abs() < 1e-9);
        assert_eq!(stats.body_min, Some(35.0));
        assert_eq!(stats.body_max, Some(39.0));
        // proxy rows int(5 + 5 * 0.7) = 8 -> rows 8, 9
        assert!((stats.leg.unwrap() - 38.5).abs() < 1e-9);

        let reversed = [regions[1], regions[0]];
        let stats = aggregate(&row_field(), &reversed);
        assert_eq!(stats.body_min, Some(30.0));
        assert_eq!(stats.body_max, Some(34.0));
        assert!((stats.leg.unwrap() - 33.5).abs() < 1e-9);
    }

    #[test]
    fn test_box_clamped_to_field() {
        let stats = aggregate(&row_field(), &[region(RegionClass::Head, -5, -5, 50, 2)]);
        assert_eq!(stats.head, Some(31.0));
    }

    #[test]
    fn test_leg_proxy_box_truncates() {
        let proxy = leg_proxy_box(&BoundingBox::new(2, 3, 8, 10));
        // 3 + 7 * 0.7 = 7.9 -> 7
        assert_eq!(proxy, BoundingBox::new(2, 7, 8, 10));
    }
}
