//! Bounding-box overlays for detected regions.

use crate::constants::colors;
use crate::regions::{BoundingBox, DetectedRegion, RegionClass, body_stats, head_max};
use crate::thermal::TemperatureField;
use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use serde::Serialize;
use tracing::warn;

/// Box outline thickness in pixels.
const LINE_WIDTH: u32 = 2;

/// Caption font (DejaVu Sans, see `assets/fonts/LICENSE`).
const CAPTION_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Caption height in pixels.
const CAPTION_SCALE: f32 = 20.0;

/// Head and leg caption baseline, above the box top.
const CAPTION_LIFT: i64 = 10;

/// Body caption baseline, below the box bottom.
const CAPTION_DROP: i64 = 25;

/// A box to draw together with its caption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// Region class.
    pub class: RegionClass,
    /// Box in image pixels.
    pub bbox: BoundingBox,
    /// Caption text.
    pub caption: String,
    /// Outline color (RGB).
    pub color: [u8; 3],
}

/// Build one annotation per detected region.
///
/// Captions describe that box alone: head boxes show their maximum, body
/// boxes their mean with the min and p90, leg boxes no temperature.
pub fn annotations_for(field: &TemperatureField, regions: &[DetectedRegion]) -> Vec<Annotation> {
    regions
        .iter()
        .map(|region| {
            let (caption, color) = match region.class {
                RegionClass::Head => (
                    format!("Head: {:.1}°C", head_max(field, &region.bbox)),
                    colors::HEAD,
                ),
                RegionClass::Body => {
                    let (mean, min, p90) = body_stats(field, &region.bbox);
                    (
                        format!("Body: {mean:.2}°C ({min:.1}-{p90:.1}°C)"),
                        colors::BODY,
                    )
                }
                RegionClass::Leg => ("Leg".to_string(), colors::LEG),
            };
            Annotation {
                class: region.class,
                bbox: region.bbox,
                caption,
                color,
            }
        })
        .collect()
}

/// Draw annotation outlines onto a copy of `image`.
///
/// Boxes are clipped to the image; boxes with no visible area are skipped
/// along with their captions. Captions are kept inside the image.
pub fn draw_annotations(image: &RgbImage, annotations: &[Annotation]) -> RgbImage {
    let mut out = image.clone();
    let (width, height) = (out.width() as usize, out.height() as usize);
    let font = match FontRef::try_from_slice(CAPTION_FONT) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!("Caption font unavailable ({e}), drawing boxes only");
            None
        }
    };

    for annotation in annotations {
        let c = annotation.bbox.clamp(width, height);
        if c.is_empty() {
            continue;
        }

        for inset in 0..LINE_WIDTH {
            let inset = inset as usize;
            let w = (c.x1 - c.x0).saturating_sub(2 * inset);
            let h = (c.y1 - c.y0).saturating_sub(2 * inset);
            if w == 0 || h == 0 {
                break;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let rect = Rect::at((c.x0 + inset) as i32, (c.y0 + inset) as i32)
                .of_size(w as u32, h as u32);
            draw_hollow_rect_mut(&mut out, rect, Rgb(annotation.color));
        }

        if let Some(font) = &font
            && !annotation.caption.is_empty()
        {
            draw_caption(&mut out, font, annotation);
        }
    }

    out
}

fn draw_caption(image: &mut RgbImage, font: &FontRef<'_>, annotation: &Annotation) {
    let scaled = font.as_scaled(PxScale::from(CAPTION_SCALE));
    let (text_width, _) = text_size(CAPTION_SCALE, font, &annotation.caption);
    #[allow(clippy::cast_possible_truncation)]
    let (ascent, line_height) = (
        scaled.ascent().round() as i64,
        (scaled.ascent() - scaled.descent()).ceil() as i64,
    );

    let (x, y) = caption_origin(
        &annotation.bbox,
        annotation.class,
        (i64::from(text_width), ascent, line_height),
        (i64::from(image.width()), i64::from(image.height())),
    );
    draw_text_mut(
        image,
        Rgb(annotation.color),
        x,
        y,
        CAPTION_SCALE,
        font,
        &annotation.caption,
    );
}

/// Top-left corner of a caption of `(width, ascent, line height)` pixels.
fn caption_origin(
    bbox: &BoundingBox,
    class: RegionClass,
    (text_width, ascent, line_height): (i64, i64, i64),
    (width, height): (i64, i64),
) -> (i32, i32) {
    let baseline = match class {
        RegionClass::Body => bbox.y2 + CAPTION_DROP,
        RegionClass::Head | RegionClass::Leg => bbox.y1 - CAPTION_LIFT,
    };
    let x = bbox.x1.clamp(0, (width - text_width).max(0));
    let y = (baseline - ascent).clamp(0, (height - line_height).max(0));
    (
        i32::try_from(x).unwrap_or(i32::MAX),
        i32::try_from(y).unwrap_or(i32::MAX),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn field() -> TemperatureField {
        TemperatureField::filled(20, 20, 40.0)
    }

    #[test]
    fn test_captions_per_class() {
        let regions = [
            DetectedRegion::new(RegionClass::Head, BoundingBox::new(0, 0, 5, 5), 0.9),
            DetectedRegion::new(RegionClass::Body, BoundingBox::new(0, 5, 20, 15), 0.9),
            DetectedRegion::new(RegionClass::Leg, BoundingBox::new(5, 15, 10, 20), 0.9),
        ];
        let annotations = annotations_for(&field(), &regions);
        assert_eq!(annotations[0].caption, "Head: 40.0°C");
        assert_eq!(annotations[0].color, colors::HEAD);
        assert_eq!(annotations[1].caption, "Body: 40.00°C (40.0-40.0°C)");
        assert_eq!(annotations[1].color, colors::BODY);
        assert_eq!(annotations[2].caption, "Leg");
        assert_eq!(annotations[2].color, colors::LEG);
    }

    fn has_ink(image: &RgbImage, rows: std::ops::Range<u32>) -> bool {
        rows.flat_map(|y| (0..image.width()).map(move |x| (x, y)))
            .any(|(x, y)| image.get_pixel(x, y).0 != [0, 0, 0])
    }

    #[test]
    fn test_draw_outlines_box_edges() {
        let image = RgbImage::new(120, 60);
        let annotations = vec![Annotation {
            class: RegionClass::Head,
            bbox: BoundingBox::new(10, 30, 40, 50),
            caption: "Head: 40.0°C".to_string(),
            color: colors::HEAD,
        }];
        let out = draw_annotations(&image, &annotations);
        assert_eq!(out.get_pixel(10, 30).0, colors::HEAD);
        assert_eq!(out.get_pixel(11, 40).0, colors::HEAD);
        assert_eq!(out.get_pixel(25, 40).0, [0, 0, 0]);
        // Caption sits above the box.
        assert!(has_ink(&out, 0..28));
        assert!(!has_ink(&out, 51..60));
    }

    #[test]
    fn test_body_caption_clamped_into_image() {
        let image = RgbImage::new(120, 40);
        let annotations = vec![Annotation {
            class: RegionClass::Body,
            bbox: BoundingBox::new(0, 0, 60, 30),
            caption: "Body: 40.00°C (39.0-41.0°C)".to_string(),
            color: colors::BODY,
        }];
        let out = draw_annotations(&image, &annotations);
        // Below the bottom outline row (29).
        assert!(has_ink(&out, 30..40));
    }

    #[test]
    fn test_caption_origin_positions() {
        let metrics = (50, 15, 20);
        let bbox = BoundingBox::new(30, 40, 60, 70);
        assert_eq!(
            caption_origin(&bbox, RegionClass::Head, metrics, (200, 200)),
            (30, 15)
        );
        assert_eq!(
            caption_origin(&bbox, RegionClass::Leg, metrics, (200, 200)),
            (30, 15)
        );
        assert_eq!(
            caption_origin(&bbox, RegionClass::Body, metrics, (200, 200)),
            (30, 80)
        );
        // Pushed back inside a small image.
        assert_eq!(
            caption_origin(&bbox, RegionClass::Body, metrics, (70, 90)),
            (20, 70)
        );
        let top = BoundingBox::new(-5, 0, 10, 10);
        assert_eq!(
            caption_origin(&top, RegionClass::Head, metrics, (200, 200)),
            (0, 0)
        );
    }

    #[test]
    fn test_bundled_font_parses() {
        assert!(FontRef::try_from_slice(CAPTION_FONT).is_ok());
    }

    #[test]
    fn test_draw_skips_degenerate_and_outside_boxes() {
        let image = RgbImage::new(10, 10);
        let annotations = vec![
            Annotation {
                class: RegionClass::Body,
                bbox: BoundingBox::new(50, 50, 80, 80),
                caption: String::new(),
                color: colors::BODY,
            },
            Annotation {
                class: RegionClass::Head,
                bbox: BoundingBox::new(3, 3, 3, 9),
                caption: String::new(),
                color: colors::HEAD,
            },
        ];
        let out = draw_annotations(&image, &annotations);
        assert_eq!(out, image);
    }
}
