//! False-color heat pattern rendering.

use image::{GrayImage, Rgb, RgbImage};

/// Jet colormap: blue → cyan → yellow → red over `[0, 1]`.
fn jet(val01: f32) -> Rgb<u8> {
    let x = val01.clamp(0.0, 1.0);
    let channel = |center: f32| -> u8 {
        let v = (1.5 - 4.0f32.mul_add(x, -center).abs()).clamp(0.0, 1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let byte = (v * 255.0).round() as u8;
        byte
    };
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}

/// Stretch intensity to the full range and map it through the jet colormap.
///
/// A flat image maps to the bottom of the scale.
pub fn heat_pattern(gray: &GrayImage) -> RgbImage {
    let (lo, hi) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p.0[0]), hi.max(p.0[0])));
    let span = f32::from(hi.saturating_sub(lo));

    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = f32::from(gray.get_pixel(x, y).0[0].saturating_sub(lo));
        if span > 0.0 { jet(v / span) } else { jet(0.0) }
    })
}
