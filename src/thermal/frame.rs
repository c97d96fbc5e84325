//! Decoded thermal images.

use crate::error::{Error, Result};
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use std::path::{Path, PathBuf};

/// BT.601 luma weights in Q14 fixed point, as `(r, g, b)`. They sum to `1 << 14`.
const LUMA_WEIGHTS: (u32, u32, u32) = (4899, 9617, 1868);
const LUMA_SHIFT: u32 = 14;

/// Grayscale intensity of an RGB image using BT.601 weights.
///
/// Rounds half up in fixed point, so gray inputs map to themselves.
pub fn intensity_plane(rgb: &RgbImage) -> GrayImage {
    let (wr, wg, wb) = LUMA_WEIGHTS;
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let weighted = u32::from(r) * wr + u32::from(g) * wg + u32::from(b) * wb;
        let luma = (weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT;
        Luma([u8::try_from(luma).unwrap_or(u8::MAX)])
    })
}

/// A decoded thermal image with its grayscale intensity plane.
#[derive(Debug, Clone)]
pub struct ThermalImage {
    source: Option<PathBuf>,
    rgb: RgbImage,
    gray: GrayImage,
}

impl ThermalImage {
    /// Decode an image file.
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|e| Error::ImageDecode {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::from_dynamic(img, Some(path.to_path_buf())))
    }

    /// Decode an in-memory image (e.g. an upload). `name` is used for errors.
    pub fn from_bytes(bytes: &[u8], name: &str) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(|e| Error::ImageDecode {
            path: PathBuf::from(name),
            source: e,
        })?;
        Ok(Self::from_dynamic(img, None))
    }

    /// Wrap an already decoded image.
    pub fn from_dynamic(img: DynamicImage, source: Option<PathBuf>) -> Self {
        let rgb = img.into_rgb8();
        let gray = intensity_plane(&rgb);
        Self { source, rgb, gray }
    }

    /// Path the image was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 8-bit RGB pixels.
    pub const fn rgb(&self) -> &RgbImage {
        &self.rgb
    }

    /// 8-bit grayscale intensity.
    pub const fn gray(&self) -> &GrayImage {
        &self.gray
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.rgb.width()
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.rgb.height()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let result = ThermalImage::from_bytes(b"definitely not an image", "upload");
        assert!(matches!(result, Err(Error::ImageDecode { .. })));
    }

    #[test]
    fn test_intensity_uses_bt601_weights() {
        let red = RgbImage::from_pixel(4, 4, image::Rgb([255, 0, 0]));
        let img = ThermalImage::from_dynamic(DynamicImage::ImageRgb8(red), None);
        assert_eq!(img.gray().get_pixel(0, 0).0, [76]);

        let px = |rgb| intensity_plane(&RgbImage::from_pixel(1, 1, image::Rgb(rgb)))[(0, 0)].0[0];
        assert_eq!(px([0, 255, 0]), 150);
        assert_eq!(px([0, 0, 255]), 29);
        assert_eq!(px([255, 255, 255]), 255);
    }

    #[test]
    fn test_gray_input_keeps_intensity() {
        let gray = GrayImage::from_fn(16, 16, |x, y| Luma([u8::try_from(x * 16 + y).unwrap()]));
        let img = ThermalImage::from_dynamic(DynamicImage::ImageLuma8(gray.clone()), None);
        assert_eq!(img.gray(), &gray);
    }

    #[test]
    fn test_open_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bird.png");
        RgbImage::from_pixel(5, 3, image::Rgb([200, 100, 50]))
            .save(&path)
            .unwrap();

        let img = ThermalImage::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (5, 3));
        assert_eq!(img.gray().dimensions(), (5, 3));
        assert_eq!(img.source(), Some(path.as_path()));
    }
}
