//! Per-pixel temperature fields.
//!
//! Thermal JPEGs exported without radiometric metadata only carry a palette
//! rendering of the scene. The synthesizer in this module maps grayscale
//! intensity linearly onto a 10 °C band around a reference temperature. This
//! is a heuristic estimate, not a measurement: when a true radiometric field
//! is available it is used as-is and the synthesizer is never consulted.

use crate::constants::field::{
    BAND_WIDTH, FALLBACK_HEIGHT, FALLBACK_TEMPERATURE, FALLBACK_WIDTH, MAX_INTENSITY,
    REFERENCE_BASE,
};
use crate::thermal::frame::intensity_plane;
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Reasons a temperature field could not be built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    /// The source grid has no pixels.
    #[error("source image has no pixels")]
    EmptyImage,

    /// The reference temperature is NaN or infinite.
    #[error("reference temperature is not finite: {0}")]
    NonFiniteReference(f64),

    /// The value buffer does not match the declared shape.
    #[error("field shape {width}x{height} does not match {len} values")]
    ShapeMismatch {
        /// Declared width.
        width: usize,
        /// Declared height.
        height: usize,
        /// Number of values supplied.
        len: usize,
    },

    /// A value is NaN or infinite.
    #[error("non-finite temperature at ({x}, {y})")]
    NonFiniteValue {
        /// Column of the offending value.
        x: usize,
        /// Row of the offending value.
        y: usize,
    },
}

/// Where a temperature field came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldOrigin {
    /// Estimated from pixel intensity.
    Synthesized,
    /// Supplied by a radiometric source.
    Radiometric,
    /// Degraded constant field substituted after a failure.
    Fallback,
}

impl std::fmt::Display for FieldOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Synthesized => write!(f, "synthesized"),
            Self::Radiometric => write!(f, "radiometric"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// A row-major grid of temperatures in °C.
///
/// Every value is finite; constructors reject anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureField {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl TemperatureField {
    /// Build a field from row-major values.
    pub fn new(width: usize, height: usize, values: Vec<f64>) -> Result<Self, FieldError> {
        if width.checked_mul(height) != Some(values.len()) {
            return Err(FieldError::ShapeMismatch {
                width,
                height,
                len: values.len(),
            });
        }

        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(FieldError::NonFiniteValue {
                x: idx % width.max(1),
                y: idx / width.max(1),
            });
        }

        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// A field holding the same temperature everywhere.
    ///
    /// Non-finite temperatures are replaced by the fallback temperature.
    pub fn filled(width: usize, height: usize, temperature: f64) -> Self {
        let temperature = if temperature.is_finite() {
            temperature
        } else {
            FALLBACK_TEMPERATURE
        };
        Self {
            width,
            height,
            values: vec![temperature; width * height],
        }
    }

    /// The degraded 100×100 field at 37 °C used when synthesis fails.
    pub fn fallback() -> Self {
        Self::filled(FALLBACK_WIDTH, FALLBACK_HEIGHT, FALLBACK_TEMPERATURE)
    }

    /// Field width in pixels.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Field height in pixels.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Temperature at a pixel, if inside the field.
    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.width && y < self.height {
            self.values.get(y * self.width + x).copied()
        } else {
            None
        }
    }

    /// All values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Values inside the half-open window `[x0, x1) × [y0, y1)`.
    ///
    /// The window is clipped to the field; an inverted or out-of-range window
    /// yields no values.
    pub fn window(&self, x0: usize, x1: usize, y0: usize, y1: usize) -> Vec<f64> {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return Vec::new();
        }

        let mut out = Vec::with_capacity((x1 - x0) * (y1 - y0));
        for y in y0..y1 {
            let row = y * self.width;
            out.extend_from_slice(&self.values[row + x0..row + x1]);
        }
        out
    }

    /// Build a field from rows of values, as read from a radiometric export.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, FieldError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let len = rows.iter().map(Vec::len).sum();
        if rows.iter().any(|r| r.len() != width) {
            return Err(FieldError::ShapeMismatch { width, height, len });
        }
        Self::new(width, height, rows.into_iter().flatten().collect())
    }
}

/// Estimate a reference temperature from mean intensity.
///
/// Maps the mean of the 0..=255 range onto 35..=45 °C.
pub fn estimate_reference(image: &GrayImage) -> Option<f64> {
    let count = u64::from(image.width()) * u64::from(image.height());
    if count == 0 {
        return None;
    }
    let sum: u64 = image.pixels().map(|p| u64::from(p.0[0])).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = sum as f64 / count as f64;
    Some(mean / MAX_INTENSITY * BAND_WIDTH + REFERENCE_BASE)
}

/// Map grayscale intensity onto `[reference - 5, reference + 5]`.
pub fn try_synthesize(
    image: &GrayImage,
    reference: Option<f64>,
) -> Result<TemperatureField, FieldError> {
    let estimated = estimate_reference(image).ok_or(FieldError::EmptyImage)?;
    let reference = reference.unwrap_or(estimated);
    if !reference.is_finite() {
        return Err(FieldError::NonFiniteReference(reference));
    }

    let temp_min = reference - BAND_WIDTH / 2.0;
    let values = image
        .pixels()
        .map(|p| temp_min + f64::from(p.0[0]) / MAX_INTENSITY * BAND_WIDTH)
        .collect();

    debug!(
        "Synthesized {}x{} field around {:.2} °C",
        image.width(),
        image.height(),
        reference
    );

    TemperatureField::new(image.width() as usize, image.height() as usize, values)
}

/// Synthesize a field, degrading to [`TemperatureField::fallback`] on failure.
pub fn synthesize(image: &GrayImage, reference: Option<f64>) -> (TemperatureField, FieldOrigin) {
    match try_synthesize(image, reference) {
        Ok(field) => (field, FieldOrigin::Synthesized),
        Err(e) => {
            warn!("Temperature synthesis failed ({e}), using default field");
            (TemperatureField::fallback(), FieldOrigin::Fallback)
        }
    }
}

/// Decode an image file and synthesize its field.
///
/// An unreadable file degrades to the default field instead of failing.
pub fn synthesize_from_path(path: &Path, reference: Option<f64>) -> (TemperatureField, FieldOrigin) {
    match image::open(path) {
        Ok(img) => synthesize(&intensity_plane(&img.into_rgb8()), reference),
        Err(e) => {
            warn!(
                "Could not read {} for temperature extraction ({e}), using default field",
                path.display()
            );
            (TemperatureField::fallback(), FieldOrigin::Fallback)
        }
    }
}
