//! Radiometric inputs: per-pixel temperature exports and scalar references.

use crate::error::{Error, Result};
use crate::thermal::TemperatureField;
use std::path::Path;

/// Source of a scalar reference temperature for an image.
///
/// Camera-specific metadata extraction lives behind this trait; `None` means
/// the source has no reading for the image and the synthesizer will estimate
/// one from pixel intensity.
pub trait ReferenceSource: Send + Sync {
    /// Reference temperature in °C for the image at `path`.
    fn reference_temperature(&self, path: Option<&Path>) -> Option<f64>;
}

/// Never supplies a reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReference;

impl ReferenceSource for NoReference {
    fn reference_temperature(&self, _path: Option<&Path>) -> Option<f64> {
        None
    }
}

/// Supplies the same reference for every image (e.g. a calibrated ambient
/// reading entered by the operator).
#[derive(Debug, Clone, Copy)]
pub struct FixedReference(pub f64);

impl ReferenceSource for FixedReference {
    fn reference_temperature(&self, _path: Option<&Path>) -> Option<f64> {
        Some(self.0)
    }
}

/// Load a per-pixel temperature export.
///
/// The file is headerless CSV, one image row per line, values in °C.
pub fn load_radiometric_csv(path: &Path) -> Result<TemperatureField> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::RadiometricRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut rows = Vec::new();
    for (line_num, record) in reader.records().enumerate() {
        let record = record.map_err(|e| Error::InvalidRadiometricField {
            message: format!("line {}: {e}", line_num + 1),
        })?;

        let row = record
            .iter()
            .map(|cell| {
                cell.parse::<f64>().map_err(|_| Error::InvalidRadiometricField {
                    message: format!("line {}: '{cell}' is not a number", line_num + 1),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(Error::InvalidRadiometricField {
            message: format!("{} contains no rows", path.display()),
        });
    }

    TemperatureField::from_rows(rows).map_err(|e| Error::InvalidRadiometricField {
        message: e.to_string(),
    })
}
