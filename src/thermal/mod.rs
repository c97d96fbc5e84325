//! Thermal image decoding and temperature field construction.

mod field;
mod frame;
mod radiometric;

pub use field::{
    FieldError, FieldOrigin, TemperatureField, estimate_reference, synthesize,
    synthesize_from_path, try_synthesize,
};
pub use frame::{ThermalImage, intensity_plane};
pub use radiometric::{FixedReference, NoReference, ReferenceSource, load_radiometric_csv};
