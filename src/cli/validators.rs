//! CLI argument validators.

use crate::constants::reference;

/// Parse and validate a bounded float value.
pub fn parse_bounded_float(s: &str, min: f64, max: f64, name: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(min..=max).contains(&value) {
        return Err(format!(
            "{name} must be between {min} and {max}, got {value}"
        ));
    }

    Ok(value)
}

/// Parse and validate a reference temperature in °C.
pub fn parse_reference_temp(s: &str) -> Result<f64, String> {
    parse_bounded_float(s, reference::MIN, reference::MAX, "reference temperature")
}
