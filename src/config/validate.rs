//! Configuration validation.

use crate::config::Config;
use crate::constants::reference;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_reference(config.reference.temperature)?;
    validate_detector(config)?;
    Ok(())
}

/// Validate a reference temperature from any source.
pub fn validate_reference(temperature: Option<f64>) -> Result<()> {
    if let Some(t) = temperature
        && !(t.is_finite() && (reference::MIN..=reference::MAX).contains(&t))
    {
        return Err(Error::ConfigValidation {
            message: format!(
                "reference temperature must be between {} and {} °C, got {t}",
                reference::MIN,
                reference::MAX
            ),
        });
    }
    Ok(())
}

fn validate_detector(config: &Config) -> Result<()> {
    if config.detector.suffix.trim().is_empty() {
        return Err(Error::ConfigValidation {
            message: "detector suffix must not be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_reference_bounds() {
        assert!(validate_reference(Some(-50.0)).is_ok());
        assert!(validate_reference(Some(150.0)).is_ok());
        assert!(validate_reference(None).is_ok());
        assert!(validate_reference(Some(150.1)).is_err());
        assert!(validate_reference(Some(f64::NAN)).is_err());
        assert!(validate_reference(Some(f64::NEG_INFINITY)).is_err());
    }

    #[test]
    fn test_empty_suffix_rejected() {
        let mut config = Config::default();
        config.detector.suffix = "  ".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(Error::ConfigValidation { .. })
        ));
    }
}
