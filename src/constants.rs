//! Application-wide constants.
//!
//! Classification thresholds are part of the screening contract and are
//! deliberately not exposed through configuration.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "thermocluck";

/// Detector confidence floor applied to every analysis.
pub const DETECTION_CONFIDENCE_FLOOR: f32 = 0.3;

/// Temperature field synthesis constants.
pub mod field {
    /// Width of the temperature band the intensity range is mapped onto, in °C.
    pub const BAND_WIDTH: f64 = 10.0;

    /// Lower end of the band the mean intensity is mapped onto when no
    /// reference temperature is available.
    pub const REFERENCE_BASE: f64 = 35.0;

    /// Maximum 8-bit intensity.
    pub const MAX_INTENSITY: f64 = 255.0;

    /// Temperature of the degraded fallback field, in °C.
    pub const FALLBACK_TEMPERATURE: f64 = 37.0;

    /// Width of the degraded fallback field.
    pub const FALLBACK_WIDTH: usize = 100;

    /// Height of the degraded fallback field.
    pub const FALLBACK_HEIGHT: usize = 100;
}

/// Region aggregation constants.
pub mod regions {
    /// Percentile used as the body "max" to suppress single-pixel hotspots.
    pub const BODY_MAX_PERCENTILE: f64 = 90.0;

    /// Fraction of the body box height above the leg proxy region.
    ///
    /// The leg proxy covers the bottom 30% of the body box.
    pub const LEG_PROXY_START: f64 = 0.7;
}

/// Health classification thresholds.
pub mod thresholds {
    /// Head maximum at or above this value fires `high_head_temp`.
    pub const HIGH_HEAD: f64 = 43.0;

    /// Body p90 minus body min strictly above this value fires
    /// `irregular_body_temp`.
    pub const IRREGULAR_BODY_SPREAD: f64 = 6.0;

    /// Leg mean strictly below this value fires `low_leg_temp`.
    pub const LOW_LEG: f64 = 38.0;

    /// Head maximum at or above this value (with a body reading) is a fever.
    pub const FEVER_HEAD: f64 = 42.5;

    /// Number of signs that makes an avian influenza suspicion.
    pub const SUSPECTED_SIGN_COUNT: usize = 3;
}

/// Reference temperature bounds accepted from configuration.
pub mod reference {
    /// Lowest accepted reference temperature in °C.
    pub const MIN: f64 = -50.0;
    /// Highest accepted reference temperature in °C.
    pub const MAX: f64 = 150.0;
}

/// Detection sidecar defaults.
pub mod detector {
    /// Default suffix appended to an image stem to find its detection file.
    pub const DEFAULT_SIDECAR_SUFFIX: &str = ".detections.csv";
}

/// Output file suffixes.
pub mod output_extensions {
    /// JSON result suffix.
    pub const JSON: &str = ".thermal.json";
    /// CSV result suffix.
    pub const CSV: &str = ".thermal.csv";
    /// Annotated image suffix.
    pub const ANNOTATED: &str = ".annotated.png";
    /// Heat pattern image suffix.
    pub const HEATMAP: &str = ".heatmap.png";
}

/// Annotation colors (RGB).
pub mod colors {
    /// Head box color.
    pub const HEAD: [u8; 3] = [255, 0, 0];
    /// Body box color.
    pub const BODY: [u8; 3] = [0, 255, 0];
    /// Leg box color.
    pub const LEG: [u8; 3] = [0, 0, 255];
}

/// Result store constants.
pub mod store {
    /// Default database file name inside the data directory.
    pub const DEFAULT_DB_FILE: &str = "results.db";

    /// Timestamp format used for the `date` column.
    pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Identifier recorded when an analysis has no source file name.
    pub const UNKNOWN_IDENTIFIER: &str = "uploaded_image";
}

/// Supported image file extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff"];
