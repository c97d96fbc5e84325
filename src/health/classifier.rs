//! Rule-based health classification from region temperatures.

use crate::constants::thresholds::{
    FEVER_HEAD, HIGH_HEAD, IRREGULAR_BODY_SPREAD, LOW_LEG, SUSPECTED_SIGN_COUNT,
};
use crate::regions::RegionStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Screening outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthLabel {
    /// Body readings present, no fever, fewer than three signs.
    Healthy,
    /// Hot head with a body reading, fewer than three signs.
    #[serde(rename = "Fever Only")]
    FeverOnly,
    /// Three or more signs.
    #[serde(rename = "Suspected Bird Flu")]
    SuspectedBirdFlu,
    /// Nothing usable was detected. A normal outcome, not an error.
    #[serde(rename = "Detection Failed")]
    DetectionFailed,
}

impl HealthLabel {
    /// Label as shown to users and stored in the result database.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::FeverOnly => "Fever Only",
            Self::SuspectedBirdFlu => "Suspected Bird Flu",
            Self::DetectionFailed => "Detection Failed",
        }
    }
}

impl std::fmt::Display for HealthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HealthLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Healthy" => Ok(Self::Healthy),
            "Fever Only" => Ok(Self::FeverOnly),
            "Suspected Bird Flu" => Ok(Self::SuspectedBirdFlu),
            "Detection Failed" => Ok(Self::DetectionFailed),
            other => Err(format!("unknown health label: {other}")),
        }
    }
}

/// Clinical signs derived from region temperatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    /// Head maximum at or above 43.0 °C.
    HighHeadTemp,
    /// Body p90 minus body minimum above 6.0 °C.
    IrregularBodyTemp,
    /// Leg mean below 38.0 °C.
    LowLegTemp,
}

impl Sign {
    /// Tag used in reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HighHeadTemp => "high_head_temp",
            Self::IrregularBodyTemp => "irregular_body_temp",
            Self::LowLegTemp => "low_leg_temp",
        }
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label plus the signs that contributed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    label: HealthLabel,
    signs: BTreeSet<Sign>,
}

impl ClassificationResult {
    /// The screening label.
    pub const fn label(&self) -> HealthLabel {
        self.label
    }

    /// Signs that fired.
    pub const fn signs(&self) -> &BTreeSet<Sign> {
        &self.signs
    }
}

/// Classify one subject.
///
/// Pure function of its inputs. Order of evaluation:
/// 1. no detection at all is `Detection Failed`;
/// 2. three or more signs is `Suspected Bird Flu`;
/// 3. head ≥ 42.5 °C with a body reading is `Fever Only`;
/// 4. any body reading is `Healthy`;
/// 5. otherwise `Detection Failed`.
///
/// A body reading is present when `body_min` or `body_max` (the 90th
/// percentile) is `Some`. The body mean plays no part in classification.
pub fn classify(
    head: Option<f64>,
    body_min: Option<f64>,
    body_max: Option<f64>,
    leg: Option<f64>,
    detection_found: bool,
) -> ClassificationResult {
    if !detection_found {
        return ClassificationResult {
            label: HealthLabel::DetectionFailed,
            signs: BTreeSet::new(),
        };
    }

    let mut signs = BTreeSet::new();
    if head.is_some_and(|h| h >= HIGH_HEAD) {
        signs.insert(Sign::HighHeadTemp);
    }
    if let (Some(min), Some(max)) = (body_min, body_max)
        && max - min > IRREGULAR_BODY_SPREAD
    {
        signs.insert(Sign::IrregularBodyTemp);
    }
    if leg.is_some_and(|l| l < LOW_LEG) {
        signs.insert(Sign::LowLegTemp);
    }

    let body_present = body_min.is_some() || body_max.is_some();
    let label = if signs.len() >= SUSPECTED_SIGN_COUNT {
        HealthLabel::SuspectedBirdFlu
    } else if head.is_some_and(|h| h >= FEVER_HEAD) && body_present {
        HealthLabel::FeverOnly
    } else if body_present {
        HealthLabel::Healthy
    } else {
        HealthLabel::DetectionFailed
    };

    ClassificationResult { label, signs }
}

/// Classify from aggregated region statistics.
pub fn classify_stats(stats: &RegionStats, detection_found: bool) -> ClassificationResult {
    classify(
        stats.head,
        stats.body_min,
        stats.body_max,
        stats.leg,
        detection_found,
    )
}
