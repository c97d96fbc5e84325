//! Health screening rules.

mod classifier;

pub use classifier::{ClassificationResult, HealthLabel, Sign, classify, classify_stats};
