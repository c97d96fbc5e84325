//! Persistence of analysis results.
//!
//! Records are append-only with auto-incrementing ids; the analyzer never
//! reads them back.

mod sqlite;

pub use sqlite::SqliteResultStore;

use crate::error::Result;
use serde::Serialize;

/// One stored analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRecord {
    /// Auto-incremented id.
    pub id: i64,
    /// Image identifier (usually the file name).
    pub filename: String,
    /// Overall temperature in °C, `0.0` when none was measured.
    pub temperature: f64,
    /// Health label.
    pub result: String,
    /// Local timestamp, `YYYY-MM-DD HH:MM:SS`.
    pub date: String,
}

/// Record counts by label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    /// `Healthy` records.
    pub healthy: usize,
    /// `Fever Only` records.
    pub fever_only: usize,
    /// `Suspected Bird Flu` records.
    pub suspected: usize,
    /// `Detection Failed` records.
    pub detection_failed: usize,
    /// Records with any other label.
    pub other: usize,
    /// All records.
    pub total: usize,
}

/// Append/read/delete access to stored results.
pub trait ResultStore {
    /// Append a result and return its id.
    fn save(&mut self, identifier: &str, temperature: f64, label: &str) -> Result<i64>;

    /// All records, newest first.
    fn list_all(&self) -> Result<Vec<AnalysisRecord>>;

    /// Records whose date or label contains `keyword`, newest first.
    fn search(&self, keyword: &str) -> Result<Vec<AnalysisRecord>>;

    /// Remove a record. Returns whether it existed.
    fn delete(&mut self, id: i64) -> Result<bool>;

    /// Counts by label.
    fn summary(&self) -> Result<StoreSummary>;
}
