//! Result file writers and batch reporting.

mod csv;
mod json;
pub mod progress;
mod types;
mod writer;

pub use csv::CsvWriter;
pub use json::JsonResultWriter;
pub use types::{BatchSummary, ImageResult, RegionEntry};
pub use writer::OutputWriter;
