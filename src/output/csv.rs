//! CSV output format writer.

use crate::error::{Error, Result};
use crate::output::{ImageResult, OutputWriter};
use std::fs::File;
use std::path::{Path, PathBuf};

const HEADER: [&str; 10] = [
    "File",
    "Result",
    "Signs",
    "Head (°C)",
    "Body (°C)",
    "Body min (°C)",
    "Body max (°C)",
    "Leg (°C)",
    "Overall (°C)",
    "Field",
];

/// One row per image; absent temperatures are empty cells.
pub struct CsvWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl CsvWriter {
    /// Create a new CSV writer.
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: csv::Writer::from_writer(file),
            path: path.to_path_buf(),
        })
    }

    fn map_err(&self, source: csv::Error) -> Error {
        Error::CsvWrite {
            path: self.path.clone(),
            source,
        }
    }
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("{v:.2}"))
}

impl OutputWriter for CsvWriter {
    fn write_header(&mut self) -> Result<()> {
        self.writer
            .write_record(HEADER)
            .map_err(|e| self.map_err(e))
    }

    fn write_result(&mut self, result: &ImageResult) -> Result<()> {
        let t = &result.temperatures;
        let signs = result
            .signs
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(";");
        let record = [
            result.source_file.clone(),
            result.label.to_string(),
            signs,
            cell(t.head),
            cell(t.body),
            cell(t.body_min),
            cell(t.body_max),
            cell(t.leg),
            cell(result.overall_temperature),
            result.field_origin.to_string(),
        ];
        self.writer
            .write_record(&record)
            .map_err(|e| self.map_err(e))
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
