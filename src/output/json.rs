//! JSON output format writer.

use crate::error::{Error, Result};
use crate::output::{ImageResult, OutputWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Writes one pretty-printed [`ImageResult`] per file.
///
/// A single result is written as an object; several are written as an array.
pub struct JsonResultWriter {
    results: Vec<ImageResult>,
    output_path: PathBuf,
}

impl JsonResultWriter {
    /// Create a new JSON result writer.
    pub fn new(output_path: &Path) -> Self {
        Self {
            results: Vec::new(),
            output_path: output_path.to_path_buf(),
        }
    }
}

impl OutputWriter for JsonResultWriter {
    fn write_header(&mut self) -> Result<()> {
        // Written at finalize
        Ok(())
    }

    fn write_result(&mut self, result: &ImageResult) -> Result<()> {
        self.results.push(result.clone());
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let file = File::create(&self.output_path)?;
        let writer = BufWriter::new(file);
        let written = if let [single] = self.results.as_slice() {
            serde_json::to_writer_pretty(writer, single)
        } else {
            serde_json::to_writer_pretty(writer, &self.results)
        };
        written.map_err(|e| Error::JsonWrite {
            path: self.output_path.clone(),
            source: e,
        })
    }
}
