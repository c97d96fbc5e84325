//! Output writer trait definition.

use crate::error::Result;
use crate::output::ImageResult;

/// Trait for writing analysis results.
pub trait OutputWriter {
    /// Write the file header (if applicable).
    fn write_header(&mut self) -> Result<()>;

    /// Write a single image result.
    fn write_result(&mut self, result: &ImageResult) -> Result<()>;

    /// Finalize the output (flush, close, etc.).
    fn finalize(&mut self) -> Result<()>;
}
