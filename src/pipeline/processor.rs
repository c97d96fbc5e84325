//! Single image processing: analyze, write outputs, persist.

use crate::annotate::heat_pattern;
use crate::config::OutputFormat;
use crate::constants::output_extensions;
use crate::constants::store::UNKNOWN_IDENTIFIER;
use crate::error::{Error, Result};
use crate::health::HealthLabel;
use crate::output::{CsvWriter, ImageResult, JsonResultWriter, OutputWriter};
use crate::pipeline::{Analyzer, ProcessOptions, format_suffix, output_dir_for, output_path_for};
use crate::store::ResultStore;
use crate::thermal::{TemperatureField, ThermalImage};
use image::RgbImage;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Outcome of processing one image.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    /// The result as written to result files.
    pub result: ImageResult,
    /// Store id, when the result was persisted.
    pub record_id: Option<i64>,
    /// Files written.
    pub outputs: Vec<PathBuf>,
    /// Processing time in seconds.
    pub duration_secs: f64,
}

impl ProcessResult {
    /// The screening label.
    pub const fn label(&self) -> HealthLabel {
        self.result.label
    }
}

/// Analyze one image file and write its outputs.
///
/// `radiometric` replaces the synthesized field when given. When `store` is
/// given the overall temperature and label are appended to it.
pub fn process_file(
    input_path: &Path,
    analyzer: &Analyzer,
    radiometric: Option<&TemperatureField>,
    options: &ProcessOptions,
    store: Option<&mut dyn ResultStore>,
) -> Result<ProcessResult> {
    let start_time = Instant::now();
    info!("Processing: {}", input_path.display());

    let image = ThermalImage::open(input_path)?;
    debug!("Decoded {}x{} image", image.width(), image.height());

    let outcome = analyzer.analyze_with_field(&image, radiometric)?;
    let mut result = ImageResult::from_outcome(input_path, &outcome);

    let output_dir = output_dir_for(input_path, options.output_dir.as_deref());
    std::fs::create_dir_all(&output_dir)?;
    let mut outputs = Vec::new();

    if options.annotate {
        let path = output_path_for(input_path, &output_dir, output_extensions::ANNOTATED);
        save_png(&outcome.annotated, &path)?;
        result.annotated_image = Some(path.display().to_string());
        outputs.push(path);
    }

    if options.heatmap {
        let path = output_path_for(input_path, &output_dir, output_extensions::HEATMAP);
        save_png(&heat_pattern(image.gray()), &path)?;
        result.heatmap_image = Some(path.display().to_string());
        outputs.push(path);
    }

    for format in &options.formats {
        let path = output_path_for(input_path, &output_dir, format_suffix(*format));
        write_result(&path, *format, &result)?;
        outputs.push(path);
    }

    let record_id = match store {
        Some(store) => {
            let identifier = input_path
                .file_name()
                .map_or_else(|| UNKNOWN_IDENTIFIER.to_string(), |n| {
                    n.to_string_lossy().into_owned()
                });
            Some(store.save(
                &identifier,
                outcome.reported.overall_or_zero(),
                outcome.label().as_str(),
            )?)
        }
        None => None,
    };

    let duration_secs = start_time.elapsed().as_secs_f64();
    info!(
        "{}: {} in {:.2}s",
        result.source_file, result.label, duration_secs
    );

    Ok(ProcessResult {
        result,
        record_id,
        outputs,
        duration_secs,
    })
}

/// Write a single result in one format.
fn write_result(path: &Path, format: OutputFormat, result: &ImageResult) -> Result<()> {
    let mut writer: Box<dyn OutputWriter> = match format {
        OutputFormat::Json => Box::new(JsonResultWriter::new(path)),
        OutputFormat::Csv => Box::new(CsvWriter::new(path)?),
    };
    writer.write_header()?;
    writer.write_result(result)?;
    writer.finalize()?;
    debug!("Wrote {}", path.display());
    Ok(())
}

fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| Error::ImageWrite {
            path: path.to_path_buf(),
            source: e,
        })
}
