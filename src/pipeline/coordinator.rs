//! Batch coordination for image processing.

use crate::config::OutputFormat;
use crate::constants::{IMAGE_EXTENSIONS, output_extensions};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Options for processing a single image.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Output directory (None = same as input).
    pub output_dir: Option<PathBuf>,
    /// Result file formats to generate.
    pub formats: Vec<OutputFormat>,
    /// Write the annotated image.
    pub annotate: bool,
    /// Write the heat pattern image.
    pub heatmap: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            output_dir: None,
            formats: vec![OutputFormat::Json],
            annotate: true,
            heatmap: true,
        }
    }
}

/// Determine the output directory for a file.
pub fn output_dir_for(input: &Path, explicit_output_dir: Option<&Path>) -> PathBuf {
    explicit_output_dir.map_or_else(
        || {
            input
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        },
        Path::to_path_buf,
    )
}

/// Output file path for `input` with the given suffix.
pub fn output_path_for(input: &Path, output_dir: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().map_or_else(
        || std::borrow::Cow::Borrowed("output"),
        |s| s.to_string_lossy(),
    );
    output_dir.join(format!("{stem}{suffix}"))
}

/// Result file suffix for a format.
pub const fn format_suffix(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Json => output_extensions::JSON,
        OutputFormat::Csv => output_extensions::CSV,
    }
}

/// Collect image files from paths (files and directories), sorted.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_image_file(path) {
                files.push(path.clone());
            } else {
                warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            let mut found = Vec::new();
            collect_image_files_recursive(path, &mut found)?;
            found.sort();
            files.extend(found);
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    Ok(files)
}

fn collect_image_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_image_files_recursive(&path, files)?;
        } else if is_image_file(&path) && !is_generated_output(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Check if a file has a supported image extension.
fn is_image_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    })
}

/// Images this tool wrote itself are not re-analyzed on a second run.
fn is_generated_output(path: &Path) -> bool {
    path.file_name().is_some_and(|name| {
        let name = name.to_string_lossy();
        name.ends_with(output_extensions::ANNOTATED) || name.ends_with(output_extensions::HEATMAP)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_output_dir_for_with_explicit() {
        let input = Path::new("/data/hen.jpg");
        let output = output_dir_for(input, Some(Path::new("/results")));
        assert_eq!(output, PathBuf::from("/results"));
    }

    #[test]
    fn test_output_dir_for_without_explicit() {
        let output = output_dir_for(Path::new("/data/hen.jpg"), None);
        assert_eq!(output, PathBuf::from("/data"));
    }

    #[test]
    fn test_output_path_for_suffixes() {
        let path = output_path_for(
            Path::new("hen_07.jpg"),
            Path::new("/out"),
            format_suffix(OutputFormat::Json),
        );
        assert_eq!(path, PathBuf::from("/out/hen_07.thermal.json"));

        let path = output_path_for(
            Path::new("hen_07.jpg"),
            Path::new("/out"),
            output_extensions::ANNOTATED,
        );
        assert_eq!(path, PathBuf::from("/out/hen_07.annotated.png"));
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("a.png")));
        assert!(is_image_file(Path::new("a.JPG")));
        assert!(is_image_file(Path::new("a.tiff")));
        assert!(!is_image_file(Path::new("a.csv")));
        assert!(!is_image_file(Path::new("noext")));
    }

    #[test]
    fn test_collect_sorted_and_skips_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("pen_b");
        std::fs::create_dir(&nested).unwrap();
        for name in ["b.png", "a.jpg", "a.annotated.png", "a.heatmap.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::write(nested.join("c.bmp"), b"").unwrap();

        let files = collect_input_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "c.bmp"]);
    }

    #[test]
    fn test_collect_missing_path_is_skipped() {
        let files = collect_input_files(&[PathBuf::from("/definitely/not/here")]).unwrap();
        assert!(files.is_empty());
    }
}
