//! Analysis pipeline: per-image orchestration and batch coordination.

mod analyzer;
mod coordinator;
mod processor;

pub use analyzer::{AnalysisOutcome, Analyzer, ReportedTemperatures};
pub use coordinator::{
    ProcessOptions, collect_input_files, format_suffix, output_dir_for, output_path_for,
};
pub use processor::{ProcessResult, process_file};
