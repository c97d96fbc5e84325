//! Visual annotations: region outlines and heat patterns.
//!
//! Presentation only; nothing here feeds back into classification.

mod heatmap;
mod overlay;

pub use heatmap::heat_pattern;
pub use overlay::{Annotation, annotations_for, draw_annotations};
