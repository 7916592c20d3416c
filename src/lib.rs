//! Reshape a wide indicator table (one column per year) into per-year
//! frames of `{code, area, x, y, r}` points for an animated bubble chart.

pub mod config;
pub mod data;
pub mod error;
pub mod output;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use output::BubbleDocument;
pub use pipeline::{run, transform, RunSummary};
