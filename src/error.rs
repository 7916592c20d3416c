use std::path::PathBuf;

use thiserror::Error;

/// Schema and configuration failures that abort a run before any output is written.
///
/// Lower-level failures (I/O, CSV, JSON, Parquet) travel through `anyhow` with
/// context attached; these variants are the ones callers may want to match on
/// via `anyhow::Error::downcast_ref`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("none of these country code columns exist: {candidates:?}")]
    NoCountryCodeColumn { candidates: Vec<String> },

    #[error("expected column '{0}' not found")]
    MissingColumn(String),

    #[error("no year value columns found (expected columns like {prefix}1970, {prefix}1971, ...)")]
    NoYearColumns { prefix: char },

    #[error("year window {min}..={max} contains no year columns")]
    EmptyYearWindow { min: i32, max: i32 },

    #[error("no rows matched the configured indicators; check the Item/Element/Unit strings")]
    NoIndicatorMatch,

    #[error("configuration error: {0}")]
    Config(String),
}
