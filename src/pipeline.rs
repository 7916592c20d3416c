use std::fmt;
use std::path::PathBuf;

use anyhow::Result;

use crate::config::PipelineConfig;
use crate::data::clean::clean_rows;
use crate::data::columns::{discover_year_columns, resolve_columns, select_year_window};
use crate::data::filter::select_indicators;
use crate::data::loader::load_file;
use crate::data::model::RawTable;
use crate::data::reshape::{melt, pivot};
use crate::error::PipelineError;
use crate::output::{build_document, BubbleDocument};

/// What a finished run produced, for the operator's benefit.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub points: usize,
    pub year_span: Option<(i32, i32)>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year_span {
            Some((first, last)) => write!(f, "Years: {first}..{last} | Frames: {} points", self.points),
            None => write!(f, "Years: none | Frames: {} points", self.points),
        }
    }
}

/// Turn a loaded table into the bubble document. No I/O.
pub fn transform(table: &RawTable, config: &PipelineConfig) -> Result<BubbleDocument, PipelineError> {
    let layout = resolve_columns(table, &config.columns)?;
    let discovered = discover_year_columns(&table.headers, config.columns.year_prefix)?;
    let (window, year_columns) = select_year_window(&discovered, config.year_min, config.year_max);
    if year_columns.is_empty() {
        return Err(PipelineError::EmptyYearWindow {
            min: window.min,
            max: window.max,
        });
    }
    let years: Vec<i32> = year_columns.iter().map(|c| c.year).collect();
    log::debug!(
        "Country code column '{}', {} of {} year columns in {}..={}",
        layout.code_column,
        year_columns.len(),
        discovered.len(),
        window.min,
        window.max
    );

    let rows = clean_rows(table, &layout, &year_columns);
    let long = melt(&rows, &year_columns);
    let tagged = select_indicators(&long, &config.indicators)?;

    let pivoted = pivot(&tagged);
    if pivoted.duplicates > 0 {
        log::warn!(
            "{} duplicate indicator values ignored; the first value per region, year and role was kept",
            pivoted.duplicates
        );
    }

    Ok(build_document(pivoted.records, &years, window, config))
}

/// Load `config.input_path`, transform it and write `config.output_path`.
///
/// Nothing is written unless every step succeeds.
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    config.validate()?;
    if !config.input_path.exists() {
        return Err(PipelineError::InputNotFound(config.input_path.clone()).into());
    }

    let table = load_file(&config.input_path)?;
    let document = transform(&table, config)?;
    document.write(&config.output_path)?;

    Ok(RunSummary {
        output_path: config.output_path.clone(),
        points: document.point_count(),
        year_span: document.year_span(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndicatorSpec;

    const HEADER: [&str; 8] = ["Area Code (M49)", "Area", "Item", "Element", "Unit", "Y2000", "Y2001", "Y2001F"];

    fn table(rows: &[[&str; 8]]) -> RawTable {
        RawTable::new(
            HEADER.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            indicators: crate::config::IndicatorSet {
                x: IndicatorSpec::new("GDP", "Per capita", "USD"),
                y: IndicatorSpec::new("Manufacturing", "Share", "%"),
                r: IndicatorSpec::new("GDP", "Total", "million USD"),
            },
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn transform_end_to_end() {
        let t = table(&[
            ["'004", "Afghanistan", "GDP", "Per capita", "USD", "1,000", "1100", "E"],
            ["'004", "Afghanistan", "Manufacturing", "Share", "%", "25.5", "N/A", "E"],
            ["'004", "Afghanistan", "GDP", "Total", "million USD", "500000", "", "E"],
            ["'004", "Afghanistan", "Population", "Total", "1000 No", "1", "2", "E"],
        ]);
        let doc = transform(&t, &config()).unwrap();
        assert_eq!(doc.years, vec![2000, 2001]);

        let frame = doc.frame(2000).unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame[0].code, "004");
        assert_eq!((frame[0].x, frame[0].y, frame[0].r), (Some(1000.0), Some(25.5), Some(500_000.0)));

        // y is unparseable in 2001, so the point is dropped.
        assert!(doc.frame(2001).unwrap().is_empty());
    }

    #[test]
    fn transform_reports_schema_errors() {
        let t = RawTable::new(vec!["Area".into(), "Item".into()], Vec::new());
        assert!(matches!(
            transform(&t, &config()),
            Err(PipelineError::NoCountryCodeColumn { .. })
        ));

        let t = table(&[["1", "A", "Other", "Other", "Other", "1", "1", ""]]);
        assert_eq!(transform(&t, &config()).unwrap_err(), PipelineError::NoIndicatorMatch);
    }

    #[test]
    fn summary_display() {
        let summary = RunSummary {
            output_path: PathBuf::from("out.json"),
            points: 12,
            year_span: Some((1970, 2020)),
        };
        assert_eq!(summary.to_string(), "Years: 1970..2020 | Frames: 12 points");
    }
}
