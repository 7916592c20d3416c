use regex::Regex;

use crate::config::ColumnNames;
use crate::error::PipelineError;

use super::model::RawTable;

// ---------------------------------------------------------------------------
// Identifier columns
// ---------------------------------------------------------------------------

/// Resolved positions of the identifier columns in the source header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// Which country code candidate was found.
    pub code_column: String,
    pub code: usize,
    pub area: usize,
    pub item: usize,
    pub element: usize,
    pub unit: usize,
}

/// Return the first candidate present in `table`.
pub fn resolve_country_code_column(
    table: &RawTable,
    candidates: &[String],
) -> Result<String, PipelineError> {
    candidates
        .iter()
        .find(|c| table.column_index(c).is_some())
        .cloned()
        .ok_or_else(|| PipelineError::NoCountryCodeColumn {
            candidates: candidates.to_vec(),
        })
}

/// Locate the country code column and check the fixed descriptor columns.
///
/// Names are matched exactly, like year headers.
pub fn resolve_columns(table: &RawTable, names: &ColumnNames) -> Result<TableLayout, PipelineError> {
    let code_column = resolve_country_code_column(table, &names.country_code_candidates)?;

    let position = |name: &str| {
        table
            .column_index(name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    };

    // Check in a fixed order so the reported column is stable.
    for name in names.required() {
        position(name)?;
    }

    Ok(TableLayout {
        code: position(&code_column)?,
        area: position(&names.area)?,
        item: position(&names.item)?,
        element: position(&names.element)?,
        unit: position(&names.unit)?,
        code_column,
    })
}

// ---------------------------------------------------------------------------
// Year columns
// ---------------------------------------------------------------------------

/// A header that holds one year of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearColumn {
    pub year: i32,
    pub index: usize,
}

/// Inclusive range of years kept in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub min: i32,
    pub max: i32,
}

impl YearWindow {
    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

/// Find every `<prefix>dddd` header, sorted by year.
///
/// Headers must match exactly; a padded `" Y1999 "` is not a year column.
/// If two headers name the same year the leftmost one is kept.
pub fn discover_year_columns(headers: &[String], prefix: char) -> Result<Vec<YearColumn>, PipelineError> {
    let pattern = Regex::new(&format!(r"^{}(\d{{4}})$", regex::escape(&prefix.to_string())))
        .map_err(|e| PipelineError::Config(format!("invalid year prefix '{prefix}': {e}")))?;

    let mut columns: Vec<YearColumn> = Vec::new();
    for (index, header) in headers.iter().enumerate() {
        let Some(caps) = pattern.captures(header) else {
            continue;
        };
        let Ok(year) = caps[1].parse::<i32>() else {
            continue;
        };
        if columns.iter().any(|c| c.year == year) {
            log::warn!("Ignoring duplicate year column '{header}'");
            continue;
        }
        columns.push(YearColumn { year, index });
    }

    if columns.is_empty() {
        return Err(PipelineError::NoYearColumns { prefix });
    }
    columns.sort_by_key(|c| c.year);
    Ok(columns)
}

/// Restrict discovered year columns to `[min, max]`.
///
/// Unset bounds default to the discovered range. `discovered` must be
/// non-empty and sorted, as returned by [`discover_year_columns`].
pub fn select_year_window(
    discovered: &[YearColumn],
    min: Option<i32>,
    max: Option<i32>,
) -> (YearWindow, Vec<YearColumn>) {
    let first = discovered.first().map(|c| c.year).unwrap_or_default();
    let last = discovered.last().map(|c| c.year).unwrap_or_default();
    let window = YearWindow {
        min: min.unwrap_or(first),
        max: max.unwrap_or(last),
    };
    let selected = discovered
        .iter()
        .copied()
        .filter(|c| window.contains(c.year))
        .collect();
    (window, selected)
}
