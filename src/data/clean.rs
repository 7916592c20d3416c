use once_cell::sync::Lazy;
use regex::Regex;

use super::columns::{TableLayout, YearColumn};
use super::model::{RawTable, SourceRow};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalise an identifier cell.
///
/// Trims whitespace, drops leading single quotes (spreadsheet text markers)
/// and surrounding double quotes, then collapses internal whitespace runs.
pub fn clean_str(raw: &str) -> String {
    let s = raw.trim().trim_start_matches('\'').trim_matches('"').trim();
    WHITESPACE_RUN.replace_all(s, " ").into_owned()
}

/// Parse a year cell. Anything that is not a finite number is `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let without_commas = raw.replace(',', "");
    let s = without_commas.trim();
    if matches!(s, "" | "nan" | "None") {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Project the table onto the identifier and selected year columns,
/// cleaning identifiers on the way. Row order is preserved.
pub fn clean_rows(table: &RawTable, layout: &TableLayout, years: &[YearColumn]) -> Vec<SourceRow> {
    table
        .rows
        .iter()
        .map(|row| {
            let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
            SourceRow {
                code: clean_str(cell(layout.code)),
                area: clean_str(cell(layout.area)),
                item: clean_str(cell(layout.item)),
                element: clean_str(cell(layout.element)),
                unit: clean_str(cell(layout.unit)),
                values: years.iter().map(|yc| cell(yc.index).to_string()).collect(),
            }
        })
        .collect()
}
