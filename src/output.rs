use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{IndicatorSet, PipelineConfig};
use crate::data::columns::YearWindow;
use crate::data::model::WideRecord;

// ---------------------------------------------------------------------------
// Output document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meta {
    pub indicators: IndicatorSet,
}

/// The JSON handed to the chart: frames keyed by year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleDocument {
    pub years: Vec<i32>,
    /// Four-digit year keys, so lexical order is chronological.
    #[serde(rename = "byYear")]
    pub by_year: BTreeMap<String, Vec<WideRecord>>,
    pub meta: Meta,
}

impl BubbleDocument {
    /// Total number of (region, year) points across all frames.
    pub fn point_count(&self) -> usize {
        self.by_year.values().map(Vec::len).sum()
    }

    /// First and last year, if any.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        Some((*self.years.first()?, *self.years.last()?))
    }

    pub fn frame(&self, year: i32) -> Option<&[WideRecord]> {
        self.by_year.get(&year.to_string()).map(Vec::as_slice)
    }

    /// Pretty-printed JSON, two-space indent, non-ASCII left as is.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing output document")
    }

    /// Serialize fully before touching the file so a failure leaves nothing behind.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = self.to_json_string()?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Post-filter
// ---------------------------------------------------------------------------

/// Descending by radius, missing radius last.
fn by_radius_desc(a: &WideRecord, b: &WideRecord) -> Ordering {
    match (a.r, b.r) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Apply the drop / fill / window / top-N policies and group by year.
///
/// `years` lists every frame to emit; a year with no surviving records
/// still gets an empty frame.
pub fn build_document(
    records: Vec<WideRecord>,
    years: &[i32],
    window: YearWindow,
    config: &PipelineConfig,
) -> BubbleDocument {
    let mut records = records;

    if config.drop_if_missing_xy {
        let before = records.len();
        records.retain(|rec| rec.x.is_some() && rec.y.is_some());
        log::debug!("Dropped {} points missing x or y", before - records.len());
    }

    if let Some(fill) = config.radius_fill {
        for rec in records.iter_mut().filter(|rec| rec.r.is_none()) {
            rec.r = Some(fill);
        }
    }

    records.retain(|rec| window.contains(rec.year));

    let mut by_year: BTreeMap<String, Vec<WideRecord>> = years
        .iter()
        .map(|year| (year.to_string(), Vec::new()))
        .collect();
    for rec in records {
        if let Some(frame) = by_year.get_mut(&rec.year.to_string()) {
            frame.push(rec);
        }
    }

    if let Some(limit) = config.top_n_per_year {
        for frame in by_year.values_mut() {
            frame.sort_by(by_radius_desc);
            frame.truncate(limit);
        }
    }

    BubbleDocument {
        years: years.to_vec(),
        by_year,
        meta: Meta {
            indicators: config.indicators.clone(),
        },
    }
}
