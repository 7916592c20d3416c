use std::collections::BTreeMap;

use super::clean::parse_number;
use super::columns::YearColumn;
use super::model::{LongRecord, SourceRow, TaggedRecord, WideRecord};

// ---------------------------------------------------------------------------
// Wide → long
// ---------------------------------------------------------------------------

/// Flatten every row into one record per selected year.
///
/// Output is row-major: all years of row 0, then all years of row 1, ...
/// so source order survives into the pivot's first-wins tie-break.
pub fn melt<'a>(rows: &'a [SourceRow], years: &[YearColumn]) -> Vec<LongRecord<'a>> {
    let mut long = Vec::with_capacity(rows.len() * years.len());
    for row in rows {
        for (raw, column) in row.values.iter().zip(years) {
            long.push(LongRecord {
                row,
                year: column.year,
                value: parse_number(raw),
            });
        }
    }
    long
}

// ---------------------------------------------------------------------------
// Long → wide
// ---------------------------------------------------------------------------

/// Result of [`pivot`].
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    /// One record per (code, area, year), ordered by that key.
    pub records: Vec<WideRecord>,
    /// Tagged records that hit a (code, area, year, role) slot already taken.
    pub duplicates: usize,
}

#[derive(Default)]
struct Slot {
    seen: bool,
    value: Option<f64>,
}

/// Group tagged records by (code, area, year) and spread roles into x/y/r.
///
/// The first value wins per role. A missing value does not claim the slot:
/// a later non-null duplicate fills it, but never replaces an earlier number.
pub fn pivot(tagged: &[TaggedRecord<'_>]) -> Pivot {
    let mut groups: BTreeMap<(&str, &str, i32), [Slot; 3]> = BTreeMap::new();
    let mut duplicates = 0;

    for t in tagged {
        let key = (t.record.row.code.as_str(), t.record.row.area.as_str(), t.record.year);
        let slot = &mut groups.entry(key).or_default()[t.role.slot()];
        if slot.seen {
            duplicates += 1;
        }
        slot.seen = true;
        if slot.value.is_none() {
            slot.value = t.record.value;
        }
    }

    let records = groups
        .into_iter()
        .map(|((code, area, year), [x, y, r])| WideRecord {
            code: code.to_string(),
            area: area.to_string(),
            year,
            x: x.value,
            y: y.value,
            r: r.value,
        })
        .collect();

    Pivot { records, duplicates }
}
