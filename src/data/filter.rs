use crate::config::{IndicatorSet, IndicatorSpec};
use crate::error::PipelineError;

use super::clean::clean_str;
use super::model::{LongRecord, SourceRow, TaggedRecord};

// ---------------------------------------------------------------------------
// Indicator predicate
// ---------------------------------------------------------------------------

/// A cleaned (item, element, unit) triple ready for exact matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorFilter {
    item: String,
    element: String,
    unit: String,
}

impl IndicatorFilter {
    /// Clean the configured strings the same way source cells are cleaned.
    pub fn new(spec: &IndicatorSpec) -> Self {
        Self {
            item: clean_str(&spec.item),
            element: clean_str(&spec.element),
            unit: clean_str(&spec.unit),
        }
    }

    /// Case-sensitive match on all three descriptors.
    pub fn matches(&self, row: &SourceRow) -> bool {
        row.item == self.item && row.element == self.element && row.unit == self.unit
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Keep the long records matching each indicator, tagged with its role.
///
/// Subsets are concatenated in role order (x, y, r), each in source order.
/// An indicator matching nothing is only a warning; all three matching
/// nothing means the configuration does not describe this file.
pub fn select_indicators<'a>(
    long: &[LongRecord<'a>],
    indicators: &IndicatorSet,
) -> Result<Vec<TaggedRecord<'a>>, PipelineError> {
    let mut selected = Vec::new();

    for (role, spec) in indicators.iter() {
        let filter = IndicatorFilter::new(spec);
        let before = selected.len();
        selected.extend(
            long.iter()
                .filter(|rec| filter.matches(rec.row))
                .map(|&record| TaggedRecord { record, role }),
        );
        let matched = selected.len() - before;
        if matched == 0 {
            log::warn!(
                "No rows matched indicator {role}: {} / {} / {}",
                spec.item,
                spec.element,
                spec.unit
            );
        } else {
            log::debug!("Indicator {role} matched {matched} observations");
        }
    }

    if selected.is_empty() {
        return Err(PipelineError::NoIndicatorMatch);
    }
    Ok(selected)
}
