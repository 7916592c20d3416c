use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// RawTable – the source file as loaded
// ---------------------------------------------------------------------------

/// A source table with every cell kept as text.
///
/// Rows are padded (or truncated) to `headers.len()` by the loaders, so
/// `rows[i][j]` is always valid for `j < headers.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        RawTable { headers, rows }
    }

    /// Position of the column with exactly this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SourceRow – one cleaned catalogue row
// ---------------------------------------------------------------------------

/// One (region, indicator) row with cleaned identifiers.
///
/// `values[i]` is the raw text of the i-th selected year column.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub code: String,
    pub area: String,
    pub item: String,
    pub element: String,
    pub unit: String,
    pub values: Vec<String>,
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The chart axis a matched series feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    X,
    Y,
    R,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::X, Role::Y, Role::R];

    pub fn key(self) -> &'static str {
        match self {
            Role::X => "x",
            Role::Y => "y",
            Role::R => "r",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Role::X => 0,
            Role::Y => 1,
            Role::R => 2,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Long format
// ---------------------------------------------------------------------------

/// One (row, year) observation. Borrows its identifiers from the source row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongRecord<'a> {
    pub row: &'a SourceRow,
    pub year: i32,
    pub value: Option<f64>,
}

/// A long record that matched one of the configured indicators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggedRecord<'a> {
    pub record: LongRecord<'a>,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// WideRecord – one bubble
// ---------------------------------------------------------------------------

/// One region in one year. Serializes as `{code, area, x, y, r}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WideRecord {
    pub code: String,
    pub area: String,
    #[serde(skip)]
    pub year: i32,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub r: Option<f64>,
}
