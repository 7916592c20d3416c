/// Data layer: loading, cleaning, reshaping and indicator selection.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable (all text)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ columns   │  country code / descriptor / year columns
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean    │  RawTable → Vec<SourceRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ reshape   │  melt → LongRecord per (row, year)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  indicator match → TaggedRecord (x / y / r)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ reshape   │  pivot → WideRecord per (code, area, year)
///   └──────────┘
/// ```

pub mod clean;
pub mod columns;
pub mod filter;
pub mod loader;
pub mod model;
pub mod reshape;
