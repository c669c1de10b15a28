/// Data layer: core types, loading, filtering, statistics and export.
///
/// Architecture:
/// ```text
///  vehicles_us*.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  find file, normalize headers, coerce + clean → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, column order, selector values
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → filtered indices
///   └──────────┘
///        │
///        ├──► stats   (KPIs, histogram)
///        └──► export  (filtered CSV)
/// ```

pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
