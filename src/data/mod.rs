/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, coerce numeric cells → MaterialTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ MaterialTable │  Vec<Record>, column index
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐     ┌────────────┐
///   │  filter   │ ──▶ │ aggregate  │  group-by mean / count → charts
///   └──────────┘     └────────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
