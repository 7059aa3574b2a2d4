/// Data layer: core types, loading, and querying.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → JobDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ JobDataset  │  Vec<JobPosting>, title + cluster index
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  title lookup, cluster filter, value counts → Selection
///   └──────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod query;
