/// Data layer: loading, coercion, typed records and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (ordered columns, raw cells)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  dates / numbers, bad values → Null
///   └───────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ InvestmentDataset │  Vec<InvestmentRecord>, option lists
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  selection → row mask → filtered view
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod record;
