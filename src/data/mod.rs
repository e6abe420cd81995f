/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate schema → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Observation>, date bounds
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  date range + season → FilteredSet
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌───────────┐  ┌──────────┐
///   │ aggregate  │  │ summary   │  grouped means / boxplots, scatter pairs
///   └───────────┘  └──────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;

pub use error::{CriteriaError, LoadError, ParseError};
pub use filter::{filter_observations, FilterCriteria, FilteredSet};
pub use model::{Column, Dataset, Observation, Season, SeasonFilter};
