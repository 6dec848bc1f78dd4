//! # Superstore
//!
//! Retail sales analytics over Superstore-style transaction tables.
//!
//! ## Architecture
//!
//! Every run re-executes the whole pipeline; nothing is cached between runs:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        Dataset file (csv / tsv / txt / xlsx / ods)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [loader]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Table (rows of Values)                   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [normalize]
//! ┌─────────────────────────────────────────────────────────┐
//! │          Table with parsed Order Date + bounds           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [filter]
//! ┌─────────────────────────────────────────────────────────┐
//! │        date-filtered table  +  geo-filtered table        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [aggregate]
//! ┌─────────────────────────────────────────────────────────┐
//! │          Summaries (rows or no data) + sales tree        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [render / export]
//! ┌─────────────────────────────────────────────────────────┐
//! │               Text tables, JSON, CSV files               │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod aggregate;
pub mod config;
pub mod export;
pub mod filter;
pub mod insight;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod profile;
pub mod render;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::aggregate::{
        Condition, Kpis, Measure, Registry, SalesNode, Scope, Summary, SummaryDef, SummaryOutcome,
    };
    pub use crate::config::{AnalysisSettings, Settings};
    pub use crate::export::{export_all, read_exported, to_csv_bytes, to_csv_string, write_summary};
    pub use crate::filter::{DateRange, FilterSelection, FilteredTables, GeoSelection};
    pub use crate::insight::{insights, Insight};
    pub use crate::loader::{load, load_path, DatasetSource, LoadOptions};
    pub use crate::model::{Field, Table, Value};
    pub use crate::normalize::normalize_dates;
    pub use crate::pipeline::{AnalyticsError, AnalyticsResult, Dashboard, Dataset};
    pub use crate::profile::View;
    pub use crate::render::RenderOptions;
}
