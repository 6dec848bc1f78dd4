//! One full render cycle: load, normalize, filter, aggregate.
//!
//! ```text
//! DatasetSource ─[load]─▶ Table ─[normalize]─▶ Dataset ─[filter]─▶ FilteredTables
//!                                                  │                     │
//!                                                  ▼ [kpis]              ▼ [registry]
//!                                                 Kpis             Vec<Summary> + tree
//! ```

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{self, build_tree, compute_kpis, Kpis, Registry, SalesNode, Summary};
use crate::config::SettingsError;
use crate::export::ExportError;
use crate::filter::{self, DateRange, FilterSelection, FilteredTables, GeoSelection};
use crate::loader::{self, DatasetSource, LoadError, LoadOptions};
use crate::model::{Field, Table, TableError};
use crate::normalize::{normalize_dates, DateReport};

/// Name of the summary the sales tree is built from.
pub const HIERARCHY_SUMMARY: &str = "hierarchical_sales";

const HIERARCHY_LEVELS: [Field; 4] = [Field::Region, Field::State, Field::City, Field::Category];

/// Any failure of the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown summary: {0}")]
    UnknownSummary(String),

    #[error("No parseable order dates; pass an explicit date range")]
    NoDates,

    #[error("No dataset given; pass --file or set dataset.default_path")]
    NoDataset,
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// A loaded table with its order dates normalized.
#[derive(Debug, Clone)]
pub struct Dataset {
    table: Table,
    report: DateReport,
}

impl Dataset {
    /// Load and normalize a dataset.
    pub fn load(source: DatasetSource, options: &LoadOptions) -> AnalyticsResult<Self> {
        let table = loader::load(source, options)?;
        Self::from_table(table)
    }

    /// Normalize an already loaded table.
    pub fn from_table(table: Table) -> AnalyticsResult<Self> {
        let (table, report) = normalize_dates(&table)?;
        Ok(Self { table, report })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn date_report(&self) -> &DateReport {
        &self.report
    }

    /// The full span of parsed order dates.
    pub fn full_range(&self) -> Option<DateRange> {
        self.report.bounds.map(DateRange::from)
    }

    /// Build a selection, defaulting missing ends of the range to the
    /// dataset's bounds.
    pub fn selection(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        geography: GeoSelection,
    ) -> AnalyticsResult<FilterSelection> {
        let bounds = self.full_range();
        let start = start.or(bounds.map(|b| b.start)).ok_or(AnalyticsError::NoDates)?;
        let end = end.or(bounds.map(|b| b.end)).ok_or(AnalyticsError::NoDates)?;
        Ok(FilterSelection::new(DateRange::new(start, end)).with_geography(geography))
    }

    /// Headline totals over the whole dataset, ignoring any selection.
    pub fn kpis(&self) -> AnalyticsResult<Kpis> {
        Ok(compute_kpis(&self.table)?)
    }

    pub fn filter(&self, selection: &FilterSelection) -> AnalyticsResult<FilteredTables> {
        Ok(filter::apply(&self.table, selection)?)
    }

    /// Cascading geography choices for a date range.
    pub fn options(&self, range: &DateRange, geography: &GeoSelection) -> AnalyticsResult<GeoOptions> {
        let dated = filter::filter_by_date(&self.table, range)?;
        Ok(GeoOptions {
            regions: filter::region_options(&dated)?,
            states: filter::state_options(&dated, &geography.regions)?,
            cities: filter::city_options(&dated, &geography.regions, &geography.states)?,
        })
    }

    /// Run a registry against a selection.
    pub fn analyze(&self, registry: &Registry, selection: &FilterSelection) -> AnalyticsResult<Dashboard> {
        let tables = self.filter(selection)?;
        Dashboard::build(self.kpis()?, registry, &tables)
    }
}

/// Choices offered at each level of the geography cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoOptions {
    pub regions: Vec<String>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
}

/// A summary that could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryFailure {
    pub name: String,
    pub error: String,
}

/// Everything one render cycle shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub kpis: Kpis,
    pub summaries: Vec<Summary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SummaryFailure>,
    /// Present when the hierarchy summary ran and has rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<SalesNode>,
}

impl Dashboard {
    fn build(kpis: Kpis, registry: &Registry, tables: &FilteredTables) -> AnalyticsResult<Self> {
        let mut summaries = Vec::with_capacity(registry.len());
        let mut failures = Vec::new();
        for (def, result) in aggregate::run_all(registry, tables) {
            match result {
                Ok(summary) => summaries.push(summary),
                Err(e) => {
                    log::warn!("Summary '{}' failed: {}", def.name, e);
                    failures.push(SummaryFailure {
                        name: def.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let tree = summaries
            .iter()
            .find(|s| s.name == HIERARCHY_SUMMARY)
            .and_then(Summary::table)
            .map(|table| build_tree(table, &HIERARCHY_LEVELS, Field::Sales))
            .transpose()?;

        Ok(Self {
            kpis,
            summaries,
            failures,
            tree,
        })
    }

    pub fn summary(&self, name: &str) -> Option<&Summary> {
        self.summaries.iter().find(|s| s.name == name)
    }
}

/// Narrow a registry to the named summaries; an empty list keeps them all.
pub fn select_summaries<S: AsRef<str>>(registry: &Registry, names: &[S]) -> AnalyticsResult<Registry> {
    if names.is_empty() {
        return Ok(registry.clone());
    }
    registry.subset(names).map_err(AnalyticsError::UnknownSummary)
}

/// Collect repeated CLI values into a selection set.
pub fn to_set<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}
