//! Aggregation stage.
//!
//! Every summary the dashboard shows is described by a [`SummaryDef`]: which
//! table it reads, which rows it keeps, how it groups, what it measures, and
//! how the result is ordered, limited and projected. A single engine
//! evaluates any definition:
//!
//! ```text
//! scope table ─▶ filters ─▶ group + measures ─▶ having ─▶ sort ─▶ limit ─▶ project
//! ```
//!
//! Adding a summary is a new [`SummaryDef`] in the [`Registry`], not a new
//! code path.

mod engine;
pub mod hierarchy;
pub mod kpi;
mod registry;

pub use engine::{evaluate, run, run_all};
pub use hierarchy::{build_tree, SalesNode};
pub use kpi::{compute_kpis, Kpis};
pub use registry::Registry;

use serde::Serialize;

use crate::model::{Field, Table, Value};

/// Which table a summary reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Date range and geography applied.
    Filtered,
    /// Date range applied, geography ignored.
    DateOnly,
}

/// A measure computed per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Measure {
    Sum(Field),
    Count,
}

impl Measure {
    /// Output column name: the summed field's name, or `Count`.
    pub fn column_name(&self) -> &'static str {
        match self {
            Measure::Sum(field) => field.name(),
            Measure::Count => "Count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    GreaterThan,
    LessThan,
}

/// A numeric threshold on one column. Non-numeric cells never satisfy it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub column: String,
    pub comparison: Comparison,
    pub threshold: f64,
}

impl Condition {
    pub fn gt(column: impl Into<String>, threshold: f64) -> Self {
        Self {
            column: column.into(),
            comparison: Comparison::GreaterThan,
            threshold,
        }
    }

    pub fn lt(column: impl Into<String>, threshold: f64) -> Self {
        Self {
            column: column.into(),
            comparison: Comparison::LessThan,
            threshold,
        }
    }

    pub fn holds(&self, value: &Value) -> bool {
        match (value.as_f64(), self.comparison) {
            (Some(v), Comparison::GreaterThan) => v > self.threshold,
            (Some(v), Comparison::LessThan) => v < self.threshold,
            (None, _) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortItem {
    pub column: String,
    pub direction: SortDirection,
}

/// A named summary definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryDef {
    pub name: String,
    pub title: String,
    /// File name used when the summary is exported.
    pub file_name: String,
    pub scope: Scope,
    /// Row conditions applied before grouping (all must hold).
    pub filters: Vec<Condition>,
    /// Group keys; empty keeps rows as they are.
    pub group: Vec<Field>,
    /// Measures per group; ignored when `group` is empty.
    pub show: Vec<Measure>,
    /// Conditions on the grouped output (all must hold).
    pub having: Vec<Condition>,
    /// Stable sort; ties keep their input order.
    pub sort: Option<SortItem>,
    pub limit: Option<usize>,
    /// Output columns; empty keeps every column.
    pub project: Vec<String>,
}

impl SummaryDef {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            file_name: file_name.into(),
            scope: Scope::Filtered,
            filters: Vec::new(),
            group: Vec::new(),
            show: Vec::new(),
            having: Vec::new(),
            sort: None,
            limit: None,
            project: Vec::new(),
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.filters.push(condition);
        self
    }

    pub fn group_by(mut self, fields: &[Field]) -> Self {
        self.group.extend_from_slice(fields);
        self
    }

    pub fn show(mut self, measure: Measure) -> Self {
        self.show.push(measure);
        self
    }

    pub fn having(mut self, condition: Condition) -> Self {
        self.having.push(condition);
        self
    }

    pub fn sort_desc(mut self, column: impl Into<String>) -> Self {
        self.sort = Some(SortItem {
            column: column.into(),
            direction: SortDirection::Desc,
        });
        self
    }

    pub fn sort_asc(mut self, column: impl Into<String>) -> Self {
        self.sort = Some(SortItem {
            column: column.into(),
            direction: SortDirection::Asc,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn project(mut self, fields: &[Field]) -> Self {
        self.project
            .extend(fields.iter().map(|f| f.name().to_string()));
        self
    }
}

/// Result of one summary: rows, or an explicit "nothing to show".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "table", rename_all = "snake_case")]
pub enum SummaryOutcome {
    Rows(Table),
    NoData,
}

/// An evaluated summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub name: String,
    pub title: String,
    pub file_name: String,
    pub outcome: SummaryOutcome,
}

impl Summary {
    pub fn from_table(def: &SummaryDef, table: Table) -> Self {
        let outcome = if table.is_empty() {
            SummaryOutcome::NoData
        } else {
            SummaryOutcome::Rows(table)
        };
        Self {
            name: def.name.clone(),
            title: def.title.clone(),
            file_name: def.file_name.clone(),
            outcome,
        }
    }

    pub fn table(&self) -> Option<&Table> {
        match &self.outcome {
            SummaryOutcome::Rows(table) => Some(table),
            SummaryOutcome::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self.outcome, SummaryOutcome::NoData)
    }
}
