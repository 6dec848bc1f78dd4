//! Headline totals.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{Field, Table, TableResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_sales: f64,
    pub total_profit: f64,
    /// Distinct order identifiers; one order spans several rows.
    pub total_orders: usize,
}

pub fn compute_kpis(table: &Table) -> TableResult<Kpis> {
    let orders: HashSet<_> = table
        .column(Field::OrderId.name())?
        .filter_map(|v| v.label())
        .collect();

    Ok(Kpis {
        total_sales: table.sum(Field::Sales.name())?,
        total_profit: table.sum(Field::Profit.name())?,
        total_orders: orders.len(),
    })
}
