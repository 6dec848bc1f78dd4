//! Narrative highlights drawn from a computed dashboard.
//!
//! Each highlight names the leader of one summary: the best selling region,
//! the most profitable product, the most used delivery way and so on. A
//! highlight whose summary is missing or has no data is left out.

use serde::Serialize;

use crate::aggregate::Measure;
use crate::model::{Field, Table, Value};
use crate::pipeline::Dashboard;

/// The figure a highlight reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Figure {
    Currency(f64),
    Orders(f64),
}

/// One line of the narrative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub topic: &'static str,
    pub leader: String,
    pub figure: Figure,
}

#[derive(Clone, Copy)]
enum Pick {
    Highest,
    Lowest,
}

struct Rule {
    topic: &'static str,
    summary: &'static str,
    key: Field,
    measure: Measure,
    pick: Pick,
}

const fn rule(topic: &'static str, summary: &'static str, key: Field, measure: Measure, pick: Pick) -> Rule {
    Rule {
        topic,
        summary,
        key,
        measure,
        pick,
    }
}

const RULES: &[Rule] = &[
    rule("Best Selling Region", "region_sales", Field::Region, Measure::Sum(Field::Sales), Pick::Highest),
    rule("Best Selling Category", "top_products", Field::Category, Measure::Sum(Field::Sales), Pick::Highest),
    rule("Best Selling State", "top_states", Field::State, Measure::Sum(Field::Sales), Pick::Highest),
    rule("Best Selling City", "top_cities", Field::City, Measure::Sum(Field::Sales), Pick::Highest),
    rule(
        "Most Profitable Product",
        "most_profitable_product",
        Field::ProductName,
        Measure::Sum(Field::Profit),
        Pick::Highest,
    ),
    rule(
        "Most Losing Product",
        "most_losing_product",
        Field::ProductName,
        Measure::Sum(Field::Profit),
        Pick::Lowest,
    ),
    rule(
        "Most Profitable Sub-Category",
        "most_profitable_sub_category",
        Field::SubCategory,
        Measure::Sum(Field::Profit),
        Pick::Highest,
    ),
    rule(
        "Most Losing Sub-Category",
        "most_losing_sub_category",
        Field::SubCategory,
        Measure::Sum(Field::Profit),
        Pick::Lowest,
    ),
    rule("Most Used Delivery Way", "delivery_usage", Field::ShipMode, Measure::Count, Pick::Highest),
    rule(
        "Most Profitable Delivery Way",
        "delivery_profit",
        Field::ShipMode,
        Measure::Sum(Field::Profit),
        Pick::Highest,
    ),
    rule(
        "Most Profitable Segment",
        "segment_analysis",
        Field::Segment,
        Measure::Sum(Field::Profit),
        Pick::Highest,
    ),
    rule(
        "Most Profitable Discount",
        "discount_profit",
        Field::Discount,
        Measure::Sum(Field::Profit),
        Pick::Highest,
    ),
];

/// Build the narrative for a dashboard, in a fixed topic order.
pub fn insights(dashboard: &Dashboard) -> Vec<Insight> {
    RULES
        .iter()
        .filter_map(|rule| {
            let table = dashboard.summary(rule.summary)?.table()?;
            leader(table, rule)
        })
        .collect()
}

/// First row holding the extreme numeric measure.
fn leader(table: &Table, rule: &Rule) -> Option<Insight> {
    let key = table.field_index(rule.key).ok()?;
    let measure = table.column_index(rule.measure.column_name()).ok()?;

    let mut best: Option<(&Value, f64)> = None;
    for row in table.rows() {
        let Some(amount) = row[measure].as_f64() else {
            continue;
        };
        if row[key].is_null() {
            continue;
        }
        let better = match (best, rule.pick) {
            (None, _) => true,
            (Some((_, current)), Pick::Highest) => amount > current,
            (Some((_, current)), Pick::Lowest) => amount < current,
        };
        if better {
            best = Some((&row[key], amount));
        }
    }

    let (value, amount) = best?;
    let leader = match (rule.key, value) {
        (Field::Discount, Value::Number(rate)) => format!("{:.0}%", rate * 100.0),
        _ => value.label()?.into_owned(),
    };
    let figure = match rule.measure {
        Measure::Count => Figure::Orders(amount),
        Measure::Sum(_) => Figure::Currency(amount),
    };
    Some(Insight {
        topic: rule.topic,
        leader,
        figure,
    })
}
