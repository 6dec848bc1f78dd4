//! The standard set of dashboard summaries.

use super::{Condition, Measure, Scope, SummaryDef};
use crate::config::AnalysisSettings;
use crate::model::Field;

/// An ordered collection of summary definitions.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    defs: Vec<SummaryDef>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The Superstore dashboard battery, parameterized by the analysis
    /// thresholds.
    pub fn standard(settings: &AnalysisSettings) -> Self {
        use Field::*;

        let top = settings.top_n;
        let defs = vec![
            SummaryDef::new("category_sales", "Category wise Sales", "category.csv")
                .group_by(&[Category, SubCategory])
                .show(Measure::Sum(Sales)),
            SummaryDef::new("region_sales", "Region wise Sales", "Region.csv")
                .group_by(&[Region])
                .show(Measure::Sum(Sales)),
            SummaryDef::new("top_orders", "Top Orders", "Top_Orders.csv")
                .with_scope(Scope::DateOnly)
                .sort_desc(Sales.name())
                .limit(top),
            SummaryDef::new(
                "top_products",
                "Selling and Profit Products",
                "Top_Products.csv",
            )
            .with_scope(Scope::DateOnly)
            .group_by(&[Category])
            .show(Measure::Sum(Sales))
            .show(Measure::Sum(Profit))
            .sort_desc(Sales.name())
            .limit(top),
            SummaryDef::new("top_states", "Top States", "Top_States.csv")
                .with_scope(Scope::DateOnly)
                .group_by(&[State])
                .show(Measure::Sum(Sales))
                .show(Measure::Sum(Profit))
                .sort_desc(Sales.name())
                .limit(top),
            SummaryDef::new("top_cities", "Top Cities", "Top_Cities.csv")
                .with_scope(Scope::DateOnly)
                .group_by(&[City])
                .show(Measure::Sum(Sales))
                .show(Measure::Sum(Profit))
                .sort_desc(Sales.name())
                .limit(top),
            SummaryDef::new("discount_sales", "Sales by Discount", "Discount.csv")
                .group_by(&[Discount])
                .show(Measure::Sum(Sales)),
            SummaryDef::new("discount_profit", "Profit by Discount", "Discount_Profit.csv")
                .group_by(&[Discount])
                .show(Measure::Sum(Profit)),
            SummaryDef::new(
                "sub_category_sales",
                "Sales by Sub-Category",
                "Sub_Category.csv",
            )
            .group_by(&[SubCategory])
            .show(Measure::Sum(Sales)),
            SummaryDef::new(
                "most_profitable_product",
                "Most Profitable Product",
                "Most_Profitable.csv",
            )
            .sort_desc(Profit.name())
            .limit(1),
            SummaryDef::new(
                "most_losing_product",
                "Most Losing Product",
                "Most_Losing.csv",
            )
            .sort_asc(Profit.name())
            .limit(1),
            SummaryDef::new(
                "most_profitable_sub_category",
                "Most Profitable Sub-Category",
                "Most_Profitable_Sub-Category.csv",
            )
            .sort_desc(Profit.name())
            .limit(1)
            .project(&[SubCategory, Profit]),
            SummaryDef::new(
                "most_losing_sub_category",
                "Most Losing Sub-Category",
                "Most_Losing_Sub-Category.csv",
            )
            .sort_asc(Profit.name())
            .limit(1)
            .project(&[SubCategory, Profit]),
            SummaryDef::new(
                "high_discount_losses",
                "Sub-Categories with High Discounts but Losses",
                "High_Discount_Losses.csv",
            )
            .filter(Condition::gt(Discount.name(), settings.high_discount_threshold))
            .filter(Condition::lt(Profit.name(), 0.0)),
            SummaryDef::new(
                "consistent_losses",
                "States/Cities with Consistent Losses",
                "Consistent_Losses.csv",
            )
            .group_by(&[State, City])
            .show(Measure::Sum(Profit))
            .having(Condition::lt(Profit.name(), 0.0)),
            SummaryDef::new(
                "selling_well_losses",
                "Products Selling Well but Giving Losses",
                "Selling_Well_Losses.csv",
            )
            .filter(Condition::gt(Sales.name(), settings.selling_well_threshold))
            .filter(Condition::lt(Profit.name(), 0.0)),
            SummaryDef::new(
                "delivery_usage",
                "Most Used Delivery Way",
                "Most_Used_Delivery_Way.csv",
            )
            .group_by(&[ShipMode])
            .show(Measure::Count)
            .sort_desc(Measure::Count.column_name()),
            SummaryDef::new(
                "delivery_profit",
                "Most Profitable Delivery Way",
                "Most_Profitable_Delivery_Way.csv",
            )
            .group_by(&[ShipMode])
            .show(Measure::Sum(Profit)),
            SummaryDef::new(
                "segment_analysis",
                "Customer Segment Analysis",
                "Customer_Segment_Analysis.csv",
            )
            .group_by(&[Segment])
            .show(Measure::Sum(Sales))
            .show(Measure::Sum(Profit)),
            SummaryDef::new(
                "hierarchical_sales",
                "Hierarchical Sales by Region, State, City and Category",
                "Hierarchical_Sales.csv",
            )
            .group_by(&[Region, State, City, Category])
            .show(Measure::Sum(Sales)),
        ];

        Self { defs }
    }

    /// Append a definition. A definition with an existing name replaces it.
    pub fn register(&mut self, def: SummaryDef) {
        match self.defs.iter_mut().find(|d| d.name == def.name) {
            Some(existing) => *existing = def,
            None => self.defs.push(def),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SummaryDef> {
        self.defs.iter().find(|d| d.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SummaryDef> {
        self.defs.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defs.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// A registry holding only the named definitions, in the order given.
    ///
    /// Returns the first unknown name as the error.
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> Result<Registry, String> {
        let defs = names
            .iter()
            .map(|n| self.get(n.as_ref()).cloned().ok_or_else(|| n.as_ref().to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Registry { defs })
    }
}
