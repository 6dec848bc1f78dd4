// src/model/field.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// The columns a Superstore dataset is expected to carry.
///
/// Display names are canonical: they are the header text looked up in the
/// loaded table and the column names emitted in summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    OrderId,
    OrderDate,
    Region,
    State,
    City,
    Category,
    SubCategory,
    ProductName,
    ShipMode,
    Segment,
    Sales,
    Profit,
    Discount,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::OrderId,
        Field::OrderDate,
        Field::Region,
        Field::State,
        Field::City,
        Field::Category,
        Field::SubCategory,
        Field::ProductName,
        Field::ShipMode,
        Field::Segment,
        Field::Sales,
        Field::Profit,
        Field::Discount,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::OrderId => "Order ID",
            Field::OrderDate => "Order Date",
            Field::Region => "Region",
            Field::State => "State",
            Field::City => "City",
            Field::Category => "Category",
            Field::SubCategory => "Sub-Category",
            Field::ProductName => "Product Name",
            Field::ShipMode => "Ship Mode",
            Field::Segment => "Segment",
            Field::Sales => "Sales",
            Field::Profit => "Profit",
            Field::Discount => "Discount",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Currency-valued fields, rounded to cents when displayed.
    pub fn is_currency(self) -> bool {
        matches!(self, Field::Sales | Field::Profit)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
