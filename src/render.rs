//! Plain-text rendering of tables, KPIs and sales trees.
//!
//! Tables are drawn with a dashed border:
//!
//! ```text
//! |--------------------|
//! | Region | Sales     |
//! |--------------------|
//! | East   | 1,204.50  |
//! |--------------------|
//! ```

use crate::aggregate::{Kpis, SalesNode};
use crate::insight::{Figure, Insight};
use crate::model::{Field, Table, Value};

/// Rendering options.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Decimal places for Sales and Profit cells.
    pub currency_decimals: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            currency_decimals: 2,
        }
    }
}

impl RenderOptions {
    pub fn with_currency_decimals(mut self, decimals: usize) -> Self {
        self.currency_decimals = decimals;
        self
    }
}

/// Insert thousands separators into the integer part of a formatted number.
fn group_thousands(formatted: &str) -> String {
    let (sign, digits) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match digits.find('.') {
        Some(dot) => digits.split_at(dot),
        None => (digits, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}{frac_part}")
}

/// `1234.5` → `1,234.50` with two decimals.
pub fn format_amount(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    group_thousands(&format!("{value:.decimals$}"))
}

/// `-1234.5` → `-$1,234.50`.
pub fn format_currency(value: f64, decimals: usize) -> String {
    let amount = format_amount(value.abs(), decimals);
    if value < 0.0 {
        format!("-${amount}")
    } else {
        format!("${amount}")
    }
}

fn format_cell(value: &Value, currency: bool, options: &RenderOptions) -> String {
    match value {
        Value::Number(n) if currency => format_amount(*n, options.currency_decimals),
        Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        other => other.to_string(),
    }
}

/// Border, header, border, rows, border.
fn tabulate(header: Vec<String>, body: Vec<Vec<String>>) -> Vec<String> {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        let inner = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!(" {cell:<width$} "))
            .collect::<Vec<_>>()
            .join("|");
        format!("|{inner}|")
    };
    let inner_width: usize = widths.iter().map(|w| w + 2).sum::<usize>() + widths.len().saturating_sub(1);
    let border = format!("|{}|", "-".repeat(inner_width));

    let mut lines = vec![border.clone(), line(&header), border.clone()];
    lines.extend(body.iter().map(|row| line(row)));
    lines.push(border);
    lines
}

/// Render a table as bordered text lines.
pub fn table_lines(table: &Table, options: &RenderOptions) -> Vec<String> {
    let currency: Vec<bool> = table
        .columns()
        .iter()
        .map(|c| Field::from_name(c).is_some_and(Field::is_currency))
        .collect();

    let body = table
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(&currency)
                .map(|(value, &is_currency)| format_cell(value, is_currency, options))
                .collect()
        })
        .collect();

    tabulate(table.columns().to_vec(), body)
}

pub fn render_table(table: &Table, options: &RenderOptions) -> String {
    table_lines(table, options).join("\n")
}

/// The three headline figures, one per line.
pub fn render_kpis(kpis: &Kpis, options: &RenderOptions) -> String {
    let decimals = options.currency_decimals;
    format!(
        "Total Sales:  {}\nTotal Profit: {}\nTotal Orders: {}",
        format_currency(kpis.total_sales, decimals),
        format_currency(kpis.total_profit, decimals),
        kpis.total_orders
    )
}

/// Numbered narrative lines.
pub fn render_insights(insights: &[Insight], options: &RenderOptions) -> String {
    insights
        .iter()
        .enumerate()
        .map(|(i, insight)| {
            let figure = match insight.figure {
                Figure::Currency(amount) => format_currency(amount, options.currency_decimals),
                Figure::Orders(count) => format!("{} orders", format_amount(count, 0)),
            };
            format!("{}. {}: {} ({})", i + 1, insight.topic, insight.leader, figure)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indented outline of a sales tree.
pub fn render_tree(root: &SalesNode, options: &RenderOptions) -> String {
    let mut lines = Vec::new();
    push_node(root, 0, options, &mut lines);
    lines.join("\n")
}

fn push_node(node: &SalesNode, depth: usize, options: &RenderOptions, lines: &mut Vec<String>) {
    lines.push(format!(
        "{}{}: {}",
        "  ".repeat(depth),
        node.label,
        format_currency(node.value, options.currency_decimals)
    ));
    for child in &node.children {
        push_node(child, depth + 1, options, lines);
    }
}
