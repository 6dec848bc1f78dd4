//! Tree rollup of a grouped summary (Region → State → City → Category).

use serde::Serialize;

use crate::model::{Field, Table, TableResult};

/// One node of a sales tree. A node's value is the sum of its children's.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesNode {
    pub label: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SalesNode>,
}

impl SalesNode {
    fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: 0.0,
            children: Vec::new(),
        }
    }

    fn child(&mut self, label: &str) -> &mut SalesNode {
        let index = match self.children.iter().position(|c| c.label == label) {
            Some(index) => index,
            None => {
                self.children.push(SalesNode::new(label));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    /// Number of leaves under this node (itself, if it has no children).
    pub fn leaf_count(&self) -> usize {
        if self.children.is_empty() {
            1
        } else {
            self.children.iter().map(SalesNode::leaf_count).sum()
        }
    }

    /// Depth-first search by label path.
    pub fn find(&self, path: &[&str]) -> Option<&SalesNode> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self
                .children
                .iter()
                .find(|c| c.label == *head)
                .and_then(|c| c.find(rest)),
        }
    }
}

/// Build a tree from a summary whose rows are keyed by `levels` and carry
/// `measure`. Children keep the summary's row order.
pub fn build_tree(summary: &Table, levels: &[Field], measure: Field) -> TableResult<SalesNode> {
    let level_indices = levels
        .iter()
        .map(|field| summary.field_index(*field))
        .collect::<TableResult<Vec<_>>>()?;
    let measure_index = summary.field_index(measure)?;

    let mut root = SalesNode::new("All");
    for row in summary.rows() {
        let value = row[measure_index].as_f64().unwrap_or(0.0);
        let mut node = &mut root;
        node.value += value;
        for &index in &level_indices {
            let label = row[index].label().unwrap_or_default();
            node = node.child(&label);
            node.value += value;
        }
    }
    Ok(root)
}
