#[cfg(test)]
mod tests {
    use superstore::aggregate::{build_tree, Registry, SalesNode};
    use superstore::config::AnalysisSettings;
    use superstore::filter::GeoSelection;
    use superstore::loader::load_path;
    use superstore::model::{Field, Table, TableError, Value};
    use superstore::pipeline::{Dashboard, Dataset};

    fn dashboard(geography: GeoSelection) -> Dashboard {
        let raw = load_path(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/superstore_sample.csv"
        ))
        .unwrap();
        let ds = Dataset::from_table(raw).unwrap();
        let selection = ds.selection(None, None, geography).unwrap();
        ds.analyze(&Registry::standard(&AnalysisSettings::default()), &selection)
            .unwrap()
    }

    fn assert_rolls_up(node: &SalesNode) {
        if node.children.is_empty() {
            return;
        }
        let children: f64 = node.children.iter().map(|c| c.value).sum();
        assert!((children - node.value).abs() < 1e-9, "{} does not roll up", node.label);
        node.children.iter().for_each(assert_rolls_up);
    }

    #[test]
    fn test_tree_matches_hierarchical_summary() {
        let dashboard = dashboard(GeoSelection::default());
        let tree = dashboard.tree.as_ref().unwrap();
        let summary = dashboard.summary("hierarchical_sales").unwrap().table().unwrap();

        assert_eq!(tree.label, "All");
        assert_eq!(tree.leaf_count(), summary.len());
        assert!((tree.value - summary.sum("Sales").unwrap()).abs() < 1e-9);
        assert_rolls_up(tree);

        let labels: Vec<_> = tree.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Central", "East", "South", "West"]);

        let la = tree
            .find(&["West", "California", "Los Angeles"])
            .unwrap();
        let categories: Vec<_> = la.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(categories, ["Furniture", "Office Supplies", "Technology"]);
    }

    #[test]
    fn test_tree_follows_geography() {
        let dashboard = dashboard(GeoSelection::default().with_states(["Texas"]));
        let tree = dashboard.tree.unwrap();
        assert_eq!(tree.children.len(), 1);
        let texas = tree.find(&["Central", "Texas"]).unwrap();
        assert_eq!(texas.children.len(), 2);
        assert!((texas.value - 191.354).abs() < 1e-9);
    }

    #[test]
    fn test_build_tree_requires_levels() {
        let summary = Table::from_rows(
            vec!["Region".into(), "Sales".into()],
            vec![vec![Value::text("East"), Value::Number(1.0)]],
        )
        .unwrap();
        let err = build_tree(&summary, &[Field::Region, Field::State], Field::Sales).unwrap_err();
        assert_eq!(err, TableError::MissingField("State".to_string()));
    }
}
