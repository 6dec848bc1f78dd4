#[cfg(test)]
mod tests {
    use std::fs;

    use insta::assert_snapshot;
    use superstore::aggregate::{Registry, Summary, SummaryDef};
    use superstore::config::AnalysisSettings;
    use superstore::export::{export_all, read_exported, to_csv_string, write_summary, ExportError};
    use superstore::filter::GeoSelection;
    use superstore::loader::{load_path, read_csv};
    use superstore::model::{Table, Value};
    use superstore::pipeline::{Dashboard, Dataset};

    fn dashboard() -> Dashboard {
        let raw = load_path(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/superstore_sample.csv"
        ))
        .unwrap();
        let ds = Dataset::from_table(raw).unwrap();
        let selection = ds.selection(None, None, GeoSelection::default()).unwrap();
        ds.analyze(&Registry::standard(&AnalysisSettings::default()), &selection)
            .unwrap()
    }

    #[test]
    fn test_region_sales_csv() {
        let dashboard = dashboard();
        let table = dashboard.summary("region_sales").unwrap().table().unwrap();
        assert_snapshot!(to_csv_string(table).unwrap(), @r"
        Region,Sales
        Central,1901.864
        East,280.0
        South,1989.3974999999998
        West,1442.6680000000001
        ");
    }

    #[test]
    fn test_consistent_losses_csv() {
        let dashboard = dashboard();
        let table = dashboard.summary("consistent_losses").unwrap().table().unwrap();
        assert_snapshot!(to_csv_string(table).unwrap(), @r"
        State,City,Profit
        Florida,Fort Lauderdale,-380.51460000000003
        Nebraska,Fremont,-20.8926
        Texas,Fort Worth,-127.674
        ");
    }

    #[test]
    fn test_every_summary_reads_back_unchanged() {
        let dashboard = dashboard();
        let mut checked = 0;
        for summary in &dashboard.summaries {
            let Some(table) = summary.table() else { continue };
            let text = to_csv_string(table).unwrap();
            let back = read_exported(text.as_bytes(), "utf-8").unwrap();
            assert_eq!(&back, table, "{} did not round-trip", summary.name);
            checked += 1;
        }
        assert_eq!(checked, 20);
    }

    #[test]
    fn test_order_dates_stay_text_without_normalizing() {
        let dashboard = dashboard();
        let table = dashboard.summary("top_orders").unwrap().table().unwrap();
        let text = to_csv_string(table).unwrap();

        let raw = read_csv(text.as_bytes(), b',', "utf-8").unwrap();
        assert!(matches!(raw.column("Order Date").unwrap().next(), Some(Value::Text(_))));
        let back = read_exported(text.as_bytes(), "utf-8").unwrap();
        assert!(matches!(back.column("Order Date").unwrap().next(), Some(Value::Date(_))));
    }

    #[test]
    fn test_export_all_writes_one_file_per_summary() {
        let dashboard = dashboard();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports");

        let written = export_all(&dashboard.summaries, &out, "utf-8").unwrap();
        assert_eq!(written.len(), 20);
        assert!(out.join("category.csv").exists());
        assert!(out.join("Most_Profitable_Sub-Category.csv").exists());

        let discount = fs::read_to_string(out.join("Discount.csv")).unwrap();
        assert!(discount.starts_with("Discount,Sales\n0.0,"));
    }

    #[test]
    fn test_no_data_is_not_written() {
        let def = SummaryDef::new("empty", "Empty", "Empty.csv");
        let summary = Summary::from_table(&def, Table::new(vec!["Region".into()]));
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(write_summary(&summary, dir.path(), "utf-8").unwrap(), None);
        assert!(!dir.path().join("Empty.csv").exists());
    }

    #[test]
    fn test_unrepresentable_text() {
        let def = SummaryDef::new("cities", "Cities", "Cities.csv");
        let table = Table::from_rows(
            vec!["City".into()],
            vec![vec![Value::text("Québec")], vec![Value::text("雪")]],
        )
        .unwrap();
        let summary = Summary::from_table(&def, table);
        let dir = tempfile::tempdir().unwrap();

        let err = write_summary(&summary, dir.path(), "windows-1252").unwrap_err();
        assert!(matches!(err, ExportError::Encoding { ref value, .. } if value == "雪"));
        assert!(!dir.path().join("Cities.csv").exists());

        let latin = Table::from_rows(vec!["City".into()], vec![vec![Value::text("Québec")]]).unwrap();
        let ok = Summary::from_table(&def, latin);
        let path = write_summary(&ok, dir.path(), "windows-1252").unwrap().unwrap();
        assert_eq!(fs::read(path).unwrap(), b"City\nQu\xe9bec\n");
    }
}
