#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use superstore::aggregate::{run, run_all, Registry};
    use superstore::config::AnalysisSettings;
    use superstore::filter::{apply, DateRange, FilterSelection, GeoSelection};
    use superstore::loader::read_csv;
    use superstore::model::{Field, Table, Value};
    use superstore::pipeline::Dataset;

    struct Line {
        date: &'static str,
        state: &'static str,
        city: &'static str,
        sub_category: &'static str,
        sales: f64,
        profit: f64,
        discount: f64,
    }

    fn line(state: &'static str, city: &'static str, sales: f64, profit: f64, discount: f64) -> Line {
        Line {
            date: "3/1/2016",
            state,
            city,
            sub_category: "Binders",
            sales,
            profit,
            discount,
        }
    }

    fn table(lines: &[Line]) -> Table {
        let columns = Field::ALL.iter().map(|f| f.name().to_string()).collect();
        let rows = lines
            .iter()
            .enumerate()
            .map(|(i, l)| {
                vec![
                    Value::text(format!("CA-2016-{i:06}")),
                    Value::text(l.date),
                    Value::text("Central"),
                    Value::text(l.state),
                    Value::text(l.city),
                    Value::text("Office Supplies"),
                    Value::text(l.sub_category),
                    Value::text("Binder"),
                    Value::text("Standard Class"),
                    Value::text("Consumer"),
                    Value::Number(l.sales),
                    Value::Number(l.profit),
                    Value::Number(l.discount),
                ]
            })
            .collect();
        Table::from_rows(columns, rows).unwrap()
    }

    fn dataset(lines: &[Line]) -> Dataset {
        Dataset::from_table(table(lines)).unwrap()
    }

    #[test]
    fn test_high_discount_losses() {
        let ds = dataset(&[
            line("TX", "Houston", 100.0, -20.0, 0.8),
            line("TX", "Houston", 100.0, -20.0, 0.3),
            line("TX", "Dallas", 100.0, 15.0, 0.5),
            line("OK", "Tulsa", 100.0, -1.0, 0.31),
        ]);
        let registry = Registry::standard(&AnalysisSettings::default());
        let selection = ds.selection(None, None, GeoSelection::default()).unwrap();
        let dashboard = ds.analyze(&registry, &selection).unwrap();

        let losses = dashboard.summary("high_discount_losses").unwrap().table().unwrap();
        // Threshold is strict: a 0.30 discount does not qualify.
        let discounts: Vec<_> = losses.column("Discount").unwrap().filter_map(Value::as_f64).collect();
        assert_eq!(discounts, [0.8, 0.31]);
        assert_eq!(losses.width(), Field::ALL.len());
    }

    #[test]
    fn test_consistent_loss_in_texas() {
        let ds = dataset(&[
            line("TX", "Austin", 50.0, -4.0, 0.0),
            line("TX", "Austin", 30.0, -6.0, 0.0),
            line("TX", "Dallas", 80.0, 12.0, 0.0),
            line("OK", "Tulsa", 10.0, 0.0, 0.0),
        ]);
        let registry = Registry::standard(&AnalysisSettings::default());
        let selection = ds.selection(None, None, GeoSelection::default()).unwrap();
        let dashboard = ds.analyze(&registry, &selection).unwrap();

        let losses = dashboard.summary("consistent_losses").unwrap().table().unwrap();
        assert_eq!(losses.columns(), ["State", "City", "Profit"]);
        assert_eq!(
            losses.rows(),
            [vec![Value::text("TX"), Value::text("Austin"), Value::Number(-10.0)]]
        );
    }

    #[test]
    fn test_selling_well_losses_threshold() {
        let ds = dataset(&[
            line("TX", "Austin", 1000.0, -5.0, 0.0),
            line("TX", "Austin", 1000.5, -5.0, 0.0),
            line("TX", "Austin", 4000.0, 5.0, 0.0),
        ]);
        let settings = AnalysisSettings::default();
        let registry = Registry::standard(&settings);
        let selection = ds.selection(None, None, GeoSelection::default()).unwrap();
        let dashboard = ds.analyze(&registry, &selection).unwrap();

        let rows = dashboard.summary("selling_well_losses").unwrap().table().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.sum("Sales").unwrap(), 1000.5);
    }

    #[test]
    fn test_narrow_date_range_has_no_data_anywhere() {
        let ds = dataset(&[
            line("TX", "Austin", 50.0, -4.0, 0.5),
            line("OK", "Tulsa", 2000.0, -9.0, 0.0),
        ]);
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let selection = FilterSelection::new(DateRange::new(day(2015, 1, 1), day(2015, 1, 31)));
        let tables = apply(ds.table(), &selection).unwrap();
        let registry = Registry::standard(&AnalysisSettings::default());

        for (def, result) in run_all(&registry, &tables) {
            assert!(result.unwrap().is_no_data(), "{} should have no data", def.name);
        }

        let dashboard = ds.analyze(&registry, &selection).unwrap();
        assert!(dashboard.tree.is_none());
        // Headline figures ignore the selection.
        assert_eq!(dashboard.kpis.total_orders, 2);
    }

    #[test]
    fn test_ties_keep_first_occurrence() {
        let ds = dataset(&[
            Line {
                sub_category: "Paper",
                ..line("TX", "Austin", 10.0, 7.0, 0.0)
            },
            Line {
                sub_category: "Labels",
                ..line("TX", "Dallas", 10.0, 7.0, 0.0)
            },
        ]);
        let registry = Registry::standard(&AnalysisSettings::default());
        let selection = ds.selection(None, None, GeoSelection::default()).unwrap();
        let dashboard = ds.analyze(&registry, &selection).unwrap();

        let best = dashboard.summary("most_profitable_sub_category").unwrap().table().unwrap();
        assert_eq!(best.rows(), [vec![Value::text("Paper"), Value::Number(7.0)]]);
    }

    #[test]
    fn test_unparsed_dates_fall_outside_every_range() {
        let ds = dataset(&[
            Line {
                date: "someday",
                ..line("TX", "Austin", 10.0, 1.0, 0.0)
            },
            line("TX", "Dallas", 20.0, 2.0, 0.0),
        ]);
        let selection = ds.selection(None, None, GeoSelection::default()).unwrap();
        let tables = ds.filter(&selection).unwrap();
        assert_eq!(tables.date_filtered.len(), 1);
        assert_eq!(ds.kpis().unwrap().total_sales, 30.0);
    }

    #[test]
    fn test_unreadable_measures_never_win_rankings() {
        let csv = "Order Date,Region,State,City,Product Name,Sales,Profit\n\
                   1/2/2016,West,Utah,Provo,A,5000,100\n\
                   1/2/2016,West,Utah,Provo,B,n/a,n/a\n\
                   1/2/2016,West,Utah,Provo,C,10,-3\n";
        let ds = Dataset::from_table(read_csv(csv.as_bytes(), b',', "utf-8").unwrap()).unwrap();
        let selection = ds.selection(None, None, GeoSelection::default()).unwrap();
        let tables = ds.filter(&selection).unwrap();
        let registry = Registry::standard(&AnalysisSettings::default());

        let product = |name: &str| {
            let summary = run(registry.get(name).unwrap(), &tables).unwrap();
            let first = summary.table().unwrap().column("Product Name").unwrap().next().cloned();
            first
        };
        assert_eq!(product("top_orders"), Some(Value::text("A")));
        assert_eq!(product("most_profitable_product"), Some(Value::text("A")));
        assert_eq!(product("most_losing_product"), Some(Value::text("C")));
    }
}
