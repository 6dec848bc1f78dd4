#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use superstore::loader::load_path;
    use superstore::model::{Field, Table, TableError, Value};
    use superstore::normalize::{normalize_dates, parse_order_date};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Table {
        load_path(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/superstore_sample.csv"
        ))
        .unwrap()
    }

    #[test]
    fn test_fixture_dates() {
        let (table, report) = normalize_dates(&sample()).unwrap();

        assert_eq!(report.parsed, 18);
        assert_eq!(report.failed, 1);
        let bounds = report.bounds.unwrap();
        assert_eq!(bounds.start, date(2014, 5, 13));
        assert_eq!(bounds.end, date(2017, 9, 19));

        let dates: Vec<_> = table.column(Field::OrderDate.name()).unwrap().collect();
        assert_eq!(dates[0], &Value::Date(date(2016, 11, 8)));
        // "N/A" becomes null instead of failing the load
        assert_eq!(dates[15], &Value::Null);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let (once, first) = normalize_dates(&sample()).unwrap();
        let (twice, second) = normalize_dates(&once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(first, second);
    }

    #[test]
    fn test_other_columns_untouched() {
        let raw = sample();
        let (normalized, _) = normalize_dates(&raw).unwrap();
        assert_eq!(normalized.columns(), raw.columns());
        let sales: Vec<_> = normalized.column("Sales").unwrap().collect();
        let raw_sales: Vec<_> = raw.column("Sales").unwrap().collect();
        assert_eq!(sales, raw_sales);
    }

    #[test]
    fn test_time_of_day_is_dropped() {
        assert_eq!(parse_order_date("11/8/2016 14:30"), Some(date(2016, 11, 8)));
        assert_eq!(parse_order_date("2016-11-08 00:00:00"), Some(date(2016, 11, 8)));
        assert_eq!(parse_order_date("13/45/2016"), None);
    }

    #[test]
    fn test_missing_order_date_column() {
        let table = Table::from_rows(vec!["Sales".into()], vec![vec![Value::Number(1.0)]]).unwrap();
        assert_eq!(
            normalize_dates(&table).unwrap_err(),
            TableError::MissingField("Order Date".to_string())
        );
    }

    #[test]
    fn test_nothing_parses() {
        let table = Table::from_rows(
            vec!["Order Date".into()],
            vec![vec![Value::text("soon")], vec![Value::Null]],
        )
        .unwrap();
        let (_, report) = normalize_dates(&table).unwrap();
        assert_eq!(report.parsed, 0);
        assert_eq!(report.failed, 2);
        assert!(report.bounds.is_none());
    }
}
