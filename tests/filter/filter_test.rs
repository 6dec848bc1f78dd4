#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use superstore::filter::{
        apply, city_options, filter_by_date, filter_by_geography, state_options, DateRange,
        FilterSelection, GeoSelection,
    };
    use superstore::loader::load_path;
    use superstore::model::{Field, Table};
    use superstore::normalize::normalize_dates;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> (Table, DateRange) {
        let raw = load_path(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/superstore_sample.csv"
        ))
        .unwrap();
        let (table, report) = normalize_dates(&raw).unwrap();
        (table, report.bounds.unwrap().into())
    }

    fn labels(table: &Table, field: Field) -> Vec<String> {
        table
            .column(field.name())
            .unwrap()
            .filter_map(|v| v.label().map(|l| l.into_owned()))
            .collect()
    }

    #[test]
    fn test_full_range_drops_only_unparsed_dates() {
        let (table, range) = sample();
        let kept = filter_by_date(&table, &range).unwrap();
        assert_eq!(kept.len(), 18);
    }

    #[test]
    fn test_single_day_range() {
        let (table, _) = sample();
        let day = DateRange::new(date(2016, 11, 8), date(2016, 11, 8));
        let kept = filter_by_date(&table, &day).unwrap();
        assert_eq!(labels(&kept, Field::OrderId), ["CA-2016-152156", "CA-2016-152156"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let (table, range) = sample();
        let selection = FilterSelection::new(range)
            .with_geography(GeoSelection::default().with_regions(["West", "Central"]));
        let once = apply(&table, &selection).unwrap();
        let twice = apply(&once.filtered, &selection).unwrap();
        assert_eq!(once.filtered, twice.filtered);
    }

    #[test]
    fn test_adding_constraints_only_removes_rows() {
        let (table, range) = sample();
        let dated = filter_by_date(&table, &range).unwrap();

        let wide = GeoSelection::default().with_regions(["West", "Central"]);
        let narrow = wide.clone().with_states(["California", "Texas"]);
        let narrower = narrow.clone().with_cities(["Los Angeles"]);

        let mut previous = dated.clone();
        for geo in [wide, narrow, narrower] {
            let kept = filter_by_geography(&dated, &geo).unwrap();
            assert!(kept.len() <= previous.len());
            assert!(kept.rows().iter().all(|row| previous.rows().contains(row)));
            previous = kept;
        }
        assert_eq!(labels(&previous, Field::City), ["Los Angeles", "Los Angeles", "Los Angeles"]);
    }

    #[test]
    fn test_widening_one_dimension_never_drops_rows() {
        let (table, range) = sample();
        let dated = filter_by_date(&table, &range).unwrap();
        let count = |geo: &GeoSelection| filter_by_geography(&dated, geo).unwrap().len();

        let pairs = [
            (
                GeoSelection::default().with_regions(["West"]),
                GeoSelection::default().with_regions(["West", "Central"]),
                (6, 11),
            ),
            (
                GeoSelection::default().with_states(["California"]),
                GeoSelection::default().with_states(["California", "Texas"]),
                (4, 7),
            ),
            (
                GeoSelection::default().with_cities(["Houston"]),
                GeoSelection::default().with_cities(["Houston", "Seattle"]),
                (1, 2),
            ),
        ];
        for (narrow, wide, expected) in pairs {
            let (n, w) = (count(&narrow), count(&wide));
            assert!(n <= w);
            assert_eq!((n, w), expected);
        }
    }

    #[test]
    fn test_region_and_state_are_conjoined() {
        let (table, range) = sample();
        let dated = filter_by_date(&table, &range).unwrap();
        let geo = GeoSelection::default()
            .with_regions(["East"])
            .with_states(["California"]);

        assert!(filter_by_geography(&dated, &geo).unwrap().is_empty());
        assert_eq!(
            state_options(&dated, &geo.regions).unwrap(),
            ["Pennsylvania", "New York"]
        );
        assert!(city_options(&dated, &geo.regions, &geo.states).unwrap().is_empty());
    }

    #[test]
    fn test_source_order_is_preserved() {
        let (table, range) = sample();
        let selection = FilterSelection::new(range)
            .with_geography(GeoSelection::default().with_states(["Texas"]));
        let tables = apply(&table, &selection).unwrap();
        assert_eq!(
            labels(&tables.filtered, Field::City),
            ["Fort Worth", "Fort Worth", "Houston"]
        );
    }

    #[test]
    fn test_unknown_selection_keeps_nothing() {
        let (table, range) = sample();
        let selection = FilterSelection::new(range)
            .with_geography(GeoSelection::default().with_regions(["Atlantis"]));
        let tables = apply(&table, &selection).unwrap();
        assert!(tables.filtered.is_empty());
        assert_eq!(tables.date_filtered.len(), 18);
    }
}
