#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;
    use superstore::filter::{
        city_options, filter_by_date, region_options, state_options, DateRange,
    };
    use superstore::loader::load_path;
    use superstore::model::{Field, Table};
    use superstore::normalize::normalize_dates;

    fn dated() -> Table {
        let raw = load_path(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/superstore_sample.csv"
        ))
        .unwrap();
        let (table, report) = normalize_dates(&raw).unwrap();
        filter_by_date(&table, &report.bounds.unwrap().into()).unwrap()
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_regions_in_first_appearance_order() {
        assert_eq!(
            region_options(&dated()).unwrap(),
            ["South", "West", "Central", "East"]
        );
    }

    #[test]
    fn test_states_follow_regions() {
        let table = dated();
        assert_eq!(
            state_options(&table, &set(&["West"])).unwrap(),
            ["California", "Washington", "Utah"]
        );
        // No region selected: every state.
        assert_eq!(state_options(&table, &BTreeSet::new()).unwrap().len(), 11);
    }

    #[test]
    fn test_cities_follow_regions_and_states() {
        let table = dated();
        assert_eq!(
            city_options(&table, &set(&["West"]), &set(&["California"])).unwrap(),
            ["Los Angeles", "San Francisco"]
        );
        assert_eq!(
            city_options(&table, &set(&["Central"]), &BTreeSet::new()).unwrap(),
            ["Fort Worth", "Madison", "Fremont", "Houston"]
        );
    }

    #[test]
    fn test_every_offered_city_lies_in_a_selected_region() {
        let table = dated();
        let regions = set(&["South", "East"]);
        let cities = city_options(&table, &regions, &BTreeSet::new()).unwrap();

        for record in table.records() {
            let city = record.field(Field::City).and_then(|v| v.as_text()).unwrap();
            let region = record.field(Field::Region).and_then(|v| v.as_text()).unwrap();
            if cities.iter().any(|c| c == city) {
                assert!(regions.contains(region), "{city} offered outside {regions:?}");
            }
        }
    }

    #[test]
    fn test_date_range_narrows_choices() {
        let raw = load_path(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/superstore_sample.csv"
        ))
        .unwrap();
        let (table, _) = normalize_dates(&raw).unwrap();
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let only_2017 = filter_by_date(&table, &DateRange::new(day(2017, 1, 1), day(2017, 12, 31))).unwrap();

        assert_eq!(region_options(&only_2017).unwrap(), ["South", "West", "Central", "East"]);
        assert_eq!(
            city_options(&only_2017, &set(&["Central"]), &BTreeSet::new()).unwrap(),
            ["Houston"]
        );
    }
}
