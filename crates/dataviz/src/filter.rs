//! Column/value filters over a dataset. Conjunctive: a record survives only
//! when every filter's value appears, case-insensitively, in the record's
//! stringified cell for that column.

use crate::dataset::{Dataset, Record};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: String,
}

/// Pure; recomputed whenever the filter list or the dataset changes. An
/// empty filter list passes every record through.
pub fn apply_filters(dataset: &Dataset, filters: &[Filter]) -> Dataset {
    if filters.is_empty() {
        return dataset.clone();
    }

    let records: Vec<Record> = dataset
        .records()
        .iter()
        .filter(|record| filters.iter().all(|f| matches(dataset, record, f)))
        .cloned()
        .collect();
    dataset.with_records(records)
}

fn matches(dataset: &Dataset, record: &Record, filter: &Filter) -> bool {
    let cell = dataset
        .column_index(&filter.column)
        .and_then(|index| record.get(index))
        .map(|value| value.to_string().to_lowercase())
        .unwrap_or_default();
    cell.contains(&filter.value.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Dataset {
        Dataset::parse(
            "people",
            "name,city,age\nAlice,Berlin,31\nBob,Boston,44\nCarol,Berlin,27",
        )
    }

    fn filter(column: &str, value: &str) -> Filter {
        Filter {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_empty_filter_list_passes_everything() {
        let dataset = people();
        let filtered = apply_filters(&dataset, &[]);
        assert_eq!(filtered.records(), dataset.records());
    }

    #[test]
    fn test_filtered_records_are_a_subset() {
        let dataset = people();
        let filtered = apply_filters(&dataset, &[filter("city", "berlin")]);
        assert_eq!(filtered.row_count(), 2);
        for record in filtered.records() {
            assert!(dataset.records().contains(record));
        }
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let dataset = people();
        let filtered = apply_filters(
            &dataset,
            &[filter("city", "berlin"), filter("name", "car")],
        );
        assert_eq!(filtered.row_count(), 1);
        assert_eq!(filtered.value(0, "name"), dataset.value(2, "name"));
    }

    #[test]
    fn test_match_is_case_insensitive_substring() {
        let dataset = people();
        let filtered = apply_filters(&dataset, &[filter("name", "BO")]);
        assert_eq!(filtered.row_count(), 1);
    }

    #[test]
    fn test_numeric_cells_match_by_string_form() {
        let dataset = people();
        let filtered = apply_filters(&dataset, &[filter("age", "4")]);
        // 44 contains "4"; 31 and 27 do not.
        assert_eq!(filtered.row_count(), 1);
    }

    #[test]
    fn test_unknown_column_matches_nothing_unless_value_empty() {
        let dataset = people();
        assert_eq!(
            apply_filters(&dataset, &[filter("missing", "x")]).row_count(),
            0
        );
        assert_eq!(
            apply_filters(&dataset, &[filter("missing", "")]).row_count(),
            3
        );
    }
}
