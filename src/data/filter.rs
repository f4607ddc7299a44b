use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, MaterialTable};

// ---------------------------------------------------------------------------
// Filter predicate: which unique values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of selected values.
/// Columns combine with logical AND; values within a column with logical OR.
pub type FilterState = BTreeMap<String, BTreeSet<CellValue>>;

/// Initialise a [`FilterState`] with all values selected (i.e., show everything).
pub fn init_filter_state(table: &MaterialTable) -> FilterState {
    table
        .unique_values
        .iter()
        .map(|(col, vals)| (col.clone(), vals.clone()))
        .collect()
}

/// Return indices of records that pass all active filters.
///
/// A record passes a column filter when:
/// * The column is not present in `filters` → passes (no constraint)
/// * The filter set for that column is empty → nothing selected → fails
/// * The record's value for that column is in the selected set → passes
///
/// Idempotent and side-effect free; the table is never mutated.
pub fn filtered_indices(table: &MaterialTable, filters: &FilterState) -> Vec<usize> {
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            for (col, selected) in filters {
                if selected.is_empty() {
                    // Nothing selected for this column → hide everything
                    return false;
                }
                // Check all unique values are selected → no effective filter
                if let Some(all_vals) = table.unique_values.get(col) {
                    if all_vals.iter().all(|v| selected.contains(v)) {
                        continue; // everything selected, no filtering needed
                    }
                }
                match rec.fields.get(col) {
                    Some(val) => {
                        if !selected.contains(val) {
                            return false;
                        }
                    }
                    None => {
                        // record doesn't have this column → include only if Missing is selected
                        if !selected.contains(&CellValue::Missing) {
                            return false;
                        }
                    }
                }
            }
            true
        })
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn table() -> MaterialTable {
        let rows = [
            ("Nord", "Brick"),
            ("Nord", "Concrete"),
            ("Süd", "Brick"),
            ("Süd", "Timber"),
        ];
        let records = rows
            .iter()
            .map(|(region, material)| Record {
                fields: [
                    ("Region".to_string(), CellValue::String(region.to_string())),
                    (
                        "Material".to_string(),
                        CellValue::String(material.to_string()),
                    ),
                ]
                .into(),
            })
            .collect();
        MaterialTable::from_records(records)
    }

    fn select(values: &[&str]) -> BTreeSet<CellValue> {
        values
            .iter()
            .map(|v| CellValue::String(v.to_string()))
            .collect()
    }

    #[test]
    fn full_selection_round_trips_row_count() {
        let t = table();
        let filters = init_filter_state(&t);
        assert_eq!(filtered_indices(&t, &filters).len(), t.len());
    }

    #[test]
    fn columns_combine_with_and_values_with_or() {
        let t = table();
        let mut filters = init_filter_state(&t);
        filters.insert("Region".to_string(), select(&["Nord"]));
        filters.insert("Material".to_string(), select(&["Brick", "Concrete"]));
        assert_eq!(filtered_indices(&t, &filters), vec![0, 1]);
    }

    #[test]
    fn empty_selection_hides_everything() {
        let t = table();
        let mut filters = init_filter_state(&t);
        filters.insert("Region".to_string(), BTreeSet::new());
        assert!(filtered_indices(&t, &filters).is_empty());
    }

    #[test]
    fn missing_column_passes_only_when_missing_selected() {
        let mut records = table().records;
        records.push(Record {
            fields: [(
                "Material".to_string(),
                CellValue::String("Plaster".to_string()),
            )]
            .into(),
        });
        let t = MaterialTable::from_records(records);

        let mut filters = init_filter_state(&t);
        filters.insert("Region".to_string(), select(&["Nord"]));
        assert_eq!(filtered_indices(&t, &filters), vec![0, 1]);

        let mut with_missing = select(&["Nord"]);
        with_missing.insert(CellValue::Missing);
        filters.insert("Region".to_string(), with_missing);
        assert_eq!(filtered_indices(&t, &filters), vec![0, 1, 4]);
    }

    #[test]
    fn ragged_rows_can_be_reselected_via_offered_missing() {
        let mut records = table().records;
        records.push(Record {
            fields: [(
                "Material".to_string(),
                CellValue::String("Plaster".to_string()),
            )]
            .into(),
        });
        let t = MaterialTable::from_records(records);

        // The default selection offers (and selects) Missing for the
        // ragged Region column, so everything is visible initially.
        let filters = init_filter_state(&t);
        assert!(filters.get("Region").unwrap().contains(&CellValue::Missing));
        assert_eq!(filtered_indices(&t, &filters).len(), t.len());

        // Narrowing Region to {Nord} drops the ragged row...
        let mut filters = filters;
        filters.insert("Region".to_string(), select(&["Nord"]));
        assert_eq!(filtered_indices(&t, &filters), vec![0, 1]);

        // ...and ticking the offered Missing value restores it.
        filters
            .get_mut("Region")
            .unwrap()
            .insert(CellValue::Missing);
        assert_eq!(filtered_indices(&t, &filters), vec![0, 1, 4]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let t = table();
        let mut filters = init_filter_state(&t);
        filters.insert("Material".to_string(), select(&["Brick"]));
        let once = filtered_indices(&t, &filters);
        let twice = filtered_indices(&t, &filters);
        assert_eq!(once, twice);
        assert_eq!(once, vec![0, 2]);
    }
}
