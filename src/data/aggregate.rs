use std::collections::BTreeMap;

use super::model::{CellValue, MaterialTable};

// ---------------------------------------------------------------------------
// Group-by aggregation over a filtered subset
// ---------------------------------------------------------------------------
//
// All results here are transient: recomputed on every filter change and
// owned by the presentation code that asked for them. Missing numeric
// cells are skipped silently; they never fail an aggregation.

/// Mean and contributing-row count of one group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStats {
    /// Mean over the non-missing values; NaN when the group is empty.
    pub mean: f64,
    /// Number of non-missing values that contributed to the mean.
    pub count: usize,
}

impl GroupStats {
    fn from_values(values: &[f64]) -> Self {
        let count = values.len();
        let mean = if count == 0 {
            f64::NAN
        } else {
            values.iter().sum::<f64>() / count as f64
        };
        GroupStats { mean, count }
    }
}

/// Group the given rows by `key` and average `value_col` within each group.
///
/// Every distinct key value among the rows appears in the result, even when
/// all of its numeric cells are missing (mean NaN, count 0).
pub fn group_means(
    table: &MaterialTable,
    indices: &[usize],
    key: &str,
    value_col: &str,
) -> BTreeMap<CellValue, GroupStats> {
    let groups = numeric_groups(table, indices, key, value_col);
    groups
        .into_iter()
        .map(|(k, values)| (k, GroupStats::from_values(&values)))
        .collect()
}

/// Group the given rows by the pair (`key_a`, `key_b`) and average
/// `value_col` within each cell of the cross product actually present.
///
/// The second key typically becomes the colour dimension of a grouped bar
/// chart or the column axis of a heatmap.
pub fn group_means2(
    table: &MaterialTable,
    indices: &[usize],
    key_a: &str,
    key_b: &str,
    value_col: &str,
) -> BTreeMap<(CellValue, CellValue), GroupStats> {
    let mut groups: BTreeMap<(CellValue, CellValue), Vec<f64>> = BTreeMap::new();
    for &i in indices {
        let rec = &table.records[i];
        let key = (rec.get(key_a).clone(), rec.get(key_b).clone());
        let bucket = groups.entry(key).or_default();
        if let Some(v) = rec.numeric(value_col) {
            bucket.push(v);
        }
    }
    groups
        .into_iter()
        .map(|(k, values)| (k, GroupStats::from_values(&values)))
        .collect()
}

/// Row counts per distinct value of `key` among the given rows.
pub fn group_counts(
    table: &MaterialTable,
    indices: &[usize],
    key: &str,
) -> BTreeMap<CellValue, usize> {
    let mut counts: BTreeMap<CellValue, usize> = BTreeMap::new();
    for &i in indices {
        let val = table.records[i].get(key).clone();
        *counts.entry(val).or_default() += 1;
    }
    counts
}

/// The non-missing values of `value_col`, bucketed by `key`. Groups whose
/// rows carry only missing values are still present (empty bucket).
pub fn numeric_groups(
    table: &MaterialTable,
    indices: &[usize],
    key: &str,
    value_col: &str,
) -> BTreeMap<CellValue, Vec<f64>> {
    let mut groups: BTreeMap<CellValue, Vec<f64>> = BTreeMap::new();
    for &i in indices {
        let rec = &table.records[i];
        let bucket = groups.entry(rec.get(key).clone()).or_default();
        if let Some(v) = rec.numeric(value_col) {
            bucket.push(v);
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// Five-number summary (box plot)
// ---------------------------------------------------------------------------

/// Min, quartiles, and max of one group, for box-plot rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiveNumberSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Compute the five-number summary of a set of values. `None` when empty.
///
/// Quartiles use linear interpolation between order statistics (the same
/// convention as NumPy's default).
pub fn five_number_summary(values: &[f64]) -> Option<FiveNumberSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Some(FiveNumberSummary {
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Quantile of an already-sorted slice by linear interpolation.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Record, THICKNESS_COL};

    fn table() -> MaterialTable {
        let rows: [(&str, CellValue); 5] = [
            ("Brick", CellValue::Float(24.0)),
            ("Brick", CellValue::Float(36.0)),
            ("Concrete", CellValue::Float(20.0)),
            ("Concrete", CellValue::Missing),
            ("Plaster", CellValue::Missing),
        ];
        let records = rows
            .iter()
            .map(|(material, thickness)| Record {
                fields: [
                    (
                        "Material".to_string(),
                        CellValue::String(material.to_string()),
                    ),
                    (THICKNESS_COL.to_string(), thickness.clone()),
                ]
                .into(),
            })
            .collect();
        MaterialTable::from_records(records)
    }

    fn key(s: &str) -> CellValue {
        CellValue::String(s.to_string())
    }

    #[test]
    fn means_skip_missing_values() {
        let t = table();
        let indices: Vec<usize> = (0..t.len()).collect();
        let means = group_means(&t, &indices, "Material", THICKNESS_COL);

        let brick = means.get(&key("Brick")).unwrap();
        assert_eq!(brick.mean, 30.0);
        assert_eq!(brick.count, 2);

        let concrete = means.get(&key("Concrete")).unwrap();
        assert_eq!(concrete.mean, 20.0);
        assert_eq!(concrete.count, 1);
    }

    #[test]
    fn empty_group_mean_is_nan_not_a_panic() {
        let t = table();
        let indices: Vec<usize> = (0..t.len()).collect();
        let means = group_means(&t, &indices, "Material", THICKNESS_COL);

        let plaster = means.get(&key("Plaster")).unwrap();
        assert!(plaster.mean.is_nan());
        assert_eq!(plaster.count, 0);
    }

    #[test]
    fn two_key_means_partition_by_both_columns() {
        use crate::data::model::AGE_CLASS_COL;

        let rows: [(&str, &str, CellValue); 4] = [
            ("Brick", "vor 1918", CellValue::Float(24.0)),
            ("Brick", "vor 1918", CellValue::Float(26.0)),
            ("Brick", "ab 2010", CellValue::Float(30.0)),
            ("Concrete", "ab 2010", CellValue::Missing),
        ];
        let records = rows
            .iter()
            .map(|(material, age, thickness)| Record {
                fields: [
                    (
                        "Material".to_string(),
                        CellValue::String(material.to_string()),
                    ),
                    (
                        AGE_CLASS_COL.to_string(),
                        CellValue::String(age.to_string()),
                    ),
                    (THICKNESS_COL.to_string(), thickness.clone()),
                ]
                .into(),
            })
            .collect();
        let t = MaterialTable::from_records(records);
        let indices: Vec<usize> = (0..t.len()).collect();

        let means = group_means2(&t, &indices, "Material", AGE_CLASS_COL, THICKNESS_COL);
        assert_eq!(means.len(), 3);

        let old_brick = means.get(&(key("Brick"), key("vor 1918"))).unwrap();
        assert_eq!(old_brick.mean, 25.0);
        assert_eq!(old_brick.count, 2);

        let new_brick = means.get(&(key("Brick"), key("ab 2010"))).unwrap();
        assert_eq!(new_brick.mean, 30.0);
        assert_eq!(new_brick.count, 1);

        // the Concrete group exists but has no measured thickness
        let concrete = means.get(&(key("Concrete"), key("ab 2010"))).unwrap();
        assert!(concrete.mean.is_nan());
        assert_eq!(concrete.count, 0);
    }

    #[test]
    fn counts_include_rows_with_missing_numerics() {
        let t = table();
        let indices: Vec<usize> = (0..t.len()).collect();
        let counts = group_counts(&t, &indices, "Material");
        assert_eq!(counts.get(&key("Brick")), Some(&2));
        assert_eq!(counts.get(&key("Concrete")), Some(&2));
        assert_eq!(counts.get(&key("Plaster")), Some(&1));
    }

    #[test]
    fn empty_subset_aggregates_to_empty_not_error() {
        let t = table();
        assert!(group_means(&t, &[], "Material", THICKNESS_COL).is_empty());
        assert!(group_counts(&t, &[], "Material").is_empty());
    }

    #[test]
    fn five_number_summary_interpolates_quartiles() {
        let s = five_number_summary(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.min, 1.0);
        assert_eq!(s.q1, 1.75);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q3, 3.25);
        assert_eq!(s.max, 4.0);

        assert_eq!(five_number_summary(&[]), None);

        let single = five_number_summary(&[7.0]).unwrap();
        assert_eq!(single.median, 7.0);
        assert_eq!(single.min, 7.0);
        assert_eq!(single.max, 7.0);
    }
}
