use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// Column declarations
// ---------------------------------------------------------------------------

/// Thickness column header, centimetres.
pub const THICKNESS_COL: &str = "Thickness [cm]";
/// Thermal conductivity column header, W/(m·K).
pub const LAMBDA_COL: &str = "λ-Wert [W/(mK)]";

/// Columns that must be coerced to real-or-missing on load.
pub const NUMERIC_COLUMNS: [&str; 2] = [THICKNESS_COL, LAMBDA_COL];

/// Ordered-categorical column: construction era bins.
pub const AGE_CLASS_COL: &str = "Construction Age Class";

/// Material of the layer (brick, concrete, mineral wool, …).
pub const MATERIAL_COL: &str = "Material";
/// Building component the layer belongs to (wall, roof, …).
pub const COMPONENT_COL: &str = "Component";
/// Construction method / assembly type.
pub const CONSTRUCTION_COL: &str = "Construction";

/// Canonical ordering of construction age classes (oldest first).
/// Values not in this list sort after the known bins, alphabetically.
pub const AGE_CLASS_ORDER: [&str; 10] = [
    "vor 1918",
    "1919-1948",
    "1949-1957",
    "1958-1968",
    "1969-1978",
    "1979-1983",
    "1984-1994",
    "1995-2001",
    "2002-2009",
    "ab 2010",
];

/// Rank of an age-class label within the canonical era ordering.
pub fn age_class_rank(label: &str) -> Option<usize> {
    AGE_CLASS_ORDER.iter().position(|&a| a == label)
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value. Numeric columns only ever hold `Float`
/// or `Missing` after loading; categorical columns may hold any variant.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    /// Absent or unparseable cell.
    Missing,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Missing => 0,
                Integer(_) => 1,
                Float(_) => 2,
                String(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Missing, Missing) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Missing => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Missing => write!(f, "<missing>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` for aggregation / plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

/// Coerce a raw textual numeric cell to a finite non-negative value.
///
/// Tolerates comma-as-decimal-separator encodings ("0,04"). Anything
/// unparseable, negative, or non-finite is `None` (→ `Missing`), never
/// an error.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the input table
// ---------------------------------------------------------------------------

/// A single material record (one spreadsheet row).
#[derive(Debug, Clone)]
pub struct Record {
    /// Dynamic columns: column_name → value. Numeric columns are already
    /// coerced to `Float` or `Missing`.
    pub fields: BTreeMap<String, CellValue>,
}

impl Record {
    /// Value of a column, `Missing` when the column is absent.
    pub fn get(&self, column: &str) -> &CellValue {
        self.fields.get(column).unwrap_or(&CellValue::Missing)
    }

    /// Numeric value of a column, `None` when missing.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        self.get(column).as_f64()
    }
}

// ---------------------------------------------------------------------------
// MaterialTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indices. Constructed
/// once at load time and treated as read-only for the session.
#[derive(Debug, Clone)]
pub struct MaterialTable {
    /// All records (rows).
    pub records: Vec<Record>,
    /// Ordered list of categorical column names (excludes numeric columns).
    pub column_names: Vec<String>,
    /// For each categorical column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl MaterialTable {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut column_names_set: BTreeSet<String> = BTreeSet::new();
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();

        for rec in &records {
            for (col, val) in &rec.fields {
                if NUMERIC_COLUMNS.contains(&col.as_str()) {
                    continue;
                }
                column_names_set.insert(col.clone());
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }
        let column_names: Vec<String> = column_names_set.into_iter().collect();

        // Ragged sources (records-oriented JSON) may omit a column on some
        // rows. Surface that as a selectable Missing value, otherwise no
        // filter selection could ever re-include those rows.
        for col in &column_names {
            if records.iter().any(|r| !r.fields.contains_key(col)) {
                if let Some(vals) = unique_values.get_mut(col) {
                    vals.insert(CellValue::Missing);
                }
            }
        }

        MaterialTable {
            records,
            column_names,
            unique_values,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Unique values of a column in display order: canonical era order for
    /// the age-class column, natural `Ord` everywhere else.
    pub fn ordered_values(&self, column: &str) -> Vec<CellValue> {
        let mut values: Vec<CellValue> = self
            .unique_values
            .get(column)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default();

        if column == AGE_CLASS_COL {
            values.sort_by_key(|v| match v {
                CellValue::String(s) => (age_class_rank(s).unwrap_or(usize::MAX), s.clone()),
                other => (usize::MAX, other.to_string()),
            });
        }
        values
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pairs: &[(&str, CellValue)]) -> Record {
        Record {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        }
    }

    #[test]
    fn coerce_accepts_comma_decimal() {
        assert_eq!(coerce_numeric("0,04"), Some(0.04));
        assert_eq!(coerce_numeric("12,5"), Some(12.5));
        assert_eq!(coerce_numeric(" 1.75 "), Some(1.75));
        assert_eq!(coerce_numeric("24"), Some(24.0));
    }

    #[test]
    fn coerce_rejects_garbage_negatives_and_non_finite() {
        assert_eq!(coerce_numeric(""), None);
        assert_eq!(coerce_numeric("   "), None);
        assert_eq!(coerce_numeric("abc"), None);
        assert_eq!(coerce_numeric("-3"), None);
        assert_eq!(coerce_numeric("1e999"), None);
        assert_eq!(coerce_numeric("NaN"), None);
    }

    #[test]
    fn numeric_columns_excluded_from_categorical_index() {
        let table = MaterialTable::from_records(vec![rec(&[
            ("Material", CellValue::String("Brick".into())),
            (THICKNESS_COL, CellValue::Float(24.0)),
            (LAMBDA_COL, CellValue::Missing),
        ])]);

        assert_eq!(table.column_names, vec!["Material".to_string()]);
        assert!(table.unique_values.contains_key("Material"));
        assert!(!table.unique_values.contains_key(THICKNESS_COL));
    }

    #[test]
    fn age_classes_listed_in_era_order() {
        let table = MaterialTable::from_records(vec![
            rec(&[(AGE_CLASS_COL, CellValue::String("ab 2010".into()))]),
            rec(&[(AGE_CLASS_COL, CellValue::String("vor 1918".into()))]),
            rec(&[(AGE_CLASS_COL, CellValue::String("1958-1968".into()))]),
        ]);

        let ordered: Vec<String> = table
            .ordered_values(AGE_CLASS_COL)
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(ordered, vec!["vor 1918", "1958-1968", "ab 2010"]);
    }

    #[test]
    fn ragged_rows_expose_missing_as_a_unique_value() {
        // Row 2 has no Region field at all; the column index must still
        // offer Missing so the filter panel can re-include that row.
        let table = MaterialTable::from_records(vec![
            rec(&[("Region", CellValue::String("Nord".into()))]),
            rec(&[("Region", CellValue::String("Süd".into()))]),
            rec(&[("Material", CellValue::String("Brick".into()))]),
        ]);

        let regions = table.unique_values.get("Region").unwrap();
        assert!(regions.contains(&CellValue::Missing));
        assert_eq!(regions.len(), 3);
        // ordered_values feeds the filter checkboxes
        assert!(table.ordered_values("Region").contains(&CellValue::Missing));
        // Material is present on only one row, so it is ragged too
        assert!(
            table
                .unique_values
                .get("Material")
                .unwrap()
                .contains(&CellValue::Missing)
        );
    }

    #[test]
    fn missing_is_a_selectable_unique_value() {
        let table = MaterialTable::from_records(vec![
            rec(&[("Region", CellValue::String("Nord".into()))]),
            rec(&[("Region", CellValue::Missing)]),
        ]);
        let vals = table.unique_values.get("Region").unwrap();
        assert!(vals.contains(&CellValue::Missing));
        assert_eq!(vals.len(), 2);
    }
}
