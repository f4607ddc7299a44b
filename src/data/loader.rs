use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, MaterialTable, NUMERIC_COLUMNS, Record, coerce_numeric};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a material table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one column per attribute (export of the source .xlsx)
/// * `.json`    – `[{ "Region": "...", "Thickness [cm]": "12,5", ... }, ...]`
/// * `.csv`     – header row with column names, one record per row
///
/// Declared numeric columns ([`NUMERIC_COLUMNS`]) are coerced to
/// real-or-missing regardless of how the source encodes them; a comma
/// decimal separator or an unparseable cell never fails the load.
pub fn load_file(path: &Path) -> Result<MaterialTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            load_json_str(&text)
        }
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            load_csv_reader(file)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Route a raw categorical or numeric cell to its coerced [`CellValue`].
fn cell_from_text(column: &str, raw: &str) -> CellValue {
    if NUMERIC_COLUMNS.contains(&column) {
        return match coerce_numeric(raw) {
            Some(v) => CellValue::Float(v),
            None => CellValue::Missing,
        };
    }
    guess_cell_type(raw)
}

/// Best-effort typing for categorical cells.
fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if s.is_empty() {
        return CellValue::Missing;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Region": "Nord",
///     "Construction Age Class": "1958-1968",
///     "Material": "Brick",
///     "Thickness [cm]": 24.0,
///     "λ-Wert [W/(mK)]": "0,68"
///   },
///   ...
/// ]
/// ```
pub fn load_json_str(text: &str) -> Result<MaterialTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records_json = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(records_json.len());

    for (i, rec) in records_json.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut fields = BTreeMap::new();
        for (key, val) in obj {
            fields.insert(key.clone(), json_to_cell(key, val));
        }
        records.push(Record { fields });
    }

    Ok(MaterialTable::from_records(records))
}

fn json_to_cell(column: &str, val: &JsonValue) -> CellValue {
    if NUMERIC_COLUMNS.contains(&column) {
        // Numeric columns: accept numbers directly, coerce strings, drop
        // everything else to Missing.
        return match val {
            JsonValue::Number(n) => match n.as_f64() {
                Some(v) if v.is_finite() && v >= 0.0 => CellValue::Float(v),
                _ => CellValue::Missing,
            },
            JsonValue::String(s) => match coerce_numeric(s) {
                Some(v) => CellValue::Float(v),
                None => CellValue::Missing,
            },
            _ => CellValue::Missing,
        };
    }
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::String(b.to_string()),
        JsonValue::Null => CellValue::Missing,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one material record per row.
/// Numeric columns may use comma decimal separators (`"0,68"`).
pub fn load_csv_reader<R: Read>(source: R) -> Result<MaterialTable> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut fields = BTreeMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            let Some(col_name) = headers.get(col_idx) else {
                continue;
            };
            fields.insert(col_name.clone(), cell_from_text(col_name, value));
        }
        records.push(Record { fields });
    }

    Ok(MaterialTable::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing material records.
///
/// Every column becomes a table attribute; declared numeric columns are
/// coerced whether they arrive as Float64/Float32, integers, or Utf8 with
/// comma decimals.  Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<MaterialTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let n_rows = batch.num_rows();

        let columns: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for row in 0..n_rows {
            let mut fields = BTreeMap::new();
            for (col_idx, col_name) in &columns {
                let col_array = batch.column(*col_idx);
                let value = extract_cell(col_name, col_array, row);
                fields.insert(col_name.clone(), value);
            }
            records.push(Record { fields });
        }
    }

    Ok(MaterialTable::from_records(records))
}

// -- Parquet / Arrow helpers --

/// Extract a single cell from an Arrow column at a given row, applying
/// numeric coercion for declared numeric columns.
fn extract_cell(column: &str, col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Missing;
    }

    let raw = match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                CellValue::String(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                CellValue::String(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            CellValue::String(arr.value(row).to_string())
        }
        _ => CellValue::String(format!("{:?}", col.data_type())),
    };

    if NUMERIC_COLUMNS.contains(&column) {
        return match raw {
            CellValue::Float(v) if v.is_finite() && v >= 0.0 => CellValue::Float(v),
            CellValue::Integer(i) if i >= 0 => CellValue::Float(i as f64),
            CellValue::String(s) => match coerce_numeric(&s) {
                Some(v) => CellValue::Float(v),
                None => CellValue::Missing,
            },
            _ => CellValue::Missing,
        };
    }
    raw
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
