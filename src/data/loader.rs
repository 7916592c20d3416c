use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::RawTable;
use crate::error::PipelineError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a source table from a file. Dispatch by extension.
///
/// Every cell comes back as text; numeric coercion happens later so that
/// codes like `004` keep their leading zeros.
///
/// Supported formats:
/// * `.csv`     – header row followed by records (the usual bulk download)
/// * `.json`    – `[{ "Area": "...", "Y1970": "...", ... }, ...]`
/// * `.parquet` – any column types; values are cast to strings
pub fn load_file(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => return Err(PipelineError::UnsupportedFormat(other.to_string()).into()),
    }?;

    log::debug!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.headers.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Fields are decoded lossily: a stray Latin-1 byte in an area name should
/// not abort the run.
fn load_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    let mut headers: Vec<String> = reader
        .byte_headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();
    if let Some(first) = headers.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (row_no, result) in reader.byte_records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
        );
    }

    Ok(RawTable::new(headers, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Columns are the
/// union of keys across records; absent keys and `null` become "".
fn load_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows: Vec<Vec<String>> = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_text).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(RawTable::new(headers, rows))
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file, casting every column to text.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`), whether year columns were stored as
/// strings or as floats.
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<String>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let columns: Vec<ArrayRef> = batch
            .columns()
            .iter()
            .zip(&headers)
            .map(|(col, name)| {
                cast(col, &DataType::Utf8)
                    .with_context(|| format!("casting column '{name}' to text"))
            })
            .collect::<Result<_>>()?;
        let strings: Vec<&StringArray> = columns
            .iter()
            .map(|col| {
                col.as_any()
                    .downcast_ref::<StringArray>()
                    .context("expected StringArray after cast")
            })
            .collect::<Result<_>>()?;

        for row in 0..batch.num_rows() {
            rows.push(
                strings
                    .iter()
                    .map(|col| {
                        if col.is_null(row) {
                            String::new()
                        } else {
                            col.value(row).to_string()
                        }
                    })
                    .collect(),
            );
        }
    }

    Ok(RawTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::{Builder, NamedTempFile};

    use super::*;
    use crate::data::clean::parse_number;

    fn temp_with(suffix: &str, content: &[u8]) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn csv_keeps_text_and_pads_ragged_rows() {
        let file = temp_with(
            ".csv",
            "\u{feff}Area Code,Area,Y2000\n004,\"Afghanistan\",\"1,234.5\"\n008,Albania\n".as_bytes(),
        );
        let table = load_file(file.path()).unwrap();
        assert_eq!(table.headers, vec!["Area Code", "Area", "Y2000"]);
        assert_eq!(table.rows[0], vec!["004", "Afghanistan", "1,234.5"]);
        assert_eq!(table.rows[1], vec!["008", "Albania", ""]);
    }

    #[test]
    fn csv_tolerates_invalid_utf8() {
        let file = temp_with(".csv", b"Area,Y2000\nC\xf4te,1\n");
        let table = load_file(file.path()).unwrap();
        assert!(table.rows[0][0].starts_with('C'));
        assert_eq!(table.rows[0][1], "1");
    }

    #[test]
    fn json_records_become_text() {
        let file = temp_with(
            ".json",
            br#"[{"Area": "Afghanistan", "Y2000": 12.5, "Y2001": null}, {"Area": "Albania", "Flag": "E"}]"#,
        );
        let table = load_file(file.path()).unwrap();
        let area = table.column_index("Area").unwrap();
        let y2000 = table.column_index("Y2000").unwrap();
        let flag = table.column_index("Flag").unwrap();
        assert_eq!(table.rows[0][area], "Afghanistan");
        assert_eq!(table.rows[0][y2000], "12.5");
        assert_eq!(table.rows[0][table.column_index("Y2001").unwrap()], "");
        assert_eq!(table.rows[0][flag], "");
        assert_eq!(table.rows[1][flag], "E");
    }

    #[test]
    fn json_must_be_an_array() {
        let file = temp_with(".json", br#"{"Area": "Afghanistan"}"#);
        assert!(load_file(file.path()).is_err());
    }

    #[test]
    fn parquet_columns_are_cast_to_text() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Area Code", DataType::Int64, false),
            Field::new("Area", DataType::Utf8, false),
            Field::new("Y2000", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![4, 8])),
                Arc::new(StringArray::from(vec!["Afghanistan", "Albania"])),
                Arc::new(Float64Array::from(vec![Some(1000.0), None])),
            ],
        )
        .unwrap();

        let file = Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.as_file().try_clone().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(file.path()).unwrap();
        assert_eq!(table.headers, vec!["Area Code", "Area", "Y2000"]);
        assert_eq!(table.rows[0][0], "4");
        assert_eq!(table.rows[1][1], "Albania");
        assert_eq!(parse_number(&table.rows[0][2]), Some(1000.0));
        assert_eq!(table.rows[1][2], "");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = temp_with(".xlsx", b"");
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<PipelineError>(),
            Some(&PipelineError::UnsupportedFormat("xlsx".into()))
        );
    }
}
