use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, ColumnKind, DataTable};

/// Tokens Pandas' `read_csv` treats as missing by default (the common ones).
const NULL_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "<NA>"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, comma-delimited (the listings exports)
/// * `.json`    – `[{ "Price": 4.5, "Fuel_Type": "Diesel", ... }, ...]`
/// * `.parquet` – flat scalar columns
pub fn load_file(path: &Path) -> Result<DataTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded '{}': {} rows, {} columns ({} numeric)",
        table.name,
        table.len(),
        table.columns().len(),
        table.numeric_columns().len()
    );
    Ok(table)
}

fn table_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one listing per record.
/// The first, unnamed column Pandas writes for the index is kept as-is.
fn load_csv(path: &Path) -> Result<DataTable> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader, table_name(path))
}

/// Parse CSV text already in memory.
pub fn parse_csv_str(name: &str, text: &str) -> Result<DataTable> {
    read_csv(csv::Reader::from_reader(text.as_bytes()), name.to_string())
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>, name: String) -> Result<DataTable> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        bail!("CSV has no header row");
    }

    // Column-major raw text, classified once every row has been read.
    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, found {}",
                headers.len(),
                record.len()
            );
        }
        for (col_idx, value) in record.iter().enumerate() {
            raw[col_idx].push(value.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(header, cells)| text_column(header, cells))
        .collect();

    DataTable::new(name, columns)
}

/// Build a column from raw CSV text.  Categorical columns keep the text of
/// every cell so that "12" in a text column stays the label "12".
fn text_column(name: String, cells: Vec<String>) -> Column {
    let parsed: Vec<CellValue> = cells.iter().map(|s| guess_cell_type(s)).collect();
    match ColumnKind::infer(&parsed) {
        ColumnKind::Numeric => Column::new(name, parsed),
        ColumnKind::Categorical => {
            let labels = cells
                .into_iter()
                .map(|s| {
                    if is_null_token(&s) {
                        CellValue::Null
                    } else {
                        CellValue::String(s)
                    }
                })
                .collect();
            Column::new(name, labels)
        }
    }
}

fn is_null_token(s: &str) -> bool {
    NULL_TOKENS.contains(&s.trim())
}

fn guess_cell_type(s: &str) -> CellValue {
    if is_null_token(s) {
        return CellValue::Null;
    }
    let t = s.trim();
    if let Ok(i) = t.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = t.parse::<f64>() {
        return CellValue::Float(f);
    }
    match t {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Company_Name": "Maruti", "Year": 2014, "Price": 3.5 },
///   ...
/// ]
/// ```
///
/// Column order follows first appearance across records; a key missing
/// from a record is a null cell.
fn load_json(path: &Path) -> Result<DataTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let cells = records
                .iter()
                .map(|rec| rec.get(&name).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect();
            labelled_column(name, cells)
        })
        .collect();

    DataTable::new(table_name(path), columns)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
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
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

/// Classify typed cells; categorical columns are rendered to text labels.
fn labelled_column(name: String, cells: Vec<CellValue>) -> Column {
    match ColumnKind::infer(&cells) {
        ColumnKind::Numeric => Column::new(name, cells),
        ColumnKind::Categorical => {
            let labels = cells
                .into_iter()
                .map(|c| match c {
                    CellValue::Null => CellValue::Null,
                    CellValue::String(s) => CellValue::String(s),
                    other => CellValue::String(other.to_string()),
                })
                .collect();
            Column::new(name, labels)
        }
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat scalar columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`), including their dictionary-encoded
/// categorical columns.
fn load_parquet(path: &Path) -> Result<DataTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, column_cells) in cells.iter_mut().enumerate() {
            let extracted = array_cells(batch.column(col_idx))
                .with_context(|| format!("decoding column '{}'", names[col_idx]))?;
            column_cells.extend(extracted);
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, cells)| labelled_column(name, cells))
        .collect();

    DataTable::new(table_name(path), columns)
}

/// Decode an Arrow array into cells.
///
/// Integers and floats of every width (and decimals) are widened to
/// `Int64` / `Float64`; dictionaries are unpacked to their values; any
/// other type is rendered as text.
fn array_cells(col: &ArrayRef) -> Result<Vec<CellValue>> {
    let cells = match col.data_type() {
        DataType::Dictionary(_, value_type) => {
            let values = cast(col, value_type).context("unpacking dictionary")?;
            return array_cells(&values);
        }
        DataType::Boolean => {
            let a = col.as_boolean();
            (0..a.len())
                .map(|i| {
                    if a.is_null(i) {
                        CellValue::Null
                    } else {
                        CellValue::Bool(a.value(i))
                    }
                })
                .collect()
        }
        dt if dt.is_integer() => {
            let ints = cast(col, &DataType::Int64).context("widening integers")?;
            let a = ints.as_primitive::<Int64Type>();
            (0..a.len())
                .map(|i| {
                    if a.is_null(i) {
                        CellValue::Null
                    } else {
                        CellValue::Integer(a.value(i))
                    }
                })
                .collect()
        }
        dt if dt.is_floating()
            || matches!(dt, DataType::Decimal128(..) | DataType::Decimal256(..)) =>
        {
            let floats = cast(col, &DataType::Float64).context("widening floats")?;
            let a = floats.as_primitive::<Float64Type>();
            (0..a.len())
                .map(|i| {
                    if a.is_null(i) {
                        CellValue::Null
                    } else {
                        CellValue::Float(a.value(i))
                    }
                })
                .collect()
        }
        _ => {
            let options = FormatOptions::default();
            let formatter = ArrayFormatter::try_new(col.as_ref(), &options)
                .context("formatting column")?;
            (0..col.len())
                .map(|i| {
                    if col.is_null(i) {
                        CellValue::Null
                    } else {
                        CellValue::String(formatter.value(i).to_string())
                    }
                })
                .collect()
        }
    };
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{
        Date32Array, DictionaryArray, Float32Array, Int16Array, StringArray, UInt8Array,
    };
    use arrow::datatypes::Int8Type;
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const SAMPLE: &str = "\
Company_Name,Year,Price,Seats,Owner
Maruti,2014,3.5,5,First
Honda,2012,,7,Second
Maruti,2015,4.25,,12
";

    #[test]
    fn csv_types_are_inferred_per_column() {
        let table = parse_csv_str("sample.csv", SAMPLE).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.kind_of("Company_Name"), Some(ColumnKind::Categorical));
        assert_eq!(table.kind_of("Year"), Some(ColumnKind::Numeric));
        assert_eq!(table.kind_of("Price"), Some(ColumnKind::Numeric));
        assert_eq!(table.kind_of("Seats"), Some(ColumnKind::Numeric));
        assert_eq!(table.kind_of("Owner"), Some(ColumnKind::Categorical));
    }

    #[test]
    fn empty_cells_are_null() {
        let table = parse_csv_str("sample.csv", SAMPLE).unwrap();
        let price = table.column("Price").unwrap();
        assert_eq!(price.values[1], CellValue::Null);
        assert_eq!(price.numeric_values(), vec![3.5, 4.25]);
    }

    #[test]
    fn numbers_in_text_columns_stay_labels() {
        let table = parse_csv_str("sample.csv", SAMPLE).unwrap();
        let owner = table.column("Owner").unwrap();
        assert_eq!(owner.values[2], CellValue::String("12".to_string()));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = parse_csv_str("bad.csv", "a,b\n1,2\n3\n").unwrap_err();
        assert!(format!("{err:#}").contains("CSV row"));
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("cars.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn json_records_load_with_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.json");
        std::fs::write(
            &path,
            r#"[{"Company_Name":"Honda","Price":5.5},{"Company_Name":"Tata","Year":2011}]"#,
        )
        .unwrap();
        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.column_names(), vec!["Company_Name", "Price", "Year"]);
        assert_eq!(table.column("Year").unwrap().values[0], CellValue::Null);
        assert_eq!(table.kind_of("Price"), Some(ColumnKind::Numeric));
    }

    #[test]
    fn json_keeps_file_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.json");
        std::fs::write(&path, r#"[{"Price":4.5,"Company_Name":"Honda","Year":2014}]"#).unwrap();
        let table = load_file(&path).unwrap();
        assert_eq!(table.column_names(), vec!["Price", "Company_Name", "Year"]);
    }

    fn write_parquet(path: &Path, batch: &RecordBatch) {
        let file = std::fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn parquet_columns_of_every_width_decode() {
        let seats: ArrayRef = Arc::new(Int16Array::from(vec![Some(5), Some(7), None]));
        let owners: ArrayRef = Arc::new(UInt8Array::from(vec![1, 2, 1]));
        let power: ArrayRef = Arc::new(Float32Array::from(vec![82.5, 117.0, 74.0]));
        let fuel: ArrayRef = Arc::new(
            vec![Some("Petrol"), Some("Diesel"), None]
                .into_iter()
                .collect::<DictionaryArray<Int8Type>>(),
        );
        let listed: ArrayRef = Arc::new(Date32Array::from(vec![0, 1, 2]));
        let company: ArrayRef = Arc::new(StringArray::from(vec!["Maruti", "Honda", "BMW"]));
        let batch = RecordBatch::try_from_iter(vec![
            ("Seats", seats),
            ("Owners", owners),
            ("Power_value", power),
            ("Fuel_Type", fuel),
            ("Listed", listed),
            ("Company_Name", company),
        ])
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.parquet");
        write_parquet(&path, &batch);
        let table = load_file(&path).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.column_names(),
            vec!["Seats", "Owners", "Power_value", "Fuel_Type", "Listed", "Company_Name"]
        );

        let seats = table.column("Seats").unwrap();
        assert_eq!(seats.kind, ColumnKind::Numeric);
        assert_eq!(
            seats.values,
            vec![CellValue::Integer(5), CellValue::Integer(7), CellValue::Null]
        );
        assert_eq!(table.kind_of("Owners"), Some(ColumnKind::Numeric));
        assert_eq!(table.column("Owners").unwrap().numeric_values(), vec![1.0, 2.0, 1.0]);
        assert_eq!(
            table.column("Power_value").unwrap().numeric_values(),
            vec![82.5, 117.0, 74.0]
        );

        let fuel = table.column("Fuel_Type").unwrap();
        assert_eq!(fuel.kind, ColumnKind::Categorical);
        assert_eq!(
            fuel.values,
            vec![
                CellValue::String("Petrol".to_string()),
                CellValue::String("Diesel".to_string()),
                CellValue::Null
            ]
        );

        let listed = table.column("Listed").unwrap();
        assert_eq!(listed.values[0], CellValue::String("1970-01-01".to_string()));
        assert_eq!(listed.values[2], CellValue::String("1970-01-03".to_string()));
    }
}
