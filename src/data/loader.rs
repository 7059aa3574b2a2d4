use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{ClusterId, JobDataset, JobPosting};

/// Columns every data file must provide. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = ["title", "description", "keywords", "cluster", "x", "y"];

/// Cell contents read as null: the default NA markers of pandas `read_csv`.
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a job dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with at least the [`REQUIRED_COLUMNS`]
/// * `.json`    – `[{ "title": ..., "cluster": 3, "x": 0.1, ... }, ...]`
/// * `.parquet` – one scalar column per required field
pub fn load_file(path: &Path) -> Result<JobDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
}

/// Fail with [`DataError::MissingColumns`] unless every required column is present.
fn check_columns<'a>(present: impl IntoIterator<Item = &'a str>) -> Result<(), DataError> {
    let present: BTreeSet<&str> = present.into_iter().collect();
    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !present.contains(*c))
        .map(|c| c.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        missing.sort();
        Err(DataError::MissingColumns(missing))
    }
}

/// Raw cell values of one row before validation.
struct RawRow {
    title: Option<String>,
    description: Option<String>,
    keywords: Option<String>,
    cluster: Option<ClusterId>,
    x: Option<f64>,
    y: Option<f64>,
}

impl RawRow {
    /// Enforce the non-null cluster and finite coordinate invariant.
    /// `row` is the 1-based data row used in error messages.
    fn into_posting(self, row: usize) -> Result<JobPosting, DataError> {
        let invalid = |reason: &str| DataError::InvalidRow {
            row,
            reason: reason.to_string(),
        };
        let cluster = self.cluster.ok_or_else(|| invalid("missing cluster"))?;
        let x = self.x.ok_or_else(|| invalid("missing x coordinate"))?;
        let y = self.y.ok_or_else(|| invalid("missing y coordinate"))?;
        if !x.is_finite() || !y.is_finite() {
            return Err(invalid("coordinates must be finite"));
        }
        Ok(JobPosting {
            title: self.title,
            description: self.description,
            keywords: self.keywords,
            cluster,
            x,
            y,
        })
    }
}

fn non_null(s: &str) -> Option<&str> {
    if NA_VALUES.contains(&s) {
        None
    } else {
        Some(s)
    }
}

fn parse_coord(raw: Option<&str>, row: usize, col: &str) -> Result<Option<f64>, DataError> {
    match raw.map(str::trim).and_then(non_null) {
        None => Ok(None),
        Some(tok) => tok.parse::<f64>().map(Some).map_err(|_| DataError::InvalidRow {
            row,
            reason: format!("'{col}' value '{tok}' is not a number"),
        }),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<JobDataset> {
    // Short rows are allowed; absent trailing cells read as null.
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    check_columns(headers.iter().map(String::as_str))?;

    // Positions are guaranteed by `check_columns`; the first match wins on
    // duplicated headers.
    let idx: BTreeMap<&str, usize> = REQUIRED_COLUMNS
        .iter()
        .filter_map(|c| headers.iter().position(|h| h == c).map(|i| (*c, i)))
        .collect();
    let col = |name: &str| idx.get(name).copied().unwrap_or(usize::MAX);

    let mut jobs = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = row_no + 1;
        let record = result.with_context(|| format!("CSV row {row}"))?;
        let text = |name: &str| record.get(col(name)).and_then(non_null).map(str::to_string);

        let raw = RawRow {
            title: text("title"),
            description: text("description"),
            keywords: text("keywords"),
            cluster: record
                .get(col("cluster"))
                .map(str::trim)
                .and_then(non_null)
                .map(ClusterId::parse),
            x: parse_coord(record.get(col("x")), row, "x")?,
            y: parse_coord(record.get(col("y")), row, "y")?,
        };
        jobs.push(raw.into_posting(row)?);
    }

    Ok(JobDataset::from_jobs(jobs))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "title": "Data Engineer",
///     "description": "...",
///     "keywords": "python, sql, airflow",
///     "cluster": 3,
///     "x": 1.25,
///     "y": -0.4
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<JobDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let records: Vec<serde_json::Map<String, JsonValue>> =
        serde_json::from_str(&text).context("parsing JSON: expected an array of objects")?;

    let keys: BTreeSet<&str> = records
        .iter()
        .flat_map(|rec| rec.keys().map(String::as_str))
        .collect();
    // An empty array has no columns to check.
    if !records.is_empty() {
        check_columns(keys)?;
    }

    let mut jobs = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let row = i + 1;
        let raw = RawRow {
            title: json_text(rec.get("title")),
            description: json_text(rec.get("description")),
            keywords: json_text(rec.get("keywords")),
            cluster: json_text(rec.get("cluster")).map(|s| ClusterId::parse(&s)),
            x: json_coord(rec.get("x"), row, "x")?,
            y: json_coord(rec.get("y"), row, "y")?,
        };
        jobs.push(raw.into_posting(row)?);
    }

    Ok(JobDataset::from_jobs(jobs))
}

fn json_text(val: Option<&JsonValue>) -> Option<String> {
    match val? {
        JsonValue::Null => None,
        JsonValue::String(s) => non_null(s).map(str::to_string),
        other => Some(other.to_string()),
    }
}

fn json_coord(val: Option<&JsonValue>, row: usize, col: &str) -> Result<Option<f64>, DataError> {
    match val {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => Ok(n.as_f64()),
        Some(JsonValue::String(s)) => parse_coord(Some(s), row, col),
        Some(other) => Err(DataError::InvalidRow {
            row,
            reason: format!("'{col}' value {other} is not a number"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by **Pandas** (`df.to_parquet()`) or
/// **Polars** (`df.write_parquet()`).
///
/// Text columns may be Utf8 or LargeUtf8, `cluster` may be integer or text and
/// `x`/`y` may be any integer or float type.
fn load_parquet(path: &Path) -> Result<JobDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    check_columns(schema.fields().iter().map(|f| f.name().as_str()))?;

    let reader = builder.build().context("building parquet reader")?;

    let mut jobs = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let title = batch_column(&batch, "title")?;
        let description = batch_column(&batch, "description")?;
        let keywords = batch_column(&batch, "keywords")?;
        let cluster = batch_column(&batch, "cluster")?;
        let x = batch_column(&batch, "x")?;
        let y = batch_column(&batch, "y")?;

        for i in 0..batch.num_rows() {
            let row = jobs.len() + 1;
            let raw = RawRow {
                title: arrow_text(title, i)?,
                description: arrow_text(description, i)?,
                keywords: arrow_text(keywords, i)?,
                cluster: arrow_cluster(cluster, i)?,
                x: arrow_f64(x, i).with_context(|| format!("row {row}: reading 'x'"))?,
                y: arrow_f64(y, i).with_context(|| format!("row {row}: reading 'y'"))?,
            };
            jobs.push(raw.into_posting(row)?);
        }
    }

    Ok(JobDataset::from_jobs(jobs))
}

// -- Parquet / Arrow helpers --

fn batch_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .with_context(|| format!("parquet batch missing '{name}' column"))
}

fn arrow_text(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row).to_string(),
        other => anyhow::bail!("column type {other:?} cannot be read as text"),
    };
    Ok(Some(value))
}

fn arrow_cluster(col: &ArrayRef, row: usize) -> Result<Option<ClusterId>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let id = match col.data_type() {
        DataType::Int32 => ClusterId::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => ClusterId::Integer(col.as_primitive::<Int64Type>().value(row)),
        _ => match arrow_text(col, row).context("reading 'cluster'")? {
            Some(s) => ClusterId::parse(&s),
            None => return Ok(None),
        },
    };
    Ok(Some(id))
}

fn arrow_f64(col: &ArrayRef, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row) as f64,
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row) as f64,
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row) as f64,
        other => anyhow::bail!("expected a numeric column, got {other:?}"),
    };
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use super::*;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    const CSV: &str = "\
title,description,keywords,cluster,x,y,extra
Data Engineer,Builds pipelines,\"python, sql\",2,1.5,-0.25,ignored
Nurse,,\"care,triage\",0,3,4,
,orphan row,NA,1.0,0,0,
";

    #[test]
    fn loads_csv_with_nulls_and_extra_columns() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "jobs.csv", CSV);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);

        let first = &ds.jobs[0];
        assert_eq!(first.title.as_deref(), Some("Data Engineer"));
        assert_eq!(first.keywords.as_deref(), Some("python, sql"));
        assert_eq!(first.cluster, ClusterId::Integer(2));
        assert_eq!((first.x, first.y), (1.5, -0.25));

        assert_eq!(ds.jobs[1].description, None);
        assert_eq!(ds.jobs[2].title, None);
        assert_eq!(ds.jobs[2].keywords, None);
        assert_eq!(ds.jobs[2].cluster, ClusterId::Integer(1));
        assert_eq!(ds.titles, vec!["Data Engineer", "Nurse"]);
    }

    #[test]
    fn short_rows_read_missing_cells_as_null() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "jobs.csv",
            "title,description,keywords,cluster,x,y,extra\nA,d,k,0,1,1,e\nB,d,k,1,2,2\nC,d\n",
        );

        let err = load_file(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::InvalidRow {
                row: 3,
                reason: "missing cluster".into()
            })
        );

        std::fs::write(
            &path,
            "title,description,keywords,cluster,x,y,extra\nA,d,k,0,1,1,e\nB,d,k,1,2,2\n",
        )
        .unwrap();
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.jobs[1].title.as_deref(), Some("B"));
        assert_eq!(ds.jobs[1].cluster, ClusterId::Integer(1));
    }

    #[test]
    fn extended_na_markers_read_as_null() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "jobs.csv",
            "title,description,keywords,cluster,x,y\n#N/A N/A,-1.#QNAN,#NA,2,0,0\n",
        );

        let ds = load_file(&path).unwrap();
        let job = &ds.jobs[0];
        assert_eq!((job.title.as_deref(), job.description.as_deref()), (None, None));
        assert_eq!(job.keywords, None);
    }

    #[test]
    fn invalid_utf8_fails_the_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.csv");
        let mut bytes = b"title,description,keywords,cluster,x,y\n".to_vec();
        bytes.extend_from_slice(b"Caf\xff,d,k,0,1,1\n");
        std::fs::write(&path, bytes).unwrap();

        assert!(load_file(&path).is_err());
    }

    #[test]
    fn missing_columns_are_listed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "jobs.csv", "title,keywords,x\nA,b,1\n");

        let err = load_file(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::MissingColumns(vec![
                "cluster".into(),
                "description".into(),
                "y".into(),
            ]))
        );
    }

    #[test]
    fn row_without_cluster_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "jobs.csv",
            "title,description,keywords,cluster,x,y\nA,d,k,0,1,1\nB,d,k,,1,1\n",
        );

        let err = load_file(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::InvalidRow {
                row: 2,
                reason: "missing cluster".into()
            })
        );
    }

    #[test]
    fn non_numeric_coordinate_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "jobs.csv",
            "title,description,keywords,cluster,x,y\nA,d,k,0,left,1\n",
        );

        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::InvalidRow { row: 1, .. })
        ));
    }

    #[test]
    fn header_only_csv_is_empty_dataset() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "jobs.csv", "title,description,keywords,cluster,x,y\n");

        let ds = load_file(&path).unwrap();
        assert!(ds.is_empty());
        assert!(ds.titles.is_empty());
    }

    #[test]
    fn missing_file_reports_context() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("opening CSV"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("jobs.xlsx")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::UnsupportedExtension("xlsx".into()))
        );
    }

    #[test]
    fn loads_json_records() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "jobs.json",
            r#"[
                {"title": "Chef", "description": null, "keywords": "knives, sauces",
                 "cluster": 5, "x": 0.5, "y": "1.5"},
                {"title": "Sous Chef", "description": "Assists", "keywords": null,
                 "cluster": "pastry", "x": 2, "y": 3}
            ]"#,
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.jobs[0].cluster, ClusterId::Integer(5));
        assert_eq!(ds.jobs[0].y, 1.5);
        assert_eq!(ds.jobs[0].description, None);
        assert_eq!(ds.jobs[1].cluster, ClusterId::Label("pastry".into()));
        assert_eq!(ds.jobs[1].keywords, None);
    }

    #[test]
    fn json_missing_columns_are_listed() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "jobs.json", r#"[{"title": "Chef", "x": 1, "y": 2}]"#);

        let err = load_file(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::MissingColumns(vec![
                "cluster".into(),
                "description".into(),
                "keywords".into(),
            ]))
        );
    }

    #[test]
    fn loads_parquet_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("title", DataType::Utf8, true),
            Field::new("description", DataType::Utf8, true),
            Field::new("keywords", DataType::Utf8, true),
            Field::new("cluster", DataType::Int64, false),
            Field::new("x", DataType::Float64, false),
            Field::new("y", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("Pilot"), None])),
                Arc::new(StringArray::from(vec![Some("Flies"), Some("Unknown")])),
                Arc::new(StringArray::from(vec![Some("navigation"), None])),
                Arc::new(Int64Array::from(vec![4, 7])),
                Arc::new(Float64Array::from(vec![1.0, 2.0])),
                Arc::new(Float64Array::from(vec![-1.0, -2.0])),
            ],
        )
        .unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.jobs[0].title.as_deref(), Some("Pilot"));
        assert_eq!(ds.jobs[1].title, None);
        assert_eq!(ds.jobs[1].cluster, ClusterId::Integer(7));
        assert_eq!((ds.jobs[1].x, ds.jobs[1].y), (2.0, -2.0));
    }
}
