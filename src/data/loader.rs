use anyhow::{bail, Context, Result};
use polars::prelude::{DataFrame, NamedFrom, Series};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;

use crate::config::ColumnSpec;

/// Column-oriented JSON table: {"columns": [...], "data": [[...], ...]}.
#[derive(Deserialize)]
struct JsonTable {
    columns: Vec<String>,
    data: Vec<Vec<Value>>,
}

fn column_index(table: &JsonTable, name: &str) -> Option<usize> {
    table.columns.iter().position(|c| c == name)
}

fn int_column(table: &JsonTable, idx: usize) -> Vec<Option<i64>> {
    table
        .data
        .iter()
        .map(|row| row.get(idx).and_then(Value::as_i64))
        .collect()
}

fn float_column(table: &JsonTable, idx: usize) -> Vec<Option<f64>> {
    table
        .data
        .iter()
        .map(|row| row.get(idx).and_then(Value::as_f64))
        .collect()
}

/// Load a JSON table into a DataFrame holding the configured columns: a Utf8
/// group column, nullable Int64 label columns, and a nullable Float64 score
/// column. Optional columns missing from the table are left out; the group
/// and predicted columns are required.
pub fn load_table(path: &str, cols: &ColumnSpec) -> Result<DataFrame> {
    let file = File::open(path).with_context(|| format!("opening table {path}"))?;
    let table: JsonTable =
        serde_json::from_reader(file).with_context(|| format!("parsing table {path}"))?;

    let group_idx = match column_index(&table, &cols.group) {
        Some(i) => i,
        None => bail!("table {path} has no {:?} column", cols.group),
    };
    let predicted_idx = match column_index(&table, &cols.predicted) {
        Some(i) => i,
        None => bail!("table {path} has no {:?} column", cols.predicted),
    };

    let groups: Vec<Option<String>> = table
        .data
        .iter()
        .map(|row| {
            row.get(group_idx)
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .collect();

    let mut series = vec![
        Series::new(&cols.group, groups),
        Series::new(&cols.predicted, int_column(&table, predicted_idx)),
    ];
    if let Some(name) = &cols.actual {
        if let Some(idx) = column_index(&table, name) {
            series.push(Series::new(name, int_column(&table, idx)));
        }
    }
    if let Some(name) = &cols.score {
        if let Some(idx) = column_index(&table, name) {
            series.push(Series::new(name, float_column(&table, idx)));
        }
    }

    DataFrame::new(series).with_context(|| format!("assembling frame from {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_all_configured_columns() {
        let file = write_table(
            r#"{"columns": ["group", "predicted", "actual", "score"],
                "data": [["A", 1, 1, 0.9], ["B", 0, 1, 0.3]]}"#,
        );
        let df = load_table(file.path().to_str().unwrap(), &ColumnSpec::default()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 4);
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let file =
            write_table(r#"{"columns": ["group", "predicted"], "data": [["A", 1], ["B", 0]]}"#);
        let df = load_table(file.path().to_str().unwrap(), &ColumnSpec::default()).unwrap();
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn missing_predicted_column_fails() {
        let file = write_table(r#"{"columns": ["group"], "data": [["A"]]}"#);
        let err = load_table(file.path().to_str().unwrap(), &ColumnSpec::default());
        assert!(err.is_err());
    }

    #[test]
    fn null_cells_stay_null() {
        let file = write_table(
            r#"{"columns": ["group", "predicted", "actual"],
                "data": [["A", 1, null], ["B", 0, 1]]}"#,
        );
        let df = load_table(file.path().to_str().unwrap(), &ColumnSpec::default()).unwrap();
        assert_eq!(df.column("actual").unwrap().null_count(), 1);
    }
}
