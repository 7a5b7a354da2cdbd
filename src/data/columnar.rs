use anyhow::{bail, Context, Result};
use polars::prelude::{DataFrame, DataType, TakeRandom, TakeRandomUtf8};

use crate::config::ColumnSpec;
use crate::records::Record;

/// Turn a DataFrame into evaluation records using the configured column
/// names. Group and predicted cells must be non-null; the label columns are
/// cast to Int64 so integer-typed tables of any width work. Null cells in the
/// optional columns become `None` on the record.
pub fn records_from_dataframe(df: &DataFrame, cols: &ColumnSpec) -> Result<Vec<Record>> {
    let groups = df
        .column(&cols.group)
        .with_context(|| format!("group column {:?}", cols.group))?
        .utf8()
        .with_context(|| format!("group column {:?} is not a string column", cols.group))?
        .clone();

    let predicted = df
        .column(&cols.predicted)
        .with_context(|| format!("predicted column {:?}", cols.predicted))?
        .cast(&DataType::Int64)
        .with_context(|| format!("predicted column {:?} is not numeric", cols.predicted))?;
    let predicted = predicted.i64()?.clone();

    let actual = match cols.actual.as_deref().and_then(|n| df.column(n).ok()) {
        Some(series) => Some(
            series
                .cast(&DataType::Int64)
                .context("actual column is not numeric")?
                .i64()?
                .clone(),
        ),
        None => None,
    };
    let score = match cols.score.as_deref().and_then(|n| df.column(n).ok()) {
        Some(series) => Some(
            series
                .cast(&DataType::Float64)
                .context("score column is not numeric")?
                .f64()?
                .clone(),
        ),
        None => None,
    };

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let group = match groups.get(i) {
            Some(g) => g.to_string(),
            None => bail!("row {i}: null group value"),
        };
        let predicted = match predicted.get(i) {
            Some(p) => p,
            None => bail!("row {i}: null predicted label"),
        };
        records.push(Record {
            group,
            predicted,
            actual: actual.as_ref().and_then(|c| c.get(i)),
            score: score.as_ref().and_then(|c| c.get(i)),
        });
    }
    Ok(records)
}
