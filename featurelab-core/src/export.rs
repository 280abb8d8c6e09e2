//! Feature-table export: polars DataFrame, table preview, CSV, Parquet, JSON.
//!
//! Undefined values (NaN) become empty CSV fields and JSON nulls. Flags are
//! written as 0/1 integers.

use crate::features::{ColumnValues, FeatureColumn, FeatureTable};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Days from 0001-01-01 (CE) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Parquet,
    Json,
}

impl ExportFormat {
    /// Infer from a file extension; anything unrecognised is CSV.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("parquet") | Some("pq") => ExportFormat::Parquet,
            Some("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

fn epoch_days(date: &NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

fn to_polars_column(column: &FeatureColumn<'_>) -> PolarsResult<Column> {
    let name: PlSmallStr = column.name.as_str().into();
    Ok(match column.values {
        ColumnValues::Date(dates) => {
            let days: Vec<i32> = dates.iter().map(epoch_days).collect();
            Column::new(name, days).cast(&DataType::Date)?
        }
        ColumnValues::Float(values) => Column::new(name, values.to_vec()),
        ColumnValues::Int(values) => {
            Column::new(name, values.iter().map(|&v| v as i32).collect::<Vec<i32>>())
        }
        ColumnValues::Flag(values) => {
            Column::new(name, values.iter().map(|&v| i32::from(v)).collect::<Vec<i32>>())
        }
    })
}

/// Convert the table to a polars DataFrame in catalogue order.
pub fn to_dataframe(table: &FeatureTable) -> Result<DataFrame, ExportError> {
    let columns = table
        .columns()
        .iter()
        .map(to_polars_column)
        .collect::<PolarsResult<Vec<Column>>>()?;
    Ok(DataFrame::new(columns)?)
}

/// First `rows` rows rendered as a polars table.
pub fn preview(table: &FeatureTable, rows: usize) -> Result<String, ExportError> {
    let df = to_dataframe(table)?;
    Ok(format!("{}", df.head(Some(rows))))
}

fn csv_cell(values: &ColumnValues<'_>, row: usize) -> String {
    match values {
        ColumnValues::Date(v) => v[row].format("%Y-%m-%d").to_string(),
        ColumnValues::Float(v) if v[row].is_nan() => String::new(),
        ColumnValues::Float(v) => v[row].to_string(),
        ColumnValues::Int(v) => v[row].to_string(),
        ColumnValues::Flag(v) => u8::from(v[row]).to_string(),
    }
}

fn json_cell(values: &ColumnValues<'_>, row: usize) -> serde_json::Value {
    use serde_json::Value;
    match values {
        ColumnValues::Date(v) => Value::String(v[row].format("%Y-%m-%d").to_string()),
        // from_f64 rejects NaN and infinities
        ColumnValues::Float(v) => serde_json::Number::from_f64(v[row])
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ColumnValues::Int(v) => Value::from(v[row]),
        ColumnValues::Flag(v) => Value::from(u8::from(v[row])),
    }
}

/// Write CSV with a header row to any writer.
pub fn write_csv_to<W: Write>(table: &FeatureTable, writer: W) -> Result<(), ExportError> {
    let columns = table.columns();
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(columns.iter().map(|c| c.name.as_str()))?;
    for row in 0..table.len() {
        wtr.write_record(columns.iter().map(|c| csv_cell(&c.values, row)))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv(table: &FeatureTable, path: &Path) -> Result<(), ExportError> {
    let file = fs::File::create(path)?;
    write_csv_to(table, BufWriter::new(file))?;
    info!(path = %path.display(), rows = table.len(), "wrote CSV");
    Ok(())
}

pub fn write_parquet(table: &FeatureTable, path: &Path) -> Result<(), ExportError> {
    let mut df = to_dataframe(table)?;
    let file = fs::File::create(path)?;
    ParquetWriter::new(file).finish(&mut df)?;
    info!(path = %path.display(), rows = table.len(), "wrote Parquet");
    Ok(())
}

/// Row records as a JSON array of objects.
pub fn to_json_records(table: &FeatureTable) -> Vec<serde_json::Map<String, serde_json::Value>> {
    let columns = table.columns();
    (0..table.len())
        .map(|row| {
            columns
                .iter()
                .map(|c| (c.name.clone(), json_cell(&c.values, row)))
                .collect()
        })
        .collect()
}

pub fn write_json(table: &FeatureTable, path: &Path) -> Result<(), ExportError> {
    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &to_json_records(table))?;
    writer.flush()?;
    info!(path = %path.display(), rows = table.len(), "wrote JSON");
    Ok(())
}

/// Write in the requested format.
pub fn write(table: &FeatureTable, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => write_csv(table, path),
        ExportFormat::Parquet => write_parquet(table, path),
        ExportFormat::Json => write_json(table, path),
    }
}
