//! CSV round-trip and the JSON run report.

use std::fs::File;
use std::path::{Path, PathBuf};

use budgetline_core::{AdjustSummary, Dataset};
use serde::{Deserialize, Serialize};

/// Errors from reading or writing observation tables and reports.
#[derive(thiserror::Error, Debug)]
pub enum DatasetIoError {
    #[error("{}: {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Read a delimited table with a header row.
pub fn read_dataset(path: impl AsRef<Path>) -> Result<Dataset, DatasetIoError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DatasetIoError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            // Excel exports can prefix the first header with a UTF-8 BOM;
            // left in place it makes the schema check report `Subject` as
            // missing.
            if idx == 0 {
                name.trim_start_matches('\u{feff}').to_string()
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Dataset { headers, rows })
}

/// Write a table as CSV, header row first.
pub fn write_dataset(path: impl AsRef<Path>, dataset: &Dataset) -> Result<(), DatasetIoError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| DatasetIoError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
    writer.write_record(&dataset.headers)?;
    for row in &dataset.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Machine-readable account of one adjustment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub input: String,
    pub output: String,
    pub summary: AdjustSummary,
}

impl RunReport {
    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), DatasetIoError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
