//! # Table Output Module
//!
//! This module writes tidy DataFrames to disk. The format is chosen by the
//! output extension: `.parquet` (or `.pq`) for Parquet, `.csv` for CSV.

use log::debug;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

use crate::error::{GridError, Result};

/// Writes a DataFrame to `path`, choosing the format by extension.
///
/// # Errors
///
/// Returns an error for unrecognized extensions or when the file cannot be
/// created or serialized.
pub fn write_dataframe(df: &DataFrame, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    match extension.as_str() {
        "parquet" | "pq" => write_dataframe_to_parquet(df, path),
        "csv" => write_dataframe_to_csv(df, path),
        other => Err(GridError::OutputWrite {
            path: path.to_path_buf(),
            message: format!("unsupported table format '{other}' (use .parquet or .csv)"),
        }),
    }
}

/// Writes a DataFrame to a Parquet file.
pub fn write_dataframe_to_parquet(df: &DataFrame, path: &Path) -> Result<()> {
    debug!("writing DataFrame to parquet file: {}", path.display());
    debug!("DataFrame shape: {:?}", df.shape());
    debug!("DataFrame schema:\n{:?}", df.schema());

    let file = File::create(path).map_err(|e| GridError::OutputWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let writer = ParquetWriter::new(file);
    let mut df_clone = df.clone();
    writer
        .finish(&mut df_clone)
        .map_err(|e| GridError::OutputWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(())
}

/// Writes a DataFrame to a CSV file.
pub fn write_dataframe_to_csv(df: &DataFrame, path: &Path) -> Result<()> {
    debug!("writing DataFrame to csv file: {}", path.display());
    debug!("DataFrame shape: {:?}", df.shape());

    let mut file = File::create(path).map_err(|e| GridError::OutputWrite {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut df_clone = df.clone();
    CsvWriter::new(&mut file)
        .finish(&mut df_clone)
        .map_err(|e| GridError::OutputWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(())
}
