//! Tidy (long-format) conversion of grid slices.
//!
//! A grid slice is a dense array; the tidy representation is one row per
//! observation with columns `longitude`, `latitude`, `time`, and the
//! variable itself, which is what dataframe tooling downstream expects.

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use polars::prelude::*;

use crate::error::Result;
use crate::extract::GridSlice;

/// Grids with more rows than this get a progress bar during conversion.
const PROGRESS_THRESHOLD: usize = 500_000;

/// Converts a grid slice into a long-format DataFrame.
///
/// Columns are `longitude`, `latitude`, `time`, and the variable name. Rows
/// are emitted latitude-major, matching the slice layout. Missing cells are
/// dropped unless `keep_missing` is set, in which case they appear as nulls.
///
/// The `time` column holds the decoded ISO-8601 timestamp when the file's
/// time units are CF-parseable, the raw coordinate value otherwise, and is
/// omitted entirely for variables without a time axis.
pub fn grid_to_dataframe(slice: &GridSlice, keep_missing: bool) -> Result<DataFrame> {
    let total_cells = slice.values.len();
    let progress = if total_cells >= PROGRESS_THRESHOLD {
        let bar = ProgressBar::new(slice.nlat() as u64);
        bar.set_style(
            ProgressStyle::with_template("tidying {bar:30} {pos}/{len} rows of cells")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(bar)
    } else {
        None
    };

    let mut lon_col = Vec::new();
    let mut lat_col = Vec::new();
    let mut value_col: Vec<Option<f64>> = Vec::new();

    for i_lat in 0..slice.nlat() {
        for i_lon in 0..slice.nlon() {
            let value = slice.value_at(i_lat, i_lon);
            if !value.is_finite() && !keep_missing {
                continue;
            }
            lon_col.push(slice.lons[i_lon]);
            lat_col.push(slice.lats[i_lat]);
            value_col.push(value.is_finite().then_some(value));
        }
        if let Some(bar) = &progress {
            bar.inc(1);
        }
    }
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    debug!(
        "tidy table for '{}': {} rows from {} cells (keep_missing={})",
        slice.variable,
        lon_col.len(),
        total_cells,
        keep_missing
    );

    let rows = lon_col.len();
    let mut columns: Vec<Column> = Vec::new();
    columns.push(Series::new("longitude".into(), lon_col).into());
    columns.push(Series::new("latitude".into(), lat_col).into());
    if let Some(time_series) = time_column(slice, rows) {
        columns.push(time_series.into());
    }
    columns.push(Series::new(slice.variable.as_str().into(), value_col).into());

    let df = DataFrame::new(columns)?;
    Ok(df)
}

/// Builds the constant `time` column, or None for variables without a time
/// axis.
fn time_column(slice: &GridSlice, rows: usize) -> Option<Series> {
    match (&slice.timestamp, slice.time_value) {
        (Some(timestamp), _) => {
            let stamp = timestamp.to_rfc3339();
            Some(Series::new("time".into(), vec![stamp; rows]))
        }
        (None, Some(value)) => Some(Series::new("time".into(), vec![value; rows])),
        (None, None) => None,
    }
}
