//! # nc2plot
//!
//! A Rust library and CLI for inspecting, summarizing, plotting, and
//! tidying gridded NetCDF data.
//!
//! ## Features
//!
//! - **Metadata inspection**: dimensions, variables, attributes, and time
//!   coverage in human, JSON, YAML, or CSV form
//! - **Slice extraction**: a 2D field at one time step with its coordinate
//!   vectors, CF packing and fill values handled
//! - **Summary statistics**: count, mean, min, max, std with optional unit
//!   conversion
//! - **Plotting**: colormapped PNG rasters at native resolution or
//!   reprojected (plate carrée, Web Mercator)
//! - **Tidy export**: long-format (lon, lat, time, value) tables as Parquet
//!   or CSV
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nc2plot::{process_grid_job, input::JobConfig};
//!
//! // Load a job description from a JSON or YAML file
//! let config = JobConfig::from_file("job.json").expect("failed to load config");
//!
//! // Inspect, summarize, plot, and export in one pass
//! process_grid_job(&config).expect("job failed");
//! ```
//!
//! ## Configuration Example
//!
//! ```json
//! {
//!   "nc_path": "sunshine_duration_monthly.nc",
//!   "variable": "sdu",
//!   "time_index": 0,
//!   "stats": { "convert": { "from": "hours", "to": "minutes" } },
//!   "plot": { "path": "sdu.png", "colormap": "viridis" },
//!   "tidy": { "path": "sdu.parquet" }
//! }
//! ```

pub mod cli;
pub mod colormaps;
pub mod error;
pub mod extract;
pub mod info;
pub mod input;
pub mod log;
pub mod output;
pub mod project;
pub mod render;
pub mod stats;
pub mod tidy;

#[cfg(test)]
mod tests;

use anyhow::Context;

use crate::extract::extract_grid_slice;
use crate::input::JobConfig;
use crate::log::{show_slice_summary, show_stats_summary};
use crate::stats::summarize;

/// Processes a NetCDF file according to the provided job configuration.
///
/// This function orchestrates the full walkthrough:
/// 1. Opens the NetCDF file and prints its structure
/// 2. Extracts the configured variable slice with its coordinate vectors
/// 3. Computes and prints summary statistics (with optional unit conversion)
/// 4. Renders the configured plots (native and/or projected raster)
/// 5. Writes the tidy long-format table
///
/// Steps 3-5 each run only when the corresponding config section is present.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, the variable or its
/// coordinate axes cannot be found, a configured unit conversion is
/// unsupported, or any output fails to write.
pub fn process_grid_job(config: &JobConfig) -> anyhow::Result<()> {
    let file_info = info::read_netcdf_info(&config.nc_path, None, false)
        .with_context(|| format!("failed to inspect '{}'", config.nc_path.display()))?;
    info::print_file_info_human(&file_info);

    let file = netcdf::open(&config.nc_path)
        .with_context(|| format!("failed to open '{}'", config.nc_path.display()))?;
    let slice = extract_grid_slice(&file, &config.variable, config.time_index)
        .with_context(|| format!("failed to extract variable '{}'", config.variable))?;
    show_slice_summary(&slice);

    if let Some(stats_config) = &config.stats {
        let summary = summarize(&slice);
        let converted = match &stats_config.convert {
            Some(conversion) => {
                let converter = conversion
                    .to_converter()
                    .context("failed to resolve unit conversion")?;
                Some(converter.convert_summary(&summary))
            }
            None => None,
        };
        show_stats_summary(&slice, &summary, converted.as_ref(), stats_config);
    }

    if let Some(plot_config) = &config.plot {
        let image = plot_config
            .render(&slice)
            .context("failed to render plot")?;
        image
            .save(&plot_config.path)
            .with_context(|| format!("failed to write image '{}'", plot_config.path.display()))?;
        ::log::info!("wrote plot to {}", plot_config.path.display());
    }

    if let Some(tidy_config) = &config.tidy {
        let df = tidy::grid_to_dataframe(&slice, tidy_config.keep_missing)
            .context("failed to build tidy table")?;
        output::write_dataframe(&df, &tidy_config.path).context("failed to write tidy table")?;
        ::log::info!(
            "wrote {} tidy rows to {}",
            df.height(),
            tidy_config.path.display()
        );
    }

    Ok(())
}
