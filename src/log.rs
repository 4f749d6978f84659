//! Logging setup and console reporting for the `run` walkthrough.

use std::time::Duration;

use crate::extract::GridSlice;
use crate::input::{JobConfig, StatsConfig};
use crate::stats::GridSummary;

/// Initializes env_logger from the CLI verbosity flags.
///
/// `RUST_LOG` overrides the flag-derived level if set.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

pub fn show_greeting(config_path: &str) {
    println!("=== NetCDF Grid Walkthrough ===");
    println!("Loading job from: {}", config_path);
}

pub fn config_echo(config: &JobConfig) {
    println!("\nJob:");
    println!("  Input NetCDF: {}", config.nc_path.display());
    println!("  Variable: {}", config.variable);
    println!("  Time index: {}", config.time_index);
    if let Some(stats) = &config.stats {
        match &stats.convert {
            Some(c) => println!("  Stats: yes (convert {} -> {})", c.from, c.to),
            None => println!("  Stats: yes"),
        }
    }
    if let Some(plot) = &config.plot {
        let kind = match plot.projection {
            Some(p) => p.name(),
            None => "native grid",
        };
        println!(
            "  Plot: {} ({}, {})",
            plot.path.display(),
            kind,
            plot.colormap.name()
        );
    }
    if let Some(tidy) = &config.tidy {
        println!("  Tidy table: {}", tidy.path.display());
    }
}

pub fn show_slice_summary(slice: &GridSlice) {
    println!("\nExtracted Slice:");
    println!(
        "  Grid: {} longitudes x {} latitudes",
        slice.nlon(),
        slice.nlat()
    );
    let (lon_min, lat_min, lon_max, lat_max) = slice.bounds();
    println!(
        "  Extent: lon [{:.3}, {:.3}], lat [{:.3}, {:.3}]",
        lon_min, lon_max, lat_min, lat_max
    );
    if let Some(name) = &slice.long_name {
        println!("  Long name: {}", name);
    }
    if let Some(units) = &slice.units {
        println!("  Units: {}", units);
    }
    match (&slice.timestamp, slice.time_value) {
        (Some(stamp), _) => println!("  Time: {}", stamp.to_rfc3339()),
        (None, Some(value)) => println!("  Time: {} (raw coordinate)", value),
        (None, None) => {}
    }
}

pub fn show_stats_summary(
    slice: &GridSlice,
    summary: &GridSummary,
    converted: Option<&GridSummary>,
    config: &StatsConfig,
) {
    let units = slice.units.as_deref().unwrap_or("?");
    println!("\nSummary Statistics ({}):", units);
    print_summary_block(summary);
    if let (Some(converted), Some(conversion)) = (converted, &config.convert) {
        println!("Converted to {}:", conversion.to);
        print_summary_block(converted);
    }
}

fn print_summary_block(summary: &GridSummary) {
    println!(
        "  cells: {} valid, {} missing",
        summary.count, summary.missing
    );
    println!("  min:  {:.4}", summary.min);
    println!("  max:  {:.4}", summary.max);
    println!("  mean: {:.4}", summary.mean);
    println!("  std:  {:.4}", summary.std);
}

pub fn show_farewell_with_timing(elapsed: Duration) {
    println!("\n=== Walkthrough completed in {:.2?} ===", elapsed);
}
