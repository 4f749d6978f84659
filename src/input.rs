//! # Input Configuration Module
//!
//! This module provides configuration parsing and validation for nc2plot jobs.
//! A job file describes one pass over a NetCDF grid: which file and variable
//! to open, which time slice to take, and which of the three outputs (summary
//! statistics, plot, tidy table) to produce.
//!
//! ## Configuration Structure
//!
//! - **nc_path**: path to the input NetCDF file
//! - **variable**: name of the gridded variable to extract
//! - **time_index**: time slice to extract (default 0)
//! - **stats**: optional statistics section with a unit conversion
//! - **plot**: optional plot section (output path, colormap, projection, size)
//! - **tidy**: optional tidy-table section (output path, missing handling)
//!
//! Files ending in `.yaml`/`.yml` are parsed as YAML, everything else as
//! JSON.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use nc2plot::input::JobConfig;
//!
//! let config = JobConfig::from_file("job.json")?;
//! println!("processing variable: {}", config.variable);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::colormaps::Colormap;
use crate::error::Result as GridResult;
use crate::extract::GridSlice;
use crate::project::{self, Projection};
use crate::render::{self, RenderOptions};
use crate::stats::UnitConversion;

/// Default pixel width of projected plots when the config gives no size.
const DEFAULT_PROJECTED_WIDTH: u32 = 800;

/// Main configuration structure for nc2plot jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Path to the input NetCDF file
    pub nc_path: PathBuf,
    /// Name of the gridded variable to extract
    pub variable: String,
    /// Index along the time axis to extract (default 0)
    #[serde(default)]
    pub time_index: usize,
    /// Summary statistics section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsConfig>,
    /// Plot section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<PlotConfig>,
    /// Tidy table section
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tidy: Option<TidyConfig>,
}

/// Statistics options for a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Optional unit conversion applied to the reported statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convert: Option<UnitConversion>,
}

/// Plot options for a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Output PNG path
    pub path: PathBuf,
    /// Colormap name (default viridis)
    #[serde(default)]
    pub colormap: Colormap,
    /// Map projection; absent means a native-resolution grid plot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    /// Raster width in pixels (projected plots only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Raster height in pixels (projected plots only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Lower color-scale bound override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmin: Option<f64>,
    /// Upper color-scale bound override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vmax: Option<f64>,
    /// Integer pixel-replication factor for native plots (default 1)
    #[serde(default = "default_scale")]
    pub scale: u32,
}

/// Tidy table options for a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TidyConfig {
    /// Output table path (.parquet or .csv)
    pub path: PathBuf,
    /// Keep missing cells as null rows instead of dropping them
    #[serde(default)]
    pub keep_missing: bool,
}

fn default_scale() -> u32 {
    1
}

impl JobConfig {
    /// Loads a job configuration from a JSON or YAML file (by extension).
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        let config: JobConfig = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        Ok(config)
    }

    /// Loads a job configuration from a JSON string.
    pub fn from_json(json_str: &str) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let config: JobConfig = serde_json::from_str(json_str)?;
        Ok(config)
    }

    /// Checks the configuration for problems that would fail later anyway.
    ///
    /// Returns the list of problems found, empty when the config is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.variable.trim().is_empty() {
            problems.push("variable name is empty".to_string());
        }
        if !self.nc_path.exists() {
            problems.push(format!(
                "input file '{}' does not exist",
                self.nc_path.display()
            ));
        }
        if let Some(plot) = &self.plot {
            if !has_extension(&plot.path, &["png"]) {
                problems.push(format!(
                    "plot path '{}' should end in .png",
                    plot.path.display()
                ));
            }
            if plot.scale == 0 {
                problems.push("plot scale must be at least 1".to_string());
            }
        }
        if let Some(conversion) = self.stats.as_ref().and_then(|s| s.convert.as_ref())
            && conversion.to_converter().is_err()
        {
            problems.push(format!(
                "unsupported unit conversion '{}' to '{}'",
                conversion.from, conversion.to
            ));
        }
        if let Some(tidy) = &self.tidy
            && !has_extension(&tidy.path, &["parquet", "pq", "csv"])
        {
            problems.push(format!(
                "tidy path '{}' should end in .parquet or .csv",
                tidy.path.display()
            ));
        }
        problems
    }

    /// A minimal job template: statistics only.
    pub fn template_basic() -> Self {
        Self {
            nc_path: PathBuf::from("input.nc"),
            variable: "temperature".to_string(),
            time_index: 0,
            stats: Some(StatsConfig::default()),
            plot: None,
            tidy: None,
        }
    }

    /// A full walkthrough template: stats with conversion, both plot kinds'
    /// options spelled out, and a tidy Parquet export.
    pub fn template_full() -> Self {
        Self {
            nc_path: PathBuf::from("sunshine_duration_monthly.nc"),
            variable: "sdu".to_string(),
            time_index: 0,
            stats: Some(StatsConfig {
                convert: Some(UnitConversion::new("hours", "minutes")),
            }),
            plot: Some(PlotConfig {
                path: PathBuf::from("sdu.png"),
                colormap: Colormap::Viridis,
                projection: Some(Projection::WebMercator),
                width: Some(800),
                height: None,
                vmin: None,
                vmax: None,
                scale: 1,
            }),
            tidy: Some(TidyConfig {
                path: PathBuf::from("sdu.parquet"),
                keep_missing: false,
            }),
        }
    }
}

impl PlotConfig {
    /// Renders the slice according to this plot section.
    ///
    /// Without a projection the slice is drawn at native grid resolution;
    /// with one it is resampled onto a projected raster first, sized by
    /// `width`/`height` (height defaults to match the projected aspect
    /// ratio).
    pub fn render(&self, slice: &GridSlice) -> GridResult<RgbaImage> {
        let options = RenderOptions {
            colormap: self.colormap,
            vmin: self.vmin,
            vmax: self.vmax,
            scale: self.scale,
        };
        match self.projection {
            None => render::render_grid(slice, &options),
            Some(projection) => {
                let width = self.width.unwrap_or(DEFAULT_PROJECTED_WIDTH);
                let height = match self.height {
                    Some(h) => h,
                    None => projected_height(slice, projection, width),
                };
                let raster = project::resample(slice, projection, width, height)?;
                render::render_projected(&raster, &options)
            }
        }
    }
}

/// Raster height matching the projected aspect ratio of the grid extent.
fn projected_height(slice: &GridSlice, projection: Projection, width: u32) -> u32 {
    let (lon_min, lat_min, lon_max, lat_max) = slice.bounds();
    let (x_min, y_min) = projection.forward(lon_min, lat_min);
    let (x_max, y_max) = projection.forward(lon_max, lat_max);
    let x_span = (x_max - x_min).abs();
    let y_span = (y_max - y_min).abs();
    if x_span <= 0.0 || y_span <= 0.0 {
        return width;
    }
    ((width as f64 * y_span / x_span).round() as u32).clamp(1, 8192)
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|e| allowed.contains(&e.as_str()))
}
