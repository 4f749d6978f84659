//! # CLI Module
//!
//! This module provides the command-line interface for nc2plot, including:
//! - Argument parsing with clap
//! - Job file loading (JSON/YAML) for the `run` subcommand
//! - Environment variable support with the NC2PLOT_ prefix
//! - Subcommands for inspection, statistics, plotting, and tidy export
//! - Template generation and shell completions

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use crate::colormaps::Colormap;
use crate::extract::extract_grid_slice;
use crate::info;
use crate::input::{JobConfig, PlotConfig, TidyConfig};
use crate::log::{config_echo, show_farewell_with_timing, show_greeting};
use crate::output;
use crate::process_grid_job;
use crate::project::Projection;
use crate::stats::{GridSummary, UnitConversion, summarize};
use crate::tidy::grid_to_dataframe;

/// NetCDF grid inspection, statistics, plotting and tidy-table export
#[derive(Parser, Debug)]
#[command(name = "nc2plot")]
#[command(about = "Inspect, summarize, plot and tidy gridded NetCDF data")]
#[command(version)]
#[command(long_about = "
nc2plot walks through a gridded NetCDF file the way a notebook would: open it,
look at its structure, pull out one 2D slice with its coordinate vectors,
summarize it, draw it, and flatten it into a tidy table.

EXAMPLES:
  # What is in this file?
  nc2plot info sunshine.nc --detailed

  # Mean monthly sunshine duration, converted from hours to minutes
  nc2plot stats sunshine.nc -n sdu --convert hours:minutes

  # Native-resolution raster through viridis
  nc2plot plot sunshine.nc sdu.png -n sdu

  # Web Mercator raster, 1200 px wide
  nc2plot plot sunshine.nc sdu_mercator.png -n sdu --projection web-mercator --width 1200

  # Long-format table, one row per (lon, lat, time, value)
  nc2plot tidy sunshine.nc sdu.parquet -n sdu

  # Full walkthrough from a job file
  nc2plot run --config job.json

  # Generate a job template to start from
  nc2plot template full --format yaml > job.yaml
")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode - suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format for structured data
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Job file path for `run` (JSON or YAML)
    #[arg(short, long, global = true, env = "NC2PLOT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show information about a NetCDF file
    #[command(long_about = "
Inspect a NetCDF file and display its structure: dimensions and their sizes,
variables with attributes and shapes, time coverage, and (with --detailed)
global attributes.

EXAMPLES:
  nc2plot info data.nc
  nc2plot info data.nc --detailed
  nc2plot info data.nc -n sdu --format json
")]
    Info {
        /// NetCDF file path
        file: PathBuf,

        /// Show global attributes as well
        #[arg(long)]
        detailed: bool,

        /// Show only this variable's info
        #[arg(short = 'n', long)]
        variable: Option<String>,

        /// Output format for file information
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Compute summary statistics for one variable slice
    #[command(long_about = "
Extract one time slice of a gridded variable and report count, mean, min,
max, and standard deviation over the non-missing cells. An optional affine
unit conversion (e.g. hours:minutes) is applied to a second block of
converted statistics.

EXAMPLES:
  nc2plot stats data.nc -n sdu
  nc2plot stats data.nc -n sdu --convert hours:minutes
  nc2plot stats data.nc -n t2m --time-index 3 --format json
")]
    Stats {
        /// NetCDF file path
        file: PathBuf,

        /// NetCDF variable name to summarize
        #[arg(short = 'n', long, env = "NC2PLOT_VARIABLE")]
        variable: String,

        /// Index along the time axis
        #[arg(long, default_value_t = 0)]
        time_index: usize,

        /// Convert reported statistics: from:to (e.g. hours:minutes)
        #[arg(long, value_parser = parse_unit_conversion)]
        convert: Option<UnitConversionArg>,

        /// Output format for the statistics
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Render a variable slice to a PNG raster
    #[command(long_about = "
Render one time slice of a gridded variable to PNG. Without --projection the
grid is drawn at native resolution, one pixel block per cell, north up. With
--projection the slice is resampled onto a projected raster (nearest
neighbour) sized by --width/--height.

EXAMPLES:
  nc2plot plot data.nc out.png -n sdu
  nc2plot plot data.nc out.png -n sdu --colormap magma --scale 4
  nc2plot plot data.nc out.png -n sdu --projection web-mercator --width 1600
  nc2plot plot data.nc out.png -n anomaly --colormap coolwarm --vmin -3 --vmax 3
")]
    Plot {
        /// Input NetCDF file path
        file: PathBuf,

        /// Output PNG path
        output: PathBuf,

        /// NetCDF variable name to render
        #[arg(short = 'n', long, env = "NC2PLOT_VARIABLE")]
        variable: String,

        /// Index along the time axis
        #[arg(long, default_value_t = 0)]
        time_index: usize,

        /// Colormap for the raster
        #[arg(long, value_enum, default_value_t = Colormap::Viridis)]
        colormap: Colormap,

        /// Reproject onto this map projection instead of the native grid
        #[arg(long, value_enum)]
        projection: Option<Projection>,

        /// Raster width in pixels (projected plots)
        #[arg(long)]
        width: Option<u32>,

        /// Raster height in pixels (projected plots)
        #[arg(long)]
        height: Option<u32>,

        /// Lower color-scale bound
        #[arg(long)]
        vmin: Option<f64>,

        /// Upper color-scale bound
        #[arg(long)]
        vmax: Option<f64>,

        /// Integer pixel-replication factor for native plots
        #[arg(long, default_value_t = 1)]
        scale: u32,
    },

    /// Export a variable slice as a tidy long-format table
    #[command(long_about = "
Flatten one time slice of a gridded variable into a long-format table with
columns longitude, latitude, time, and the variable. The output format is
chosen by extension: .parquet/.pq or .csv.

EXAMPLES:
  nc2plot tidy data.nc out.parquet -n sdu
  nc2plot tidy data.nc out.csv -n sdu --keep-missing
")]
    Tidy {
        /// Input NetCDF file path
        file: PathBuf,

        /// Output table path (.parquet or .csv)
        output: PathBuf,

        /// NetCDF variable name to export
        #[arg(short = 'n', long, env = "NC2PLOT_VARIABLE")]
        variable: String,

        /// Index along the time axis
        #[arg(long, default_value_t = 0)]
        time_index: usize,

        /// Keep missing cells as null rows instead of dropping them
        #[arg(long, env = "NC2PLOT_KEEP_MISSING")]
        keep_missing: bool,
    },

    /// Run a full walkthrough job from a config file
    #[command(long_about = "
Execute a complete walkthrough described by a job file: print the file
structure, extract the configured slice, report statistics, render the
configured plot, and write the tidy table. Sections absent from the job file
are skipped.

EXAMPLES:
  nc2plot run --config job.json
  NC2PLOT_CONFIG=job.yaml nc2plot run
")]
    Run,

    /// Generate job file templates
    #[command(long_about = "
Generate job file templates for common use cases.

Available templates:
  basic: input, variable, and statistics only
  full:  statistics with unit conversion, projected plot, tidy export

EXAMPLES:
  nc2plot template basic
  nc2plot template full --format yaml -o job.yaml
")]
    Template {
        /// Template type to generate
        #[arg(value_enum)]
        template_type: TemplateType,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Configuration format
        #[arg(long, value_enum, default_value_t = ConfigFormat::Json)]
        format: ConfigFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON structured output
    Json,
    /// YAML structured output
    Yaml,
    /// CSV output (where applicable)
    Csv,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateType {
    /// Minimal statistics-only template
    Basic,
    /// Full walkthrough template
    Full,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON configuration format
    Json,
    /// YAML configuration format
    Yaml,
}

/// Unit conversion argument from the command line
#[derive(Clone, Debug, PartialEq)]
pub struct UnitConversionArg {
    pub from: String,
    pub to: String,
}

impl From<UnitConversionArg> for UnitConversion {
    fn from(arg: UnitConversionArg) -> Self {
        UnitConversion::new(&arg.from, &arg.to)
    }
}

/// Parse a unit conversion from a command line argument
/// Format: from:to
fn parse_unit_conversion(s: &str) -> Result<UnitConversionArg, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err("unit conversion must be in format 'from:to'".to_string());
    }
    let from = parts[0].trim().to_string();
    let to = parts[1].trim().to_string();
    if from.is_empty() || to.is_empty() {
        return Err("unit names cannot be empty".to_string());
    }
    Ok(UnitConversionArg { from, to })
}

/// Stats payload for structured output formats.
#[derive(Serialize)]
struct StatsReport {
    variable: String,
    units: Option<String>,
    time: Option<String>,
    summary: GridSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    converted_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    converted: Option<GridSummary>,
}

/// Executes the parsed command line.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Info {
            file,
            detailed,
            variable,
            format,
        } => {
            let file_info = info::read_netcdf_info(&file, variable.as_deref(), detailed)?;
            match format.unwrap_or(cli.output_format) {
                OutputFormat::Human => info::print_file_info_human(&file_info),
                OutputFormat::Json => info::print_file_info_json(&file_info)?,
                OutputFormat::Yaml => info::print_file_info_yaml(&file_info)?,
                OutputFormat::Csv => info::print_file_info_csv(&file_info)?,
            }
            Ok(())
        }

        Commands::Stats {
            file,
            variable,
            time_index,
            convert,
            format,
        } => {
            let nc = netcdf::open(&file)
                .with_context(|| format!("failed to open '{}'", file.display()))?;
            let slice = extract_grid_slice(&nc, &variable, time_index)?;
            let summary = summarize(&slice);

            let (converted, converted_to) = match convert {
                Some(arg) => {
                    let conversion: UnitConversion = arg.into();
                    let converter = conversion.to_converter()?;
                    (
                        Some(converter.convert_summary(&summary)),
                        Some(conversion.to),
                    )
                }
                None => (None, None),
            };

            let report = StatsReport {
                variable: slice.variable.clone(),
                units: slice.units.clone(),
                time: slice.timestamp.map(|t| t.to_rfc3339()),
                summary,
                converted_to,
                converted,
            };
            print_stats_report(&report, format.unwrap_or(cli.output_format))
        }

        Commands::Plot {
            file,
            output,
            variable,
            time_index,
            colormap,
            projection,
            width,
            height,
            vmin,
            vmax,
            scale,
        } => {
            let plot = PlotConfig {
                path: output,
                colormap,
                projection,
                width,
                height,
                vmin,
                vmax,
                scale,
            };
            let nc = netcdf::open(&file)
                .with_context(|| format!("failed to open '{}'", file.display()))?;
            let slice = extract_grid_slice(&nc, &variable, time_index)?;
            let image = plot.render(&slice)?;
            image
                .save(&plot.path)
                .with_context(|| format!("failed to write image '{}'", plot.path.display()))?;
            if !cli.quiet {
                println!(
                    "wrote {}x{} plot to {}",
                    image.width(),
                    image.height(),
                    plot.path.display()
                );
            }
            Ok(())
        }

        Commands::Tidy {
            file,
            output,
            variable,
            time_index,
            keep_missing,
        } => {
            let tidy_config = TidyConfig {
                path: output,
                keep_missing,
            };
            let nc = netcdf::open(&file)
                .with_context(|| format!("failed to open '{}'", file.display()))?;
            let slice = extract_grid_slice(&nc, &variable, time_index)?;
            let df = grid_to_dataframe(&slice, tidy_config.keep_missing)?;
            output::write_dataframe(&df, &tidy_config.path)?;
            if !cli.quiet {
                println!(
                    "wrote {} tidy rows to {}",
                    df.height(),
                    tidy_config.path.display()
                );
            }
            Ok(())
        }

        Commands::Run => {
            let config_path = cli
                .config
                .context("`run` needs a job file: pass --config or set NC2PLOT_CONFIG")?;
            let start_time = Instant::now();

            show_greeting(&config_path.display().to_string());
            let config = JobConfig::from_file(&config_path).map_err(|e| {
                anyhow::anyhow!("failed to load job file '{}': {e}", config_path.display())
            })?;

            let problems = config.validate();
            if !problems.is_empty() {
                bail!("invalid job file:\n  - {}", problems.join("\n  - "));
            }

            config_echo(&config);
            process_grid_job(&config)?;
            show_farewell_with_timing(start_time.elapsed());
            Ok(())
        }

        Commands::Template {
            template_type,
            output,
            format,
        } => {
            let template = match template_type {
                TemplateType::Basic => JobConfig::template_basic(),
                TemplateType::Full => JobConfig::template_full(),
            };
            let rendered = match format {
                ConfigFormat::Json => serde_json::to_string_pretty(&template)?,
                ConfigFormat::Yaml => serde_yaml::to_string(&template)?,
            };
            write_or_print(&rendered, output.as_deref())
        }

        Commands::Completions { shell, output } => {
            let mut command = Cli::command();
            match output {
                Some(path) => {
                    let mut file = std::fs::File::create(&path)
                        .with_context(|| format!("failed to create '{}'", path.display()))?;
                    clap_complete::generate(shell, &mut command, "nc2plot", &mut file);
                }
                None => {
                    clap_complete::generate(shell, &mut command, "nc2plot", &mut std::io::stdout());
                }
            }
            Ok(())
        }
    }
}

fn print_stats_report(report: &StatsReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Human => {
            println!(
                "Summary of '{}'{}:",
                report.variable,
                report
                    .units
                    .as_deref()
                    .map(|u| format!(" ({u})"))
                    .unwrap_or_default()
            );
            if let Some(time) = &report.time {
                println!("  time: {}", time);
            }
            print_summary_lines(&report.summary);
            if let (Some(converted), Some(to)) = (&report.converted, &report.converted_to) {
                println!("Converted to {}:", to);
                print_summary_lines(converted);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(report)?),
        OutputFormat::Csv => {
            println!("variable,count,missing,min,max,mean,std");
            let s = &report.summary;
            println!(
                "{},{},{},{},{},{},{}",
                report.variable, s.count, s.missing, s.min, s.max, s.mean, s.std
            );
        }
    }
    Ok(())
}

fn print_summary_lines(summary: &GridSummary) {
    println!(
        "  cells: {} valid, {} missing",
        summary.count, summary.missing
    );
    println!("  min:  {:.4}", summary.min);
    println!("  max:  {:.4}", summary.max);
    println!("  mean: {:.4}", summary.mean);
    println!("  std:  {:.4}", summary.std);
}

fn write_or_print(content: &str, output: Option<&std::path::Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            file.write_all(content.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => println!("{}", content),
    }
    Ok(())
}
