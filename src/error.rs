//! Error types shared across the nc2plot library modules.

use std::path::PathBuf;

/// Error type for all fallible operations in the nc2plot library.
///
/// CLI code wraps these with `anyhow` context; library callers can match on
/// the variants directly.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Returned when the requested variable does not exist in the file.
    #[error("variable '{0}' not found in NetCDF file")]
    VariableNotFound(String),

    /// Returned when reading a variable's data fails.
    #[error("failed to read variable '{name}': {source}")]
    VariableRead {
        /// Variable name.
        name: String,
        #[source]
        source: netcdf::Error,
    },

    /// Returned when no latitude or longitude axis can be identified.
    #[error("could not identify a {axis} axis among dimensions {dimensions:?}")]
    AxisNotFound {
        /// Which axis was being searched for ("latitude" or "longitude").
        axis: &'static str,
        /// Dimension names of the variable.
        dimensions: Vec<String>,
    },

    /// Returned when the variable has an unsupported number of dimensions.
    #[error("variable '{name}' has {ndims} dimensions; expected 2 or 3")]
    UnsupportedRank {
        /// Variable name.
        name: String,
        /// Number of dimensions found.
        ndims: usize,
    },

    /// Returned when the requested time index is out of range.
    #[error("time index {index} out of range: time axis has length {len}")]
    TimeIndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Length of the time axis.
        len: usize,
    },

    /// Returned when a unit conversion pair is not supported.
    #[error("unsupported unit conversion: '{from}' to '{to}'")]
    UnsupportedConversion {
        /// Source unit.
        from: String,
        /// Target unit.
        to: String,
    },

    /// Returned when a grid has no cells to operate on.
    #[error("grid slice for '{0}' is empty")]
    EmptyGrid(String),

    /// Returned when the requested raster dimensions are unusable.
    #[error("invalid raster size {width}x{height}")]
    InvalidRasterSize {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// Returned when writing an image or table to disk fails.
    #[error("failed to write output '{path}': {message}")]
    OutputWrite {
        /// Destination path.
        path: PathBuf,
        /// Underlying failure description.
        message: String,
    },

    /// Returned when a DataFrame operation fails during tidy conversion.
    #[error("dataframe error: {0}")]
    DataFrame(#[from] polars::error::PolarsError),
}

/// Convenience alias used throughout the library modules.
pub type Result<T> = std::result::Result<T, GridError>;
