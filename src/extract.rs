//! # Slice Extraction
//!
//! This module reads a single 2D slice of a gridded NetCDF variable into
//! memory together with the coordinate vectors indexing its axes.
//!
//! ## Key Components
//!
//! - [`GridSlice`]: the in-memory slice with its longitude/latitude vectors
//! - [`extract_grid_slice`]: extraction with CF packing and fill handling
//!
//! Axis order in the file does not matter: the latitude, longitude, and time
//! axes are identified by dimension name (with a CF `units` fallback) and the
//! slice is always stored latitude-major. Cells equal to the variable's
//! `_FillValue`/`missing_value` become NaN; `scale_factor` and `add_offset`
//! are applied to everything else.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::debug;

use crate::error::{GridError, Result};

const LAT_NAMES: &[&str] = &["lat", "latitude"];
const LON_NAMES: &[&str] = &["lon", "longitude"];

/// A single 2D slice of a gridded variable, with its coordinate vectors.
///
/// Values are stored latitude-major: `values[i_lat * lons.len() + i_lon]`
/// is the cell at `(lats[i_lat], lons[i_lon])`. Missing cells are NaN.
/// Construction guarantees `values.len() == lats.len() * lons.len()`.
#[derive(Debug, Clone)]
pub struct GridSlice {
    /// Name of the extracted variable.
    pub variable: String,
    /// The variable's `units` attribute, if present.
    pub units: Option<String>,
    /// The variable's `long_name` attribute, if present.
    pub long_name: Option<String>,
    /// Longitude coordinate vector (one entry per grid column).
    pub lons: Vec<f64>,
    /// Latitude coordinate vector (one entry per grid row).
    pub lats: Vec<f64>,
    /// Raw time coordinate value at the extracted index, if a time axis exists.
    pub time_value: Option<f64>,
    /// The time axis `units` attribute, if present.
    pub time_units: Option<String>,
    /// Decoded UTC timestamp of the slice, when the time units are CF-parseable.
    pub timestamp: Option<DateTime<Utc>>,
    /// Cell values, latitude-major, NaN for missing.
    pub values: Vec<f64>,
}

impl GridSlice {
    /// Number of latitude rows.
    pub fn nlat(&self) -> usize {
        self.lats.len()
    }

    /// Number of longitude columns.
    pub fn nlon(&self) -> usize {
        self.lons.len()
    }

    /// Value at `(lats[i_lat], lons[i_lon])`. NaN means missing.
    pub fn value_at(&self, i_lat: usize, i_lon: usize) -> f64 {
        self.values[i_lat * self.lons.len() + i_lon]
    }

    /// Whether the cell at the given coordinate position is missing.
    pub fn is_missing(&self, i_lat: usize, i_lon: usize) -> bool {
        !self.value_at(i_lat, i_lon).is_finite()
    }

    /// Whether the latitude vector runs south to north.
    pub fn lat_ascending(&self) -> bool {
        match (self.lats.first(), self.lats.last()) {
            (Some(first), Some(last)) => first <= last,
            _ => true,
        }
    }

    /// Grid extent as (lon_min, lat_min, lon_max, lat_max).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let (mut lon_min, mut lon_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &lon in &self.lons {
            lon_min = lon_min.min(lon);
            lon_max = lon_max.max(lon);
        }
        let (mut lat_min, mut lat_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for &lat in &self.lats {
            lat_min = lat_min.min(lat);
            lat_max = lat_max.max(lat);
        }
        (lon_min, lat_min, lon_max, lat_max)
    }
}

/// Extracts one 2D slice of `var_name` from an open NetCDF file.
///
/// The variable must have 2 dimensions (latitude, longitude in any order) or
/// 3 (those plus a time axis in any position). For 2D variables `time_index`
/// must be 0. For 3D variables the slice at `time_index` along the time axis
/// is extracted and the time coordinate value at that index is decoded.
///
/// # Errors
///
/// Returns an error if the variable is absent, its rank is unsupported, the
/// latitude/longitude axes cannot be identified, the time index is out of
/// range, or reading from the file fails.
pub fn extract_grid_slice(
    file: &netcdf::File,
    var_name: &str,
    time_index: usize,
) -> Result<GridSlice> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| GridError::VariableNotFound(var_name.to_string()))?;

    let dim_names: Vec<String> = var
        .dimensions()
        .iter()
        .map(|d| d.name().to_string())
        .collect();
    let dim_lens: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    let ndims = dim_names.len();
    if ndims != 2 && ndims != 3 {
        return Err(GridError::UnsupportedRank {
            name: var_name.to_string(),
            ndims,
        });
    }

    let lat_pos = find_axis(file, &dim_names, LAT_NAMES, "north").ok_or_else(|| {
        GridError::AxisNotFound {
            axis: "latitude",
            dimensions: dim_names.clone(),
        }
    })?;
    let lon_pos = find_axis(file, &dim_names, LON_NAMES, "east").ok_or_else(|| {
        GridError::AxisNotFound {
            axis: "longitude",
            dimensions: dim_names.clone(),
        }
    })?;
    let time_pos = (0..ndims).find(|&p| p != lat_pos && p != lon_pos);

    match time_pos {
        Some(pos) => {
            let len = dim_lens[pos];
            if time_index >= len {
                return Err(GridError::TimeIndexOutOfRange {
                    index: time_index,
                    len,
                });
            }
        }
        None if time_index != 0 => {
            return Err(GridError::TimeIndexOutOfRange {
                index: time_index,
                len: 1,
            });
        }
        None => {}
    }

    debug!(
        "extracting '{}' (dims {:?}, lat axis {}, lon axis {}, time axis {:?})",
        var_name, dim_names, lat_pos, lon_pos, time_pos
    );

    let raw = var
        .get::<f64, _>(..)
        .map_err(|source| GridError::VariableRead {
            name: var_name.to_string(),
            source,
        })?;

    let fill_value = var
        .attribute("_FillValue")
        .or_else(|| var.attribute("missing_value"))
        .and_then(|a| a.value().ok())
        .and_then(|v| attr_as_f64(&v));
    let scale_factor = var
        .attribute("scale_factor")
        .and_then(|a| a.value().ok())
        .and_then(|v| attr_as_f64(&v))
        .unwrap_or(1.0);
    let add_offset = var
        .attribute("add_offset")
        .and_then(|a| a.value().ok())
        .and_then(|v| attr_as_f64(&v))
        .unwrap_or(0.0);

    let nlat = dim_lens[lat_pos];
    let nlon = dim_lens[lon_pos];
    let mut values = Vec::with_capacity(nlat * nlon);
    let mut index = vec![0usize; ndims];
    if let Some(pos) = time_pos {
        index[pos] = time_index;
    }
    for i_lat in 0..nlat {
        for i_lon in 0..nlon {
            index[lat_pos] = i_lat;
            index[lon_pos] = i_lon;
            let cell = raw[&index[..]];
            let missing = !cell.is_finite() || fill_value.is_some_and(|f| cell == f);
            values.push(if missing {
                f64::NAN
            } else {
                cell * scale_factor + add_offset
            });
        }
    }

    let lats = read_coordinate(file, &dim_names[lat_pos], nlat)?;
    let lons = read_coordinate(file, &dim_names[lon_pos], nlon)?;

    let (time_value, time_units, timestamp) = match time_pos {
        Some(pos) => read_time_coordinate(file, &dim_names[pos], time_index)?,
        None => (None, None, None),
    };

    Ok(GridSlice {
        variable: var_name.to_string(),
        units: attr_string(&var, "units"),
        long_name: attr_string(&var, "long_name"),
        lons,
        lats,
        time_value,
        time_units,
        timestamp,
        values,
    })
}

/// Finds the position of an axis among the variable's dimensions.
///
/// Matches dimension names against the candidate list first, then falls back
/// to coordinate variables whose `units` attribute mentions the hint
/// (`degrees_north` / `degrees_east`).
fn find_axis(
    file: &netcdf::File,
    dim_names: &[String],
    candidates: &[&str],
    units_hint: &str,
) -> Option<usize> {
    for (pos, name) in dim_names.iter().enumerate() {
        if candidates
            .iter()
            .any(|c| name.eq_ignore_ascii_case(c))
        {
            return Some(pos);
        }
    }
    for (pos, name) in dim_names.iter().enumerate() {
        if let Some(coord_var) = file.variable(name)
            && let Some(units) = attr_string(&coord_var, "units")
            && units.to_lowercase().contains(units_hint)
        {
            return Some(pos);
        }
    }
    None
}

/// Reads a 1D coordinate variable, falling back to plain indices when the
/// dimension has no coordinate variable.
fn read_coordinate(file: &netcdf::File, dim_name: &str, len: usize) -> Result<Vec<f64>> {
    match file.variable(dim_name) {
        Some(coord_var) => {
            let array = coord_var
                .get::<f64, _>(..)
                .map_err(|source| GridError::VariableRead {
                    name: dim_name.to_string(),
                    source,
                })?;
            Ok(array.iter().cloned().collect())
        }
        None => Ok((0..len).map(|i| i as f64).collect()),
    }
}

/// Reads the time coordinate value at `index` and decodes it via CF units.
#[allow(clippy::type_complexity)]
fn read_time_coordinate(
    file: &netcdf::File,
    dim_name: &str,
    index: usize,
) -> Result<(Option<f64>, Option<String>, Option<DateTime<Utc>>)> {
    let Some(time_var) = file.variable(dim_name) else {
        return Ok((None, None, None));
    };
    let array = time_var
        .get::<f64, _>(index)
        .map_err(|source| GridError::VariableRead {
            name: dim_name.to_string(),
            source,
        })?;
    let value = array[[]];
    let units = attr_string(&time_var, "units");
    let timestamp = units.as_deref().and_then(|u| decode_cf_time(value, u));
    Ok((Some(value), units, timestamp))
}

/// Parses CF time units of the form "<unit> since <datetime>".
///
/// Returns the base datetime and the multiplier converting one coordinate
/// unit to seconds. Calendars other than the default are not interpreted.
pub fn parse_cf_time_units(units: &str) -> Option<(NaiveDateTime, f64)> {
    let mut parts = units.splitn(3, ' ');
    let unit = parts.next()?.to_lowercase();
    let since = parts.next()?;
    if !since.eq_ignore_ascii_case("since") {
        return None;
    }
    let seconds = match unit.as_str() {
        "seconds" | "second" | "secs" | "s" => 1.0,
        "minutes" | "minute" | "mins" => 60.0,
        "hours" | "hour" | "hrs" | "h" => 3600.0,
        "days" | "day" | "d" => 86400.0,
        _ => return None,
    };
    let rest = parts.next()?.trim();
    let base = NaiveDateTime::parse_from_str(rest, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(rest, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(rest, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Some((base, seconds))
}

/// Decodes a CF time coordinate value into a UTC timestamp.
pub fn decode_cf_time(value: f64, units: &str) -> Option<DateTime<Utc>> {
    let (base, multiplier) = parse_cf_time_units(units)?;
    let millis = (value * multiplier * 1000.0).round();
    if !millis.is_finite() || millis.abs() > i64::MAX as f64 {
        return None;
    }
    let shifted = base.checked_add_signed(Duration::milliseconds(millis as i64))?;
    Some(Utc.from_utc_datetime(&shifted))
}

/// Reads a string attribute from a variable, if present.
fn attr_string(var: &netcdf::Variable, name: &str) -> Option<String> {
    var.attribute(name)
        .and_then(|a| a.value().ok())
        .and_then(|v| match v {
            netcdf::AttributeValue::Str(s) => Some(s),
            _ => None,
        })
}

/// Interprets a numeric attribute value as f64, if it is a scalar.
pub(crate) fn attr_as_f64(value: &netcdf::AttributeValue) -> Option<f64> {
    use netcdf::AttributeValue::*;
    match value {
        Double(v) => Some(*v),
        Float(v) => Some(*v as f64),
        Int(v) => Some(*v as f64),
        Uint(v) => Some(*v as f64),
        Short(v) => Some(*v as f64),
        Ushort(v) => Some(*v as f64),
        Longlong(v) => Some(*v as f64),
        Ulonglong(v) => Some(*v as f64),
        Schar(v) => Some(*v as f64),
        Uchar(v) => Some(*v as f64),
        Doubles(v) if v.len() == 1 => Some(v[0]),
        Floats(v) if v.len() == 1 => Some(v[0] as f64),
        _ => None,
    }
}
