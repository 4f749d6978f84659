//! Summary statistics over a grid slice, with optional unit conversion.
//!
//! Statistics skip missing (NaN) cells. Unit conversions are affine
//! (`converted = value * factor + offset`) and resolved from a fixed table of
//! supported pairs; an unknown pair is an error rather than a silent
//! identity.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::extract::GridSlice;

/// Summary statistics of the non-missing cells of a grid slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSummary {
    /// Number of non-missing cells.
    pub count: usize,
    /// Number of missing cells.
    pub missing: usize,
    /// Minimum value, NaN when no cells are present.
    pub min: f64,
    /// Maximum value, NaN when no cells are present.
    pub max: f64,
    /// Arithmetic mean, NaN when no cells are present.
    pub mean: f64,
    /// Sample standard deviation, NaN when fewer than two cells are present.
    pub std: f64,
}

/// Computes summary statistics over the non-missing cells of a slice.
pub fn summarize(slice: &GridSlice) -> GridSummary {
    let mut count = 0usize;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for &value in &slice.values {
        if !value.is_finite() {
            continue;
        }
        count += 1;
        sum += value;
        min = min.min(value);
        max = max.max(value);
    }
    let missing = slice.values.len() - count;
    if count == 0 {
        return GridSummary {
            count,
            missing,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            std: f64::NAN,
        };
    }

    let mean = sum / count as f64;
    let std = if count < 2 {
        f64::NAN
    } else {
        let ssq: f64 = slice
            .values
            .iter()
            .filter(|v| v.is_finite())
            .map(|v| (v - mean).powi(2))
            .sum();
        (ssq / (count - 1) as f64).sqrt()
    };

    GridSummary {
        count,
        missing,
        min,
        max,
        mean,
        std,
    }
}

/// A unit conversion request, as it appears in configs and on the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConversion {
    /// Source unit name (e.g. "hours").
    pub from: String,
    /// Target unit name (e.g. "minutes").
    pub to: String,
}

impl UnitConversion {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Resolves the request against the supported conversion table.
    pub fn to_converter(&self) -> Result<UnitConverter> {
        UnitConverter::between(&self.from, &self.to)
    }
}

/// A resolved affine unit conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConverter {
    factor: f64,
    offset: f64,
}

impl UnitConverter {
    /// Looks up the conversion between two unit names.
    ///
    /// Supported families: time (seconds, minutes, hours, days), temperature
    /// (kelvin, celsius, fahrenheit), fraction/percent, and mm/m. Unit names
    /// are matched case-insensitively with common abbreviations.
    pub fn between(from: &str, to: &str) -> Result<Self> {
        let unsupported = || GridError::UnsupportedConversion {
            from: from.to_string(),
            to: to.to_string(),
        };

        if let (Some(from_s), Some(to_s)) = (time_unit_seconds(from), time_unit_seconds(to)) {
            return Ok(Self {
                factor: from_s / to_s,
                offset: 0.0,
            });
        }

        if let (Some(from_t), Some(to_t)) = (temperature_unit(from), temperature_unit(to)) {
            // Affine composition through kelvin: k = v * a + b, out = (k - d) / c
            let (a, b) = from_t;
            let (c, d) = to_t;
            return Ok(Self {
                factor: a / c,
                offset: (b - d) / c,
            });
        }

        let scale = match (normalize(from).as_str(), normalize(to).as_str()) {
            ("fraction", "percent") | ("1", "percent") => Some(100.0),
            ("percent", "fraction") | ("percent", "1") => Some(0.01),
            ("mm", "m") => Some(0.001),
            ("m", "mm") => Some(1000.0),
            _ => None,
        };
        match scale {
            Some(factor) => Ok(Self {
                factor,
                offset: 0.0,
            }),
            None => Err(unsupported()),
        }
    }

    /// Converts a single value. NaN passes through unchanged.
    pub fn apply(&self, value: f64) -> f64 {
        value * self.factor + self.offset
    }

    /// Converts a summary: min/max/mean are affine-converted, std scales by
    /// the magnitude of the factor, counts are unchanged.
    pub fn convert_summary(&self, summary: &GridSummary) -> GridSummary {
        let (min, max) = if self.factor < 0.0 {
            (self.apply(summary.max), self.apply(summary.min))
        } else {
            (self.apply(summary.min), self.apply(summary.max))
        };
        GridSummary {
            count: summary.count,
            missing: summary.missing,
            min,
            max,
            mean: self.apply(summary.mean),
            std: summary.std * self.factor.abs(),
        }
    }
}

fn normalize(unit: &str) -> String {
    unit.trim().to_lowercase()
}

/// Seconds per one unit of a time unit name, or None if not a time unit.
fn time_unit_seconds(unit: &str) -> Option<f64> {
    match normalize(unit).as_str() {
        "seconds" | "second" | "secs" | "sec" | "s" => Some(1.0),
        "minutes" | "minute" | "mins" | "min" => Some(60.0),
        "hours" | "hour" | "hrs" | "hr" | "h" => Some(3600.0),
        "days" | "day" | "d" => Some(86400.0),
        _ => None,
    }
}

/// Affine map from a temperature unit to kelvin: `k = v * a + b`.
fn temperature_unit(unit: &str) -> Option<(f64, f64)> {
    match normalize(unit).as_str() {
        "kelvin" | "k" => Some((1.0, 0.0)),
        "celsius" | "c" | "degc" | "deg_c" => Some((1.0, 273.15)),
        "fahrenheit" | "f" | "degf" | "deg_f" => Some((5.0 / 9.0, 273.15 - 32.0 * 5.0 / 9.0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_to_minutes_is_sixty() {
        let conv = UnitConverter::between("hours", "minutes").unwrap();
        assert_eq!(conv.apply(1.5), 90.0);
    }

    #[test]
    fn kelvin_to_celsius_offsets() {
        let conv = UnitConverter::between("K", "C").unwrap();
        assert!((conv.apply(273.15) - 0.0).abs() < 1e-9);
        assert!((conv.apply(300.0) - 26.85).abs() < 1e-9);
    }

    #[test]
    fn celsius_to_fahrenheit_round_trips() {
        let there = UnitConverter::between("celsius", "fahrenheit").unwrap();
        let back = UnitConverter::between("fahrenheit", "celsius").unwrap();
        assert!((there.apply(100.0) - 212.0).abs() < 1e-9);
        assert!((back.apply(there.apply(37.5)) - 37.5).abs() < 1e-9);
    }

    #[test]
    fn percent_conversions() {
        let conv = UnitConverter::between("fraction", "percent").unwrap();
        assert_eq!(conv.apply(0.42), 42.0);
    }

    #[test]
    fn unknown_pair_is_rejected() {
        let err = UnitConverter::between("hours", "kelvin").unwrap_err();
        assert!(err.to_string().contains("unsupported unit conversion"));
    }
}
