//! # NetCDF File Information Module
//!
//! This module provides functionality to extract and display information about NetCDF files,
//! including dimensions, variables, attributes, and metadata.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::extract::decode_cf_time;

/// Information about a NetCDF dimension
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetCdfDimensionInfo {
    pub name: String,
    pub length: usize,
    pub is_unlimited: bool,
}

/// Information about a NetCDF variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetCdfVariableInfo {
    pub name: String,
    pub data_type: String,
    pub dimensions: Vec<String>,
    pub attributes: HashMap<String, String>,
    pub shape: Vec<usize>,
}

/// Complete information about a NetCDF file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetCdfInfo {
    pub path: String,
    pub dimensions: Vec<NetCdfDimensionInfo>,
    pub variables: Vec<NetCdfVariableInfo>,
    pub global_attributes: HashMap<String, String>,
    pub file_size: Option<u64>,
    pub total_variables: usize,
    pub total_dimensions: usize,
    /// First and last decoded timestamps of the time axis, when present.
    pub time_coverage: Option<(String, String)>,
}

/// Extract comprehensive information from a NetCDF file.
///
/// When `variable` is given, only that variable's entry is included. Global
/// attributes are collected only in `detailed` mode, matching the CLI's
/// `--detailed` flag.
pub fn read_netcdf_info(
    file_path: &Path,
    variable: Option<&str>,
    detailed: bool,
) -> Result<NetCdfInfo> {
    debug!("opening NetCDF file: {}", file_path.display());
    let file = netcdf::open(file_path)
        .with_context(|| format!("failed to open NetCDF file: {}", file_path.display()))?;

    let file_size = std::fs::metadata(file_path).ok().map(|m| m.len());

    let mut dimensions = Vec::new();
    for dim in file.dimensions() {
        dimensions.push(NetCdfDimensionInfo {
            name: dim.name().to_string(),
            length: dim.len(),
            is_unlimited: dim.is_unlimited(),
        });
    }

    let mut variables = Vec::new();
    let mut time_coverage = None;
    for var in file.variables() {
        if time_coverage.is_none() {
            time_coverage = detect_time_coverage(&var);
        }

        // Skip if specific variable requested and this isn't it
        if let Some(var_name) = variable
            && var.name() != var_name
        {
            continue;
        }

        let mut attributes = HashMap::new();
        for attr in var.attributes() {
            if let Ok(value) = attr.value() {
                attributes.insert(attr.name().to_string(), format_attribute_value(&value));
            }
        }

        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

        variables.push(NetCdfVariableInfo {
            name: var.name().to_string(),
            data_type: format_variable_type(&var.vartype()),
            dimensions: var
                .dimensions()
                .iter()
                .map(|d| d.name().to_string())
                .collect(),
            attributes,
            shape,
        });
    }

    let mut global_attributes = HashMap::new();
    if detailed {
        for attr in file.attributes() {
            if let Ok(value) = attr.value() {
                global_attributes.insert(attr.name().to_string(), format_attribute_value(&value));
            }
        }
    }

    Ok(NetCdfInfo {
        path: file_path.display().to_string(),
        total_dimensions: dimensions.len(),
        total_variables: variables.len(),
        dimensions,
        variables,
        global_attributes,
        file_size,
        time_coverage,
    })
}

/// Decodes the first and last values of a time coordinate variable, when the
/// variable looks like a CF time axis.
fn detect_time_coverage(var: &netcdf::Variable) -> Option<(String, String)> {
    let is_time = var.name() == "time"
        || var
            .attribute("standard_name")
            .and_then(|a| a.value().ok())
            .is_some_and(|v| matches!(v, netcdf::AttributeValue::Str(s) if s == "time"));
    if !is_time || var.dimensions().len() != 1 {
        return None;
    }
    let len = var.dimensions()[0].len();
    if len == 0 {
        return None;
    }
    let units = match var.attribute("units").and_then(|a| a.value().ok()) {
        Some(netcdf::AttributeValue::Str(s)) => s,
        _ => return None,
    };
    let first = var.get::<f64, _>(0).ok()?;
    let last = var.get::<f64, _>(len - 1).ok()?;
    let start = decode_cf_time(first[[]], &units)?;
    let end = decode_cf_time(last[[]], &units)?;
    Some((start.to_rfc3339(), end.to_rfc3339()))
}

/// Format a netcdf attribute value for display
fn format_attribute_value(value: &netcdf::AttributeValue) -> String {
    use netcdf::AttributeValue::*;
    match value {
        Str(s) => s.clone(),
        Strs(v) => v.join(", "),
        Double(v) => v.to_string(),
        Float(v) => v.to_string(),
        Int(v) => v.to_string(),
        Uint(v) => v.to_string(),
        Short(v) => v.to_string(),
        Ushort(v) => v.to_string(),
        Longlong(v) => v.to_string(),
        Ulonglong(v) => v.to_string(),
        Schar(v) => v.to_string(),
        Uchar(v) => v.to_string(),
        Doubles(v) => join_numbers(v),
        Floats(v) => join_numbers(v),
        Ints(v) => join_numbers(v),
        other => format!("{:?}", other),
    }
}

fn join_numbers<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a netcdf variable type for display
fn format_variable_type(var_type: &netcdf::types::NcVariableType) -> String {
    format!("{:?}", var_type)
}

/// Print NetCDF info in human-readable format
pub fn print_file_info_human(info: &NetCdfInfo) {
    println!("NetCDF File Information:");
    println!("  Path: {}", info.path);
    if let Some(size) = info.file_size {
        println!("  File Size: {:.2} MB", size as f64 / 1_048_576.0);
    }
    println!("  Dimensions: {} total", info.total_dimensions);
    for dim in &info.dimensions {
        println!(
            "    {} ({}{})",
            dim.name,
            dim.length,
            if dim.is_unlimited { ", unlimited" } else { "" }
        );
    }
    println!("  Variables: {} total", info.total_variables);
    for var in &info.variables {
        println!(
            "    {} ({}) - dimensions: [{}]",
            var.name,
            var.data_type,
            var.dimensions.join(", ")
        );
        for (name, value) in &var.attributes {
            println!("      @{}: {}", name, value);
        }
    }
    if let Some((start, end)) = &info.time_coverage {
        println!("  Time Coverage: {} to {}", start, end);
    }
    if !info.global_attributes.is_empty() {
        println!("  Global Attributes:");
        for (name, value) in &info.global_attributes {
            println!("    @{}: {}", name, value);
        }
    }
}

/// Print NetCDF info in JSON format
pub fn print_file_info_json(info: &NetCdfInfo) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(info)?);
    Ok(())
}

/// Print NetCDF info in YAML format
pub fn print_file_info_yaml(info: &NetCdfInfo) -> Result<()> {
    let yaml = serde_yaml::to_string(info).context("failed to serialize NetCDF info to YAML")?;
    println!("{}", yaml);
    Ok(())
}

/// Print NetCDF info in CSV format (variables only)
pub fn print_file_info_csv(info: &NetCdfInfo) -> Result<()> {
    println!("variable_name,data_type,dimensions,shape,attributes_count");
    for var in &info.variables {
        println!(
            "{},{},\"{}\",\"{}\",{}",
            var.name,
            var.data_type,
            var.dimensions.join(";"),
            var.shape
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(";"),
            var.attributes.len()
        );
    }
    Ok(())
}
