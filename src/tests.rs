use std::path::Path;

use tempfile::tempdir;

use crate::error::GridError;
use crate::extract::{GridSlice, decode_cf_time, extract_grid_slice, parse_cf_time_units};

/// Builds the canonical fixture: a monthly sunshine-duration grid with
/// dimensions (time=1, latitude=4, longitude=5), one fill-value cell, and
/// cell values `10 * i_lat + i_lon` for easy hand-checking.
fn create_sunshine_fixture(path: &Path) {
    let mut file = netcdf::create(path).unwrap();
    file.add_attribute("title", "Monthly sunshine duration").unwrap();
    file.add_attribute("source", "nc2plot test suite").unwrap();

    file.add_dimension("time", 1).unwrap();
    file.add_dimension("latitude", 4).unwrap();
    file.add_dimension("longitude", 5).unwrap();

    {
        let mut time_var = file.add_variable::<f64>("time", &["time"]).unwrap();
        time_var
            .put_attribute("units", "days since 2020-01-01")
            .unwrap();
        time_var.put_values(&[15.0], ..).unwrap();
    }
    {
        let mut lat_var = file.add_variable::<f64>("latitude", &["latitude"]).unwrap();
        lat_var.put_attribute("units", "degrees_north").unwrap();
        lat_var.put_values(&[47.0, 48.0, 49.0, 50.0], ..).unwrap();
    }
    {
        let mut lon_var = file
            .add_variable::<f64>("longitude", &["longitude"])
            .unwrap();
        lon_var.put_attribute("units", "degrees_east").unwrap();
        lon_var
            .put_values(&[5.0, 6.0, 7.0, 8.0, 9.0], ..)
            .unwrap();
    }
    {
        let mut sdu_var = file
            .add_variable::<f64>("sdu", &["time", "latitude", "longitude"])
            .unwrap();
        sdu_var.put_attribute("units", "hours").unwrap();
        sdu_var
            .put_attribute("long_name", "sunshine duration")
            .unwrap();
        sdu_var.put_attribute("_FillValue", -999.0f64).unwrap();

        let mut data = Vec::with_capacity(20);
        for i_lat in 0..4 {
            for i_lon in 0..5 {
                data.push((10 * i_lat + i_lon) as f64);
            }
        }
        data[0] = -999.0; // cell (0, 0) is missing
        sdu_var.put_values(&data, (.., .., ..)).unwrap();
    }
    {
        // Same field, stored packed: extracted = raw * 0.5 + 10.0
        let mut packed_var = file
            .add_variable::<f64>("sdu_packed", &["time", "latitude", "longitude"])
            .unwrap();
        packed_var.put_attribute("scale_factor", 0.5f64).unwrap();
        packed_var.put_attribute("add_offset", 10.0f64).unwrap();
        let data: Vec<f64> = (0..20).map(|i| i as f64).collect();
        packed_var.put_values(&data, (.., .., ..)).unwrap();
    }
}

/// Builds a 2D fixture with no time axis, dimension order (longitude,
/// latitude), and descending latitudes, to exercise axis-order handling.
fn create_transposed_fixture(path: &Path) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("latitude", 3).unwrap();
    file.add_dimension("longitude", 2).unwrap();

    {
        let mut lat_var = file.add_variable::<f64>("latitude", &["latitude"]).unwrap();
        lat_var.put_attribute("units", "degrees_north").unwrap();
        lat_var.put_values(&[50.0, 49.0, 48.0], ..).unwrap();
    }
    {
        let mut lon_var = file
            .add_variable::<f64>("longitude", &["longitude"])
            .unwrap();
        lon_var.put_attribute("units", "degrees_east").unwrap();
        lon_var.put_values(&[10.0, 11.0], ..).unwrap();
    }
    {
        let mut var = file
            .add_variable::<f64>("field", &["longitude", "latitude"])
            .unwrap();
        var.put_attribute("units", "K").unwrap();
        // Row-major over (longitude, latitude): value = 100 * i_lon + i_lat
        let mut data = Vec::with_capacity(6);
        for i_lon in 0..2 {
            for i_lat in 0..3 {
                data.push((100 * i_lon + i_lat) as f64);
            }
        }
        var.put_values(&data, (.., ..)).unwrap();
    }
}

#[cfg(test)]
mod extract_tests {
    use super::*;

    #[test]
    fn test_extract_basic_slice() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);

        let file = netcdf::open(&path).unwrap();
        let slice = extract_grid_slice(&file, "sdu", 0).unwrap();

        assert_eq!(slice.variable, "sdu");
        assert_eq!(slice.nlat(), 4);
        assert_eq!(slice.nlon(), 5);
        assert_eq!(slice.values.len(), 20);
        assert_eq!(slice.lats, vec![47.0, 48.0, 49.0, 50.0]);
        assert_eq!(slice.lons, vec![5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(slice.units.as_deref(), Some("hours"));
        assert_eq!(slice.long_name.as_deref(), Some("sunshine duration"));
        assert!(slice.lat_ascending());
        assert_eq!(slice.bounds(), (5.0, 47.0, 9.0, 50.0));
    }

    #[test]
    fn test_fill_value_becomes_nan() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);

        let file = netcdf::open(&path).unwrap();
        let slice = extract_grid_slice(&file, "sdu", 0).unwrap();

        assert!(slice.is_missing(0, 0));
        for i_lat in 0..4 {
            for i_lon in 0..5 {
                if (i_lat, i_lon) == (0, 0) {
                    continue;
                }
                assert_eq!(slice.value_at(i_lat, i_lon), (10 * i_lat + i_lon) as f64);
            }
        }
    }

    #[test]
    fn test_packing_is_applied() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);

        let file = netcdf::open(&path).unwrap();
        let slice = extract_grid_slice(&file, "sdu_packed", 0).unwrap();

        // raw cell (1, 2) is 1*5 + 2 = 7; extracted = 7 * 0.5 + 10
        assert_eq!(slice.value_at(1, 2), 13.5);
        assert_eq!(slice.value_at(0, 0), 10.0);
    }

    #[test]
    fn test_time_coordinate_decoded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);

        let file = netcdf::open(&path).unwrap();
        let slice = extract_grid_slice(&file, "sdu", 0).unwrap();

        assert_eq!(slice.time_value, Some(15.0));
        assert_eq!(slice.time_units.as_deref(), Some("days since 2020-01-01"));
        let stamp = slice.timestamp.unwrap();
        assert_eq!(stamp.to_rfc3339(), "2020-01-16T00:00:00+00:00");
    }

    #[test]
    fn test_axis_order_does_not_matter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transposed.nc");
        create_transposed_fixture(&path);

        let file = netcdf::open(&path).unwrap();
        let slice = extract_grid_slice(&file, "field", 0).unwrap();

        assert_eq!(slice.nlat(), 3);
        assert_eq!(slice.nlon(), 2);
        assert!(!slice.lat_ascending());
        assert!(slice.timestamp.is_none());
        assert!(slice.time_value.is_none());
        // The slice is latitude-major even though the file is longitude-major.
        for i_lat in 0..3 {
            for i_lon in 0..2 {
                assert_eq!(slice.value_at(i_lat, i_lon), (100 * i_lon + i_lat) as f64);
            }
        }
    }

    #[test]
    fn test_unknown_variable_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);

        let file = netcdf::open(&path).unwrap();
        let err = extract_grid_slice(&file, "nope", 0).unwrap_err();
        assert!(matches!(err, GridError::VariableNotFound(name) if name == "nope"));
    }

    #[test]
    fn test_time_index_out_of_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);

        let file = netcdf::open(&path).unwrap();
        let err = extract_grid_slice(&file, "sdu", 1).unwrap_err();
        assert!(matches!(
            err,
            GridError::TimeIndexOutOfRange { index: 1, len: 1 }
        ));
    }

    #[test]
    fn test_coordinate_variable_is_not_a_grid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);

        let file = netcdf::open(&path).unwrap();
        let err = extract_grid_slice(&file, "latitude", 0).unwrap_err();
        assert!(matches!(err, GridError::UnsupportedRank { ndims: 1, .. }));
    }
}

#[cfg(test)]
mod cf_time_tests {
    use super::*;

    #[test]
    fn test_parse_cf_time_units_variants() {
        let (base, mult) = parse_cf_time_units("days since 2020-01-01").unwrap();
        assert_eq!(mult, 86400.0);
        assert_eq!(base.to_string(), "2020-01-01 00:00:00");

        let (base, mult) = parse_cf_time_units("hours since 1900-01-01 00:00:00").unwrap();
        assert_eq!(mult, 3600.0);
        assert_eq!(base.to_string(), "1900-01-01 00:00:00");

        let (_, mult) = parse_cf_time_units("seconds since 1970-01-01T00:00:00").unwrap();
        assert_eq!(mult, 1.0);

        assert!(parse_cf_time_units("hours").is_none());
        assert!(parse_cf_time_units("fortnights since 2020-01-01").is_none());
        assert!(parse_cf_time_units("hours since someday").is_none());
    }

    #[test]
    fn test_decode_cf_time() {
        let stamp = decode_cf_time(31.0, "days since 2020-01-01").unwrap();
        assert_eq!(stamp.to_rfc3339(), "2020-02-01T00:00:00+00:00");

        let stamp = decode_cf_time(1.5, "hours since 2020-01-01 12:00:00").unwrap();
        assert_eq!(stamp.to_rfc3339(), "2020-01-01T13:30:00+00:00");
    }
}

#[cfg(test)]
mod stats_tests {
    use super::*;
    use crate::stats::{UnitConverter, summarize};

    fn fixture_slice() -> GridSlice {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);
        let file = netcdf::open(&path).unwrap();
        extract_grid_slice(&file, "sdu", 0).unwrap()
    }

    #[test]
    fn test_summarize_skips_missing() {
        let summary = summarize(&fixture_slice());
        assert_eq!(summary.count, 19);
        assert_eq!(summary.missing, 1);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 34.0);
        // Sum of 10 * i_lat + i_lon over the grid is 340; cell (0, 0) = 0 is
        // missing, so the mean is still 340 / 19.
        assert!((summary.mean - 340.0 / 19.0).abs() < 1e-12);
        assert!(summary.std > 0.0);
    }

    #[test]
    fn test_summarize_all_missing() {
        let slice = GridSlice {
            variable: "empty".to_string(),
            units: None,
            long_name: None,
            lons: vec![0.0, 1.0],
            lats: vec![0.0],
            time_value: None,
            time_units: None,
            timestamp: None,
            values: vec![f64::NAN, f64::NAN],
        };
        let summary = summarize(&slice);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.missing, 2);
        assert!(summary.mean.is_nan());
        assert!(summary.min.is_nan());
    }

    #[test]
    fn test_summary_unit_conversion() {
        let summary = summarize(&fixture_slice());
        let converter = UnitConverter::between("hours", "minutes").unwrap();
        let converted = converter.convert_summary(&summary);
        assert_eq!(converted.count, 19);
        assert_eq!(converted.min, 60.0);
        assert_eq!(converted.max, 34.0 * 60.0);
        assert!((converted.mean - summary.mean * 60.0).abs() < 1e-9);
        assert!((converted.std - summary.std * 60.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod tidy_tests {
    use super::*;
    use crate::tidy::grid_to_dataframe;

    fn fixture_slice() -> GridSlice {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);
        let file = netcdf::open(&path).unwrap();
        extract_grid_slice(&file, "sdu", 0).unwrap()
    }

    #[test]
    fn test_missing_rows_dropped_by_default() {
        let df = grid_to_dataframe(&fixture_slice(), false).unwrap();
        assert_eq!(df.height(), 19);

        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(column_names, vec!["longitude", "latitude", "time", "sdu"]);
    }

    #[test]
    fn test_keep_missing_emits_nulls() {
        let df = grid_to_dataframe(&fixture_slice(), true).unwrap();
        assert_eq!(df.height(), 20);
        assert_eq!(df.column("sdu").unwrap().null_count(), 1);
    }

    #[test]
    fn test_row_coordinate_correspondence() {
        let df = grid_to_dataframe(&fixture_slice(), false).unwrap();

        // The first surviving row is cell (0, 1): lon 6.0, lat 47.0, value 1.
        let lons = df.column("longitude").unwrap().f64().unwrap();
        let lats = df.column("latitude").unwrap().f64().unwrap();
        let values = df.column("sdu").unwrap().f64().unwrap();
        assert_eq!(lons.get(0), Some(6.0));
        assert_eq!(lats.get(0), Some(47.0));
        assert_eq!(values.get(0), Some(1.0));

        // The last row is cell (3, 4): lon 9.0, lat 50.0, value 34.
        assert_eq!(lons.get(18), Some(9.0));
        assert_eq!(lats.get(18), Some(50.0));
        assert_eq!(values.get(18), Some(34.0));
    }

    #[test]
    fn test_time_column_holds_decoded_timestamp() {
        let df = grid_to_dataframe(&fixture_slice(), false).unwrap();
        let time = df.column("time").unwrap().str().unwrap();
        assert_eq!(time.get(0), Some("2020-01-16T00:00:00+00:00"));
    }

    #[test]
    fn test_no_time_column_without_time_axis() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("transposed.nc");
        create_transposed_fixture(&path);
        let file = netcdf::open(&path).unwrap();
        let slice = extract_grid_slice(&file, "field", 0).unwrap();

        let df = grid_to_dataframe(&slice, false).unwrap();
        assert_eq!(df.height(), 6);
        let column_names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(column_names, vec!["longitude", "latitude", "field"]);
    }
}

#[cfg(test)]
mod output_tests {
    use super::*;
    use crate::output::write_dataframe;
    use crate::tidy::grid_to_dataframe;

    fn fixture_df() -> polars::prelude::DataFrame {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);
        let file = netcdf::open(&path).unwrap();
        let slice = extract_grid_slice(&file, "sdu", 0).unwrap();
        grid_to_dataframe(&slice, false).unwrap()
    }

    #[test]
    fn test_write_parquet_and_csv() {
        let df = fixture_df();
        let dir = tempdir().unwrap();

        let parquet_path = dir.path().join("out.parquet");
        write_dataframe(&df, &parquet_path).unwrap();
        assert!(parquet_path.exists());
        assert!(std::fs::metadata(&parquet_path).unwrap().len() > 0);

        let csv_path = dir.path().join("out.csv");
        write_dataframe(&df, &csv_path).unwrap();
        let content = std::fs::read_to_string(&csv_path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("longitude,latitude,time,sdu"));
        assert_eq!(lines.clone().count(), 19);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let df = fixture_df();
        let dir = tempdir().unwrap();
        let err = write_dataframe(&df, &dir.path().join("out.xlsx")).unwrap_err();
        assert!(err.to_string().contains("unsupported table format"));
    }
}

#[cfg(test)]
mod info_tests {
    use super::*;
    use crate::info::read_netcdf_info;

    #[test]
    fn test_read_netcdf_info() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);

        let info = read_netcdf_info(&path, None, true).unwrap();
        assert_eq!(info.total_dimensions, 3);
        assert_eq!(info.total_variables, 5);
        assert!(info.file_size.is_some());
        assert_eq!(info.global_attributes.len(), 2);

        let sdu = info.variables.iter().find(|v| v.name == "sdu").unwrap();
        assert_eq!(sdu.dimensions, vec!["time", "latitude", "longitude"]);
        assert_eq!(sdu.shape, vec![1, 4, 5]);
        assert_eq!(sdu.attributes.get("units").map(String::as_str), Some("hours"));

        let (start, end) = info.time_coverage.clone().unwrap();
        assert_eq!(start, "2020-01-16T00:00:00+00:00");
        assert_eq!(start, end);
    }

    #[test]
    fn test_variable_filter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);

        let info = read_netcdf_info(&path, Some("sdu"), false).unwrap();
        assert_eq!(info.variables.len(), 1);
        assert_eq!(info.variables[0].name, "sdu");
        // Global attributes only collected in detailed mode
        assert!(info.global_attributes.is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = read_netcdf_info(Path::new("/definitely/not/here.nc"), None, false);
        assert!(result.is_err());
    }
}

#[cfg(test)]
mod render_tests {
    use super::*;
    use crate::colormaps::Colormap;
    use crate::render::{RenderOptions, render_grid};

    fn fixture_slice() -> GridSlice {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);
        let file = netcdf::open(&path).unwrap();
        extract_grid_slice(&file, "sdu", 0).unwrap()
    }

    #[test]
    fn test_native_render_dimensions() {
        let slice = fixture_slice();
        let image = render_grid(&slice, &RenderOptions::default()).unwrap();
        assert_eq!(image.dimensions(), (5, 4));

        let scaled = render_grid(
            &slice,
            &RenderOptions {
                scale: 3,
                ..RenderOptions::default()
            },
        )
        .unwrap();
        assert_eq!(scaled.dimensions(), (15, 12));
    }

    #[test]
    fn test_missing_cell_is_transparent_and_north_is_up() {
        let slice = fixture_slice();
        let image = render_grid(&slice, &RenderOptions::default()).unwrap();

        // Latitudes ascend in the file, so cell (i_lat=0, i_lon=0) - the
        // missing one - lands on the bottom pixel row.
        assert_eq!(image.get_pixel(0, 3).0[3], 0);
        // Everything else is opaque.
        assert_eq!(image.get_pixel(1, 3).0[3], 255);
        assert_eq!(image.get_pixel(0, 0).0[3], 255);
    }

    #[test]
    fn test_explicit_bounds_pin_endpoint_colors() {
        let slice = fixture_slice();
        let options = RenderOptions {
            colormap: Colormap::Viridis,
            vmin: Some(0.0),
            vmax: Some(34.0),
            scale: 1,
        };
        let image = render_grid(&slice, &options).unwrap();

        // Cell (3, 4) holds the maximum (34), drawn top-right, and must get
        // the top anchor color of viridis.
        let [r, g, b, a] = image.get_pixel(4, 0).0;
        assert_eq!((r, g, b, a), (253, 231, 37, 255));
    }

    #[test]
    fn test_constant_field_renders_mid_color() {
        let slice = GridSlice {
            variable: "flat".to_string(),
            units: None,
            long_name: None,
            lons: vec![0.0, 1.0],
            lats: vec![0.0, 1.0],
            time_value: None,
            time_units: None,
            timestamp: None,
            values: vec![7.0; 4],
        };
        let image = render_grid(&slice, &RenderOptions::default()).unwrap();
        let expected = Colormap::Viridis.sample(0.5);
        assert_eq!(&image.get_pixel(0, 0).0[..3], &expected);
    }
}

#[cfg(test)]
mod project_tests {
    use super::*;
    use crate::project::{Projection, resample};

    fn fixture_slice() -> GridSlice {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);
        let file = netcdf::open(&path).unwrap();
        extract_grid_slice(&file, "sdu", 0).unwrap()
    }

    #[test]
    fn test_plate_carree_resample_picks_nearest() {
        let slice = fixture_slice();
        let raster = resample(&slice, Projection::PlateCarree, 5, 4).unwrap();
        assert_eq!(raster.values.len(), 20);
        assert_eq!(raster.bbox, (5.0, 47.0, 9.0, 50.0));

        // Pixel (1, 3) centre is lon 6.2, lat 46.5 -> nearest cell (0, 1).
        assert_eq!(raster.values[3 * 5 + 1], 1.0);
        // Pixel (0, 3) maps to the missing cell (0, 0).
        assert!(raster.values[3 * 5].is_nan());
    }

    #[test]
    fn test_web_mercator_resample_covers_grid() {
        let slice = fixture_slice();
        let raster = resample(&slice, Projection::WebMercator, 10, 8).unwrap();
        assert_eq!((raster.width, raster.height), (10, 8));
        // The grid sits well inside Mercator's valid range, so most pixels
        // should resolve to real cells.
        let valid = raster.values.iter().filter(|v| v.is_finite()).count();
        assert!(valid > 60, "only {valid} of 80 pixels resolved");
    }

    #[test]
    fn test_zero_size_raster_rejected() {
        let slice = fixture_slice();
        let err = resample(&slice, Projection::PlateCarree, 0, 10).unwrap_err();
        assert!(matches!(err, GridError::InvalidRasterSize { .. }));
    }
}

#[cfg(test)]
mod input_tests {
    use super::*;
    use crate::input::JobConfig;

    #[test]
    fn test_job_config_from_json() {
        let json = r#"
        {
            "nc_path": "sunshine.nc",
            "variable": "sdu",
            "stats": { "convert": { "from": "hours", "to": "minutes" } },
            "plot": { "path": "sdu.png", "colormap": "magma" },
            "tidy": { "path": "sdu.parquet" }
        }"#;

        let config = JobConfig::from_json(json).unwrap();
        assert_eq!(config.variable, "sdu");
        assert_eq!(config.time_index, 0);
        let plot = config.plot.as_ref().unwrap();
        assert_eq!(plot.colormap, crate::colormaps::Colormap::Magma);
        assert_eq!(plot.scale, 1);
        assert!(plot.projection.is_none());
        assert!(!config.tidy.as_ref().unwrap().keep_missing);
        let convert = config.stats.unwrap().convert.unwrap();
        assert_eq!(convert.from, "hours");
    }

    #[test]
    fn test_validate_reports_problems() {
        let json = r#"
        {
            "nc_path": "/definitely/not/here.nc",
            "variable": "",
            "stats": { "convert": { "from": "hours", "to": "kelvin" } },
            "plot": { "path": "plot.gif" },
            "tidy": { "path": "out.xlsx" }
        }"#;
        let config = JobConfig::from_json(json).unwrap();
        let problems = config.validate();
        assert_eq!(problems.len(), 5);
    }

    #[test]
    fn test_valid_job_passes_validation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&path);

        let mut config = JobConfig::template_full();
        config.nc_path = path;
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_templates_round_trip_through_yaml() {
        for template in [JobConfig::template_basic(), JobConfig::template_full()] {
            let yaml = serde_yaml::to_string(&template).unwrap();
            let parsed: JobConfig = serde_yaml::from_str(&yaml).unwrap();
            assert_eq!(parsed.variable, template.variable);
            assert_eq!(parsed.plot.is_some(), template.plot.is_some());
            assert_eq!(parsed.tidy.is_some(), template.tidy.is_some());
        }
    }
}

#[cfg(test)]
mod job_tests {
    use super::*;
    use crate::input::JobConfig;
    use crate::process_grid_job;

    #[test]
    fn test_full_walkthrough_produces_all_outputs() {
        let dir = tempdir().unwrap();
        let nc_path = dir.path().join("sunshine.nc");
        create_sunshine_fixture(&nc_path);

        let mut config = JobConfig::template_full();
        config.nc_path = nc_path;
        config.plot.as_mut().unwrap().path = dir.path().join("sdu.png");
        config.tidy.as_mut().unwrap().path = dir.path().join("sdu.parquet");

        process_grid_job(&config).unwrap();

        assert!(dir.path().join("sdu.png").exists());
        assert!(dir.path().join("sdu.parquet").exists());
    }
}
