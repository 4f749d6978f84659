//! Map projections and raster resampling.
//!
//! A [`GridSlice`] lives on a regular longitude/latitude grid. To draw it on
//! a projected map the slice is resampled onto a target raster: the grid
//! extent is projected to find the raster's bounding box, then every target
//! pixel centre is inverse-projected back to longitude/latitude and filled
//! from the nearest source cell. Pixels outside the grid extent stay missing.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{GridError, Result};
use crate::extract::GridSlice;

/// Web Mercator is undefined at the poles; clamp like the tiling standard.
const MERCATOR_MAX_LAT: f64 = 85.05113;

/// Supported map projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Equirectangular: projected coordinates are degrees themselves.
    #[default]
    PlateCarree,
    /// Spherical (Web) Mercator, latitude clamped to ±85.05113°.
    WebMercator,
}

impl Projection {
    /// Projects geographic coordinates (degrees) to projected coordinates.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Projection::PlateCarree => (lon, lat),
            Projection::WebMercator => {
                let lat = lat.clamp(-MERCATOR_MAX_LAT, MERCATOR_MAX_LAT);
                let x = lon.to_radians();
                let y = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
                (x, y)
            }
        }
    }

    /// Inverse of [`forward`](Self::forward), back to degrees.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Projection::PlateCarree => (x, y),
            Projection::WebMercator => {
                let lon = x.to_degrees();
                let lat = (2.0 * y.exp().atan() - PI / 2.0).to_degrees();
                (lon, lat)
            }
        }
    }

    /// Name used on the CLI and in configs.
    pub fn name(&self) -> &'static str {
        match self {
            Projection::PlateCarree => "plate_carree",
            Projection::WebMercator => "web_mercator",
        }
    }
}

/// A grid slice resampled onto a projected raster.
///
/// `values` is top-down row-major (`values[y * width + x]`), NaN = missing,
/// ready for [`crate::render::render_projected`].
#[derive(Debug, Clone)]
pub struct ProjectedRaster {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Projection the raster is in.
    pub projection: Projection,
    /// Projected bounding box as (x_min, y_min, x_max, y_max).
    pub bbox: (f64, f64, f64, f64),
    /// Pixel values, top-down row-major, NaN for missing.
    pub values: Vec<f64>,
}

/// Resamples a grid slice onto a `width` x `height` raster in `projection`.
///
/// Nearest-neighbour lookup: each target pixel centre is inverse-projected
/// and assigned the value of the closest source cell, provided the centre
/// falls within half a cell spacing of the grid extent.
pub fn resample(
    slice: &GridSlice,
    projection: Projection,
    width: u32,
    height: u32,
) -> Result<ProjectedRaster> {
    if width == 0 || height == 0 {
        return Err(GridError::InvalidRasterSize { width, height });
    }
    if slice.nlon() == 0 || slice.nlat() == 0 {
        return Err(GridError::EmptyGrid(slice.variable.clone()));
    }

    let (lon_min, lat_min, lon_max, lat_max) = slice.bounds();
    let (x_min, y_min) = projection.forward(lon_min, lat_min);
    let (x_max, y_max) = projection.forward(lon_max, lat_max);

    let lon_tol = half_spacing(&slice.lons);
    let lat_tol = half_spacing(&slice.lats);

    let mut values = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        // Raster row 0 is the top of the map (largest projected y).
        let py = y_max - (y as f64 + 0.5) / height as f64 * (y_max - y_min);
        for x in 0..width {
            let px = x_min + (x as f64 + 0.5) / width as f64 * (x_max - x_min);
            let (lon, lat) = projection.inverse(px, py);

            let i_lon = nearest_index(&slice.lons, lon);
            let i_lat = nearest_index(&slice.lats, lat);
            let inside = (slice.lons[i_lon] - lon).abs() <= lon_tol
                && (slice.lats[i_lat] - lat).abs() <= lat_tol;
            values.push(if inside {
                slice.value_at(i_lat, i_lon)
            } else {
                f64::NAN
            });
        }
    }

    Ok(ProjectedRaster {
        width,
        height,
        projection,
        bbox: (x_min, y_min, x_max, y_max),
        values,
    })
}

/// Index of the coordinate closest to `target`. Works for ascending or
/// descending coordinate vectors.
pub fn nearest_index(coords: &[f64], target: f64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, &c) in coords.iter().enumerate() {
        let dist = (c - target).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Half the typical spacing of a coordinate vector, used as the containment
/// tolerance at the grid edge. Falls back to a generous tolerance for
/// single-point axes.
fn half_spacing(coords: &[f64]) -> f64 {
    if coords.len() < 2 {
        return 180.0;
    }
    let span = (coords[coords.len() - 1] - coords[0]).abs();
    span / (coords.len() - 1) as f64 / 2.0 + 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plate_carree_is_identity() {
        let (x, y) = Projection::PlateCarree.forward(12.5, -33.0);
        assert_eq!((x, y), (12.5, -33.0));
    }

    #[test]
    fn mercator_round_trips() {
        let proj = Projection::WebMercator;
        for &(lon, lat) in &[(0.0, 0.0), (10.0, 47.5), (-122.3, -45.0), (179.0, 80.0)] {
            let (x, y) = proj.forward(lon, lat);
            let (lon2, lat2) = proj.inverse(x, y);
            assert!((lon - lon2).abs() < 1e-9, "lon {lon} -> {lon2}");
            assert!((lat - lat2).abs() < 1e-9, "lat {lat} -> {lat2}");
        }
    }

    #[test]
    fn mercator_clamps_poles() {
        let proj = Projection::WebMercator;
        let (_, y_pole) = proj.forward(0.0, 90.0);
        let (_, y_clamp) = proj.forward(0.0, MERCATOR_MAX_LAT);
        assert_eq!(y_pole, y_clamp);
        assert!(y_pole.is_finite());
    }

    #[test]
    fn nearest_index_handles_descending() {
        let desc = [60.0, 55.0, 50.0, 45.0];
        assert_eq!(nearest_index(&desc, 56.0), 1);
        assert_eq!(nearest_index(&desc, 44.0), 3);
        let asc = [-10.0, 0.0, 10.0];
        assert_eq!(nearest_index(&asc, -6.0), 0);
        assert_eq!(nearest_index(&asc, 6.0), 2);
    }
}
