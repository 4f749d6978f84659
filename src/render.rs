//! PNG rendering of grid slices and projected rasters.
//!
//! Rendering goes through a single colorization path: a top-down, row-major
//! buffer of f64 values (NaN = missing) is mapped through a colormap into an
//! RGBA image, missing cells fully transparent.

use image::{Rgba, RgbaImage};
use log::debug;

use crate::colormaps::Colormap;
use crate::error::{GridError, Result};
use crate::extract::GridSlice;
use crate::project::ProjectedRaster;

/// Options controlling rasterization.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Colormap to map values through.
    pub colormap: Colormap,
    /// Lower bound of the color scale; data minimum when None.
    pub vmin: Option<f64>,
    /// Upper bound of the color scale; data maximum when None.
    pub vmax: Option<f64>,
    /// Integer pixel-replication factor for native-resolution plots.
    pub scale: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            colormap: Colormap::default(),
            vmin: None,
            vmax: None,
            scale: 1,
        }
    }
}

/// Renders a grid slice at native resolution, one pixel block per cell.
///
/// The image is north up: the top pixel row is the northernmost latitude
/// regardless of how latitudes are ordered in the file. Missing cells are
/// transparent.
pub fn render_grid(slice: &GridSlice, options: &RenderOptions) -> Result<RgbaImage> {
    let (nlon, nlat) = (slice.nlon(), slice.nlat());
    if nlon == 0 || nlat == 0 {
        return Err(GridError::EmptyGrid(slice.variable.clone()));
    }
    if options.scale == 0 {
        return Err(GridError::InvalidRasterSize {
            width: 0,
            height: 0,
        });
    }

    // Reorder into a top-down buffer, flipping rows when latitudes ascend.
    let mut buffer = Vec::with_capacity(nlat * nlon);
    let flip = slice.lat_ascending();
    for row in 0..nlat {
        let i_lat = if flip { nlat - 1 - row } else { row };
        for i_lon in 0..nlon {
            buffer.push(slice.value_at(i_lat, i_lon));
        }
    }

    let image = colorize(&buffer, nlon as u32, nlat as u32, options)?;
    Ok(upscale(image, options.scale))
}

/// Renders a projected raster produced by [`crate::project::resample`].
pub fn render_projected(raster: &ProjectedRaster, options: &RenderOptions) -> Result<RgbaImage> {
    colorize(&raster.values, raster.width, raster.height, options)
}

/// Maps a top-down value buffer through the colormap into an RGBA image.
fn colorize(values: &[f64], width: u32, height: u32, options: &RenderOptions) -> Result<RgbaImage> {
    if width == 0 || height == 0 || values.len() != (width * height) as usize {
        return Err(GridError::InvalidRasterSize { width, height });
    }

    let (vmin, vmax) = value_range(values, options);
    debug!(
        "colorizing {}x{} raster with {} over [{}, {}]",
        width,
        height,
        options.colormap.name(),
        vmin,
        vmax
    );

    let span = vmax - vmin;
    let mut image = RgbaImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let value = values[(y * width + x) as usize];
            let pixel = if !value.is_finite() {
                Rgba([0, 0, 0, 0])
            } else {
                let t = if span > 0.0 { (value - vmin) / span } else { 0.5 };
                let [r, g, b] = options.colormap.sample(t);
                Rgba([r, g, b, 255])
            };
            image.put_pixel(x, y, pixel);
        }
    }
    Ok(image)
}

/// Color-scale bounds: explicit options win, otherwise the finite data range.
fn value_range(values: &[f64], options: &RenderOptions) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min > max {
        // All cells missing; any bounds work, everything stays transparent.
        (0.0, 1.0)
    } else {
        (options.vmin.unwrap_or(min), options.vmax.unwrap_or(max))
    }
}

/// Replicates each pixel into a `scale` x `scale` block.
fn upscale(image: RgbaImage, scale: u32) -> RgbaImage {
    if scale <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    let mut scaled = RgbaImage::new(w * scale, h * scale);
    for y in 0..h {
        for x in 0..w {
            let pixel = *image.get_pixel(x, y);
            for dy in 0..scale {
                for dx in 0..scale {
                    scaled.put_pixel(x * scale + dx, y * scale + dy, pixel);
                }
            }
        }
    }
    scaled
}
