//! Colormap lookup tables for raster rendering.
//!
//! Each map is a small set of RGB anchors sampled from the matplotlib
//! reference palettes, interpolated linearly in between.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Available colormaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    /// Perceptually uniform, dark purple to yellow (matplotlib default).
    #[default]
    Viridis,
    /// Perceptually uniform, black to light yellow.
    Magma,
    /// Diverging blue-white-red, for anomaly fields.
    Coolwarm,
    /// Plain grayscale.
    Gray,
}

const VIRIDIS: &[[u8; 3]] = &[
    [68, 1, 84],
    [72, 40, 120],
    [62, 74, 137],
    [49, 104, 142],
    [38, 130, 142],
    [31, 158, 137],
    [53, 183, 121],
    [109, 205, 89],
    [180, 222, 44],
    [253, 231, 37],
];

const MAGMA: &[[u8; 3]] = &[
    [0, 0, 4],
    [28, 16, 68],
    [79, 18, 123],
    [129, 37, 129],
    [181, 54, 122],
    [229, 80, 100],
    [251, 135, 97],
    [254, 194, 135],
    [252, 253, 191],
];

const COOLWARM: &[[u8; 3]] = &[
    [59, 76, 192],
    [124, 159, 249],
    [221, 221, 221],
    [245, 156, 125],
    [180, 4, 38],
];

const GRAY: &[[u8; 3]] = &[[0, 0, 0], [255, 255, 255]];

impl Colormap {
    /// Samples the colormap at `t`, clamped to `[0, 1]`.
    pub fn sample(&self, t: f64) -> [u8; 3] {
        let anchors = match self {
            Colormap::Viridis => VIRIDIS,
            Colormap::Magma => MAGMA,
            Colormap::Coolwarm => COOLWARM,
            Colormap::Gray => GRAY,
        };
        let t = t.clamp(0.0, 1.0);
        let scaled = t * (anchors.len() - 1) as f64;
        let lower = scaled.floor() as usize;
        let upper = (lower + 1).min(anchors.len() - 1);
        let frac = scaled - lower as f64;
        let mut rgb = [0u8; 3];
        for (channel, slot) in rgb.iter_mut().enumerate() {
            let a = anchors[lower][channel] as f64;
            let b = anchors[upper][channel] as f64;
            *slot = (a + (b - a) * frac).round() as u8;
        }
        rgb
    }

    /// Name used on the CLI and in configs.
    pub fn name(&self) -> &'static str {
        match self {
            Colormap::Viridis => "viridis",
            Colormap::Magma => "magma",
            Colormap::Coolwarm => "coolwarm",
            Colormap::Gray => "gray",
        }
    }
}
