//! Raster-image fields: decode, drop alpha, resize along one axis, reduce to grey.

use std::path::PathBuf;

use image::{imageops::FilterType, DynamicImage, GenericImageView, RgbImage};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::Field;

/// RGB to scalar reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreyscaleMethod {
    /// Y row of the CIE RGB to XYZ matrix
    #[default]
    CieY,
    /// Fixed luma weights
    Luma,
}

impl GreyscaleMethod {
    /// Channel weights (R, G, B); both sets sum to 1
    pub fn weights(self) -> [f64; 3] {
        match self {
            GreyscaleMethod::CieY => [0.17697, 0.81240, 0.01063],
            GreyscaleMethod::Luma => [0.21, 0.72, 0.07],
        }
    }

    pub fn apply(self, rgb: [u8; 3]) -> f64 {
        let [wr, wg, wb] = self.weights();
        f64::from(rgb[0]) * wr + f64::from(rgb[1]) * wg + f64::from(rgb[2]) * wb
    }
}

/// Which image axis the resize target applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeAxis {
    #[default]
    Width,
    Height,
}

/// Field source backed by a raster image
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSource {
    pub path: PathBuf,
    pub resize_axis: ResizeAxis,
    /// Target pixel count along `resize_axis`; `None` keeps the original size
    pub resize_target: Option<u32>,
    pub greyscale_method: GreyscaleMethod,
}

impl ImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::invalid_config("image source needs a path"));
        }
        if self.resize_target == Some(0) {
            return Err(Error::invalid_config("resize_target must be at least 1"));
        }
        Ok(())
    }

    /// Decode the image and reduce it to a greyscale field
    pub fn load(&self) -> Result<Field> {
        let img = image::open(&self.path)?;
        let (width, height) = img.dimensions();
        tracing::debug!(path = %self.path.display(), width, height, "decoded image");

        let img = match self.resize_target {
            Some(target) => resize(&img, self.resize_axis, target),
            None => img,
        };

        // Drops any alpha channel
        greyscale_field(&img.to_rgb8(), self.greyscale_method)
    }
}

/// Output size when scaling `(width, height)` so that `axis` becomes `target`.
///
/// The other axis scales proportionally, truncated, never below 1.
pub fn resized_dimensions(width: u32, height: u32, axis: ResizeAxis, target: u32) -> (u32, u32) {
    let scale = |other: u32, along: u32| -> u32 {
        let scaled = u64::from(other) * u64::from(target) / u64::from(along.max(1));
        u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
    };
    match axis {
        ResizeAxis::Width => (target, scale(height, width)),
        ResizeAxis::Height => (scale(width, height), target),
    }
}

/// Nearest-neighbour resize along a single axis, preserving aspect ratio
pub fn resize(img: &DynamicImage, axis: ResizeAxis, target: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    let (new_width, new_height) = resized_dimensions(width, height, axis, target);
    tracing::debug!(new_width, new_height, "resizing image");
    img.resize_exact(new_width, new_height, FilterType::Nearest)
}

/// One field cell per pixel: rows follow image rows, columns follow image columns
pub fn greyscale_field(img: &RgbImage, method: GreyscaleMethod) -> Result<Field> {
    let (width, height) = img.dimensions();
    let values = Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
        method.apply(img.get_pixel(col as u32, row as u32).0)
    });
    Field::new(values)
}
