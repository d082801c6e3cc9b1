//! Windowed noise: a separable window profile roughened by folded Gaussian noise.

use std::f64::consts::PI;

use ndarray::Array2;
use rand::distr::Uniform;
use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use super::seeded_rng;
use crate::error::{Error, Result};
use crate::field::Field;

/// Symmetric cosine-sum window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    #[default]
    Blackman,
    BlackmanHarris,
}

impl WindowKind {
    /// Cosine-sum coefficients `a0, a1, ...` with alternating signs applied
    fn coefficients(self) -> &'static [f64] {
        match self {
            WindowKind::Blackman => &[0.42, 0.5, 0.08],
            WindowKind::BlackmanHarris => &[0.35875, 0.48829, 0.14128, 0.01168],
        }
    }

    /// Sample the window at `len` points; a single point is 1.0.
    pub fn samples(self, len: usize) -> Vec<f64> {
        if len == 1 {
            return vec![1.0];
        }
        let denom = (len - 1) as f64;
        (0..len)
            .map(|n| {
                let phase = 2.0 * PI * n as f64 / denom;
                self.coefficients()
                    .iter()
                    .enumerate()
                    .map(|(k, a)| {
                        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                        sign * a * (k as f64 * phase).cos()
                    })
                    .sum()
            })
            .collect()
    }
}

/// Uniform noise layer that becomes the field's auxiliary channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuxNoise {
    pub low: f64,
    pub high: f64,
}

/// Field source that multiplies a row-pass and a column-pass window profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowNoiseSource {
    pub rows: usize,
    pub cols: usize,
    pub window: WindowKind,
    /// Peak amplitude of the window profile
    pub depth: f64,
    /// Standard deviation of the additive noise
    pub max_noise: f64,
    pub aux: Option<AuxNoise>,
    pub seed: Option<u64>,
}

impl Default for WindowNoiseSource {
    fn default() -> Self {
        Self {
            rows: 24,
            cols: 36,
            window: WindowKind::Blackman,
            depth: 50.0,
            max_noise: 6.0,
            aux: Some(AuxNoise {
                low: 0.5,
                high: 0.8,
            }),
            seed: None,
        }
    }
}

impl WindowNoiseSource {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::invalid_config(format!(
                "windowed noise must be at least 1x1, got {}x{}",
                self.rows, self.cols
            )));
        }
        if !self.depth.is_finite() || !self.max_noise.is_finite() || self.max_noise < 0.0 {
            return Err(Error::invalid_config(format!(
                "windowed noise needs finite depth and max_noise >= 0, got {} and {}",
                self.depth, self.max_noise
            )));
        }
        if let Some(AuxNoise { low, high }) = self.aux {
            if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low >= high {
                return Err(Error::invalid_config(format!(
                    "aux noise range must satisfy 0 <= low < high <= 1, got [{low}, {high})"
                )));
            }
        }
        Ok(())
    }

    pub fn generate(&self) -> Result<Field> {
        self.validate()?;
        let mut rng = seeded_rng(self.seed);
        let noise = Normal::new(0.0, self.max_noise)
            .map_err(|e| Error::invalid_config(format!("noise: {e}")))?;

        let row_window = self.window.samples(self.rows);
        let col_window = self.window.samples(self.cols);

        let mut values = Array2::<f64>::zeros((self.rows, self.cols));

        // Row pass: each column gets the row profile plus its own noise
        for col in 0..self.cols {
            for (row, w) in row_window.iter().enumerate() {
                let n: f64 = rng.sample(noise);
                values[[row, col]] = w * self.depth + n.abs();
            }
        }

        // Column pass multiplies in the column profile
        for row in 0..self.rows {
            for (col, w) in col_window.iter().enumerate() {
                let n: f64 = rng.sample(noise);
                values[[row, col]] *= w * self.depth + n.abs();
            }
        }

        let field = Field::new(values)?;
        match self.aux {
            Some(AuxNoise { low, high }) => {
                let uniform = Uniform::new(low, high)
                    .map_err(|e| Error::invalid_config(format!("aux noise: {e}")))?;
                let aux = Array2::from_shape_simple_fn((self.rows, self.cols), || {
                    rng.sample(uniform)
                });
                field.with_aux(aux)
            }
            None => Ok(field),
        }
    }
}
