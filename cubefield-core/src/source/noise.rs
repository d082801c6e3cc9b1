//! Fields of i.i.d. random values.

use ndarray::Array2;
use rand::distr::Uniform;
use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use super::seeded_rng;
use crate::error::{Error, Result};
use crate::field::Field;

/// Per-cell distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoiseDistribution {
    Gaussian { mean: f64, std_dev: f64 },
    Uniform { low: f64, high: f64 },
}

impl Default for NoiseDistribution {
    fn default() -> Self {
        NoiseDistribution::Gaussian {
            mean: 0.0,
            std_dev: 1.0,
        }
    }
}

/// Field source drawing every cell independently
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSource {
    pub rows: usize,
    pub cols: usize,
    pub distribution: NoiseDistribution,
    /// Fixed seed for reproducible fields
    pub seed: Option<u64>,
}

impl Default for RandomSource {
    fn default() -> Self {
        Self {
            rows: 30,
            cols: 30,
            distribution: NoiseDistribution::default(),
            seed: None,
        }
    }
}

impl RandomSource {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::invalid_config(format!(
                "random field must be at least 1x1, got {}x{}",
                self.rows, self.cols
            )));
        }
        match self.distribution {
            NoiseDistribution::Gaussian { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
                    return Err(Error::invalid_config(format!(
                        "gaussian needs finite mean and std_dev >= 0, got mean {mean}, std_dev {std_dev}"
                    )));
                }
            }
            NoiseDistribution::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() || low >= high {
                    return Err(Error::invalid_config(format!(
                        "uniform needs finite low < high, got [{low}, {high})"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn generate(&self) -> Result<Field> {
        self.validate()?;
        let mut rng = seeded_rng(self.seed);
        let shape = (self.rows, self.cols);

        let values = match self.distribution {
            NoiseDistribution::Gaussian { mean, std_dev } => {
                let normal = Normal::new(mean, std_dev)
                    .map_err(|e| Error::invalid_config(format!("gaussian: {e}")))?;
                Array2::from_shape_simple_fn(shape, || rng.sample(normal))
            }
            NoiseDistribution::Uniform { low, high } => {
                let uniform = Uniform::new(low, high)
                    .map_err(|e| Error::invalid_config(format!("uniform: {e}")))?;
                Array2::from_shape_simple_fn(shape, || rng.sample(uniform))
            }
        };

        Field::new(values)
    }
}
