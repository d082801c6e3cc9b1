//! Scalar fields that drive cube geometry

use ndarray::Array2;

use crate::error::{Error, Result};

/// A rectangular grid of values, with an optional second channel.
///
/// The primary channel drives wall height; the auxiliary channel, when
/// present, drives wall thickness instead of the primary one.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    values: Array2<f64>,
    aux: Option<Array2<f64>>,
}

impl Field {
    pub fn new(values: Array2<f64>) -> Result<Self> {
        let (rows, cols) = values.dim();
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyField { rows, cols });
        }
        Ok(Self { values, aux: None })
    }

    /// Build from a row-major buffer
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                expected: (rows, cols),
                got: (data.len() / cols.max(1), cols),
            });
        }
        let values = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::invalid_config(e.to_string()))?;
        Self::new(values)
    }

    pub fn constant(rows: usize, cols: usize, value: f64) -> Result<Self> {
        Self::new(Array2::from_elem((rows, cols), value))
    }

    /// Attach an auxiliary channel of the same shape
    pub fn with_aux(mut self, aux: Array2<f64>) -> Result<Self> {
        if aux.dim() != self.values.dim() {
            return Err(Error::ShapeMismatch {
                expected: self.values.dim(),
                got: aux.dim(),
            });
        }
        self.aux = Some(aux);
        Ok(self)
    }

    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn aux(&self) -> Option<&Array2<f64>> {
        self.aux.as_ref()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied()
    }

    /// Replace the primary channel, keeping the auxiliary one
    pub(crate) fn map_values(self, values: Array2<f64>) -> Self {
        Self {
            values,
            aux: self.aux,
        }
    }

    /// First non-finite cell in the primary channel, if any
    pub fn find_non_finite(&self) -> Option<(usize, usize)> {
        non_finite(&self.values)
    }

    /// Fail on the first NaN or infinity in either channel
    pub fn ensure_finite(&self) -> Result<()> {
        let bad = self
            .find_non_finite()
            .or_else(|| self.aux.as_ref().and_then(non_finite));
        match bad {
            Some((row, col)) => Err(Error::NonFiniteValue { row, col }),
            None => Ok(()),
        }
    }

    /// (min, max) of the primary channel
    pub fn range(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

fn non_finite(values: &Array2<f64>) -> Option<(usize, usize)> {
    values
        .indexed_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(idx, _)| idx)
}
