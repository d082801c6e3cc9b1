//! Field normalization: standardize, rescale to the unit range, remap, invert

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::field::Field;

/// What to do with a field that has no variance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlatFieldPolicy {
    /// Fail with [`Error::FlatField`]
    Reject,
    /// Replace every cell with this unit-range value
    Fill(f64),
}

impl Default for FlatFieldPolicy {
    fn default() -> Self {
        FlatFieldPolicy::Fill(0.5)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Map `v` to `1 - v` after rescaling
    pub invert_value: bool,
    /// Final output range `[min, max]`
    pub value_range: [f64; 2],
    pub flat_field: FlatFieldPolicy,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            invert_value: false,
            value_range: [0.0, 1.0],
            flat_field: FlatFieldPolicy::default(),
        }
    }
}

impl NormalizeConfig {
    pub fn validate(&self) -> Result<()> {
        let [lo, hi] = self.value_range;
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(Error::invalid_config(format!(
                "value_range must be finite with min <= max, got [{lo}, {hi}]"
            )));
        }
        if let FlatFieldPolicy::Fill(v) = self.flat_field {
            if !(0.0..=1.0).contains(&v) {
                return Err(Error::invalid_config(format!(
                    "flat_field fill must lie in [0, 1], got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Normalize the primary channel; the auxiliary channel is left as is.
    pub fn apply(&self, field: Field) -> Result<Field> {
        field.ensure_finite()?;

        let unit = match unit_range(field.values()) {
            Some(unit) => unit,
            None => match self.flat_field {
                FlatFieldPolicy::Reject => return Err(Error::FlatField),
                FlatFieldPolicy::Fill(v) => {
                    tracing::warn!(fill = v, "field is flat, filling with a constant");
                    Array2::from_elem(field.dim(), v)
                }
            },
        };

        let unit = if self.invert_value { invert(unit) } else { unit };
        let [lo, hi] = self.value_range;
        let values = remap(unit, lo, hi);

        tracing::debug!(lo, hi, invert = self.invert_value, "normalized field");
        Ok(field.map_values(values))
    }
}

/// `(X - mean) / std` with the population standard deviation.
///
/// `None` when the deviation is zero or not finite.
pub fn standardize(values: &Array2<f64>) -> Option<Array2<f64>> {
    // Moments of values near f64::MAX overflow, so work on X / max|X|
    let scale = values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let scaled = values.mapv(|v| v / scale);

    let mean = scaled.mean()?;
    let std = scaled.std(0.0);
    if !std.is_finite() || std <= 0.0 {
        return None;
    }
    Some(scaled.mapv(|v| (v - mean) / std))
}

/// Shift so the minimum is 0, then divide by the new maximum.
///
/// `None` when all values are equal.
pub fn min_max(values: &Array2<f64>) -> Option<Array2<f64>> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let shifted = values.mapv(|v| v - min);
    let max = shifted.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max <= 0.0 {
        return None;
    }
    Some(shifted.mapv(|v| v / max))
}

/// Standardize then min-max; `None` for a flat field
pub fn unit_range(values: &Array2<f64>) -> Option<Array2<f64>> {
    standardize(values).and_then(|standard| min_max(&standard))
}

pub fn invert(values: Array2<f64>) -> Array2<f64> {
    values.mapv(|v| 1.0 - v)
}

/// Linear map of unit-range values onto `[lo, hi]`
pub fn remap(values: Array2<f64>, lo: f64, hi: f64) -> Array2<f64> {
    if lo == 0.0 && hi == 1.0 {
        return values;
    }
    values.mapv(|v| v * (hi - lo) + lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(data: &[f64], cols: usize) -> Field {
        Field::from_vec(data.len() / cols, cols, data.to_vec()).unwrap()
    }

    #[test]
    fn test_standardize_moments() {
        let values = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let standard = standardize(&values).unwrap();
        assert!(standard.mean().unwrap().abs() < 1e-12);
        assert!((standard.std(0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_huge_magnitudes_are_not_flat() {
        let values = Array2::from_shape_vec((1, 2), vec![1.7e308, 0.0]).unwrap();
        let unit = unit_range(&values).unwrap();
        assert_eq!(unit[[0, 0]], 1.0);
        assert_eq!(unit[[0, 1]], 0.0);

        let f = field(&[-1.0e308, 1.0e308, 0.0], 3);
        let config = NormalizeConfig {
            flat_field: FlatFieldPolicy::Reject,
            ..Default::default()
        };
        let out = config.apply(f).unwrap();
        assert_eq!(out.values().as_slice().unwrap(), &[0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_unit_range_closure() {
        let f = field(&[3.0, -7.0, 12.5, 0.0, 4.0, 4.0], 3);
        let out = NormalizeConfig::default().apply(f).unwrap();
        let (lo, hi) = out.range();
        assert!(lo.abs() < 1e-12);
        assert!((hi - 1.0).abs() < 1e-12);
        // Order is preserved
        assert!(out.get(0, 2).unwrap() > out.get(0, 0).unwrap());
    }

    #[test]
    fn test_invert() {
        let config = NormalizeConfig {
            invert_value: true,
            ..Default::default()
        };
        let out = config.apply(field(&[0.0, 5.0, 10.0], 3)).unwrap();
        assert!((out.get(0, 0).unwrap() - 1.0).abs() < 1e-12);
        assert!((out.get(0, 1).unwrap() - 0.5).abs() < 1e-12);
        assert!(out.get(0, 2).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_remap_range() {
        let config = NormalizeConfig {
            value_range: [0.05, 1.0],
            ..Default::default()
        };
        let out = config.apply(field(&[2.0, 4.0, 6.0, 8.0], 2)).unwrap();
        let (lo, hi) = out.range();
        assert!((lo - 0.05).abs() < 1e-12);
        assert!((hi - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_flat_field_fill() {
        let out = NormalizeConfig::default()
            .apply(Field::constant(3, 3, 42.0).unwrap())
            .unwrap();
        assert!(out.values().iter().all(|&v| v == 0.5));
    }

    #[test]
    fn test_flat_field_reject() {
        let config = NormalizeConfig {
            flat_field: FlatFieldPolicy::Reject,
            ..Default::default()
        };
        let result = config.apply(Field::constant(2, 5, -1.0).unwrap());
        assert!(matches!(result, Err(Error::FlatField)));
    }

    #[test]
    fn test_non_finite_rejected() {
        let result = NormalizeConfig::default().apply(field(&[1.0, f64::NAN], 2));
        assert!(matches!(result, Err(Error::NonFiniteValue { row: 0, col: 1 })));
    }

    #[test]
    fn test_aux_passes_through() {
        let aux = Array2::from_elem((1, 3), 0.7);
        let f = field(&[1.0, 2.0, 3.0], 3).with_aux(aux.clone()).unwrap();
        let out = NormalizeConfig::default().apply(f).unwrap();
        assert_eq!(out.aux(), Some(&aux));
    }

    #[test]
    fn test_validate() {
        assert!(NormalizeConfig::default().validate().is_ok());
        let bad = NormalizeConfig {
            value_range: [1.0, 0.0],
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = NormalizeConfig {
            flat_field: FlatFieldPolicy::Fill(2.0),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
