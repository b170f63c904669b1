//! Evaluation grids for partial-dependence analysis

use crate::data::{Column, Dataset};
use crate::error::{MarginalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single evaluation point for one feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GridValue {
    Numeric(f64),
    Categorical(String),
}

impl GridValue {
    /// Numeric value, if this is a numeric grid point
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            GridValue::Numeric(v) => Some(*v),
            GridValue::Categorical(_) => None,
        }
    }
}

impl fmt::Display for GridValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridValue::Numeric(v) => write!(f, "{}", v),
            GridValue::Categorical(label) => write!(f, "{}", label),
        }
    }
}

/// Build the evaluation grid for one feature.
///
/// Numeric columns yield `resolution` evenly spaced values spanning the
/// observed [min, max]; non-finite observations are skipped when deriving
/// the bounds. Categorical columns yield the full ordered label set and
/// ignore `resolution`, so unordered categories are never interpolated.
pub fn build_grid(data: &Dataset, feature: &str, resolution: usize) -> Result<Vec<GridValue>> {
    match data.column(feature)? {
        Column::Numeric(values) => {
            let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
            let (min, max) = match finite.iter().fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            }) {
                Some(bounds) => bounds,
                None => {
                    return Err(MarginalError::DataError(format!(
                        "column '{}' has no finite values to derive a grid from",
                        feature
                    )))
                }
            };

            let n = resolution.max(1);
            if n == 1 {
                return Ok(vec![GridValue::Numeric(min)]);
            }
            let step = (max - min) / (n - 1) as f64;
            Ok((0..n)
                .map(|i| GridValue::Numeric(min + i as f64 * step))
                .collect())
        }
        Column::Categorical { labels, .. } => Ok(labels
            .iter()
            .map(|label| GridValue::Categorical(label.clone()))
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_grid_spans_min_max() {
        let mut ds = Dataset::new();
        ds.add_numeric("x", vec![3.0, 1.0, 2.0]).unwrap();

        let grid = build_grid(&ds, "x", 3).unwrap();
        assert_eq!(
            grid,
            vec![
                GridValue::Numeric(1.0),
                GridValue::Numeric(2.0),
                GridValue::Numeric(3.0)
            ]
        );
    }

    #[test]
    fn test_categorical_grid_ignores_resolution() {
        let mut ds = Dataset::new();
        ds.add_categorical("season", &["winter", "spring", "winter", "summer"])
            .unwrap();

        let grid = build_grid(&ds, "season", 2).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], GridValue::Categorical("winter".to_string()));
        assert_eq!(grid[1], GridValue::Categorical("spring".to_string()));
    }

    #[test]
    fn test_constant_column_repeats_value() {
        let mut ds = Dataset::new();
        ds.add_numeric("x", vec![5.0, 5.0]).unwrap();

        let grid = build_grid(&ds, "x", 4).unwrap();
        assert_eq!(grid.len(), 4);
        assert!(grid.iter().all(|v| *v == GridValue::Numeric(5.0)));
    }

    #[test]
    fn test_non_finite_values_skipped() {
        let mut ds = Dataset::new();
        ds.add_numeric("x", vec![f64::NAN, 1.0, 4.0, f64::INFINITY])
            .unwrap();

        let grid = build_grid(&ds, "x", 2).unwrap();
        assert_eq!(
            grid,
            vec![GridValue::Numeric(1.0), GridValue::Numeric(4.0)]
        );
    }

    #[test]
    fn test_all_non_finite_rejected() {
        let mut ds = Dataset::new();
        ds.add_numeric("x", vec![f64::NAN, f64::NAN]).unwrap();
        assert!(build_grid(&ds, "x", 3).is_err());
    }

    #[test]
    fn test_unknown_feature() {
        let ds = Dataset::new();
        assert!(matches!(
            build_grid(&ds, "nope", 3),
            Err(MarginalError::FeatureNotFound(_))
        ));
    }
}
