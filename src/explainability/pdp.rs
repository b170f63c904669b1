//! Partial dependence and individual conditional expectation
//!
//! For each grid value the whole reference dataset is copied, the target
//! column is overwritten with that value in every row while the remaining
//! columns keep their observed values, and the model's predictions are
//! averaged. The average marginalizes the prediction over the empirical
//! distribution of the background features.

use crate::data::{Column, Dataset};
use crate::error::{MarginalError, Result};
use crate::explainability::grid::{build_grid, GridValue};
use crate::explainability::hull::ConvexHull;
use crate::training::Predictor;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Averaged marginal effect of one feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdpResult {
    /// Target feature name
    pub feature: String,
    /// Grid values, in evaluation order
    pub grid: Vec<GridValue>,
    /// Average prediction at each grid value
    pub average_predictions: Vec<f64>,
    /// Standard deviation of the row-level predictions at each grid value
    pub std_predictions: Vec<f64>,
}

/// One evaluated cell of a 2D interaction surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pdp2dCell {
    pub value_1: GridValue,
    pub value_2: GridValue,
    pub average: f64,
    pub std: f64,
}

/// Averaged marginal effect of a feature pair.
///
/// Cells follow grid iteration order: the first feature's grid is the
/// outer loop. With hull restriction enabled, cells outside the observed
/// support are absent rather than marked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pdp2dResult {
    pub features: (String, String),
    pub grid_1: Vec<GridValue>,
    pub grid_2: Vec<GridValue>,
    pub cells: Vec<Pdp2dCell>,
}

/// Per-row conditional expectation curves; their mean is the 1D partial dependence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceResult {
    pub feature: String,
    pub grid: Vec<GridValue>,
    /// One curve per dataset row, one value per grid point
    pub curves: Vec<Vec<f64>>,
    /// Curves shifted so each starts at zero at the first grid value
    pub centered_curves: Vec<Vec<f64>>,
}

impl IceResult {
    /// Collapse the ICE curves into the averaged partial dependence
    pub fn to_pdp(&self) -> PdpResult {
        let n_rows = self.curves.len();
        let n_grid = self.grid.len();

        let mut average = vec![0.0; n_grid];
        let mut std = vec![0.0; n_grid];

        for grid_idx in 0..n_grid {
            let mean = self
                .curves
                .iter()
                .map(|curve| curve[grid_idx])
                .sum::<f64>()
                / n_rows as f64;
            let variance = self
                .curves
                .iter()
                .map(|curve| (curve[grid_idx] - mean).powi(2))
                .sum::<f64>()
                / n_rows as f64;
            average[grid_idx] = mean;
            std[grid_idx] = variance.sqrt();
        }

        PdpResult {
            feature: self.feature.clone(),
            grid: self.grid.clone(),
            average_predictions: average,
            std_predictions: std,
        }
    }
}

/// Partial dependence estimator over a typed reference dataset
pub struct PartialDependence<'a, P: Predictor + ?Sized> {
    predictor: &'a P,
    grid_resolution: usize,
    restrict_to_hull: bool,
}

impl<'a, P: Predictor + ?Sized> PartialDependence<'a, P> {
    /// Create an estimator for a fitted predictor
    pub fn new(predictor: &'a P) -> Self {
        Self {
            predictor,
            grid_resolution: 20,
            restrict_to_hull: false,
        }
    }

    /// Set the number of grid points for numeric features
    pub fn with_grid_resolution(mut self, resolution: usize) -> Self {
        self.grid_resolution = resolution.max(1);
        self
    }

    /// Restrict 2D surfaces to the convex hull of the observed feature pairs
    pub fn with_hull_restriction(mut self, restrict: bool) -> Self {
        self.restrict_to_hull = restrict;
        self
    }

    /// Compute the 1D partial dependence of one feature
    pub fn compute(&self, data: &Dataset, feature: &str) -> Result<PdpResult> {
        Ok(self.compute_ice(data, feature)?.to_pdp())
    }

    /// Compute 1D partial dependence for several features in turn
    pub fn compute_batch(&self, data: &Dataset, features: &[String]) -> Result<Vec<PdpResult>> {
        features
            .iter()
            .map(|feature| self.compute(data, feature))
            .collect()
    }

    /// Compute per-row ICE curves for one feature
    pub fn compute_ice(&self, data: &Dataset, feature: &str) -> Result<IceResult> {
        self.check_dataset(data)?;
        let grid = build_grid(data, feature, self.grid_resolution)?;
        debug!(feature, grid_len = grid.len(), rows = data.n_rows(), "evaluating ICE grid");

        // One prediction vector per grid point; rayon preserves order
        let per_grid: Vec<Vec<f64>> = grid
            .par_iter()
            .map(|value| {
                let mut working = data.clone();
                apply(&mut working, feature, value)?;
                self.predict_checked(&working)
            })
            .collect::<Result<Vec<_>>>()?;

        let n_rows = data.n_rows();
        let curves: Vec<Vec<f64>> = (0..n_rows)
            .map(|row| per_grid.iter().map(|preds| preds[row]).collect())
            .collect();

        let centered_curves: Vec<Vec<f64>> = curves
            .iter()
            .map(|curve| {
                let first = curve[0];
                curve.iter().map(|v| v - first).collect()
            })
            .collect();

        Ok(IceResult {
            feature: feature.to_string(),
            grid,
            curves,
            centered_curves,
        })
    }

    /// Compute the interaction surface of two distinct features.
    ///
    /// The cell list is the cross product of the two grids in grid
    /// iteration order, minus any cell outside the convex hull of the
    /// observed value pairs when hull restriction is enabled. The
    /// restriction only applies when both features are numeric; a
    /// categorical grid never leaves the observed labels, so there is no
    /// extrapolated region to cut.
    pub fn compute_2d(
        &self,
        data: &Dataset,
        feature_1: &str,
        feature_2: &str,
    ) -> Result<Pdp2dResult> {
        if feature_1 == feature_2 {
            return Err(MarginalError::InvalidParameter {
                name: "feature_2".to_string(),
                value: feature_2.to_string(),
                reason: "the two target features must be distinct".to_string(),
            });
        }
        self.check_dataset(data)?;

        let grid_1 = build_grid(data, feature_1, self.grid_resolution)?;
        let grid_2 = build_grid(data, feature_2, self.grid_resolution)?;

        let hull = if self.restrict_to_hull {
            observed_pairs(data, feature_1, feature_2)
                .and_then(|pairs| ConvexHull::from_points(&pairs))
        } else {
            None
        };

        let mut pairs: Vec<(GridValue, GridValue)> = Vec::new();
        for v1 in &grid_1 {
            for v2 in &grid_2 {
                if let Some(hull) = &hull {
                    if let (Some(x), Some(y)) = (v1.as_numeric(), v2.as_numeric()) {
                        if !hull.contains((x, y)) {
                            continue;
                        }
                    }
                }
                pairs.push((v1.clone(), v2.clone()));
            }
        }
        debug!(
            feature_1,
            feature_2,
            cells = pairs.len(),
            excluded = grid_1.len() * grid_2.len() - pairs.len(),
            "evaluating interaction surface"
        );

        let cells: Vec<Pdp2dCell> = pairs
            .par_iter()
            .map(|(v1, v2)| {
                let mut working = data.clone();
                apply(&mut working, feature_1, v1)?;
                apply(&mut working, feature_2, v2)?;
                let preds = self.predict_checked(&working)?;
                let (average, std) = mean_std(&preds);
                Ok(Pdp2dCell {
                    value_1: v1.clone(),
                    value_2: v2.clone(),
                    average,
                    std,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Pdp2dResult {
            features: (feature_1.to_string(), feature_2.to_string()),
            grid_1,
            grid_2,
            cells,
        })
    }

    fn check_dataset(&self, data: &Dataset) -> Result<()> {
        if data.is_empty() {
            return Err(MarginalError::EmptyDataset(
                "partial dependence needs at least one reference row".to_string(),
            ));
        }
        Ok(())
    }

    fn predict_checked(&self, data: &Dataset) -> Result<Vec<f64>> {
        let predictions = self
            .predictor
            .predict(data)
            .map_err(MarginalError::predictor)?;
        if predictions.len() != data.n_rows() {
            return Err(MarginalError::predictor(MarginalError::ShapeError {
                expected: format!("{} predictions", data.n_rows()),
                actual: format!("{} predictions", predictions.len()),
            }));
        }
        Ok(predictions)
    }
}

fn apply(data: &mut Dataset, feature: &str, value: &GridValue) -> Result<()> {
    match value {
        GridValue::Numeric(v) => data.set_numeric(feature, *v),
        GridValue::Categorical(label) => data.set_category(feature, label),
    }
}

fn observed_pairs(data: &Dataset, feature_1: &str, feature_2: &str) -> Option<Vec<(f64, f64)>> {
    let xs = match data.column(feature_1).ok()? {
        Column::Numeric(values) => values,
        Column::Categorical { .. } => return None,
    };
    let ys = match data.column(feature_2).ok()? {
        Column::Numeric(values) => values,
        Column::Categorical { .. } => return None,
    };
    Some(xs.iter().copied().zip(ys.iter().copied()).collect())
}

fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
