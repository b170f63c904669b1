//! Regression evaluation metrics

use serde::{Deserialize, Serialize};

/// Summary metrics for a set of regression predictions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean squared error
    pub mse: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Mean absolute error
    pub mae: f64,
    /// R-squared
    pub r2: f64,
    /// Number of samples scored
    pub n_samples: usize,
}

impl RegressionMetrics {
    /// Compute metrics from true and predicted values.
    /// Extra elements in the longer slice are ignored.
    pub fn compute(y_true: &[f64], y_pred: &[f64]) -> Self {
        let n = y_true.len().min(y_pred.len());
        if n == 0 {
            return Self {
                mse: 0.0,
                rmse: 0.0,
                mae: 0.0,
                r2: 0.0,
                n_samples: 0,
            };
        }

        let errors: Vec<f64> = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| t - p)
            .collect();

        let mse = errors.iter().map(|e| e * e).sum::<f64>() / n as f64;
        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n as f64;

        let y_mean = y_true[..n].iter().sum::<f64>() / n as f64;
        let ss_tot: f64 = y_true[..n].iter().map(|y| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = errors.iter().map(|e| e.powi(2)).sum();
        let r2 = if ss_tot > 0.0 {
            1.0 - ss_res / ss_tot
        } else {
            0.0
        };

        Self {
            mse,
            rmse: mse.sqrt(),
            mae,
            r2,
            n_samples: n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_perfect_fit() {
        let y_true = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y_pred = [1.1, 2.0, 2.9, 4.1, 5.0];

        let metrics = RegressionMetrics::compute(&y_true, &y_pred);
        assert!(metrics.r2 > 0.9);
        assert!(metrics.rmse < 0.2);
        assert_eq!(metrics.n_samples, 5);
    }

    #[test]
    fn test_exact_fit() {
        let y = [3.0, 6.0, 9.0];
        let metrics = RegressionMetrics::compute(&y, &y);
        assert_eq!(metrics.mse, 0.0);
        assert_eq!(metrics.r2, 1.0);
    }
}
