//! Permutation feature importance

use crate::data::Dataset;
use crate::error::{MarginalError, Result};
use crate::training::Predictor;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Result of permutation importance computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportanceResult {
    /// Feature names, in dataset column order
    pub features: Vec<String>,
    /// Mean score degradation per feature
    pub importances_mean: Vec<f64>,
    /// Standard deviation across repeats
    pub importances_std: Vec<f64>,
    /// Raw degradation per repeat
    pub importances_raw: Vec<Vec<f64>>,
}

impl ImportanceResult {
    /// Feature indices sorted by mean importance, descending
    pub fn sorted_indices(&self) -> Vec<usize> {
        let mut indexed: Vec<(usize, f64)> = self
            .importances_mean
            .iter()
            .copied()
            .enumerate()
            .collect();
        indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        indexed.into_iter().map(|(i, _)| i).collect()
    }

    /// Top k features with their mean importance
    pub fn top_k(&self, k: usize) -> Vec<(&str, f64)> {
        self.sorted_indices()
            .into_iter()
            .take(k)
            .map(|i| (self.features[i].as_str(), self.importances_mean[i]))
            .collect()
    }
}

/// Permutation importance calculator.
///
/// Scores each feature by how much the model degrades when that column is
/// shuffled while all others keep their observed values. Categorical
/// columns are permuted through their label codes.
pub struct PermutationImportance<'a, P: Predictor + ?Sized> {
    predictor: &'a P,
    n_repeats: usize,
    seed: u64,
}

impl<'a, P: Predictor + ?Sized> PermutationImportance<'a, P> {
    /// Create a calculator for a fitted predictor
    pub fn new(predictor: &'a P) -> Self {
        Self {
            predictor,
            n_repeats: 5,
            seed: 42,
        }
    }

    /// Set number of permutation repeats
    pub fn with_n_repeats(mut self, n_repeats: usize) -> Self {
        self.n_repeats = n_repeats.max(1);
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Compute importance using MSE against the `target` column
    pub fn compute(&self, data: &Dataset, target: &str) -> Result<ImportanceResult> {
        self.compute_with_scorer(data, target, |y_true, y_pred| {
            y_true
                .iter()
                .zip(y_pred.iter())
                .map(|(t, p)| (t - p).powi(2))
                .sum::<f64>()
                / y_true.len() as f64
        })
    }

    /// Compute importance with a custom scoring function (lower is better)
    pub fn compute_with_scorer<S>(
        &self,
        data: &Dataset,
        target: &str,
        scorer: S,
    ) -> Result<ImportanceResult>
    where
        S: Fn(&[f64], &[f64]) -> f64,
    {
        if data.is_empty() {
            return Err(MarginalError::EmptyDataset(
                "permutation importance needs at least one row".to_string(),
            ));
        }
        let y = data.numeric_values(target)?.to_vec();
        let features: Vec<String> = data
            .feature_names()
            .iter()
            .filter(|name| name.as_str() != target)
            .cloned()
            .collect();

        let baseline_pred = self.predict_checked(data)?;
        let baseline_score = scorer(&y, &baseline_pred);

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let n_rows = data.n_rows();
        let mut importances_raw: Vec<Vec<f64>> = vec![Vec::new(); features.len()];

        for _ in 0..self.n_repeats {
            for (feature_idx, feature) in features.iter().enumerate() {
                let mut order: Vec<usize> = (0..n_rows).collect();
                order.shuffle(&mut rng);

                let mut permuted = data.clone();
                permuted.permute_column(feature, &order)?;

                let permuted_pred = self.predict_checked(&permuted)?;
                let permuted_score = scorer(&y, &permuted_pred);

                importances_raw[feature_idx].push(permuted_score - baseline_score);
            }
        }

        let importances_mean: Vec<f64> = importances_raw
            .iter()
            .map(|scores| scores.iter().sum::<f64>() / scores.len() as f64)
            .collect();

        let importances_std: Vec<f64> = importances_raw
            .iter()
            .zip(importances_mean.iter())
            .map(|(scores, mean)| {
                let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>()
                    / scores.len() as f64;
                variance.sqrt()
            })
            .collect();

        Ok(ImportanceResult {
            features,
            importances_mean,
            importances_std,
            importances_raw,
        })
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_informative_feature_ranked_first() {
        let mut ds = Dataset::new();
        let x: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        ds.add_numeric("x", x.clone()).unwrap();
        ds.add_numeric("noise", vec![0.0; 10]).unwrap();
        ds.add_numeric("y", x).unwrap();

        // predictor reads only x, so only x matters
        let predict_x =
            |data: &Dataset| -> Result<Vec<f64>> { Ok(data.numeric_values("x")?.to_vec()) };

        let result = PermutationImportance::new(&predict_x)
            .with_n_repeats(3)
            .with_seed(42)
            .compute(&ds, "y")
            .unwrap();

        assert_eq!(result.features, vec!["x", "noise"]);
        assert_eq!(result.sorted_indices()[0], 0);
        assert!(result.importances_mean[0] > 0.0);
        assert!(result.importances_mean[1].abs() < 1e-12);
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let mut ds = Dataset::new();
        let x: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        ds.add_numeric("x", x.clone()).unwrap();
        ds.add_numeric("y", x).unwrap();

        let predict_x =
            |data: &Dataset| -> Result<Vec<f64>> { Ok(data.numeric_values("x")?.to_vec()) };

        let a = PermutationImportance::new(&predict_x)
            .with_seed(9)
            .compute(&ds, "y")
            .unwrap();
        let b = PermutationImportance::new(&predict_x)
            .with_seed(9)
            .compute(&ds, "y")
            .unwrap();
        assert_eq!(a.importances_mean, b.importances_mean);
    }

    #[test]
    fn test_top_k() {
        let result = ImportanceResult {
            features: vec!["a".into(), "b".into(), "c".into()],
            importances_mean: vec![0.5, 0.1, 0.3],
            importances_std: vec![0.1, 0.05, 0.08],
            importances_raw: vec![vec![0.5], vec![0.1], vec![0.3]],
        };
        let top = result.top_k(2);
        assert_eq!(top[0].0, "a");
        assert_eq!(top[1].0, "c");
    }
}
