//! Bootstrap-aggregated regression forest

use super::decision_tree::RegressionTree;
use super::predictor::Predictor;
use crate::data::Dataset;
use crate::error::{MarginalError, Result};
use ndarray::{Array1, Array2};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Strategy for the number of features considered per split
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum MaxFeatures {
    /// Square root of n_features
    Sqrt,
    /// Log2 of n_features
    Log2,
    /// Fraction of n_features
    Fraction(f64),
    /// Fixed number
    Fixed(usize),
    /// All features
    All,
}

impl MaxFeatures {
    fn resolve(&self, n_features: usize) -> usize {
        match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().ceil() as usize,
            MaxFeatures::Log2 => (n_features as f64).log2().ceil() as usize,
            MaxFeatures::Fraction(f) => (n_features as f64 * f).ceil() as usize,
            MaxFeatures::Fixed(n) => (*n).min(n_features),
            MaxFeatures::All => n_features,
        }
        .max(1)
    }
}

/// Random forest for regression, fitted directly on a typed [`Dataset`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth per tree
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features per split
    pub max_features: MaxFeatures,
    /// Bootstrap sampling
    pub bootstrap: bool,
    /// Base seed; tree i uses seed + i
    pub seed: u64,
    feature_names: Vec<String>,
    target: Option<String>,
    feature_importances: Option<Vec<f64>>,
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RandomForestRegressor {
    /// Create a new forest with the given number of trees
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators: n_estimators.max(1),
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: 42,
            feature_names: Vec::new(),
            target: None,
            feature_importances: None,
        }
    }

    /// Set maximum depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set minimum samples to split
    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    /// Set minimum samples in leaf
    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    /// Set max features strategy
    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    /// Set base seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Disable bootstrap sampling
    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Fit the forest on all columns of `data` except `target`.
    ///
    /// The target column must be numeric. Categorical feature columns
    /// enter the trees through their label codes.
    pub fn fit(&mut self, data: &Dataset, target: &str) -> Result<&mut Self> {
        if data.is_empty() {
            return Err(MarginalError::EmptyDataset(
                "cannot fit on a dataset with zero rows".to_string(),
            ));
        }

        let y_values = data.numeric_values(target)?;
        let y = Array1::from_vec(y_values.to_vec());

        let feature_names: Vec<String> = data
            .feature_names()
            .iter()
            .filter(|name| name.as_str() != target)
            .cloned()
            .collect();
        if feature_names.is_empty() {
            return Err(MarginalError::DataError(
                "no feature columns besides the target".to_string(),
            ));
        }

        let x = data.to_matrix(&feature_names)?;
        let n_samples = x.nrows();
        let max_features = self.max_features.resolve(x.ncols());

        info!(
            n_estimators = self.n_estimators,
            n_samples,
            n_features = x.ncols(),
            target,
            "fitting random forest"
        );

        let trees: Vec<RegressionTree> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let tree_seed = self.seed.wrapping_add(tree_idx as u64);
                let mut rng = ChaCha8Rng::seed_from_u64(tree_seed);

                let sample_indices: Vec<usize> = if self.bootstrap {
                    (0..n_samples)
                        .map(|_| (rng.next_u64() as usize) % n_samples)
                        .collect()
                } else {
                    (0..n_samples).collect()
                };

                let x_boot = x.select(ndarray::Axis(0), &sample_indices);
                let y_boot: Array1<f64> =
                    Array1::from_vec(sample_indices.iter().map(|&i| y[i]).collect());

                let mut tree = RegressionTree::new()
                    .with_min_samples_split(self.min_samples_split)
                    .with_min_samples_leaf(self.min_samples_leaf)
                    .with_max_features(max_features)
                    .with_seed(tree_seed);
                if let Some(d) = self.max_depth {
                    tree = tree.with_max_depth(d);
                }

                tree.fit(&x_boot, &y_boot)?;
                Ok(tree)
            })
            .collect::<Result<Vec<_>>>()?;

        self.trees = trees;
        self.feature_names = feature_names;
        self.target = Some(target.to_string());
        self.compute_feature_importances();

        Ok(self)
    }

    fn compute_feature_importances(&mut self) {
        if self.trees.is_empty() {
            return;
        }

        let n_features = self.feature_names.len();
        let mut totals = vec![0.0; n_features];

        for tree in &self.trees {
            if let Some(imp) = tree.feature_importances() {
                for (total, &val) in totals.iter_mut().zip(imp.iter()) {
                    *total += val;
                }
            }
        }

        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            for imp in &mut totals {
                *imp /= sum;
            }
        }

        self.feature_importances = Some(totals);
    }

    /// Predict from a typed dataset using the feature columns seen at fit time.
    /// Extra columns (including the target) are ignored.
    pub fn predict_dataset(&self, data: &Dataset) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            return Err(MarginalError::ModelNotFitted);
        }
        let x = data.to_matrix(&self.feature_names)?;
        self.predict_matrix(&x)
    }

    /// Predict from a raw feature matrix in fit-time column order
    pub fn predict_matrix(&self, x: &Array2<f64>) -> Result<Vec<f64>> {
        if self.trees.is_empty() {
            return Err(MarginalError::ModelNotFitted);
        }

        let all_predictions: Vec<Array1<f64>> = self
            .trees
            .par_iter()
            .map(|tree| tree.predict(x))
            .collect::<Result<Vec<_>>>()?;

        let n_samples = x.nrows();
        let n_trees = all_predictions.len() as f64;
        let predictions: Vec<f64> = (0..n_samples)
            .map(|i| all_predictions.iter().map(|p| p[i]).sum::<f64>() / n_trees)
            .collect();

        Ok(predictions)
    }

    /// Averaged, normalised impurity-decrease importances, paired with
    /// the feature names seen at fit time
    pub fn feature_importances(&self) -> Option<Vec<(&str, f64)>> {
        let importances = self.feature_importances.as_ref()?;
        Some(
            self.feature_names
                .iter()
                .map(|n| n.as_str())
                .zip(importances.iter().copied())
                .collect(),
        )
    }

    /// Feature columns used at fit time
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Target column used at fit time
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Number of fitted trees
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Save the fitted model as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a fitted model from JSON
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl Predictor for RandomForestRegressor {
    fn predict(&self, data: &Dataset) -> Result<Vec<f64>> {
        self.predict_dataset(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear_dataset() -> Dataset {
        let mut ds = Dataset::new();
        let x1: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let x2: Vec<f64> = (1..=20).map(|i| (i * 2) as f64).collect();
        let y: Vec<f64> = x1.iter().zip(x2.iter()).map(|(a, b)| a + b).collect();
        ds.add_numeric("x1", x1).unwrap();
        ds.add_numeric("x2", x2).unwrap();
        ds.add_numeric("y", y).unwrap();
        ds
    }

    #[test]
    fn test_fit_predict() {
        let ds = linear_dataset();
        let mut rf = RandomForestRegressor::new(10).with_seed(42);
        rf.fit(&ds, "y").unwrap();

        let predictions = rf.predict_dataset(&ds).unwrap();
        assert_eq!(predictions.len(), ds.n_rows());

        let y = ds.numeric_values("y").unwrap();
        let mse: f64 = predictions
            .iter()
            .zip(y.iter())
            .map(|(p, a)| (p - a).powi(2))
            .sum::<f64>()
            / y.len() as f64;
        assert!(mse < 20.0, "MSE too high: {}", mse);
    }

    #[test]
    fn test_same_seed_same_model() {
        let ds = linear_dataset();
        let mut a = RandomForestRegressor::new(5).with_seed(7);
        let mut b = RandomForestRegressor::new(5).with_seed(7);
        a.fit(&ds, "y").unwrap();
        b.fit(&ds, "y").unwrap();
        assert_eq!(
            a.predict_dataset(&ds).unwrap(),
            b.predict_dataset(&ds).unwrap()
        );
    }

    #[test]
    fn test_categorical_target_rejected() {
        let mut ds = Dataset::new();
        ds.add_numeric("x", vec![1.0, 2.0]).unwrap();
        ds.add_categorical("label", &["a", "b"]).unwrap();
        let mut rf = RandomForestRegressor::new(3);
        assert!(rf.fit(&ds, "label").is_err());
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let ds = Dataset::new();
        let mut rf = RandomForestRegressor::new(3);
        assert!(matches!(
            rf.fit(&ds, "y"),
            Err(MarginalError::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_unfitted_predict_fails() {
        let ds = linear_dataset();
        let rf = RandomForestRegressor::new(3);
        assert!(matches!(
            rf.predict_dataset(&ds),
            Err(MarginalError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_importances_sum_to_one() {
        let ds = linear_dataset();
        let mut rf = RandomForestRegressor::new(10).with_seed(42);
        rf.fit(&ds, "y").unwrap();

        let importances = rf.feature_importances().unwrap();
        assert_eq!(importances.len(), 2);
        let sum: f64 = importances.iter().map(|(_, v)| v).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
