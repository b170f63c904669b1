//! Regression models fitted on a [`Dataset`](crate::data::Dataset)

pub mod decision_tree;
pub mod metrics;
pub mod predictor;
pub mod random_forest;

pub use decision_tree::RegressionTree;
pub use metrics::RegressionMetrics;
pub use predictor::Predictor;
pub use random_forest::{MaxFeatures, RandomForestRegressor};
