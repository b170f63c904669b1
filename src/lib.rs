//! marginal - feature-effect analysis for regression models on tabular data
//!
//! This crate fits random-forest regressors to typed tabular datasets and
//! inspects what they learned:
//!
//! - [`explainability::PartialDependence`] - 1D and 2D partial dependence
//!   plus per-row ICE curves, with optional convex-hull restriction of
//!   interaction surfaces to the observed support
//! - [`explainability::PermutationImportance`] - score degradation under
//!   column shuffling
//!
//! # Modules
//!
//! - [`data`] - typed [`Dataset`](data::Dataset) and file loading
//! - [`training`] - regression tree, random forest, metrics and the
//!   [`Predictor`](training::Predictor) capability any model can satisfy
//! - [`explainability`] - the analyses themselves
//! - [`cli`] - command-line interface

pub mod error;

pub mod cli;
pub mod data;
pub mod explainability;
pub mod training;

pub use error::{MarginalError, Result};
