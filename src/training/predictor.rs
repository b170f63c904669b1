//! The prediction capability consumed by the analyses

use crate::data::Dataset;
use crate::error::Result;

/// A fitted regression model: one prediction per dataset row.
///
/// Implemented by [`RandomForestRegressor`](super::RandomForestRegressor)
/// and blanket-implemented for closures, so any model exposing
/// `predict(rows) -> values` satisfies the contract.
pub trait Predictor: Send + Sync {
    fn predict(&self, data: &Dataset) -> Result<Vec<f64>>;
}

impl<F> Predictor for F
where
    F: Fn(&Dataset) -> Result<Vec<f64>> + Send + Sync,
{
    fn predict(&self, data: &Dataset) -> Result<Vec<f64>> {
        self(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_a_predictor() {
        let mut ds = Dataset::new();
        ds.add_numeric("x", vec![1.0, 2.0, 3.0]).unwrap();

        let identity =
            |data: &Dataset| -> Result<Vec<f64>> { Ok(data.numeric_values("x")?.to_vec()) };
        let preds = Predictor::predict(&identity, &ds).unwrap();
        assert_eq!(preds, vec![1.0, 2.0, 3.0]);
    }
}
