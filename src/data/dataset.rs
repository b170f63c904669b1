//! Typed column table used as the reference dataset for all analyses

use crate::error::{MarginalError, Result};
use ndarray::Array2;
use polars::prelude::{DataFrame, DataType};
use rand::seq::index::sample;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// A single typed column.
///
/// Categorical columns store their observed labels in first-appearance
/// order; each row holds an index into that label set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical { labels: Vec<String>, codes: Vec<u32> },
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Categorical { codes, .. } => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }
}

/// Ordered named columns with a consistent row count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a numeric column
    pub fn add_numeric(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        self.check_new_column(name, values.len())?;
        self.n_rows = values.len();
        self.names.push(name.to_string());
        self.columns.push(Column::Numeric(values));
        Ok(())
    }

    /// Add a categorical column; labels are collected in first-appearance order
    pub fn add_categorical(&mut self, name: &str, values: &[&str]) -> Result<()> {
        self.check_new_column(name, values.len())?;

        let mut labels: Vec<String> = Vec::new();
        let mut codes = Vec::with_capacity(values.len());
        for &value in values {
            let code = match labels.iter().position(|l| l == value) {
                Some(idx) => idx as u32,
                None => {
                    labels.push(value.to_string());
                    (labels.len() - 1) as u32
                }
            };
            codes.push(code);
        }

        self.n_rows = values.len();
        self.names.push(name.to_string());
        self.columns.push(Column::Categorical { labels, codes });
        Ok(())
    }

    fn check_new_column(&self, name: &str, len: usize) -> Result<()> {
        if self.names.iter().any(|n| n == name) {
            return Err(MarginalError::DataError(format!(
                "duplicate column name: {}",
                name
            )));
        }
        if !self.columns.is_empty() && len != self.n_rows {
            return Err(MarginalError::ShapeError {
                expected: format!("{} rows", self.n_rows),
                actual: format!("{} rows", len),
            });
        }
        Ok(())
    }

    /// Build a dataset from a polars DataFrame.
    ///
    /// Float and integer columns become numeric; string, categorical and
    /// boolean columns become categorical. Nulls are rejected: the
    /// analyses assume complete cases.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let mut dataset = Dataset::new();

        for col in df.get_columns() {
            let name = col.name().to_string();
            if col.null_count() > 0 {
                return Err(MarginalError::DataError(format!(
                    "column '{}' has {} null values; drop or impute them first",
                    name,
                    col.null_count()
                )));
            }

            match col.dtype() {
                DataType::Float64
                | DataType::Float32
                | DataType::Int64
                | DataType::Int32
                | DataType::Int16
                | DataType::Int8
                | DataType::UInt64
                | DataType::UInt32
                | DataType::UInt16
                | DataType::UInt8 => {
                    let values: Vec<f64> = col
                        .cast(&DataType::Float64)?
                        .f64()?
                        .into_iter()
                        .map(|v| v.unwrap_or(f64::NAN))
                        .collect();
                    dataset.add_numeric(&name, values)?;
                }
                _ => {
                    let casted = col.cast(&DataType::String)?;
                    let values: Vec<String> = casted
                        .str()?
                        .into_iter()
                        .map(|v| v.unwrap_or("").to_string())
                        .collect();
                    let refs: Vec<&str> = values.iter().map(|s| s.as_str()).collect();
                    dataset.add_categorical(&name, &refs)?;
                }
            }
        }

        Ok(dataset)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Column names in insertion order
    pub fn feature_names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| MarginalError::FeatureNotFound(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        let idx = self.column_index(name)?;
        Ok(&self.columns[idx])
    }

    /// Numeric values of a column; errors on categorical columns
    pub fn numeric_values(&self, name: &str) -> Result<&[f64]> {
        match self.column(name)? {
            Column::Numeric(values) => Ok(values),
            Column::Categorical { .. } => Err(MarginalError::DataError(format!(
                "column '{}' is categorical, expected numeric",
                name
            ))),
        }
    }

    /// Observed labels of a categorical column, in first-appearance order
    pub fn category_labels(&self, name: &str) -> Result<&[String]> {
        match self.column(name)? {
            Column::Categorical { labels, .. } => Ok(labels),
            Column::Numeric(_) => Err(MarginalError::DataError(format!(
                "column '{}' is numeric, expected categorical",
                name
            ))),
        }
    }

    /// Overwrite every row of a numeric column with a fixed value
    pub fn set_numeric(&mut self, name: &str, value: f64) -> Result<()> {
        let idx = self.column_index(name)?;
        match &mut self.columns[idx] {
            Column::Numeric(values) => {
                values.iter_mut().for_each(|v| *v = value);
                Ok(())
            }
            Column::Categorical { .. } => Err(MarginalError::DataError(format!(
                "cannot assign a numeric value to categorical column '{}'",
                name
            ))),
        }
    }

    /// Overwrite every row of a categorical column with a fixed label
    pub fn set_category(&mut self, name: &str, label: &str) -> Result<()> {
        let idx = self.column_index(name)?;
        match &mut self.columns[idx] {
            Column::Categorical { labels, codes } => {
                let code = labels.iter().position(|l| l == label).ok_or_else(|| {
                    MarginalError::DataError(format!(
                        "label '{}' not observed in column '{}'",
                        label, name
                    ))
                })? as u32;
                codes.iter_mut().for_each(|c| *c = code);
                Ok(())
            }
            Column::Numeric(_) => Err(MarginalError::DataError(format!(
                "cannot assign a label to numeric column '{}'",
                name
            ))),
        }
    }

    /// Reorder a single column by the given row order, leaving the others
    /// untouched. `order` must be a permutation of 0..n_rows.
    pub fn permute_column(&mut self, name: &str, order: &[usize]) -> Result<()> {
        if order.len() != self.n_rows {
            return Err(MarginalError::ShapeError {
                expected: format!("{} indices", self.n_rows),
                actual: format!("{} indices", order.len()),
            });
        }
        let idx = self.column_index(name)?;
        match &mut self.columns[idx] {
            Column::Numeric(values) => {
                let permuted: Vec<f64> = order.iter().map(|&i| values[i]).collect();
                *values = permuted;
            }
            Column::Categorical { codes, .. } => {
                let permuted: Vec<u32> = order.iter().map(|&i| codes[i]).collect();
                *codes = permuted;
            }
        }
        Ok(())
    }

    /// Sample up to `n` rows without replacement, keeping original row order
    pub fn sample_rows(&self, n: usize, seed: u64) -> Dataset {
        if n >= self.n_rows {
            return self.clone();
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut indices: Vec<usize> = sample(&mut rng, self.n_rows, n).into_vec();
        indices.sort_unstable();
        self.select_rows(&indices)
    }

    fn select_rows(&self, indices: &[usize]) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|col| match col {
                Column::Numeric(values) => {
                    Column::Numeric(indices.iter().map(|&i| values[i]).collect())
                }
                Column::Categorical { labels, codes } => Column::Categorical {
                    labels: labels.clone(),
                    codes: indices.iter().map(|&i| codes[i]).collect(),
                },
            })
            .collect();

        Dataset {
            names: self.names.clone(),
            columns,
            n_rows: indices.len(),
        }
    }

    /// Extract the named columns into a row-major feature matrix.
    /// Categorical values contribute their label code.
    pub fn to_matrix(&self, features: &[String]) -> Result<Array2<f64>> {
        let col_data: Vec<&Column> = features
            .iter()
            .map(|name| self.column(name))
            .collect::<Result<Vec<_>>>()?;

        Ok(Array2::from_shape_fn(
            (self.n_rows, features.len()),
            |(r, c)| match col_data[c] {
                Column::Numeric(values) => values[r],
                Column::Categorical { codes, .. } => codes[r] as f64,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> Dataset {
        let mut ds = Dataset::new();
        ds.add_numeric("temp", vec![10.0, 20.0, 30.0]).unwrap();
        ds.add_categorical("season", &["spring", "summer", "spring"])
            .unwrap();
        ds
    }

    #[test]
    fn test_build_and_access() {
        let ds = sample_dataset();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.n_cols(), 2);
        assert_eq!(ds.numeric_values("temp").unwrap(), &[10.0, 20.0, 30.0]);
        assert_eq!(ds.category_labels("season").unwrap(), &["spring", "summer"]);
    }

    #[test]
    fn test_unknown_column() {
        let ds = sample_dataset();
        let err = ds.column("windspeed").unwrap_err();
        assert!(matches!(err, MarginalError::FeatureNotFound(_)));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut ds = sample_dataset();
        let err = ds.add_numeric("hum", vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, MarginalError::ShapeError { .. }));
    }

    #[test]
    fn test_set_numeric_overwrites_all_rows() {
        let mut ds = sample_dataset();
        ds.set_numeric("temp", 5.0).unwrap();
        assert_eq!(ds.numeric_values("temp").unwrap(), &[5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_set_category_requires_observed_label() {
        let mut ds = sample_dataset();
        assert!(ds.set_category("season", "summer").is_ok());
        assert!(ds.set_category("season", "winter").is_err());
    }

    #[test]
    fn test_to_matrix_uses_codes() {
        let ds = sample_dataset();
        let features = vec!["temp".to_string(), "season".to_string()];
        let matrix = ds.to_matrix(&features).unwrap();
        assert_eq!(matrix.shape(), &[3, 2]);
        assert_eq!(matrix[[1, 1]], 1.0); // "summer"
        assert_eq!(matrix[[2, 1]], 0.0); // "spring"
    }

    #[test]
    fn test_sample_rows_is_deterministic() {
        let mut ds = Dataset::new();
        ds.add_numeric("x", (0..100).map(|i| i as f64).collect())
            .unwrap();
        let a = ds.sample_rows(10, 7);
        let b = ds.sample_rows(10, 7);
        assert_eq!(a.n_rows(), 10);
        assert_eq!(
            a.numeric_values("x").unwrap(),
            b.numeric_values("x").unwrap()
        );
    }

    #[test]
    fn test_permute_column() {
        let mut ds = sample_dataset();
        ds.permute_column("temp", &[2, 0, 1]).unwrap();
        assert_eq!(ds.numeric_values("temp").unwrap(), &[30.0, 10.0, 20.0]);
        // other columns untouched
        assert_eq!(ds.category_labels("season").unwrap().len(), 2);
    }
}
