//! Loading tabular files into a typed [`Dataset`]

use crate::data::Dataset;
use crate::error::{MarginalError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Data loader for CSV, Parquet and JSON files
pub struct DataLoader {
    has_header: bool,
    delimiter: u8,
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            infer_schema_length: Some(1000),
        }
    }

    /// Set whether CSV input carries a header row
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set the CSV field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load a file, picking the reader from the extension
    pub fn load(&self, path: &Path) -> Result<Dataset> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let df = match ext {
            "csv" => self.read_csv(path)?,
            "parquet" => self.read_parquet(path)?,
            "json" => self.read_json(path)?,
            _ => {
                return Err(MarginalError::DataError(format!(
                    "unsupported file format: '{}'",
                    ext
                )))
            }
        };
        debug!(
            rows = df.height(),
            cols = df.width(),
            path = %path.display(),
            "loaded dataframe"
        );
        Dataset::from_dataframe(&df)
    }

    /// Load a CSV file
    pub fn load_csv(&self, path: &Path) -> Result<Dataset> {
        let df = self.read_csv(path)?;
        Dataset::from_dataframe(&df)
    }

    /// Load a Parquet file
    pub fn load_parquet(&self, path: &Path) -> Result<Dataset> {
        let df = self.read_parquet(path)?;
        Dataset::from_dataframe(&df)
    }

    /// Load a JSON file
    pub fn load_json(&self, path: &Path) -> Result<Dataset> {
        let df = self.read_json(path)?;
        Dataset::from_dataframe(&df)
    }

    fn read_csv(&self, path: &Path) -> Result<DataFrame> {
        let file = File::open(path)?;
        let parse_opts = CsvParseOptions::default().with_separator(self.delimiter);
        let df = CsvReadOptions::default()
            .with_has_header(self.has_header)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()?;
        Ok(df)
    }

    fn read_parquet(&self, path: &Path) -> Result<DataFrame> {
        let file = File::open(path)?;
        Ok(ParquetReader::new(file).finish()?)
    }

    fn read_json(&self, path: &Path) -> Result<DataFrame> {
        let file = File::open(path)?;
        Ok(JsonReader::new(file).finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rentals.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "temp,season,count").unwrap();
        writeln!(file, "10.5,spring,120").unwrap();
        writeln!(file, "21.0,summer,340").unwrap();
        writeln!(file, "8.2,spring,90").unwrap();

        let ds = DataLoader::new().load(&path).unwrap();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.feature_names(), &["temp", "season", "count"]);
        assert!(ds.column("temp").unwrap().is_numeric());
        assert_eq!(ds.category_labels("season").unwrap(), &["spring", "summer"]);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = DataLoader::new()
            .load(Path::new("data.xlsx"))
            .unwrap_err();
        assert!(matches!(err, MarginalError::DataError(_)));
    }
}
