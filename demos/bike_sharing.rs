//! Bicycle-rental walkthrough
//!
//! Builds a synthetic daily-rentals dataset, fits a random forest on the
//! rental count and prints the partial dependence of the weather features.

use marginal::data::Dataset;
use marginal::explainability::{PartialDependence, PermutationImportance};
use marginal::training::{RandomForestRegressor, RegressionMetrics};

fn rentals() -> anyhow::Result<Dataset> {
    let n = 200;
    let mut ds = Dataset::new();

    let temp: Vec<f64> = (0..n).map(|i| 2.0 + 28.0 * ((i as f64 / 30.0).sin() * 0.5 + 0.5)).collect();
    let hum: Vec<f64> = (0..n).map(|i| 45.0 + (i % 40) as f64).collect();
    let windspeed: Vec<f64> = (0..n).map(|i| 3.0 + (i % 17) as f64 * 1.5).collect();
    let season: Vec<&str> = (0..n)
        .map(|i| match (i / 50) % 4 {
            0 => "winter",
            1 => "spring",
            2 => "summer",
            _ => "autumn",
        })
        .collect();

    // rentals peak in mild weather and drop with wind and humidity
    let count: Vec<f64> = (0..n)
        .map(|i| {
            let comfort = -((temp[i] - 22.0) / 8.0).powi(2);
            600.0 * comfort.exp() - 2.0 * hum[i] - 8.0 * windspeed[i] + 400.0
        })
        .collect();

    ds.add_numeric("temp", temp)?;
    ds.add_numeric("hum", hum)?;
    ds.add_numeric("windspeed", windspeed)?;
    ds.add_categorical("season", &season)?;
    ds.add_numeric("count", count)?;
    Ok(ds)
}

fn main() -> anyhow::Result<()> {
    let data = rentals()?;
    println!("Dataset: {} rows, {} columns", data.n_rows(), data.n_cols());

    let mut forest = RandomForestRegressor::new(100).with_seed(42).with_max_depth(8);
    forest.fit(&data, "count")?;

    let predictions = forest.predict_dataset(&data)?;
    let metrics = RegressionMetrics::compute(data.numeric_values("count")?, &predictions);
    println!("R² (train): {:.4}", metrics.r2);

    // which features matter?
    let importance = PermutationImportance::new(&forest)
        .with_n_repeats(5)
        .with_seed(42)
        .compute(&data, "count")?;
    println!("\nPermutation importance:");
    for (feature, score) in importance.top_k(4) {
        println!("  {:<12} {:>10.2}", feature, score);
    }

    // marginal effect of each weather feature
    let estimator = PartialDependence::new(&forest).with_grid_resolution(10);
    for feature in ["temp", "hum", "windspeed", "season"] {
        let pdp = estimator.compute(&data, feature)?;
        println!("\nPartial dependence of {}:", feature);
        for (value, avg) in pdp.grid.iter().zip(pdp.average_predictions.iter()) {
            println!("  {:>10} -> {:>8.1}", value.to_string(), avg);
        }
    }

    Ok(())
}
