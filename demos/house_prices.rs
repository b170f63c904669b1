//! House-price walkthrough
//!
//! Fits a random forest on synthetic residential sale prices and inspects
//! the joint effect of living area and build year, with the interaction
//! surface restricted to the observed support.

use marginal::data::Dataset;
use marginal::explainability::PartialDependence;
use marginal::training::{RandomForestRegressor, RegressionMetrics};

fn sales() -> anyhow::Result<Dataset> {
    let n = 300;
    let mut ds = Dataset::new();

    // bigger houses tend to be newer, so the corners of the
    // (area, year) rectangle are sparsely observed
    let area: Vec<f64> = (0..n).map(|i| 60.0 + (i % 90) as f64 * 2.5).collect();
    let year: Vec<f64> = area
        .iter()
        .enumerate()
        .map(|(i, a)| 1920.0 + 0.3 * a + (i % 25) as f64)
        .collect();
    let rooms: Vec<f64> = area.iter().map(|a| (a / 30.0).floor() + 1.0).collect();
    let quality: Vec<&str> = (0..n)
        .map(|i| match i % 3 {
            0 => "fair",
            1 => "good",
            _ => "excellent",
        })
        .collect();

    let price: Vec<f64> = (0..n)
        .map(|i| {
            let age_discount = (2010.0 - year[i]) * 300.0;
            let quality_bonus = (i % 3) as f64 * 15000.0;
            1200.0 * area[i] - age_discount + 4000.0 * rooms[i] + quality_bonus
        })
        .collect();

    ds.add_numeric("area", area)?;
    ds.add_numeric("year", year)?;
    ds.add_numeric("rooms", rooms)?;
    ds.add_categorical("quality", &quality)?;
    ds.add_numeric("price", price)?;
    Ok(ds)
}

fn main() -> anyhow::Result<()> {
    let data = sales()?;
    println!("Dataset: {} rows, {} columns", data.n_rows(), data.n_cols());

    let mut forest = RandomForestRegressor::new(100).with_seed(42).with_max_depth(10);
    forest.fit(&data, "price")?;

    let predictions = forest.predict_dataset(&data)?;
    let metrics = RegressionMetrics::compute(data.numeric_values("price")?, &predictions);
    println!("R² (train): {:.4}", metrics.r2);

    let estimator = PartialDependence::new(&forest)
        .with_grid_resolution(8)
        .with_hull_restriction(true);

    let surface = estimator.compute_2d(&data, "area", "year")?;
    let full = surface.grid_1.len() * surface.grid_2.len();
    println!(
        "\nInteraction surface area × year: {} of {} cells inside the observed support",
        surface.cells.len(),
        full
    );
    for cell in surface.cells.iter().take(12) {
        println!(
            "  area {:>7} year {:>7} -> {:>10.0}",
            cell.value_1.to_string(),
            cell.value_2.to_string(),
            cell.average
        );
    }
    if surface.cells.len() > 12 {
        println!("  ... {} more cells", surface.cells.len() - 12);
    }

    // 1D view of the quality grades
    let quality = estimator.compute(&data, "quality")?;
    println!("\nPartial dependence of quality:");
    for (value, avg) in quality.grid.iter().zip(quality.average_predictions.iter()) {
        println!("  {:>10} -> {:>10.0}", value.to_string(), avg);
    }

    Ok(())
}
