//! Integration test: CSV file → dataset → forest → feature-effect analyses

use marginal::data::DataLoader;
use marginal::explainability::{PartialDependence, PermutationImportance};
use marginal::training::RandomForestRegressor;
use std::io::Write;

fn write_rentals_csv(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("rentals.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "temp,hum,season,count").unwrap();
    for i in 0..40 {
        let temp = 5.0 + i as f64 * 0.7;
        let hum = 85.0 - (i % 12) as f64 * 2.0;
        let season = match (i / 10) % 4 {
            0 => "winter",
            1 => "spring",
            2 => "summer",
            _ => "autumn",
        };
        let count = 12.0 * temp - 0.8 * hum + 40.0;
        writeln!(file, "{},{},{},{}", temp, hum, season, count).unwrap();
    }
    path
}

#[test]
fn csv_to_pdp_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_rentals_csv(dir.path());

    let dataset = DataLoader::new().load(&path).unwrap();
    assert_eq!(dataset.n_rows(), 40);
    assert_eq!(dataset.category_labels("season").unwrap().len(), 4);

    let mut forest = RandomForestRegressor::new(30).with_seed(42);
    forest.fit(&dataset, "count").unwrap();

    let estimator = PartialDependence::new(&forest).with_grid_resolution(10);

    // numeric feature: resolution-sized grid, monotone-increasing effect
    let temp_pdp = estimator.compute(&dataset, "temp").unwrap();
    assert_eq!(temp_pdp.grid.len(), 10);
    assert!(
        temp_pdp.average_predictions.last().unwrap()
            > temp_pdp.average_predictions.first().unwrap()
    );

    // categorical feature: one grid point per observed label
    let season_pdp = estimator.compute(&dataset, "season").unwrap();
    assert_eq!(season_pdp.grid.len(), 4);

    // batch mirrors individual computations
    let batch = estimator
        .compute_batch(&dataset, &["temp".to_string(), "hum".to_string()])
        .unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].average_predictions, temp_pdp.average_predictions);
}

#[test]
fn csv_to_interaction_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_rentals_csv(dir.path());
    let dataset = DataLoader::new().load(&path).unwrap();

    let mut forest = RandomForestRegressor::new(20).with_seed(42);
    forest.fit(&dataset, "count").unwrap();

    let unrestricted = PartialDependence::new(&forest)
        .with_grid_resolution(6)
        .compute_2d(&dataset, "temp", "hum")
        .unwrap();
    assert_eq!(unrestricted.cells.len(), 36);

    let restricted = PartialDependence::new(&forest)
        .with_grid_resolution(6)
        .with_hull_restriction(true)
        .compute_2d(&dataset, "temp", "hum")
        .unwrap();
    assert!(restricted.cells.len() <= unrestricted.cells.len());
    assert!(!restricted.cells.is_empty());
}

#[test]
fn csv_to_importance_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_rentals_csv(dir.path());
    let dataset = DataLoader::new().load(&path).unwrap();

    let mut forest = RandomForestRegressor::new(30).with_seed(42);
    forest.fit(&dataset, "count").unwrap();

    let result = PermutationImportance::new(&forest)
        .with_n_repeats(3)
        .with_seed(42)
        .compute(&dataset, "count")
        .unwrap();

    assert_eq!(result.features, vec!["temp", "hum", "season"]);
    // temp dominates the generating function
    let top = result.top_k(1);
    assert_eq!(top[0].0, "temp");
}

#[test]
fn background_sampling_caps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_rentals_csv(dir.path());
    let dataset = DataLoader::new().load(&path).unwrap();

    let sampled = dataset.sample_rows(15, 42);
    assert_eq!(sampled.n_rows(), 15);
    assert_eq!(sampled.feature_names(), dataset.feature_names());

    let mut forest = RandomForestRegressor::new(10).with_seed(42);
    forest.fit(&dataset, "count").unwrap();

    let pdp = PartialDependence::new(&forest)
        .with_grid_resolution(5)
        .compute(&sampled, "temp")
        .unwrap();
    assert_eq!(pdp.grid.len(), 5);
}
