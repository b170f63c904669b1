use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use marginal::data::Dataset;
use marginal::explainability::PartialDependence;
use marginal::Result;
use rand::prelude::*;

fn create_reference_data(n_rows: usize, n_features: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(42);
    let mut ds = Dataset::new();
    for i in 0..n_features {
        let values: Vec<f64> = (0..n_rows).map(|_| rng.gen::<f64>() * 10.0).collect();
        ds.add_numeric(&format!("feature_{}", i), values).unwrap();
    }
    ds
}

fn sum_predictor(data: &Dataset) -> Result<Vec<f64>> {
    let names: Vec<String> = data.feature_names().to_vec();
    let matrix = data.to_matrix(&names)?;
    Ok(matrix
        .rows()
        .into_iter()
        .map(|row| row.iter().map(|v| (v * 0.3).sin() + v).sum())
        .collect())
}

fn bench_grid_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_resolution");
    let ds = create_reference_data(2000, 8);

    for resolution in [10, 20, 50].iter() {
        group.bench_with_input(
            BenchmarkId::new("compute_1d", resolution),
            resolution,
            |b, &resolution| {
                let estimator =
                    PartialDependence::new(&sum_predictor).with_grid_resolution(resolution);
                b.iter(|| estimator.compute(black_box(&ds), "feature_0").unwrap())
            },
        );
    }

    group.finish();
}

fn bench_background_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("background_size");
    group.sample_size(20);

    for n_rows in [500, 2000, 10000].iter() {
        let ds = create_reference_data(*n_rows, 8);

        group.bench_with_input(BenchmarkId::new("compute_1d", n_rows), &ds, |b, ds| {
            let estimator = PartialDependence::new(&sum_predictor).with_grid_resolution(20);
            b.iter(|| estimator.compute(black_box(ds), "feature_0").unwrap())
        });

        group.bench_with_input(BenchmarkId::new("compute_2d", n_rows), &ds, |b, ds| {
            let estimator = PartialDependence::new(&sum_predictor).with_grid_resolution(10);
            b.iter(|| {
                estimator
                    .compute_2d(black_box(ds), "feature_0", "feature_1")
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grid_resolution, bench_background_size);
criterion_main!(benches);
