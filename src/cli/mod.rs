//! Command-line interface
//!
//! Each analysis command loads a dataset, fits a seeded random forest on
//! the named target and prints aligned tables; no plotting is done here.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::data::{Column, DataLoader, Dataset};
use crate::explainability::{PartialDependence, Pdp2dResult, PdpResult, PermutationImportance};
use crate::training::{RandomForestRegressor, RegressionMetrics};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString {
    s.truecolor(100, 100, 100)
}

fn accent(s: &str) -> ColoredString {
    s.truecolor(120, 170, 255)
}

fn muted(s: &str) -> ColoredString {
    s.truecolor(140, 140, 140)
}

fn ok(s: &str) -> ColoredString {
    s.truecolor(100, 210, 120)
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "marginal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Partial dependence and importance analysis for tabular regression")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show dataset schema and column summaries
    Info {
        /// Input data file (CSV, JSON, or Parquet)
        #[arg(short, long)]
        data: PathBuf,
    },

    /// 1D partial dependence of one or more features
    Pdp {
        /// Input data file (CSV, JSON, or Parquet)
        #[arg(short, long)]
        data: PathBuf,

        /// Target column name
        #[arg(short, long)]
        target: String,

        /// Comma-separated feature names to analyse
        #[arg(short, long, value_delimiter = ',')]
        features: Vec<String>,

        /// Grid points for numeric features
        #[arg(long, default_value = "20")]
        grid_resolution: usize,

        /// Cap on background rows (sampled without replacement)
        #[arg(long)]
        sample: Option<usize>,

        /// Random seed for sampling and model fitting
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Number of trees in the forest
        #[arg(long, default_value = "100")]
        trees: usize,

        /// Maximum tree depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Write results to a .json or .csv file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 2D partial dependence surface for a feature pair
    Interaction {
        /// Input data file (CSV, JSON, or Parquet)
        #[arg(short, long)]
        data: PathBuf,

        /// Target column name
        #[arg(short, long)]
        target: String,

        /// Exactly two comma-separated feature names
        #[arg(short, long, value_delimiter = ',')]
        features: Vec<String>,

        /// Exclude grid cells outside the observed support
        #[arg(long)]
        hull: bool,

        /// Grid points per numeric feature
        #[arg(long, default_value = "20")]
        grid_resolution: usize,

        /// Cap on background rows (sampled without replacement)
        #[arg(long)]
        sample: Option<usize>,

        /// Random seed for sampling and model fitting
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Number of trees in the forest
        #[arg(long, default_value = "100")]
        trees: usize,

        /// Maximum tree depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Write results to a .json or .csv file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Permutation importance of every feature
    Importance {
        /// Input data file (CSV, JSON, or Parquet)
        #[arg(short, long)]
        data: PathBuf,

        /// Target column name
        #[arg(short, long)]
        target: String,

        /// Number of permutation repeats
        #[arg(long, default_value = "5")]
        repeats: usize,

        /// Cap on background rows (sampled without replacement)
        #[arg(long)]
        sample: Option<usize>,

        /// Random seed for sampling, fitting and permutation
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Number of trees in the forest
        #[arg(long, default_value = "100")]
        trees: usize,

        /// Maximum tree depth
        #[arg(long)]
        max_depth: Option<usize>,
    },
}

// ─── Shared steps ──────────────────────────────────────────────────────────────

fn load_dataset(path: &Path, sample: Option<usize>, seed: u64) -> anyhow::Result<Dataset> {
    step_run("Loading data");
    let start = Instant::now();
    let mut dataset = DataLoader::new().load(path)?;
    step_done(&format!(
        "{} rows × {} cols in {:?}",
        dataset.n_rows(),
        dataset.n_cols(),
        start.elapsed()
    ));

    if let Some(n) = sample {
        if n < dataset.n_rows() {
            dataset = dataset.sample_rows(n, seed);
            println!(
                "  {} background capped at {} rows",
                accent("›"),
                dataset.n_rows()
            );
        }
    }
    Ok(dataset)
}

fn fit_forest(
    dataset: &Dataset,
    target: &str,
    trees: usize,
    max_depth: Option<usize>,
    seed: u64,
) -> anyhow::Result<RandomForestRegressor> {
    step_run(&format!("Fitting forest on {}", target.cyan()));
    let start = Instant::now();

    let mut forest = RandomForestRegressor::new(trees).with_seed(seed);
    if let Some(d) = max_depth {
        forest = forest.with_max_depth(d);
    }
    forest.fit(dataset, target)?;
    step_done(&format!("{} trees in {:?}", forest.n_trees(), start.elapsed()));

    let predictions = forest.predict_dataset(dataset)?;
    let metrics = RegressionMetrics::compute(dataset.numeric_values(target)?, &predictions);
    println!(
        "  {:<16} {}",
        muted("R² (train)"),
        format!("{:.4}", metrics.r2).white().bold()
    );
    println!(
        "  {:<16} {}",
        muted("RMSE (train)"),
        format!("{:.4}", metrics.rmse).white()
    );

    Ok(forest)
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    section("Data Info");

    let dataset = DataLoader::new().load(data_path)?;

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), dataset.n_rows());
    println!("  {:<12} {}", muted("Columns"), dataset.n_cols());
    println!();

    println!(
        "  {:<20} {:<12} {}",
        muted("Column"),
        muted("Type"),
        muted("Summary")
    );
    println!("  {}", dim(&"─".repeat(56)));

    for name in dataset.feature_names() {
        match dataset.column(name)? {
            Column::Numeric(values) => {
                let finite: Vec<f64> =
                    values.iter().copied().filter(|v| v.is_finite()).collect();
                let summary = if finite.is_empty() {
                    "no finite values".to_string()
                } else {
                    let min = finite.iter().cloned().fold(f64::INFINITY, f64::min);
                    let max = finite.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                    format!("[{:.3}, {:.3}]", min, max)
                };
                println!("  {:<20} {:<12} {}", name, "numeric", dim(&summary));
            }
            Column::Categorical { labels, .. } => {
                let mut preview = labels
                    .iter()
                    .take(4)
                    .map(|l| l.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                if labels.len() > 4 {
                    preview.push_str(", …");
                }
                println!(
                    "  {:<20} {:<12} {}",
                    name,
                    "categorical",
                    dim(&format!("{} labels: {}", labels.len(), preview))
                );
            }
        }
    }

    println!();
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_pdp(
    data_path: &Path,
    target: &str,
    features: &[String],
    grid_resolution: usize,
    sample: Option<usize>,
    seed: u64,
    trees: usize,
    max_depth: Option<usize>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    section("Partial Dependence");

    if features.is_empty() {
        anyhow::bail!("at least one feature is required");
    }

    let dataset = load_dataset(data_path, sample, seed)?;
    let forest = fit_forest(&dataset, target, trees, max_depth, seed)?;

    let estimator = PartialDependence::new(&forest).with_grid_resolution(grid_resolution);
    let results = estimator.compute_batch(&dataset, features)?;

    for result in &results {
        println!();
        println!("  {}", result.feature.white().bold());
        println!(
            "  {:>14} {:>14} {:>12}",
            muted("value"),
            muted("avg pred"),
            muted("std")
        );
        for ((value, avg), std) in result
            .grid
            .iter()
            .zip(result.average_predictions.iter())
            .zip(result.std_predictions.iter())
        {
            println!("  {:>14} {:>14.4} {:>12.4}", value.to_string(), avg, std);
        }
    }

    if let Some(path) = output {
        export_pdp(&results, path)?;
        println!();
        println!("  {} wrote {}", ok("✓"), path.display());
    }

    println!();
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_interaction(
    data_path: &Path,
    target: &str,
    features: &[String],
    hull: bool,
    grid_resolution: usize,
    sample: Option<usize>,
    seed: u64,
    trees: usize,
    max_depth: Option<usize>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    section("Interaction Surface");

    if features.len() != 2 {
        anyhow::bail!("exactly two features are required, got {}", features.len());
    }

    let dataset = load_dataset(data_path, sample, seed)?;
    let forest = fit_forest(&dataset, target, trees, max_depth, seed)?;

    let estimator = PartialDependence::new(&forest)
        .with_grid_resolution(grid_resolution)
        .with_hull_restriction(hull);
    let result = estimator.compute_2d(&dataset, &features[0], &features[1])?;

    let full = result.grid_1.len() * result.grid_2.len();
    println!();
    println!(
        "  {} × {} grid, {} cells evaluated{}",
        result.grid_1.len(),
        result.grid_2.len(),
        result.cells.len(),
        if result.cells.len() < full {
            format!(" ({} outside hull)", full - result.cells.len())
        } else {
            String::new()
        }
    );
    println!();
    println!(
        "  {:>14} {:>14} {:>14} {:>12}",
        muted(&result.features.0),
        muted(&result.features.1),
        muted("avg pred"),
        muted("std")
    );
    for cell in &result.cells {
        println!(
            "  {:>14} {:>14} {:>14.4} {:>12.4}",
            cell.value_1.to_string(),
            cell.value_2.to_string(),
            cell.average,
            cell.std
        );
    }

    if let Some(path) = output {
        export_interaction(&result, path)?;
        println!();
        println!("  {} wrote {}", ok("✓"), path.display());
    }

    println!();
    Ok(())
}

pub fn cmd_importance(
    data_path: &Path,
    target: &str,
    repeats: usize,
    sample: Option<usize>,
    seed: u64,
    trees: usize,
    max_depth: Option<usize>,
) -> anyhow::Result<()> {
    section("Permutation Importance");

    let dataset = load_dataset(data_path, sample, seed)?;
    let forest = fit_forest(&dataset, target, trees, max_depth, seed)?;

    step_run(&format!("Permuting columns ({} repeats)", repeats));
    let start = Instant::now();
    let result = PermutationImportance::new(&forest)
        .with_n_repeats(repeats)
        .with_seed(seed)
        .compute(&dataset, target)?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    println!(
        "  {:<20} {:>14} {:>12}",
        muted("Feature"),
        muted("ΔMSE"),
        muted("std")
    );
    println!("  {}", dim(&"─".repeat(48)));
    for idx in result.sorted_indices() {
        println!(
            "  {:<20} {:>14.4} {:>12.4}",
            result.features[idx],
            result.importances_mean[idx],
            result.importances_std[idx]
        );
    }

    println!();
    Ok(())
}

// ─── Export ────────────────────────────────────────────────────────────────────

fn export_pdp(results: &[PdpResult], path: &Path) -> anyhow::Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "json" => {
            std::fs::write(path, serde_json::to_string_pretty(results)?)?;
        }
        "csv" => {
            let mut out = String::from("feature,value,average,std\n");
            for result in results {
                for ((value, avg), std) in result
                    .grid
                    .iter()
                    .zip(result.average_predictions.iter())
                    .zip(result.std_predictions.iter())
                {
                    out.push_str(&format!("{},{},{},{}\n", result.feature, value, avg, std));
                }
            }
            std::fs::write(path, out)?;
        }
        _ => anyhow::bail!("unsupported output format: '{}', use .json or .csv", ext),
    }
    Ok(())
}

fn export_interaction(result: &Pdp2dResult, path: &Path) -> anyhow::Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "json" => {
            std::fs::write(path, serde_json::to_string_pretty(result)?)?;
        }
        "csv" => {
            let mut out = format!("{},{},average,std\n", result.features.0, result.features.1);
            for cell in &result.cells {
                out.push_str(&format!(
                    "{},{},{},{}\n",
                    cell.value_1, cell.value_2, cell.average, cell.std
                ));
            }
            std::fs::write(path, out)?;
        }
        _ => anyhow::bail!("unsupported output format: '{}', use .json or .csv", ext),
    }
    Ok(())
}
