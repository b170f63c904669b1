//! marginal - entry point

use clap::Parser;
use marginal::cli::{cmd_importance, cmd_info, cmd_interaction, cmd_pdp, Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marginal=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { data } => {
            cmd_info(&data)?;
        }
        Commands::Pdp {
            data,
            target,
            features,
            grid_resolution,
            sample,
            seed,
            trees,
            max_depth,
            output,
        } => {
            cmd_pdp(
                &data,
                &target,
                &features,
                grid_resolution,
                sample,
                seed,
                trees,
                max_depth,
                output.as_deref(),
            )?;
        }
        Commands::Interaction {
            data,
            target,
            features,
            hull,
            grid_resolution,
            sample,
            seed,
            trees,
            max_depth,
            output,
        } => {
            cmd_interaction(
                &data,
                &target,
                &features,
                hull,
                grid_resolution,
                sample,
                seed,
                trees,
                max_depth,
                output.as_deref(),
            )?;
        }
        Commands::Importance {
            data,
            target,
            repeats,
            sample,
            seed,
            trees,
            max_depth,
        } => {
            cmd_importance(&data, &target, repeats, sample, seed, trees, max_depth)?;
        }
    }

    Ok(())
}
