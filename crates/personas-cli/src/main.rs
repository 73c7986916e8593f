mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use personas_analysis::{read_document, run_analysis, write_result, PipelineOptions};
use personas_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "personas-cli")]
#[command(about = "Derive behavioral personas from deliberation rounds")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load rounds, cluster participants, and export persona profiles
    Analyze {
        /// Comma-separated round ids, e.g. `3,4` (overrides `PERSONAS_ROUNDS`)
        #[arg(long)]
        rounds: Option<String>,

        /// Directory holding the `GD{n}/` round folders (overrides `PERSONAS_DATA_DIR`)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Where to write the JSON result (overrides `PERSONAS_OUTPUT_PATH`)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Clustering seed (overrides `PERSONAS_SEED`)
        #[arg(long)]
        seed: Option<u64>,

        /// Print the personas without writing the result file
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the personas of a previously exported result
    Report {
        /// Result file to read (defaults to `PERSONAS_OUTPUT_PATH`)
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("personas-cli: run `personas-cli analyze` or `personas-cli --help`");
        return Ok(());
    };

    // Also loads `.env`, so it must run before the filter reads `RUST_LOG`.
    let config = personas_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Analyze {
            rounds,
            data_dir,
            output,
            seed,
            dry_run,
        } => {
            let config = apply_overrides(config, rounds.as_deref(), data_dir, output, seed)?;
            run_analyze(&config, dry_run)
        }
        Commands::Report { input } => {
            let path = input.unwrap_or_else(|| config.output_path.clone());
            let document = read_document(&path)?;
            print!(
                "{}",
                report::render_summary(document.personas.values(), document.total_participants)
            );
            Ok(())
        }
    }
}

/// Layer command-line flags over the env-derived config.
fn apply_overrides(
    mut config: AppConfig,
    rounds: Option<&str>,
    data_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    seed: Option<u64>,
) -> anyhow::Result<AppConfig> {
    if let Some(raw) = rounds {
        config.rounds =
            personas_core::parse_rounds(raw).map_err(|e| anyhow::anyhow!("--rounds: {e}"))?;
    }
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    if let Some(path) = output {
        config.output_path = path;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

fn run_analyze(config: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    tracing::info!(
        data_dir = %config.data_dir.display(),
        rounds = ?config.rounds,
        seed = config.seed,
        "starting persona analysis"
    );

    let run = run_analysis(&PipelineOptions::from_app_config(config))?;
    if let Some(selection) = &run.selection {
        for (k, score) in &selection.scores {
            tracing::debug!(k, score, "silhouette");
        }
    }

    print!(
        "{}",
        report::render_summary(run.result.personas.values(), run.result.total_participants)
    );

    if dry_run {
        println!(
            "dry-run: would write {} personas to {}",
            run.result.personas.len(),
            config.output_path.display()
        );
        return Ok(());
    }

    let summary = write_result(&run.result, &config.output_path)?;
    println!(
        "results saved to {} (sha256 {})",
        summary.path.display(),
        summary.sha256
    );
    Ok(())
}

#[cfg(test)]
mod tests;
