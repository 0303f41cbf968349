//! drugraph - link drug mentions to clinical trials and PubMed articles
//!
//! Reads the configured source files, writes raw snapshots and the
//! drug/publication link graph.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use drugraph::PipelineConfig;
use drugraph::logging::init_logging;
use drugraph::pipeline::Pipeline;
use drugraph::storage::FsStorage;

#[derive(Parser)]
#[command(name = "drugraph")]
#[command(about = "Link drug mentions to clinical trials and PubMed publications")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file path (default: ./config/config.yaml or ./config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Extra attempts per task after a failure
    #[arg(long, global = true)]
    retries: Option<u32>,

    /// Override the link graph output path
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Run every task and write the link graph
    Run,
    /// Merge the PubMed CSV and JSON exports into one CSV
    Consolidate,
    /// Show the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.debug);

    let storage = FsStorage;
    let mut config = PipelineConfig::load(&storage, cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(retries) = cli.retries {
        config.retries = retries;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }

    match cli.command {
        Command::Run => {
            let summary = Pipeline::new(config, &storage)
                .run()
                .context("pipeline run failed")?;
            println!("{summary}");
            Ok(())
        }
        Command::Consolidate => {
            let path = config.consolidated_path.clone();
            let table = Pipeline::new(config, &storage)
                .consolidate_pubmed()
                .context("pubmed consolidation failed")?;
            log::info!("done: {} article(s) in {}", table.len(), path.display());
            Ok(())
        }
        Command::Config => {
            print!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}
