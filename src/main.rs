use std::{
    path::{Path, PathBuf},
    process,
};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use dasdge::{list_tsv_files, AbsentSide, Accumulation, DasDge, OrderConfig, DEFAULT_ALPHA};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dasdge")]
#[command(author, version, about = "Compare DAS and DGE GO enrichment across samples")]
struct Cli {
    /// Directory holding one enrichment table (*.tsv) per sample
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// How to record a GO term seen on only one side in a table [zero-fill, exclude]
    #[arg(long, default_value = "zero-fill")]
    absent_side: AbsentSide,

    /// Report order of significant GO terms [discovery, significance]
    #[arg(long, default_value = "discovery")]
    order: OrderConfig,

    /// Significance threshold after Bonferroni correction
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    alpha: f64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli, input_dir: &Path) -> Result<()> {
    info!("Searching {} for enrichment tables", input_dir.display());
    let files = list_tsv_files(input_dir)
        .with_context(|| format!("listing {}", input_dir.display()))?;
    info!("Found {} input files", files.len());

    let accumulation = Accumulation::from_files(&files, cli.absent_side)?;
    if accumulation.is_empty() {
        warn!("No GO terms found in {}", input_dir.display());
    }

    let runner = DasDge::builder()
        .alpha(cli.alpha)
        .order(cli.order)
        .build();
    let results = runner.run(&accumulation);
    info!(
        "{} of {} GO terms significant at alpha {} ({} skipped)",
        results.len(),
        results.n_tests,
        runner.alpha(),
        results.n_degenerate
    );

    results.pprint().context("writing results")?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(input_dir) = cli.input_dir.as_deref() else {
        println!("Need to provide the path to a directory of enrichment tables with -i");
        println!("{}", Cli::command().render_usage());
        process::exit(1);
    };
    if !input_dir.is_dir() {
        eprintln!("-i argument ({}) was not a directory", input_dir.display());
        process::exit(1);
    }

    if let Err(e) = run(&cli, input_dir) {
        error!(error = %e, "Run failed");
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
