use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use blastfilt::{run, PipelineConfig, DEFAULT_FULL_LENGTH_PCT};
use clap::Parser;
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(
    name = "blastfilt",
    version,
    about = "Filter BLAST results of OTU sequences checked against themselves and each other"
)]
struct Cli {
    /// Tab separated BLAST results with a header line (may be gzip, bz2 or xz compressed)
    input: PathBuf,
    /// Directory the five reports are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
    /// Alignments covering more than this percentage of the query are full length
    #[arg(short = 't', long, default_value_t = DEFAULT_FULL_LENGTH_PCT)]
    full_length_pct: f64,
    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,
}

fn init_log(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

fn execute(cli: Cli) -> Result<()> {
    let config = PipelineConfig {
        input: cli.input,
        output_dir: cli.output_dir,
        full_length_pct: cli.full_length_pct,
        ..PipelineConfig::new(PathBuf::new())
    };

    let summary = run(&config)
        .with_context(|| format!("Failed to process '{}'", config.input.display()))?;

    println!(
        "{}: {} rows, {} self-matches removed, {} skipped",
        config.input.display(),
        summary.loaded,
        summary.self_matches,
        summary.diagnostics.len()
    );
    for (output, path, rows) in summary.outputs.iter() {
        println!("{}\t{}\t{}", output.label(), rows, path.display());
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_log(cli.verbose);

    if let Err(e) = execute(cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
