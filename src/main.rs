//! Farmbucket command line entry

// Use jemalloc as global allocator
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

use clap::{Parser, Subcommand};
use farmbucket::{BucketConfig, Bucketer, DelimitedSource, Evaluator, Report};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEMO_IDS: [&str; 3] = ["1234-5678-ABCD", "A1B2C3D4", "xyz-987"];

#[derive(Parser, Debug)]
#[command(name = "farmbucket")]
#[command(about = "Warehouse-compatible FarmHash bucketing and accuracy check")]
struct Args {
    /// JSON config file; unset fields keep their defaults
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    experiment_key: Option<String>,

    #[arg(long, global = true)]
    salt: Option<String>,

    /// Number of buckets
    #[arg(long, global = true)]
    buckets: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare computed buckets with the last column of an export
    Evaluate {
        /// Export file; defaults to the configured path
        csv_path: Option<PathBuf>,

        /// Bucket rows on the rayon thread pool
        #[arg(short = 'p', long)]
        parallel: bool,

        /// Print only the summary
        #[arg(short = 'q', long)]
        quiet: bool,
    },
    /// Print the bucket of each identifier
    Bucket {
        ids: Vec<String>,
    },
}

fn build_config(args: &Args) -> Result<BucketConfig, String> {
    let mut config = match &args.config {
        Some(path) => BucketConfig::load(path)
            .map_err(|e| format!("Failed to load config {}: {}", path.display(), e))?,
        None => BucketConfig::default(),
    };
    if let Some(key) = &args.experiment_key {
        config.experiment_key = key.clone();
    }
    if let Some(salt) = &args.salt {
        config.salt = salt.clone();
    }
    if let Some(buckets) = args.buckets {
        config.bucket_count = buckets;
    }
    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {}", e))?;
    Ok(config)
}

fn run_evaluate(
    config: BucketConfig,
    csv_path: Option<PathBuf>,
    parallel: bool,
    quiet: bool,
) -> Result<(), String> {
    let csv_path = csv_path.unwrap_or_else(|| config.default_csv_path.clone());
    let source = DelimitedSource::new(&csv_path, config.delimiter);
    let rows = source
        .read()
        .map_err(|e| format!("Failed to read CSV at {}: {}", csv_path.display(), e))?;

    let evaluator = Evaluator::new(Bucketer::new(config).map_err(|e| e.to_string())?);
    let result = if parallel {
        evaluator.evaluate_rows_parallel(&rows.rows)
    } else {
        evaluator.evaluate_rows(&rows.rows)
    };

    print!("{}", Report::new(&rows, &result).with_trace(!quiet));
    Ok(())
}

fn run_bucket(config: BucketConfig, ids: Vec<String>) -> Result<(), String> {
    let bucketer = Bucketer::new(config).map_err(|e| e.to_string())?;
    let ids = if ids.is_empty() {
        DEMO_IDS.iter().map(|id| id.to_string()).collect()
    } else {
        ids
    };
    for id in &ids {
        println!("adid={} bucket={}", id, bucketer.bucket(id));
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let outcome = build_config(&args).and_then(|config| match args.command {
        Command::Evaluate {
            csv_path,
            parallel,
            quiet,
        } => run_evaluate(config, csv_path, parallel, quiet),
        Command::Bucket { ids } => run_bucket(config, ids),
    });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{}", msg);
            ExitCode::FAILURE
        }
    }
}
