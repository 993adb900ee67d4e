//! Climate hazard pipeline service.
//!
//! Reads normalized gridded reanalysis stores and writes per-indicator and
//! per-return-period hazard maps, skipping any artifact that already exists.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use hazard_pipeline::config::PipelineConfig;
use hazard_pipeline::pipeline;

#[derive(Parser, Debug)]
#[command(name = "hazard-pipeline")]
#[command(about = "Gridded climate indicator and extreme-value engine")]
struct Args {
    /// Configuration file path (YAML); environment variables are used when
    /// no file is given
    #[arg(short, long)]
    config: Option<String>,

    /// Override the input directory
    #[arg(long)]
    input_dir: Option<String>,

    /// Override the output directory
    #[arg(long)]
    output_dir: Option<String>,

    /// Recompute and replace existing artifacts
    #[arg(long)]
    overwrite: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting climate hazard pipeline");

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_yaml(path)?,
        None => PipelineConfig::from_env(),
    };
    if let Some(dir) = args.input_dir {
        config.input_dir = dir.into();
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir.into();
    }
    if args.overwrite {
        config.overwrite = true;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    info!(
        input = %config.input_dir.display(),
        output = %config.output_dir.display(),
        overwrite = config.overwrite,
        "Loaded configuration"
    );

    let summary = pipeline::run(&config)?;

    info!(
        datasets = summary.datasets_processed,
        skipped = summary.datasets_skipped,
        computed = summary.artifacts_computed,
        cached = summary.artifacts_cached,
        failed = summary.artifacts_failed,
        "Pipeline finished"
    );

    Ok(())
}
