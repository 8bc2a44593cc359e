// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use pressroom::utils::logging::{format_error, format_step, format_success, init_logger};
use pressroom::{
    Config, ContentParser, FingerprintStore, JsonExporter, PageBuilder, PipelineDriver,
    PipelineError, PipelineStats, ProgressTracker, SourceScanner, compute_fingerprint,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "pressroom")]
#[command(version = "0.1.0")]
#[command(about = "Build-time content pipeline: front matter, Markdown, highlighting", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and export built pages as JSON
    Build {
        #[arg(long)]
        force: bool,

        #[arg(long, value_name = "NUM")]
        limit: Option<usize>,
    },

    /// Parse and decode every source file without building anything
    Check,

    /// Print the current source fingerprint and whether a rebuild is due
    Fingerprint,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logger(cli.color, cli.verbose);

    info!("Pressroom content pipeline");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Build { force, limit } => {
            cmd_build(&config, force, limit, cli.color).await?;
        }
        Commands::Check => {
            cmd_check(&config).await?;
        }
        Commands::Fingerprint => {
            cmd_fingerprint(&config).await?;
        }
    }

    Ok(())
}

async fn scan_sources(config: &Config) -> Result<Vec<PathBuf>> {
    let sources = config.sources.clone();
    tokio::task::spawn_blocking(move || SourceScanner::new(sources).scan())
        .await
        .context("File scanning task failed")?
        .context("Source discovery failed")
}

async fn cmd_build(config: &Config, force: bool, limit: Option<usize>, color: bool) -> Result<()> {
    info!("Starting build");

    let mut paths = scan_sources(config).await?;
    if let Some(limit) = limit {
        paths.truncate(limit);
    }

    if paths.is_empty() {
        warn!("No source files found under {}", config.sources.root.display());
        return Ok(());
    }

    let fingerprint = compute_fingerprint(&paths).context("Fingerprinting sources failed")?;
    let store = FingerprintStore::new(&config.pipeline.fingerprint_path);

    let effective_force = force || config.pipeline.force_rebuild;
    if !effective_force && !store.is_stale(&fingerprint)? {
        println!("{}", format_success("Sources unchanged, nothing to build"));
        return Ok(());
    }

    println!("{}", format_step(1, 2, &format!("Building {} files", paths.len())));
    let progress = Arc::new(ProgressTracker::with_color(paths.len(), color));
    let driver = PipelineDriver::new(config.clone(), PageBuilder::new());
    let pages = driver
        .run(paths, progress.clone())
        .await
        .context("Pipeline run failed")?;

    println!("{}", format_step(2, 2, &format!("Exporting {} pages", pages.len())));
    let exporter = JsonExporter::new(&config.export.output_dir)?;
    let manifest = exporter.export(&pages, config.export.pretty)?;

    store.store(&fingerprint)?;

    let stats = progress.get_stats();
    progress.finish();
    log_final_stats(&stats);

    println!(
        "{}",
        format_success(&format!(
            "Built {} pages into {}",
            manifest.total_pages,
            config.export.output_dir.display()
        ))
    );

    Ok(())
}

async fn cmd_check(config: &Config) -> Result<()> {
    info!("Checking source files");

    let paths = scan_sources(config).await?;
    if paths.is_empty() {
        warn!("No source files found under {}", config.sources.root.display());
        return Ok(());
    }

    let parser = ContentParser::new();
    let mut failures = 0usize;

    for path in &paths {
        let outcome = fs::read_to_string(path)
            .map_err(|source| PipelineError::FileOperation {
                path: path.clone(),
                source,
            })
            .and_then(|raw| parser.parse(path, &raw));

        match outcome {
            Ok(units) => {
                println!(
                    "{}",
                    format_success(&format!("{} ({} unit(s))", path.display(), units.len()))
                );
            }
            Err(e) => {
                failures += 1;
                println!("{}", format_error(&e.to_string()));
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} files failed to parse", paths.len());
    }

    println!("{}", format_success(&format!("All {} files parse cleanly", paths.len())));
    Ok(())
}

async fn cmd_fingerprint(config: &Config) -> Result<()> {
    let paths = scan_sources(config).await?;
    let fingerprint = compute_fingerprint(&paths).context("Fingerprinting sources failed")?;
    let store = FingerprintStore::new(&config.pipeline.fingerprint_path);
    let stale = store.is_stale(&fingerprint)?;

    println!("{fingerprint}");
    println!(
        "{} files, rebuild needed: {}",
        paths.len(),
        if stale { "yes" } else { "no" }
    );

    Ok(())
}

fn log_final_stats(stats: &PipelineStats) {
    info!("=== Build Summary ===");
    info!("Duration: {} seconds", stats.duration_secs);
    info!("Files processed: {}", stats.files_processed);
    info!("Files failed: {}", stats.files_failed);
    info!("Units built: {}", stats.units_built);
    info!("Code regions highlighted: {}", stats.regions_highlighted);
    info!("Code regions passed through: {}", stats.regions_skipped);
    info!("Processing speed: {:.2} files/sec", stats.files_per_second());
    info!(
        "Throughput: {:.2} MB/sec",
        stats.bytes_per_second() / 1_048_576.0
    );
    info!("=====================");
}
