//! sitegraph main entry point
//!
//! This is the command-line interface for the sitegraph crawler.

use anyhow::Context;
use clap::Parser;
use sitegraph::config::{load_config_with_hash, validate, Config, OutputFormat};
use sitegraph::output::render;
use sitegraph::Coordinator;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// sitegraph: map the pages of a single website
///
/// Crawls every page reachable from URL on the same host and prints the
/// link structure as a tree. Each distinct page is fetched once; pages
/// seen again are marked "(showed)".
#[derive(Parser, Debug)]
#[command(name = "sitegraph")]
#[command(version)]
#[command(about = "Map the pages of a single website", long_about = None)]
struct Cli {
    /// Absolute http(s) URL to start from
    #[arg(value_name = "URL")]
    url: String,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of fetches in flight at once
    #[arg(short = 'c', long, value_name = "N")]
    max_concurrent_fetches: Option<usize>,

    /// Output format for the page graph
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Print crawl statistics after the graph
    #[arg(long)]
    summary: bool,
}

const EXIT_CONFIG: u8 = 1;
const EXIT_CRAWL: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(EXIT_CONFIG)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    handle_crawl(&cli.url, &config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only the rendered graph.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitegraph=info,warn"),
            1 => EnvFilter::new("sitegraph=debug,info"),
            2 => EnvFilter::new("sitegraph=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the optional config file and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(max) = cli.max_concurrent_fetches {
        config.crawler.max_concurrent_fetches = max;
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if cli.summary {
        config.output.show_summary = true;
    }

    validate(&config).context("invalid command-line options")?;

    Ok(config)
}

/// Handles the main crawl operation
async fn handle_crawl(seed: &str, config: &Config) -> ExitCode {
    let coordinator = match Coordinator::from_config(config) {
        Ok(coordinator) => coordinator,
        Err(e) => {
            eprintln!("failed to crawl {}: {}", seed, e);
            return ExitCode::from(EXIT_CRAWL);
        }
    };

    let token = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling crawl");
            token.cancel();
        }
    });

    match coordinator.run(seed).await {
        Ok(graph) => {
            print!(
                "{}",
                render(&graph, config.output.format, config.output.show_summary)
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to crawl {}: {}", seed, e);
            ExitCode::from(EXIT_CRAWL)
        }
    }
}
