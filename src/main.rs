//! CLI entry point for the booklist tool.

use anyhow::{Context, Result, bail};
use booklist::{CatalogSearcher, Config, HttpTimeouts, author_header, format_results};
use clap::Parser;
use tracing::{debug, error, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > debug/verbose flags > default (warn)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = Config::load(&args.config_file)
        .with_context(|| format!("Invalid configuration in '{}'", args.config_file.display()))?;
    debug!("Loaded config:\n{config}");

    let searcher = CatalogSearcher::with_timeouts(HttpTimeouts::with_request_secs(args.timeout))?;
    info!(year = searcher.current_year(), "Searching catalog");

    let mut failed = 0usize;
    for query in config.queries() {
        println!("{}", author_header(&query.author, &query.media));

        match searcher.search(&query).await {
            Ok(results) => print!("{}", format_results(&results)),
            Err(err) if args.keep_going => {
                error!(author = %query.author, error = %err, "Search failed");
                failed += 1;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Search failed for '{}'", query.author));
            }
        }
    }

    if failed > 0 {
        bail!("{failed} author search(es) failed");
    }
    Ok(())
}
