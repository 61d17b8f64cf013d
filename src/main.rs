//! eoy-charts — Binary Entrypoint
//! Crawls one year of end-of-year charts and prints a single JSON document
//! to stdout. Progress goes to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use eoy_charts::{pipeline, resolve_year, CrawlConfig, HttpFetcher, Mode};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Four-digit chart year; anything else falls back to the default year
    year: Option<String>,

    /// Emit merged, scored releases or the raw per-chart listings
    #[arg(long, value_enum, default_value_t = Mode::Merged)]
    mode: Mode,

    /// Crawl config (TOML); defaults to $EOY_CHARTS_CONFIG or config/crawl.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the pause after each request (ms)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Pretty-print the JSON document
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

/// Logs to stderr; stdout is reserved for the JSON document.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("eoy_charts=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();
    let year = resolve_year(args.year.as_deref());

    let mut cfg = CrawlConfig::load(args.config.as_deref()).context("loading crawl config")?;
    if let Some(ms) = args.delay_ms {
        cfg.delay_ms = ms;
    }
    tracing::info!(year = %year, mode = ?args.mode, origin = %cfg.origin, "starting crawl");

    let fetcher = HttpFetcher::new(&cfg)?;
    let out = pipeline::run(&fetcher, &cfg, &year, args.mode)
        .await
        .with_context(|| format!("crawling charts for {year}"))?;

    out.write_to(std::io::stdout().lock(), args.pretty)?;
    Ok(())
}
