//! TRADEUP: CS2 trade-up profitability scanner
//!
//! Entry point. Parses arguments, loads configuration, initialises
//! structured logging and dispatches to the scan, analyze or checklist
//! command. Ctrl+C stops a scan early; partial results are still reported
//! and the price cache is flushed.

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

use tradeup_scanner::catalog;
use tradeup_scanner::checklist::Checklist;
use tradeup_scanner::cli::{self, Command};
use tradeup_scanner::config::AppConfig;
use tradeup_scanner::engine::{load_manual_quotes, ScanOrchestrator, TradeUpMath};
use tradeup_scanner::fetcher::RateLimitedFetcher;
use tradeup_scanner::market::{PriceSource, SteamMarketClient};
use tradeup_scanner::pacing::IntervalGate;
use tradeup_scanner::rate_limit::RateLimitHandler;
use tradeup_scanner::report::{self, ReportFilter};
use tradeup_scanner::rotation::{CommandRotator, IdentityRotator};
use tradeup_scanner::storage::PriceCache;

const BANNER: &str = r#"
 _____ ____      _    ____  _____      _   _ ____
|_   _|  _ \    / \  |  _ \| ____|    | | | |  _ \
  | | | |_) |  / _ \ | | | |  _| _____| | | | |_) |
  | | |  _ <  / ___ \| |_| | |__|_____| |_| |  __/
  |_| |_| \_\/_/   \_\____/|_____|     \___/|_|

  CS2 trade-up scanner: 5 Covert -> 1 Gold
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = match cli::parse(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e:#}");
            std::process::exit(2);
        }
    };

    if cli.command == Command::Help {
        println!("{}", cli::USAGE);
        return Ok(());
    }

    init_logging();
    let mut cfg = AppConfig::load_or_default(&cli.config)?;

    match cli.command {
        Command::Scan {
            collections,
            min_profit,
            top_n,
        } => {
            if let Some(set) = collections {
                cfg.scan.collections = set;
                // An explicit set on the command line beats a configured file.
                cfg.scan.collections_file = None;
            }
            if min_profit.is_some() {
                cfg.scan.min_profit = min_profit;
            }
            if top_n.is_some() {
                cfg.scan.top_n = top_n;
            }
            run_scan(&cfg).await
        }
        Command::Analyze {
            low_price,
            high_price,
            collection,
        } => {
            let p = TradeUpMath::compute(low_price, high_price, cfg.scan.fee_rate);
            print!(
                "{}",
                report::render_analysis(
                    collection.as_deref().unwrap_or(""),
                    low_price,
                    high_price,
                    cfg.scan.fee_rate,
                    &p
                )
            );
            Ok(())
        }
        Command::AnalyzeFile { path } => {
            let quotes = load_manual_quotes(&path)?;
            let ranked = TradeUpMath::rank(&quotes, cfg.scan.fee_rate);
            print!("{}", report::render_batch_analysis(&ranked, cfg.scan.fee_rate));
            Ok(())
        }
        Command::Checklist { batch } => {
            run_checklist(&cfg, batch.unwrap_or(cfg.checklist.batch_size)).await
        }
        Command::Help => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

async fn run_scan(cfg: &AppConfig) -> Result<()> {
    println!("{BANNER}");

    let specs = match &cfg.scan.collections_file {
        Some(path) => catalog::load_collections(path, cfg.scan.fee_rate)?,
        None => catalog::builtin(cfg.scan.collections, cfg.scan.fee_rate),
    };

    info!(
        collections = specs.len(),
        fee_rate = %cfg.scan.fee_rate,
        min_interval_secs = cfg.fetcher.min_interval_secs,
        max_attempts = cfg.fetcher.max_attempts,
        "Scan starting. Press Ctrl+C to stop early."
    );

    let mut orchestrator = ScanOrchestrator::new(build_fetcher(cfg)?);
    let scan_report = orchestrator.run_until(&specs, shutdown_signal()).await;

    let filter = ReportFilter {
        min_profit: cfg.scan.min_profit,
        top_n: cfg.scan.top_n,
    };
    print!("{}", report::render_console(&scan_report, &filter, cfg.scan.fee_rate));

    let rows = filter.apply(&scan_report.results);
    if let Err(e) = report::write_csv(&cfg.scan.results_csv, &rows) {
        error!(error = %e, "Failed to write CSV report");
    }
    if let Some(path) = &cfg.scan.results_json {
        if let Err(e) = report::write_json(path, &rows) {
            error!(error = %e, "Failed to write JSON report");
        }
    }

    Ok(())
}

async fn run_checklist(cfg: &AppConfig, batch: usize) -> Result<()> {
    let mut checklist = Checklist::load_or_generate(&cfg.checklist.file)?;
    let mut fetcher = build_fetcher(cfg)?;

    info!(batch, unfound = checklist.unfound().len(), "Pricing checklist batch");

    tokio::select! {
        outcome = checklist.price_batch(&mut fetcher, batch) => {
            let outcome = outcome?;
            info!(attempted = outcome.attempted, found = outcome.found, "Batch complete");
        }
        _ = shutdown_signal() => {
            warn!("Interrupted, saving progress");
        }
    }

    fetcher.flush_cache();
    checklist.save()?;

    let stats = checklist.completion_stats();
    println!(
        "Checklist: {}/{} found ({}%), {} remaining",
        stats.found, stats.total, stats.percent, stats.not_found
    );
    for (knife, progress) in &stats.by_knife {
        println!("  {knife:<18} {:>4}/{:<4}", progress.found, progress.total);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// Steam client, restored cache, pacing gate and throttle handler.
fn build_fetcher(cfg: &AppConfig) -> Result<RateLimitedFetcher> {
    let source = SteamMarketClient::new(&cfg.market)?;
    info!(source = source.name(), base_url = %cfg.market.base_url, "Price source ready");

    let cache = match PriceCache::load(&cfg.fetcher.cache_file) {
        Ok(cache) => cache,
        Err(e) => {
            warn!(error = %e, "Price cache unreadable, starting empty");
            PriceCache::new(&cfg.fetcher.cache_file)
        }
    };

    let mut limiter = RateLimitHandler::new(&cfg.rate_limit);
    if let Some(rotation) = &cfg.rotation {
        match CommandRotator::from_config(rotation) {
            Ok(rotator) => {
                info!(rotator = rotator.name(), "Identity rotation enabled");
                limiter = limiter.with_rotator(Arc::new(rotator));
            }
            Err(e) => warn!(error = %e, "Identity rotation disabled"),
        }
    }

    Ok(RateLimitedFetcher::new(
        Box::new(source),
        cache,
        IntervalGate::new(cfg.fetcher.min_interval()),
        limiter,
    )
    .with_policy(cfg.fetcher.max_attempts, cfg.fetcher.flush_every))
}

/// Resolves on Ctrl+C. If the signal handler can't be installed, never
/// resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Ctrl+C handler unavailable");
        std::future::pending::<()>().await;
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tradeup_scanner=info"));

    let json_logging = std::env::var("TRADEUP_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }
}
