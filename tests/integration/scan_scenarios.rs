//! End-to-end scan scenarios.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use tradeup_scanner::config::RateLimitConfig;
use tradeup_scanner::engine::{evaluate, ScanOrchestrator};
use tradeup_scanner::fetcher::RateLimitedFetcher;
use tradeup_scanner::pacing::IntervalGate;
use tradeup_scanner::rate_limit::RateLimitHandler;
use tradeup_scanner::report::{self, ReportFilter};
use tradeup_scanner::rotation::{IdentityRotator, RotationError};
use tradeup_scanner::storage::PriceCache;
use tradeup_scanner::types::{CollectionSpec, GoldPool};

use crate::mock_source::{Scripted, ScriptedSource};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn temp_path(prefix: &str, ext: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{prefix}_{}.{ext}", uuid::Uuid::new_v4()))
}

fn fetcher_with(source: &ScriptedSource, cache: PriceCache, gate: IntervalGate) -> RateLimitedFetcher {
    RateLimitedFetcher::new(
        Box::new(source.clone()),
        cache,
        gate,
        RateLimitHandler::new(&RateLimitConfig::default()),
    )
}

fn fetcher(source: &ScriptedSource) -> RateLimitedFetcher {
    fetcher_with(source, PriceCache::in_memory(), IntervalGate::unpaced())
}

fn spec(name: &str, low: &[&str], high: &[&str]) -> CollectionSpec {
    CollectionSpec::new(
        name,
        low.iter().map(|s| s.to_string()).collect(),
        GoldPool::Explicit {
            items: high.iter().map(|s| s.to_string()).collect(),
        },
    )
    .with_fee_rate(dec!(0.13))
}

struct CountingRotator {
    rotations: AtomicU32,
    succeed: bool,
}

#[async_trait]
impl IdentityRotator for CountingRotator {
    async fn rotate(&self) -> Result<(), RotationError> {
        self.rotations.fetch_add(1, Ordering::SeqCst);
        if self.succeed {
            Ok(())
        } else {
            Err(RotationError::NotConfigured)
        }
    }

    fn name(&self) -> &str {
        "counting"
    }
}

// ---------------------------------------------------------------------------
// Profitability scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_profitable_trade_up() {
    let source = ScriptedSource::with_prices(&[("A", dec!(10.00)), ("B", dec!(8.00)), ("X", dec!(50.00))]);
    let mut f = fetcher(&source);

    let result = evaluate(&mut f, &spec("Case", &["A", "B"], &["X"]))
        .await
        .unwrap()
        .expect("collection should be scored");

    assert_eq!(result.cheapest_low_name, "B");
    assert_eq!(result.cheapest_low_price, dec!(8.00));
    assert_eq!(result.cheapest_high_name, "X");
    assert_eq!(result.cheapest_high_price, dec!(50.00));
    assert_eq!(result.cost_of_5x_low, dec!(40.00));
    assert_eq!(result.high_after_fee, dec!(43.50));
    assert_eq!(result.net_profit, dec!(3.50));
    assert!(result.is_profitable);
}

#[tokio::test]
async fn test_unprofitable_trade_up() {
    let source = ScriptedSource::with_prices(&[("A", dec!(10.00)), ("B", dec!(8.00)), ("X", dec!(30.00))]);
    let mut f = fetcher(&source);

    let result = evaluate(&mut f, &spec("Case", &["A", "B"], &["X"]))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.high_after_fee, dec!(26.10));
    assert_eq!(result.cost_of_5x_low, dec!(40.00));
    assert_eq!(result.net_profit, dec!(-13.90));
    assert!(!result.is_profitable);
}

#[tokio::test]
async fn test_unpriced_collection_left_out_of_report() {
    let source = ScriptedSource::with_prices(&[("B", dec!(8.00)), ("X", dec!(50.00))]);
    let specs = vec![
        spec("Ghost Case", &["nothing-1", "nothing-2"], &["nothing-3"]),
        spec("Real Case", &["B"], &["X"]),
    ];

    let mut orch = ScanOrchestrator::new(fetcher(&source));
    let scan = orch.run(&specs).await;

    assert_eq!(scan.results.len(), 1);
    assert_eq!(scan.results[0].collection, "Real Case");
    assert_eq!(scan.skipped, vec!["Ghost Case"]);

    let text = report::render_console(&scan, &ReportFilter::default(), dec!(0.13));
    assert!(text.contains("Real Case [PROFITABLE]"));
    assert!(!text.contains("Ghost Case ["));

    let csv = report::render_csv(&ReportFilter::default().apply(&scan.results));
    assert!(!csv.contains("Ghost Case"));
}

// ---------------------------------------------------------------------------
// Cache behaviour
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_cached_prices_skip_remote_calls() {
    let path = temp_path("tradeup_it_cache", "json");
    let mut seed = PriceCache::new(&path);
    seed.put("B", dec!(8.00));
    seed.put("X", dec!(50.00));
    seed.flush().unwrap();

    let source = ScriptedSource::new();
    let mut orch = ScanOrchestrator::new(fetcher_with(
        &source,
        PriceCache::load(&path).unwrap(),
        IntervalGate::unpaced(),
    ));
    let scan = orch.run(&[spec("Case", &["B"], &["X"])]).await;

    assert!(source.calls().is_empty());
    assert_eq!(scan.requests_made, 0);
    assert_eq!(scan.results[0].net_profit, dec!(3.50));

    std::fs::remove_file(&path).unwrap();
}

#[tokio::test]
async fn test_scan_flushes_fetched_prices() {
    let path = temp_path("tradeup_it_flush", "json");
    let source = ScriptedSource::with_prices(&[("A", dec!(10.00)), ("B", dec!(8.00)), ("X", dec!(50.00))]);

    let mut orch = ScanOrchestrator::new(fetcher_with(
        &source,
        PriceCache::new(&path),
        IntervalGate::unpaced(),
    ));
    let scan = orch.run(&[spec("Case", &["A", "B"], &["X"])]).await;
    assert_eq!(scan.cache_size, 3);

    let reloaded = PriceCache::load(&path).unwrap();
    assert_eq!(reloaded.len(), 3);
    assert_eq!(reloaded.get("B"), Some(dec!(8.00)));

    std::fs::remove_file(&path).unwrap();
}

// ---------------------------------------------------------------------------
// Throttling
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_persistent_throttle_gives_up_after_three_attempts() {
    let source = ScriptedSource::new();
    source.throttle_everything();
    let mut f = fetcher(&source);

    assert_eq!(f.fetch_price("A").await, None);
    assert_eq!(source.calls_for("A"), 3);
    assert_eq!(f.stats().throttled, 3);
}

#[tokio::test(start_paused = true)]
async fn test_recovers_after_mixed_throttle_signals() {
    let source = ScriptedSource::with_prices(&[("A", dec!(4.20))]);
    source.script("A", vec![Scripted::ThrottlePage, Scripted::Disconnect]);

    let mut f = fetcher(&source);
    let start = Instant::now();
    assert_eq!(f.fetch_price("A").await, Some(dec!(4.20)));

    // 60s then 120s of backoff.
    assert!(start.elapsed() >= Duration::from_secs(180));
    assert_eq!(source.calls_for("A"), 3);
    assert_eq!(f.rate_limit().state().throttle_count, 2);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_payload_not_retried() {
    let source = ScriptedSource::new();
    source.script(
        "A",
        vec![Scripted::Respond(200, r#"{"success":true,"lowest_price":"N/A"}"#.to_string())],
    );

    let mut f = fetcher(&source);
    assert_eq!(f.fetch_price("A").await, None);
    assert_eq!(source.calls_for("A"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_successful_rotation_shortens_backoff() {
    let source = ScriptedSource::with_prices(&[("A", dec!(1.00))]);
    source.script("A", vec![Scripted::Throttle]);

    let rotator = Arc::new(CountingRotator {
        rotations: AtomicU32::new(0),
        succeed: true,
    });
    let limiter = RateLimitHandler::new(&RateLimitConfig::default()).with_rotator(rotator.clone());
    let mut f = RateLimitedFetcher::new(
        Box::new(source.clone()),
        PriceCache::in_memory(),
        IntervalGate::unpaced(),
        limiter,
    );

    let start = Instant::now();
    assert_eq!(f.fetch_price("A").await, Some(dec!(1.00)));
    let elapsed = start.elapsed();

    assert_eq!(rotator.rotations.load(Ordering::SeqCst), 1);
    assert!(elapsed >= Duration::from_secs(30));
    assert!(elapsed < Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn test_failed_rotation_keeps_full_backoff() {
    let source = ScriptedSource::with_prices(&[("A", dec!(1.00))]);
    source.script("A", vec![Scripted::Throttle]);

    let rotator = Arc::new(CountingRotator {
        rotations: AtomicU32::new(0),
        succeed: false,
    });
    let limiter = RateLimitHandler::new(&RateLimitConfig::default()).with_rotator(rotator.clone());
    let mut f = RateLimitedFetcher::new(
        Box::new(source.clone()),
        PriceCache::in_memory(),
        IntervalGate::unpaced(),
        limiter,
    );

    let start = Instant::now();
    assert_eq!(f.fetch_price("A").await, Some(dec!(1.00)));
    assert!(start.elapsed() >= Duration::from_secs(60));
    assert_eq!(rotator.rotations.load(Ordering::SeqCst), 1);
}

// ---------------------------------------------------------------------------
// Pacing and shutdown
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_shared_gate_paces_fetchers_globally() {
    let gate = IntervalGate::new(Duration::from_secs(10));
    let source = ScriptedSource::with_prices(&[("A", dec!(1)), ("B", dec!(2))]);
    let mut first = fetcher_with(&source, PriceCache::in_memory(), gate.clone());
    let mut second = fetcher_with(&source, PriceCache::in_memory(), gate);

    let start = Instant::now();
    first.fetch_price("A").await;
    second.fetch_price("B").await;
    first.fetch_price("B").await;

    assert!(start.elapsed() >= Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn test_interrupted_scan_still_reports() {
    let source = ScriptedSource::with_prices(&[
        ("low-1", dec!(8.00)),
        ("gold-1", dec!(50.00)),
        ("low-2", dec!(9.00)),
        ("gold-2", dec!(40.00)),
    ]);
    let specs = vec![
        spec("First", &["low-1"], &["gold-1"]),
        spec("Second", &["low-2"], &["gold-2"]),
    ];

    // Calls at t = 0 and 10 finish "First"; the scan stops at t = 15.
    let mut orch = ScanOrchestrator::new(fetcher_with(
        &source,
        PriceCache::in_memory(),
        IntervalGate::new(Duration::from_secs(10)),
    ));
    let scan = orch
        .run_until(&specs, tokio::time::sleep(Duration::from_secs(15)))
        .await;

    assert!(scan.interrupted);
    assert_eq!(scan.results.len(), 1);
    assert_eq!(scan.results[0].collection, "First");

    let csv_path = temp_path("tradeup_it_results", "csv");
    let rows = ReportFilter::default().apply(&scan.results);
    report::write_csv(&csv_path, &rows).unwrap();
    let written = std::fs::read_to_string(&csv_path).unwrap();
    assert!(written.contains("First,low-1,8.00,gold-1,50.00"));

    let text = report::render_console(&scan, &ReportFilter::default(), dec!(0.13));
    assert!(text.contains("Scan interrupted"));

    std::fs::remove_file(&csv_path).unwrap();
}

#[tokio::test]
async fn test_min_profit_filter_drops_losers_from_report() {
    let source = ScriptedSource::with_prices(&[
        ("w", dec!(8.00)),
        ("x", dec!(50.00)),
        ("y", dec!(8.00)),
        ("z", dec!(30.00)),
    ]);
    let specs = vec![spec("Winner", &["w"], &["x"]), spec("Loser", &["y"], &["z"])];

    let mut orch = ScanOrchestrator::new(fetcher(&source));
    let scan = orch.run(&specs).await;

    let filter = ReportFilter {
        min_profit: Some(Decimal::ZERO),
        top_n: None,
    };
    let rows = filter.apply(&scan.results);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].collection, "Winner");
    assert_eq!(scan.results.len(), 2);
}
