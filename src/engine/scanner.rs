//! Scan orchestrator.
//!
//! Evaluates collections one after another through a single fetcher, so
//! every remote call goes through the same pacing gate and backoff state.
//! A failing collection is logged and the scan moves on; a shutdown signal
//! stops the scan and keeps whatever finished before it.

use serde::Serialize;
use std::future::Future;
use tracing::{error, info, warn};

use super::evaluator;
use crate::fetcher::{FetchStats, RateLimitedFetcher};
use crate::types::{CollectionSpec, EvaluationResult};

/// Outcome of one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Scored collections, best net profit first.
    pub results: Vec<EvaluationResult>,
    /// Collections with no usable price on one side.
    pub skipped: Vec<String>,
    /// Collections that errored, with the reason.
    pub failed: Vec<(String, String)>,
    /// True if the scan stopped before the last collection.
    pub interrupted: bool,
    pub requests_made: u32,
    pub cache_size: usize,
    pub fetch_stats: FetchStats,
}

impl ScanReport {
    pub fn profitable(&self) -> impl Iterator<Item = &EvaluationResult> {
        self.results.iter().filter(|r| r.is_profitable)
    }

    pub fn best(&self) -> Option<&EvaluationResult> {
        self.results.first()
    }
}

pub struct ScanOrchestrator {
    fetcher: RateLimitedFetcher,
}

impl ScanOrchestrator {
    pub fn new(fetcher: RateLimitedFetcher) -> Self {
        Self { fetcher }
    }

    /// Scan every collection to completion.
    pub async fn run(&mut self, specs: &[CollectionSpec]) -> ScanReport {
        self.run_until(specs, std::future::pending::<()>()).await
    }

    /// Scan until done or until `shutdown` resolves. The cache is flushed
    /// either way.
    pub async fn run_until<F>(&mut self, specs: &[CollectionSpec], shutdown: F) -> ScanReport
    where
        F: Future<Output = ()>,
    {
        let mut report = ScanReport::default();
        tokio::pin!(shutdown);

        info!(collections = specs.len(), "Starting scan");

        for (i, spec) in specs.iter().enumerate() {
            info!(
                collection = %spec.name,
                progress = %format!("{}/{}", i + 1, specs.len()),
                "Evaluating collection"
            );

            let outcome = tokio::select! {
                outcome = evaluator::evaluate(&mut self.fetcher, spec) => outcome,
                _ = &mut shutdown => {
                    warn!(collection = %spec.name, "Scan interrupted, keeping partial results");
                    report.interrupted = true;
                    break;
                }
            };

            match outcome {
                Ok(Some(result)) => {
                    info!(
                        collection = %result.collection,
                        net_profit = %result.net_profit.round_dp(2),
                        profitable = result.is_profitable,
                        "Collection scored"
                    );
                    report.results.push(result);
                }
                Ok(None) => report.skipped.push(spec.name.clone()),
                Err(e) => {
                    error!(collection = %spec.name, error = %e, "Collection evaluation failed");
                    report.failed.push((spec.name.clone(), e.to_string()));
                }
            }
        }

        // Stable: equal profits keep scan order.
        report
            .results
            .sort_by(|a, b| b.net_profit.cmp(&a.net_profit));

        self.fetcher.flush_cache();

        let stats = self.fetcher.stats();
        report.fetch_stats = stats;
        report.requests_made = stats.requests;
        report.cache_size = self.fetcher.cache().len();

        info!(
            scored = report.results.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            requests = report.requests_made,
            cache_size = report.cache_size,
            interrupted = report.interrupted,
            "Scan finished"
        );

        report
    }

    pub fn fetcher(&self) -> &RateLimitedFetcher {
        &self.fetcher
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
