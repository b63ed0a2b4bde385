//! Rate-limited, cache-backed price fetcher.
//!
//! `fetch_price` never fails: every problem degrades to `None` and a log
//! line. The lookup goes:
//!   1. cache hit → return it
//!   2. wait for the interval gate
//!   3. one remote call
//!   4. throttled → back off (maybe rotate) and retry, up to `max_attempts`
//!   5. decode → cache → return

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::FetcherConfig;
use crate::market::{decode_overview, PriceSource, SourceError};
use crate::pacing::IntervalGate;
use crate::rate_limit::{CallOutcome, RateLimitHandler};
use crate::storage::PriceCache;

/// Per-run counters, one bump per outcome class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FetchStats {
    pub cache_hits: u32,
    pub fetched: u32,
    pub throttled: u32,
    pub failed: u32,
    /// Remote calls actually issued, retries included.
    pub requests: u32,
}

/// How a single remote attempt ended.
enum Attempt {
    Priced(Decimal),
    /// Throttled or transient; worth another try.
    Retry,
    /// Answered, but not with a usable price. Retrying won't help.
    Unusable,
}

pub struct RateLimitedFetcher {
    source: Box<dyn PriceSource>,
    cache: PriceCache,
    gate: IntervalGate,
    limiter: RateLimitHandler,
    max_attempts: u32,
    flush_every: u32,
    fetched_since_flush: u32,
    stats: FetchStats,
}

impl RateLimitedFetcher {
    pub fn new(
        source: Box<dyn PriceSource>,
        cache: PriceCache,
        gate: IntervalGate,
        limiter: RateLimitHandler,
    ) -> Self {
        let defaults = FetcherConfig::default();
        Self {
            source,
            cache,
            gate,
            limiter,
            max_attempts: defaults.max_attempts,
            flush_every: defaults.flush_every,
            fetched_since_flush: 0,
            stats: FetchStats::default(),
        }
    }

    /// Attempt bound and flush cadence. Zero `flush_every` disables
    /// periodic flushing.
    pub fn with_policy(mut self, max_attempts: u32, flush_every: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.flush_every = flush_every;
        self
    }

    /// Price of one exact market item name, or `None` if unknown.
    pub async fn fetch_price(&mut self, item_name: &str) -> Option<Decimal> {
        if let Some(price) = self.cache.get(item_name) {
            self.stats.cache_hits += 1;
            debug!(item = %item_name, price = %price, "Cache hit");
            return Some(price);
        }

        for attempt in 1..=self.max_attempts {
            self.gate.wait_turn().await;
            self.stats.requests += 1;

            match self.attempt(item_name, attempt).await {
                Attempt::Priced(price) => {
                    self.record(item_name, price);
                    return Some(price);
                }
                Attempt::Unusable => {
                    self.stats.failed += 1;
                    return None;
                }
                Attempt::Retry => {}
            }
        }

        self.stats.failed += 1;
        warn!(
            item = %item_name,
            attempts = self.max_attempts,
            "Giving up, price unknown"
        );
        None
    }

    async fn attempt(&mut self, item_name: &str, attempt: u32) -> Attempt {
        let response = match self.source.price_overview(item_name).await {
            Ok(r) => r,
            Err(e) => return self.on_transport_error(item_name, attempt, e).await,
        };

        if self
            .limiter
            .is_throttled(&CallOutcome::response(response.status, &response.body))
        {
            self.back_off(item_name, attempt).await;
            return Attempt::Retry;
        }

        if response.status >= 500 {
            warn!(item = %item_name, status = response.status, attempt, "Server error, retrying");
            return Attempt::Retry;
        }

        self.limiter.on_success();

        if !response.is_success() {
            warn!(item = %item_name, status = response.status, "Lookup rejected");
            return Attempt::Unusable;
        }

        match decode_overview(&response.body) {
            Ok(price) => Attempt::Priced(price),
            Err(e) => {
                warn!(item = %item_name, error = %e, "No usable price in response");
                Attempt::Unusable
            }
        }
    }

    async fn on_transport_error(&mut self, item_name: &str, attempt: u32, err: SourceError) -> Attempt {
        let message = err.to_string();
        if self.limiter.is_throttled(&CallOutcome::error(&message)) {
            self.back_off(item_name, attempt).await;
            return Attempt::Retry;
        }

        match &err {
            SourceError::Timeout(_) => {
                warn!(item = %item_name, attempt, error = %err, "Request timed out, retrying");
                Attempt::Retry
            }
            SourceError::Transport(_) => {
                error!(item = %item_name, error = %err, "Request failed");
                Attempt::Unusable
            }
        }
    }

    /// Wait out a throttle. The wait also follows the final attempt so the
    /// next item doesn't walk straight into the same limit.
    async fn back_off(&mut self, item_name: &str, attempt: u32) {
        self.stats.throttled += 1;
        let decision = self.limiter.on_throttle().await;
        warn!(
            item = %item_name,
            attempt,
            throttle_count = decision.throttle_count,
            wait_secs = decision.wait.as_secs(),
            rotated = decision.rotated,
            "Throttled, backing off"
        );
        tokio::time::sleep(decision.wait).await;
    }

    fn record(&mut self, item_name: &str, price: Decimal) {
        self.cache.put(item_name, price);
        self.stats.fetched += 1;
        info!(item = %item_name, price = %price, "Fetched");

        self.fetched_since_flush += 1;
        if self.flush_every > 0 && self.fetched_since_flush >= self.flush_every {
            self.flush_cache();
        }
    }

    /// Persist the cache, logging rather than returning failures. The
    /// in-memory cache stays authoritative either way.
    pub fn flush_cache(&mut self) -> bool {
        self.fetched_since_flush = 0;
        match self.cache.flush() {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Failed to flush price cache");
                false
            }
        }
    }

    pub fn stats(&self) -> FetchStats {
        self.stats
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    pub fn rate_limit(&self) -> &RateLimitHandler {
        &self.limiter
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
