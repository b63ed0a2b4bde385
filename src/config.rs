//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! section carries defaults, so a partial file (or no file at all) still
//! yields a usable configuration.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::catalog::CollectionSet;
use crate::types::DEFAULT_FEE_RATE;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub market: MarketConfig,
    pub fetcher: FetcherConfig,
    pub rate_limit: RateLimitConfig,
    /// Identity rotation; absent means throttles are only waited out.
    pub rotation: Option<RotationConfig>,
    pub scan: ScanConfig,
    pub checklist: ChecklistConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MarketConfig {
    pub base_url: String,
    pub app_id: u32,
    /// Steam currency code (1 = USD).
    pub currency: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: "https://steamcommunity.com/market".to_string(),
            app_id: 730,
            currency: 1,
            request_timeout_secs: 15,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FetcherConfig {
    /// Minimum spacing between remote calls.
    pub min_interval_secs: u64,
    /// Remote attempts per item before giving up.
    pub max_attempts: u32,
    /// Successful remote fetches between cache flushes.
    pub flush_every: u32,
    pub cache_file: PathBuf,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: 10,
            max_attempts: 3,
            flush_every: 10,
            cache_file: PathBuf::from("price_cache.json"),
        }
    }
}

impl FetcherConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_secs(self.min_interval_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RateLimitConfig {
    pub base_wait_secs: u64,
    pub max_wait_secs: u64,
    /// Consecutive successes that clear the throttle counter.
    pub reset_after_successes: u32,
    pub min_rotation_interval_secs: u64,
    /// Floor applied after halving the wait on a successful rotation.
    pub min_wait_after_rotation_secs: u64,
    /// Case-insensitive substrings marking a throttled response body.
    pub throttle_phrases: Vec<String>,
    /// Case-insensitive substrings marking a throttling transport error.
    pub disconnect_phrases: Vec<String>,
}

pub const DEFAULT_THROTTLE_PHRASES: &[&str] = &[
    "please wait before trying again",
    "too many requests",
    "rate limit exceeded",
    "access denied",
    "your connection has been temporarily blocked",
];

pub const DEFAULT_DISCONNECT_PHRASES: &[&str] = &[
    "target page, context or browser has been closed",
    "connection reset",
    "connection closed",
    "forcibly closed",
    "429",
    "too many requests",
];

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            base_wait_secs: 60,
            max_wait_secs: 600,
            reset_after_successes: 5,
            min_rotation_interval_secs: 300,
            min_wait_after_rotation_secs: 30,
            throttle_phrases: DEFAULT_THROTTLE_PHRASES.iter().map(|s| s.to_string()).collect(),
            disconnect_phrases: DEFAULT_DISCONNECT_PHRASES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RotationConfig {
    /// Program and arguments that bring a new egress identity up.
    pub connect: Vec<String>,
    /// Program and arguments that tear the current one down.
    pub disconnect: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            connect: vec!["nordvpn".to_string(), "connect".to_string()],
            disconnect: vec!["nordvpn".to_string(), "disconnect".to_string()],
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScanConfig {
    pub fee_rate: Decimal,
    /// Rows with a lower net profit are left out of reports.
    pub min_profit: Option<Decimal>,
    pub top_n: Option<usize>,
    pub collections: CollectionSet,
    /// JSON collection table replacing the built-in one.
    pub collections_file: Option<PathBuf>,
    pub results_csv: PathBuf,
    pub results_json: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fee_rate: DEFAULT_FEE_RATE,
            min_profit: None,
            top_n: None,
            collections: CollectionSet::Focused,
            collections_file: None,
            results_csv: PathBuf::from("tradeup_results.csv"),
            results_json: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChecklistConfig {
    pub file: PathBuf,
    /// Unfound entries priced per `checklist` run.
    pub batch_size: usize,
}

impl Default for ChecklistConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("knife_checklist.json"),
            batch_size: 25,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.fetcher.max_attempts == 0 {
            anyhow::bail!("fetcher.max_attempts must be at least 1");
        }
        if self.scan.fee_rate < Decimal::ZERO || self.scan.fee_rate >= Decimal::ONE {
            anyhow::bail!("scan.fee_rate must be in [0, 1), got {}", self.scan.fee_rate);
        }
        if self.rate_limit.max_wait_secs < self.rate_limit.base_wait_secs {
            anyhow::bail!("rate_limit.max_wait_secs must not be below base_wait_secs");
        }
        if let Some(rotation) = &self.rotation {
            if rotation.connect.is_empty() {
                anyhow::bail!("rotation.connect must name a program");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = AppConfig::parse("").unwrap();
        assert_eq!(cfg.market.app_id, 730);
        assert_eq!(cfg.fetcher.max_attempts, 3);
        assert_eq!(cfg.rate_limit.base_wait_secs, 60);
        assert_eq!(cfg.rate_limit.max_wait_secs, 600);
        assert_eq!(cfg.scan.fee_rate, dec!(0.13));
        assert_eq!(cfg.scan.collections, CollectionSet::Focused);
        assert!(cfg.rotation.is_none());
        assert_eq!(cfg.rate_limit.throttle_phrases.len(), 5);
    }

    #[test]
    fn test_partial_sections() {
        let cfg = AppConfig::parse(
            r#"
            [fetcher]
            min_interval_secs = 6

            [scan]
            fee_rate = 0.15
            collections = "full"
            top_n = 10

            [rotation]
            timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(cfg.fetcher.min_interval(), Duration::from_secs(6));
        assert_eq!(cfg.fetcher.max_attempts, 3);
        assert_eq!(cfg.scan.fee_rate, dec!(0.15));
        assert_eq!(cfg.scan.collections, CollectionSet::Full);
        assert_eq!(cfg.scan.top_n, Some(10));

        let rotation = cfg.rotation.unwrap();
        assert_eq!(rotation.timeout_secs, 30);
        assert_eq!(rotation.connect, vec!["nordvpn", "connect"]);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(AppConfig::parse("[fetcher]\nmax_attempts = 0").is_err());
        assert!(AppConfig::parse("[scan]\nfee_rate = 1.5").is_err());
        assert!(AppConfig::parse("[rate_limit]\nbase_wait_secs = 900").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let cfg = AppConfig::load_or_default(Path::new("/tmp/tradeup_no_config_here.toml")).unwrap();
        assert_eq!(cfg.checklist.batch_size, 25);
    }

    #[test]
    fn test_load_repo_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml");
        let cfg = AppConfig::load(&path).unwrap();

        assert_eq!(cfg.market.app_id, 730);
        assert_eq!(cfg.fetcher.max_attempts, 3);
        assert_eq!(cfg.scan.fee_rate, dec!(0.13));
        assert_eq!(cfg.scan.collections, CollectionSet::Focused);
        assert!(cfg.rotation.is_none());
        assert_eq!(cfg.checklist.batch_size, 25);
    }
}
