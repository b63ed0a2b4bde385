//! Steam Community Market price-overview client.
//!
//! Endpoint: `GET {base}/priceoverview/?appid=730&currency=1&market_hash_name=...`
//! Auth: none. The endpoint is informally rate limited per IP and answers
//! 429 (or an HTML error page) once throttled.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{PriceSource, SourceError, SourceResponse};
use crate::config::MarketConfig;

const SOURCE_NAME: &str = "steam";

/// Steam Community Market client for single-item price lookups.
pub struct SteamMarketClient {
    http: Client,
    base_url: String,
    app_id: u32,
    currency: u32,
    timeout_secs: u64,
}

impl SteamMarketClient {
    pub fn new(cfg: &MarketConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("Failed to build Steam HTTP client")?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            app_id: cfg.app_id,
            currency: cfg.currency,
            timeout_secs: cfg.request_timeout_secs,
        })
    }

    /// Full lookup URL for an item.
    pub fn overview_url(&self, item_name: &str) -> String {
        format!(
            "{}/priceoverview/?appid={}&currency={}&market_hash_name={}",
            self.base_url,
            self.app_id,
            self.currency,
            urlencoding::encode(item_name)
        )
    }
}

/// Error text including every cause. reqwest's own `Display` stops at
/// "error sending request", while the disconnect detail lives further
/// down the chain.
fn describe(err: reqwest::Error) -> String {
    format!("{:#}", anyhow::Error::new(err))
}

#[async_trait]
impl PriceSource for SteamMarketClient {
    async fn price_overview(&self, item_name: &str) -> Result<SourceResponse, SourceError> {
        let url = self.overview_url(item_name);
        debug!(url = %url, "Requesting price overview");

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout(self.timeout_secs)
                } else {
                    SourceError::Transport(describe(e))
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Transport(describe(e)))?;

        Ok(SourceResponse { status, body })
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}
