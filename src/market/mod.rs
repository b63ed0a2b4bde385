//! Remote price lookup.
//!
//! Defines the `PriceSource` trait and the price-overview payload decoder.
//! A source only moves bytes: throttle classification and decoding live in
//! the fetcher so synthetic sources can stand in for the network in tests.

pub mod steam;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

pub use steam::SteamMarketClient;

// ---------------------------------------------------------------------------
// Source seam
// ---------------------------------------------------------------------------

/// Raw answer from a price source: HTTP status plus body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceResponse {
    pub status: u16,
    pub body: String,
}

impl SourceResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request that never produced a response.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),
}

/// Abstraction over the remote price-overview endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Issue one lookup for an exact market item name.
    async fn price_overview(&self, item_name: &str) -> Result<SourceResponse, SourceError>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Payload decoding
// ---------------------------------------------------------------------------

/// Why a successful HTTP response still yielded no price.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuoteError {
    #[error("API returned success=false")]
    Unsuccessful,

    #[error("No lowest_price in response")]
    MissingPrice,

    #[error("Unparseable price text: {0:?}")]
    UnparseablePrice(String),

    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),
}

/// Price-overview payload, e.g.
/// `{"success":true,"lowest_price":"$12.34","volume":"1,024","median_price":"$12.50"}`.
#[derive(Debug, Deserialize)]
pub struct PriceOverview {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub lowest_price: Option<String>,
    #[serde(default)]
    pub median_price: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
}

/// Decode a price-overview body into the lowest current listing price.
pub fn decode_overview(body: &str) -> Result<Decimal, QuoteError> {
    let overview: PriceOverview =
        serde_json::from_str(body).map_err(|e| QuoteError::InvalidJson(e.to_string()))?;

    if !overview.success {
        return Err(QuoteError::Unsuccessful);
    }

    let text = overview
        .lowest_price
        .filter(|t| !t.trim().is_empty())
        .ok_or(QuoteError::MissingPrice)?;

    parse_price_text(&text).ok_or(QuoteError::UnparseablePrice(text))
}

/// Parse a human-formatted price such as `"$1,234.56"` or `"$12.34 USD"`.
///
/// Currency symbols, whitespace, trailing currency codes and thousands
/// separators are stripped. Commas are always thousands separators.
pub fn parse_price_text(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() || cleaned.starts_with('-') {
        return None;
    }

    cleaned.parse::<Decimal>().ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
