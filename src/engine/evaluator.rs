//! Collection evaluator.
//!
//! Finds the cheapest low-rarity input and the cheapest high-rarity outcome
//! of a collection, then prices the trade-up. The arithmetic lives in
//! `TradeUpMath` so the offline `analyze` command shares it.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::fetcher::RateLimitedFetcher;
use crate::storage;
use crate::types::{CollectionSpec, EvaluationResult, ManualQuote, TRADE_UP_INPUTS};

// ---------------------------------------------------------------------------
// Trade-up arithmetic
// ---------------------------------------------------------------------------

/// Profitability figures for one (low price, high price, fee) triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Profitability {
    pub cost_of_5x_low: Decimal,
    pub high_after_fee: Decimal,
    pub net_profit: Decimal,
    /// Net profit as a percentage of the input cost; zero for a free input.
    pub margin_pct: Decimal,
    /// High price over low price; zero for a free input.
    pub price_ratio: Decimal,
    pub is_profitable: bool,
}

pub struct TradeUpMath;

impl TradeUpMath {
    /// `net = high * (1 - fee) - 5 * low`.
    pub fn compute(low_price: Decimal, high_price: Decimal, fee_rate: Decimal) -> Profitability {
        let cost_of_5x_low = low_price * Decimal::from(TRADE_UP_INPUTS);
        let high_after_fee = high_price * (Decimal::ONE - fee_rate);
        let net_profit = high_after_fee - cost_of_5x_low;

        let margin_pct = if cost_of_5x_low > Decimal::ZERO {
            net_profit / cost_of_5x_low * dec!(100)
        } else {
            Decimal::ZERO
        };
        let price_ratio = if low_price > Decimal::ZERO {
            high_price / low_price
        } else {
            Decimal::ZERO
        };

        Profitability {
            cost_of_5x_low,
            high_after_fee,
            net_profit,
            margin_pct,
            price_ratio,
            is_profitable: net_profit > Decimal::ZERO,
        }
    }

    /// Price every quote and order them by net profit, best first. Equal
    /// profits keep file order.
    pub fn rank(quotes: &[ManualQuote], fee_rate: Decimal) -> Vec<(&ManualQuote, Profitability)> {
        let mut ranked: Vec<_> = quotes
            .iter()
            .map(|q| (q, Self::compute(q.covert_price, q.gold_price, fee_rate)))
            .collect();
        ranked.sort_by(|a, b| b.1.net_profit.cmp(&a.1.net_profit));
        ranked
    }
}

/// Read a JSON array of manual quotes.
pub fn load_manual_quotes(path: &Path) -> Result<Vec<ManualQuote>> {
    let quotes: Vec<ManualQuote> = storage::read_json(path)?
        .with_context(|| format!("Quote file not found: {}", path.display()))?;

    if let Some(bad) = quotes
        .iter()
        .find(|q| q.covert_price < Decimal::ZERO || q.gold_price < Decimal::ZERO)
    {
        anyhow::bail!("{} has a negative price", bad.collection);
    }
    Ok(quotes)
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate one collection.
///
/// `Ok(None)` means the collection is unscored: no low or no high candidate
/// produced a price. `Err` is reserved for specs that can't be evaluated at
/// all.
pub async fn evaluate(
    fetcher: &mut RateLimitedFetcher,
    spec: &CollectionSpec,
) -> Result<Option<EvaluationResult>> {
    if spec.low_candidates.is_empty() {
        anyhow::bail!("{} has no low-rarity candidates", spec.name);
    }
    if spec.fee_rate < Decimal::ZERO || spec.fee_rate >= Decimal::ONE {
        anyhow::bail!("{} has fee rate {} outside [0, 1)", spec.name, spec.fee_rate);
    }

    let Some((low_name, low_price)) = cheapest(fetcher, &spec.low_candidates).await else {
        warn!(collection = %spec.name, "No low-rarity prices found, skipping");
        return Ok(None);
    };
    info!(collection = %spec.name, item = %low_name, price = %low_price, "Cheapest input");

    let high_candidates = spec.high_candidates();
    if high_candidates.is_empty() {
        anyhow::bail!("{} has no high-rarity candidates", spec.name);
    }

    let Some((high_name, high_price)) = cheapest(fetcher, &high_candidates).await else {
        warn!(collection = %spec.name, "No high-rarity prices found, skipping");
        return Ok(None);
    };
    info!(collection = %spec.name, item = %high_name, price = %high_price, "Cheapest outcome");

    let p = TradeUpMath::compute(low_price, high_price, spec.fee_rate);
    Ok(Some(EvaluationResult {
        collection: spec.name.clone(),
        cheapest_low_name: low_name,
        cheapest_low_price: low_price,
        cheapest_high_name: high_name,
        cheapest_high_price: high_price,
        cost_of_5x_low: p.cost_of_5x_low,
        high_after_fee: p.high_after_fee,
        net_profit: p.net_profit,
        margin_pct: p.margin_pct,
        price_ratio: p.price_ratio,
        is_profitable: p.is_profitable,
    }))
}

/// Minimum price over `names`. Ties keep the earlier name.
async fn cheapest(
    fetcher: &mut RateLimitedFetcher,
    names: &[String],
) -> Option<(String, Decimal)> {
    let mut best: Option<(String, Decimal)> = None;

    for (i, name) in names.iter().enumerate() {
        let Some(price) = fetcher.fetch_price(name).await else {
            debug!(item = %name, progress = %format!("{}/{}", i + 1, names.len()), "No price");
            continue;
        };

        let better = match &best {
            Some((_, current)) => price < *current,
            None => true,
        };
        if better {
            best = Some((name.clone(), price));
        }
    }

    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
