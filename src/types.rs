//! Shared types for the trade-up scanner.
//!
//! These types form the data model used across all modules: cached
//! prices, static collection specs, and per-collection evaluation results.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog;

/// Default marketplace fee applied when selling the produced item.
pub const DEFAULT_FEE_RATE: Decimal = dec!(0.13);

/// Number of low-rarity items consumed by one trade-up contract.
pub const TRADE_UP_INPUTS: u32 = 5;

// ---------------------------------------------------------------------------
// Price entry
// ---------------------------------------------------------------------------

/// A known market price for one exact market item name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    /// Exact market hash name, including wear suffix and StatTrak marker.
    pub item_name: String,
    pub price: Decimal,
    pub fetched_at: DateTime<Utc>,
}

impl PriceEntry {
    pub fn new(item_name: impl Into<String>, price: Decimal) -> Self {
        Self {
            item_name: item_name.into(),
            price,
            fetched_at: Utc::now(),
        }
    }
}

impl fmt::Display for PriceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ ${:.2}", self.item_name, self.price)
    }
}

// ---------------------------------------------------------------------------
// Wear
// ---------------------------------------------------------------------------

/// Exterior wear condition, part of every skin's market name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wear {
    FactoryNew,
    MinimalWear,
    FieldTested,
    WellWorn,
    BattleScarred,
}

impl Wear {
    pub const ALL: &'static [Wear] = &[
        Wear::FactoryNew,
        Wear::MinimalWear,
        Wear::FieldTested,
        Wear::WellWorn,
        Wear::BattleScarred,
    ];

    /// Full label as it appears in a market name.
    pub fn label(&self) -> &'static str {
        match self {
            Wear::FactoryNew => "Factory New",
            Wear::MinimalWear => "Minimal Wear",
            Wear::FieldTested => "Field-Tested",
            Wear::WellWorn => "Well-Worn",
            Wear::BattleScarred => "Battle-Scarred",
        }
    }

    /// Two-letter abbreviation (FN, MW, FT, WW, BS).
    pub fn short(&self) -> &'static str {
        match self {
            Wear::FactoryNew => "FN",
            Wear::MinimalWear => "MW",
            Wear::FieldTested => "FT",
            Wear::WellWorn => "WW",
            Wear::BattleScarred => "BS",
        }
    }

    /// Suffix appended to a skin name, e.g. `(Field-Tested)`.
    pub fn suffix(&self) -> String {
        format!("({})", self.label())
    }
}

impl fmt::Display for Wear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Wear {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().trim_start_matches('(').trim_end_matches(')');
        Wear::ALL
            .iter()
            .copied()
            .find(|w| {
                w.short().eq_ignore_ascii_case(normalised)
                    || w.label().eq_ignore_ascii_case(normalised)
            })
            .ok_or_else(|| anyhow::anyhow!("Unknown wear condition: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Collection spec
// ---------------------------------------------------------------------------

/// Where the high-rarity candidate names of a collection come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoldPool {
    /// A fixed list of exact market names.
    Explicit { items: Vec<String> },
    /// Model × finish × wear combinations generated on demand.
    Generated {
        models: Vec<String>,
        finishes: Vec<String>,
        /// Empty means names are generated without a wear suffix.
        #[serde(default)]
        wears: Vec<Wear>,
        /// Also try the plain `★ Model` listing.
        #[serde(default)]
        include_vanilla: bool,
        /// Only use the first N models.
        #[serde(default)]
        max_models: Option<usize>,
        /// Only use N finishes, picked from the cheap-finish priority lists.
        #[serde(default)]
        max_finishes: Option<usize>,
    },
}

impl GoldPool {
    /// Expand the pool into exact market names, in lookup order.
    ///
    /// Generated pools list the vanilla listing first (when enabled), then
    /// iterate model → finish → wear. Wear conditions a finish cannot roll
    /// are skipped.
    pub fn candidates(&self) -> Vec<String> {
        match self {
            GoldPool::Explicit { items } => items.clone(),
            GoldPool::Generated {
                models,
                finishes,
                wears,
                include_vanilla,
                max_models,
                max_finishes,
            } => {
                let models: Vec<&String> = match max_models {
                    Some(n) => models.iter().take(*n).collect(),
                    None => models.iter().collect(),
                };
                let finishes: Vec<String> = match max_finishes {
                    Some(n) => catalog::sample_finishes(finishes, *n),
                    None => finishes.clone(),
                };

                let mut names = Vec::new();
                if *include_vanilla {
                    names.extend(models.iter().map(|m| catalog::vanilla_name(m)));
                }
                for model in &models {
                    for finish in &finishes {
                        if wears.is_empty() {
                            names.push(catalog::gold_name(model, finish, None));
                            continue;
                        }
                        for wear in wears {
                            if catalog::finish_has_wear(finish, *wear) {
                                names.push(catalog::gold_name(model, finish, Some(*wear)));
                            }
                        }
                    }
                }
                names
            }
        }
    }
}

fn default_fee_rate() -> Decimal {
    DEFAULT_FEE_RATE
}

/// Static description of one collection's trade-up: which low-rarity items
/// can be consumed and which high-rarity items can come out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSpec {
    pub name: String,
    /// Low-rarity (Covert) candidate market names.
    pub low_candidates: Vec<String>,
    /// High-rarity (Gold) outcomes.
    pub high: GoldPool,
    /// Marketplace fee rate applied to the produced item's sale.
    #[serde(default = "default_fee_rate")]
    pub fee_rate: Decimal,
}

impl CollectionSpec {
    pub fn new(name: impl Into<String>, low_candidates: Vec<String>, high: GoldPool) -> Self {
        Self {
            name: name.into(),
            low_candidates,
            high,
            fee_rate: DEFAULT_FEE_RATE,
        }
    }

    pub fn with_fee_rate(mut self, fee_rate: Decimal) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    /// Exact market names of every high-rarity outcome to price.
    pub fn high_candidates(&self) -> Vec<String> {
        self.high.candidates()
    }
}

// ---------------------------------------------------------------------------
// Evaluation result
// ---------------------------------------------------------------------------

/// Hand-entered prices for the offline `analyze --file` command. Field
/// names follow the JSON the file holds:
/// `[{"collection": "Chroma Case", "covert_price": 40.0, "gold_price": 250.0}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualQuote {
    #[serde(default = "unknown_collection")]
    pub collection: String,
    pub covert_price: Decimal,
    pub gold_price: Decimal,
}

fn unknown_collection() -> String {
    "Unknown".to_string()
}

/// Profitability of one collection's trade-up, computed once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub collection: String,
    pub cheapest_low_name: String,
    pub cheapest_low_price: Decimal,
    pub cheapest_high_name: String,
    pub cheapest_high_price: Decimal,
    pub cost_of_5x_low: Decimal,
    pub high_after_fee: Decimal,
    pub net_profit: Decimal,
    pub margin_pct: Decimal,
    /// High price divided by low price; zero when the low price is zero.
    pub price_ratio: Decimal,
    pub is_profitable: bool,
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: 5x {} @ ${:.2} -> {} @ ${:.2} | profit ${:.2} ({:.1}%)",
            self.collection,
            self.cheapest_low_name,
            self.cheapest_low_price,
            self.cheapest_high_name,
            self.cheapest_high_price,
            self.net_profit,
            self.margin_pct,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wear_suffix() {
        assert_eq!(Wear::FieldTested.suffix(), "(Field-Tested)");
        assert_eq!(Wear::BattleScarred.short(), "BS");
    }

    #[test]
    fn test_wear_from_str() {
        assert_eq!("FT".parse::<Wear>().unwrap(), Wear::FieldTested);
        assert_eq!("(Minimal Wear)".parse::<Wear>().unwrap(), Wear::MinimalWear);
        assert_eq!("well-worn".parse::<Wear>().unwrap(), Wear::WellWorn);
        assert!("Pristine".parse::<Wear>().is_err());
    }

    #[test]
    fn test_explicit_pool_keeps_order() {
        let pool = GoldPool::Explicit {
            items: vec!["X".to_string(), "Y".to_string()],
        };
        assert_eq!(pool.candidates(), vec!["X", "Y"]);
    }

    #[test]
    fn test_generated_pool_vanilla_first() {
        let pool = GoldPool::Generated {
            models: vec!["Huntsman Knife".to_string()],
            finishes: vec!["Safari Mesh".to_string()],
            wears: vec![Wear::FieldTested, Wear::BattleScarred],
            include_vanilla: true,
            max_models: None,
            max_finishes: None,
        };
        assert_eq!(
            pool.candidates(),
            vec![
                "★ Huntsman Knife",
                "★ Huntsman Knife | Safari Mesh (Field-Tested)",
                "★ Huntsman Knife | Safari Mesh (Battle-Scarred)",
            ]
        );
    }

    #[test]
    fn test_generated_pool_skips_impossible_wears() {
        // Rust Coat only rolls Well-Worn and Battle-Scarred.
        let pool = GoldPool::Generated {
            models: vec!["Karambit".to_string()],
            finishes: vec!["Rust Coat".to_string()],
            wears: vec![Wear::FieldTested, Wear::BattleScarred],
            include_vanilla: false,
            max_models: None,
            max_finishes: None,
        };
        assert_eq!(
            pool.candidates(),
            vec!["★ Karambit | Rust Coat (Battle-Scarred)"]
        );
    }

    #[test]
    fn test_generated_pool_without_wears() {
        let pool = GoldPool::Generated {
            models: vec!["Sport Gloves".to_string(), "Moto Gloves".to_string()],
            finishes: vec!["Vice".to_string()],
            wears: vec![],
            include_vanilla: false,
            max_models: Some(1),
            max_finishes: None,
        };
        assert_eq!(pool.candidates(), vec!["★ Sport Gloves | Vice"]);
    }

    #[test]
    fn test_collection_spec_default_fee() {
        let spec = CollectionSpec::new("Test", vec![], GoldPool::Explicit { items: vec![] });
        assert_eq!(spec.fee_rate, dec!(0.13));
        assert_eq!(spec.with_fee_rate(dec!(0.15)).fee_rate, dec!(0.15));
    }

    #[test]
    fn test_collection_spec_deserialize_defaults_fee() {
        let json = r#"{
            "name": "Test Case",
            "low_candidates": ["A"],
            "high": { "kind": "explicit", "items": ["X"] }
        }"#;
        let spec: CollectionSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.fee_rate, DEFAULT_FEE_RATE);
        assert_eq!(spec.high_candidates(), vec!["X"]);
    }
}
