//! Static item catalog.
//!
//! Finish sets, knife availability, wear ranges and the built-in
//! collection tables, plus helpers that render exact market names.

pub mod collections;
pub mod knives;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;
use tracing::info;

use crate::types::{CollectionSpec, Wear};

pub use collections::{focused_collections, full_collections};

/// Star prefix carried by every knife and glove market name.
pub const STAR: &str = "★";

/// StatTrak marker as it appears in market names.
pub const STATTRAK: &str = "StatTrak™";

// ---------------------------------------------------------------------------
// Finish sets
// ---------------------------------------------------------------------------

pub const ORIGINAL_FINISHES: &[&str] = &[
    "Blue Steel", "Boreal Forest", "Case Hardened", "Crimson Web",
    "Fade", "Forest DDPAT", "Night", "Safari Mesh", "Scorched",
    "Slaughter", "Stained", "Urban Masked",
];

pub const CHROMA_FINISHES: &[&str] = &[
    "Damascus Steel", "Doppler", "Marble Fade", "Rust Coat",
    "Tiger Tooth", "Ultraviolet",
];

pub const GAMMA_FINISHES: &[&str] = &[
    "Autotronic", "Black Laminate", "Bright Water",
    "Freehand", "Gamma Doppler", "Lore",
];

pub const GLOVE_SET_1_FINISHES: &[&str] = &[
    "Crimson Kimono", "Emerald Web", "Hedge Maze", "Superconductor",
    "Crimson Weave", "Diamondback", "Pandora's Box", "Bronzed",
    "Snakebite", "Convoy", "Lunar Weave", "POW!", "Racing Green",
    "Badlands", "Cool Mint", "Buckshot", "Foundation", "Transport",
    "Overtake", "Imperial Plaid", "Leather", "Slaughter",
];

pub const GLOVE_SET_2_FINISHES: &[&str] = &[
    "King Snake", "Vice", "Amphibious", "Fade", "Omega",
    "Emerald", "Mogul", "Arid", "Snow Leopard", "Polygon",
    "Rattler", "Imperial Plaid", "Blood Pressure", "Overtake",
    "Crimson Weave", "Finish Line", "Lunar Weave",
];

pub const GLOVE_SET_3_FINISHES: &[&str] = &[
    "Marble Fade", "Tiger Strike", "Snow Leopard", "Nocts",
    "Unhinged", "Needle Point", "Jade", "Yellow-banded",
    "Temukau", "Bronze Morph", "Overprint", "Omega",
    "Desert Shamagh", "Diamondback", "Constrictor", "Emerald",
];

/// Cheapest-looking finishes per finish family, cheapest first.
/// The first entry of each list identifies the family.
const PRIORITY_FINISHES: &[&[&str]] = &[
    &["Safari Mesh", "Boreal Forest", "Forest DDPAT", "Scorched", "Urban Masked", "Stained"],
    &["Rust Coat", "Ultraviolet", "Damascus Steel"],
    &["Bright Water", "Black Laminate"],
];

/// Pick up to `n` finishes to sample from a finish set.
///
/// If the set belongs to a family with a known cheap-finish ordering, the
/// priority list (restricted to finishes in the set) is used; otherwise the
/// first `n` finishes of the set are taken.
pub fn sample_finishes(finishes: &[String], n: usize) -> Vec<String> {
    for priority in PRIORITY_FINISHES {
        if finishes.iter().any(|f| f == priority[0]) {
            return priority
                .iter()
                .filter(|p| finishes.iter().any(|f| f == *p))
                .take(n)
                .map(|p| p.to_string())
                .collect();
        }
    }
    finishes.iter().take(n).cloned().collect()
}

/// Whether a finish can roll the given wear. Unknown finishes (gloves,
/// weapon skins) are assumed to cover the full range.
pub fn finish_has_wear(finish: &str, wear: Wear) -> bool {
    match knives::finish_wears(finish) {
        Some(wears) => wears.contains(&wear),
        None => true,
    }
}

// ---------------------------------------------------------------------------
// Market names
// ---------------------------------------------------------------------------

/// `★ Model`, the finish-less listing.
pub fn vanilla_name(model: &str) -> String {
    format!("{STAR} {model}")
}

/// `★ Model | Finish (Wear)`, or `★ Model | Finish` without a wear.
pub fn gold_name(model: &str, finish: &str, wear: Option<Wear>) -> String {
    match wear {
        Some(w) => format!("{STAR} {model} | {finish} {}", w.suffix()),
        None => format!("{STAR} {model} | {finish}"),
    }
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Which built-in collection table to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionSet {
    /// Six accessible cases, sampled gold outcomes.
    Focused,
    /// Every case of the original scanner.
    Full,
}

impl std::str::FromStr for CollectionSet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "focused" => Ok(CollectionSet::Focused),
            "full" | "all" => Ok(CollectionSet::Full),
            _ => anyhow::bail!("Unknown collection set: {s} (expected 'focused' or 'full')"),
        }
    }
}

/// Built-in collections for a set, with the configured fee applied.
pub fn builtin(set: CollectionSet, fee_rate: Decimal) -> Vec<CollectionSpec> {
    let specs = match set {
        CollectionSet::Focused => focused_collections(),
        CollectionSet::Full => full_collections(),
    };
    specs.into_iter().map(|s| s.with_fee_rate(fee_rate)).collect()
}

/// Load collection specs from a JSON array file. The configured fee rate
/// replaces whatever the file carries.
pub fn load_collections(path: &Path, fee_rate: Decimal) -> Result<Vec<CollectionSpec>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read collections file: {}", path.display()))?;
    let specs: Vec<CollectionSpec> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse collections file: {}", path.display()))?;

    info!(path = %path.display(), count = specs.len(), "Collections loaded from file");
    Ok(specs.into_iter().map(|s| s.with_fee_rate(fee_rate)).collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
