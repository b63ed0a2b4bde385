//! Persistent item-name → price cache.
//!
//! On disk the cache is a flat JSON object of market name to numeric price.
//! Entries never expire. Restored entries take the file's modification time
//! as their fetch time.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::PriceEntry;

#[derive(Debug, Default)]
pub struct PriceCache {
    path: Option<PathBuf>,
    entries: HashMap<String, PriceEntry>,
}

impl PriceCache {
    /// Empty cache that flushes to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            entries: HashMap::new(),
        }
    }

    /// Empty cache with no backing file; `flush` is a no-op.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the cache from `path`. A missing file yields an empty cache.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut cache = Self::new(path.clone());

        let Some(prices) = super::read_json::<HashMap<String, Decimal>>(&path)? else {
            info!(path = %path.display(), "No price cache found, starting empty");
            return Ok(cache);
        };

        let fetched_at = modified_time(&path).unwrap_or_else(Utc::now);
        cache.entries = prices
            .into_iter()
            .map(|(name, price)| {
                let entry = PriceEntry {
                    item_name: name.clone(),
                    price,
                    fetched_at,
                };
                (name, entry)
            })
            .collect();

        info!(path = %path.display(), entries = cache.len(), "Price cache loaded");
        Ok(cache)
    }

    pub fn get(&self, item_name: &str) -> Option<Decimal> {
        self.entries.get(item_name).map(|e| e.price)
    }

    pub fn entry(&self, item_name: &str) -> Option<&PriceEntry> {
        self.entries.get(item_name)
    }

    pub fn put(&mut self, item_name: &str, price: Decimal) {
        self.entries
            .insert(item_name.to_string(), PriceEntry::new(item_name, price));
    }

    /// Write the full mapping, replacing the previous file.
    pub fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let prices: BTreeMap<&str, Decimal> = self
            .entries
            .values()
            .map(|e| (e.item_name.as_str(), e.price))
            .collect();
        super::write_json(path, &prices)?;

        debug!(path = %path.display(), entries = prices.len(), "Price cache flushed");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn modified_time(path: &Path) -> Option<DateTime<Utc>> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(DateTime::<Utc>::from(modified))
}
