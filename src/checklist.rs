//! Knife checklist.
//!
//! Every knife × finish × wear × {normal, StatTrak} combination the market
//! can list, with whether a price has been seen for it yet. Progress is
//! persisted so batches can be priced across many runs.

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::catalog::{knives, STAR, STATTRAK};
use crate::fetcher::RateLimitedFetcher;
use crate::storage;
use crate::types::Wear;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    pub knife_type: String,
    pub finish: String,
    pub wear: Wear,
    pub stattrak: bool,
    pub found: bool,
    pub price: Option<Decimal>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl ChecklistEntry {
    fn new(knife_type: &str, finish: &str, wear: Wear, stattrak: bool) -> Self {
        Self {
            knife_type: knife_type.to_string(),
            finish: finish.to_string(),
            wear,
            stattrak,
            found: false,
            price: None,
            last_updated: None,
        }
    }

    /// `★ [StatTrak™ ]Knife | Finish (Wear)`
    pub fn market_name(&self) -> String {
        let prefix = if self.stattrak {
            format!("{STAR} {STATTRAK} ")
        } else {
            format!("{STAR} ")
        };
        format!(
            "{prefix}{} | {} {}",
            self.knife_type,
            self.finish,
            self.wear.suffix()
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KnifeProgress {
    pub total: usize,
    pub found: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionStats {
    pub total: usize,
    pub found: usize,
    pub not_found: usize,
    pub percent: Decimal,
    pub by_knife: BTreeMap<String, KnifeProgress>,
}

/// Result of one `price_batch` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub attempted: usize,
    pub found: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Checklist {
    entries: Vec<ChecklistEntry>,
    path: Option<PathBuf>,
}

impl Checklist {
    /// Full checklist, nothing found yet.
    pub fn generate() -> Self {
        let mut entries = Vec::new();
        for knife in knives::KNIFE_TYPES {
            for finish in knives::knife_finishes(knife) {
                let Some(wears) = knives::finish_wears(finish) else {
                    continue;
                };
                for wear in wears {
                    entries.push(ChecklistEntry::new(knife, finish, *wear, false));
                    entries.push(ChecklistEntry::new(knife, finish, *wear, true));
                }
            }
        }
        Self {
            entries,
            path: None,
        }
    }

    /// Load from `path`, generating (and saving) a fresh checklist if the
    /// file doesn't exist yet.
    pub fn load_or_generate(path: &Path) -> Result<Self> {
        if let Some(entries) = storage::read_json::<Vec<ChecklistEntry>>(path)? {
            let checklist = Self {
                entries,
                path: Some(path.to_path_buf()),
            };
            info!(path = %path.display(), entries = checklist.len(), "Checklist loaded");
            return Ok(checklist);
        }

        let mut checklist = Self::generate();
        checklist.path = Some(path.to_path_buf());
        checklist.save()?;
        info!(path = %path.display(), entries = checklist.len(), "Checklist generated");
        Ok(checklist)
    }

    /// Write to the backing file, if any.
    pub fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => storage::write_json(path, &self.entries),
            None => Ok(()),
        }
    }

    pub fn entries(&self) -> &[ChecklistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mark the entry with this exact market name as found. Returns false if
    /// no entry matches.
    pub fn mark_found(&mut self, market_name: &str, price: Decimal) -> bool {
        match self.entries.iter_mut().find(|e| e.market_name() == market_name) {
            Some(entry) => {
                entry.found = true;
                entry.price = Some(price);
                entry.last_updated = Some(Utc::now());
                true
            }
            None => false,
        }
    }

    pub fn unfound(&self) -> Vec<&ChecklistEntry> {
        self.entries.iter().filter(|e| !e.found).collect()
    }

    pub fn completion_stats(&self) -> CompletionStats {
        let total = self.entries.len();
        let found = self.entries.iter().filter(|e| e.found).count();

        let mut by_knife: BTreeMap<String, KnifeProgress> = BTreeMap::new();
        for entry in &self.entries {
            let progress = by_knife.entry(entry.knife_type.clone()).or_default();
            progress.total += 1;
            if entry.found {
                progress.found += 1;
            }
        }

        let percent = if total > 0 {
            (Decimal::from(found) / Decimal::from(total) * Decimal::ONE_HUNDRED).round_dp(2)
        } else {
            Decimal::ZERO
        };

        CompletionStats {
            total,
            found,
            not_found: total - found,
            percent,
            by_knife,
        }
    }

    /// Price up to `limit` unfound entries through the fetcher, marking the
    /// ones that return a price, then save.
    pub async fn price_batch(
        &mut self,
        fetcher: &mut RateLimitedFetcher,
        limit: usize,
    ) -> Result<BatchOutcome> {
        let names: Vec<String> = self
            .unfound()
            .into_iter()
            .take(limit)
            .map(ChecklistEntry::market_name)
            .collect();

        let mut outcome = BatchOutcome::default();
        for name in &names {
            outcome.attempted += 1;
            if let Some(price) = fetcher.fetch_price(name).await {
                if self.mark_found(name, price) {
                    outcome.found += 1;
                }
            }
        }

        info!(
            attempted = outcome.attempted,
            found = outcome.found,
            remaining = self.unfound().len(),
            "Checklist batch done"
        );
        self.save()?;
        Ok(outcome)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
