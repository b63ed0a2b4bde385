//! Scripted price source for integration testing.
//!
//! Provides a deterministic `PriceSource` that answers from an in-memory
//! price table, can be scripted to throttle or fail, and records every
//! lookup. Clones share state, so a test can keep a handle after boxing
//! one into a fetcher.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use tradeup_scanner::market::{PriceSource, SourceError, SourceResponse};

/// One scripted answer, consumed before the price table is consulted.
#[derive(Debug, Clone)]
pub enum Scripted {
    Throttle,
    ThrottlePage,
    Disconnect,
    Respond(u16, String),
}

#[derive(Clone, Default)]
pub struct ScriptedSource {
    prices: Arc<Mutex<HashMap<String, Decimal>>>,
    scripts: Arc<Mutex<HashMap<String, VecDeque<Scripted>>>>,
    calls: Arc<Mutex<Vec<String>>>,
    /// If set, every lookup answers 429.
    always_throttle: Arc<Mutex<bool>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source answering from a `(name, price)` table.
    pub fn with_prices(prices: &[(&str, Decimal)]) -> Self {
        let source = Self::new();
        for (name, price) in prices {
            source.set_price(name, *price);
        }
        source
    }

    pub fn set_price(&self, name: &str, price: Decimal) {
        self.prices.lock().unwrap().insert(name.to_string(), price);
    }

    /// Queue answers for `name`, played back before its table price.
    pub fn script(&self, name: &str, answers: Vec<Scripted>) {
        self.scripts
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .extend(answers);
    }

    pub fn throttle_everything(&self) {
        *self.always_throttle.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    fn price_body(&self, name: &str) -> String {
        match self.prices.lock().unwrap().get(name) {
            Some(price) => format!(r#"{{"success":true,"lowest_price":"${price}","volume":"12"}}"#),
            None => r#"{"success":false}"#.to_string(),
        }
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    async fn price_overview(&self, item_name: &str) -> Result<SourceResponse, SourceError> {
        self.calls.lock().unwrap().push(item_name.to_string());

        if *self.always_throttle.lock().unwrap() {
            return Ok(SourceResponse::new(429, ""));
        }

        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(item_name)
            .and_then(|queue| queue.pop_front());

        match next {
            Some(Scripted::Throttle) => Ok(SourceResponse::new(429, "Too Many Requests")),
            Some(Scripted::ThrottlePage) => Ok(SourceResponse::new(
                200,
                "<html>Please wait before trying again.</html>",
            )),
            Some(Scripted::Disconnect) => Err(SourceError::Transport(
                "connection closed before message completed".to_string(),
            )),
            Some(Scripted::Respond(status, body)) => Ok(SourceResponse::new(status, body)),
            None => Ok(SourceResponse::new(200, self.price_body(item_name))),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
