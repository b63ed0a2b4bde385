//! Core engine: evaluate collections, then scan them all.

pub mod evaluator;
pub mod scanner;

pub use evaluator::{evaluate, load_manual_quotes, Profitability, TradeUpMath};
pub use scanner::{ScanOrchestrator, ScanReport};
