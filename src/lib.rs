//! TRADEUP: CS2 trade-up profitability scanner
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod catalog;
pub mod checklist;
pub mod cli;
pub mod config;
pub mod engine;
pub mod fetcher;
pub mod market;
pub mod pacing;
pub mod rate_limit;
pub mod report;
pub mod rotation;
pub mod storage;
pub mod types;
