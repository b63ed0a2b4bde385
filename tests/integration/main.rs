//! Integration tests: full fetch → evaluate → scan → report pipeline over a
//! scripted price source.

mod mock_source;
mod scan_scenarios;
mod steam_transport;
