//! Scan reporting: console summary, CSV and JSON files.

use anyhow::Result;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

use crate::engine::{Profitability, ScanReport};
use crate::storage;
use crate::types::{EvaluationResult, ManualQuote};

const RULE_WIDTH: usize = 90;

/// Which rows make it into a report. Sorting is preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFilter {
    pub min_profit: Option<Decimal>,
    pub top_n: Option<usize>,
}

impl ReportFilter {
    pub fn apply<'a>(&self, results: &'a [EvaluationResult]) -> Vec<&'a EvaluationResult> {
        results
            .iter()
            .filter(|r| self.min_profit.map_or(true, |min| r.net_profit >= min))
            .take(self.top_n.unwrap_or(usize::MAX))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Half away from zero.
fn dp(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

fn status(profitable: bool) -> &'static str {
    if profitable {
        "PROFITABLE"
    } else {
        "UNPROFITABLE"
    }
}

/// Human-readable scan summary.
pub fn render_console(report: &ScanReport, filter: &ReportFilter, fee_rate: Decimal) -> String {
    let mut out = String::new();
    let fee_pct = (fee_rate * Decimal::ONE_HUNDRED).normalize();

    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "TRADE-UP SCAN RESULTS (5 Covert -> 1 Gold)");
    let _ = writeln!(out, "{}", rule());

    if report.interrupted {
        let _ = writeln!(out, "Scan interrupted; partial results below.");
    }

    let rows = filter.apply(&report.results);
    for r in &rows {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} [{}]", r.collection, status(r.is_profitable));
        let _ = writeln!(
            out,
            "  Covert: {} @ ${:.2}",
            r.cheapest_low_name,
            dp(r.cheapest_low_price, 2)
        );
        let _ = writeln!(
            out,
            "  Gold:   {} @ ${:.2}",
            r.cheapest_high_name,
            dp(r.cheapest_high_price, 2)
        );
        let _ = writeln!(
            out,
            "  Ratio: {:.2}x | Cost ${:.2} -> ${:.2} after {}% fee",
            dp(r.price_ratio, 2),
            dp(r.cost_of_5x_low, 2),
            dp(r.high_after_fee, 2),
            fee_pct
        );
        let _ = writeln!(
            out,
            "  Net profit: ${:.2} ({:.1}%)",
            dp(r.net_profit, 2),
            dp(r.margin_pct, 1)
        );
    }

    if rows.len() < report.results.len() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "({} of {} scored collections hidden by filter)",
            report.results.len() - rows.len(),
            report.results.len()
        );
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Unscored: {}", report.skipped.join(", "));
    }
    for (name, reason) in &report.failed {
        let _ = writeln!(out, "Failed: {name} ({reason})");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(
        out,
        "Requests made: {} | Cached prices: {}",
        report.requests_made, report.cache_size
    );
    let _ = writeln!(out, "{}", summary_line(report));
    out
}

/// `N/M profitable, best: ...`
pub fn summary_line(report: &ScanReport) -> String {
    let profitable = report.profitable().count();
    let total = report.results.len();
    match report.best() {
        Some(best) if best.is_profitable => format!(
            "Summary: {profitable}/{total} profitable, best: {} (+${:.2}, {:.1}%)",
            best.collection,
            dp(best.net_profit, 2),
            dp(best.margin_pct, 1)
        ),
        _ => format!("Summary: {profitable}/{total} profitable"),
    }
}

/// Manual analysis block for the `analyze` command.
pub fn render_analysis(
    collection: &str,
    low_price: Decimal,
    high_price: Decimal,
    fee_rate: Decimal,
    p: &Profitability,
) -> String {
    let mut out = String::new();
    let fee_pct = (fee_rate * Decimal::ONE_HUNDRED).normalize();
    let title = if collection.is_empty() { "Manual analysis" } else { collection };

    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{title}");
    let _ = writeln!(
        out,
        "  Covert: ${:.2} | Gold: ${:.2} | Ratio: {:.2}x",
        dp(low_price, 2),
        dp(high_price, 2),
        dp(p.price_ratio, 2)
    );
    let _ = writeln!(out, "  Buy 5x Covert: ${:.2}", dp(p.cost_of_5x_low, 2));
    let _ = writeln!(
        out,
        "  Sell Gold (after {}% fee): ${:.2}",
        fee_pct,
        dp(p.high_after_fee, 2)
    );
    let _ = writeln!(
        out,
        "  Net Profit: ${:.2} ({:.1}%) {}",
        dp(p.net_profit, 2),
        dp(p.margin_pct, 1),
        status(p.is_profitable)
    );
    let _ = writeln!(out, "{}", rule());
    out
}

/// Several manual analyses, already ranked, followed by a profitable count.
pub fn render_batch_analysis(ranked: &[(&ManualQuote, Profitability)], fee_rate: Decimal) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Trade-up analysis (5 Covert -> 1 Gold), {} quotes", ranked.len());
    for (quote, p) in ranked {
        out.push_str(&render_analysis(
            &quote.collection,
            quote.covert_price,
            quote.gold_price,
            fee_rate,
            p,
        ));
    }
    let profitable = ranked.iter().filter(|(_, p)| p.is_profitable).count();
    let _ = writeln!(out, "Summary: {profitable}/{} profitable", ranked.len());
    out
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

const CSV_HEADER: &[&str] = &[
    "collection",
    "cheapest_low_name",
    "cheapest_low_price",
    "cheapest_high_name",
    "cheapest_high_price",
    "price_ratio",
    "cost_of_5x_low",
    "high_after_fee",
    "net_profit",
    "margin_pct",
    "is_profitable",
];

/// Quote a CSV field if it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn render_csv(rows: &[&EvaluationResult]) -> String {
    let mut out = CSV_HEADER.join(",");
    out.push_str("\r\n");

    for r in rows {
        let fields = [
            csv_field(&r.collection),
            csv_field(&r.cheapest_low_name),
            format!("{:.2}", dp(r.cheapest_low_price, 2)),
            csv_field(&r.cheapest_high_name),
            format!("{:.2}", dp(r.cheapest_high_price, 2)),
            format!("{:.2}", dp(r.price_ratio, 2)),
            format!("{:.2}", dp(r.cost_of_5x_low, 2)),
            format!("{:.2}", dp(r.high_after_fee, 2)),
            format!("{:.2}", dp(r.net_profit, 2)),
            format!("{:.2}", dp(r.margin_pct, 2)),
            r.is_profitable.to_string(),
        ];
        out.push_str(&fields.join(","));
        out.push_str("\r\n");
    }
    out
}

pub fn write_csv(path: &Path, rows: &[&EvaluationResult]) -> Result<()> {
    storage::write_atomic(path, render_csv(rows).as_bytes())?;
    info!(path = %path.display(), rows = rows.len(), "CSV report written");
    Ok(())
}

pub fn write_json(path: &Path, rows: &[&EvaluationResult]) -> Result<()> {
    storage::write_json(path, rows)?;
    info!(path = %path.display(), rows = rows.len(), "JSON report written");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
