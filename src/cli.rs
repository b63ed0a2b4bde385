//! Command-line arguments.
//!
//! ```text
//! tradeup-scanner [scan] [--config PATH] [--collections focused|full] [--min-profit X] [--top N]
//! tradeup-scanner analyze <low_price> <high_price> [collection] [--config PATH]
//! tradeup-scanner analyze --file QUOTES.json [--config PATH]
//! tradeup-scanner checklist [--batch N] [--config PATH]
//! ```

use anyhow::{bail, Context, Result};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::catalog::CollectionSet;

pub const DEFAULT_CONFIG: &str = "config.toml";

pub const USAGE: &str = "\
Usage:
  tradeup-scanner [scan] [--config PATH] [--collections focused|full] [--min-profit X] [--top N]
  tradeup-scanner analyze <low_price> <high_price> [collection] [--config PATH]
  tradeup-scanner analyze --file QUOTES.json [--config PATH]
  tradeup-scanner checklist [--batch N] [--config PATH]";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Scan {
        collections: Option<CollectionSet>,
        min_profit: Option<Decimal>,
        top_n: Option<usize>,
    },
    Analyze {
        low_price: Decimal,
        high_price: Decimal,
        collection: Option<String>,
    },
    /// Rank a JSON file of `{collection, covert_price, gold_price}` quotes.
    AnalyzeFile {
        path: PathBuf,
    },
    Checklist {
        batch: Option<usize>,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cli {
    pub config: PathBuf,
    pub command: Command,
}

/// Value following a flag, e.g. `--top 5`.
fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .with_context(|| format!("{flag} needs a value"))
}

fn parse_decimal(text: &str, what: &str) -> Result<Decimal> {
    text.trim_start_matches('$')
        .parse::<Decimal>()
        .with_context(|| format!("Invalid {what}: {text}"))
}

/// Parse arguments, excluding the program name.
pub fn parse(args: &[String]) -> Result<Cli> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut collections = None;
    let mut min_profit = None;
    let mut top_n = None;
    let mut batch = None;
    let mut quote_file = None;
    let mut positional: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-h" | "--help" => {
                return Ok(Cli {
                    config,
                    command: Command::Help,
                })
            }
            "--config" | "-c" => {
                config = PathBuf::from(flag_value(args, i, arg)?);
                i += 1;
            }
            "--collections" => {
                collections = Some(flag_value(args, i, arg)?.parse::<CollectionSet>()?);
                i += 1;
            }
            "--min-profit" => {
                min_profit = Some(parse_decimal(flag_value(args, i, arg)?, "minimum profit")?);
                i += 1;
            }
            "--top" => {
                let value = flag_value(args, i, arg)?;
                top_n = Some(value.parse().with_context(|| format!("Invalid --top: {value}"))?);
                i += 1;
            }
            "--file" => {
                quote_file = Some(PathBuf::from(flag_value(args, i, arg)?));
                i += 1;
            }
            "--batch" => {
                let value = flag_value(args, i, arg)?;
                batch = Some(value.parse().with_context(|| format!("Invalid --batch: {value}"))?);
                i += 1;
            }
            // Negative prices are rejected later with a clearer message.
            flag if flag.starts_with("--") => bail!("Unknown option: {flag}\n\n{USAGE}"),
            value => positional.push(value),
        }
        i += 1;
    }

    if let Some(path) = quote_file {
        if positional != ["analyze"] {
            bail!("--file only goes with a bare analyze command\n\n{USAGE}");
        }
        return Ok(Cli {
            config,
            command: Command::AnalyzeFile { path },
        });
    }

    let command = match positional.split_first() {
        None | Some((&"scan", [])) => Command::Scan {
            collections,
            min_profit,
            top_n,
        },
        Some((&"analyze", rest)) => {
            let (low, high, collection) = match rest {
                [low, high] => (low, high, None),
                [low, high, name @ ..] if !name.is_empty() => (low, high, Some(name.join(" "))),
                _ => bail!("analyze needs <low_price> <high_price> [collection]\n\n{USAGE}"),
            };
            let low_price = parse_decimal(low, "low price")?;
            let high_price = parse_decimal(high, "high price")?;
            if low_price < Decimal::ZERO || high_price < Decimal::ZERO {
                bail!("Prices must not be negative");
            }
            Command::Analyze {
                low_price,
                high_price,
                collection,
            }
        }
        Some((&"checklist", [])) => Command::Checklist { batch },
        Some((other, _)) => bail!("Unexpected argument: {other}\n\n{USAGE}"),
    };

    Ok(Cli { config, command })
}
