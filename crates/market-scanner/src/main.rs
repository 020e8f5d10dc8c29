//! marketmind: run one market scan and print the result as JSON.
//!
//! Usage:
//!   marketmind trap [--fii-long N --fii-short N --dii-long N --dii-short N
//!                    --client-long N --client-short N --pcr X --vix X]
//!   marketmind sectors
//!   marketmind stage2 [--symbols "RELIANCE, SBIN"] [--all]
//!   marketmind hype [--symbols "IREDA, RVNL"] [--sensitivity 2.0]
//!   marketmind gann --symbol TATASTEEL
//!   marketmind heatmap [--list nifty50|banknifty]
//!   marketmind impacts
//!   marketmind lifecycle [--list auto|it|leaders | --symbols "ZOMATO, PAYTM"]
//!   marketmind news --query "Nifty"

mod config;

use analysis_orchestrator::MarketMind;
use anyhow::{bail, Context, Result};
use config::ScannerConfig;
use sentiment_analysis::PositioningSnapshot;
use serde::Serialize;
use smart_watchlist::{normalize, parse_symbol_list, Watchlist};
use std::str::FromStr;
use std::sync::Arc;
use technical_analysis::StageMode;
use yahoo_client::YahooClient;

const COMMANDS: &[&str] = &[
    "trap", "sectors", "stage2", "hype", "gann", "heatmap", "impacts", "lifecycle", "news",
];

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marketmind=info,analysis_orchestrator=info,yahoo_client=warn".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let command = match args.get(1).map(String::as_str) {
        Some(cmd) if COMMANDS.contains(&cmd) => cmd.to_string(),
        _ => {
            print_usage();
            std::process::exit(1);
        }
    };

    let mut config = ScannerConfig::from_env().context("loading configuration")?;
    if let Some(sensitivity) = flag_value::<f64>(&args, "--sensitivity")? {
        config.override_sensitivity(sensitivity)?;
    }
    let stage_mode = if args.iter().any(|a| a == "--all") {
        StageMode::All
    } else {
        StageMode::QualifiedOnly
    };

    tracing::info!("Running {} (cache ttl {}m, {} req/min)", command, config.cache_ttl_minutes, config.rate_limit);
    let client = Arc::new(YahooClient::new(config.yahoo_config()?));
    let mind = MarketMind::new(client.clone(), client, config.scan_settings(stage_mode));

    match command.as_str() {
        "trap" => {
            let snapshot = positioning_from_args(&args, config.positioning)?;
            emit(&mind.trap_detector(&snapshot))
        }
        "sectors" => emit(&mind.sector_compass().await?),
        "stage2" => {
            let symbols = symbols_from_args(&args)?.unwrap_or_else(|| config.stage2_watchlist.clone());
            emit(&mind.stage_two_scan(&symbols).await?)
        }
        "hype" => {
            let symbols = symbols_from_args(&args)?.unwrap_or_else(|| config.hype_watchlist.clone());
            emit(&mind.hype_scan(&symbols).await?)
        }
        "gann" => {
            let raw = flag(&args, "--symbol").context("gann needs --symbol")?;
            emit(&mind.gann_report(&normalize(raw)).await?)
        }
        "heatmap" => {
            let watchlist = watchlist_from_args(&args)?.unwrap_or(Watchlist::Nifty50);
            emit(&mind.heatmap(watchlist).await?)
        }
        "impacts" => emit(&mind.cross_asset_impacts().await?),
        "lifecycle" => {
            let symbols = match symbols_from_args(&args)? {
                Some(symbols) => symbols,
                None => watchlist_from_args(&args)?
                    .unwrap_or(Watchlist::NiftyLeaders)
                    .symbols(),
            };
            emit(&mind.lifecycle(&symbols).await)
        }
        "news" => {
            let query = flag(&args, "--query").unwrap_or("Nifty 50");
            emit(&mind.headlines(query).await?)
        }
        other => bail!("unknown command {}", other),
    }
}

fn emit<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn flag_value<T>(args: &[String], name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    flag(args, name)
        .map(|v| v.parse::<T>().with_context(|| format!("invalid value '{}' for {}", v, name)))
        .transpose()
}

fn symbols_from_args(args: &[String]) -> Result<Option<Vec<String>>> {
    match flag(args, "--symbols") {
        Some(list) => {
            let symbols = parse_symbol_list(list);
            if symbols.is_empty() {
                bail!("--symbols given but no symbols found in '{}'", list);
            }
            Ok(Some(symbols))
        }
        None => Ok(None),
    }
}

fn watchlist_from_args(args: &[String]) -> Result<Option<Watchlist>> {
    flag(args, "--list")
        .map(|key| {
            Watchlist::from_key(key).with_context(|| {
                let known: Vec<&str> = Watchlist::ALL.iter().map(|w| w.key()).collect();
                format!("unknown list '{}', expected one of {}", key, known.join(", "))
            })
        })
        .transpose()
}

/// Command-line positions override the configured ones field by field.
fn positioning_from_args(args: &[String], defaults: PositioningSnapshot) -> Result<PositioningSnapshot> {
    Ok(PositioningSnapshot {
        fii_long: flag_value(args, "--fii-long")?.unwrap_or(defaults.fii_long),
        fii_short: flag_value(args, "--fii-short")?.unwrap_or(defaults.fii_short),
        dii_long: flag_value(args, "--dii-long")?.unwrap_or(defaults.dii_long),
        dii_short: flag_value(args, "--dii-short")?.unwrap_or(defaults.dii_short),
        client_long: flag_value(args, "--client-long")?.unwrap_or(defaults.client_long),
        client_short: flag_value(args, "--client-short")?.unwrap_or(defaults.client_short),
        pcr: flag_value(args, "--pcr")?.unwrap_or(defaults.pcr),
        vix: flag_value(args, "--vix")?.unwrap_or(defaults.vix),
    })
}

fn print_usage() {
    eprintln!("Usage: marketmind <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  trap        Participant positioning signal (--fii-long N, --pcr X, ...)");
    eprintln!("  sectors     Sector rotation against Nifty 50");
    eprintln!("  stage2      Confirmed uptrends (--symbols LIST, --all to include failures)");
    eprintln!("  hype        Volume spikes (--symbols LIST, --sensitivity X)");
    eprintln!("  gann        Square-of-nine levels (--symbol NAME)");
    eprintln!("  heatmap     Day change per constituent (--list nifty50|banknifty)");
    eprintln!("  impacts     Commodity and currency read-through");
    eprintln!("  lifecycle   Growth/margin matrix (--list KEY or --symbols LIST)");
    eprintln!("  news        Headlines (--query TEXT)");
}
