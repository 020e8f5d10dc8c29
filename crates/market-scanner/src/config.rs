use analysis_orchestrator::ScanSettings;
use anyhow::{ensure, Context, Result};
use flow_map::RotationConfig;
use sentiment_analysis::PositioningSnapshot;
use serde::{Deserialize, Serialize};
use smart_watchlist::{parse_symbol_list, Watchlist};
use std::env;
use std::str::FromStr;
use technical_analysis::{StageConfig, StageMode};
use yahoo_client::YahooConfig;

/// One week
const MAX_CACHE_TTL_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    // Data provider
    pub cache_ttl_minutes: i64,
    pub rate_limit: usize,

    // Scan parameters
    pub hype_sensitivity: f64,
    pub rrg_lookback: usize,
    pub rrg_momentum_lag: usize,
    pub stage_ma_window: usize,
    pub stage_slope_lag: usize,

    // Default watchlists, already normalized
    pub stage2_watchlist: Vec<String>,
    pub hype_watchlist: Vec<String>,

    // Participant positions used when none are given on the command line
    pub positioning: PositioningSnapshot,
}

impl ScannerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = Self {
            cache_ttl_minutes: parse(&var("MARKETMIND_CACHE_TTL_MINUTES", "15"), "MARKETMIND_CACHE_TTL_MINUTES")?,
            rate_limit: parse(&var("MARKETMIND_RATE_LIMIT", "60"), "MARKETMIND_RATE_LIMIT")?,

            hype_sensitivity: parse(&var("HYPE_SENSITIVITY", "1.5"), "HYPE_SENSITIVITY")?,
            rrg_lookback: parse(&var("RRG_LOOKBACK", "20"), "RRG_LOOKBACK")?,
            rrg_momentum_lag: parse(&var("RRG_MOMENTUM_LAG", "10"), "RRG_MOMENTUM_LAG")?,
            stage_ma_window: parse(&var("STAGE_MA_WINDOW", "30"), "STAGE_MA_WINDOW")?,
            stage_slope_lag: parse(&var("STAGE_SLOPE_LAG", "5"), "STAGE_SLOPE_LAG")?,

            stage2_watchlist: parse_symbol_list(&var("STAGE2_WATCHLIST", &Watchlist::StageTwo.as_input())),
            hype_watchlist: parse_symbol_list(&var("HYPE_WATCHLIST", &Watchlist::Hype.as_input())),

            positioning: PositioningSnapshot {
                fii_long: parse(&var("FII_LONG", "35000"), "FII_LONG")?,
                fii_short: parse(&var("FII_SHORT", "125000"), "FII_SHORT")?,
                dii_long: parse(&var("DII_LONG", "55000"), "DII_LONG")?,
                dii_short: parse(&var("DII_SHORT", "25000"), "DII_SHORT")?,
                client_long: parse(&var("CLIENT_LONG", "300000"), "CLIENT_LONG")?,
                client_short: parse(&var("CLIENT_SHORT", "150000"), "CLIENT_SHORT")?,
                pcr: parse(&var("PCR", "0.75"), "PCR")?,
                vix: parse(&var("VIX", "12.5"), "VIX")?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.rate_limit > 0, "MARKETMIND_RATE_LIMIT must be at least 1");
        ensure!(
            (0..=MAX_CACHE_TTL_MINUTES).contains(&self.cache_ttl_minutes),
            "MARKETMIND_CACHE_TTL_MINUTES must be between 0 and {}",
            MAX_CACHE_TTL_MINUTES
        );
        ensure!(self.rrg_lookback > 0, "RRG_LOOKBACK must be at least 1");
        ensure!(self.stage_ma_window > 0, "STAGE_MA_WINDOW must be at least 1");
        check_sensitivity(self.hype_sensitivity).context("HYPE_SENSITIVITY")?;
        Ok(())
    }

    /// Applies a command-line `--sensitivity` on top of the environment value.
    pub fn override_sensitivity(&mut self, sensitivity: f64) -> Result<()> {
        check_sensitivity(sensitivity).context("--sensitivity")?;
        self.hype_sensitivity = sensitivity;
        Ok(())
    }

    pub fn scan_settings(&self, stage_mode: StageMode) -> ScanSettings {
        ScanSettings {
            rotation: RotationConfig {
                lookback: self.rrg_lookback,
                momentum_lag: self.rrg_momentum_lag,
            },
            stage: StageConfig {
                window: self.stage_ma_window,
                slope_lag: self.stage_slope_lag,
                mode: stage_mode,
            },
            hype_sensitivity: self.hype_sensitivity,
        }
    }

    pub fn yahoo_config(&self) -> Result<YahooConfig> {
        let cache_ttl = chrono::Duration::try_minutes(self.cache_ttl_minutes)
            .with_context(|| format!("cache TTL of {} minutes is out of range", self.cache_ttl_minutes))?;
        Ok(YahooConfig {
            rate_limit: self.rate_limit,
            cache_ttl,
            ..Default::default()
        })
    }
}

fn check_sensitivity(sensitivity: f64) -> Result<()> {
    ensure!(
        sensitivity.is_finite() && sensitivity >= 0.0,
        "sensitivity must be a non-negative number, got {}",
        sensitivity
    );
    Ok(())
}

fn parse<T>(value: &str, key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("invalid value '{}' for {}", value, key))
}
