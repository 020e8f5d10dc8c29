//! Weinstein Stage 2 detection.
//!
//! A symbol is in a confirmed uptrend when its close sits above a long simple moving average
//! *and* that average is itself rising. How far price has run above the average decides
//! whether it is still an entry or already stretched.

use analysis_core::{OmitReason, Outcome, PriceSeries};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::indicators::sma_at;

/// Trend stage of a symbol relative to its long moving average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendStage {
    /// 0-5% above a rising average
    EarlyEntry,
    /// 5-20% above a rising average
    StrongTrend,
    /// More than 20% above a rising average
    Overheated,
    /// Price below the average, or the average is flat/falling
    NotInUptrend,
}

impl TrendStage {
    pub fn from_extension(percent_above_ma: f64) -> Self {
        match percent_above_ma {
            p if p <= 5.0 => TrendStage::EarlyEntry,
            p if p <= 20.0 => TrendStage::StrongTrend,
            _ => TrendStage::Overheated,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TrendStage::EarlyEntry => "Early Entry",
            TrendStage::StrongTrend => "Strong Trend",
            TrendStage::Overheated => "Overheated",
            TrendStage::NotInUptrend => "Not in Uptrend",
        }
    }

    pub fn is_qualifying(&self) -> bool {
        !matches!(self, TrendStage::NotInUptrend)
    }
}

/// Whether non-qualifying symbols are reported or dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StageMode {
    #[default]
    QualifiedOnly,
    All,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StageConfig {
    /// Moving-average length in bars
    pub window: usize,
    /// How many bars back the average is compared against to judge its slope
    pub slope_lag: usize,
    pub mode: StageMode,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            window: 30,
            slope_lag: 5,
            mode: StageMode::QualifiedOnly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReading {
    pub current_price: f64,
    pub ma_value: f64,
    pub ma_value_lagged: f64,
    pub percent_above_ma: f64,
    pub stage: TrendStage,
    pub as_of: DateTime<Utc>,
}

pub struct TrendStageClassifier {
    config: StageConfig,
}

impl Default for TrendStageClassifier {
    fn default() -> Self {
        Self::new(StageConfig::default())
    }
}

impl TrendStageClassifier {
    pub fn new(config: StageConfig) -> Self {
        Self { config }
    }

    pub fn min_bars(&self) -> usize {
        self.config.window + self.config.slope_lag
    }

    pub fn classify(&self, series: &PriceSeries) -> Outcome<StageReading> {
        let need = self.min_bars();
        let last = match series.last() {
            Some(bar) if series.len() >= need && self.config.window > 0 => bar,
            _ => return Outcome::insufficient(series.len(), need),
        };

        let closes = series.closes();
        let (ma, ma_lagged) = match (
            sma_at(&closes, self.config.window, 0),
            sma_at(&closes, self.config.window, self.config.slope_lag),
        ) {
            (Some(now), Some(then)) => (now, then),
            _ => return Outcome::insufficient(series.len(), need),
        };

        if ma == 0.0 || !ma.is_finite() || !last.close.is_finite() {
            return Outcome::Omitted(OmitReason::Degenerate(format!(
                "moving average {} with close {}",
                ma, last.close
            )));
        }

        let percent_above_ma = (last.close - ma) / ma * 100.0;
        let confirmed = last.close > ma && ma > ma_lagged;
        let stage = if confirmed {
            TrendStage::from_extension(percent_above_ma)
        } else {
            TrendStage::NotInUptrend
        };

        if !stage.is_qualifying() && self.config.mode == StageMode::QualifiedOnly {
            return Outcome::Omitted(OmitReason::NotQualified);
        }

        Outcome::Ready(StageReading {
            current_price: last.close,
            ma_value: ma,
            ma_value_lagged: ma_lagged,
            percent_above_ma,
            stage,
            as_of: last.timestamp,
        })
    }
}
