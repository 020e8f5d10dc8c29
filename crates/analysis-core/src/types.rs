use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AnalysisError;

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Time-ordered bars for one symbol.
///
/// Timestamps are strictly increasing and volumes are never negative. Both are checked
/// when the series is built, so analytics can index from the back without re-validating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Bar>", into = "Vec<Bar>")]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, AnalysisError> {
        for (i, bar) in bars.iter().enumerate() {
            if bar.volume < 0.0 {
                return Err(AnalysisError::InvalidData(format!(
                    "negative volume {} at {}",
                    bar.volume, bar.timestamp
                )));
            }
            if i > 0 && bars[i - 1].timestamp >= bar.timestamp {
                return Err(AnalysisError::InvalidData(format!(
                    "timestamps not strictly increasing at {}",
                    bar.timestamp
                )));
            }
        }
        Ok(Self { bars })
    }

    /// Sorts by timestamp and keeps the last bar for any repeated timestamp.
    pub fn from_unordered(mut bars: Vec<Bar>) -> Result<Self, AnalysisError> {
        bars.sort_by_key(|b| b.timestamp);
        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => *last = bar,
                _ => deduped.push(bar),
            }
        }
        Self::new(deduped)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Highest high together with the bar's timestamp.
    pub fn highest_high(&self) -> Option<(f64, DateTime<Utc>)> {
        self.bars
            .iter()
            .filter(|b| b.high.is_finite())
            .max_by(|a, b| a.high.total_cmp(&b.high))
            .map(|b| (b.high, b.timestamp))
    }

    /// Lowest low together with the bar's timestamp.
    pub fn lowest_low(&self) -> Option<(f64, DateTime<Utc>)> {
        self.bars
            .iter()
            .filter(|b| b.low.is_finite())
            .min_by(|a, b| a.low.total_cmp(&b.low))
            .map(|b| (b.low, b.timestamp))
    }

    /// Pairs of (self close, other close) on the timestamps both series share.
    pub fn aligned_closes(&self, other: &PriceSeries) -> Vec<(f64, f64)> {
        let mut pairs = Vec::with_capacity(self.len().min(other.len()));
        let (mut i, mut j) = (0, 0);
        while i < self.bars.len() && j < other.bars.len() {
            let (a, b) = (&self.bars[i], &other.bars[j]);
            match a.timestamp.cmp(&b.timestamp) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    pairs.push((a.close, b.close));
                    i += 1;
                    j += 1;
                }
            }
        }
        pairs
    }
}

impl TryFrom<Vec<Bar>> for PriceSeries {
    type Error = AnalysisError;

    fn try_from(bars: Vec<Bar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}

impl From<PriceSeries> for Vec<Bar> {
    fn from(series: PriceSeries) -> Self {
        series.bars
    }
}

/// History window requested from a data provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
        }
    }
}

/// Bar granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    Hour1,
    Day1,
    Week1,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Hour1 => "1h",
            Interval::Day1 => "1d",
            Interval::Week1 => "1wk",
        }
    }
}

/// Display colour attached to a signal. The presentation layer decides how to paint it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Green,
    Red,
    Orange,
    Yellow,
    Blue,
    Gray,
}

impl ColorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTag::Green => "green",
            ColorTag::Red => "red",
            ColorTag::Orange => "orange",
            ColorTag::Yellow => "yellow",
            ColorTag::Blue => "blue",
            ColorTag::Gray => "gray",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            ColorTag::Green => "#00FF00",
            ColorTag::Red => "#FF0000",
            ColorTag::Orange => "#FFA500",
            ColorTag::Yellow => "#FFFF00",
            ColorTag::Blue => "#00CCFF",
            ColorTag::Gray => "#808080",
        }
    }
}

/// News headline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
}

/// Growth and margin figures as reported by the provider (fractions, not percentages).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    pub symbol: String,
    pub name: Option<String>,
    pub revenue_growth: Option<f64>,
    pub quarterly_revenue_growth: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub profit_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub gross_margin: Option<f64>,
    pub market_cap: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn bar(day: i64, close: f64, volume: f64) -> Bar {
        Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume,
        }
    }

    #[test]
    fn test_series_rejects_unordered_timestamps() {
        let result = PriceSeries::new(vec![bar(1, 10.0, 1.0), bar(0, 11.0, 1.0)]);
        assert!(matches!(result, Err(AnalysisError::InvalidData(_))));

        let result = PriceSeries::new(vec![bar(0, 10.0, 1.0), bar(0, 11.0, 1.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_series_rejects_negative_volume() {
        let result = PriceSeries::new(vec![bar(0, 10.0, -5.0)]);
        assert!(matches!(result, Err(AnalysisError::InvalidData(_))));
    }

    #[test]
    fn test_from_unordered_sorts_and_dedups() {
        let series =
            PriceSeries::from_unordered(vec![bar(2, 12.0, 1.0), bar(0, 10.0, 1.0), bar(2, 13.0, 1.0)])
                .unwrap();
        assert_eq!(series.closes(), vec![10.0, 13.0]);
    }

    #[test]
    fn test_aligned_closes_inner_join() {
        let a = PriceSeries::new(vec![bar(0, 1.0, 0.0), bar(1, 2.0, 0.0), bar(3, 4.0, 0.0)]).unwrap();
        let b = PriceSeries::new(vec![bar(1, 20.0, 0.0), bar(2, 30.0, 0.0), bar(3, 40.0, 0.0)]).unwrap();
        assert_eq!(a.aligned_closes(&b), vec![(2.0, 20.0), (4.0, 40.0)]);
    }

    #[test]
    fn test_extremes() {
        let series = PriceSeries::new(vec![bar(0, 10.0, 1.0), bar(1, 30.0, 1.0), bar(2, 5.0, 1.0)]).unwrap();
        let (high, high_at) = series.highest_high().unwrap();
        let (low, low_at) = series.lowest_low().unwrap();
        assert_eq!(high, 31.0);
        assert_eq!(high_at, series.bars()[1].timestamp);
        assert_eq!(low, 4.0);
        assert_eq!(low_at, series.bars()[2].timestamp);
    }

    #[test]
    fn test_deserialize_validates() {
        let bars = vec![bar(1, 10.0, 1.0), bar(0, 11.0, 1.0)];
        let json = serde_json::to_string(&bars).unwrap();
        assert!(serde_json::from_str::<PriceSeries>(&json).is_err());
    }
}
