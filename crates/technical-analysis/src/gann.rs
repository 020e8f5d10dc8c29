//! Gann Square of Nine.
//!
//! Price levels are projected by stepping around the square root of an anchor price;
//! time cycles by fixed day offsets from an anchor date.

use analysis_core::{AnalysisError, PriceSeries};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Offsets from the square root of the anchor, in angle order 0°..360°.
/// Index 4 (zero offset) reproduces the anchor itself.
const ROOT_OFFSETS: [f64; 9] = [-2.0, -1.0, -0.5, -0.25, 0.0, 0.25, 0.5, 1.0, 2.0];

/// Calendar cycles in days
pub const CYCLE_DAYS: [i64; 5] = [45, 90, 144, 180, 360];

/// Nine price levels around one anchor price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GannLevelSet {
    pub anchor: f64,
    /// Index `i` is the level at `i * 45` degrees
    pub levels: [f64; 9],
}

impl GannLevelSet {
    pub fn from_anchor(anchor: f64) -> Result<Self, AnalysisError> {
        if !anchor.is_finite() || anchor <= 0.0 {
            return Err(AnalysisError::DegenerateInput(format!(
                "Gann anchor price must be positive, got {}",
                anchor
            )));
        }

        let root = anchor.sqrt();
        let mut levels = ROOT_OFFSETS.map(|offset| (root + offset).powi(2));
        // exact, not a round trip through sqrt
        levels[4] = anchor;

        Ok(Self { anchor, levels })
    }
}

/// Anchor date plus each cycle, keeping only dates strictly after `now`.
pub fn time_cycles_from(anchor: DateTime<Utc>, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    CYCLE_DAYS
        .iter()
        .map(|days| anchor + Duration::days(*days))
        .filter(|date| *date > now)
        .collect()
}

/// Upcoming cycle dates from `anchor`, judged against the wall clock.
pub fn time_cycles(anchor: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    time_cycles_from(anchor, Utc::now())
}

/// Support/resistance summary from one window's extremes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GannReport {
    pub high: f64,
    pub low: f64,
    pub high_levels: GannLevelSet,
    pub low_levels: GannLevelSet,
    /// 360° level above the high
    pub resistance_360: f64,
    /// 90° level below the high
    pub support_90: f64,
    /// 180° level above the low
    pub resistance_180: f64,
    /// The low itself
    pub base_support: f64,
    /// Date of the more recent extreme, the anchor for the cycles
    pub cycle_anchor: DateTime<Utc>,
    pub upcoming_cycles: Vec<DateTime<Utc>>,
}

impl GannReport {
    pub fn from_series(series: &PriceSeries, now: DateTime<Utc>) -> Result<Self, AnalysisError> {
        let (high, high_at) = series
            .highest_high()
            .ok_or_else(|| AnalysisError::InsufficientData("no bars to anchor Gann levels".to_string()))?;
        let (low, low_at) = series
            .lowest_low()
            .ok_or_else(|| AnalysisError::InsufficientData("no bars to anchor Gann levels".to_string()))?;

        let high_levels = GannLevelSet::from_anchor(high)?;
        let low_levels = GannLevelSet::from_anchor(low)?;
        let cycle_anchor = high_at.max(low_at);

        Ok(Self {
            high,
            low,
            resistance_360: high_levels.levels[8],
            support_90: high_levels.levels[2],
            resistance_180: low_levels.levels[7],
            base_support: low_levels.levels[4],
            high_levels,
            low_levels,
            cycle_anchor,
            upcoming_cycles: time_cycles_from(cycle_anchor, now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::Bar;
    use chrono::TimeZone;

    #[test]
    fn test_levels_for_100() {
        let set = GannLevelSet::from_anchor(100.0).unwrap();
        let expected = [64.0, 81.0, 90.25, 95.0625, 100.0, 105.0625, 110.25, 121.0, 144.0];

        assert_eq!(set.levels.len(), 9);
        assert_eq!(set.levels[4], 100.0);
        for (level, want) in set.levels.iter().zip(expected) {
            assert!((level - want).abs() < 1e-9, "{} != {}", level, want);
        }
    }

    #[test]
    fn test_levels_strictly_increasing_above_four() {
        for anchor in [4.5, 17.0, 250.0, 22_345.6] {
            let set = GannLevelSet::from_anchor(anchor).unwrap();
            assert!(set.levels.windows(2).all(|w| w[0] < w[1]), "anchor {}", anchor);
        }
    }

    #[test]
    fn test_non_positive_anchor_rejected() {
        for anchor in [0.0, -25.0, f64::NAN] {
            assert!(matches!(
                GannLevelSet::from_anchor(anchor),
                Err(AnalysisError::DegenerateInput(_))
            ));
        }
    }

    #[test]
    fn test_levels_are_repeatable() {
        for anchor in [1.0, 100.0, 1_847.35] {
            assert_eq!(GannLevelSet::from_anchor(anchor).unwrap(), GannLevelSet::from_anchor(anchor).unwrap());
        }
    }

    #[test]
    fn test_time_cycles_drop_past_dates() {
        let anchor = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let now = anchor + Duration::days(100);
        let cycles = time_cycles_from(anchor, now);

        assert_eq!(
            cycles,
            vec![
                anchor + Duration::days(144),
                anchor + Duration::days(180),
                anchor + Duration::days(360),
            ]
        );
        // exactly on a cycle date is not in the future
        assert!(time_cycles_from(anchor, anchor + Duration::days(360)).is_empty());
    }

    #[test]
    fn test_report_from_series() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = vec![(120.0, 90.0), (144.0, 110.0), (130.0, 100.0), (125.0, 81.0)]
            .into_iter()
            .enumerate()
            .map(|(i, (high, low))| Bar {
                timestamp: start + Duration::days(i as i64),
                open: low,
                high,
                low,
                close: high,
                volume: 1.0,
            })
            .collect();
        let series = PriceSeries::new(bars).unwrap();
        let report = GannReport::from_series(&series, start).unwrap();

        assert_eq!(report.high, 144.0);
        assert_eq!(report.low, 81.0);
        assert!((report.resistance_360 - 196.0).abs() < 1e-9);
        assert!((report.support_90 - 132.25).abs() < 1e-9);
        assert!((report.resistance_180 - 100.0).abs() < 1e-9);
        assert_eq!(report.base_support, 81.0);
        assert_eq!(report.cycle_anchor, start + Duration::days(3));
        assert_eq!(report.upcoming_cycles.len(), CYCLE_DAYS.len());
    }

    #[test]
    fn test_report_is_repeatable() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = (0..30)
            .map(|i| {
                let close = 500.0 + (i as f64 * 0.4).sin() * 40.0;
                Bar {
                    timestamp: start + Duration::days(i),
                    open: close,
                    high: close + 3.0,
                    low: close - 3.0,
                    close,
                    volume: 1.0,
                }
            })
            .collect();
        let series = PriceSeries::new(bars).unwrap();
        let now = start + Duration::days(60);

        assert_eq!(
            GannReport::from_series(&series, now).unwrap(),
            GannReport::from_series(&series, now).unwrap()
        );
    }

    #[test]
    fn test_report_on_empty_series_fails() {
        let result = GannReport::from_series(&PriceSeries::default(), Utc::now());
        assert!(matches!(result, Err(AnalysisError::InsufficientData(_))));
    }
}
