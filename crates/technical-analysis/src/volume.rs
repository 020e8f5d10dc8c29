use analysis_core::{OmitReason, Outcome, PriceSeries};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::indicators::mean;

/// Fewest bars a volume baseline is computed from
pub const MIN_VOLUME_BARS: usize = 5;

/// How far volume has run above its baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VolumeIntensity {
    /// More than 5x the baseline
    Explosive,
    /// More than 2x
    Elevated,
    /// Above the baseline
    Active,
    /// At or below the baseline
    Quiet,
}

impl VolumeIntensity {
    pub fn from_factor(factor: f64) -> Self {
        if factor > 5.0 {
            VolumeIntensity::Explosive
        } else if factor > 2.0 {
            VolumeIntensity::Elevated
        } else if factor > 1.0 {
            VolumeIntensity::Active
        } else {
            VolumeIntensity::Quiet
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VolumeIntensity::Explosive => "Explosive",
            VolumeIntensity::Elevated => "Elevated",
            VolumeIntensity::Active => "Active",
            VolumeIntensity::Quiet => "Quiet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeSpike {
    pub price: f64,
    pub spike_factor: f64,
    pub intensity: VolumeIntensity,
    pub as_of: DateTime<Utc>,
}

/// Flags symbols trading far more volume than usual.
pub struct VolumeAnomalyDetector;

impl VolumeAnomalyDetector {
    /// Compare the reference bar's volume with the rest of the window.
    ///
    /// The reference bar is the last one, unless it printed zero volume (halted or not yet
    /// traded session), in which case the bar before it stands in. Symbols whose factor
    /// does not exceed `sensitivity` are omitted.
    ///
    /// The baseline is the mean volume of every *other* bar in the window, so the reference
    /// bar does not dilute its own average: a bar at 6x its peers scores 6.0, where a plain
    /// full-window mean would give 4.8 over 20 bars.
    pub fn detect(series: &PriceSeries, sensitivity: f64) -> Outcome<VolumeSpike> {
        let bars = series.bars();
        if bars.len() < MIN_VOLUME_BARS {
            return Outcome::insufficient(bars.len(), MIN_VOLUME_BARS);
        }

        let last = bars.len() - 1;
        let reference = if bars[last].volume > 0.0 { last } else { last - 1 };
        let bar = &bars[reference];

        let mut baseline = series.volumes();
        baseline.remove(reference);
        let average = mean(&baseline);
        if average <= 0.0 || !average.is_finite() {
            return Outcome::Omitted(OmitReason::Degenerate(format!(
                "baseline volume {}",
                average
            )));
        }

        let spike_factor = bar.volume / average;
        if spike_factor <= sensitivity {
            return Outcome::Omitted(OmitReason::BelowThreshold);
        }

        Outcome::Ready(VolumeSpike {
            price: bar.close,
            spike_factor,
            intensity: VolumeIntensity::from_factor(spike_factor),
            as_of: bar.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::Bar;
    use chrono::{Duration, TimeZone};

    fn series(volumes: &[f64]) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let bars = volumes
            .iter()
            .enumerate()
            .map(|(i, &volume)| Bar {
                timestamp: start + Duration::days(i as i64),
                open: 10.0 + i as f64,
                high: 11.0 + i as f64,
                low: 9.0 + i as f64,
                close: 10.0 + i as f64,
                volume,
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    #[test]
    fn test_six_x_spike_is_explosive() {
        let mut volumes = vec![1_000.0; 19];
        volumes.push(6_000.0);
        let spike = VolumeAnomalyDetector::detect(&series(&volumes), 1.0)
            .ready()
            .expect("6x spike should be reported");

        assert!((spike.spike_factor - 6.0).abs() < 1e-9);
        assert_eq!(spike.intensity, VolumeIntensity::Explosive);
        assert_eq!(spike.price, 29.0);
    }

    #[test]
    fn test_zero_volume_falls_back_to_previous_bar() {
        let mut volumes = vec![1_000.0; 8];
        volumes.push(3_000.0);
        volumes.push(0.0);
        let s = series(&volumes);
        let spike = VolumeAnomalyDetector::detect(&s, 1.5).ready().unwrap();

        assert_eq!(spike.as_of, s.bars()[8].timestamp);
        assert_eq!(spike.price, s.bars()[8].close);
        // baseline: eight bars of 1000 plus the zero bar
        assert!((spike.spike_factor - 3_000.0 / (8_000.0 / 9.0)).abs() < 1e-9);
        assert_eq!(spike.intensity, VolumeIntensity::Elevated);
    }

    #[test]
    fn test_below_sensitivity_is_omitted() {
        let volumes = vec![1_000.0, 1_000.0, 1_000.0, 1_000.0, 1_200.0];
        let outcome = VolumeAnomalyDetector::detect(&series(&volumes), 1.5);
        assert_eq!(outcome.omit_reason(), Some(&OmitReason::BelowThreshold));
    }

    #[test]
    fn test_fewer_than_five_bars_omitted() {
        let outcome = VolumeAnomalyDetector::detect(&series(&[1.0, 2.0, 3.0, 40.0]), 1.0);
        assert_eq!(
            outcome.omit_reason(),
            Some(&OmitReason::InsufficientData { have: 4, need: 5 })
        );
    }

    #[test]
    fn test_zero_baseline_is_degenerate() {
        let outcome = VolumeAnomalyDetector::detect(&series(&[0.0, 0.0, 0.0, 0.0, 10.0]), 1.0);
        assert!(matches!(outcome.omit_reason(), Some(OmitReason::Degenerate(_))));
    }

    #[test]
    fn test_reference_bar_excluded_from_baseline() {
        let mut volumes = vec![500.0; 9];
        volumes.push(2_000.0);
        let spike = VolumeAnomalyDetector::detect(&series(&volumes), 1.0).ready().unwrap();

        // full-window mean would be 650 and a factor of ~3.08
        assert!((spike.spike_factor - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_detect_is_repeatable() {
        let mut volumes = vec![1_000.0, 1_250.0, 900.0, 1_100.0, 980.0, 1_040.0];
        volumes.push(4_200.0);
        let s = series(&volumes);

        assert_eq!(VolumeAnomalyDetector::detect(&s, 1.5), VolumeAnomalyDetector::detect(&s, 1.5));
        assert_eq!(VolumeAnomalyDetector::detect(&s, 9.0), VolumeAnomalyDetector::detect(&s, 9.0));
    }

    #[test]
    fn test_intensity_bands() {
        assert_eq!(VolumeIntensity::from_factor(5.5), VolumeIntensity::Explosive);
        assert_eq!(VolumeIntensity::from_factor(5.0), VolumeIntensity::Elevated);
        assert_eq!(VolumeIntensity::from_factor(1.8), VolumeIntensity::Active);
        assert_eq!(VolumeIntensity::from_factor(0.9), VolumeIntensity::Quiet);
    }
}
