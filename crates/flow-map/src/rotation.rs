//! Relative Rotation
//!
//! Places each sector on a strength-ratio / momentum plane relative to a benchmark and
//! names the quadrant it sits in.

use analysis_core::{ColorTag, OmitReason, Outcome, PriceSeries};
use serde::{Deserialize, Serialize};
use technical_analysis::mean;

/// Quadrant on the rotation plane. Both axes are centred on 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Outperforming and still gaining
    Leading,
    /// Outperforming but losing steam
    Weakening,
    /// Underperforming and still losing
    Lagging,
    /// Underperforming but turning up
    Improving,
}

impl Quadrant {
    /// A ratio of exactly 100 belongs to the lower half; momentum ties resolve toward
    /// Weakening above and Improving below.
    pub fn classify(ratio: f64, momentum: f64) -> Self {
        if ratio > 100.0 {
            if momentum > 100.0 {
                Quadrant::Leading
            } else {
                Quadrant::Weakening
            }
        } else if momentum < 100.0 {
            Quadrant::Lagging
        } else {
            Quadrant::Improving
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::Leading => "Leading",
            Quadrant::Weakening => "Weakening",
            Quadrant::Lagging => "Lagging",
            Quadrant::Improving => "Improving",
        }
    }

    pub fn color(&self) -> ColorTag {
        match self {
            Quadrant::Leading => ColorTag::Green,
            Quadrant::Weakening => ColorTag::Yellow,
            Quadrant::Lagging => ColorTag::Red,
            Quadrant::Improving => ColorTag::Blue,
        }
    }
}

/// One sector's position on the rotation plane
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadrantPoint {
    pub sector: String,
    pub ratio: f64,
    pub momentum: f64,
    pub quadrant: Quadrant,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Rolling window the relative strength is normalised against
    pub lookback: usize,
    /// How many points back momentum compares the ratio with
    pub momentum_lag: usize,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            lookback: 20,
            momentum_lag: 10,
        }
    }
}

pub struct RelativeRotationEngine {
    config: RotationConfig,
}

impl Default for RelativeRotationEngine {
    fn default() -> Self {
        Self::new(RotationConfig::default())
    }
}

impl RelativeRotationEngine {
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    pub fn min_points(&self) -> usize {
        self.config.lookback + self.config.momentum_lag
    }

    /// Points for every sector that could be evaluated; the rest are dropped silently.
    pub fn rotate(&self, sectors: &[(String, PriceSeries)], benchmark: &PriceSeries) -> Vec<QuadrantPoint> {
        self.rotate_detailed(sectors, benchmark)
            .into_iter()
            .filter_map(|(_, outcome)| outcome.ready())
            .collect()
    }

    /// One outcome per sector, in input order.
    pub fn rotate_detailed(
        &self,
        sectors: &[(String, PriceSeries)],
        benchmark: &PriceSeries,
    ) -> Vec<(String, Outcome<QuadrantPoint>)> {
        sectors
            .iter()
            .map(|(name, series)| (name.clone(), self.point(name, series, benchmark)))
            .collect()
    }

    /// Rotation point for one sector against the benchmark.
    pub fn point(&self, name: &str, sector: &PriceSeries, benchmark: &PriceSeries) -> Outcome<QuadrantPoint> {
        let pairs = sector.aligned_closes(benchmark);
        let need = self.min_points();
        if self.config.lookback == 0 || pairs.len() < need {
            return Outcome::insufficient(pairs.len(), need);
        }

        let mut strength = Vec::with_capacity(pairs.len());
        for (sector_close, benchmark_close) in pairs {
            if benchmark_close == 0.0 {
                return Outcome::Omitted(OmitReason::Degenerate("zero benchmark close".to_string()));
            }
            strength.push(sector_close / benchmark_close * 100.0);
        }

        let last = strength.len() - 1;
        let ratio = match self.normalized_at(&strength, last) {
            Some(v) => v,
            None => return Outcome::Omitted(OmitReason::Degenerate("relative strength".to_string())),
        };
        let earlier = match self.normalized_at(&strength, last - self.config.momentum_lag) {
            Some(v) if v != 0.0 => v,
            _ => return Outcome::Omitted(OmitReason::Degenerate("lagged ratio".to_string())),
        };
        let momentum = ratio / earlier * 100.0;
        if !momentum.is_finite() {
            return Outcome::Omitted(OmitReason::Degenerate("momentum".to_string()));
        }

        Outcome::Ready(QuadrantPoint {
            sector: name.to_string(),
            ratio,
            momentum,
            quadrant: Quadrant::classify(ratio, momentum),
        })
    }

    /// Relative strength at `index` divided by its rolling mean over `lookback` points, x100.
    fn normalized_at(&self, strength: &[f64], index: usize) -> Option<f64> {
        let lookback = self.config.lookback;
        if index + 1 < lookback {
            return None;
        }
        let average = mean(&strength[index + 1 - lookback..=index]);
        let value = strength[index] / average * 100.0;
        (average != 0.0 && value.is_finite()).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::Bar;
    use chrono::{Duration, TimeZone, Utc};

    fn series_from(closes: &[f64], skip_day: Option<usize>) -> PriceSeries {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != skip_day)
            .map(|(i, &close)| Bar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1.0,
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    fn benchmark() -> Vec<f64> {
        (0..40).map(|i| 1000.0 + (i as f64 * 0.7).sin() * 25.0 + i as f64 * 2.0).collect()
    }

    #[test]
    fn test_self_comparison_is_neutral() {
        let closes = benchmark();
        let engine = RelativeRotationEngine::default();

        for n in engine.min_points()..=closes.len() {
            let bench = series_from(&closes[..n], None);
            let point = engine.point("Self", &bench, &bench).ready().unwrap();

            assert!((point.ratio - 100.0).abs() < 1e-9, "ratio at {} bars", n);
            assert!((point.momentum - 100.0).abs() < 1e-9, "momentum at {} bars", n);
            assert_eq!(point.quadrant, Quadrant::Improving);
        }
    }

    #[test]
    fn test_rotate_is_repeatable() {
        let bench_closes = benchmark();
        let tilted: Vec<f64> = bench_closes
            .iter()
            .enumerate()
            .map(|(i, c)| c * (1.0 + 0.003 * i as f64))
            .collect();
        let sectors = vec![
            ("Tilted".to_string(), series_from(&tilted, None)),
            ("Short".to_string(), series_from(&tilted[..12], None)),
        ];
        let bench = series_from(&bench_closes, None);
        let engine = RelativeRotationEngine::default();

        assert_eq!(engine.rotate(&sectors, &bench), engine.rotate(&sectors, &bench));
        assert_eq!(
            engine.rotate_detailed(&sectors, &bench),
            engine.rotate_detailed(&sectors, &bench)
        );
    }

    #[test]
    fn test_outperformer_leads_and_laggard_lags() {
        let bench_closes = benchmark();
        let leader: Vec<f64> = bench_closes
            .iter()
            .enumerate()
            .map(|(i, c)| c * (1.0 + 0.0005 * (i * i) as f64))
            .collect();
        let laggard: Vec<f64> = bench_closes
            .iter()
            .enumerate()
            .map(|(i, c)| c * (1.0 - 0.0002 * (i * i) as f64))
            .collect();

        let sectors = vec![
            ("Leader".to_string(), series_from(&leader, None)),
            ("Laggard".to_string(), series_from(&laggard, None)),
        ];
        let points = RelativeRotationEngine::default().rotate(&sectors, &series_from(&bench_closes, None));

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].quadrant, Quadrant::Leading);
        assert_eq!(points[1].quadrant, Quadrant::Lagging);
    }

    #[test]
    fn test_short_series_is_omitted_not_fatal() {
        let bench_closes = benchmark();
        let short: Vec<f64> = bench_closes[..25].to_vec();
        let sectors = vec![
            ("Short".to_string(), series_from(&short, None)),
            ("Full".to_string(), series_from(&bench_closes, None)),
        ];
        let engine = RelativeRotationEngine::default();
        let bench = series_from(&bench_closes, None);

        let detailed = engine.rotate_detailed(&sectors, &bench);
        assert_eq!(
            detailed[0].1.omit_reason(),
            Some(&OmitReason::InsufficientData { have: 25, need: 30 })
        );
        assert!(detailed[1].1.is_ready());
        assert_eq!(engine.rotate(&sectors, &bench).len(), 1);
    }

    #[test]
    fn test_alignment_uses_shared_timestamps() {
        let bench_closes: Vec<f64> = benchmark()[..31].to_vec();
        let bench = series_from(&bench_closes, None);
        // one missing day leaves exactly 30 shared points
        let sector = series_from(&bench_closes, Some(3));
        assert!(RelativeRotationEngine::default().point("Gap", &sector, &bench).is_ready());

        let sector = series_from(&bench_closes[..30], Some(3));
        assert!(!RelativeRotationEngine::default().point("Gap", &sector, &bench).is_ready());
    }

    #[test]
    fn test_quadrant_boundaries() {
        assert_eq!(Quadrant::classify(101.0, 101.0), Quadrant::Leading);
        assert_eq!(Quadrant::classify(101.0, 100.0), Quadrant::Weakening);
        assert_eq!(Quadrant::classify(99.0, 99.0), Quadrant::Lagging);
        assert_eq!(Quadrant::classify(99.0, 100.0), Quadrant::Improving);
        assert_eq!(Quadrant::classify(100.0, 99.0), Quadrant::Lagging);
        assert_eq!(Quadrant::classify(100.0, 101.0), Quadrant::Improving);
    }

    #[test]
    fn test_quadrant_colors() {
        assert_eq!(Quadrant::Leading.color().hex(), "#00FF00");
        assert_eq!(Quadrant::Weakening.color().hex(), "#FFFF00");
        assert_eq!(Quadrant::Lagging.color().hex(), "#FF0000");
        assert_eq!(Quadrant::Improving.color().hex(), "#00CCFF");
    }
}
