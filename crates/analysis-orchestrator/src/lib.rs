//! Scan orchestration: one fetch per user action, then one analytic per symbol, folded into
//! a report of results and omissions.

use analysis_core::{
    AnalysisError, Interval, MarketDataProvider, NewsItem, NewsProvider, OmitReason, Outcome, Period, PriceSeries,
    ScanReport, MAX_HEADLINES,
};
use chrono::Utc;
use flow_map::{
    AssetImpact, CrossAsset, CrossAssetImpactMapper, HeatmapTile, PricePair, QuadrantPoint, RelativeRotationEngine,
    RotationConfig, SectorIndex, BENCHMARK_SYMBOL,
};
use fundamental_analysis::{LifecycleClassifier, LifecycleProfile};
use sentiment_analysis::{InstitutionalFlowAnalyzer, PositioningSignal, PositioningSnapshot};
use serde::{Deserialize, Serialize};
use smart_watchlist::{display_symbol, Watchlist};
use std::collections::HashMap;
use std::sync::Arc;
use technical_analysis::{GannReport, StageConfig, StageReading, TrendStageClassifier, VolumeAnomalyDetector, VolumeSpike};


/// Tunables shared by every scan
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScanSettings {
    pub rotation: RotationConfig,
    pub stage: StageConfig,
    /// Minimum volume spike factor the hype scan reports
    pub hype_sensitivity: f64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            rotation: RotationConfig::default(),
            stage: StageConfig::default(),
            hype_sensitivity: 1.5,
        }
    }
}

/// A per-symbol reading labelled with the symbol it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolReading<T> {
    pub symbol: String,
    #[serde(flatten)]
    pub reading: T,
}

pub struct MarketMind {
    market: Arc<dyn MarketDataProvider>,
    news: Arc<dyn NewsProvider>,
    settings: ScanSettings,
}

impl MarketMind {
    pub fn new(market: Arc<dyn MarketDataProvider>, news: Arc<dyn NewsProvider>, settings: ScanSettings) -> Self {
        Self { market, news, settings }
    }

    /// Participant positioning read. Pure; no data is fetched.
    pub fn trap_detector(&self, snapshot: &PositioningSnapshot) -> PositioningSignal {
        let signal = InstitutionalFlowAnalyzer::analyze(snapshot);
        tracing::info!("Positioning signal: {}", signal.label.name());
        signal
    }

    /// Rotation of the NSE sectoral indices against Nifty 50 over six months of daily bars.
    pub async fn sector_compass(&self) -> Result<ScanReport<QuadrantPoint>, AnalysisError> {
        let symbols = SectorIndex::fetch_symbols();
        tracing::info!("Starting sector compass over {} sectors", symbols.len() - 1);

        let data = self.market.fetch(&symbols, Period::SixMonths, Interval::Day1).await?;
        let benchmark = data.get(BENCHMARK_SYMBOL).ok_or_else(|| {
            AnalysisError::UpstreamUnavailable(format!("benchmark {} missing from response", BENCHMARK_SYMBOL))
        })?;

        let engine = RelativeRotationEngine::new(self.settings.rotation);
        let outcomes = SectorIndex::standard_sectors().iter().map(|sector| {
            let outcome = match data.get(sector.symbol) {
                Some(series) => engine.point(sector.name, series, benchmark),
                None => Outcome::Omitted(OmitReason::MissingData),
            };
            (sector.name.to_string(), outcome)
        });

        Ok(Self::report("sector compass", outcomes))
    }

    /// Symbols in a confirmed uptrend, with how stretched they are above the average.
    pub async fn stage_two_scan(
        &self,
        symbols: &[String],
    ) -> Result<ScanReport<SymbolReading<StageReading>>, AnalysisError> {
        tracing::info!("Starting stage 2 scan over {} symbols", symbols.len());
        let data = self.market.fetch(symbols, Period::OneYear, Interval::Day1).await?;
        let classifier = TrendStageClassifier::new(self.settings.stage);

        Ok(Self::report(
            "stage 2",
            Self::per_symbol(symbols, &data, |series| classifier.classify(series)),
        ))
    }

    /// Symbols whose latest volume exceeds the configured multiple of their monthly average.
    pub async fn hype_scan(&self, symbols: &[String]) -> Result<ScanReport<SymbolReading<VolumeSpike>>, AnalysisError> {
        let sensitivity = self.settings.hype_sensitivity;
        tracing::info!("Starting hype scan over {} symbols (sensitivity {})", symbols.len(), sensitivity);
        let data = self.market.fetch(symbols, Period::OneMonth, Interval::Day1).await?;

        Ok(Self::report(
            "hype",
            Self::per_symbol(symbols, &data, |series| VolumeAnomalyDetector::detect(series, sensitivity)),
        ))
    }

    /// Square-of-nine levels from the one-year high and low, plus upcoming time cycles.
    pub async fn gann_report(&self, symbol: &str) -> Result<GannReport, AnalysisError> {
        tracing::info!("Building Gann report for {}", symbol);
        let symbols = [symbol.to_string()];
        let data = self.market.fetch(&symbols, Period::OneYear, Interval::Day1).await?;
        let series = data
            .get(symbol)
            .ok_or_else(|| AnalysisError::UpstreamUnavailable(format!("no history for {}", symbol)))?;

        GannReport::from_series(series, Utc::now())
    }

    /// Latest day-over-day change for every constituent of a watchlist.
    pub async fn heatmap(&self, watchlist: Watchlist) -> Result<ScanReport<HeatmapTile>, AnalysisError> {
        let symbols = watchlist.symbols();
        tracing::info!("Starting heatmap for {} ({} symbols)", watchlist.name(), symbols.len());
        let data = self.market.fetch(&symbols, Period::FiveDays, Interval::Day1).await?;

        let outcomes = symbols.iter().map(|symbol| {
            let outcome = match data.get(symbol) {
                Some(series) => HeatmapTile::from_series(display_symbol(symbol), series),
                None => Outcome::Omitted(OmitReason::MissingData),
            };
            (symbol.clone(), outcome)
        });

        Ok(Self::report("heatmap", outcomes))
    }

    /// What the latest commodity, currency and yield moves mean for equity sectors.
    pub async fn cross_asset_impacts(&self) -> Result<Vec<AssetImpact>, AnalysisError> {
        let symbols: Vec<String> = CrossAsset::ALL.iter().map(|a| a.symbol().to_string()).collect();
        tracing::info!("Starting cross-asset impact scan over {} instruments", symbols.len());
        let data = self.market.fetch(&symbols, Period::FiveDays, Interval::Day1).await?;

        let prices: HashMap<CrossAsset, PricePair> = data
            .iter()
            .filter_map(|(symbol, series)| Some((CrossAsset::from_symbol(symbol)?, PricePair::from_series(series)?)))
            .collect();
        Ok(CrossAssetImpactMapper::map_impacts(&prices))
    }

    /// Growth/margin placement for each symbol. A symbol whose fundamentals cannot be
    /// fetched is omitted; the matrix is built from the rest.
    pub async fn lifecycle(&self, symbols: &[String]) -> ScanReport<LifecycleProfile> {
        tracing::info!("Starting lifecycle matrix over {} symbols", symbols.len());
        let mut outcomes = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let outcome = match self.market.fundamentals(symbol).await {
                Ok(snapshot) => Outcome::Ready(LifecycleClassifier::classify(&snapshot)),
                Err(e) => {
                    tracing::debug!("Fundamentals unavailable for {}: {}", symbol, e);
                    Outcome::Omitted(OmitReason::MissingData)
                }
            };
            outcomes.push((symbol.clone(), outcome));
        }
        Self::report("lifecycle", outcomes)
    }

    /// Recent headlines for a free-text query.
    pub async fn headlines(&self, query: &str) -> Result<Vec<NewsItem>, AnalysisError> {
        tracing::info!("Searching headlines for '{}'", query);
        let mut items = self.news.search(query).await?;
        items.truncate(MAX_HEADLINES);
        Ok(items)
    }

    fn per_symbol<'a, T, F>(
        symbols: &'a [String],
        data: &'a HashMap<String, PriceSeries>,
        analyze: F,
    ) -> impl Iterator<Item = (String, Outcome<SymbolReading<T>>)> + 'a
    where
        F: Fn(&PriceSeries) -> Outcome<T> + 'a,
    {
        symbols.iter().map(move |symbol| {
            let outcome = match data.get(symbol) {
                Some(series) => analyze(series).map(|reading| SymbolReading {
                    symbol: symbol.clone(),
                    reading,
                }),
                None => Outcome::Omitted(OmitReason::MissingData),
            };
            (symbol.clone(), outcome)
        })
    }

    fn report<T, I>(scan: &str, outcomes: I) -> ScanReport<T>
    where
        I: IntoIterator<Item = (String, Outcome<T>)>,
    {
        let report = ScanReport::collect(outcomes);
        for omission in &report.omitted {
            tracing::debug!("{}: omitted {} ({})", scan, omission.symbol, omission.reason);
        }
        tracing::info!(
            "{} scan finished: {} results, {} omitted",
            scan,
            report.results.len(),
            report.omitted.len()
        );
        report
    }
}
