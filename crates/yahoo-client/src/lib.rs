use analysis_core::{
    AnalysisError, FundamentalSnapshot, Interval, MarketDataProvider, NewsItem, NewsProvider, Period, PriceSeries,
    MAX_HEADLINES,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

mod cache;
mod decode;

use cache::TtlCache;

pub const BASE_URL: &str = "https://query1.finance.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const MAX_ATTEMPTS: u32 = 3;
const RETRY_WAIT_SECS: u64 = 5;

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            // Wait for the oldest request to leave the window
            let sleep_dur = match ts.front() {
                Some(&oldest) => (oldest + self.window).saturating_duration_since(now) + Duration::from_millis(50),
                None => Duration::from_millis(50),
            };
            drop(ts);
            tracing::warn!("Rate limiter: waiting {:.1}s for a Yahoo Finance slot", sleep_dur.as_secs_f64());
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

/// Client settings
#[derive(Debug, Clone)]
pub struct YahooConfig {
    pub base_url: String,
    /// Requests allowed per minute
    pub rate_limit: usize,
    pub cache_ttl: chrono::Duration,
    pub timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            rate_limit: 60,
            cache_ttl: chrono::Duration::minutes(15),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Yahoo Finance chart, quoteSummary and search endpoints behind the provider traits.
///
/// Responses are cached for `cache_ttl`, so repeating a scan within the window costs no
/// requests and sees the same snapshot.
pub struct YahooClient {
    base_url: String,
    client: Client,
    rate_limiter: RateLimiter,
    series_cache: TtlCache<(String, Period, Interval), PriceSeries>,
    fundamentals_cache: TtlCache<String, FundamentalSnapshot>,
    news_cache: TtlCache<String, Vec<NewsItem>>,
}

impl YahooClient {
    pub fn new(config: YahooConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            rate_limiter: RateLimiter::new(config.rate_limit, Duration::from_secs(60)),
            series_cache: TtlCache::new(config.cache_ttl),
            fundamentals_cache: TtlCache::new(config.cache_ttl),
            news_cache: TtlCache::new(config.cache_ttl),
        }
    }

    /// Send a request with rate limiting and automatic 429 retry; returns the body text.
    async fn send_request(&self, builder: reqwest::RequestBuilder) -> Result<String, AnalysisError> {
        let request = builder
            .build()
            .map_err(|e| AnalysisError::UpstreamUnavailable(e.to_string()))?;

        for attempt in 0..MAX_ATTEMPTS {
            self.rate_limiter.acquire().await;
            let req_clone = request
                .try_clone()
                .ok_or_else(|| AnalysisError::UpstreamUnavailable("Cannot clone request".to_string()))?;
            let response = self
                .client
                .execute(req_clone)
                .await
                .map_err(|e| AnalysisError::UpstreamUnavailable(e.to_string()))?;

            let status = response.status();
            if status == StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!(
                    "Yahoo 429 rate limited, waiting {}s before retry {}/{}",
                    RETRY_WAIT_SECS,
                    attempt + 1,
                    MAX_ATTEMPTS
                );
                tokio::time::sleep(Duration::from_secs(RETRY_WAIT_SECS)).await;
                continue;
            }

            let body = response
                .text()
                .await
                .map_err(|e| AnalysisError::UpstreamUnavailable(e.to_string()))?;
            // Chart 404s still carry a JSON error body worth decoding
            if status.is_success() || status == StatusCode::NOT_FOUND {
                return Ok(body);
            }
            return Err(AnalysisError::UpstreamUnavailable(format!("HTTP {}: {}", status, body)));
        }

        Err(AnalysisError::UpstreamUnavailable(format!(
            "Rate limited by Yahoo after {} retries",
            MAX_ATTEMPTS
        )))
    }

    /// Bars for one symbol
    pub async fn get_chart(&self, symbol: &str, period: Period, interval: Interval) -> Result<PriceSeries, AnalysisError> {
        let cache_key = (symbol.to_string(), period, interval);
        if let Some(series) = self.series_cache.get(&cache_key) {
            tracing::debug!("Cache hit for {} ({}/{})", symbol, period.as_str(), interval.as_str());
            return Ok(series);
        }

        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let body = self
            .send_request(
                self.client
                    .get(&url)
                    .query(&[("range", period.as_str()), ("interval", interval.as_str())]),
            )
            .await?;

        let series = decode::decode_chart(&body)?;
        self.series_cache.insert(cache_key, series.clone());
        Ok(series)
    }

    /// Growth and margin ratios for one symbol
    pub async fn get_quote_summary(&self, symbol: &str) -> Result<FundamentalSnapshot, AnalysisError> {
        if let Some(snapshot) = self.fundamentals_cache.get(&symbol.to_string()) {
            tracing::debug!("Cache hit for {} fundamentals", symbol);
            return Ok(snapshot);
        }

        let url = format!("{}/v10/finance/quoteSummary/{}", self.base_url, symbol);
        let body = self
            .send_request(
                self.client
                    .get(&url)
                    .query(&[("modules", "financialData,defaultKeyStatistics,price")]),
            )
            .await?;

        let snapshot = decode::decode_quote_summary(symbol, &body)?;
        self.fundamentals_cache.insert(symbol.to_string(), snapshot.clone());
        Ok(snapshot)
    }

    /// Headlines matching `query`
    pub async fn get_news(&self, query: &str) -> Result<Vec<NewsItem>, AnalysisError> {
        let cache_key = query.trim().to_lowercase();
        if let Some(news) = self.news_cache.get(&cache_key) {
            tracing::debug!("Cache hit for news '{}'", query);
            return Ok(news);
        }

        let url = format!("{}/v1/finance/search", self.base_url);
        let news_count = MAX_HEADLINES.to_string();
        let body = self
            .send_request(self.client.get(&url).query(&[
                ("q", query),
                ("newsCount", news_count.as_str()),
                ("quotesCount", "0"),
            ]))
            .await?;

        let news = decode::decode_search(&body)?;
        self.news_cache.insert(cache_key, news.clone());
        Ok(news)
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new(YahooConfig::default())
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    /// Symbols Yahoo cannot serve are logged and left out. The call only fails when
    /// nothing at all came back and at least one request errored.
    async fn fetch(
        &self,
        symbols: &[String],
        period: Period,
        interval: Interval,
    ) -> Result<HashMap<String, PriceSeries>, AnalysisError> {
        let mut series = HashMap::with_capacity(symbols.len());
        let mut last_error = None;

        for symbol in symbols {
            match self.get_chart(symbol, period, interval).await {
                Ok(s) if !s.is_empty() => {
                    series.insert(symbol.clone(), s);
                }
                Ok(_) => tracing::debug!("No bars returned for {}", symbol),
                Err(e) => {
                    tracing::warn!("Chart fetch failed for {}: {}", symbol, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if series.is_empty() => Err(e),
            _ => Ok(series),
        }
    }

    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, AnalysisError> {
        self.get_quote_summary(symbol).await
    }
}

#[async_trait]
impl NewsProvider for YahooClient {
    async fn search(&self, query: &str) -> Result<Vec<NewsItem>, AnalysisError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.get_news(query).await
    }
}
