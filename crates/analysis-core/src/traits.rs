use async_trait::async_trait;
use std::collections::HashMap;

use crate::{AnalysisError, FundamentalSnapshot, Interval, NewsItem, Period, PriceSeries};

/// Most headlines a news lookup returns
pub const MAX_HEADLINES: usize = 10;

/// Source of historical bars and company fundamentals
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch one series per symbol. Symbols the provider cannot serve are left out of the
    /// map; an `Err` means the whole request failed.
    async fn fetch(
        &self,
        symbols: &[String],
        period: Period,
        interval: Interval,
    ) -> Result<HashMap<String, PriceSeries>, AnalysisError>;

    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalSnapshot, AnalysisError>;
}

/// Source of news headlines
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// At most [`MAX_HEADLINES`] items; an empty list is a valid answer.
    async fn search(&self, query: &str) -> Result<Vec<NewsItem>, AnalysisError>;
}
