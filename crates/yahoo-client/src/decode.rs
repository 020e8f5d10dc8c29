//! Yahoo Finance response bodies and their conversion into core types.

use analysis_core::{AnalysisError, Bar, FundamentalSnapshot, NewsItem, PriceSeries, MAX_HEADLINES};
use chrono::DateTime;
use serde::Deserialize;

fn malformed(what: &str, e: serde_json::Error) -> AnalysisError {
    AnalysisError::UpstreamUnavailable(format!("malformed {} response: {}", what, e))
}

// Chart endpoint: /v8/finance/chart/{symbol}
#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl YahooError {
    fn describe(&self) -> String {
        format!(
            "{}: {}",
            self.code.as_deref().unwrap_or("error"),
            self.description.as_deref().unwrap_or("no description")
        )
    }
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

/// Column-oriented OHLCV. Yahoo leaves `null` holes for halted or unprinted sessions.
#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn column(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

/// Chart JSON to a series. Bars missing any price are dropped, a missing volume reads as
/// zero, and the result is sorted with repeated timestamps collapsed.
pub(crate) fn decode_chart(body: &str) -> Result<PriceSeries, AnalysisError> {
    let envelope: ChartEnvelope = serde_json::from_str(body).map_err(|e| malformed("chart", e))?;

    if let Some(err) = envelope.chart.error {
        return Err(AnalysisError::UpstreamUnavailable(err.describe()));
    }
    let result = envelope
        .chart
        .result
        .and_then(|mut results| results.pop())
        .ok_or_else(|| AnalysisError::UpstreamUnavailable("empty chart response".to_string()))?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let bars: Vec<Bar> = result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            Some(Bar {
                timestamp: DateTime::from_timestamp(ts, 0)?,
                open: column(&quote.open, i)?,
                high: column(&quote.high, i)?,
                low: column(&quote.low, i)?,
                close: column(&quote.close, i)?,
                volume: column(&quote.volume, i).unwrap_or(0.0).max(0.0),
            })
        })
        .collect();

    PriceSeries::from_unordered(bars)
}

// quoteSummary endpoint: /v10/finance/quoteSummary/{symbol}
#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    #[serde(default)]
    result: Option<Vec<QuoteSummaryResult>>,
    #[serde(default)]
    error: Option<YahooError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    #[serde(default)]
    financial_data: FinancialData,
    #[serde(default)]
    default_key_statistics: KeyStatistics,
    #[serde(default)]
    price: PriceModule,
}

/// Yahoo wraps numbers as `{"raw": 0.12, "fmt": "12.00%"}`, or `{}` when unknown
#[derive(Debug, Default, Clone, Copy, Deserialize)]
struct RawValue {
    #[serde(default)]
    raw: Option<f64>,
}

fn raw(value: Option<RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw).filter(|v| v.is_finite())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinancialData {
    revenue_growth: Option<RawValue>,
    earnings_growth: Option<RawValue>,
    profit_margins: Option<RawValue>,
    operating_margins: Option<RawValue>,
    gross_margins: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatistics {
    revenue_quarterly_growth: Option<RawValue>,
    profit_margins: Option<RawValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    short_name: Option<String>,
    long_name: Option<String>,
    market_cap: Option<RawValue>,
}

pub(crate) fn decode_quote_summary(symbol: &str, body: &str) -> Result<FundamentalSnapshot, AnalysisError> {
    let envelope: QuoteSummaryEnvelope =
        serde_json::from_str(body).map_err(|e| malformed("quoteSummary", e))?;

    if let Some(err) = envelope.quote_summary.error {
        return Err(AnalysisError::UpstreamUnavailable(err.describe()));
    }
    let result = envelope
        .quote_summary
        .result
        .and_then(|mut results| results.pop())
        .ok_or_else(|| AnalysisError::UpstreamUnavailable(format!("no fundamentals for {}", symbol)))?;

    let financial = result.financial_data;
    let stats = result.default_key_statistics;
    Ok(FundamentalSnapshot {
        symbol: symbol.to_string(),
        name: result.price.short_name.or(result.price.long_name),
        revenue_growth: raw(financial.revenue_growth),
        quarterly_revenue_growth: raw(stats.revenue_quarterly_growth),
        earnings_growth: raw(financial.earnings_growth),
        profit_margin: raw(financial.profit_margins).or(raw(stats.profit_margins)),
        operating_margin: raw(financial.operating_margins),
        gross_margin: raw(financial.gross_margins),
        market_cap: raw(result.price.market_cap),
    })
}

// Search endpoint: /v1/finance/search
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<SearchNews>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchNews {
    title: String,
    link: String,
    provider_publish_time: i64,
}

pub(crate) fn decode_search(body: &str) -> Result<Vec<NewsItem>, AnalysisError> {
    let response: SearchResponse = serde_json::from_str(body).map_err(|e| malformed("search", e))?;

    Ok(response
        .news
        .into_iter()
        .filter_map(|n| {
            Some(NewsItem {
                title: n.title,
                link: n.link,
                published_at: DateTime::from_timestamp(n.provider_publish_time, 0)?,
            })
        })
        .take(MAX_HEADLINES)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_FIXTURE: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"currency": "INR", "symbol": "SBIN.NS"},
                "timestamp": [1717386300, 1717472700, 1717559100, 1717645500],
                "indicators": {
                    "quote": [{
                        "open":   [830.0, 842.5, null, 801.0],
                        "high":   [845.0, 850.0, null, 815.5],
                        "low":    [825.0, 790.0, null, 798.0],
                        "close":  [840.0, 795.2, null, 812.3],
                        "volume": [12000000, 35000000, null, null]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_decode_chart_drops_null_bars() {
        let series = decode_chart(CHART_FIXTURE).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![840.0, 795.2, 812.3]);
        assert_eq!(series.volumes(), vec![12_000_000.0, 35_000_000.0, 0.0]);
        assert_eq!(series.bars()[0].timestamp.timestamp(), 1717386300);
    }

    #[test]
    fn test_decode_chart_error_body() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        match decode_chart(body) {
            Err(AnalysisError::UpstreamUnavailable(msg)) => assert!(msg.contains("delisted")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_decode_chart_garbage() {
        assert!(matches!(
            decode_chart("<html>busy</html>"),
            Err(AnalysisError::UpstreamUnavailable(_))
        ));
    }

    #[test]
    fn test_decode_quote_summary() {
        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "financialData": {
                        "revenueGrowth": {"raw": 0.684, "fmt": "68.40%"},
                        "earningsGrowth": {},
                        "operatingMargins": {"raw": 0.021, "fmt": "2.10%"},
                        "grossMargins": {"raw": 0.61, "fmt": "61.00%"}
                    },
                    "defaultKeyStatistics": {
                        "revenueQuarterlyGrowth": {"raw": 0.74}
                    },
                    "price": {
                        "shortName": "ZOMATO LTD",
                        "marketCap": {"raw": 2.1e12, "fmt": "2.1T"}
                    }
                }],
                "error": null
            }
        }"#;
        let snap = decode_quote_summary("ZOMATO.NS", body).unwrap();

        assert_eq!(snap.symbol, "ZOMATO.NS");
        assert_eq!(snap.name.as_deref(), Some("ZOMATO LTD"));
        assert_eq!(snap.revenue_growth, Some(0.684));
        assert_eq!(snap.quarterly_revenue_growth, Some(0.74));
        assert_eq!(snap.earnings_growth, None);
        assert_eq!(snap.profit_margin, None);
        assert_eq!(snap.operating_margin, Some(0.021));
        assert_eq!(snap.market_cap, Some(2.1e12));
    }

    #[test]
    fn test_decode_quote_summary_empty() {
        let body = r#"{"quoteSummary":{"result":[],"error":null}}"#;
        assert!(decode_quote_summary("X.NS", body).is_err());
    }

    #[test]
    fn test_decode_search_caps_headlines() {
        let items: Vec<String> = (0..15)
            .map(|i| {
                format!(
                    r#"{{"uuid":"{i}","title":"Headline {i}","publisher":"Wire","link":"https://news.example/{i}","providerPublishTime":{}}}"#,
                    1717386300 + i
                )
            })
            .collect();
        let body = format!(r#"{{"quotes":[],"news":[{}]}}"#, items.join(","));

        let news = decode_search(&body).unwrap();
        assert_eq!(news.len(), MAX_HEADLINES);
        assert_eq!(news[0].title, "Headline 0");
        assert_eq!(news[0].published_at.timestamp(), 1717386300);
    }

    #[test]
    fn test_decode_search_without_news() {
        assert!(decode_search(r#"{"quotes":[]}"#).unwrap().is_empty());
    }
}
