//! Market Heatmap
//!
//! Day-over-day change for each constituent of a watchlist, sized by price and coloured by
//! change in the presentation layer.

use analysis_core::{OmitReason, Outcome, PriceSeries};
use serde::{Deserialize, Serialize};
use technical_analysis::pct_change;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapTile {
    pub symbol: String,
    pub price: f64,
    pub change_pct: f64,
}

impl HeatmapTile {
    /// Latest close against the one before it. A zero or missing latest close (session not
    /// yet printed) shifts the comparison back one bar.
    pub fn from_series(symbol: &str, series: &PriceSeries) -> Outcome<HeatmapTile> {
        let closes = series.closes();
        if closes.len() < 2 {
            return Outcome::insufficient(closes.len(), 2);
        }

        let mut latest = closes.len() - 1;
        if closes[latest] == 0.0 || closes[latest].is_nan() {
            if closes.len() < 3 {
                return Outcome::insufficient(closes.len(), 3);
            }
            latest -= 1;
        }

        match pct_change(closes[latest - 1], closes[latest]) {
            Some(change_pct) => Outcome::Ready(HeatmapTile {
                symbol: symbol.to_string(),
                price: closes[latest],
                change_pct,
            }),
            None => Outcome::Omitted(OmitReason::Degenerate(format!(
                "cannot compare {} with {}",
                closes[latest], closes[latest - 1]
            ))),
        }
    }
}
