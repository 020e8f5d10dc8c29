//! Cross-Asset Impact
//!
//! Maps the latest move in a handful of commodities, currencies and yields to what it
//! usually means for Indian equity sectors.

use analysis_core::{ColorTag, PriceSeries};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use technical_analysis::pct_change;

/// Instrument watched for spill-over into equities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CrossAsset {
    CrudeOil,
    Gold,
    UsdInr,
    Us10YYield,
    NaturalGas,
    Copper,
}

impl CrossAsset {
    pub const ALL: [CrossAsset; 6] = [
        CrossAsset::CrudeOil,
        CrossAsset::Gold,
        CrossAsset::UsdInr,
        CrossAsset::Us10YYield,
        CrossAsset::NaturalGas,
        CrossAsset::Copper,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            CrossAsset::CrudeOil => "CL=F",
            CrossAsset::Gold => "GC=F",
            CrossAsset::UsdInr => "INR=X",
            CrossAsset::Us10YYield => "^TNX",
            CrossAsset::NaturalGas => "NG=F",
            CrossAsset::Copper => "HG=F",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CrossAsset::CrudeOil => "Crude Oil",
            CrossAsset::Gold => "Gold",
            CrossAsset::UsdInr => "USD/INR",
            CrossAsset::Us10YYield => "US 10Y Yield",
            CrossAsset::NaturalGas => "Natural Gas",
            CrossAsset::Copper => "Copper",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.symbol() == symbol)
    }
}

/// Latest and previous price of an instrument
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePair {
    pub current: f64,
    pub previous: f64,
}

impl PricePair {
    /// Last two closes; `None` with fewer than two bars.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        match series.bars() {
            [.., previous, current] => Some(Self {
                current: current.close,
                previous: previous.close,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

/// One row of the impact table: fires when the move exceeds `threshold` percent in
/// `direction`.
struct ImpactRule {
    asset: CrossAsset,
    direction: Direction,
    threshold: f64,
    impact: &'static str,
    color: ColorTag,
}

impl ImpactRule {
    fn matches(&self, asset: CrossAsset, pct: f64) -> bool {
        self.asset == asset
            && match self.direction {
                Direction::Up => pct > self.threshold,
                Direction::Down => pct < -self.threshold,
            }
    }
}

const IMPACT_RULES: &[ImpactRule] = &[
    ImpactRule {
        asset: CrossAsset::CrudeOil,
        direction: Direction::Up,
        threshold: 1.5,
        impact: "Input costs rise for paints, tyres and aviation. Upstream producers (ONGC, Oil India) benefit.",
        color: ColorTag::Red,
    },
    ImpactRule {
        asset: CrossAsset::CrudeOil,
        direction: Direction::Down,
        threshold: 1.5,
        impact: "Relief for paints, tyres and oil marketing companies (BPCL, HPCL). Upstream producers lose.",
        color: ColorTag::Green,
    },
    ImpactRule {
        asset: CrossAsset::Gold,
        direction: Direction::Up,
        threshold: 1.0,
        impact: "Safe-haven demand. Gold financiers (Muthoot, Manappuram) gain; jewellers face margin pressure.",
        color: ColorTag::Orange,
    },
    ImpactRule {
        asset: CrossAsset::Gold,
        direction: Direction::Down,
        threshold: 1.0,
        impact: "Risk appetite returning. Supportive for equities; jewellers see cheaper inventory.",
        color: ColorTag::Green,
    },
    ImpactRule {
        asset: CrossAsset::UsdInr,
        direction: Direction::Up,
        threshold: 0.5,
        impact: "Rupee weakening. IT and pharma exporters gain; importers (oil, electronics) hurt.",
        color: ColorTag::Orange,
    },
    ImpactRule {
        asset: CrossAsset::UsdInr,
        direction: Direction::Down,
        threshold: 0.5,
        impact: "Rupee strengthening. Headwind for IT exporters; relief for oil importers.",
        color: ColorTag::Blue,
    },
    ImpactRule {
        asset: CrossAsset::Us10YYield,
        direction: Direction::Up,
        threshold: 2.0,
        impact: "Rising US yields. FII outflow risk from emerging markets; banks and rate-sensitives under pressure.",
        color: ColorTag::Red,
    },
    ImpactRule {
        asset: CrossAsset::Us10YYield,
        direction: Direction::Down,
        threshold: 2.0,
        impact: "Falling US yields. Supportive for FII inflows into emerging-market equities.",
        color: ColorTag::Green,
    },
    ImpactRule {
        asset: CrossAsset::NaturalGas,
        direction: Direction::Up,
        threshold: 2.0,
        impact: "Costlier gas. City gas distributors (IGL, MGL) and fertilizer makers squeezed; gas producers gain.",
        color: ColorTag::Red,
    },
    ImpactRule {
        asset: CrossAsset::NaturalGas,
        direction: Direction::Down,
        threshold: 2.0,
        impact: "Cheaper gas. Margin tailwind for city gas distributors and fertilizer makers.",
        color: ColorTag::Green,
    },
    ImpactRule {
        asset: CrossAsset::Copper,
        direction: Direction::Up,
        threshold: 1.5,
        impact: "Industrial demand picking up. Positive for metals (Hindalco, Hindustan Copper); cable makers pay more.",
        color: ColorTag::Green,
    },
    ImpactRule {
        asset: CrossAsset::Copper,
        direction: Direction::Down,
        threshold: 1.5,
        impact: "Industrial demand cooling. Negative for metal producers; relief for cable and wire makers.",
        color: ColorTag::Red,
    },
];

const NEUTRAL_IMPACT: &str = "Move within normal range. No strong sector impact.";

/// Qualitative read of one instrument's move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetImpact {
    pub asset: CrossAsset,
    pub name: String,
    pub price: f64,
    pub pct_change: f64,
    pub impact: String,
    pub color: ColorTag,
}

pub struct CrossAssetImpactMapper;

impl CrossAssetImpactMapper {
    /// Impact statement and colour for a move. First matching rule wins.
    pub fn impact_for(asset: CrossAsset, pct: f64) -> (&'static str, ColorTag) {
        IMPACT_RULES
            .iter()
            .find(|rule| rule.matches(asset, pct))
            .map(|rule| (rule.impact, rule.color))
            .unwrap_or((NEUTRAL_IMPACT, ColorTag::Gray))
    }

    /// One impact per instrument present in `prices`, in [`CrossAsset::ALL`] order.
    /// Missing instruments and zero previous prices are skipped.
    pub fn map_impacts(prices: &HashMap<CrossAsset, PricePair>) -> Vec<AssetImpact> {
        CrossAsset::ALL
            .iter()
            .filter_map(|asset| {
                let pair = prices.get(asset)?;
                let pct = pct_change(pair.previous, pair.current)?;
                let (impact, color) = Self::impact_for(*asset, pct);
                Some(AssetImpact {
                    asset: *asset,
                    name: asset.name().to_string(),
                    price: pair.current,
                    pct_change: pct,
                    impact: impact.to_string(),
                    color,
                })
            })
            .collect()
    }
}
