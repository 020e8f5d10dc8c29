//! Corporate Lifecycle Matrix
//!
//! Places a company on a growth-versus-margin grid. Young disruptors grow fast at thin
//! margins, champions do both, cash cows earn without growing.

use analysis_core::{ColorTag, FundamentalSnapshot};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleZone {
    AggressiveGrowth,
    PrimeChampion,
    MatureCashCow,
    Laggard,
    Average,
}

/// Zone predicate over (growth %, margin %), with its presentation
struct ZoneRule {
    zone: LifecycleZone,
    applies: fn(f64, f64) -> bool,
}

/// Checked in order; the first match wins and anything left over is Average.
const ZONE_RULES: &[ZoneRule] = &[
    ZoneRule {
        zone: LifecycleZone::AggressiveGrowth,
        applies: |growth, margin| growth > 15.0 && margin < 5.0,
    },
    ZoneRule {
        zone: LifecycleZone::PrimeChampion,
        applies: |growth, margin| growth > 10.0 && margin > 10.0,
    },
    ZoneRule {
        zone: LifecycleZone::MatureCashCow,
        applies: |growth, margin| growth < 10.0 && margin > 15.0,
    },
    ZoneRule {
        zone: LifecycleZone::Laggard,
        applies: |growth, margin| growth < 5.0 && margin < 5.0,
    },
];

impl LifecycleZone {
    pub fn from_metrics(growth_pct: f64, margin_pct: f64) -> Self {
        ZONE_RULES
            .iter()
            .find(|rule| (rule.applies)(growth_pct, margin_pct))
            .map(|rule| rule.zone)
            .unwrap_or(LifecycleZone::Average)
    }

    pub fn name(&self) -> &'static str {
        match self {
            LifecycleZone::AggressiveGrowth => "Aggressive Growth",
            LifecycleZone::PrimeChampion => "Prime Champion",
            LifecycleZone::MatureCashCow => "Mature Cash Cow",
            LifecycleZone::Laggard => "Laggard",
            LifecycleZone::Average => "Average",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            LifecycleZone::AggressiveGrowth => "High growth, low profit. Betting on the future.",
            LifecycleZone::PrimeChampion => "Growing fast and profitable at the same time.",
            LifecycleZone::MatureCashCow => "Slow growth but large profits. Dividend payer.",
            LifecycleZone::Laggard => "Weak growth and thin margins. Avoid.",
            LifecycleZone::Average => "Standard performance.",
        }
    }

    pub fn color(&self) -> ColorTag {
        match self {
            LifecycleZone::AggressiveGrowth => ColorTag::Blue,
            LifecycleZone::PrimeChampion => ColorTag::Green,
            LifecycleZone::MatureCashCow => ColorTag::Orange,
            LifecycleZone::Laggard => ColorTag::Red,
            LifecycleZone::Average => ColorTag::Gray,
        }
    }
}

/// One company's point on the matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleProfile {
    pub symbol: String,
    pub name: String,
    pub growth_pct: f64,
    pub margin_pct: f64,
    pub market_cap: f64,
    /// Natural log of market cap, 1 when unknown
    pub bubble_size: f64,
    pub zone: LifecycleZone,
    pub verdict: String,
    pub color: ColorTag,
}

pub struct LifecycleClassifier;

impl LifecycleClassifier {
    /// Revenue growth falls back to quarterly revenue then earnings growth; net margin falls
    /// back to operating then gross margin. Missing figures count as zero.
    pub fn classify(snapshot: &FundamentalSnapshot) -> LifecycleProfile {
        let growth = snapshot
            .revenue_growth
            .or(snapshot.quarterly_revenue_growth)
            .or(snapshot.earnings_growth)
            .unwrap_or(0.0);
        let margin = snapshot
            .profit_margin
            .or(snapshot.operating_margin)
            .or(snapshot.gross_margin)
            .unwrap_or(0.0);

        let growth_pct = growth * 100.0;
        let margin_pct = margin * 100.0;
        let market_cap = snapshot.market_cap.unwrap_or(0.0);
        let bubble_size = if market_cap > 0.0 { market_cap.ln() } else { 1.0 };
        let zone = LifecycleZone::from_metrics(growth_pct, margin_pct);

        LifecycleProfile {
            symbol: snapshot.symbol.clone(),
            name: snapshot.name.clone().unwrap_or_else(|| snapshot.symbol.clone()),
            growth_pct,
            margin_pct,
            market_cap,
            bubble_size,
            zone,
            verdict: zone.verdict().to_string(),
            color: zone.color(),
        }
    }
}
