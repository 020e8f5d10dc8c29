//! Participant Positioning
//!
//! Reads index-derivative positions of foreign institutions (FII), domestic institutions
//! (DII) and retail clients, and names the setup they form together. The usual tell is
//! disagreement: institutions on one side, the crowd on the other.

use analysis_core::ColorTag;
use serde::{Deserialize, Serialize};

/// Both institutional classes above this bullish percentage make the trend bullish
const INSTITUTIONAL_BULLISH_PCT: f64 = 60.0;
/// Both below this make it bearish
const INSTITUTIONAL_BEARISH_PCT: f64 = 40.0;
/// Retail above this is crowded long
const RETAIL_CROWDED_PCT: f64 = 60.0;
/// Retail below this is fearful
const RETAIL_FEARFUL_PCT: f64 = 40.0;
/// FII this short leaves fuel for a short-covering rally
const FII_EXTREME_SHORT_PCT: f64 = 15.0;

const VIX_FEAR: f64 = 20.0;
const VIX_COMPLACENT: f64 = 12.0;
const PCR_PUT_HEAVY: f64 = 1.3;
const PCR_CALL_HEAVY: f64 = 0.7;

/// Open long/short contracts per participant class, plus two market-wide readings
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PositioningSnapshot {
    pub fii_long: u64,
    pub fii_short: u64,
    pub dii_long: u64,
    pub dii_short: u64,
    pub client_long: u64,
    pub client_short: u64,
    /// Put/call ratio
    pub pcr: f64,
    /// Volatility index
    pub vix: f64,
}

/// Direction both institutional classes agree on, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstitutionalTrend {
    Bullish,
    Bearish,
    Mixed,
}

impl InstitutionalTrend {
    pub fn from_percentages(fii_pct: f64, dii_pct: f64) -> Self {
        if fii_pct > INSTITUTIONAL_BULLISH_PCT && dii_pct > INSTITUTIONAL_BULLISH_PCT {
            InstitutionalTrend::Bullish
        } else if fii_pct < INSTITUTIONAL_BEARISH_PCT && dii_pct < INSTITUTIONAL_BEARISH_PCT {
            InstitutionalTrend::Bearish
        } else {
            InstitutionalTrend::Mixed
        }
    }
}

/// The closed set of positioning signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalLabel {
    /// A class has no open positions; nothing to read yet
    AwaitingInput,
    /// Institutions long, retail short
    SmartRally,
    /// Institutions long, retail undecided
    InstitutionalBuying,
    /// Everybody long
    CrowdedLong,
    /// Institutions short, retail long
    CrashRisk,
    /// FII heavily short; covering could force prices up
    ShortCoveringRally,
    /// Institutions short, retail not chasing
    InstitutionalSelling,
    /// Institutions disagree with each other
    TugOfWar,
}

impl SignalLabel {
    pub const ALL: [SignalLabel; 8] = [
        SignalLabel::AwaitingInput,
        SignalLabel::SmartRally,
        SignalLabel::InstitutionalBuying,
        SignalLabel::CrowdedLong,
        SignalLabel::CrashRisk,
        SignalLabel::ShortCoveringRally,
        SignalLabel::InstitutionalSelling,
        SignalLabel::TugOfWar,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SignalLabel::AwaitingInput => "Awaiting Input",
            SignalLabel::SmartRally => "Smart Rally",
            SignalLabel::InstitutionalBuying => "Institutional Buying",
            SignalLabel::CrowdedLong => "Crowded Long",
            SignalLabel::CrashRisk => "Crash Risk",
            SignalLabel::ShortCoveringRally => "Short Covering Rally",
            SignalLabel::InstitutionalSelling => "Institutional Selling",
            SignalLabel::TugOfWar => "Tug of War",
        }
    }

    pub fn color(&self) -> ColorTag {
        match self {
            SignalLabel::AwaitingInput | SignalLabel::TugOfWar => ColorTag::Gray,
            SignalLabel::SmartRally | SignalLabel::InstitutionalBuying => ColorTag::Green,
            SignalLabel::CrowdedLong | SignalLabel::ShortCoveringRally => ColorTag::Orange,
            SignalLabel::CrashRisk | SignalLabel::InstitutionalSelling => ColorTag::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositioningSignal {
    pub label: SignalLabel,
    pub color: ColorTag,
    pub explanation: String,
    pub fii_bullish_pct: f64,
    pub dii_bullish_pct: f64,
    pub client_bullish_pct: f64,
    pub pcr: f64,
    pub vix: f64,
}

/// Share of longs in a class, 0-100. `None` when the class has no positions.
pub fn bullish_pct(long: u64, short: u64) -> Option<f64> {
    let total = long as f64 + short as f64;
    if total == 0.0 {
        return None;
    }
    Some(long as f64 / total * 100.0)
}

pub struct InstitutionalFlowAnalyzer;

impl InstitutionalFlowAnalyzer {
    pub fn analyze(snapshot: &PositioningSnapshot) -> PositioningSignal {
        let percentages = (
            bullish_pct(snapshot.fii_long, snapshot.fii_short),
            bullish_pct(snapshot.dii_long, snapshot.dii_short),
            bullish_pct(snapshot.client_long, snapshot.client_short),
        );
        let (fii, dii, client) = match percentages {
            (Some(fii), Some(dii), Some(client)) => (fii, dii, client),
            _ => return Self::awaiting_input(snapshot),
        };

        let trend = InstitutionalTrend::from_percentages(fii, dii);
        let label = Self::label_for(trend, fii, client);

        let mut explanation = Self::describe(label, fii, dii, client);
        if let Some(context) = Self::market_context(snapshot.pcr, snapshot.vix) {
            explanation.push(' ');
            explanation.push_str(&context);
        }

        PositioningSignal {
            label,
            color: label.color(),
            explanation,
            fii_bullish_pct: fii,
            dii_bullish_pct: dii,
            client_bullish_pct: client,
            pcr: snapshot.pcr,
            vix: snapshot.vix,
        }
    }

    fn awaiting_input(snapshot: &PositioningSnapshot) -> PositioningSignal {
        PositioningSignal {
            label: SignalLabel::AwaitingInput,
            color: SignalLabel::AwaitingInput.color(),
            explanation: "Enter long and short positions for FII, DII and clients.".to_string(),
            fii_bullish_pct: 0.0,
            dii_bullish_pct: 0.0,
            client_bullish_pct: 0.0,
            pcr: snapshot.pcr,
            vix: snapshot.vix,
        }
    }

    fn label_for(trend: InstitutionalTrend, fii: f64, client: f64) -> SignalLabel {
        match trend {
            InstitutionalTrend::Bullish => {
                if client < RETAIL_FEARFUL_PCT {
                    SignalLabel::SmartRally
                } else if client > RETAIL_CROWDED_PCT {
                    SignalLabel::CrowdedLong
                } else {
                    SignalLabel::InstitutionalBuying
                }
            }
            InstitutionalTrend::Bearish => {
                if client > RETAIL_CROWDED_PCT {
                    SignalLabel::CrashRisk
                } else if fii < FII_EXTREME_SHORT_PCT {
                    SignalLabel::ShortCoveringRally
                } else {
                    SignalLabel::InstitutionalSelling
                }
            }
            InstitutionalTrend::Mixed => {
                if fii < FII_EXTREME_SHORT_PCT {
                    SignalLabel::ShortCoveringRally
                } else {
                    SignalLabel::TugOfWar
                }
            }
        }
    }

    fn describe(label: SignalLabel, fii: f64, dii: f64, client: f64) -> String {
        let positions = format!(
            "FII {:.1}% long, DII {:.1}% long, retail {:.1}% long.",
            fii, dii, client
        );
        let reading = match label {
            SignalLabel::SmartRally => {
                "Institutions are buying while retail is scared. Smart-money rally."
            }
            SignalLabel::InstitutionalBuying => "Both institutions are net long. Trend support from big money.",
            SignalLabel::CrowdedLong => {
                "Everyone is long. Upside is crowded; a shakeout can come fast."
            }
            SignalLabel::CrashRisk => "Retail is buying what institutions are selling. Danger.",
            SignalLabel::ShortCoveringRally => {
                "FII shorts are stretched. A short-covering rally is likely on any good news."
            }
            SignalLabel::InstitutionalSelling => "Both institutions are net short. Stay defensive.",
            SignalLabel::TugOfWar => "Institutions disagree. Expect chop until one side gives in.",
            SignalLabel::AwaitingInput => "",
        };
        format!("{} {}", reading, positions)
    }

    fn market_context(pcr: f64, vix: f64) -> Option<String> {
        let mut notes = Vec::new();
        if vix > VIX_FEAR {
            notes.push(format!("VIX at {:.1} shows elevated fear.", vix));
        } else if vix < VIX_COMPLACENT {
            notes.push(format!("VIX at {:.1} signals complacency.", vix));
        }
        if pcr > PCR_PUT_HEAVY {
            notes.push(format!("PCR {:.2} is put-heavy; market looks oversold.", pcr));
        } else if pcr < PCR_CALL_HEAVY {
            notes.push(format!("PCR {:.2} is call-heavy; market looks overbought.", pcr));
        }

        if notes.is_empty() {
            None
        } else {
            Some(notes.join(" "))
        }
    }
}
