//! Per-item scan outcomes.
//!
//! Every analytic runs one symbol at a time and either produces a reading or explains why
//! the symbol was left out. A batch collects these into a [`ScanReport`] so one bad symbol
//! never sinks the others.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a symbol produced no reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum OmitReason {
    /// The provider returned nothing for the symbol
    MissingData,
    /// Fewer bars than the analytic's minimum window
    InsufficientData { have: usize, need: usize },
    /// Reading computed but did not clear the caller's threshold
    BelowThreshold,
    /// Reading computed but the symbol failed the qualifying gate
    NotQualified,
    /// Zero denominators, non-finite values and similar
    Degenerate(String),
}

impl fmt::Display for OmitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OmitReason::MissingData => write!(f, "no data returned"),
            OmitReason::InsufficientData { have, need } => {
                write!(f, "insufficient data: {} bars (need {})", have, need)
            }
            OmitReason::BelowThreshold => write!(f, "below threshold"),
            OmitReason::NotQualified => write!(f, "did not qualify"),
            OmitReason::Degenerate(detail) => write!(f, "degenerate input: {}", detail),
        }
    }
}

/// Result of running one analytic on one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Outcome<T> {
    Ready(T),
    Omitted(OmitReason),
}

impl<T> Outcome<T> {
    pub fn insufficient(have: usize, need: usize) -> Self {
        Outcome::Omitted(OmitReason::InsufficientData { have, need })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready(_))
    }

    pub fn ready(self) -> Option<T> {
        match self {
            Outcome::Ready(value) => Some(value),
            Outcome::Omitted(_) => None,
        }
    }

    pub fn omit_reason(&self) -> Option<&OmitReason> {
        match self {
            Outcome::Ready(_) => None,
            Outcome::Omitted(reason) => Some(reason),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Ready(value) => Outcome::Ready(f(value)),
            Outcome::Omitted(reason) => Outcome::Omitted(reason),
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Outcome::Ready(v),
            None => Outcome::Omitted(OmitReason::MissingData),
        }
    }
}

/// A symbol left out of a scan, with the reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Omission {
    pub symbol: String,
    pub reason: OmitReason,
}

/// Aggregated results of one batch scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport<T> {
    pub results: Vec<T>,
    pub omitted: Vec<Omission>,
    pub generated_at: DateTime<Utc>,
}

impl<T> ScanReport<T> {
    /// Folds per-symbol outcomes into a report, preserving input order.
    pub fn collect<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = (String, Outcome<T>)>,
    {
        let mut results = Vec::new();
        let mut omitted = Vec::new();
        for (symbol, outcome) in outcomes {
            match outcome {
                Outcome::Ready(value) => results.push(value),
                Outcome::Omitted(reason) => omitted.push(Omission { symbol, reason }),
            }
        }
        Self {
            results,
            omitted,
            generated_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_splits_ready_and_omitted() {
        let report = ScanReport::collect(vec![
            ("A".to_string(), Outcome::Ready(1)),
            ("B".to_string(), Outcome::insufficient(3, 5)),
            ("C".to_string(), Outcome::Ready(3)),
        ]);

        assert_eq!(report.results, vec![1, 3]);
        assert_eq!(report.omitted.len(), 1);
        assert_eq!(report.omitted[0].symbol, "B");
        assert_eq!(
            report.omitted[0].reason,
            OmitReason::InsufficientData { have: 3, need: 5 }
        );
    }

    #[test]
    fn test_option_conversion() {
        let missing: Outcome<i32> = None.into();
        assert_eq!(missing.omit_reason(), Some(&OmitReason::MissingData));
        assert_eq!(Outcome::from(Some(2)).map(|v| v * 2).ready(), Some(4));
    }

    #[test]
    fn test_reason_display() {
        let reason = OmitReason::InsufficientData { have: 4, need: 5 };
        assert_eq!(reason.to_string(), "insufficient data: 4 bars (need 5)");
    }

    #[test]
    fn test_reason_json_shape() {
        let degenerate = serde_json::to_value(OmitReason::Degenerate("zero baseline".to_string())).unwrap();
        assert_eq!(degenerate, serde_json::json!({"kind": "degenerate", "detail": "zero baseline"}));

        let missing = serde_json::to_value(OmitReason::MissingData).unwrap();
        assert_eq!(missing, serde_json::json!({"kind": "missing_data"}));

        let short = serde_json::to_value(OmitReason::InsufficientData { have: 3, need: 30 }).unwrap();
        assert_eq!(short["detail"]["need"], 30);
    }
}
