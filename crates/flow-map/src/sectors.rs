//! Sector Index Universe
//!
//! NSE sectoral indices tracked by the rotation view, and the benchmark they are measured
//! against.

use serde::{Deserialize, Serialize};

/// Broad-market benchmark (Nifty 50)
pub const BENCHMARK_SYMBOL: &str = "^NSEI";

/// A sectoral index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorIndex {
    pub name: &'static str,
    pub symbol: &'static str,
}

const SECTOR_INDICES: &[SectorIndex] = &[
    SectorIndex { name: "Bank", symbol: "^NSEBANK" },
    SectorIndex { name: "IT", symbol: "^CNXIT" },
    SectorIndex { name: "Auto", symbol: "^CNXAUTO" },
    SectorIndex { name: "Pharma", symbol: "^CNXPHARMA" },
    SectorIndex { name: "Metal", symbol: "^CNXMETAL" },
    SectorIndex { name: "FMCG", symbol: "^CNXFMCG" },
    SectorIndex { name: "Realty", symbol: "^CNXREALTY" },
];

impl SectorIndex {
    /// The standard NSE sectoral indices
    pub fn standard_sectors() -> &'static [SectorIndex] {
        SECTOR_INDICES
    }

    /// Every sector symbol followed by the benchmark, ready for one batch fetch
    pub fn fetch_symbols() -> Vec<String> {
        SECTOR_INDICES
            .iter()
            .map(|s| s.symbol.to_string())
            .chain(std::iter::once(BENCHMARK_SYMBOL.to_string()))
            .collect()
    }
}
