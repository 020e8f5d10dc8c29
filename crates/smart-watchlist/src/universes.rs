//! Named watchlists

use crate::normalizer::normalize;
use serde::{Deserialize, Serialize};

/// A fixed universe of symbols the dashboard offers by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Watchlist {
    /// Ten heaviest Nifty 50 constituents
    Nifty50,
    BankNifty,
    /// Broader Nifty 50 sample for the lifecycle matrix
    NiftyLeaders,
    AutoSector,
    ItSector,
    StageTwo,
    Hype,
}

const NIFTY_50: &[&str] = &[
    "RELIANCE", "TCS", "HDFCBANK", "ICICIBANK", "INFY", "BHARTIARTL", "ITC", "SBIN", "LICI", "HINDUNILVR",
];
const BANK_NIFTY: &[&str] = &["HDFCBANK", "ICICIBANK", "SBIN", "KOTAKBANK", "AXISBANK"];
const NIFTY_LEADERS: &[&str] = &[
    "RELIANCE", "TCS", "HDFCBANK", "INFY", "ITC", "SBIN", "TATAMOTORS", "SUNPHARMA", "TITAN", "BAJFINANCE",
    "ASIANPAINT", "MARUTI", "ZOMATO", "ADANIENT",
];
const AUTO_SECTOR: &[&str] = &["TATAMOTORS", "M&M", "MARUTI", "BAJAJ-AUTO", "EICHERMOT", "TVSMOTOR", "HEROMOTOCO"];
const IT_SECTOR: &[&str] = &["TCS", "INFY", "HCLTECH", "WIPRO", "TECHM", "LTIM", "PERSISTENT"];
const STAGE_TWO: &[&str] = &["RELIANCE", "SBIN", "TATAMOTORS", "INFY", "ITC", "TATASTEEL"];
const HYPE: &[&str] = &["ADANIENT", "ZOMATO", "SUZLON", "IREDA", "JIOFIN", "RVNL", "IDEA", "YESBANK"];

impl Watchlist {
    pub const ALL: [Watchlist; 7] = [
        Watchlist::Nifty50,
        Watchlist::BankNifty,
        Watchlist::NiftyLeaders,
        Watchlist::AutoSector,
        Watchlist::ItSector,
        Watchlist::StageTwo,
        Watchlist::Hype,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Watchlist::Nifty50 => "Nifty 50",
            Watchlist::BankNifty => "Bank Nifty",
            Watchlist::NiftyLeaders => "Nifty Leaders",
            Watchlist::AutoSector => "Auto Sector",
            Watchlist::ItSector => "IT Sector",
            Watchlist::StageTwo => "Stage 2 Candidates",
            Watchlist::Hype => "Hype Watch",
        }
    }

    /// Short key accepted on the command line
    pub fn key(&self) -> &'static str {
        match self {
            Watchlist::Nifty50 => "nifty50",
            Watchlist::BankNifty => "banknifty",
            Watchlist::NiftyLeaders => "leaders",
            Watchlist::AutoSector => "auto",
            Watchlist::ItSector => "it",
            Watchlist::StageTwo => "stage2",
            Watchlist::Hype => "hype",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        Self::ALL.into_iter().find(|w| w.key() == key)
    }

    /// Symbols as listed, before normalization
    pub fn raw_symbols(&self) -> &'static [&'static str] {
        match self {
            Watchlist::Nifty50 => NIFTY_50,
            Watchlist::BankNifty => BANK_NIFTY,
            Watchlist::NiftyLeaders => NIFTY_LEADERS,
            Watchlist::AutoSector => AUTO_SECTOR,
            Watchlist::ItSector => IT_SECTOR,
            Watchlist::StageTwo => STAGE_TWO,
            Watchlist::Hype => HYPE,
        }
    }

    pub fn symbols(&self) -> Vec<String> {
        self.raw_symbols().iter().map(|s| normalize(s)).collect()
    }

    /// The list as comma-separated text, the form users edit
    pub fn as_input(&self) -> String {
        self.raw_symbols().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::parse_symbol_list;

    #[test]
    fn test_keys_round_trip() {
        for list in Watchlist::ALL {
            assert_eq!(Watchlist::from_key(list.key()), Some(list));
        }
        assert_eq!(Watchlist::from_key(" Nifty50 "), Some(Watchlist::Nifty50));
        assert_eq!(Watchlist::from_key("smallcap"), None);
    }

    #[test]
    fn test_symbols_are_normalized() {
        let symbols = Watchlist::BankNifty.symbols();
        assert_eq!(symbols.len(), 5);
        assert!(symbols.iter().all(|s| s.ends_with(".NS")));
        assert_eq!(Watchlist::AutoSector.symbols()[1], "M&M.NS");
    }

    #[test]
    fn test_lists_have_no_duplicates() {
        for list in Watchlist::ALL {
            assert_eq!(parse_symbol_list(&list.as_input()), list.symbols(), "{}", list.name());
        }
    }
}
