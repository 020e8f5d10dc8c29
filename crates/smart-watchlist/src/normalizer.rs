//! Symbol Normalizer
//!
//! Turns whatever the user typed ("nifty", " reliance ", "airtel") into an exchange
//! qualified Yahoo symbol. Never fails; unknown names pass through with the NSE suffix.

/// Suffix for NSE-listed equities
pub const DEFAULT_SUFFIX: &str = ".NS";
const BSE_SUFFIX: &str = ".BO";
const INDEX_PREFIX: char = '^';

/// Nicknames and common names mapped to their listed symbol
const SYMBOL_ALIASES: &[(&str, &str)] = &[
    ("NIFTY", "^NSEI"),
    ("NIFTY50", "^NSEI"),
    ("BANKNIFTY", "^NSEBANK"),
    ("NIFTYBANK", "^NSEBANK"),
    ("SENSEX", "^BSESN"),
    ("FINNIFTY", "^CNXFIN"),
    ("NIFTYIT", "^CNXIT"),
    ("VEDANTA", "VEDL"),
    ("HDFC", "HDFCBANK"),
    ("BAJFIN", "BAJFINANCE"),
    ("MAHINDRA", "M&M"),
    ("AIRTEL", "BHARTIARTL"),
    ("JIO", "JIOFIN"),
];

fn alias_for(symbol: &str) -> Option<&'static str> {
    SYMBOL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == symbol)
        .map(|(_, target)| *target)
}

/// Canonical symbol for loose user input.
pub fn normalize(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    let symbol = alias_for(&upper).map(str::to_string).unwrap_or(upper);

    if symbol.ends_with(DEFAULT_SUFFIX) || symbol.ends_with(BSE_SUFFIX) || symbol.starts_with(INDEX_PREFIX) {
        symbol
    } else {
        format!("{}{}", symbol, DEFAULT_SUFFIX)
    }
}

/// Comma-separated input to normalized symbols, first-seen order, blanks and repeats dropped.
pub fn parse_symbol_list(input: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for part in input.split(',') {
        if part.trim().is_empty() {
            continue;
        }
        let symbol = normalize(part);
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}

/// Symbol as shown to the user: NSE suffix stripped, everything else untouched.
pub fn display_symbol(symbol: &str) -> &str {
    symbol.strip_suffix(DEFAULT_SUFFIX).unwrap_or(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_nicknames() {
        assert_eq!(normalize("niftybank"), "^NSEBANK");
        assert_eq!(normalize("BankNifty"), "^NSEBANK");
        assert_eq!(normalize("nifty"), "^NSEI");
        assert_eq!(normalize("sensex"), "^BSESN");
        assert_eq!(normalize("NIFTYIT"), "^CNXIT");
    }

    #[test]
    fn test_plain_names_get_suffix() {
        assert_eq!(normalize(" reliance "), "RELIANCE.NS");
        assert_eq!(normalize("airtel"), "BHARTIARTL.NS");
        assert_eq!(normalize("mahindra"), "M&M.NS");
        assert_eq!(normalize("NOTAREALCO"), "NOTAREALCO.NS");
    }

    #[test]
    fn test_qualified_symbols_untouched() {
        assert_eq!(normalize("tcs.ns"), "TCS.NS");
        assert_eq!(normalize("500325.BO"), "500325.BO");
        assert_eq!(normalize("^cnxauto"), "^CNXAUTO");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["nifty", " reliance ", "hdfc", "idea", "500325.bo"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_parse_symbol_list() {
        assert_eq!(
            parse_symbol_list("sbin, reliance,, SBIN ,hdfc,  "),
            vec!["SBIN.NS", "RELIANCE.NS", "HDFCBANK.NS"]
        );
        assert!(parse_symbol_list(" , ,").is_empty());
    }

    #[test]
    fn test_display_symbol() {
        assert_eq!(display_symbol("RELIANCE.NS"), "RELIANCE");
        assert_eq!(display_symbol("^NSEI"), "^NSEI");
        assert_eq!(display_symbol("500325.BO"), "500325.BO");
    }
}
