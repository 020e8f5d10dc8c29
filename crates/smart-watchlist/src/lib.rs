//! Symbol handling: user input normalization and the named watchlists scans run over.

pub mod normalizer;
pub mod universes;

pub use normalizer::{display_symbol, normalize, parse_symbol_list, DEFAULT_SUFFIX};
pub use universes::Watchlist;
