//! Fundamental views built on provider-reported ratios.

pub mod lifecycle;

pub use lifecycle::*;
