//! Participant positioning signals for the derivatives market.

pub mod positioning;

pub use positioning::*;
