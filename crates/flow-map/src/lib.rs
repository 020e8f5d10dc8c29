//! Flow Map Module
//!
//! Where money is moving: sector rotation against the benchmark, day-over-day heatmaps, and
//! the read-through from commodities and currencies into equity sectors.

pub mod cross_asset;
pub mod heatmap;
pub mod rotation;
pub mod sectors;

pub use cross_asset::{AssetImpact, CrossAsset, CrossAssetImpactMapper, PricePair};
pub use heatmap::HeatmapTile;
pub use rotation::{Quadrant, QuadrantPoint, RelativeRotationEngine, RotationConfig};
pub use sectors::{SectorIndex, BENCHMARK_SYMBOL};
