//! Anatomical regions and their temperature statistics.

mod aggregate;
pub mod stats;
mod types;

pub use aggregate::{RegionStats, aggregate, leg_proxy_box};
pub(crate) use aggregate::{body_stats, head_max};
pub use types::{BoundingBox, ClampedBox, DetectedRegion, RegionClass};
