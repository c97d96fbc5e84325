//! Detected region types.

use serde::{Deserialize, Serialize};

/// Anatomical region classes emitted by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionClass {
    /// Torso (class id 0).
    Body,
    /// Head including comb and wattles (class id 1).
    Head,
    /// Legs and feet (class id 2).
    Leg,
}

impl RegionClass {
    /// Map a detector class id to a region class.
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::Body),
            1 => Some(Self::Head),
            2 => Some(Self::Leg),
            _ => None,
        }
    }

    /// Detector class id.
    pub const fn id(self) -> u32 {
        match self {
            Self::Body => 0,
            Self::Head => 1,
            Self::Leg => 2,
        }
    }
}

impl std::fmt::Display for RegionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Body => write!(f, "body"),
            Self::Head => write!(f, "head"),
            Self::Leg => write!(f, "leg"),
        }
    }
}

impl std::str::FromStr for RegionClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u32>() {
            return Self::from_id(id).ok_or_else(|| format!("unknown class id: {id}"));
        }
        match s.to_lowercase().as_str() {
            "body" => Ok(Self::Body),
            "head" => Ok(Self::Head),
            "leg" | "legs" => Ok(Self::Leg),
            other => Err(format!("unknown region class: {other}")),
        }
    }
}

/// Axis-aligned box in pixel coordinates, `(x1, y1)` inclusive and
/// `(x2, y2)` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x1: i64,
    /// Top edge.
    pub y1: i64,
    /// Right edge.
    pub x2: i64,
    /// Bottom edge.
    pub y2: i64,
}

/// A box clipped to a grid, as `usize` ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampedBox {
    /// Left edge.
    pub x0: usize,
    /// Right edge (exclusive).
    pub x1: usize,
    /// Top edge.
    pub y0: usize,
    /// Bottom edge (exclusive).
    pub y1: usize,
}

impl ClampedBox {
    /// Whether the box covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }
}

impl BoundingBox {
    /// Create a box from edge coordinates.
    pub const fn new(x1: i64, y1: i64, x2: i64, y2: i64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build a box from detector float coordinates, truncating toward zero.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_f64(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(x1 as i64, y1 as i64, x2 as i64, y2 as i64)
    }

    /// Box width (may be zero or negative for degenerate boxes).
    pub const fn width(&self) -> i64 {
        self.x2 - self.x1
    }

    /// Box height (may be zero or negative for degenerate boxes).
    pub const fn height(&self) -> i64 {
        self.y2 - self.y1
    }

    /// Clip the box to a `width × height` grid.
    pub fn clamp(&self, width: usize, height: usize) -> ClampedBox {
        ClampedBox {
            x0: clamp_coord(self.x1, width),
            x1: clamp_coord(self.x2, width),
            y0: clamp_coord(self.y1, height),
            y1: clamp_coord(self.y2, height),
        }
    }
}

fn clamp_coord(v: i64, limit: usize) -> usize {
    usize::try_from(v.max(0)).map_or(limit, |v| v.min(limit))
}

/// A labeled box produced by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedRegion {
    /// Region class.
    pub class: RegionClass,
    /// Pixel bounding box.
    pub bbox: BoundingBox,
    /// Detector confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl DetectedRegion {
    /// Create a detected region.
    pub const fn new(class: RegionClass, bbox: BoundingBox, confidence: f32) -> Self {
        Self {
            class,
            bbox,
            confidence,
        }
    }
}
