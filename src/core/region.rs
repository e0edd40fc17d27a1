use crate::core::geo::ScreenPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An axis-aligned rectangle in screen units.
///
/// `x` runs along screen longitude and `y` along screen latitude, so
/// `max_y` is the bottom edge on screen. Bounds are not validated: a region
/// built with `min > max` reports a negative width or height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Region {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Zero-area region sitting on a single point
    pub fn point(at: ScreenPoint) -> Self {
        Self::new(at.x, at.x, at.y, at.y)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Checks whether `other` lies entirely inside this region
    pub fn contains_region(&self, other: &Region) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    pub fn top_left(&self) -> ScreenPoint {
        ScreenPoint::new(self.min_x, self.min_y)
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Region({}, {}, {}, {})",
            self.min_x, self.max_x, self.min_y, self.max_y
        )
    }
}
