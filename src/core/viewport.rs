use crate::core::geo::{Point, ScreenPoint};
use crate::core::region::Region;
use serde::{Deserialize, Serialize};

/// The visible part of the map: where it is panned to and how big the
/// drawing surface is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Top-left corner of the view in screen units
    pub pan: ScreenPoint,
    /// Size of the drawing surface in pixels
    pub size: Point,
}

impl Viewport {
    pub fn new(pan: ScreenPoint, size: Point) -> Self {
        Self { pan, size }
    }

    /// Visible region at the given zoom factor (pixels per screen unit)
    pub fn visible_region(&self, zoom: f64) -> Region {
        Region::new(
            self.pan.x,
            self.pan.x + self.size.x / zoom,
            self.pan.y,
            self.pan.y + self.size.y / zoom,
        )
    }

    /// Pixel translation the drawing surface applies so that `pan` lands at
    /// its top-left corner.
    pub fn translation(&self, zoom: f64) -> Point {
        Point::new(-self.pan.x * zoom, -self.pan.y * zoom)
    }

    /// Moves the view by a pixel offset at the given zoom factor
    pub fn pan_by_pixels(&mut self, delta: Point, zoom: f64) {
        self.pan.x += delta.x / zoom;
        self.pan.y += delta.y / zoom;
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }
}
