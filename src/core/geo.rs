//! Geographic and screen coordinates.
//!
//! Latitude grows towards the top of the screen, which is the opposite of
//! pixel y. Everything inside the crate works in "screen latitude" instead,
//! and converts at the boundary with the backend.

use serde::{Deserialize, Serialize};

/// A WGS84 position as the backend and the page URL express it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// False for NaN or anything off the globe
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn to_screen(&self) -> ScreenPoint {
        ScreenPoint::new(lng_to_slng(self.lng), lat_to_slat(self.lat))
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A coordinate in screen units: `x` is screen longitude, `y` screen latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_lat_lng(&self) -> LatLng {
        LatLng::new(slat_to_lat(self.y), slng_to_lng(self.x))
    }
}

/// Drawing-surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<Point> for geo_types::Coord<f64> {
    fn from(point: Point) -> Self {
        geo_types::Coord {
            x: point.x,
            y: point.y,
        }
    }
}

pub fn lat_to_slat(lat: f64) -> f64 {
    -lat
}

pub fn lng_to_slng(lng: f64) -> f64 {
    lng
}

pub fn slat_to_lat(slat: f64) -> f64 {
    -slat
}

pub fn slng_to_lng(slng: f64) -> f64 {
    slng
}
