//! # busmap
//!
//! Viewport-driven data fetching for a bus route map.
//!
//! The map remembers which rectangle of the world it has already asked the
//! backend about. As the view pans, a timer grows that rectangle one edge at
//! a time and fetches only the new strip, merging the stops and route
//! segments that come back into a renderer that draws each one once.

pub mod core;
pub mod data;
pub mod fetch;
pub mod input;
pub mod prelude;
pub mod rendering;
pub mod runtime;
pub mod spatial;
pub mod tracker;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{FetchProfile, MapOptions},
    geo::{LatLng, Point, ScreenPoint},
    map::{BusMap, StartPosition},
    region::Region,
    viewport::Viewport,
};

pub use data::formats::{FrequencyLabel, Pair, Payload, Stop};

pub use fetch::{DataSource, FetchRequest, HttpDataSource};

pub use input::{events::InputEvent, handler::InputHandler};

pub use rendering::context::Renderer;

pub use tracker::Tracker;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Fetch failed for {region}: {reason}")]
    FetchFailed { region: Region, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Error type alias for convenience
pub type Error = MapError;
