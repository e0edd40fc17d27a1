//! Configuration system for fetch behaviour and display tuning
//!
//! Options can be taken from a preset profile, built by hand, or loaded from
//! JSON. Every field has a default, so a JSON document only needs the keys it
//! wants to change.

use crate::core::constants::{
    DEFAULT_BASE_URL, DEFAULT_SURFACE_SIZE, DEFAULT_ZOOM, FETCH_INTERVAL_MS,
    MAX_SINGLE_REQUEST_SIZE, MIN_SINGLE_REQUEST_SIZE, PAN_STEP_PX, STOP_RADIUS_PX, ZOOM_STEP,
};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchProfile {
    Balanced,
    /// Smaller, slower requests for a fragile backend
    Conservative,
    /// Larger, faster requests for a local backend
    Aggressive,
    Custom(MapOptions),
}

impl FetchProfile {
    pub fn resolve(&self) -> MapOptions {
        match self {
            Self::Balanced => MapOptions::default(),
            Self::Conservative => MapOptions {
                fetch: FetchOptions {
                    min_step: 0.025,
                    max_step: 0.05,
                    interval_ms: 250,
                    max_retries: 1,
                    ..FetchOptions::default()
                },
                display: DisplayOptions::default(),
            },
            Self::Aggressive => MapOptions {
                fetch: FetchOptions {
                    min_step: 0.1,
                    max_step: 0.25,
                    interval_ms: 50,
                    max_retries: 5,
                    ..FetchOptions::default()
                },
                display: DisplayOptions::default(),
            },
            Self::Custom(options) => options.clone(),
        }
    }
}

impl Default for FetchProfile {
    fn default() -> Self {
        Self::Balanced
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapOptions {
    pub fetch: FetchOptions,
    pub display: DisplayOptions,
}

impl MapOptions {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: MapOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        let fetch = &self.fetch;
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(fetch.min_step) || !positive(fetch.max_step) {
            return Err(MapError::InvalidConfig(
                "fetch steps must be positive and finite".to_string(),
            ));
        }
        if fetch.min_step > fetch.max_step {
            return Err(MapError::InvalidConfig(format!(
                "min_step {} exceeds max_step {}",
                fetch.min_step, fetch.max_step
            )));
        }
        if fetch.interval_ms == 0 {
            return Err(MapError::InvalidConfig(
                "interval_ms must be non-zero".to_string(),
            ));
        }
        if fetch.request_timeout_secs == 0 {
            return Err(MapError::InvalidConfig(
                "request_timeout_secs must be non-zero".to_string(),
            ));
        }
        if !positive(self.display.zoom) {
            return Err(MapError::InvalidConfig(
                "zoom must be positive and finite".to_string(),
            ));
        }
        if !(self.display.zoom_step.is_finite() && self.display.zoom_step > 1.0) {
            return Err(MapError::InvalidConfig(
                "zoom_step must be greater than 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    /// Endpoint serving `{stops, pairs}` for a bounding box
    pub base_url: String,
    /// Smallest edge advance per request, in screen units
    pub min_step: f64,
    /// Largest edge advance per request, in screen units
    pub max_step: f64,
    /// Period of the fetch timer
    pub interval_ms: u64,
    /// Attempts after the first before a failed region is given up
    pub max_retries: u32,
    pub request_timeout_secs: u64,
    pub min_frequency: MinFrequencyPolicy,
}

impl FetchOptions {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn step_limits(&self) -> StepLimits {
        StepLimits {
            min_step: self.min_step,
            max_step: self.max_step,
        }
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            min_step: MIN_SINGLE_REQUEST_SIZE,
            max_step: MAX_SINGLE_REQUEST_SIZE,
            interval_ms: FETCH_INTERVAL_MS,
            max_retries: 2,
            request_timeout_secs: 30,
            min_frequency: MinFrequencyPolicy::default(),
        }
    }
}

/// Bounds on how far one request may move an edge of the fetched region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepLimits {
    pub min_step: f64,
    pub max_step: f64,
}

impl Default for StepLimits {
    fn default() -> Self {
        FetchOptions::default().step_limits()
    }
}

/// Maps a zoom factor to the `min_freq` query parameter, so wide views ask
/// for busier segments only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinFrequencyPolicy {
    /// `(zoom_above, min_freq)` pairs, checked in order
    pub breakpoints: Vec<(f64, u32)>,
    /// Used when the zoom is below every breakpoint
    pub fallback: u32,
}

impl MinFrequencyPolicy {
    pub fn min_frequency(&self, zoom: f64) -> u32 {
        self.breakpoints
            .iter()
            .find(|(above, _)| zoom > *above)
            .map(|(_, freq)| *freq)
            .unwrap_or(self.fallback)
    }
}

impl Default for MinFrequencyPolicy {
    fn default() -> Self {
        Self {
            breakpoints: vec![(2000.0, 1), (500.0, 2)],
            fallback: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Initial pixels per screen unit
    pub zoom: f64,
    /// Factor applied by one zoom-in
    pub zoom_step: f64,
    pub pan_step_px: f64,
    pub stop_radius_px: f64,
    /// Draw the "requested" and "viewport" rectangles every tick
    pub show_debug_overlays: bool,
    pub surface_width: f64,
    pub surface_height: f64,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            zoom_step: ZOOM_STEP,
            pan_step_px: PAN_STEP_PX,
            stop_radius_px: STOP_RADIUS_PX,
            show_debug_overlays: false,
            surface_width: DEFAULT_SURFACE_SIZE.0,
            surface_height: DEFAULT_SURFACE_SIZE.1,
        }
    }
}
