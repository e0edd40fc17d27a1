//! Wire format of the bounding-box endpoint.
//!
//! ```json
//! { "stops": { "1500IM77": {"lat": 51.5, "lng": 0.7, "name": "High St"} },
//!   "pairs": [ {"from": "1500IM77", "to": "1500IM78", "frequency": 4} ] }
//! ```

use crate::core::constants::{HIGH_FREQUENCY, MEDIUM_FREQUENCY};
use crate::core::geo::{LatLng, ScreenPoint};
use crate::prelude::HashMap;
use crate::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// ATCO code of a stop
pub type StopId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub name: String,
}

impl Stop {
    pub fn new(lat: f64, lng: f64, name: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            name: name.into(),
        }
    }

    pub fn screen_position(&self) -> ScreenPoint {
        LatLng::new(self.lat, self.lng).to_screen()
    }
}

/// A directed stop-to-stop segment with its buses per hour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub from: StopId,
    pub to: StopId,
    #[serde(default)]
    pub frequency: u32,
    #[serde(
        default,
        deserialize_with = "lenient_line_names",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub line_names: Vec<String>,
}

impl Pair {
    pub fn new(from: impl Into<StopId>, to: impl Into<StopId>, frequency: u32) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            frequency,
            line_names: Vec::new(),
        }
    }

    pub fn key(&self) -> SegmentKey {
        (self.from.clone(), self.to.clone())
    }
}

// The backend aggregates line names with a LEFT JOIN, so both the array and
// its elements may be null.
fn lenient_line_names<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(names.into_iter().flatten().flatten().collect())
}

/// Identity of a segment: the ordered `(from, to)` pair
pub type SegmentKey = (StopId, StopId);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub stops: HashMap<StopId, Stop>,
    #[serde(default)]
    pub pairs: Vec<Pair>,
}

impl Payload {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty() && self.pairs.is_empty()
    }
}

/// Coarse buses-per-hour bucket, used for styling only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyLabel {
    High,
    Medium,
    Low,
}

impl FrequencyLabel {
    pub fn from_buses_per_hour(buses_per_hour: u32) -> Self {
        if buses_per_hour >= HIGH_FREQUENCY {
            Self::High
        } else if buses_per_hour >= MEDIUM_FREQUENCY {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for FrequencyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
