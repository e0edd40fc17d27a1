//! Prelude module for common busmap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use busmap::prelude::*;`

pub use crate::core::{
    config::{
        DisplayOptions, FetchOptions, FetchProfile, MapOptions, MinFrequencyPolicy, StepLimits,
    },
    geo::{LatLng, Point, ScreenPoint},
    map::{BusMap, StartPosition},
    region::Region,
    viewport::Viewport,
};

pub use crate::data::formats::{FrequencyLabel, Pair, Payload, SegmentKey, Stop, StopId};

pub use crate::fetch::{DataSource, FetchRequest, HttpDataSource};

pub use crate::input::{
    events::{ControlButton, InputEvent, MapKey},
    handler::{EventHandled, InputHandler},
};

pub use crate::rendering::{
    context::{DownloadHandle, DrawCommand, DrawOutcome, MergeSummary, Renderer},
    svg::render_svg,
};

pub use crate::runtime::{default_spawner, AsyncSpawner, InlineSpawner};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::TokioSpawner;

pub use crate::tracker::{Edge, FetchOutcome, Tracker, TrackerStats};

pub use crate::{MapError, Result};

pub use std::sync::Arc;

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
