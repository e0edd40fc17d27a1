//! Core constants derived from the defaults of the original map page.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Pixels per screen unit (degree) at start-up.
pub const DEFAULT_ZOOM: f64 = 5000.0;

/// Smallest edge advance of a single fetch, in screen units.
pub const MIN_SINGLE_REQUEST_SIZE: f64 = 0.05;

/// Largest edge advance of a single fetch, in screen units.
pub const MAX_SINGLE_REQUEST_SIZE: f64 = 0.1;

/// Period of the fetch timer.
pub const FETCH_INTERVAL_MS: u64 = 100;

/// Keyboard and button pan step, in pixels.
pub const PAN_STEP_PX: f64 = 100.0;

/// Multiplier applied to the zoom factor by a single zoom-in.
pub const ZOOM_STEP: f64 = 1.5;

/// Radius of a stop marker in pixels.
pub const STOP_RADIUS_PX: f64 = 5.0;

/// Buses per hour at or above which a segment is labelled `high`.
pub const HIGH_FREQUENCY: u32 = 4;

/// Buses per hour at or above which a segment is labelled `medium`.
pub const MEDIUM_FREQUENCY: u32 = 2;

/// Start position when the page URL carries none (Southend-on-Sea).
pub const DEFAULT_LAT: f64 = 51.566;
pub const DEFAULT_LNG: f64 = 0.698;

/// Default surface size used by headless maps.
pub const DEFAULT_SURFACE_SIZE: (f64, f64) = (800.0, 600.0);

/// Backend endpoint serving stops and pairs for a bounding box.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/json/";
