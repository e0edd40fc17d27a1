use crate::core::config::MapOptions;
use crate::core::constants::{DEFAULT_LAT, DEFAULT_LNG};
use crate::core::geo::LatLng;
use crate::fetch::loader::HttpDataSource;
use crate::fetch::source::DataSource;
use crate::input::events::InputEvent;
use crate::input::handler::{EventHandled, InputHandler};
use crate::rendering::svg::render_svg;
#[cfg(feature = "tokio-runtime")]
use crate::runtime::TokioSpawner;
use crate::runtime::AsyncSpawner;
use crate::tracker::Tracker;
use crate::{MapError, Result};
use reqwest::Url;
use std::sync::Arc;

/// Where the map opens, read from `lat`/`lng` query parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartPosition(pub LatLng);

impl StartPosition {
    /// Missing or unparsable parameters fall back to the default centre, as
    /// does a position off the globe
    pub fn from_url(url: &str) -> Self {
        let mut lat = DEFAULT_LAT;
        let mut lng = DEFAULT_LNG;
        if let Ok(url) = Url::parse(url) {
            for (key, value) in url.query_pairs() {
                match (key.as_ref(), value.parse::<f64>()) {
                    ("lat", Ok(parsed)) => lat = parsed,
                    ("lng", Ok(parsed)) => lng = parsed,
                    _ => {}
                }
            }
        }
        let position = LatLng::new(lat, lng);
        if !position.is_valid() {
            log::warn!("ignoring out-of-range start position {:?}", position);
            return Self::default();
        }
        Self(position)
    }
}

impl Default for StartPosition {
    fn default() -> Self {
        Self(LatLng::new(DEFAULT_LAT, DEFAULT_LNG))
    }
}

/// The map context: one tracker plus the input handler feeding it.
///
/// Constructed once and handed to whatever drives it, either a caller
/// stepping [`BusMap::tick`] from its own loop or [`BusMap::run`].
pub struct BusMap {
    tracker: Tracker,
    input: InputHandler,
    options: MapOptions,
}

impl BusMap {
    pub fn new(
        options: MapOptions,
        source: Arc<dyn DataSource>,
        spawner: Box<dyn AsyncSpawner>,
        start: StartPosition,
    ) -> Result<Self> {
        options.validate()?;
        let tracker = Tracker::new(source, spawner, &options, start.0.to_screen())?;
        let input = InputHandler::new(&options.display);
        log::info!(
            "map at {:.4}, {:.4} zoom {} fetching from {}",
            start.0.lat,
            start.0.lng,
            options.display.zoom,
            options.fetch.base_url
        );
        Ok(Self {
            tracker,
            input,
            options,
        })
    }

    /// A map talking to the HTTP backend named in `options`, spawning its
    /// fetches onto the current tokio runtime.
    ///
    /// The HTTP client needs a tokio reactor, so this fails when called
    /// outside a runtime (or without the `tokio-runtime` feature).
    pub fn with_http_backend(options: MapOptions, start: StartPosition) -> Result<Self> {
        let spawner = http_spawner()?;
        let source = HttpDataSource::from_options(&options.fetch)?;
        Self::new(options, Arc::new(source), spawner, start)
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> Result<EventHandled> {
        self.input.handle(event, &mut self.tracker)
    }

    /// Applies finished fetches, then issues at most one new one
    pub fn tick(&mut self) {
        self.tracker.poll_completions();
        self.tracker.fetch_tick();
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut Tracker {
        &mut self.tracker
    }

    pub fn input(&self) -> &InputHandler {
        &self.input
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn to_svg(&self) -> String {
        let size = self.tracker.viewport().size;
        render_svg(self.tracker.renderer(), size.x, size.y)
    }
}

#[cfg(feature = "tokio-runtime")]
fn http_spawner() -> Result<Box<dyn AsyncSpawner>> {
    match tokio::runtime::Handle::try_current() {
        Ok(_) => Ok(Box::new(TokioSpawner)),
        Err(_) => Err(MapError::InvalidConfig(
            "the HTTP backend must be created inside a tokio runtime".to_string(),
        )),
    }
}

#[cfg(not(feature = "tokio-runtime"))]
fn http_spawner() -> Result<Box<dyn AsyncSpawner>> {
    Err(MapError::InvalidConfig(
        "the HTTP backend requires the tokio-runtime feature".to_string(),
    ))
}

#[cfg(feature = "tokio-runtime")]
impl BusMap {
    /// Drives the map from a fixed-period timer until `Shutdown` arrives or
    /// every command sender is dropped. Returns the map for inspection.
    pub async fn run(
        mut self,
        mut commands: tokio::sync::mpsc::UnboundedReceiver<InputEvent>,
    ) -> Self {
        let mut interval = tokio::time::interval(self.options.fetch.interval());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                command = commands.recv() => {
                    let Some(event) = command else {
                        log::debug!("command channel closed");
                        break;
                    };
                    match self.handle_event(&event) {
                        Ok(EventHandled::Shutdown) => break,
                        Ok(EventHandled::Hover(label)) => log::debug!("hover {}", label),
                        Ok(_) => {}
                        Err(e) => log::warn!("ignored {:?}: {}", event, e),
                    }
                }
                _ = interval.tick() => self.tick(),
            }
        }

        self.tracker.poll_completions();
        self
    }
}
