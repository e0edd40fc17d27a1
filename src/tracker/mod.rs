//! Viewport tracker: decides what to download next as the view moves.
//!
//! The tracker remembers the single rectangle of data requested so far and,
//! once per tick, grows one of its edges towards the visible viewport. Each
//! growth step becomes one backend request, so a long pan is covered by a
//! series of small requests instead of one large one.

pub mod expansion;

use crate::core::config::{FetchOptions, MapOptions};
use crate::core::geo::{Point, ScreenPoint};
use crate::core::region::Region;
use crate::core::viewport::Viewport;
use crate::data::formats::Payload;
use crate::fetch::source::{DataSource, FetchRequest};
use crate::rendering::context::{DownloadHandle, Renderer};
use crate::runtime::AsyncSpawner;
use crate::{MapError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::VecDeque;
use std::sync::Arc;

pub use expansion::Edge;

/// A finished fetch, sent back from the task that ran it
#[derive(Debug)]
pub struct FetchOutcome {
    pub handle: DownloadHandle,
    pub region: Region,
    pub generation: u64,
    pub attempt: u32,
    pub result: Result<Payload>,
}

#[derive(Debug, Clone, Copy)]
struct PendingRetry {
    region: Region,
    attempt: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    pub requests_issued: u64,
    pub responses_merged: u64,
    pub failures: u64,
    pub regions_abandoned: u64,
    pub in_flight: usize,
}

pub struct Tracker {
    viewport: Viewport,
    fetched: Region,
    renderer: Renderer,
    source: Arc<dyn DataSource>,
    spawner: Box<dyn AsyncSpawner>,
    options: FetchOptions,
    show_debug_overlays: bool,
    completions_tx: Sender<FetchOutcome>,
    completions_rx: Receiver<FetchOutcome>,
    retries: VecDeque<PendingRetry>,
    /// Bumped on every reset; failures from older generations are not retried
    generation: u64,
    stats: TrackerStats,
}

impl Tracker {
    /// Fails if `options` does not validate; invalid step limits or zoom
    /// would keep the fetched region from ever covering the viewport.
    pub fn new(
        source: Arc<dyn DataSource>,
        spawner: Box<dyn AsyncSpawner>,
        options: &MapOptions,
        start: ScreenPoint,
    ) -> Result<Self> {
        options.validate()?;
        let display = &options.display;
        let (completions_tx, completions_rx) = unbounded();
        let mut tracker = Self {
            viewport: Viewport::new(
                start,
                Point::new(display.surface_width, display.surface_height),
            ),
            fetched: Region::point(start),
            renderer: Renderer::new(display.zoom).with_stop_radius(display.stop_radius_px),
            source,
            spawner,
            options: options.fetch.clone(),
            show_debug_overlays: display.show_debug_overlays,
            completions_tx,
            completions_rx,
            retries: VecDeque::new(),
            generation: 0,
            stats: TrackerStats::default(),
        };
        tracker.reset();
        tracker.pan();
        Ok(tracker)
    }

    /// Forgets everything requested so far and clears the drawing.
    ///
    /// The fetched region becomes a zero-area box at the pan position, ready
    /// to grow again.
    pub fn reset(&mut self) {
        self.renderer.clear();
        self.fetched = Region::point(self.viewport.pan);
        self.retries.clear();
        self.generation += 1;
    }

    pub fn current_viewport(&self) -> Region {
        self.viewport.visible_region(self.renderer.zoom())
    }

    /// Grows the fetched region by one edge step and returns the new strip,
    /// or `None` when the viewport is already covered.
    pub fn compute_next_fetch(&mut self) -> Option<Region> {
        let desired = self.current_viewport();
        if self.show_debug_overlays {
            self.renderer.set_debug_overlay("viewport", desired);
        }

        let (edge, delta) =
            expansion::expand_towards(&mut self.fetched, &desired, self.options.step_limits())?;
        log::trace!("expanding {:?} to {}", edge, self.fetched);
        Some(delta)
    }

    /// One timer tick: pick a region, show it as downloading and spawn the
    /// request. Returns the region requested, if any.
    ///
    /// Regions whose fetch failed are retried before the fetched region grows.
    pub fn fetch_tick(&mut self) -> Option<Region> {
        if self.show_debug_overlays {
            self.renderer.set_debug_overlay("requested", self.fetched);
        }

        let (region, attempt) = match self.retries.pop_front() {
            Some(retry) => (retry.region, retry.attempt),
            None => (self.compute_next_fetch()?, 0),
        };

        let handle = self.renderer.show_downloading(region);
        let min_freq = self
            .options
            .min_frequency
            .min_frequency(self.renderer.zoom());
        let request = FetchRequest::for_region(&region, min_freq);
        log::debug!(
            "should download {} (min_freq {}, attempt {})",
            region,
            min_freq,
            attempt
        );

        self.stats.requests_issued += 1;
        self.stats.in_flight += 1;

        let source = Arc::clone(&self.source);
        let tx = self.completions_tx.clone();
        let generation = self.generation;
        self.spawner.spawn_boxed(Box::pin(async move {
            let result = source.fetch(&request).await;
            // The receiver lives in the tracker; a send error only means it was dropped
            let _ = tx.send(FetchOutcome {
                handle,
                region,
                generation,
                attempt,
                result,
            });
        }));

        Some(region)
    }

    /// Applies every fetch that has finished since the last call.
    ///
    /// Returns the number of outcomes handled.
    pub fn poll_completions(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(outcome) = self.completions_rx.try_recv() {
            handled += 1;
            self.stats.in_flight = self.stats.in_flight.saturating_sub(1);
            self.renderer.remove_downloading(outcome.handle);

            match outcome.result {
                Ok(payload) => {
                    let summary = self.renderer.merge(&payload);
                    self.stats.responses_merged += 1;
                    log::info!(
                        "merged {}: {} new stops, {} new segments",
                        outcome.region,
                        summary.new_stops,
                        summary.new_segments
                    );
                    if summary.dropped_segments > 0 {
                        log::warn!(
                            "dropped {} segments with unknown stops in {}",
                            summary.dropped_segments,
                            outcome.region
                        );
                    }
                }
                Err(error) => {
                    self.stats.failures += 1;
                    let failure = MapError::FetchFailed {
                        region: outcome.region,
                        reason: error.to_string(),
                    };
                    self.handle_failure(failure, outcome.region, outcome.attempt, outcome.generation);
                }
            }
        }
        handled
    }

    fn handle_failure(&mut self, failure: MapError, region: Region, attempt: u32, generation: u64) {
        if generation != self.generation {
            log::debug!("ignoring stale failure: {}", failure);
            return;
        }

        if attempt < self.options.max_retries {
            log::warn!("{} (attempt {}), will retry", failure, attempt + 1);
            self.retries.push_back(PendingRetry {
                region,
                attempt: attempt + 1,
            });
        } else {
            log::error!("giving up: {}", failure);
            self.stats.regions_abandoned += 1;
        }
    }

    /// Pushes the pan position to the drawing surface transform
    pub fn pan(&mut self) {
        let translation = self.viewport.translation(self.renderer.zoom());
        self.renderer.set_translation(translation);
    }

    pub fn pan_to(&mut self, top_left: ScreenPoint) {
        self.viewport.pan = top_left;
        self.pan();
    }

    /// Moves the view by a pixel offset; positive `y` moves it down
    pub fn pan_by_pixels(&mut self, delta: Point) {
        let zoom = self.renderer.zoom();
        self.viewport.pan_by_pixels(delta, zoom);
        self.pan();
    }

    pub fn zoom_by(&mut self, factor: f64) -> Result<()> {
        self.set_zoom(self.renderer.zoom() * factor)
    }

    /// Changes the zoom factor. Pixel positions of everything drawn become
    /// stale, so the tracker resets.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(MapError::InvalidConfig(format!("invalid zoom {}", zoom)));
        }
        self.renderer.set_zoom(zoom);
        self.reset();
        self.pan();
        Ok(())
    }

    pub fn resize(&mut self, size: Point) {
        self.viewport.set_size(size);
    }

    pub fn fetched_region(&self) -> Region {
        self.fetched
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn zoom(&self) -> f64 {
        self.renderer.zoom()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_retries(&self) -> usize {
        self.retries.len()
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }
}
