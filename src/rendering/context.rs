use crate::core::constants::{DEFAULT_ZOOM, STOP_RADIUS_PX};
use crate::core::geo::{Point, ScreenPoint};
use crate::core::region::Region;
use crate::data::formats::{FrequencyLabel, Pair, Payload, SegmentKey, Stop, StopId};
use crate::prelude::HashMap;
use crate::spatial::index::StopIndex;
use geo_types::Line;

/// A stop marker that has been placed on the drawing surface
#[derive(Debug, Clone, PartialEq)]
pub struct StopMarker {
    pub id: StopId,
    pub name: String,
    pub screen: ScreenPoint,
    /// Centre in layer pixels (before the pan translation)
    pub center: Point,
    pub radius: f64,
}

/// A drawn stop-to-stop line
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPath {
    pub key: SegmentKey,
    pub line: Line<f64>,
    pub frequency: u32,
    pub label: FrequencyLabel,
}

impl SegmentPath {
    pub fn id(&self) -> String {
        format!("path_{}_{}", self.key.0, self.key.1)
    }
}

/// Identifies one "being downloaded" rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DownloadHandle(u64);

/// What happened to an entity handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    Drawn,
    AlreadyDrawn,
    /// A segment endpoint is not a known stop
    MissingEndpoint,
}

/// Counts from a single [`Renderer::merge`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub new_stops: usize,
    pub new_segments: usize,
    pub dropped_segments: usize,
}

/// Commands a drawing backend paints, in back-to-front order
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    DebugOverlay {
        name: String,
        min: Point,
        max: Point,
    },
    Segment {
        id: String,
        from: Point,
        to: Point,
        label: FrequencyLabel,
    },
    Stop {
        id: StopId,
        name: String,
        center: Point,
        radius: f64,
    },
    Downloading {
        min: Point,
        max: Point,
    },
}

/// Owns the drawing surface state: the zoom factor and every drawn entity.
///
/// Entities are keyed by id, so drawing the same stop or segment twice is a
/// no-op. Data that arrives late or twice from overlapping fetches therefore
/// merges harmlessly in any order.
pub struct Renderer {
    zoom: f64,
    stop_radius: f64,
    translation: Point,
    stops: Vec<StopMarker>,
    stop_slots: HashMap<StopId, usize>,
    segments: Vec<SegmentPath>,
    segment_slots: HashMap<SegmentKey, usize>,
    downloading: Vec<(DownloadHandle, Region)>,
    next_handle: u64,
    debug_overlays: Vec<(String, Region)>,
    index: StopIndex,
}

impl Renderer {
    pub fn new(zoom: f64) -> Self {
        Self {
            zoom,
            stop_radius: STOP_RADIUS_PX,
            translation: Point::default(),
            stops: Vec::new(),
            stop_slots: HashMap::default(),
            segments: Vec::new(),
            segment_slots: HashMap::default(),
            downloading: Vec::new(),
            next_handle: 0,
            debug_overlays: Vec::new(),
            index: StopIndex::new(),
        }
    }

    pub fn with_stop_radius(mut self, radius: f64) -> Self {
        self.stop_radius = radius;
        self
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Changes the pixels-per-unit factor. Already drawn entities keep their
    /// old pixel positions; the tracker clears them straight after.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Screen units to pixels
    pub fn scale(&self, value: f64) -> f64 {
        value * self.zoom
    }

    /// Pixels to screen units
    pub fn descale(&self, value: f64) -> f64 {
        value / self.zoom
    }

    fn scale_point(&self, point: ScreenPoint) -> Point {
        Point::new(self.scale(point.x), self.scale(point.y))
    }

    pub fn translation(&self) -> Point {
        self.translation
    }

    pub fn set_translation(&mut self, translation: Point) {
        self.translation = translation;
    }

    pub fn draw_stop(&mut self, id: &str, stop: &Stop) -> DrawOutcome {
        if self.stop_slots.contains_key(id) {
            return DrawOutcome::AlreadyDrawn;
        }

        let screen = stop.screen_position();
        let marker = StopMarker {
            id: id.to_string(),
            name: stop.name.clone(),
            screen,
            center: self.scale_point(screen),
            radius: self.stop_radius,
        };
        self.index.insert(marker.id.clone(), marker.center);
        self.stop_slots.insert(marker.id.clone(), self.stops.len());
        self.stops.push(marker);
        DrawOutcome::Drawn
    }

    pub fn draw_segment(
        &mut self,
        pair: &Pair,
        from: Option<&Stop>,
        to: Option<&Stop>,
    ) -> DrawOutcome {
        let from = from.map(Stop::screen_position);
        let to = to.map(Stop::screen_position);
        self.place_segment(pair, from, to)
    }

    fn place_segment(
        &mut self,
        pair: &Pair,
        from: Option<ScreenPoint>,
        to: Option<ScreenPoint>,
    ) -> DrawOutcome {
        let key = pair.key();
        if self.segment_slots.contains_key(&key) {
            return DrawOutcome::AlreadyDrawn;
        }
        let (Some(from), Some(to)) = (from, to) else {
            return DrawOutcome::MissingEndpoint;
        };

        let path = SegmentPath {
            line: Line::new(self.scale_point(from), self.scale_point(to)),
            key: key.clone(),
            frequency: pair.frequency,
            label: FrequencyLabel::from_buses_per_hour(pair.frequency),
        };
        self.segment_slots.insert(key, self.segments.len());
        self.segments.push(path);
        DrawOutcome::Drawn
    }

    /// Draws every stop and pair of a backend payload.
    ///
    /// Stops go first, so a pair resolves its endpoints against this payload
    /// and anything drawn earlier. Pairs whose endpoints are still unknown
    /// are dropped.
    pub fn merge(&mut self, payload: &Payload) -> MergeSummary {
        let mut summary = MergeSummary::default();

        for (id, stop) in &payload.stops {
            if self.draw_stop(id, stop) == DrawOutcome::Drawn {
                summary.new_stops += 1;
            }
        }

        for pair in &payload.pairs {
            let from = self.stop(&pair.from).map(|marker| marker.screen);
            let to = self.stop(&pair.to).map(|marker| marker.screen);
            match self.place_segment(pair, from, to) {
                DrawOutcome::Drawn => summary.new_segments += 1,
                DrawOutcome::MissingEndpoint => summary.dropped_segments += 1,
                DrawOutcome::AlreadyDrawn => {}
            }
        }

        summary
    }

    /// Removes every drawn entity, indicator and overlay
    pub fn clear(&mut self) {
        self.stops.clear();
        self.stop_slots.clear();
        self.segments.clear();
        self.segment_slots.clear();
        self.downloading.clear();
        self.debug_overlays.clear();
        self.index.clear();
    }

    pub fn show_downloading(&mut self, region: Region) -> DownloadHandle {
        let handle = DownloadHandle(self.next_handle);
        self.next_handle += 1;
        self.downloading.push((handle, region));
        handle
    }

    /// Returns false if the indicator was already gone
    pub fn remove_downloading(&mut self, handle: DownloadHandle) -> bool {
        let before = self.downloading.len();
        self.downloading.retain(|(h, _)| *h != handle);
        self.downloading.len() != before
    }

    pub fn downloading(&self) -> impl Iterator<Item = &Region> {
        self.downloading.iter().map(|(_, region)| region)
    }

    /// Creates or moves the named debug rectangle
    pub fn set_debug_overlay(&mut self, name: &str, region: Region) {
        match self.debug_overlays.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = region,
            None => self.debug_overlays.push((name.to_string(), region)),
        }
    }

    pub fn debug_overlay(&self, name: &str) -> Option<&Region> {
        self.debug_overlays
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, region)| region)
    }

    pub fn debug_overlays(&self) -> impl Iterator<Item = (&str, &Region)> {
        self.debug_overlays
            .iter()
            .map(|(name, region)| (name.as_str(), region))
    }

    pub fn stop(&self, id: &str) -> Option<&StopMarker> {
        self.stop_slots.get(id).map(|&slot| &self.stops[slot])
    }

    pub fn segment(&self, from: &str, to: &str) -> Option<&SegmentPath> {
        self.segment_slots
            .get(&(from.to_string(), to.to_string()))
            .map(|&slot| &self.segments[slot])
    }

    pub fn stops(&self) -> &[StopMarker] {
        &self.stops
    }

    pub fn segments(&self) -> &[SegmentPath] {
        &self.segments
    }

    /// The stop under a surface pixel (after the pan translation)
    pub fn stop_at(&self, pixel: Point, radius: f64) -> Option<&StopMarker> {
        let layer = pixel.subtract(&self.translation);
        self.index
            .nearest_within(layer, radius)
            .and_then(|hit| self.stop(&hit.id))
    }

    fn pixel_rect(&self, region: &Region) -> (Point, Point) {
        (
            Point::new(self.scale(region.min_x), self.scale(region.min_y)),
            Point::new(self.scale(region.max_x), self.scale(region.max_y)),
        )
    }

    /// Flattens the scene into layer-pixel draw commands
    pub fn draw_commands(&self) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(
            self.debug_overlays.len() + self.segments.len() + self.stops.len() + self.downloading.len(),
        );

        // Overlays sit underneath the stops, which take user interaction
        for (name, region) in &self.debug_overlays {
            let (min, max) = self.pixel_rect(region);
            commands.push(DrawCommand::DebugOverlay {
                name: name.clone(),
                min,
                max,
            });
        }
        for segment in &self.segments {
            commands.push(DrawCommand::Segment {
                id: segment.id(),
                from: Point::new(segment.line.start.x, segment.line.start.y),
                to: Point::new(segment.line.end.x, segment.line.end.y),
                label: segment.label,
            });
        }
        for stop in &self.stops {
            commands.push(DrawCommand::Stop {
                id: stop.id.clone(),
                name: stop.name.clone(),
                center: stop.center,
                radius: stop.radius,
            });
        }
        for (_, region) in &self.downloading {
            let (min, max) = self.pixel_rect(region);
            commands.push(DrawCommand::Downloading { min, max });
        }

        commands
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_ZOOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Payload {
        let mut payload = Payload::default();
        payload
            .stops
            .insert("A".to_string(), Stop::new(51.5, 0.7, "Victoria Circus"));
        payload
            .stops
            .insert("B".to_string(), Stop::new(51.6, 0.8, "London Road"));
        payload.pairs.push(Pair::new("A", "B", 5));
        payload.pairs.push(Pair::new("B", "A", 1));
        payload
    }

    #[test]
    fn test_scale_round_trip() {
        let renderer = Renderer::new(5000.0);
        assert_eq!(renderer.scale(0.1), 500.0);
        assert_eq!(renderer.descale(500.0), 0.1);
    }

    #[test]
    fn test_draw_stop_uses_screen_latitude() {
        let mut renderer = Renderer::new(100.0);
        assert_eq!(
            renderer.draw_stop("A", &Stop::new(51.5, 0.7, "Victoria Circus")),
            DrawOutcome::Drawn
        );
        let marker = renderer.stop("A").unwrap();
        assert!((marker.center.x - 70.0).abs() < 1e-9);
        assert!((marker.center.y + 5150.0).abs() < 1e-9);
        assert_eq!(marker.radius, STOP_RADIUS_PX);
    }

    #[test]
    fn test_draw_stop_is_idempotent() {
        let mut renderer = Renderer::default();
        let stop = Stop::new(51.5, 0.7, "Victoria Circus");
        renderer.draw_stop("A", &stop);
        assert_eq!(
            renderer.draw_stop("A", &Stop::new(0.0, 0.0, "elsewhere")),
            DrawOutcome::AlreadyDrawn
        );
        assert_eq!(renderer.stops().len(), 1);
        assert_eq!(renderer.stop("A").unwrap().name, "Victoria Circus");
    }

    #[test]
    fn test_merge_twice_changes_nothing() {
        let mut renderer = Renderer::default();
        let first = renderer.merge(&payload());
        assert_eq!(first.new_stops, 2);
        assert_eq!(first.new_segments, 2);

        let stops = renderer.stops().to_vec();
        let segments = renderer.segments().to_vec();
        let second = renderer.merge(&payload());

        assert_eq!(second, MergeSummary::default());
        assert_eq!(renderer.stops(), stops.as_slice());
        assert_eq!(renderer.segments(), segments.as_slice());
    }

    #[test]
    fn test_segment_with_unknown_stop_is_dropped() {
        let mut renderer = Renderer::default();
        let mut data = payload();
        data.pairs.push(Pair::new("A", "ghost", 3));

        let summary = renderer.merge(&data);
        assert_eq!(summary.dropped_segments, 1);
        assert!(renderer.segment("A", "ghost").is_none());
        assert_eq!(renderer.segments().len(), 2);
    }

    #[test]
    fn test_segment_resolves_previously_drawn_stop() {
        let mut renderer = Renderer::default();
        renderer.merge(&payload());

        let mut later = Payload::default();
        later
            .stops
            .insert("C".to_string(), Stop::new(51.7, 0.9, "Chalkwell"));
        later.pairs.push(Pair::new("B", "C", 2));

        let summary = renderer.merge(&later);
        assert_eq!(summary.new_segments, 1);
        assert_eq!(
            renderer.segment("B", "C").unwrap().label,
            FrequencyLabel::Medium
        );
    }

    #[test]
    fn test_draw_segment_direction_matters() {
        let mut renderer = Renderer::default();
        let a = Stop::new(51.5, 0.7, "A");
        let b = Stop::new(51.6, 0.8, "B");
        let pair = Pair::new("A", "B", 4);

        assert_eq!(renderer.draw_segment(&pair, Some(&a), Some(&b)), DrawOutcome::Drawn);
        assert_eq!(
            renderer.draw_segment(&pair, Some(&a), Some(&b)),
            DrawOutcome::AlreadyDrawn
        );
        assert_eq!(
            renderer.draw_segment(&Pair::new("B", "A", 4), Some(&b), None),
            DrawOutcome::MissingEndpoint
        );
        assert_eq!(renderer.segment("A", "B").unwrap().label, FrequencyLabel::High);
        assert_eq!(renderer.segment("A", "B").unwrap().id(), "path_A_B");
    }

    #[test]
    fn test_downloading_indicators() {
        let mut renderer = Renderer::default();
        let first = renderer.show_downloading(Region::new(0.0, 0.1, 0.0, 0.1));
        let second = renderer.show_downloading(Region::new(0.1, 0.2, 0.0, 0.1));
        assert_ne!(first, second);
        assert_eq!(renderer.downloading().count(), 2);

        assert!(renderer.remove_downloading(first));
        assert!(!renderer.remove_downloading(first));
        assert_eq!(renderer.downloading().count(), 1);
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut renderer = Renderer::default();
        renderer.merge(&payload());
        renderer.show_downloading(Region::default());
        renderer.set_debug_overlay("viewport", Region::default());

        renderer.clear();

        assert!(renderer.stops().is_empty());
        assert!(renderer.segments().is_empty());
        assert_eq!(renderer.downloading().count(), 0);
        assert!(renderer.draw_commands().is_empty());
        assert!(renderer.stop_at(Point::new(0.0, 0.0), 1e9).is_none());
    }

    #[test]
    fn test_debug_overlay_updates_in_place() {
        let mut renderer = Renderer::default();
        renderer.set_debug_overlay("requested", Region::new(0.0, 0.1, 0.0, 0.1));
        renderer.set_debug_overlay("requested", Region::new(0.0, 0.2, 0.0, 0.1));
        assert_eq!(renderer.debug_overlays().count(), 1);
        assert_eq!(renderer.debug_overlay("requested").unwrap().max_x, 0.2);
    }

    #[test]
    fn test_stop_at_accounts_for_translation() {
        let mut renderer = Renderer::new(100.0);
        renderer.draw_stop("A", &Stop::new(-1.0, 1.0, "Origin"));
        // Stop sits at layer pixel (100, 100); pan so it shows at (10, 20)
        renderer.set_translation(Point::new(-90.0, -80.0));

        assert_eq!(renderer.stop_at(Point::new(12.0, 21.0), 5.0).unwrap().id, "A");
        assert!(renderer.stop_at(Point::new(100.0, 100.0), 5.0).is_none());
    }

    #[test]
    fn test_draw_commands_order() {
        let mut renderer = Renderer::default();
        renderer.merge(&payload());
        renderer.set_debug_overlay("viewport", Region::default());
        renderer.show_downloading(Region::default());

        let commands = renderer.draw_commands();
        assert_eq!(commands.len(), 6);
        assert!(matches!(commands[0], DrawCommand::DebugOverlay { .. }));
        assert!(matches!(commands[1], DrawCommand::Segment { .. }));
        assert!(matches!(commands[3], DrawCommand::Stop { .. }));
        assert!(matches!(commands[5], DrawCommand::Downloading { .. }));
    }
}
