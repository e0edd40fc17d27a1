use crate::{
    core::{config::DisplayOptions, geo::Point},
    input::events::{InputEvent, MapKey},
    tracker::Tracker,
    Result,
};

/// What an event did to the map
#[derive(Debug, Clone, PartialEq)]
pub enum EventHandled {
    Panned,
    Zoomed,
    /// A stop is under the cursor; carries its `"id: name"` label
    Hover(String),
    Resized,
    Shutdown,
    Ignored,
}

/// Turns keyboard, button and mouse input into tracker pan and zoom calls
#[derive(Debug, Clone)]
pub struct InputHandler {
    pan_step_px: f64,
    zoom_step: f64,
    hover_radius_px: f64,
    drag_from: Option<Point>,
    hover_label: Option<String>,
}

impl InputHandler {
    pub fn new(display: &DisplayOptions) -> Self {
        Self {
            pan_step_px: display.pan_step_px,
            zoom_step: display.zoom_step,
            hover_radius_px: display.stop_radius_px,
            drag_from: None,
            hover_label: None,
        }
    }

    pub fn handle(&mut self, event: &InputEvent, tracker: &mut Tracker) -> Result<EventHandled> {
        match event {
            InputEvent::KeyPress { key } => self.handle_key(*key, tracker),
            InputEvent::Control(button) => self.handle_key(button.as_key(), tracker),
            InputEvent::DragStart { position } => {
                self.drag_from = Some(*position);
                Ok(EventHandled::Ignored)
            }
            InputEvent::DragEnd => {
                self.drag_from = None;
                Ok(EventHandled::Ignored)
            }
            InputEvent::MouseMove { position } => Ok(self.handle_mouse_move(*position, tracker)),
            InputEvent::Resize { size } => {
                tracker.resize(*size);
                Ok(EventHandled::Resized)
            }
            InputEvent::Shutdown => Ok(EventHandled::Shutdown),
        }
    }

    fn handle_key(&mut self, key: MapKey, tracker: &mut Tracker) -> Result<EventHandled> {
        let step = self.pan_step_px;
        match key {
            MapKey::ZoomIn => {
                tracker.zoom_by(self.zoom_step)?;
                return Ok(EventHandled::Zoomed);
            }
            MapKey::ZoomOut => {
                tracker.zoom_by(1.0 / self.zoom_step)?;
                return Ok(EventHandled::Zoomed);
            }
            MapKey::Up => tracker.pan_by_pixels(Point::new(0.0, -step)),
            MapKey::Down => tracker.pan_by_pixels(Point::new(0.0, step)),
            MapKey::Left => tracker.pan_by_pixels(Point::new(-step, 0.0)),
            MapKey::Right => tracker.pan_by_pixels(Point::new(step, 0.0)),
        }
        Ok(EventHandled::Panned)
    }

    fn handle_mouse_move(&mut self, position: Point, tracker: &mut Tracker) -> EventHandled {
        if let Some(from) = self.drag_from {
            // Dragging the map right moves the view left
            let moved = position.subtract(&from);
            self.drag_from = Some(position);
            tracker.pan_by_pixels(Point::new(-moved.x, -moved.y));
            return EventHandled::Panned;
        }

        match tracker.renderer().stop_at(position, self.hover_radius_px) {
            Some(stop) => {
                let label = format!("{}: {}", stop.id, stop.name);
                self.hover_label = Some(label.clone());
                EventHandled::Hover(label)
            }
            None => EventHandled::Ignored,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    /// The last stop label shown; it stays until another stop is hovered
    pub fn hover_label(&self) -> Option<&str> {
        self.hover_label.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MapOptions;
    use crate::core::geo::ScreenPoint;
    use crate::data::formats::{Payload, Stop};
    use crate::fetch::source::{DataSource, FetchRequest};
    use crate::input::events::ControlButton;
    use crate::runtime::InlineSpawner;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct OneStop;

    #[async_trait]
    impl DataSource for OneStop {
        async fn fetch(&self, _request: &FetchRequest) -> Result<Payload> {
            let mut payload = Payload::default();
            // Screen position (0.01, 0.01): 50 px from the origin at zoom 5000
            payload
                .stops
                .insert("1500IM77".to_string(), Stop::new(-0.01, 0.01, "Pier Hill"));
            Ok(payload)
        }
    }

    fn setup() -> (InputHandler, Tracker) {
        let options = MapOptions::default();
        let tracker = Tracker::new(
            Arc::new(OneStop),
            Box::new(InlineSpawner),
            &options,
            ScreenPoint::new(0.0, 0.0),
        ).unwrap();
        (InputHandler::new(&options.display), tracker)
    }

    #[test]
    fn test_keys_pan_by_step() {
        let (mut handler, mut tracker) = setup();
        let event = InputEvent::KeyPress { key: MapKey::Up };
        assert_eq!(handler.handle(&event, &mut tracker).unwrap(), EventHandled::Panned);
        assert!((tracker.viewport().pan.y + 100.0 / 5000.0).abs() < 1e-12);

        let event = InputEvent::Control(ControlButton::East);
        handler.handle(&event, &mut tracker).unwrap();
        assert!((tracker.viewport().pan.x - 100.0 / 5000.0).abs() < 1e-12);
    }

    #[test]
    fn test_zoom_keys() {
        let (mut handler, mut tracker) = setup();
        let zoom_in = InputEvent::KeyPress {
            key: MapKey::ZoomIn,
        };
        assert_eq!(handler.handle(&zoom_in, &mut tracker).unwrap(), EventHandled::Zoomed);
        assert_eq!(tracker.zoom(), 7500.0);

        handler
            .handle(&InputEvent::Control(ControlButton::ZoomOut), &mut tracker)
            .unwrap();
        assert!((tracker.zoom() - 5000.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_pans_opposite_to_motion() {
        let (mut handler, mut tracker) = setup();
        handler
            .handle(
                &InputEvent::DragStart {
                    position: Point::new(100.0, 100.0),
                },
                &mut tracker,
            )
            .unwrap();
        assert!(handler.is_dragging());

        let moved = handler
            .handle(
                &InputEvent::MouseMove {
                    position: Point::new(150.0, 80.0),
                },
                &mut tracker,
            )
            .unwrap();
        assert_eq!(moved, EventHandled::Panned);
        let pan = tracker.viewport().pan;
        assert!((pan.x + 50.0 / 5000.0).abs() < 1e-12);
        assert!((pan.y - 20.0 / 5000.0).abs() < 1e-12);

        handler.handle(&InputEvent::DragEnd, &mut tracker).unwrap();
        assert!(!handler.is_dragging());
    }

    #[test]
    fn test_hover_shows_stop_label() {
        let (mut handler, mut tracker) = setup();
        tracker.fetch_tick();
        tracker.poll_completions();

        let over = handler
            .handle(
                &InputEvent::MouseMove {
                    position: Point::new(51.0, 49.0),
                },
                &mut tracker,
            )
            .unwrap();
        assert_eq!(over, EventHandled::Hover("1500IM77: Pier Hill".to_string()));

        let away = handler
            .handle(
                &InputEvent::MouseMove {
                    position: Point::new(400.0, 400.0),
                },
                &mut tracker,
            )
            .unwrap();
        assert_eq!(away, EventHandled::Ignored);
        assert_eq!(handler.hover_label(), Some("1500IM77: Pier Hill"));
    }

    #[test]
    fn test_resize_changes_viewport() {
        let (mut handler, mut tracker) = setup();
        handler
            .handle(
                &InputEvent::Resize {
                    size: Point::new(500.0, 250.0),
                },
                &mut tracker,
            )
            .unwrap();
        let viewport = tracker.current_viewport();
        assert!((viewport.width() - 0.1).abs() < 1e-12);
        assert!((viewport.height() - 0.05).abs() < 1e-12);
    }
}
