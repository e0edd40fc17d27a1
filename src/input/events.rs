use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Input events that can be handled by the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Keyboard input, acted on at key-up
    KeyPress { key: MapKey },
    /// One of the on-screen control buttons
    Control(ControlButton),
    /// Mouse button pressed on the drawing surface
    DragStart { position: Point },
    /// Mouse moved; pans while a drag is active and updates the hover label
    MouseMove { position: Point },
    /// Mouse button released
    DragEnd,
    /// Drawing surface resized
    Resize { size: Point },
    /// Stop the run loop
    Shutdown,
}

/// Keys bound on the map page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapKey {
    /// `q`
    ZoomIn,
    /// `e`
    ZoomOut,
    /// `w`
    Up,
    /// `s`
    Down,
    /// `a`
    Left,
    /// `d`
    Right,
}

impl MapKey {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'q' => Some(Self::ZoomIn),
            'e' => Some(Self::ZoomOut),
            'w' => Some(Self::Up),
            's' => Some(Self::Down),
            'a' => Some(Self::Left),
            'd' => Some(Self::Right),
            _ => None,
        }
    }
}

/// On-screen control buttons: `+`, `-`, `N`, `S`, `W`, `E`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlButton {
    ZoomIn,
    ZoomOut,
    North,
    South,
    West,
    East,
}

impl ControlButton {
    pub const ALL: [ControlButton; 6] = [
        Self::ZoomIn,
        Self::ZoomOut,
        Self::North,
        Self::South,
        Self::West,
        Self::East,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::ZoomIn => "+",
            Self::ZoomOut => "-",
            Self::North => "N",
            Self::South => "S",
            Self::West => "W",
            Self::East => "E",
        }
    }

    /// The key with the same effect
    pub fn as_key(&self) -> MapKey {
        match self {
            Self::ZoomIn => MapKey::ZoomIn,
            Self::ZoomOut => MapKey::ZoomOut,
            Self::North => MapKey::Up,
            Self::South => MapKey::Down,
            Self::West => MapKey::Left,
            Self::East => MapKey::Right,
        }
    }
}
