pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{ControlButton, InputEvent, MapKey};
pub use handler::{EventHandled, InputHandler};
