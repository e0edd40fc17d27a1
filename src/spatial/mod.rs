pub mod index;

pub use index::{IndexedStop, StopIndex};
