pub mod context;
pub mod svg;

// Re-export main types
pub use context::{DownloadHandle, DrawCommand, DrawOutcome, MergeSummary, Renderer};
pub use svg::render_svg;
