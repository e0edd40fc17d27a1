pub mod loader;
pub mod source;

// Re-exports for convenience
pub use loader::HttpDataSource;
pub use source::{DataSource, FetchRequest};
