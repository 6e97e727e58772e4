pub mod filters;
pub mod formats;

// Re-export for convenience
pub use formats::{OutputFormat, RenderError, citation_key, render};
