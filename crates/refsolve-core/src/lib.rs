pub mod catalog;
pub mod config_file;
pub mod error;
pub mod fragment;
pub mod ident;
pub mod record;
pub mod resolver;
pub mod xml;

// Re-export for convenience
pub use error::ResolveError;
pub use fragment::{FragmentRendering, convert};
pub use ident::{ReferenceKind, classify};
pub use record::{Author, NormalizedRecord};
pub use resolver::{DEFAULT_TIMEOUT_SECS, Resolver, ResolverOptions};
