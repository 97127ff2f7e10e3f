//! Icon Service
//!
//! Event-driven worker that turns an uploaded image into a zip archive of
//! square icons and publishes it next to the source bucket.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

// Public re-exports
pub use config::{ArchiveCompression, Config, IconConfig};
pub use error::{IconError, Result};
pub use models::{IconSizeSet, IconVariant, ObjectLocation, PublishedLocation};
pub use services::IconPipeline;
