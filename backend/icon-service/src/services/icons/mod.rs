//! Icon generation pipeline
//!
//! This module turns one uploaded image into a zip of square icons:
//! - Event decoder for storage notifications
//! - Stager for per-invocation workspaces and the source download
//! - Processor for resizing and JPEG encoding
//! - Archiver for packing the icon directory
//! - Publisher for uploading the archive

pub mod archiver;
pub mod event;
pub mod pipeline;
pub mod processor;
pub mod publisher;
pub mod workspace;

pub use archiver::{ArchiveSummary, Archiver};
pub use event::decode_event;
pub use pipeline::{IconPipeline, InvocationContext};
pub use processor::{icon_file_name, IconProcessor, ICON_EXTENSION};
pub use publisher::{Publisher, ARCHIVE_CONTENT_TYPE};
pub use workspace::{Stager, Workspace, ICON_DIR_NAME, SOURCE_DIR_NAME};
