/// Error types for the icon pipeline
///
/// Every failure is terminal for the invocation. Variants carry the bucket,
/// key, dimension or path involved so a single log line is actionable.
use s3_utils::StorageError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for icon-service operations
pub type Result<T> = std::result::Result<T, IconError>;

/// Pipeline error taxonomy
#[derive(Error, Debug)]
pub enum IconError {
    /// Notification has no records or lacks bucket/key
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// Temp workspace or one of its files could not be created
    #[error("Workspace error at {}: {source}", path.display())]
    WorkspaceError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source object could not be fetched
    #[error("Failed to download s3://{bucket}/{key}: {source}")]
    DownloadError {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },

    /// Staged bytes are not a recognizable still image
    #[error("Failed to decode image {}: {source}", path.display())]
    DecodeError {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Resampling produced no usable raster for a size
    #[error("Failed to resize to {dimension}x{dimension}: {message}")]
    ResizeError { dimension: u32, message: String },

    /// Icon could not be encoded or written
    #[error("Failed to encode {dimension}x{dimension} icon to {}: {message}", path.display())]
    EncodeError {
        dimension: u32,
        path: PathBuf,
        message: String,
    },

    /// Archive could not be created, traversed or written
    #[error("Failed to archive {}: {message}", path.display())]
    ArchiveError { path: PathBuf, message: String },

    /// Archive could not be read back or transmitted
    #[error("Failed to upload to s3://{bucket}/{key}: {message}")]
    UploadError {
        bucket: String,
        key: String,
        message: String,
    },

    /// Blocking worker for a step died before reporting a result
    #[error("{step} worker failed on {}: {message}", path.display())]
    WorkerError {
        step: &'static str,
        path: PathBuf,
        message: String,
    },

    /// Invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IconError {
    /// Short stable label for the error kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            IconError::MalformedEvent(_) => "malformed_event",
            IconError::WorkspaceError { .. } => "workspace",
            IconError::DownloadError { .. } => "download",
            IconError::DecodeError { .. } => "decode",
            IconError::ResizeError { .. } => "resize",
            IconError::EncodeError { .. } => "encode",
            IconError::ArchiveError { .. } => "archive",
            IconError::UploadError { .. } => "upload",
            IconError::WorkerError { .. } => "worker",
            IconError::Config(_) => "config",
        }
    }

    pub(crate) fn workspace(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IconError::WorkspaceError {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn worker(
        step: &'static str,
        path: impl Into<PathBuf>,
        err: tokio::task::JoinError,
    ) -> Self {
        IconError::WorkerError {
            step,
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn archive(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        IconError::ArchiveError {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
