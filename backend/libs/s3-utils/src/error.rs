//! Error types for object storage operations.

use thiserror::Error;

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by an [`ObjectStore`](crate::ObjectStore).
///
/// Every variant names the bucket and key involved so callers can log
/// the failure without carrying extra context around.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Object does not exist
    #[error("object not found: s3://{bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Bucket does not exist
    #[error("bucket not found: {bucket} (key {key})")]
    NoSuchBucket { bucket: String, key: String },

    /// Credentials rejected or policy denies the operation
    #[error("access denied to s3://{bucket}/{key}")]
    AccessDenied { bucket: String, key: String },

    /// Network, protocol or service fault during the transfer
    #[error("transfer of s3://{bucket}/{key} failed: {message}")]
    Transfer {
        bucket: String,
        key: String,
        message: String,
    },

    /// Local sink rejected the streamed bytes
    #[error("local I/O failed for s3://{bucket}/{key}: {source}")]
    Io {
        bucket: String,
        key: String,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// True when the error means the object or bucket is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::NotFound { .. } | StorageError::NoSuchBucket { .. }
        )
    }
}
