//! Publisher - uploads the finished archive in a single put

use crate::error::{IconError, Result};
use crate::models::{ObjectLocation, PublishedLocation};
use bytes::Bytes;
use s3_utils::ObjectStore;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{info, instrument};

pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

#[derive(Clone)]
pub struct Publisher {
    store: Arc<dyn ObjectStore>,
}

impl Publisher {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Upload the archive at `archive_path` to `destination`.
    ///
    /// Nothing becomes visible at the destination unless the whole body
    /// was read and the put succeeded.
    #[instrument(skip(self), fields(bucket = %destination.bucket, key = %destination.key))]
    pub async fn publish(
        &self,
        archive_path: &Path,
        destination: &ObjectLocation,
    ) -> Result<PublishedLocation> {
        let upload_err = |message: String| IconError::UploadError {
            bucket: destination.bucket.clone(),
            key: destination.key.clone(),
            message,
        };

        let body = {
            let mut file = File::open(archive_path).await.map_err(|e| {
                upload_err(format!("cannot open {}: {e}", archive_path.display()))
            })?;
            let expected = file
                .metadata()
                .await
                .map_err(|e| upload_err(format!("cannot stat {}: {e}", archive_path.display())))?
                .len();

            let mut buffer = Vec::with_capacity(expected as usize);
            file.read_to_end(&mut buffer).await.map_err(|e| {
                upload_err(format!("cannot read {}: {e}", archive_path.display()))
            })?;

            if buffer.len() as u64 != expected {
                return Err(upload_err(format!(
                    "archive changed while reading: expected {expected} bytes, read {}",
                    buffer.len()
                )));
            }
            Bytes::from(buffer)
        };

        let size = body.len();
        let url = self
            .store
            .put_object(
                &destination.bucket,
                &destination.key,
                body,
                ARCHIVE_CONTENT_TYPE,
            )
            .await
            .map_err(|e| upload_err(e.to_string()))?;

        info!(bytes = size, url = %url, "Archive published");

        Ok(PublishedLocation {
            bucket: destination.bucket.clone(),
            key: destination.key.clone(),
            url,
        })
    }
}
