/// S3 object operations backing the `ObjectStore` trait
use crate::config::S3Config;
use crate::error::{StorageError, StorageResult};
use crate::ObjectStore;
use async_trait::async_trait;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

#[derive(Clone)]
pub struct S3Operations {
    client: Arc<Client>,
    config: S3Config,
}

impl S3Operations {
    pub fn new(client: Arc<Client>, config: S3Config) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl ObjectStore for S3Operations {
    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> StorageResult<u64> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify_sdk_error(e, bucket, key))?;

        let mut body = response.body;
        let mut written = 0u64;
        loop {
            let chunk = body.try_next().await.map_err(|e| StorageError::Transfer {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: e.to_string(),
            })?;
            let Some(chunk) = chunk else { break };

            sink.write_all(&chunk).await.map_err(|source| StorageError::Io {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source,
            })?;
            written += chunk.len() as u64;
        }

        sink.flush().await.map_err(|source| StorageError::Io {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source,
        })?;

        debug!(bucket, key, bytes = written, "S3 object downloaded");
        Ok(written)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        let length = body.len();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .content_length(length as i64)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| classify_sdk_error(e, bucket, key))?;

        debug!(bucket, key, bytes = length, "S3 object uploaded");
        Ok(self.config.object_url(bucket, key))
    }
}

/// Map an SDK failure onto the storage taxonomy.
///
/// Prefers the modeled error code; falls back to matching the rendered
/// error chain since HEAD-style and some PUT failures carry no code.
fn classify_sdk_error<E, R>(err: SdkError<E, R>, bucket: &str, key: &str) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_owned);
    let detail = DisplayErrorContext(&err).to_string();

    classify(code.as_deref(), detail, bucket, key)
}

fn classify(code: Option<&str>, detail: String, bucket: &str, key: &str) -> StorageError {
    let bucket = bucket.to_string();
    let key = key.to_string();

    match code {
        Some("NoSuchKey") | Some("NotFound") => StorageError::NotFound { bucket, key },
        Some("NoSuchBucket") => StorageError::NoSuchBucket { bucket, key },
        Some("AccessDenied") | Some("Forbidden") | Some("InvalidAccessKeyId")
        | Some("SignatureDoesNotMatch") => StorageError::AccessDenied { bucket, key },
        _ if detail.contains("NoSuchBucket") => StorageError::NoSuchBucket { bucket, key },
        _ if detail.contains("NoSuchKey") || detail.contains("404") => {
            StorageError::NotFound { bucket, key }
        }
        _ if detail.contains("403") || detail.contains("Forbidden") => {
            StorageError::AccessDenied { bucket, key }
        }
        _ => StorageError::Transfer {
            bucket,
            key,
            message: detail,
        },
    }
}
