/// Shared S3 utilities for object-storage backed services
///
/// Provides the `ObjectStore` seam used by pipelines, plus the AWS S3
/// client, configuration, and operations that implement it.
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::sync::Arc;
use tokio::io::AsyncWrite;

pub mod config;
pub mod error;
pub mod operations;

pub use config::S3Config;
pub use error::{StorageError, StorageResult};
pub use operations::S3Operations;

/// Minimal object-storage interface: stream an object down, put one up.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stream the object at `bucket`/`key` into `sink`.
    ///
    /// Returns the number of bytes written. The sink is flushed before
    /// returning; the caller keeps ownership of the underlying handle.
    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> StorageResult<u64>;

    /// Upload `body` as a single object and return its location URL.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> StorageResult<String>;
}

/// Shared S3 client wrapper
#[derive(Clone)]
pub struct S3Client {
    client: Arc<Client>,
    config: S3Config,
}

impl S3Client {
    /// Create new S3 client with custom configuration
    pub async fn with_config(config: S3Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        // S3-compatible storage (MinIO, LocalStack)
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.path_style)
            .build();

        tracing::info!(
            region = %config.region,
            endpoint = ?config.endpoint,
            "S3 client initialized"
        );

        Self {
            client: Arc::new(Client::from_conf(s3_config)),
            config,
        }
    }

    /// Object operations bound to this client
    pub fn operations(&self) -> S3Operations {
        S3Operations::new(self.client.clone(), self.config.clone())
    }
}
