//! Shared fixtures for icon-service integration tests

use async_trait::async_trait;
use bytes::Bytes;
use image::{ImageFormat, Rgb, RgbImage};
use s3_utils::{ObjectStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// One recorded call against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Get { bucket: String, key: String },
    Put { bucket: String, key: String },
}

/// In-memory object store that records every call
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), Bytes>>,
    content_types: Mutex<HashMap<(String, String), String>>,
    buckets: Mutex<Vec<String>>,
    calls: Mutex<Vec<StoreCall>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bucket so puts into it succeed
    pub fn with_bucket(self, bucket: &str) -> Self {
        self.buckets.lock().unwrap().push(bucket.to_string());
        self
    }

    pub fn with_object(self, bucket: &str, key: &str, body: impl Into<Bytes>) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body.into());
        self
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.content_types
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn puts(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, StoreCall::Put { .. }))
            .count()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get_object(
        &self,
        bucket: &str,
        key: &str,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> StorageResult<u64> {
        self.calls.lock().unwrap().push(StoreCall::Get {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        let body = self
            .object(bucket, key)
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })?;

        let io_err = |source| StorageError::Io {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source,
        };
        sink.write_all(&body).await.map_err(io_err)?;
        sink.flush().await.map_err(io_err)?;
        Ok(body.len() as u64)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        self.calls.lock().unwrap().push(StoreCall::Put {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        if !self.buckets.lock().unwrap().iter().any(|b| b == bucket) {
            return Err(StorageError::NoSuchBucket {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }

        let id = (bucket.to_string(), key.to_string());
        self.content_types
            .lock()
            .unwrap()
            .insert(id.clone(), content_type.to_string());
        self.objects.lock().unwrap().insert(id, body);
        Ok(format!("memory://{bucket}/{key}"))
    }
}

/// PNG bytes of a `width x height` gradient
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Storage notification JSON with one record per `(bucket, key)`
pub fn s3_event(records: &[(&str, &str)]) -> aws_lambda_events::event::s3::S3Event {
    let records: Vec<serde_json::Value> = records
        .iter()
        .map(|(bucket, key)| {
            serde_json::json!({
                "eventVersion": "2.1",
                "eventSource": "aws:s3",
                "awsRegion": "us-east-1",
                "eventTime": "2024-01-01T00:00:00.000Z",
                "eventName": "ObjectCreated:Put",
                "userIdentity": { "principalId": "EXAMPLE" },
                "requestParameters": { "sourceIPAddress": "127.0.0.1" },
                "responseElements": {
                    "x-amz-request-id": "EXAMPLE123456789",
                    "x-amz-id-2": "EXAMPLE123/5678abcdefghijklambdaisawesome/mnopqrstuvwxyzABCDEFGH"
                },
                "s3": {
                    "s3SchemaVersion": "1.0",
                    "configurationId": "gen-icons",
                    "bucket": {
                        "name": bucket,
                        "ownerIdentity": { "principalId": "EXAMPLE" },
                        "arn": format!("arn:aws:s3:::{bucket}")
                    },
                    "object": {
                        "key": key,
                        "size": 1024,
                        "eTag": "0123456789abcdef0123456789abcdef",
                        "sequencer": "0A1B2C3D4E5F678901"
                    }
                }
            })
        })
        .collect();

    serde_json::from_value(serde_json::json!({ "Records": records })).expect("valid S3 event")
}
