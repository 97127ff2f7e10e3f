//! Icon pipeline - one sequential unit of work per storage notification
//!
//! decode event -> stage source -> generate icons -> archive -> publish
//!
//! Every value the steps share lives in an [`InvocationContext`] owned by a
//! single call; nothing is kept on the pipeline between invocations.

use super::archiver::Archiver;
use super::event::decode_event;
use super::processor::IconProcessor;
use super::publisher::Publisher;
use super::workspace::{Stager, Workspace};
use crate::config::IconConfig;
use crate::error::Result;
use crate::models::{IconSizeSet, ObjectLocation, PublishedLocation};
use aws_lambda_events::event::s3::S3Event;
use s3_utils::ObjectStore;
use std::sync::Arc;
use tracing::{error, info};

/// State owned by one invocation
#[derive(Debug)]
pub struct InvocationContext {
    pub source: ObjectLocation,
    pub destination: ObjectLocation,
    pub workspace: Workspace,
}

/// Icon pipeline
pub struct IconPipeline {
    stager: Stager,
    processor: Arc<IconProcessor>,
    archiver: Archiver,
    publisher: Publisher,
}

impl IconPipeline {
    /// Create a pipeline with the compiled-in icon size set
    pub fn new(store: Arc<dyn ObjectStore>, config: IconConfig) -> Self {
        Self::with_sizes(store, config, IconSizeSet::standard())
    }

    pub fn with_sizes(
        store: Arc<dyn ObjectStore>,
        config: IconConfig,
        sizes: IconSizeSet,
    ) -> Self {
        Self {
            stager: Stager::new(store.clone(), config.workspace_root),
            processor: Arc::new(IconProcessor::new(sizes, config.jpeg_quality)),
            archiver: Archiver::new(config.compression),
            publisher: Publisher::new(store),
        }
    }

    /// Handle one storage notification end to end
    pub async fn handle(&self, event: &S3Event) -> Result<PublishedLocation> {
        let source = decode_event(event).inspect_err(|e| {
            error!(error = %e, kind = e.kind(), "Rejected storage notification");
        })?;

        self.process(source).await
    }

    /// Run every step for an already decoded source object
    pub async fn process(&self, source: ObjectLocation) -> Result<PublishedLocation> {
        info!(bucket = %source.bucket, key = %source.key, "Generating icons");

        let result = self.run_steps(&source).await;
        match &result {
            Ok(location) => info!(
                source = %source,
                bucket = %location.bucket,
                key = %location.key,
                url = %location.url,
                "Icon archive delivered"
            ),
            Err(e) => error!(
                source = %source,
                kind = e.kind(),
                error = %e,
                "Icon generation failed"
            ),
        }
        result
    }

    async fn run_steps(&self, source: &ObjectLocation) -> Result<PublishedLocation> {
        let workspace = self.stager.stage(source).await?;
        let ctx = InvocationContext {
            source: source.clone(),
            destination: source.destination(),
            workspace,
        };

        let variants = self
            .processor
            .clone()
            .generate_async(
                ctx.workspace.source_path().to_path_buf(),
                ctx.workspace.icon_dir().to_path_buf(),
            )
            .await?;

        let summary = self
            .archiver
            .archive_async(
                ctx.workspace.icon_dir().to_path_buf(),
                ctx.workspace.archive_path().to_path_buf(),
            )
            .await?;
        info!(
            icons = variants.len(),
            entries = summary.entries.len(),
            bytes = summary.bytes,
            "Icons packaged"
        );

        self.publisher
            .publish(ctx.workspace.archive_path(), &ctx.destination)
            .await
        // ctx drops here and removes the workspace
    }
}
