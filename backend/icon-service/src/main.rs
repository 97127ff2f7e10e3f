/// Icon Service - storage notification handler
///
/// Runs under the Lambda runtime; each S3 notification is one invocation.
///
/// Environment variables:
/// - AWS_REGION: storage region (default: "us-east-1")
/// - S3_ENDPOINT: optional S3-compatible endpoint
/// - S3_FORCE_PATH_STYLE: use path-style addressing (default: false)
/// - ICON_JPEG_QUALITY: JPEG quality 1-100 (default: 95)
/// - ICON_ARCHIVE_COMPRESSION: "deflate" or "stored" (default: "deflate")
/// - ICON_WORKSPACE_ROOT: parent of per-invocation workspaces (default: system temp dir)
use aws_lambda_events::event::s3::S3Event;
use icon_service::{Config, IconPipeline, PublishedLocation};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use s3_utils::S3Client;
use std::sync::Arc;
use tracing::{info, Instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();

    // JSON lines; the runtime's log sink adds timestamps
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .without_time()
        .init();

    let config = Config::from_env()?;
    info!(
        region = %config.s3.region,
        compression = ?config.icons.compression,
        jpeg_quality = config.icons.jpeg_quality,
        "Configuration loaded"
    );

    let s3 = S3Client::with_config(config.s3.clone()).await;
    let pipeline = IconPipeline::new(Arc::new(s3.operations()), config.icons);

    run(service_fn(|event: LambdaEvent<S3Event>| handle(&pipeline, event))).await
}

async fn handle(
    pipeline: &IconPipeline,
    event: LambdaEvent<S3Event>,
) -> Result<PublishedLocation, Error> {
    let span = tracing::info_span!("invocation", request_id = %event.context.request_id);
    let location = pipeline.handle(&event.payload).instrument(span).await?;
    Ok(location)
}
