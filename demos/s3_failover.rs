//! Cross-region failover against AWS S3 (or any S3-compatible service).
//!
//! Run with:
//! ```sh
//! PRIMARY_BUCKET=my-east-bucket BACKUP_BUCKET=my-west-bucket \
//!   RUST_LOG=stowage_failover=debug \
//!   cargo run --example s3_failover --features="s3"
//! ```
//!
//! Set `S3_ENDPOINT` to talk to MinIO or another S3-compatible service.

use std::time::Duration;
use stowage_failover::{Downloader, Location, Locations, S3ClientFactory, UploadMetadata, Uploader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let primary_bucket = std::env::var("PRIMARY_BUCKET")?;
    let backup_bucket = std::env::var("BACKUP_BUCKET")?;
    let primary_region = std::env::var("PRIMARY_REGION").unwrap_or_else(|_| "us-east-1".into());
    let backup_region = std::env::var("BACKUP_REGION").unwrap_or_else(|_| "us-west-1".into());

    let mut factory = S3ClientFactory::from_env()
        .await
        .with_operation_timeout(Duration::from_secs(15));
    if let Ok(endpoint) = std::env::var("S3_ENDPOINT") {
        factory = factory.with_endpoint_url(endpoint);
    }

    let key = "stowage-failover/demo.txt";
    let locations = Locations::new(Location::new(primary_region, primary_bucket, key))
        .with_alternative(Location::new(backup_region, backup_bucket, key));

    let mut metadata = UploadMetadata::new();
    metadata.standard_infrequent_access();

    let stored_at = Uploader::new(factory.clone())
        .upload_private(&locations, &b"written with failover"[..], "text/plain", Some(metadata))
        .await?;
    println!("Stored at {stored_at}");

    let bytes = Downloader::new(factory).download(&locations).await?;
    println!("Read back {} bytes", bytes.len());

    Ok(())
}
