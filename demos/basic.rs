//! Failover between two regions using [`MemoryClientFactory`].
//!
//! Run with:
//! ```sh
//! RUST_LOG=stowage_failover=debug cargo run --example basic --features="memory"
//! ```

use stowage_failover::{
    BoxError, Downloader, Location, Locations, MemoryClientFactory, ProviderError, Uploader,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let backend = MemoryClientFactory::new()
        .with_bucket("us-east-1", "assets-east")
        .with_bucket("us-west-1", "assets-west");

    let locations = Locations::new(Location::new("us-east-1", "assets-east", "hello.txt"))
        .with_alternative(Location::new("us-west-1", "assets-west", "hello.txt"));

    let report = |location: &Location, error: &ProviderError| -> Result<(), BoxError> {
        println!("  {location} failed: {error}");
        Ok(())
    };

    let uploader = Uploader::new(backend.clone()).with_error_observer(report);
    let downloader = Downloader::new(backend.clone()).with_error_observer(report);

    // Write while us-east-1 is healthy
    let stored_at = uploader
        .upload_private(&locations, &b"Hello, World!"[..], "text/plain", None)
        .await?;
    println!("Stored at {stored_at}");

    // Simulate an outage in the preferred region
    backend.take_offline("us-east-1");

    println!("Uploading during outage:");
    let stored_at = uploader
        .upload_publicly_cached(&locations, &b"Hello again!"[..], "text/plain", None)
        .await?;
    println!("Stored at {stored_at}");

    println!("Downloading during outage:");
    let bytes = downloader.download(&locations).await?;
    println!("Read {:?}", String::from_utf8_lossy(&bytes));

    // Nothing left to fall back to
    backend.take_offline("us-west-1");
    if let Err(e) = downloader.download(&locations).await {
        println!("{e}");
        if let Some(cause) = std::error::Error::source(&e) {
            println!("  caused by: {cause}");
        }
    }

    Ok(())
}
