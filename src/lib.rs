//! High-availability access to S3-style object storage.
//!
//! An object is described by an ordered set of candidate [`Locations`], each a
//! region, bucket and key. [`Downloader`] and [`Uploader`] try the candidates
//! one at a time, preferred first, and stop at the first that works. Nothing
//! is retried within a location and no two locations are tried concurrently.
//!
//! ```
//! # #[cfg(feature = "memory")]
//! # async fn example() -> stowage_failover::Result<()> {
//! use stowage_failover::{Downloader, Location, Locations, MemoryClientFactory, Uploader};
//!
//! let backend = MemoryClientFactory::new()
//!     .with_bucket("us-east-1", "assets-east")
//!     .with_bucket("us-west-1", "assets-west");
//!
//! let locations = Locations::new(Location::new("us-east-1", "assets-east", "logo.png"))
//!     .with_alternative(Location::new("us-west-1", "assets-west", "logo.png"));
//!
//! let uploader = Uploader::new(backend.clone());
//! let stored_at = uploader
//!     .upload(&locations, &b"png bytes"[..], "image/png", None)
//!     .await?;
//! assert_eq!(stored_at.region(), "us-east-1");
//!
//! let downloader = Downloader::new(backend);
//! let bytes = downloader.download(&locations).await?;
//! assert_eq!(&bytes[..], b"png bytes");
//! # Ok(())
//! # }
//! ```

pub use client::{ClientFactory, ObjectClient};
pub use failover::{DEFAULT_PUBLIC_CACHING_TTL, Downloader, Operation, Uploader};
pub use location::{Location, LocationProvider, Locations};
pub use metadata::{PutObjectRequest, StorageTier, UploadMetadata, Visibility};
pub use observer::{DownloadErrorObserver, UploadErrorObserver};

#[cfg(feature = "memory")]
pub use adapters::memory::{MemoryClientFactory, MemoryObjectClient};

#[cfg(feature = "s3")]
pub use adapters::s3::{S3ClientFactory, S3ObjectClient};

mod client;
mod failover;
mod location;
mod metadata;
pub mod observer;

/// A type-erased error, as returned by error observers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A specialized Result type for failover operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result of a single-location call against a storage client.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Failure of one attempt against one location.
///
/// The orchestrators never return these directly; they are handed to the
/// error observer and the first one is kept as the source of
/// [`Error::Exhausted`].
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Bucket not found: {0}")]
    NoSuchBucket(String),

    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Invalid credentials: {0}")]
    Credentials(String),

    #[error("Storage service error")]
    Service(#[source] BoxError),

    #[error("IO Error")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Wrap any client-side error as [`ProviderError::Service`].
    pub fn service<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ProviderError::Service(Box::new(e))
    }
}

/// The only error returned by [`Downloader`] and [`Uploader`].
///
/// The underlying cause is reachable through [`std::error::Error::source`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Every location was tried and failed. Carries the failure of the
    /// preferred location, not the last one.
    #[error("Failed to {operation}. Attempted {attempted} locations.")]
    Exhausted {
        operation: Operation,
        attempted: usize,
        #[source]
        first_failure: ProviderError,
    },

    /// The error observer itself failed; remaining locations were skipped.
    #[error("Failed to {operation}. Exception thrown handling error.")]
    ObserverFailed {
        operation: Operation,
        attempted: usize,
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// The operation that failed.
    pub fn operation(&self) -> Operation {
        match self {
            Error::Exhausted { operation, .. } | Error::ObserverFailed { operation, .. } => {
                *operation
            }
        }
    }

    /// Number of locations attempted before giving up.
    pub fn attempted_count(&self) -> usize {
        match self {
            Error::Exhausted { attempted, .. } | Error::ObserverFailed { attempted, .. } => {
                *attempted
            }
        }
    }

    /// The preferred location's failure, when all locations were exhausted.
    pub fn first_failure(&self) -> Option<&ProviderError> {
        match self {
            Error::Exhausted { first_failure, .. } => Some(first_failure),
            Error::ObserverFailed { .. } => None,
        }
    }

    /// The observer's own error, when the observer aborted the operation.
    pub fn observer_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::ObserverFailed { source, .. } => Some(source.as_ref()),
            Error::Exhausted { .. } => None,
        }
    }
}

/// Storage client backends, gated behind Cargo features.
pub mod adapters {
    #[cfg(feature = "memory")]
    pub mod memory;
    #[cfg(feature = "s3")]
    pub mod s3;
}
