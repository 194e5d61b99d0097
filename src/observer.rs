//! Hooks notified about each failed location before the next one is tried.
//!
//! Observers run synchronously, in line with the failover loop. Returning an
//! error aborts the whole operation with [`Error::ObserverFailed`](crate::Error::ObserverFailed);
//! the remaining locations are not attempted.
//!
//! Any closure of the right shape is an observer:
//!
//! ```
//! use stowage_failover::{BoxError, Downloader, Location, MemoryClientFactory, ProviderError};
//!
//! let downloader = Downloader::new(MemoryClientFactory::new()).with_error_observer(
//!     |location: &Location, error: &ProviderError| -> Result<(), BoxError> {
//!         eprintln!("{location} failed: {error}");
//!         Ok(())
//!     },
//! );
//! assert!(downloader.error_observer().is_some());
//! ```

use crate::{BoxError, Location, ProviderError};

/// Notified when fetching from one location fails.
pub trait DownloadErrorObserver: Send + Sync {
    fn on_download_error(&self, location: &Location, error: &ProviderError)
    -> Result<(), BoxError>;
}

/// Notified when writing to one location fails.
pub trait UploadErrorObserver: Send + Sync {
    fn on_upload_error(&self, location: &Location, error: &ProviderError) -> Result<(), BoxError>;
}

impl<F> DownloadErrorObserver for F
where
    F: Fn(&Location, &ProviderError) -> Result<(), BoxError> + Send + Sync,
{
    fn on_download_error(
        &self,
        location: &Location,
        error: &ProviderError,
    ) -> Result<(), BoxError> {
        self(location, error)
    }
}

impl<F> UploadErrorObserver for F
where
    F: Fn(&Location, &ProviderError) -> Result<(), BoxError> + Send + Sync,
{
    fn on_upload_error(&self, location: &Location, error: &ProviderError) -> Result<(), BoxError> {
        self(location, error)
    }
}
