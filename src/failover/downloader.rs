use super::{Operation, try_locations};
use crate::{ClientFactory, DownloadErrorObserver, Locations, ObjectClient, Result};
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// Downloads an object from the first of its candidate locations that answers.
///
/// ```
/// # #[cfg(feature = "memory")]
/// # async fn example() -> stowage_failover::Result<()> {
/// use stowage_failover::{Downloader, Location, Locations, MemoryClientFactory};
///
/// let backend = MemoryClientFactory::new().with_bucket("us-west-1", "backup");
/// backend.insert("us-west-1", "backup", "report.csv", "a,b\n1,2\n");
///
/// // The preferred region is unknown to the backend, so the download falls
/// // back to us-west-1.
/// let locations = Locations::new(Location::new("us-east-1", "primary", "report.csv"))
///     .with_alternative(Location::new("us-west-1", "backup", "report.csv"));
///
/// let bytes = Downloader::new(backend).download(&locations).await?;
/// assert_eq!(&bytes[..], b"a,b\n1,2\n");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader<F: ClientFactory> {
    factory: F,
    error_observer: Option<Arc<dyn DownloadErrorObserver>>,
}

impl<F: ClientFactory> Downloader<F> {
    /// Create a downloader with no error observer.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            error_observer: None,
        }
    }

    /// Register an observer notified of every per-location failure.
    pub fn with_error_observer(mut self, observer: impl DownloadErrorObserver + 'static) -> Self {
        self.error_observer = Some(Arc::new(observer));
        self
    }

    /// Replace or clear the error observer.
    pub fn set_error_observer(
        &mut self,
        observer: Option<Arc<dyn DownloadErrorObserver>>,
    ) -> &mut Self {
        self.error_observer = observer;
        self
    }

    pub fn error_observer(&self) -> Option<&Arc<dyn DownloadErrorObserver>> {
        self.error_observer.as_ref()
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Fetch the object, trying each location in order.
    ///
    /// Returns the payload from the first location that succeeds. If every
    /// location fails the error carries the preferred location's failure.
    pub async fn download(&self, locations: &Locations) -> Result<Bytes> {
        let (_, bytes) = try_locations(
            Operation::Download,
            locations,
            |location| async move {
                let client = self.factory.client(location.region()).await?;
                client.get_object(location.bucket(), location.key()).await
            },
            |location, error| match &self.error_observer {
                Some(observer) => observer.on_download_error(location, error),
                None => Ok(()),
            },
        )
        .await?;

        Ok(bytes)
    }
}

impl<F: ClientFactory> fmt::Debug for Downloader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("factory", &self.factory)
            .field("error_observer", &self.error_observer.is_some())
            .finish()
    }
}
