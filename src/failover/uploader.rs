use super::{Operation, try_locations};
use crate::{
    ClientFactory, Location, Locations, ObjectClient, PutObjectRequest, Result,
    UploadErrorObserver, UploadMetadata,
};
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;

/// Default `max-age` for [`Uploader::upload_publicly_cached`]: one year.
pub const DEFAULT_PUBLIC_CACHING_TTL: u64 = 31_536_000;

/// Uploads an object to the first of its candidate locations that accepts it.
///
/// The location that took the write is returned so callers can record where
/// the object actually landed.
#[derive(Clone)]
pub struct Uploader<F: ClientFactory> {
    factory: F,
    public_caching_ttl: u64,
    error_observer: Option<Arc<dyn UploadErrorObserver>>,
}

impl<F: ClientFactory> Uploader<F> {
    /// Create an uploader with the default public caching TTL and no observer.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            public_caching_ttl: DEFAULT_PUBLIC_CACHING_TTL,
            error_observer: None,
        }
    }

    /// Register an observer notified of every per-location failure.
    pub fn with_error_observer(mut self, observer: impl UploadErrorObserver + 'static) -> Self {
        self.error_observer = Some(Arc::new(observer));
        self
    }

    /// Replace or clear the error observer.
    pub fn set_error_observer(
        &mut self,
        observer: Option<Arc<dyn UploadErrorObserver>>,
    ) -> &mut Self {
        self.error_observer = observer;
        self
    }

    pub fn error_observer(&self) -> Option<&Arc<dyn UploadErrorObserver>> {
        self.error_observer.as_ref()
    }

    /// Set the `max-age` used by [`upload_publicly_cached`](Self::upload_publicly_cached).
    pub fn with_public_caching_ttl(mut self, seconds: u64) -> Self {
        self.public_caching_ttl = seconds;
        self
    }

    pub fn set_public_caching_ttl(&mut self, seconds: u64) -> &mut Self {
        self.public_caching_ttl = seconds;
        self
    }

    pub fn public_caching_ttl(&self) -> u64 {
        self.public_caching_ttl
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Store `contents`, trying each location in order.
    ///
    /// Objects are private unless `metadata` says otherwise. The storage tier
    /// and `Cache-Control` header are only sent when `metadata` sets them.
    pub async fn upload<'a>(
        &self,
        locations: &'a Locations,
        contents: impl Into<Bytes>,
        content_type: &str,
        metadata: Option<&UploadMetadata>,
    ) -> Result<&'a Location> {
        let request = PutObjectRequest::new(contents, content_type, metadata);
        let request = &request;

        let (location, ()) = try_locations(
            Operation::Upload,
            locations,
            |location| async move {
                let client = self.factory.client(location.region()).await?;
                client
                    .put_object(location.bucket(), location.key(), request)
                    .await
            },
            |location, error| match &self.error_observer {
                Some(observer) => observer.on_upload_error(location, error),
                None => Ok(()),
            },
        )
        .await?;

        Ok(location)
    }

    /// Upload as a private object, keeping any other options in `metadata`.
    pub async fn upload_private<'a>(
        &self,
        locations: &'a Locations,
        contents: impl Into<Bytes>,
        content_type: &str,
        metadata: Option<UploadMetadata>,
    ) -> Result<&'a Location> {
        let mut metadata = metadata.unwrap_or_default();
        metadata.make_private();
        self.upload(locations, contents, content_type, Some(&metadata))
            .await
    }

    /// Upload as a public-read object cached for [`public_caching_ttl`](Self::public_caching_ttl)
    /// seconds, keeping the storage tier from `metadata`.
    pub async fn upload_publicly_cached<'a>(
        &self,
        locations: &'a Locations,
        contents: impl Into<Bytes>,
        content_type: &str,
        metadata: Option<UploadMetadata>,
    ) -> Result<&'a Location> {
        let mut metadata = metadata.unwrap_or_default();
        metadata
            .make_public()
            .caching_max_age(self.public_caching_ttl);
        self.upload(locations, contents, content_type, Some(&metadata))
            .await
    }
}

impl<F: ClientFactory> fmt::Debug for Uploader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uploader")
            .field("factory", &self.factory)
            .field("public_caching_ttl", &self.public_caching_ttl)
            .field("error_observer", &self.error_observer.is_some())
            .finish()
    }
}
