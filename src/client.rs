use crate::{PutObjectRequest, ProviderResult};
use bytes::Bytes;
use std::fmt::Debug;
use std::future::Future;

/// A storage client bound to one region.
///
/// This is the single-location seam the failover orchestrators drive. Every
/// failure comes back as a [`ProviderError`](crate::ProviderError); the
/// orchestrator decides whether to move on.
pub trait ObjectClient: Send + Sync {
    /// Fetch the whole object.
    fn get_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = ProviderResult<Bytes>> + Send;

    /// Store `request.body` at `bucket`/`key`, overwriting any existing object.
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        request: &PutObjectRequest,
    ) -> impl Future<Output = ProviderResult<()>> + Send;
}

/// Produces region-scoped [`ObjectClient`]s.
///
/// Implementations are free to build a fresh client per call or to pool them;
/// the orchestrators ask once per attempted location.
pub trait ClientFactory: Send + Sync + Debug {
    type Client: ObjectClient;

    /// Get a client for `region`. A failure here counts as a failure of the
    /// location being attempted.
    fn client(&self, region: &str) -> impl Future<Output = ProviderResult<Self::Client>> + Send;
}

impl<F: ClientFactory + ?Sized> ClientFactory for std::sync::Arc<F> {
    type Client = F::Client;

    fn client(&self, region: &str) -> impl Future<Output = ProviderResult<Self::Client>> + Send {
        (**self).client(region)
    }
}
