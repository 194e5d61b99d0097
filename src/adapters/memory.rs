use crate::{ClientFactory, ObjectClient, ProviderError, ProviderResult, PutObjectRequest};
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, RwLock};

type Bucket = HashMap<String, PutObjectRequest>;

#[derive(Default)]
struct Regions {
    buckets: HashMap<String, HashMap<String, Bucket>>,
    offline: HashSet<String>,
}

/// A simple in-memory, multi-region object store.
///
/// - Regions exist once a bucket has been created in them.
/// - Each stored object keeps the full [`PutObjectRequest`] that wrote it, so
///   tests can check visibility, tier and cache headers.
/// - A region can be taken offline to simulate an outage.
///
/// Clones share the same underlying store.
#[derive(Clone, Default)]
pub struct MemoryClientFactory {
    inner: Arc<RwLock<Regions>>,
}

impl MemoryClientFactory {
    /// Create an empty store with no regions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`create_bucket`](Self::create_bucket).
    pub fn with_bucket(self, region: impl Into<String>, bucket: impl Into<String>) -> Self {
        self.create_bucket(region, bucket);
        self
    }

    /// Create `bucket` in `region`. Existing buckets are left untouched.
    pub fn create_bucket(&self, region: impl Into<String>, bucket: impl Into<String>) {
        let mut regions = self.inner.write().expect("poisoned lock");
        regions
            .buckets
            .entry(region.into())
            .or_default()
            .entry(bucket.into())
            .or_default();
    }

    /// Seed an object directly, creating the bucket if needed.
    pub fn insert(
        &self,
        region: impl Into<String>,
        bucket: impl Into<String>,
        key: impl Into<String>,
        contents: impl Into<Bytes>,
    ) {
        let request = PutObjectRequest::new(contents, "application/octet-stream", None);
        let mut regions = self.inner.write().expect("poisoned lock");
        regions
            .buckets
            .entry(region.into())
            .or_default()
            .entry(bucket.into())
            .or_default()
            .insert(key.into(), request);
    }

    /// Make every call against `region` fail until [`bring_online`](Self::bring_online).
    pub fn take_offline(&self, region: impl Into<String>) {
        let mut regions = self.inner.write().expect("poisoned lock");
        regions.offline.insert(region.into());
    }

    pub fn bring_online(&self, region: &str) {
        let mut regions = self.inner.write().expect("poisoned lock");
        regions.offline.remove(region);
    }

    /// Get a copy of the bytes stored at `region`/`bucket`/`key`.
    pub fn object(&self, region: &str, bucket: &str, key: &str) -> Option<Bytes> {
        self.stored_request(region, bucket, key)
            .map(|request| request.body)
    }

    /// The request that wrote `region`/`bucket`/`key` (useful for tests).
    pub fn stored_request(&self, region: &str, bucket: &str, key: &str) -> Option<PutObjectRequest> {
        let regions = self.inner.read().expect("poisoned lock");
        regions
            .buckets
            .get(region)?
            .get(bucket)?
            .get(key)
            .cloned()
    }

    /// Total number of stored objects across all regions.
    pub fn len(&self) -> usize {
        let regions = self.inner.read().expect("poisoned lock");
        regions
            .buckets
            .values()
            .flat_map(|buckets| buckets.values())
            .map(|objects| objects.len())
            .sum()
    }

    /// Returns true if no objects are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all objects. Buckets and offline regions are kept.
    pub fn clear(&self) {
        let mut regions = self.inner.write().expect("poisoned lock");
        for buckets in regions.buckets.values_mut() {
            for objects in buckets.values_mut() {
                objects.clear();
            }
        }
    }
}

impl fmt::Debug for MemoryClientFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Avoid dumping potentially large in-memory contents.
        f.debug_struct("MemoryClientFactory")
            .field("len", &self.len())
            .finish()
    }
}

impl ClientFactory for MemoryClientFactory {
    type Client = MemoryObjectClient;

    async fn client(&self, region: &str) -> ProviderResult<MemoryObjectClient> {
        let regions = self.inner.read().expect("poisoned lock");
        if !regions.buckets.contains_key(region) {
            return Err(ProviderError::UnknownRegion(region.to_string()));
        }

        Ok(MemoryObjectClient {
            region: region.to_string(),
            inner: Arc::clone(&self.inner),
        })
    }
}

/// Client for one region of a [`MemoryClientFactory`].
#[derive(Clone)]
pub struct MemoryObjectClient {
    region: String,
    inner: Arc<RwLock<Regions>>,
}

impl MemoryObjectClient {
    pub fn region(&self) -> &str {
        &self.region
    }

    fn offline_error(&self) -> ProviderError {
        ProviderError::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            format!("region {} is unavailable", self.region),
        ))
    }
}

impl fmt::Debug for MemoryObjectClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryObjectClient")
            .field("region", &self.region)
            .finish()
    }
}

impl ObjectClient for MemoryObjectClient {
    async fn get_object(&self, bucket: &str, key: &str) -> ProviderResult<Bytes> {
        let regions = self.inner.read().expect("poisoned lock");
        if regions.offline.contains(&self.region) {
            return Err(self.offline_error());
        }

        let objects = regions
            .buckets
            .get(&self.region)
            .and_then(|buckets| buckets.get(bucket))
            .ok_or_else(|| ProviderError::NoSuchBucket(bucket.to_string()))?;

        objects
            .get(key)
            .map(|request| request.body.clone())
            .ok_or_else(|| ProviderError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        request: &PutObjectRequest,
    ) -> ProviderResult<()> {
        let mut regions = self.inner.write().expect("poisoned lock");
        if regions.offline.contains(&self.region) {
            return Err(self.offline_error());
        }

        let objects = regions
            .buckets
            .get_mut(&self.region)
            .and_then(|buckets| buckets.get_mut(bucket))
            .ok_or_else(|| ProviderError::NoSuchBucket(bucket.to_string()))?;

        objects.insert(key.to_string(), request.clone());
        Ok(())
    }
}
