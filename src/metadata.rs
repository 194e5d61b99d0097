use bytes::Bytes;
use std::fmt;

/// Storage tier requested for an upload.
///
/// When no tier is set the provider's default applies and nothing is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageTier {
    StandardInfrequentAccess,
    OneZoneInfrequentAccess,
    ReducedRedundancy,
    IntelligentTiering,
    Glacier,
}

impl StorageTier {
    /// Wire name understood by S3-compatible services.
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageTier::StandardInfrequentAccess => "STANDARD_IA",
            StorageTier::OneZoneInfrequentAccess => "ONEZONE_IA",
            StorageTier::ReducedRedundancy => "REDUCED_REDUNDANCY",
            StorageTier::IntelligentTiering => "INTELLIGENT_TIERING",
            StorageTier::Glacier => "GLACIER",
        }
    }
}

impl fmt::Display for StorageTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access control applied to an uploaded object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    #[default]
    Private,
    PublicRead,
}

impl Visibility {
    /// Canned ACL name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::PublicRead => "public-read",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upload-time options: visibility, storage tier and cache directive.
///
/// Setters chain on `&mut self`, so a value can be adjusted in place or
/// built up in one expression:
///
/// ```
/// use stowage_failover::{StorageTier, UploadMetadata, Visibility};
///
/// let mut metadata = UploadMetadata::new();
/// metadata.standard_infrequent_access().make_public().caching_max_age(600);
///
/// assert_eq!(metadata.get_storage_tier(), Some(StorageTier::StandardInfrequentAccess));
/// assert_eq!(metadata.visibility(), Visibility::PublicRead);
/// assert_eq!(metadata.cache_control().as_deref(), Some("max-age=600"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadMetadata {
    storage_tier: Option<StorageTier>,
    visibility: Visibility,
    cache_max_age: Option<u64>,
}

impl UploadMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn storage_tier(&mut self, tier: StorageTier) -> &mut Self {
        self.storage_tier = Some(tier);
        self
    }

    pub fn standard_infrequent_access(&mut self) -> &mut Self {
        self.storage_tier(StorageTier::StandardInfrequentAccess)
    }

    pub fn one_zone_infrequent_access(&mut self) -> &mut Self {
        self.storage_tier(StorageTier::OneZoneInfrequentAccess)
    }

    pub fn reduced_redundancy(&mut self) -> &mut Self {
        self.storage_tier(StorageTier::ReducedRedundancy)
    }

    pub fn intelligent_tiering(&mut self) -> &mut Self {
        self.storage_tier(StorageTier::IntelligentTiering)
    }

    pub fn glacier(&mut self) -> &mut Self {
        self.storage_tier(StorageTier::Glacier)
    }

    /// Private ACL (the default).
    pub fn make_private(&mut self) -> &mut Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn make_public(&mut self) -> &mut Self {
        self.visibility = Visibility::PublicRead;
        self
    }

    /// Set the `Cache-Control` max age, in seconds.
    pub fn caching_max_age(&mut self, seconds: u64) -> &mut Self {
        self.cache_max_age = Some(seconds);
        self
    }

    pub fn get_storage_tier(&self) -> Option<StorageTier> {
        self.storage_tier
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn cache_max_age(&self) -> Option<u64> {
        self.cache_max_age
    }

    /// `Cache-Control` header value, if a max age was set.
    pub fn cache_control(&self) -> Option<String> {
        self.cache_max_age.map(|sec| format!("max-age={sec}"))
    }
}

/// Everything a single `put_object` call sends besides bucket and key.
///
/// Built once per upload and reused for every candidate location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectRequest {
    pub body: Bytes,
    pub content_type: String,
    pub visibility: Visibility,
    pub storage_tier: Option<StorageTier>,
    pub cache_control: Option<String>,
}

impl PutObjectRequest {
    /// Private, no tier, no cache directive unless `metadata` says otherwise.
    pub fn new(
        body: impl Into<Bytes>,
        content_type: impl Into<String>,
        metadata: Option<&UploadMetadata>,
    ) -> Self {
        let mut request = Self {
            body: body.into(),
            content_type: content_type.into(),
            visibility: Visibility::Private,
            storage_tier: None,
            cache_control: None,
        };

        if let Some(metadata) = metadata {
            request.visibility = metadata.visibility();
            request.storage_tier = metadata.get_storage_tier();
            request.cache_control = metadata.cache_control();
        }

        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_without_metadata() {
        let request = PutObjectRequest::new("abc 123", "text/plain", None);

        assert_eq!(request.body, Bytes::from_static(b"abc 123"));
        assert_eq!(request.content_type, "text/plain");
        assert_eq!(request.visibility, Visibility::Private);
        assert_eq!(request.storage_tier, None);
        assert_eq!(request.cache_control, None);
    }

    #[test]
    fn test_request_with_tier_only() {
        let mut metadata = UploadMetadata::new();
        metadata.standard_infrequent_access();

        let request = PutObjectRequest::new("abc 123", "text/plain", Some(&metadata));

        assert_eq!(
            request.storage_tier,
            Some(StorageTier::StandardInfrequentAccess)
        );
        assert_eq!(request.visibility, Visibility::Private);
        assert_eq!(request.cache_control, None);
    }

    #[test]
    fn test_request_public_with_cache() {
        let mut metadata = UploadMetadata::new();
        metadata.make_public().caching_max_age(3600);

        let request = PutObjectRequest::new(vec![1u8, 2, 3], "image/png", Some(&metadata));

        assert_eq!(request.visibility, Visibility::PublicRead);
        assert_eq!(request.storage_tier, None);
        assert_eq!(request.cache_control.as_deref(), Some("max-age=3600"));
    }

    #[test]
    fn test_last_tier_wins() {
        let mut metadata = UploadMetadata::new();
        metadata.glacier().intelligent_tiering();
        assert_eq!(
            metadata.get_storage_tier(),
            Some(StorageTier::IntelligentTiering)
        );
    }

    #[test]
    fn test_make_private_after_public() {
        let mut metadata = UploadMetadata::new();
        metadata.make_public().make_private();
        assert_eq!(metadata.visibility(), Visibility::Private);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(StorageTier::StandardInfrequentAccess.as_str(), "STANDARD_IA");
        assert_eq!(StorageTier::OneZoneInfrequentAccess.as_str(), "ONEZONE_IA");
        assert_eq!(StorageTier::ReducedRedundancy.as_str(), "REDUCED_REDUNDANCY");
        assert_eq!(StorageTier::IntelligentTiering.as_str(), "INTELLIGENT_TIERING");
        assert_eq!(StorageTier::Glacier.as_str(), "GLACIER");
        assert_eq!(Visibility::Private.to_string(), "private");
        assert_eq!(Visibility::PublicRead.to_string(), "public-read");
    }
}
