use crate::{
    ClientFactory, ObjectClient, ProviderError, ProviderResult, PutObjectRequest, StorageTier,
    Visibility,
};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{ObjectCannedAcl, StorageClass};
use aws_smithy_types::timeout::TimeoutConfig;
use bytes::Bytes;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Clone, Debug)]
struct StaticCredentials {
    access_key_id: String,
    secret_access_key: SecretString,
}

/// Builds AWS S3 clients scoped to a region, one per region, reused across calls.
///
/// Shared settings (credentials chain, retry and HTTP config) come from the
/// [`SdkConfig`]; only the region differs between clients.
///
/// ```no_run
/// # async fn example() -> stowage_failover::Result<()> {
/// use stowage_failover::{Downloader, Location, Locations, S3ClientFactory};
///
/// let factory = S3ClientFactory::from_env().await;
/// let locations = Locations::new(Location::new("us-east-1", "assets-east", "logo.png"))
///     .with_alternative(Location::new("us-west-1", "assets-west", "logo.png"));
///
/// let bytes = Downloader::new(factory).download(&locations).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct S3ClientFactory {
    config: SdkConfig,
    endpoint_url: Option<String>,
    credentials: Option<StaticCredentials>,
    operation_timeout: Option<Duration>,
    clients: Arc<RwLock<HashMap<String, Client>>>,
}

impl S3ClientFactory {
    pub fn new(config: SdkConfig) -> Self {
        Self {
            config,
            endpoint_url: None,
            credentials: None,
            operation_timeout: None,
            clients: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Load shared configuration from the environment (env vars, profile, IMDS).
    pub async fn from_env() -> Self {
        Self::new(aws_config::defaults(BehaviorVersion::latest()).load().await)
    }

    /// Talk to an S3-compatible service (MinIO, R2, Spaces...) instead of AWS.
    ///
    /// Enables path-style addressing, which most such services require.
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Use a fixed access key instead of the default credentials chain.
    pub fn with_static_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.credentials = Some(StaticCredentials {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::from(secret_access_key.into()),
        });
        self
    }

    /// Bound each S3 call, including the SDK's own retries.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    fn build_client(&self, region: &str) -> Client {
        let mut builder =
            aws_sdk_s3::config::Builder::from(&self.config).region(Region::new(region.to_string()));

        if let Some(endpoint) = &self.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        if let Some(creds) = &self.credentials {
            builder = builder.credentials_provider(Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.expose_secret(),
                None,
                None,
                "stowage-failover",
            ));
        }

        if let Some(timeout) = self.operation_timeout {
            builder = builder.timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(timeout)
                    .build(),
            );
        }

        Client::from_conf(builder.build())
    }
}

impl ClientFactory for S3ClientFactory {
    type Client = S3ObjectClient;

    async fn client(&self, region: &str) -> ProviderResult<S3ObjectClient> {
        if region.is_empty() {
            return Err(ProviderError::UnknownRegion(region.to_string()));
        }

        if let Some(client) = self.clients.read().await.get(region) {
            return Ok(S3ObjectClient::new(client.clone(), region));
        }

        tracing::debug!(region, "Creating S3 client");
        let client = self
            .clients
            .write()
            .await
            .entry(region.to_string())
            .or_insert_with(|| self.build_client(region))
            .clone();

        Ok(S3ObjectClient::new(client, region))
    }
}

/// AWS S3 client bound to one region.
#[derive(Clone, Debug)]
pub struct S3ObjectClient {
    client: Client,
    region: String,
}

impl S3ObjectClient {
    pub fn new(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    fn validate_key(bucket: &str, key: &str) -> ProviderResult<()> {
        if key.is_empty() {
            return Err(ProviderError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn map_sdk_err<E, R>(bucket: &str, key: &str, e: SdkError<E, R>) -> ProviderError
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
        R: std::fmt::Debug + Send + Sync + 'static,
    {
        let code = e.code().map(str::to_owned);
        match code.as_deref() {
            Some("NoSuchKey") | Some("NotFound") => ProviderError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            Some("NoSuchBucket") => ProviderError::NoSuchBucket(bucket.to_string()),
            Some("InvalidAccessKeyId") | Some("SignatureDoesNotMatch") | Some("ExpiredToken") => {
                let message = e.message().unwrap_or("rejected by S3").to_string();
                ProviderError::Credentials(message)
            }
            _ => ProviderError::service(e),
        }
    }
}

fn storage_class(tier: StorageTier) -> StorageClass {
    match tier {
        StorageTier::StandardInfrequentAccess => StorageClass::StandardIa,
        StorageTier::OneZoneInfrequentAccess => StorageClass::OnezoneIa,
        StorageTier::ReducedRedundancy => StorageClass::ReducedRedundancy,
        StorageTier::IntelligentTiering => StorageClass::IntelligentTiering,
        StorageTier::Glacier => StorageClass::Glacier,
    }
}

fn canned_acl(visibility: Visibility) -> ObjectCannedAcl {
    match visibility {
        Visibility::Private => ObjectCannedAcl::Private,
        Visibility::PublicRead => ObjectCannedAcl::PublicRead,
    }
}

impl ObjectClient for S3ObjectClient {
    async fn get_object(&self, bucket: &str, key: &str) -> ProviderResult<Bytes> {
        Self::validate_key(bucket, key)?;

        let out = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Self::map_sdk_err(bucket, key, e))?;

        let data = out.body.collect().await.map_err(ProviderError::service)?;
        Ok(data.into_bytes())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        request: &PutObjectRequest,
    ) -> ProviderResult<()> {
        Self::validate_key(bucket, key)?;

        let mut put = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(request.body.clone()))
            .content_type(request.content_type.as_str())
            .acl(canned_acl(request.visibility));

        if let Some(tier) = request.storage_tier {
            put = put.storage_class(storage_class(tier));
        }
        if let Some(cache_control) = &request.cache_control {
            put = put.cache_control(cache_control.as_str());
        }

        put.send()
            .await
            .map_err(|e| Self::map_sdk_err(bucket, key, e))?;

        Ok(())
    }
}
