//! Common test utilities for the failover orchestrators
//!
//! [`ScriptedFactory`] is a `ClientFactory` whose per-bucket outcomes are
//! scripted up front and which records every call made against it, so tests
//! can check both what the orchestrator returned and what it attempted.

#![allow(dead_code)]

use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use stowage_failover::{
    BoxError, ClientFactory, DownloadErrorObserver, Location, Locations, ObjectClient,
    ProviderError, ProviderResult, PutObjectRequest, UploadErrorObserver,
};

pub const FILE_CONTENTS: &str = "abc 123";
pub const FILE_CONTENT_TYPE: &str = "text/plain";

/// How a scripted bucket should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailWith {
    /// The storage service rejects the credentials.
    Credentials,
    /// The payload cannot be sent (surfaced as a service error).
    Payload,
    /// The object does not exist.
    NotFound,
}

impl FailWith {
    fn to_error(self, bucket: &str, key: &str) -> ProviderError {
        match self {
            FailWith::Credentials => ProviderError::Credentials(format!("bad credentials for {bucket}")),
            FailWith::Payload => ProviderError::service(std::io::Error::other(format!(
                "incalculable payload for {bucket}"
            ))),
            FailWith::NotFound => ProviderError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
        }
    }
}

/// One recorded call against the factory or one of its clients.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Client {
        region: String,
    },
    Get {
        region: String,
        bucket: String,
        key: String,
    },
    Put {
        region: String,
        bucket: String,
        key: String,
        request: PutObjectRequest,
    },
}

#[derive(Debug, Default)]
struct Script {
    failures: HashMap<String, FailWith>,
    no_client: HashSet<String>,
    contents: HashMap<String, Bytes>,
    calls: Vec<Call>,
}

/// Scripted, call-recording [`ClientFactory`]. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFactory {
    script: Arc<Mutex<Script>>,
}

impl ScriptedFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call against `bucket` fails with `fail`.
    pub fn fail(self, bucket: &str, fail: FailWith) -> Self {
        self.script
            .lock()
            .unwrap()
            .failures
            .insert(bucket.to_string(), fail);
        self
    }

    /// Asking for a client in `region` fails.
    pub fn no_client_for(self, region: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .no_client
            .insert(region.to_string());
        self
    }

    /// Downloads from `bucket` return `contents`.
    pub fn serve(self, bucket: &str, contents: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .contents
            .insert(bucket.to_string(), Bytes::from(contents.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    /// Buckets that saw a get or put, in order.
    pub fn attempted_buckets(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Get { bucket, .. } | Call::Put { bucket, .. } => Some(bucket),
                Call::Client { .. } => None,
            })
            .collect()
    }

    /// Regions a client was requested for, in order.
    pub fn client_regions(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Client { region } => Some(region),
                _ => None,
            })
            .collect()
    }

    /// Requests sent by every put, in order.
    pub fn put_requests(&self) -> Vec<PutObjectRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Put { request, .. } => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.script.lock().unwrap().calls.push(call);
    }

    fn failure(&self, bucket: &str) -> Option<FailWith> {
        self.script.lock().unwrap().failures.get(bucket).copied()
    }
}

impl ClientFactory for ScriptedFactory {
    type Client = ScriptedClient;

    async fn client(&self, region: &str) -> ProviderResult<ScriptedClient> {
        self.record(Call::Client {
            region: region.to_string(),
        });
        if self.script.lock().unwrap().no_client.contains(region) {
            return Err(ProviderError::UnknownRegion(region.to_string()));
        }
        Ok(ScriptedClient {
            region: region.to_string(),
            factory: self.clone(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ScriptedClient {
    region: String,
    factory: ScriptedFactory,
}

impl ObjectClient for ScriptedClient {
    async fn get_object(&self, bucket: &str, key: &str) -> ProviderResult<Bytes> {
        self.factory.record(Call::Get {
            region: self.region.clone(),
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        if let Some(fail) = self.factory.failure(bucket) {
            return Err(fail.to_error(bucket, key));
        }

        let script = self.factory.script.lock().unwrap();
        script
            .contents
            .get(bucket)
            .cloned()
            .ok_or_else(|| FailWith::NotFound.to_error(bucket, key))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        request: &PutObjectRequest,
    ) -> ProviderResult<()> {
        self.factory.record(Call::Put {
            region: self.region.clone(),
            bucket: bucket.to_string(),
            key: key.to_string(),
            request: request.clone(),
        });

        match self.factory.failure(bucket) {
            Some(fail) => Err(fail.to_error(bucket, key)),
            None => Ok(()),
        }
    }
}

/// Observer that records every failure it sees and can be told to fail on
/// one bucket. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    seen: Arc<Mutex<Vec<(Location, String)>>>,
    fail_on_bucket: Option<String>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return an error when notified about a failure in `bucket`.
    pub fn failing_on(bucket: &str) -> Self {
        Self {
            seen: Arc::default(),
            fail_on_bucket: Some(bucket.to_string()),
        }
    }

    /// Locations observed, in notification order.
    pub fn locations(&self) -> Vec<Location> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(location, _)| location.clone())
            .collect()
    }

    /// Rendered errors observed, in notification order.
    pub fn errors(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(_, error)| error.clone())
            .collect()
    }

    fn observe(&self, location: &Location, error: &ProviderError) -> Result<(), BoxError> {
        self.seen
            .lock()
            .unwrap()
            .push((location.clone(), error.to_string()));

        match &self.fail_on_bucket {
            Some(bucket) if bucket == location.bucket() => Err("Europe test.".into()),
            _ => Ok(()),
        }
    }
}

impl DownloadErrorObserver for RecordingObserver {
    fn on_download_error(&self, location: &Location, error: &ProviderError) -> Result<(), BoxError> {
        self.observe(location, error)
    }
}

impl UploadErrorObserver for RecordingObserver {
    fn on_upload_error(&self, location: &Location, error: &ProviderError) -> Result<(), BoxError> {
        self.observe(location, error)
    }
}

pub fn primary_location() -> Location {
    Location::new(
        "us-east-1",
        "test-us-east-1",
        "us-east-1/path/to/file.txt",
    )
}

pub fn backup_location() -> Location {
    Location::new(
        "us-west-1",
        "test-us-west-1",
        "us-west-1/path/to/file.txt",
    )
}

pub fn third_location() -> Location {
    Location::new(
        "eu-central-1",
        "test-eu-central-1",
        "eu-central-1/path/to/file.txt",
    )
}

/// Primary and backup.
pub fn two_locations() -> Locations {
    Locations::new(primary_location()).with_alternative(backup_location())
}

/// Primary, backup and third.
pub fn three_locations() -> Locations {
    two_locations().with_alternative(third_location())
}
