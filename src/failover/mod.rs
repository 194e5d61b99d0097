//! Ordered failover across candidate locations.
//!
//! Both orchestrators share one loop: try each location in order, stop at the
//! first success, remember the first failure, hand every failure to the
//! observer before moving on, and abort immediately if the observer fails.

mod downloader;
mod uploader;

pub use downloader::Downloader;
pub use uploader::{DEFAULT_PUBLIC_CACHING_TTL, Uploader};

use crate::{BoxError, Error, Location, Locations, ProviderError, ProviderResult, Result};
use std::fmt;
use std::future::Future;

/// Which failover operation produced an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Download,
    Upload,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Download => f.write_str("download"),
            Operation::Upload => f.write_str("upload"),
        }
    }
}

/// Run `attempt` against each location until one succeeds.
///
/// Returns the winning location together with the attempt's output.
pub(crate) async fn try_locations<'a, T, A, Fut, O>(
    operation: Operation,
    locations: &'a Locations,
    mut attempt: A,
    mut observe: O,
) -> Result<(&'a Location, T)>
where
    A: FnMut(&'a Location) -> Fut,
    Fut: Future<Output = ProviderResult<T>>,
    O: FnMut(&Location, &ProviderError) -> std::result::Result<(), BoxError>,
{
    let mut first_failure: Option<ProviderError> = None;

    for (index, location) in locations.iter().enumerate() {
        let attempt_no = index + 1;
        tracing::debug!(%operation, %location, attempt = attempt_no, "Trying location");

        match attempt(location).await {
            Ok(output) => {
                if index > 0 {
                    tracing::info!(%operation, %location, attempt = attempt_no, "Fallback location succeeded");
                }
                return Ok((location, output));
            }
            Err(e) => {
                tracing::warn!(%operation, %location, error = ?e, "Location failed");

                let observed = observe(location, &e);
                first_failure.get_or_insert(e);

                if let Err(source) = observed {
                    tracing::error!(%operation, %location, error = ?source, "Error observer failed, aborting");
                    return Err(Error::ObserverFailed {
                        operation,
                        attempted: attempt_no,
                        source,
                    });
                }
            }
        }
    }

    let attempted = locations.len();
    tracing::error!(%operation, attempted, "All locations failed");

    match first_failure {
        Some(first_failure) => Err(Error::Exhausted {
            operation,
            attempted,
            first_failure,
        }),
        None => unreachable!("location sets always hold at least one location"),
    }
}
