//! Read-only access to the hosted document store.

pub mod cms;
pub mod queries;

pub use cms::CmsClient;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::domain::Record;
use crate::error::FetchError;

/// Anything that can answer a query with an array of flat JSON records.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, query: &str) -> Result<Vec<Value>, FetchError>;
}

/// Fetch and decode a record list. A record that does not decode, or that
/// decodes but breaks a domain invariant, is dropped with a warning. Only
/// transport and envelope failures fail the fetch.
#[instrument(skip(source, query), fields(kind = T::KIND))]
pub async fn fetch_records<T: Record>(
    source: &dyn DataSource,
    query: &str,
) -> Result<Vec<T>, FetchError> {
    let raw = source.fetch(query).await?;
    let total = raw.len();

    let mut records = Vec::with_capacity(total);
    for (position, value) in raw.into_iter().enumerate() {
        let record: T = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                warn!(position, error = %e, "Skipping undecodable record");
                continue;
            }
        };
        match record.validate() {
            Ok(()) => records.push(record),
            Err(e) => warn!(error = %e, "Skipping invalid record"),
        }
    }

    debug!(fetched = total, kept = records.len(), "Decoded records");
    Ok(records)
}
