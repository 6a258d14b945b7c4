//! Records served by the CMS. Every type here is read-only from the
//! dashboard's point of view.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::*;
pub use order::*;
pub use product::*;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::RecordError;

/// A flat record type that can be fetched from the CMS and checked after
/// decoding.
pub trait Record: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Singular name used in logs and errors.
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn validate(&self) -> Result<(), RecordError> {
        Ok(())
    }
}

/// CMS projections return `null` for absent fields; treat that like a
/// missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn non_negative_amount(
    kind: &'static str,
    id: &str,
    field: &str,
    value: f64,
) -> Result<(), RecordError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RecordError::Invalid {
            kind,
            id: id.to_string(),
            reason: format!("{} must be a non-negative number, got {}", field, value),
        })
    }
}
