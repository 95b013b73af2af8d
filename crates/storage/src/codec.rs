//! Record codec
//!
//! All records pass through here on their way in and out of the store.
//! Records are encoded as MessagePack maps (field names included) so a
//! record type can gain optional fields without breaking stored data.

use serde::de::DeserializeOwned;
use serde::Serialize;
use stateful_core::Result;

/// Encode a record to bytes
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec_named(value)?)
}

/// Decode a record from bytes
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(rmp_serde::from_slice(bytes)?)
}
