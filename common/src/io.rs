#[cfg(any(feature = "json", feature = "bincode"))]
use anyhow::Result;

#[cfg(feature = "json")]
use serde::{Serialize, de::DeserializeOwned};

#[cfg(feature = "bincode")]
use bincode::{Decode, Encode};

// ============================================================================
// Snapshot Encoding
// ============================================================================

#[cfg(feature = "json")]
pub fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(value)?)
}

#[cfg(feature = "json")]
pub fn from_json<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(data)?)
}

#[cfg(feature = "bincode")]
pub fn to_bincode<T: Encode>(value: &T) -> Result<Vec<u8>> {
    Ok(bincode::encode_to_vec(value, bincode::config::standard())?)
}

#[cfg(feature = "bincode")]
pub fn from_bincode<T: Decode<()>>(data: &[u8]) -> Result<T> {
    Ok(bincode::decode_from_slice(data, bincode::config::standard())?.0)
}
