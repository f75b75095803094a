//! YAML serialization helpers for config files.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// YAML serialization failed.
    #[error("YAML serialization failed: {0}")]
    Serialize(serde_yaml::Error),

    /// YAML deserialization failed.
    #[error("YAML deserialization failed: {0}")]
    Deserialize(serde_yaml::Error),
}

/// Serializes a value to YAML.
///
/// Maps in the config types are ordered, so output is stable across runs.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_yaml<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    serde_yaml::to_string(value).map_err(SerializationError::Serialize)
}

/// Deserializes YAML from a string.
///
/// A document that is empty or only whitespace yields `T::default()`.
///
/// # Errors
///
/// Returns an error if the YAML is invalid or doesn't match the expected type.
pub fn from_yaml<T: DeserializeOwned + Default>(yaml: &str) -> Result<T, SerializationError> {
    if yaml.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(yaml).map_err(SerializationError::Deserialize)
}
