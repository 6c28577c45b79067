//! Error taxonomy for schema validation and wire encoding.
//!
//! Corresponds to the `MalformedEvent` family of `spec.md` §7: failures here
//! are fatal to whoever is decoding a stream (a producer must never emit a
//! value that fails these checks).

use thiserror::Error;

/// Errors raised while validating, encoding, or decoding wire values.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A value did not match any known event-variant shape when classified
    /// structurally (the legacy, untagged decoding path).
    #[error("value does not match any known event variant: {0}")]
    UnrecognizedVariant(String),

    /// JSON (de)serialization failed.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// Avro schema parsing or (de)serialization failed.
    #[error("Avro codec error: {0}")]
    Avro(#[from] apache_avro::Error),

    /// Underlying I/O failed while reading or writing a container.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
