//! OpenDART-specific error types

use thiserror::Error;

use super::decode::RecordKind;

/// A raw scalar could not be normalized to its expected type
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("field is missing")]
    Missing,

    #[error("'{raw}' is not a number")]
    NotNumeric { raw: String },

    #[error("'{raw}' does not match the date pattern: {source}")]
    InvalidDate {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("'{raw}' is not a recognizable date")]
    UnrecognizedDate { raw: String },
}

/// An upstream code has no entry in its code table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {table} code '{code}'")]
pub struct UnknownCodeError {
    pub table: &'static str,
    pub code: String,
}

/// Failure to normalize one field of a raw row
#[derive(Error, Debug)]
pub enum FieldError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    UnknownCode(#[from] UnknownCodeError),
}

/// A raw row could not be decoded into its record
#[derive(Error, Debug)]
#[error("failed to decode {kind} field '{field}': {source}")]
pub struct DecodeError {
    pub kind: RecordKind,
    pub field: &'static str,
    #[source]
    pub source: FieldError,
}

/// Raised by the transport; propagated to callers unchanged
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("OpenDART API key not configured. Set DART_API_KEY environment variable")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenDART API error (status {status}): {message}")]
    Api { status: String, message: String },

    #[error("Failed to parse OpenDART response from {endpoint}: {source}")]
    InvalidPayload {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Error returned by the business-report fetch operations
#[derive(Error, Debug)]
pub enum DartError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
