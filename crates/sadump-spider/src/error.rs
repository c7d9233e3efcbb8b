//! Error types for decoding `__data.json` payloads.

use thiserror::Error;

/// Failure modes of the indexed-table decoder.
///
/// Every variant aborts the section being decoded; callers decode independent sections
/// separately so that one failure does not block the rest.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A slot index points outside of the value array.
    #[error("slot index {index} is out of range for a value array of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    /// An expected mapping or sequence of slot indices has a different shape.
    #[error("malformed table: {0}")]
    MalformedTable(String),

    /// The top-level response does not carry a `nodes[..].data` value array.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A named leaf, or a key along a section path, is absent.
    #[error("missing field: {0}")]
    MissingField(String),
}

/// A `Result` alias using [`DecodeError`].
pub type Result<T> = std::result::Result<T, DecodeError>;
