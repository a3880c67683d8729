//! Error types for the protocol layer.

use std::borrow::Cow;
use std::fmt;

/// Which decode stage rejected a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The bytes are not JSON at all.
    Syntax,
    /// Valid JSON, but not an object.
    NotAnObject,
    /// An object without a string `"type"` field.
    MissingTag,
    /// A known tag whose fields do not match that message's schema
    /// (missing required field, wrong type, out-of-range number).
    InvalidPayload,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Syntax => "syntax",
            Self::NotAnObject => "not-an-object",
            Self::MissingTag => "missing-tag",
            Self::InvalidPayload => "invalid-payload",
        };
        f.write_str(s)
    }
}

/// A frame that could not be turned into an [`Envelope`](crate::Envelope).
///
/// Carries the raw bytes so the caller can log exactly what arrived. The
/// session keeps running; the frame is simply dropped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} decode failure: {detail}")]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub detail: String,
    pub raw: Vec<u8>,
}

impl DecodeError {
    pub(crate) fn new(
        kind: DecodeErrorKind,
        detail: impl Into<String>,
        raw: &[u8],
    ) -> Self {
        Self {
            kind,
            detail: detail.into(),
            raw: raw.to_vec(),
        }
    }

    /// The raw frame as text, with invalid UTF-8 replaced.
    pub fn raw_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.raw)
    }
}

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning an envelope into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
