//! Codec trait and implementations for turning frames into envelopes.
//!
//! The dispatcher only sees [`Codec`]; the JSON specifics live in
//! [`JsonCodec`], which sits behind the default `json` feature.

use crate::{DecodeError, Envelope, ProtocolError};

/// Converts envelopes to frame bytes and back.
///
/// `decode` must never panic: every malformed input is reported as a
/// [`DecodeError`]. A well-formed frame with an unrecognised tag is not an
/// error; it decodes to [`Envelope::Unknown`].
pub trait Codec: Send + Sync + 'static {
    /// Serializes an envelope into one frame.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the serializer fails. Envelopes
    /// built from this crate's types always encode.
    fn encode(&self, envelope: &Envelope) -> Result<Vec<u8>, ProtocolError>;

    /// Parses one frame.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] carrying the raw bytes when the frame is
    /// not a JSON object, has no `"type"` tag, or does not match the
    /// schema of its (known) tag.
    fn decode(&self, data: &[u8]) -> Result<Envelope, DecodeError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// ## Example
///
/// ```rust
/// use tileprobe_protocol::{Card, Codec, Envelope, JsonCodec};
///
/// let codec = JsonCodec;
/// let bytes = codec.encode(&Envelope::play_card(Card(5))).unwrap();
/// assert_eq!(bytes, br#"{"type":"play_card","card":5}"#);
///
/// let decoded = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, Envelope::play_card(Card(5)));
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode(&self, envelope: &Envelope) -> Result<Vec<u8>, ProtocolError> {
        match envelope {
            // `Unknown` is `#[serde(skip)]`; write back the bare tag so the
            // frame still decodes to the same envelope.
            Envelope::Unknown { tag } => {
                serde_json::to_vec(&serde_json::json!({ "type": tag }))
            }
            known => serde_json::to_vec(known),
        }
        .map_err(ProtocolError::Encode)
    }

    fn decode(&self, data: &[u8]) -> Result<Envelope, DecodeError> {
        use crate::DecodeErrorKind as Kind;
        use serde_json::Value;

        // Stage 1: parse into a generic tree so the tag can be inspected
        // before committing to a variant.
        let value: Value = serde_json::from_slice(data)
            .map_err(|e| DecodeError::new(Kind::Syntax, e.to_string(), data))?;

        // Stage 2: it must be an object with a string tag.
        let Value::Object(map) = &value else {
            return Err(DecodeError::new(
                Kind::NotAnObject,
                "frame is not a JSON object",
                data,
            ));
        };
        let tag = match map.get("type") {
            Some(Value::String(tag)) => tag.clone(),
            Some(_) => {
                return Err(DecodeError::new(
                    Kind::MissingTag,
                    "\"type\" is not a string",
                    data,
                ));
            }
            None => {
                return Err(DecodeError::new(
                    Kind::MissingTag,
                    "no \"type\" field",
                    data,
                ));
            }
        };

        // Stage 3: unknown tags are observed, not rejected.
        if !Envelope::is_known_tag(&tag) {
            return Ok(Envelope::Unknown { tag });
        }

        // Stage 4: per-variant field validation.
        serde_json::from_value(value).map_err(|e| {
            DecodeError::new(Kind::InvalidPayload, format!("{tag}: {e}"), data)
        })
    }
}
