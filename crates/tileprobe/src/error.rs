//! Unified error type for a probe session.

use tileprobe_protocol::ProtocolError;
use tileprobe_transport::TransportError;

/// Errors that end a probe session.
///
/// Malformed frames, desyncs and server-reported errors are not here: they
/// are logged and counted, and the session carries on. The `#[from]`
/// conversions let `?` lift sub-crate errors directly.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The connection failed or closed mid-send.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An outgoing envelope could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
