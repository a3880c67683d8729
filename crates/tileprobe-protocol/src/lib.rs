//! Wire protocol for tileprobe.
//!
//! This crate defines the messages a tile-game client and server exchange:
//!
//! - **Types** ([`Envelope`], [`Card`], [`Seat`], [`ActionKind`], etc.):
//!   one closed enum covering every frame in both directions.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how envelopes become
//!   frame bytes and back.
//! - **Errors** ([`DecodeError`], [`ProtocolError`]): what can go wrong.
//!
//! # Architecture
//!
//! ```text
//! Transport (frames) → Protocol (Envelope) → Tracker (belief state)
//! ```
//!
//! The protocol layer knows nothing about seats being "ours" or turns
//! being "open"; that is the tracker's job.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::{DecodeError, DecodeErrorKind, ProtocolError};
pub use types::{
    ActionKind, Card, Envelope, ErrorCode, PlayerId, RoomId, RoomPhase,
    RosterEntry, RoundDetail, Score, Seat, SeatScore,
};
