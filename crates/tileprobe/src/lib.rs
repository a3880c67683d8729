//! # tileprobe
//!
//! Scripted clients for exercising a turn-based tile-game (mahjong)
//! server over WebSocket.
//!
//! A probe joins a room, tracks what the server tells it (seat, hand,
//! whose turn it is) and answers with a pluggable [`Policy`]. Responses
//! are held for a reaction delay and cancelled if a newer server event
//! makes them obsolete.
//!
//! ## Layers
//!
//! | crate                 | role                                        |
//! |-----------------------|---------------------------------------------|
//! | `tileprobe-transport` | [`Connection`] trait, WebSocket client      |
//! | `tileprobe-protocol`  | [`Envelope`], [`Codec`], [`JsonCodec`]      |
//! | `tileprobe-tracker`   | [`TrackerState`] and its pure transitions   |
//! | `tileprobe-delay`     | [`ResponseScheduler`] keyed by [`GuardKey`] |
//! | `tileprobe` (this)    | policies, [`Dispatcher`], [`ProbeClient`]   |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tileprobe::prelude::*;
//!
//! # async fn demo() -> Result<(), ProbeError> {
//! let report = ProbeClient::builder()
//!     .url("ws://127.0.0.1:5555")
//!     .player("p1")
//!     .room("room_1")
//!     .connect(ProbePolicy::default())
//!     .await?
//!     .run()
//!     .await?;
//! println!("rounds played: {}", report.outcomes.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod dispatcher;
mod error;
mod policy;

pub use client::{
    ProbeClient, ProbeClientBuilder, ProbeConfig, SessionEnd, SessionReport,
    DEFAULT_SERVER_URL,
};
pub use dispatcher::{
    superseded_guards, DispatchStats, Dispatched, Dispatcher, Response,
    ServerError,
};
pub use error::ProbeError;
pub use policy::{
    AlwaysDecline, Anomaly, Decision, ImmediatePlayFirst, Outgoing, Policy,
    ProbePolicy,
};

pub use tileprobe_delay::{DelayConfig, DelayStats, GuardKey, ResponseScheduler};
pub use tileprobe_protocol::{
    ActionKind, Card, Codec, Envelope, JsonCodec, PlayerId, RoomId, Seat,
};
pub use tileprobe_tracker::{Desync, Phase, RoundOutcome, Session, TrackerState};
pub use tileprobe_transport::{
    Connection, MemoryConnection, MemoryPeer, TransportError,
    WebSocketConnection,
};

/// Everything needed to build and run a probe.
pub mod prelude {
    pub use crate::{
        AlwaysDecline, Connection, DelayConfig, Envelope, ImmediatePlayFirst,
        Policy, ProbeClient, ProbeConfig, ProbeError, ProbePolicy,
        SessionReport,
    };
}
