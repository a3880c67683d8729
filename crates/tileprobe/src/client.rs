//! `ProbeClient` builder and session loop.
//!
//! This is the entry point for running one simulated player. It ties the
//! layers together: transport → codec → tracker → policy → scheduler →
//! transport.
//!
//! One client owns one connection, one [`Dispatcher`] and one
//! [`ResponseScheduler`]. The loop in [`ProbeClient::run_until`] is the
//! single writer for the connection: deferred responses reach it over an
//! mpsc channel, never by writing to the socket themselves.

use std::future::Future;
use std::time::Duration;

use tileprobe_delay::{DelayConfig, DelayStats, ResponseScheduler};
use tileprobe_protocol::{Codec, Envelope, JsonCodec, PlayerId, RoomId, Seat};
use tileprobe_tracker::{Phase, RoundOutcome, Session};
use tileprobe_transport::{Connection, TransportError, WebSocketConnection};
use tracing::{debug, info};

use crate::dispatcher::{DispatchStats, Dispatcher};
use crate::policy::Policy;
use crate::ProbeError;

/// Default server the builder connects to.
pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:5555";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Identity and pacing of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub player_id: PlayerId,
    /// Display name. Empty means "use the player id".
    pub nickname: String,
    /// Room to join. Empty lets the server pick; the first `room_info`
    /// fills it in.
    pub room_id: RoomId,
    pub delay: DelayConfig,
}

impl ProbeConfig {
    pub fn new(player_id: impl Into<PlayerId>) -> Self {
        Self {
            player_id: player_id.into(),
            nickname: String::new(),
            room_id: RoomId::default(),
            delay: DelayConfig::default(),
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }

    pub fn with_room(mut self, room_id: impl Into<RoomId>) -> Self {
        self.room_id = room_id.into();
        self
    }

    pub fn with_delay(mut self, delay: DelayConfig) -> Self {
        self.delay = delay;
        self
    }

    /// Fill defaults and clamp the delay. Called by [`ProbeClient::new`].
    pub fn validated(mut self) -> Self {
        if self.nickname.is_empty() {
            self.nickname = self.player_id.to_string();
        }
        self.delay = self.delay.validated();
        self
    }

    fn session(&self) -> Session {
        Session::new(
            self.player_id.clone(),
            self.nickname.clone(),
            self.room_id.clone(),
        )
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Why the session loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server closed the channel.
    ServerClosed,
    /// The shutdown future resolved.
    Shutdown,
}

/// Summary of a finished probe session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub player_id: PlayerId,
    pub room_id: RoomId,
    pub seat: Option<Seat>,
    pub end: SessionEnd,
    /// Tracker phase when the loop stopped.
    pub phase: Phase,
    pub outcomes: Vec<RoundOutcome>,
    pub dispatch: DispatchStats,
    pub delay: DelayStats,
}

impl SessionReport {
    /// Sum of our own scores over every recorded round.
    pub fn total_score(&self) -> i64 {
        let Some(seat) = self.seat else {
            return 0;
        };
        self.outcomes.iter().filter_map(|o| o.score_for(seat)).sum()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for a WebSocket-connected probe.
///
/// # Example
///
/// ```rust,ignore
/// use tileprobe::prelude::*;
///
/// let client = ProbeClient::builder()
///     .url("ws://127.0.0.1:5555")
///     .player("p1")
///     .room("room_1")
///     .connect(ProbePolicy::default())
///     .await?;
/// let report = client.run().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProbeClientBuilder {
    url: String,
    config: ProbeConfig,
}

impl ProbeClientBuilder {
    pub fn new() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            config: ProbeConfig::new("probe"),
        }
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn player(mut self, player_id: &str) -> Self {
        self.config.player_id = PlayerId::from(player_id);
        self
    }

    pub fn nickname(mut self, nickname: &str) -> Self {
        self.config.nickname = nickname.to_string();
        self
    }

    pub fn room(mut self, room_id: &str) -> Self {
        self.config.room_id = RoomId::from(room_id);
        self
    }

    /// Fixed part of the reaction delay.
    pub fn reaction_delay(mut self, delay: Duration) -> Self {
        self.config.delay.reaction_delay = delay;
        self
    }

    /// Random extra added to each reaction delay.
    pub fn jitter(mut self, jitter: Duration) -> Self {
        self.config.delay.jitter = jitter;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ProbeConfig) -> Self {
        self.config = config;
        self
    }

    /// Opens the WebSocket and returns a client ready to [`run`](ProbeClient::run).
    pub async fn connect<P: Policy>(
        self,
        policy: P,
    ) -> Result<ProbeClient<WebSocketConnection, P>, ProbeError> {
        let conn = WebSocketConnection::connect(&self.url).await?;
        info!(url = %self.url, player = %self.config.player_id, "connected");
        Ok(ProbeClient::new(conn, self.config, policy))
    }
}

impl Default for ProbeClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// One simulated player bound to one connection.
pub struct ProbeClient<Conn, P, C = JsonCodec> {
    conn: Conn,
    config: ProbeConfig,
    dispatcher: Dispatcher<P, C>,
}

impl ProbeClient<WebSocketConnection, crate::ProbePolicy> {
    /// Creates a builder.
    pub fn builder() -> ProbeClientBuilder {
        ProbeClientBuilder::new()
    }
}

impl<Conn, P> ProbeClient<Conn, P, JsonCodec>
where
    Conn: Connection<Error = TransportError>,
    P: Policy,
{
    /// Wraps an open connection, speaking JSON.
    pub fn new(conn: Conn, config: ProbeConfig, policy: P) -> Self {
        Self::with_codec(conn, config, policy, JsonCodec)
    }
}

impl<Conn, P, C> ProbeClient<Conn, P, C>
where
    Conn: Connection<Error = TransportError>,
    P: Policy,
    C: Codec,
{
    pub fn with_codec(conn: Conn, config: ProbeConfig, policy: P, codec: C) -> Self {
        let config = config.validated();
        let dispatcher = Dispatcher::with_codec(config.session(), policy, codec);
        Self {
            conn,
            config,
            dispatcher,
        }
    }

    /// The active (validated) configuration.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Runs until the server closes the channel.
    pub async fn run(self) -> Result<SessionReport, ProbeError> {
        self.run_until(std::future::pending()).await
    }

    /// Runs until the server closes the channel or `shutdown` resolves.
    ///
    /// Sends `join_room` first, then pumps frames through the dispatcher.
    /// Pending responses are dropped when the loop ends. On shutdown the
    /// connection is closed; a server-side close is taken as a normal end.
    pub async fn run_until(
        mut self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<SessionReport, ProbeError> {
        let conn_id = self.conn.id();
        let player = self.config.player_id.clone();
        let (mut scheduler, mut outbound) =
            ResponseScheduler::<Vec<u8>>::channel(self.config.delay.clone());

        let join = Envelope::join_room(
            self.config.room_id.clone(),
            self.config.player_id.clone(),
            self.config.nickname.clone(),
        );
        let bytes = self.dispatcher.codec().encode(&join)?;
        self.conn.send(&bytes).await?;
        info!(%conn_id, %player, room = %self.config.room_id, "join_room sent");

        let mut shutdown = std::pin::pin!(shutdown);
        let end = loop {
            tokio::select! {
                biased;

                () = &mut shutdown => break SessionEnd::Shutdown,

                // Due responses go out before the next inbound frame is read.
                Some(bytes) = outbound.recv() => {
                    self.conn.send(&bytes).await?;
                }

                frame = self.conn.recv() => {
                    let Some(frame) = frame? else {
                        break SessionEnd::ServerClosed;
                    };
                    let out = self.dispatcher.handle(&frame);
                    for key in out.supersedes {
                        scheduler.cancel(key);
                    }
                    if let Some(response) = out.response {
                        scheduler.schedule(response.guard, response.bytes);
                    }
                }
            }
        };

        scheduler.cancel_all();
        if end == SessionEnd::Shutdown {
            if let Err(e) = self.conn.close().await {
                debug!(%conn_id, error = %e, "close after shutdown failed");
            }
        }
        info!(%conn_id, %player, ?end, "session ended");

        let delay = scheduler.stats();
        let (state, dispatch, outcomes) = self.dispatcher.into_parts();
        Ok(SessionReport {
            player_id: player,
            room_id: state.session.room_id.clone(),
            seat: state.seat(),
            end,
            phase: state.phase,
            outcomes,
            dispatch,
            delay,
        })
    }
}
