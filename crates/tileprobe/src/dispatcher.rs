//! Frame-in, response-out message dispatch.
//!
//! The [`Dispatcher`] owns one session's tracker state and policy. For
//! each inbound frame it:
//!
//! 1. decodes it (malformed frames are logged and dropped),
//! 2. works out which pending responses the event makes obsolete,
//! 3. applies the event to the tracker (desyncs are logged),
//! 4. asks the policy for a response and encodes it.
//!
//! It does no I/O and keeps no timers; the caller cancels the superseded
//! guards and schedules the response. That keeps every step here
//! synchronous and testable without a runtime.

use tileprobe_delay::GuardKey;
use tileprobe_protocol::{Codec, Envelope, ErrorCode, JsonCodec};
use tileprobe_tracker::{RoundOutcome, Session, TrackerState};
use tracing::{debug, error, info, warn};

use crate::policy::{Decision, Policy};

/// Per-session counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Frames handed to [`Dispatcher::handle`].
    pub frames: u64,
    pub decode_errors: u64,
    pub unknown_tags: u64,
    pub desyncs: u64,
    pub anomalies: u64,
    /// Responses produced (whether or not they were later cancelled).
    pub actions: u64,
    pub server_errors: u64,
}

/// An encoded response and the window it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub guard: GuardKey,
    pub bytes: Vec<u8>,
}

/// An `error` envelope from the server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("server error {code}: {message}")]
pub struct ServerError {
    pub code: ErrorCode,
    pub message: String,
}

/// Everything one frame produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Dispatched {
    /// At most one response.
    pub response: Option<Response>,
    /// Guards whose pending responses this event makes obsolete. Cancel
    /// these before scheduling `response`.
    pub supersedes: Vec<GuardKey>,
    pub server_error: Option<ServerError>,
}

/// The guards an inbound event supersedes.
///
/// | guard     | superseded by                                                 |
/// |-----------|---------------------------------------------------------------|
/// | `Discard` | `game_start`, `your_turn`, own `player_play_card`, `round_result` |
/// | `Claim`   | `game_start`, `deal_cards`, `your_turn`, `ask_action`, any `player_play_card`, `action_result`, `round_result` |
///
/// A draw or a new turn means the server has moved past the discard a
/// claim window was opened for.
pub fn superseded_guards(session: &Session, envelope: &Envelope) -> Vec<GuardKey> {
    match envelope {
        Envelope::GameStart { .. } | Envelope::YourTurn { .. } => {
            vec![GuardKey::Discard, GuardKey::Claim]
        }
        Envelope::PlayerPlayCard { seat, .. } if session.is_own(*seat) => {
            vec![GuardKey::Discard, GuardKey::Claim]
        }
        Envelope::DealCards { .. }
        | Envelope::PlayerPlayCard { .. }
        | Envelope::AskAction { .. }
        | Envelope::ActionResult { .. } => vec![GuardKey::Claim],
        Envelope::RoundResult { .. } => vec![GuardKey::Discard, GuardKey::Claim],
        _ => Vec::new(),
    }
}

/// Routes frames through codec, tracker and policy for one session.
pub struct Dispatcher<P, C = JsonCodec> {
    codec: C,
    policy: P,
    state: TrackerState,
    stats: DispatchStats,
    outcomes: Vec<RoundOutcome>,
}

impl<P: Policy> Dispatcher<P, JsonCodec> {
    /// A dispatcher speaking JSON.
    pub fn new(session: Session, policy: P) -> Self {
        Self::with_codec(session, policy, JsonCodec)
    }
}

impl<P: Policy, C: Codec> Dispatcher<P, C> {
    pub fn with_codec(session: Session, policy: P, codec: C) -> Self {
        Self {
            codec,
            policy,
            state: TrackerState::new(session),
            stats: DispatchStats::default(),
            outcomes: Vec::new(),
        }
    }

    /// Handles one raw frame.
    pub fn handle(&mut self, raw: &[u8]) -> Dispatched {
        self.stats.frames += 1;
        match self.codec.decode(raw) {
            Ok(envelope) => self.handle_envelope(&envelope),
            Err(e) => {
                self.stats.decode_errors += 1;
                warn!(
                    player = %self.state.session.player_id,
                    kind = %e.kind,
                    error = %e,
                    raw = %e.raw_lossy(),
                    "dropping malformed frame"
                );
                Dispatched::default()
            }
        }
    }

    /// Handles an already-decoded envelope.
    pub fn handle_envelope(&mut self, envelope: &Envelope) -> Dispatched {
        let player = self.state.session.player_id.clone();

        if let Envelope::Unknown { tag } = envelope {
            self.stats.unknown_tags += 1;
            debug!(%player, %tag, "ignoring unknown message type");
            return Dispatched::default();
        }

        let mut out = Dispatched {
            supersedes: superseded_guards(&self.state.session, envelope),
            ..Dispatched::default()
        };

        if let Envelope::Error { code, message } = envelope {
            self.stats.server_errors += 1;
            error!(%player, %code, %message, "server reported error");
            out.server_error = Some(ServerError {
                code: code.clone(),
                message: message.clone(),
            });
        }

        let transition = self.state.apply(envelope);
        for warning in &transition.warnings {
            self.stats.desyncs += 1;
            warn!(%player, tag = envelope.tag(), %warning, "desync");
        }
        self.state = transition.state;

        if let Envelope::RoundResult { .. } = envelope {
            if let Some(outcome) = &self.state.last_outcome {
                info!(
                    %player,
                    winner = ?outcome.winner,
                    own_score = ?self.state.seat().and_then(|s| outcome.score_for(s)),
                    rounds = self.state.rounds_completed,
                    "round finished"
                );
                self.outcomes.push(outcome.clone());
            }
        }

        match self.policy.decide(&self.state, envelope) {
            Decision::Act(outgoing) => match self.codec.encode(&outgoing.envelope) {
                Ok(bytes) => {
                    self.stats.actions += 1;
                    debug!(
                        %player,
                        trigger = envelope.tag(),
                        action = outgoing.envelope.tag(),
                        guard = %outgoing.guard,
                        "response ready"
                    );
                    if outgoing.guard == GuardKey::Claim {
                        self.state = self.state.on_action_sent().state;
                    }
                    out.response = Some(Response {
                        guard: outgoing.guard,
                        bytes,
                    });
                }
                Err(e) => {
                    error!(%player, error = %e, "failed to encode response");
                }
            },
            Decision::Anomaly(anomaly) => {
                self.stats.anomalies += 1;
                warn!(%player, trigger = envelope.tag(), %anomaly, "policy anomaly");
            }
            Decision::Idle => {}
        }

        out
    }

    /// Current tracker state.
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Outcomes of every round finished so far, oldest first.
    pub fn outcomes(&self) -> &[RoundOutcome] {
        &self.outcomes
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Consumes the dispatcher, returning its final state, counters and
    /// outcomes.
    pub fn into_parts(self) -> (TrackerState, DispatchStats, Vec<RoundOutcome>) {
        (self.state, self.stats, self.outcomes)
    }
}
