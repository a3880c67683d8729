//! Session identity: who this client is and where it sits.
//!
//! A session is created when the probe connects, filled in by the first
//! `room_info` that lists our player id, and dropped when the channel
//! closes. The seat is write-once.

use tileprobe_protocol::{PlayerId, RoomId, Seat};

/// The identity tuple of one simulated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The id we sent in `join_room`.
    pub player_id: PlayerId,

    /// Display name sent in `join_room`.
    pub nickname: String,

    /// The room we asked for. Empty means "server picks"; the first
    /// `room_info` fills it in.
    pub room_id: RoomId,

    /// `None` until the server confirms membership. Private so nothing
    /// outside this crate can reassign it.
    seat: Option<Seat>,
}

impl Session {
    /// Creates an unseated session.
    pub fn new(
        player_id: PlayerId,
        nickname: impl Into<String>,
        room_id: RoomId,
    ) -> Self {
        Self {
            player_id,
            nickname: nickname.into(),
            room_id,
            seat: None,
        }
    }

    /// The seat the server assigned, if it has.
    pub fn seat(&self) -> Option<Seat> {
        self.seat
    }

    /// Returns `true` once a seat has been assigned.
    pub fn is_seated(&self) -> bool {
        self.seat.is_some()
    }

    /// Returns `true` if `seat` is our own seat.
    ///
    /// Always `false` while unseated: an event addressed to "some seat"
    /// is never mistaken for ours before the roster confirms it.
    pub fn is_own(&self, seat: Seat) -> bool {
        self.seat == Some(seat)
    }

    /// Assigns the seat. Has no effect if one is already set.
    pub(crate) fn assign_seat(&mut self, seat: Seat) {
        if self.seat.is_none() {
            self.seat = Some(seat);
        }
    }
}
