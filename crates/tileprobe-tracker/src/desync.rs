//! Desynchronization warnings.
//!
//! A `Desync` means the server told us something that does not fit what
//! we believe. It is never fatal: the tracker leaves its state as it was
//! (or applies the part it can) and reports the warning to the caller.

use tileprobe_protocol::{Card, PlayerId, RoomId, Seat};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Desync {
    /// A roster for our room does not list our player id.
    #[error("player {player} not in roster of room {room}")]
    NotInRoster { player: PlayerId, room: RoomId },

    /// A roster places us in a different seat than the one already
    /// assigned. The assigned seat is kept.
    #[error("roster moved {player} from {assigned} to {reported}; keeping {assigned}")]
    SeatConflict {
        player: PlayerId,
        assigned: Seat,
        reported: Seat,
    },

    /// A `room_info` for a room we did not join.
    #[error("room_info for room {reported} while joined to {joined}")]
    ForeignRoom { joined: RoomId, reported: RoomId },

    /// The server confirmed our discard, or a claim of ours, that needs a
    /// card we do not hold (or not enough copies of it).
    #[error("confirmed card {card} not present in hand")]
    CardNotInHand { card: Card },

    /// A seat-addressed event arrived before we know our seat.
    #[error("{event} arrived before a seat was assigned")]
    Unseated { event: &'static str },
}
