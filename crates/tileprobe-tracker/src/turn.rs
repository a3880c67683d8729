//! Turn pointer, the open action window, and the per-round phase.

use std::fmt;

use tileprobe_protocol::{ActionKind, Card, Seat};

/// An open `ask_action` the local seat has not answered yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    /// The discard in contention.
    pub card: Card,
    /// The reactions the server offered. May be empty (older servers
    /// only send a bit mask).
    pub legal: Vec<ActionKind>,
    /// The raw action mask, when the server sends one.
    pub mask: Option<u32>,
}

impl ActionRequest {
    /// Returns `true` if `action` may be sent. Passing is always allowed,
    /// and an empty offer list is treated as "anything goes".
    pub fn allows(&self, action: &ActionKind) -> bool {
        *action == ActionKind::Guo
            || self.legal.is_empty()
            || self.legal.contains(action)
    }
}

/// Who holds the turn, and whether we owe the server an answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnState {
    pub current_seat: Option<Seat>,
    /// At most one request is open; a new one replaces the old.
    pub pending: Option<ActionRequest>,
}

/// Position in the per-round state machine:
///
/// ```text
/// AwaitingRoom → InRoom → Dealt ⇄ AwaitingMyTurn ⇄ AwaitingActionDecision
///                  ↑                                        │
///                  └──────────── RoundEnded ←───────────────┘
/// ```
///
/// - **Dealt**: we hold cards and the turn.
/// - **AwaitingMyTurn**: another seat holds the turn.
/// - **AwaitingActionDecision**: an `ask_action` is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    AwaitingRoom,
    InRoom,
    Dealt,
    AwaitingMyTurn,
    AwaitingActionDecision,
    RoundEnded,
}

impl Phase {
    /// Returns `true` between the first deal and the round result.
    pub fn in_round(self) -> bool {
        matches!(
            self,
            Self::Dealt | Self::AwaitingMyTurn | Self::AwaitingActionDecision
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AwaitingRoom => "AwaitingRoom",
            Self::InRoom => "InRoom",
            Self::Dealt => "Dealt",
            Self::AwaitingMyTurn => "AwaitingMyTurn",
            Self::AwaitingActionDecision => "AwaitingActionDecision",
            Self::RoundEnded => "RoundEnded",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_is_always_allowed() {
        let req = ActionRequest {
            card: Card(8),
            legal: vec![ActionKind::Peng],
            mask: None,
        };
        assert!(req.allows(&ActionKind::Guo));
        assert!(req.allows(&ActionKind::Peng));
        assert!(!req.allows(&ActionKind::Hu));
    }

    #[test]
    fn test_empty_offer_allows_anything() {
        let req = ActionRequest {
            card: Card(8),
            legal: vec![],
            mask: Some(8),
        };
        assert!(req.allows(&ActionKind::Gang));
    }

    #[test]
    fn test_in_round_phases() {
        assert!(!Phase::AwaitingRoom.in_round());
        assert!(!Phase::InRoom.in_round());
        assert!(Phase::Dealt.in_round());
        assert!(Phase::AwaitingActionDecision.in_round());
        assert!(!Phase::RoundEnded.in_round());
    }
}
