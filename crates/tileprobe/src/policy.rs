//! Decision policies: what to send back for a given server event.
//!
//! A [`Policy`] sees the tracker state *after* the event was applied,
//! plus the event itself, and returns a [`Decision`]. Policies never
//! touch the network or the clock; the dispatcher and scheduler do that.
//!
//! Policies compose: a pair `(A, B)` asks `A` first and falls back to `B`
//! only if `A` stays idle. The stock probe behaviour is
//! [`ProbePolicy`] = `(ImmediatePlayFirst, AlwaysDecline)`.

use std::fmt;

use tileprobe_delay::GuardKey;
use tileprobe_protocol::{ActionKind, Card, Envelope};
use tileprobe_tracker::TrackerState;

/// An outgoing action and the window it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub guard: GuardKey,
    pub envelope: Envelope,
}

impl Outgoing {
    /// A `play_card` answering our turn.
    pub fn discard(card: Card) -> Self {
        Self {
            guard: GuardKey::Discard,
            envelope: Envelope::play_card(card),
        }
    }

    /// A `choose_action` answering an action window.
    pub fn claim(action: ActionKind, card: Card) -> Self {
        Self {
            guard: GuardKey::Claim,
            envelope: Envelope::choose_action(action, card),
        }
    }
}

/// Something a policy wanted to do but could not. Nothing is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Anomaly {
    /// Our turn came up with nothing in hand.
    #[error("turn granted with an empty hand")]
    EmptyHand,
}

/// What a policy decided for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Act(Outgoing),
    Idle,
    Anomaly(Anomaly),
}

impl Decision {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Decides responses to server events.
pub trait Policy: Send + Sync + 'static {
    /// `state` already reflects `envelope`.
    fn decide(&self, state: &TrackerState, envelope: &Envelope) -> Decision;
}

/// The first policy that does not stay idle wins.
impl<A: Policy, B: Policy> Policy for (A, B) {
    fn decide(&self, state: &TrackerState, envelope: &Envelope) -> Decision {
        match self.0.decide(state, envelope) {
            Decision::Idle => self.1.decide(state, envelope),
            decided => decided,
        }
    }
}

// ---------------------------------------------------------------------------
// Built-ins
// ---------------------------------------------------------------------------

/// Discards the first card in hand whenever the turn is granted to us.
///
/// Turn-granting events are `your_turn`, and `game_start` / `deal_cards`
/// whose `currentUser` is our seat.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediatePlayFirst;

impl ImmediatePlayFirst {
    fn grants_turn(state: &TrackerState, envelope: &Envelope) -> bool {
        match envelope {
            Envelope::YourTurn { .. } => true,
            Envelope::GameStart { current_user, .. } => {
                state.session.is_own(*current_user)
            }
            Envelope::DealCards {
                current_user: Some(current),
                ..
            } => state.session.is_own(*current),
            _ => false,
        }
    }
}

impl Policy for ImmediatePlayFirst {
    fn decide(&self, state: &TrackerState, envelope: &Envelope) -> Decision {
        if !Self::grants_turn(state, envelope) {
            return Decision::Idle;
        }
        match state.hand.first() {
            Some(card) => Decision::Act(Outgoing::discard(card)),
            None => Decision::Anomaly(Anomaly::EmptyHand),
        }
    }
}

/// Passes on every action window, echoing the contested card.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysDecline;

impl Policy for AlwaysDecline {
    fn decide(&self, _state: &TrackerState, envelope: &Envelope) -> Decision {
        match envelope {
            Envelope::AskAction { action_card, .. } => {
                Decision::Act(Outgoing::claim(ActionKind::Guo, *action_card))
            }
            _ => Decision::Idle,
        }
    }
}

/// The stock probe: play the first card on our turn, pass on everything
/// else.
pub type ProbePolicy = (ImmediatePlayFirst, AlwaysDecline);

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Act(out) => write!(f, "{} via {}", out.envelope.tag(), out.guard),
            Self::Idle => f.write_str("idle"),
            Self::Anomaly(a) => write!(f, "anomaly: {a}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileprobe_protocol::{PlayerId, RoomId, RosterEntry, Seat};
    use tileprobe_tracker::Session;

    fn seated(seat: u8, hand: &[u8]) -> TrackerState {
        let state = TrackerState::new(Session::new("p1".into(), "P1", "r".into()));
        let roster = [RosterEntry {
            seat: Seat(seat),
            player_id: PlayerId::from("p1"),
            nickname: "P1".into(),
        }];
        state
            .on_room_info(&RoomId::from("r"), &roster)
            .state
            .on_game_start(
                Seat(0),
                Seat(3),
                &hand.iter().copied().map(Card).collect::<Vec<_>>(),
                80,
            )
            .state
    }

    fn your_turn() -> Envelope {
        Envelope::YourTurn {
            allowed_actions: vec![],
        }
    }

    #[test]
    fn test_play_first_on_your_turn() {
        let d = ImmediatePlayFirst.decide(&seated(0, &[5, 1, 2]), &your_turn());
        assert_eq!(d, Decision::Act(Outgoing::discard(Card(5))));
    }

    #[test]
    fn test_play_first_with_empty_hand_is_anomaly() {
        let d = ImmediatePlayFirst.decide(&seated(0, &[]), &your_turn());
        assert_eq!(d, Decision::Anomaly(Anomaly::EmptyHand));
    }

    #[test]
    fn test_play_first_ignores_other_seats_turn() {
        let state = seated(0, &[5]);
        let start = Envelope::GameStart {
            banker_user: Seat(0),
            current_user: Seat(1),
            cards: vec![Card(5)],
            left_card_count: 80,
            dice_count: None,
        };
        assert!(ImmediatePlayFirst.decide(&state, &start).is_idle());

        let draw = Envelope::DealCards {
            seat: Some(Seat(0)),
            current_user: Some(Seat(0)),
            cards: vec![],
            card: Some(Card(9)),
            left_card_count: None,
            action_mask: None,
            is_tail: None,
            gang_cards: vec![],
        };
        assert!(!ImmediatePlayFirst.decide(&state, &draw).is_idle());
    }

    #[test]
    fn test_decline_echoes_card() {
        let ask = Envelope::AskAction {
            action_card: Card(8),
            actions: vec![ActionKind::Peng],
            action_mask: None,
            gang_cards: vec![],
        };
        let d = AlwaysDecline.decide(&seated(0, &[1]), &ask);
        assert_eq!(d, Decision::Act(Outgoing::claim(ActionKind::Guo, Card(8))));
    }

    #[test]
    fn test_pair_falls_through_when_first_is_idle() {
        let policy: ProbePolicy = (ImmediatePlayFirst, AlwaysDecline);
        let state = seated(0, &[4]);
        let ask = Envelope::AskAction {
            action_card: Card(2),
            actions: vec![],
            action_mask: None,
            gang_cards: vec![],
        };
        assert_eq!(
            policy.decide(&state, &ask),
            Decision::Act(Outgoing::claim(ActionKind::Guo, Card(2)))
        );
        assert_eq!(
            policy.decide(&state, &your_turn()),
            Decision::Act(Outgoing::discard(Card(4)))
        );
        assert!(policy.decide(&state, &Envelope::Unknown { tag: "x".into() }).is_idle());
    }

    #[test]
    fn test_pair_stops_at_anomaly() {
        let policy = (ImmediatePlayFirst, ImmediatePlayFirst);
        assert_eq!(
            policy.decide(&seated(0, &[]), &your_turn()),
            Decision::Anomaly(Anomaly::EmptyHand)
        );
    }
}
