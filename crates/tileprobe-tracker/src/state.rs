//! The tracker state and its pure update functions.
//!
//! Every operation takes `&self` and returns a [`Transition`]: the next
//! state plus any [`Desync`] warnings the event raised. Nothing is mutated
//! in place, so a recorded stream of envelopes can be replayed against a
//! fresh state to reproduce exactly what a live session believed.

use tileprobe_protocol::{
    ActionKind, Card, Envelope, RoomId, RosterEntry, Seat,
};
use tracing::trace;

use crate::{ActionRequest, Desync, Hand, Phase, RoundOutcome, Session, TurnState};

/// `operate_code` of a resolved pung: two matching tiles leave the hand.
const OPERATE_PENG: u32 = 0x08;
/// `operate_code` of a resolved kong: three tiles leave the hand, or every
/// held copy when the kong is self-drawn.
const OPERATE_GANG: u32 = 0x10;

/// A deal addressed to one seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deal {
    /// A complete hand; replaces whatever was held.
    Full(Vec<Card>),
    /// A single drawn card; appended.
    Draw(Card),
}

/// Everything this client believes about the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerState {
    pub session: Session,
    pub hand: Hand,
    pub turn: TurnState,
    pub phase: Phase,
    /// Banker seat from the latest `game_start`.
    pub banker: Option<Seat>,
    /// Tiles left in the wall, as last reported.
    pub wall_remaining: Option<u32>,
    /// Outcome of the most recent finished round.
    pub last_outcome: Option<RoundOutcome>,
    pub rounds_completed: u32,
}

/// The result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Transition {
    pub state: TrackerState,
    pub warnings: Vec<Desync>,
}

impl Transition {
    fn clean(state: TrackerState) -> Self {
        Self {
            state,
            warnings: Vec::new(),
        }
    }

    fn warn(state: TrackerState, warning: Desync) -> Self {
        Self {
            state,
            warnings: vec![warning],
        }
    }
}

impl TrackerState {
    /// A fresh state for a session that has just connected.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            hand: Hand::new(),
            turn: TurnState::default(),
            phase: Phase::AwaitingRoom,
            banker: None,
            wall_remaining: None,
            last_outcome: None,
            rounds_completed: 0,
        }
    }

    /// Our seat, if assigned.
    pub fn seat(&self) -> Option<Seat> {
        self.session.seat()
    }

    /// Returns `true` if the turn pointer is on our seat.
    pub fn is_my_turn(&self) -> bool {
        self.turn
            .current_seat
            .is_some_and(|seat| self.session.is_own(seat))
    }

    /// Routes an envelope to the matching update.
    ///
    /// Client-direction tags echoed back, `error`, and unknown tags leave
    /// the state untouched.
    pub fn apply(&self, envelope: &Envelope) -> Transition {
        let transition = match envelope {
            Envelope::RoomInfo {
                room_id, players, ..
            } => self.on_room_info(room_id, players),

            Envelope::GameStart {
                banker_user,
                current_user,
                cards,
                left_card_count,
                ..
            } => self.on_game_start(
                *banker_user,
                *current_user,
                cards,
                *left_card_count,
            ),

            Envelope::DealCards {
                seat,
                current_user,
                cards,
                card,
                left_card_count,
                ..
            } => {
                let deal = match (cards.is_empty(), card) {
                    (false, _) => Some(Deal::Full(cards.clone())),
                    (true, Some(card)) => Some(Deal::Draw(*card)),
                    (true, None) => None,
                };
                let mut t = match deal {
                    Some(deal) => self.on_deal(seat.or(*current_user), deal),
                    None => Transition::clean(self.clone()),
                };
                if let Some(current) = current_user {
                    t = t.state.on_turn_advance(*current).merge(t.warnings);
                }
                if left_card_count.is_some() {
                    t.state.wall_remaining = *left_card_count;
                }
                t
            }

            Envelope::YourTurn { .. } => self.on_your_turn(),

            Envelope::PlayerPlayCard { seat, card } => {
                self.on_player_discard(*seat, *card)
            }

            Envelope::AskAction {
                action_card,
                actions,
                action_mask,
                ..
            } => self.on_action_request(*action_card, actions, *action_mask),

            Envelope::ActionConfirmed { .. } => self.on_action_sent(),

            Envelope::ActionResult {
                operate_user,
                operate_code,
                operate_card,
                provide_user,
            } => self.on_action_result(
                *operate_user,
                *operate_code,
                *operate_card,
                *provide_user,
            ),

            Envelope::RoundResult {
                winner_seat,
                provide_user,
                hu_card,
                scores,
                detail,
            } => self.on_round_result(RoundOutcome {
                winner: *winner_seat,
                provider: *provide_user,
                winning_card: *hu_card,
                scores: scores.clone(),
                detail: detail.clone(),
            }),

            Envelope::JoinRoom { .. }
            | Envelope::PlayCard { .. }
            | Envelope::ChooseAction { .. }
            | Envelope::Error { .. }
            | Envelope::Unknown { .. } => Transition::clean(self.clone()),
        };

        if transition.state.phase != self.phase {
            trace!(
                player = %self.session.player_id,
                tag = envelope.tag(),
                from = %self.phase,
                to = %transition.state.phase,
                "phase change"
            );
        }
        transition
    }

    /// Applies `envelopes` in order, collecting every warning.
    pub fn replay<'a>(
        &self,
        envelopes: impl IntoIterator<Item = &'a Envelope>,
    ) -> Transition {
        envelopes
            .into_iter()
            .fold(Transition::clean(self.clone()), |acc, envelope| {
                acc.state.apply(envelope).merge(acc.warnings)
            })
    }

    // -----------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------

    /// Resolves our seat from a roster.
    ///
    /// Replaying an identical roster changes nothing. A roster that omits
    /// us, or puts us in another seat, is reported and otherwise ignored.
    pub fn on_room_info(
        &self,
        room_id: &RoomId,
        players: &[RosterEntry],
    ) -> Transition {
        let mut next = self.clone();
        let session = &mut next.session;

        if session.room_id.is_unassigned() {
            session.room_id = room_id.clone();
        } else if session.room_id != *room_id {
            let warning = Desync::ForeignRoom {
                joined: session.room_id.clone(),
                reported: room_id.clone(),
            };
            return Transition::warn(next, warning);
        }

        let Some(entry) = players
            .iter()
            .find(|p| p.player_id == session.player_id)
        else {
            let warning = Desync::NotInRoster {
                player: session.player_id.clone(),
                room: room_id.clone(),
            };
            return Transition::warn(next, warning);
        };

        let mut warnings = Vec::new();
        match session.seat() {
            None => session.assign_seat(entry.seat),
            Some(assigned) if assigned != entry.seat => {
                warnings.push(Desync::SeatConflict {
                    player: session.player_id.clone(),
                    assigned,
                    reported: entry.seat,
                });
            }
            Some(_) => {}
        }

        if matches!(next.phase, Phase::AwaitingRoom | Phase::RoundEnded) {
            next.phase = Phase::InRoom;
        }
        Transition {
            state: next,
            warnings,
        }
    }

    /// Starts a round. The server sends each player only their own tiles,
    /// so `cards` always become our hand.
    pub fn on_game_start(
        &self,
        banker: Seat,
        current: Seat,
        cards: &[Card],
        left_card_count: u32,
    ) -> Transition {
        let mut next = self.clone();
        next.hand.replace(cards);
        next.banker = Some(banker);
        next.wall_remaining = Some(left_card_count);
        next.turn = TurnState {
            current_seat: Some(current),
            pending: None,
        };
        next.phase = next.turn_phase();
        Transition::clean(next)
    }

    /// Applies a deal addressed to `seat`. Other seats' deals leave the
    /// hand alone.
    pub fn on_deal(&self, seat: Option<Seat>, deal: Deal) -> Transition {
        let mut next = self.clone();
        if !next.session.is_seated() {
            return Transition::warn(next, Desync::Unseated { event: "deal_cards" });
        }
        let Some(seat) = seat else {
            return Transition::clean(next);
        };
        if next.session.is_own(seat) {
            match deal {
                Deal::Full(cards) => next.hand.replace(&cards),
                Deal::Draw(card) => next.hand.push(card),
            }
        }
        next.phase = next.turn_phase();
        Transition::clean(next)
    }

    /// Moves the turn pointer.
    pub fn on_turn_advance(&self, current: Seat) -> Transition {
        let mut next = self.clone();
        next.turn.current_seat = Some(current);
        if next.phase.in_round() {
            next.phase = next.turn_phase();
        }
        Transition::clean(next)
    }

    /// `your_turn`: the pointer is on us.
    pub fn on_your_turn(&self) -> Transition {
        let Some(seat) = self.seat() else {
            return Transition::warn(
                self.clone(),
                Desync::Unseated { event: "your_turn" },
            );
        };
        let mut next = self.clone();
        next.turn.current_seat = Some(seat);
        next.phase = next.turn_phase();
        Transition::clean(next)
    }

    /// `player_play_card`: somebody discarded.
    ///
    /// Closes any stale action window and removes the card from our hand
    /// if the discarder is us. The discarder keeps the pointer until the
    /// next deal, but nobody holds a playable turn, so the phase is
    /// `AwaitingMyTurn` either way.
    pub fn on_player_discard(&self, seat: Seat, card: Card) -> Transition {
        let mut t = if self.session.is_own(seat) {
            self.on_own_discard_confirmed(card)
        } else {
            Transition::clean(self.clone())
        };
        t.state.turn.current_seat = Some(seat);
        t.state.turn.pending = None;
        t.state.phase = Phase::AwaitingMyTurn;
        t
    }

    /// Removes exactly one copy of `card` from the hand.
    pub fn on_own_discard_confirmed(&self, card: Card) -> Transition {
        let mut next = self.clone();
        if next.hand.remove_one(card) {
            Transition::clean(next)
        } else {
            Transition::warn(next, Desync::CardNotInHand { card })
        }
    }

    /// Opens an action window, replacing any open one.
    ///
    /// The wire carries no target seat, so the request is taken as
    /// addressed to us. The only check possible is that we are seated at
    /// all; an unseated request is still recorded and reported.
    pub fn on_action_request(
        &self,
        card: Card,
        legal: &[ActionKind],
        mask: Option<u32>,
    ) -> Transition {
        let mut next = self.clone();
        next.turn.pending = Some(ActionRequest {
            card,
            legal: legal.to_vec(),
            mask,
        });
        next.phase = Phase::AwaitingActionDecision;
        if next.session.is_seated() {
            Transition::clean(next)
        } else {
            Transition::warn(next, Desync::Unseated { event: "ask_action" })
        }
    }

    /// A response to the open window has been handed off (or the server
    /// echoed it back).
    pub fn on_action_sent(&self) -> Transition {
        let mut next = self.clone();
        next.turn.pending = None;
        if next.phase.in_round() {
            next.phase = next.turn_phase();
        }
        Transition::clean(next)
    }

    /// A claim was resolved; the claimer takes the turn.
    ///
    /// When the claimer is us, the tiles melded with `operate_card` leave
    /// the hand: two for a pung, three for a kong on another seat's
    /// discard, every held copy for a self-drawn kong. If the hand cannot
    /// cover the claim it is left as it was and the mismatch is reported.
    pub fn on_action_result(
        &self,
        operate_user: Seat,
        operate_code: u32,
        operate_card: Card,
        provide_user: Option<Seat>,
    ) -> Transition {
        let mut next = self.clone();
        next.turn.pending = None;
        next.turn.current_seat = Some(operate_user);
        if next.phase.in_round() {
            next.phase = next.turn_phase();
        }
        if !self.session.is_own(operate_user) {
            return Transition::clean(next);
        }

        let consumed = match operate_code {
            OPERATE_PENG => 2,
            OPERATE_GANG if provide_user.is_some_and(|p| self.session.is_own(p)) => {
                next.hand.count(operate_card).max(1)
            }
            OPERATE_GANG => 3,
            _ => 0,
        };
        if next.hand.remove_n(operate_card, consumed) {
            trace!(card = %operate_card, consumed, "claimed tiles left the hand");
            Transition::clean(next)
        } else {
            Transition::warn(next, Desync::CardNotInHand { card: operate_card })
        }
    }

    /// Ends the round: the hand and any open window are dropped, the
    /// outcome is kept. Identity is untouched.
    pub fn on_round_result(&self, outcome: RoundOutcome) -> Transition {
        let mut next = self.clone();
        next.hand.clear();
        next.turn = TurnState::default();
        next.last_outcome = Some(outcome);
        next.rounds_completed += 1;
        next.phase = Phase::RoundEnded;
        Transition::clean(next)
    }

    // -----------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------

    /// The in-round phase implied by the turn state.
    fn turn_phase(&self) -> Phase {
        if self.turn.pending.is_some() {
            Phase::AwaitingActionDecision
        } else if self.is_my_turn() {
            Phase::Dealt
        } else {
            Phase::AwaitingMyTurn
        }
    }
}

impl Transition {
    /// Prepends earlier warnings so the combined list stays in arrival
    /// order.
    fn merge(mut self, mut earlier: Vec<Desync>) -> Self {
        earlier.append(&mut self.warnings);
        self.warnings = earlier;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tileprobe_protocol::{PlayerId, Score};

    fn cards(values: &[u8]) -> Vec<Card> {
        values.iter().copied().map(Card).collect()
    }

    fn roster(entries: &[(u8, &str)]) -> Vec<RosterEntry> {
        entries
            .iter()
            .map(|&(seat, id)| RosterEntry {
                seat: Seat(seat),
                player_id: PlayerId::from(id),
                nickname: id.to_uppercase(),
            })
            .collect()
    }

    fn fresh() -> TrackerState {
        TrackerState::new(Session::new("p1".into(), "P1", "room".into()))
    }

    /// A state seated at `seat` and holding `hand`, mid-round.
    fn seated_with(seat: u8, hand: &[u8]) -> TrackerState {
        fresh()
            .on_room_info(&"room".into(), &roster(&[(seat, "p1")]))
            .state
            .on_game_start(Seat(0), Seat(0), &cards(hand), 80)
            .state
    }

    // =====================================================================
    // room_info
    // =====================================================================

    #[test]
    fn test_room_info_assigns_seat() {
        let t = fresh().on_room_info(&"room".into(), &roster(&[(0, "p1")]));
        assert!(t.warnings.is_empty());
        assert_eq!(t.state.seat(), Some(Seat(0)));
        assert_eq!(t.state.phase, Phase::InRoom);
    }

    #[test]
    fn test_room_info_without_us_leaves_seat_unset() {
        let t = fresh().on_room_info(&"room".into(), &roster(&[(0, "p9")]));
        assert_eq!(t.state.seat(), None);
        assert_eq!(t.state.phase, Phase::AwaitingRoom);
        assert!(matches!(t.warnings[..], [Desync::NotInRoster { .. }]));
    }

    #[test]
    fn test_room_info_never_moves_assigned_seat() {
        let seated = fresh()
            .on_room_info(&"room".into(), &roster(&[(1, "p1")]))
            .state;
        let t = seated.on_room_info(&"room".into(), &roster(&[(3, "p1")]));
        assert_eq!(t.state.seat(), Some(Seat(1)));
        assert_eq!(
            t.warnings,
            vec![Desync::SeatConflict {
                player: "p1".into(),
                assigned: Seat(1),
                reported: Seat(3),
            }]
        );
    }

    #[test]
    fn test_room_info_fills_unassigned_room_id() {
        let state =
            TrackerState::new(Session::new("p1".into(), "P1", RoomId::default()));
        let t = state.on_room_info(&"room_7".into(), &roster(&[(2, "p1")]));
        assert_eq!(t.state.session.room_id, RoomId::from("room_7"));
        assert_eq!(t.state.seat(), Some(Seat(2)));
    }

    #[test]
    fn test_room_info_for_other_room_is_ignored() {
        let t = fresh().on_room_info(&"elsewhere".into(), &roster(&[(0, "p1")]));
        assert_eq!(t.state.seat(), None);
        assert!(matches!(t.warnings[..], [Desync::ForeignRoom { .. }]));
    }

    // =====================================================================
    // Deals
    // =====================================================================

    #[test]
    fn test_game_start_sets_hand_and_turn() {
        let state = seated_with(0, &[5, 1, 2]);
        assert_eq!(state.hand.cards(), cards(&[5, 1, 2]).as_slice());
        assert_eq!(state.turn.current_seat, Some(Seat(0)));
        assert_eq!(state.banker, Some(Seat(0)));
        assert_eq!(state.wall_remaining, Some(80));
        assert_eq!(state.phase, Phase::Dealt);
    }

    #[test]
    fn test_deal_to_own_seat_sets_then_draw_appends() {
        let seated = fresh()
            .on_room_info(&"room".into(), &roster(&[(2, "p1")]))
            .state;
        let dealt = seated.on_deal(Some(Seat(2)), Deal::Full(cards(&[1, 2])));
        let drawn = dealt.state.on_deal(Some(Seat(2)), Deal::Draw(Card(3)));
        assert_eq!(drawn.state.hand.cards(), cards(&[1, 2, 3]).as_slice());
    }

    #[test]
    fn test_deal_to_other_seat_leaves_hand() {
        let state = seated_with(0, &[1]);
        let t = state.on_deal(Some(Seat(1)), Deal::Draw(Card(9)));
        assert_eq!(t.state.hand.cards(), cards(&[1]).as_slice());
    }

    #[test]
    fn test_deal_before_seat_is_reported() {
        let t = fresh().on_deal(Some(Seat(0)), Deal::Full(cards(&[1])));
        assert!(t.state.hand.is_empty());
        assert_eq!(t.warnings, vec![Desync::Unseated { event: "deal_cards" }]);
    }

    // =====================================================================
    // Discards
    // =====================================================================

    #[test]
    fn test_confirmed_discard_removes_one_copy() {
        let state = seated_with(0, &[3, 7, 9]);
        let t = state.on_player_discard(Seat(0), Card(7));
        assert!(t.warnings.is_empty());
        assert_eq!(t.state.hand.cards(), cards(&[3, 9]).as_slice());
    }

    #[test]
    fn test_confirmed_discard_of_absent_card_warns() {
        let state = seated_with(0, &[3, 7, 9]);
        let t = state.on_player_discard(Seat(0), Card(42));
        assert_eq!(t.state.hand.cards(), cards(&[3, 7, 9]).as_slice());
        assert_eq!(t.warnings, vec![Desync::CardNotInHand { card: Card(42) }]);
    }

    #[test]
    fn test_other_seat_discard_moves_pointer_only() {
        let state = seated_with(0, &[3, 7]);
        let t = state.on_player_discard(Seat(2), Card(7));
        assert_eq!(t.state.hand.len(), 2);
        assert_eq!(t.state.turn.current_seat, Some(Seat(2)));
        assert_eq!(t.state.phase, Phase::AwaitingMyTurn);
    }

    // =====================================================================
    // Action windows
    // =====================================================================

    #[test]
    fn test_new_request_replaces_stale_one() {
        let state = seated_with(0, &[1]);
        let first = state.on_action_request(Card(8), &[ActionKind::Peng], None);
        let second = first.state.on_action_request(Card(4), &[], Some(1));
        let pending = second.state.turn.pending.as_ref().unwrap();
        assert_eq!(pending.card, Card(4));
        assert_eq!(second.state.phase, Phase::AwaitingActionDecision);
    }

    #[test]
    fn test_action_sent_closes_window() {
        let state = seated_with(0, &[1])
            .on_player_discard(Seat(1), Card(8))
            .state
            .on_action_request(Card(8), &[], None)
            .state;
        let t = state.on_action_sent();
        assert!(t.state.turn.pending.is_none());
        assert_eq!(t.state.phase, Phase::AwaitingMyTurn);
    }

    #[test]
    fn test_action_result_hands_turn_to_claimer() {
        let state = seated_with(0, &[1])
            .on_action_request(Card(8), &[], None)
            .state;
        let t = state.on_action_result(Seat(0), 0, Card(8), Some(Seat(1)));
        assert!(t.state.turn.pending.is_none());
        assert_eq!(t.state.phase, Phase::Dealt);
        assert!(t.warnings.is_empty());
    }

    #[test]
    fn test_own_pung_removes_two_copies() {
        let state = seated_with(0, &[8, 8, 3])
            .on_player_discard(Seat(1), Card(8))
            .state
            .on_action_request(Card(8), &[ActionKind::Peng], None)
            .state;
        let t = state.on_action_result(Seat(0), OPERATE_PENG, Card(8), Some(Seat(1)));
        assert!(t.warnings.is_empty());
        assert_eq!(t.state.hand.cards(), cards(&[3]).as_slice());
        assert_eq!(t.state.turn.current_seat, Some(Seat(0)));
    }

    #[test]
    fn test_kong_removes_three_or_every_held_copy() {
        let state = seated_with(0, &[5, 5, 5, 2]);
        let t = state.on_action_result(Seat(0), OPERATE_GANG, Card(5), Some(Seat(3)));
        assert_eq!(t.state.hand.cards(), cards(&[2]).as_slice());

        let state = seated_with(0, &[5, 5, 2, 5, 5]);
        let t = state.on_action_result(Seat(0), OPERATE_GANG, Card(5), Some(Seat(0)));
        assert!(t.warnings.is_empty());
        assert_eq!(t.state.hand.cards(), cards(&[2]).as_slice());
    }

    #[test]
    fn test_claim_without_tiles_warns_and_keeps_hand() {
        let state = seated_with(0, &[8, 3]);
        let t = state.on_action_result(Seat(0), OPERATE_PENG, Card(8), Some(Seat(1)));
        assert_eq!(t.state.hand.cards(), cards(&[8, 3]).as_slice());
        assert_eq!(t.warnings, vec![Desync::CardNotInHand { card: Card(8) }]);
        assert_eq!(t.state.turn.current_seat, Some(Seat(0)));
    }

    #[test]
    fn test_other_seat_claim_leaves_hand() {
        let state = seated_with(0, &[8, 8]);
        let t = state.on_action_result(Seat(2), OPERATE_PENG, Card(8), Some(Seat(1)));
        assert!(t.warnings.is_empty());
        assert_eq!(t.state.hand.len(), 2);
        assert_eq!(t.state.turn.current_seat, Some(Seat(2)));
    }

    // =====================================================================
    // Round end
    // =====================================================================

    #[test]
    fn test_round_result_clears_hand_keeps_identity() {
        let state = seated_with(1, &[1, 2, 3])
            .on_action_request(Card(5), &[], None)
            .state;
        let outcome = RoundOutcome {
            winner: Some(Seat(1)),
            provider: Some(Seat(2)),
            winning_card: Some(Card(5)),
            scores: vec![Score::Plain(0), Score::Plain(4)],
            detail: None,
        };
        let t = state.on_round_result(outcome.clone());
        assert!(t.state.hand.is_empty());
        assert!(t.state.turn.pending.is_none());
        assert_eq!(t.state.seat(), Some(Seat(1)));
        assert_eq!(t.state.last_outcome, Some(outcome));
        assert_eq!(t.state.rounds_completed, 1);
        assert_eq!(t.state.phase, Phase::RoundEnded);

        let back = t.state.on_room_info(&"room".into(), &roster(&[(1, "p1")]));
        assert_eq!(back.state.phase, Phase::InRoom);
    }

    // =====================================================================
    // apply()
    // =====================================================================

    #[test]
    fn test_unknown_and_error_envelopes_change_nothing() {
        let state = seated_with(0, &[1, 2]);
        for env in [
            Envelope::Unknown { tag: "chat".into() },
            Envelope::Error {
                code: tileprobe_protocol::ErrorCode::Text("X".into()),
                message: "m".into(),
            },
            Envelope::play_card(Card(1)),
        ] {
            let t = state.apply(&env);
            assert_eq!(t.state, state);
            assert!(t.warnings.is_empty());
        }
    }

    #[test]
    fn test_apply_draw_with_current_user_moves_pointer() {
        let state = seated_with(0, &[1]);
        let t = state.apply(&Envelope::DealCards {
            seat: None,
            current_user: Some(Seat(0)),
            cards: vec![],
            card: Some(Card(6)),
            left_card_count: Some(70),
            action_mask: None,
            is_tail: None,
            gang_cards: vec![],
        });
        assert_eq!(t.state.hand.cards(), cards(&[1, 6]).as_slice());
        assert_eq!(t.state.turn.current_seat, Some(Seat(0)));
        assert_eq!(t.state.wall_remaining, Some(70));
    }

    #[test]
    fn test_your_turn_before_seat_warns() {
        let t = fresh().apply(&Envelope::YourTurn {
            allowed_actions: vec![],
        });
        assert_eq!(t.warnings, vec![Desync::Unseated { event: "your_turn" }]);
        assert_eq!(t.state.turn.current_seat, None);
    }
}
