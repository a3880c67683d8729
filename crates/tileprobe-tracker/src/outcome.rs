//! Terminal record of a finished round.

use tileprobe_protocol::{Card, RoundDetail, Score, Seat};

/// What the server declared at `round_result`. Stored as reported; the
/// tracker does not check it against any rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub winner: Option<Seat>,
    pub provider: Option<Seat>,
    pub winning_card: Option<Card>,
    pub scores: Vec<Score>,
    pub detail: Option<RoundDetail>,
}

impl RoundOutcome {
    /// The score reported for `seat`.
    ///
    /// Detailed entries are matched by their `seat` field; plain entries
    /// by array position.
    pub fn score_for(&self, seat: Seat) -> Option<i64> {
        self.scores.iter().enumerate().find_map(|(index, score)| match score {
            Score::Detailed(s) if s.seat == seat => Some(s.score),
            Score::Plain(v) if index == usize::from(seat.0) => Some(*v),
            _ => None,
        })
    }

    /// Returns `true` if the round ended without a winner.
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }
}
