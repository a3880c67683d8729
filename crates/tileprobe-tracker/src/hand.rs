//! The local seat's hand.
//!
//! Only server-confirmed events touch it: a deal sets it, a draw appends
//! to it, a confirmed discard of our own card removes one copy, a resolved
//! claim of ours removes the tiles it melded, and the round result empties
//! it. Sending `play_card` changes nothing here.

use tileprobe_protocol::Card;

/// Ordered tiles held by the local seat. Duplicates are normal (a full set
/// has four copies of every tile).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// An empty hand.
    pub fn new() -> Self {
        Self::default()
    }

    /// A hand holding `cards` in the given order.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn first(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    pub(crate) fn replace(&mut self, cards: &[Card]) {
        self.cards.clear();
        self.cards.extend_from_slice(cards);
    }

    pub(crate) fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Removes the first copy of `card`. Returns `false` (and leaves the
    /// hand untouched) if there is none.
    pub(crate) fn remove_one(&mut self, card: Card) -> bool {
        match self.cards.iter().position(|&c| c == card) {
            Some(index) => {
                self.cards.remove(index);
                true
            }
            None => false,
        }
    }

    /// Copies of `card` held.
    pub fn count(&self, card: Card) -> usize {
        self.cards.iter().filter(|&&c| c == card).count()
    }

    /// Removes the first `n` copies of `card`, or nothing at all if fewer
    /// than `n` are held.
    pub(crate) fn remove_n(&mut self, card: Card, n: usize) -> bool {
        if self.count(card) < n {
            return false;
        }
        for _ in 0..n {
            self.remove_one(card);
        }
        true
    }

    pub(crate) fn clear(&mut self) {
        self.cards.clear();
    }
}
