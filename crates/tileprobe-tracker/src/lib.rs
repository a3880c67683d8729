//! Client-side game-state tracking for tileprobe.
//!
//! This crate holds what one simulated player believes about the game:
//!
//! 1. **Identity**: player id, room, and the seat the server assigned
//!    ([`Session`])
//! 2. **Hand**: the tiles we hold, as an ordered multiset ([`Hand`])
//! 3. **Turn**: whose turn it is and whether an action window is open
//!    ([`TurnState`], [`Phase`])
//! 4. **Outcome**: what the server declared when the round ended
//!    ([`RoundOutcome`])
//!
//! All of it lives in one [`TrackerState`] value. Updates are pure: each
//! takes `&self` and returns a [`Transition`] holding the next state and
//! any [`Desync`] warnings. The tracker never sends anything and never
//! panics on server input it disagrees with.
//!
//! # How it fits in the stack
//!
//! ```text
//! Policy / Dispatcher (above)  ← reads the state to decide responses
//!     ↕
//! Tracker (this crate)         ← turns decoded envelopes into state
//!     ↕
//! Protocol (below)             ← provides Envelope, Seat, Card
//! ```

mod desync;
mod hand;
mod outcome;
mod session;
mod state;
mod turn;

pub use desync::Desync;
pub use hand::Hand;
pub use outcome::RoundOutcome;
pub use session::Session;
pub use state::{Deal, TrackerState, Transition};
pub use turn::{ActionRequest, Phase, TurnState};
