//! Core protocol types for the tile-game wire format.
//!
//! Every frame on the wire is one JSON object with a `"type"` tag and a
//! handful of camelCase fields that depend on the tag. This module turns
//! that loose shape into a closed Rust enum, [`Envelope`], with one
//! variant per message the probe knows about.
//!
//! Several server events come in more than one shape (older server builds
//! send `handCards` instead of `cards`, `card` instead of `actionCard`,
//! `huUser` instead of `winnerSeat`). Those spellings are accepted on
//! decode through `#[serde(alias = ...)]`; encoding always produces the
//! canonical spelling.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A tile identifier as the server encodes it (a small integer).
///
/// `#[serde(transparent)]` makes `Card(7)` travel as plain `7`. `Card(0)`
/// stands in for a card the server left out.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Card(pub u8);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A seat index inside a room. Seat order is turn order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Seat(pub u8);

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat-{}", self.0)
    }
}

/// The player identifier the client chooses when joining.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A room identifier. The empty string asks the server to pick one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    /// Returns `true` if no room has been chosen yet.
    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Payload building blocks
// ---------------------------------------------------------------------------

/// Room lifecycle as reported in `room_info.state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomPhase {
    Waiting,
    Playing,
    Finished,
}

/// One line of the `room_info.players` roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub seat: Seat,
    pub player_id: PlayerId,
    #[serde(default)]
    pub nickname: String,
}

/// A reaction to another seat's discard.
///
/// The four codes the server understands get their own variants. Any other
/// string survives a decode/encode cycle as [`ActionKind::Other`], so a
/// server that offers e.g. `"CHI"` does not make the whole `ask_action`
/// frame undecodable.
///
/// `#[serde(from = "String", into = "String")]` routes serde through the
/// `From` impls below instead of the usual enum representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionKind {
    /// Claim the discard to complete a triplet.
    Peng,
    /// Claim the discard to complete a quad.
    Gang,
    /// Declare a win on the discard.
    Hu,
    /// Pass.
    Guo,
    /// A code this client does not interpret.
    Other(String),
}

impl ActionKind {
    /// The wire spelling.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Peng => "PENG",
            Self::Gang => "GANG",
            Self::Hu => "HU",
            Self::Guo => "GUO",
            Self::Other(code) => code,
        }
    }
}

impl From<String> for ActionKind {
    fn from(code: String) -> Self {
        match code.as_str() {
            "PENG" => Self::Peng,
            "GANG" => Self::Gang,
            "HU" => Self::Hu,
            "GUO" => Self::Guo,
            _ => Self::Other(code),
        }
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Other(code) => code,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-seat settlement line in a detailed `round_result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatScore {
    pub seat: Seat,
    pub score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hu_right: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hu_kind: Option<u8>,
}

/// A `round_result.scores` entry.
///
/// Some server builds send a bare score per seat (array index = seat),
/// others send a [`SeatScore`] object. `#[serde(untagged)]` tries each
/// variant in order until one fits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Detailed(SeatScore),
    Plain(i64),
}

impl Score {
    /// The score value, regardless of shape.
    pub fn value(&self) -> i64 {
        match self {
            Self::Detailed(s) => s.score,
            Self::Plain(v) => *v,
        }
    }
}

/// Optional fan breakdown attached to `round_result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_fan: Option<u32>,
    #[serde(default)]
    pub fan_types: Vec<String>,
}

/// The `error.code` field. Current servers send a symbolic string such as
/// `"ROOM_FULL"`; numeric codes are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Text(String),
    Number(i64),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(code) => f.write_str(code),
            Self::Number(code) => write!(f, "{code}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope: the top-level wire format
// ---------------------------------------------------------------------------

/// One frame on the wire.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
///   `{ "type": "play_card", "card": 5 }`
/// `rename_all = "snake_case"` gives the variant tags, and
/// `rename_all_fields = "camelCase"` gives the field names inside each
/// variant.
///
/// Optional fields that are absent on the wire decode as `None` or an
/// empty `Vec`; required fields that are missing make the frame fail
/// decoding (see [`crate::DecodeError`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum Envelope {
    // -- Client → Server --
    /// "Put me in this room." An empty `room_id` lets the server choose.
    JoinRoom {
        room_id: RoomId,
        player_id: PlayerId,
        nickname: String,
    },

    /// "I discard this card."
    PlayCard { card: Card },

    /// "My reaction to the discard on offer is `action`."
    ChooseAction { action: ActionKind, card: Card },

    // -- Server → Client --
    /// Roster and room state, re-sent whenever someone joins or leaves.
    RoomInfo {
        room_id: RoomId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        state: Option<RoomPhase>,
        #[serde(default)]
        players: Vec<RosterEntry>,
    },

    /// The round begins. `cards` is the receiving player's own hand.
    GameStart {
        banker_user: Seat,
        current_user: Seat,
        #[serde(default)]
        cards: Vec<Card>,
        #[serde(default)]
        left_card_count: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        dice_count: Option<u32>,
    },

    /// A deal. Either a full hand (`cards`, addressed by `seat`) or a
    /// single draw (`card`, addressed by `current_user`).
    DealCards {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seat: Option<Seat>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_user: Option<Seat>,
        #[serde(default, alias = "handCards", skip_serializing_if = "Vec::is_empty")]
        cards: Vec<Card>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        card: Option<Card>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        left_card_count: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action_mask: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_tail: Option<bool>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        gang_cards: Vec<Card>,
    },

    /// The local seat holds the turn and must discard.
    YourTurn {
        #[serde(default)]
        allowed_actions: Vec<String>,
    },

    /// Someone (possibly us) discarded `card`.
    PlayerPlayCard { seat: Seat, card: Card },

    /// The server asks whether we react to `action_card`. A request
    /// without a card reads as `Card(0)`.
    AskAction {
        #[serde(default, alias = "card")]
        action_card: Card,
        #[serde(default)]
        actions: Vec<ActionKind>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action_mask: Option<u32>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        gang_cards: Vec<Card>,
    },

    /// Echo of a `choose_action`, sent by servers running without a rules
    /// engine.
    ActionConfirmed { action: ActionKind, card: Card },

    /// A claim was resolved.
    ActionResult {
        operate_user: Seat,
        operate_code: u32,
        operate_card: Card,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provide_user: Option<Seat>,
    },

    /// The round is over.
    RoundResult {
        #[serde(default, alias = "huUser", skip_serializing_if = "Option::is_none")]
        winner_seat: Option<Seat>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provide_user: Option<Seat>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hu_card: Option<Card>,
        #[serde(default)]
        scores: Vec<Score>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<RoundDetail>,
    },

    /// The server rejected something we sent.
    Error { code: ErrorCode, message: String },

    /// A well-formed frame whose tag this client does not know.
    ///
    /// Never produced by serde directly (`skip`); the codec builds it
    /// after checking the tag against [`Envelope::KNOWN_TAGS`].
    #[serde(skip)]
    Unknown { tag: String },
}

impl Envelope {
    /// Every tag with a dedicated variant.
    pub const KNOWN_TAGS: &'static [&'static str] = &[
        "join_room",
        "play_card",
        "choose_action",
        "room_info",
        "game_start",
        "deal_cards",
        "your_turn",
        "player_play_card",
        "ask_action",
        "action_confirmed",
        "action_result",
        "round_result",
        "error",
    ];

    /// Returns `true` if `tag` names a variant of this enum.
    pub fn is_known_tag(tag: &str) -> bool {
        Self::KNOWN_TAGS.contains(&tag)
    }

    /// The `"type"` tag this envelope travels under.
    pub fn tag(&self) -> &str {
        match self {
            Self::JoinRoom { .. } => "join_room",
            Self::PlayCard { .. } => "play_card",
            Self::ChooseAction { .. } => "choose_action",
            Self::RoomInfo { .. } => "room_info",
            Self::GameStart { .. } => "game_start",
            Self::DealCards { .. } => "deal_cards",
            Self::YourTurn { .. } => "your_turn",
            Self::PlayerPlayCard { .. } => "player_play_card",
            Self::AskAction { .. } => "ask_action",
            Self::ActionConfirmed { .. } => "action_confirmed",
            Self::ActionResult { .. } => "action_result",
            Self::RoundResult { .. } => "round_result",
            Self::Error { .. } => "error",
            Self::Unknown { tag } => tag,
        }
    }

    /// Builds a `join_room` request.
    pub fn join_room(
        room_id: RoomId,
        player_id: PlayerId,
        nickname: impl Into<String>,
    ) -> Self {
        Self::JoinRoom {
            room_id,
            player_id,
            nickname: nickname.into(),
        }
    }

    /// Builds a `play_card` request.
    pub fn play_card(card: Card) -> Self {
        Self::PlayCard { card }
    }

    /// Builds a `choose_action` request.
    pub fn choose_action(action: ActionKind, card: Card) -> Self {
        Self::ChooseAction { action, card }
    }
}

// =========================================================================
// Tests
// =========================================================================
