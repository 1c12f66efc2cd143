//! Outbound message/view shapes the session coordinator produces (spec 4.5).
//!
//! Grounded on the teacher's `ServerResponse`/`ClientMessage` shape in
//! `pp_server/src/api/websocket.rs` (a tagged-union response enum,
//! serialized straight to the transport) generalized from one-shot
//! command acks into the full personalised broadcast surface spec 4.5
//! names: `seat-assigned`, `game-state`, `action-timer-start`,
//! `time-bank-start`, `hand-log`, `hand-complete`, `profile-updated`,
//! `error`, `auth-error`.

use serde::{Deserialize, Serialize};

use crate::game::cards::Card;
use crate::game::pot::{Chips, SeatIndex};
use crate::game::state_machine::Phase;

/// One seat as a particular viewer should see it: hole cards are `Some`
/// only for the viewer's own seat, or for any not-folded seat once the
/// hand reaches showdown (spec 4.5 "Broadcast").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: SeatIndex,
    pub handle: String,
    pub stack: Chips,
    pub street_committed: Chips,
    pub folded: bool,
    pub all_in: bool,
    pub sitting_out: bool,
    pub disconnected: bool,
    pub hole_cards: Option<[Card; 2]>,
}

/// A fully personalised snapshot: what `game-state` carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameView {
    pub table_id: String,
    pub hand_counter: u64,
    pub phase: Phase,
    pub dealer_seat: SeatIndex,
    pub current_actor: Option<SeatIndex>,
    pub community: Vec<Card>,
    pub pot: Chips,
    pub seats: Vec<Option<SeatView>>,
    pub your_seat: Option<SeatIndex>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CoordinatorEvent {
    SeatAssigned { seat: SeatIndex },
    GameState(GameView),
    ActionTimerStart { seat: SeatIndex, ms: u64 },
    TimeBankStart { seat: SeatIndex, ms: u64 },
    HandLog { line: String },
    /// The full personalised transcript for a hand that just ended,
    /// directed to the owning identity only (spec 4.4/4.5).
    PersonalizedHandLog { text: String },
    HandComplete { hand_id: u64 },
    ProfileUpdated { current_chips: Chips },
    Chat { from: String, is_observer: bool, text: String },
    Error { message: String },
    AuthError { message: String },
}
