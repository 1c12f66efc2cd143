//! The table actor's inbox/outbox message types.
//!
//! Grounded on the teacher's `table/messages.rs` `TableMessage`/
//! `TableResponse` shape (one request variant per actor operation, a
//! `oneshot::Sender` riding along for request/response calls) trimmed of
//! wallet/bot variants and expanded with spec 4.5's message surface
//! (`sit-out`, `sit-back-in`, `rebuy`, `chat-message`).

use tokio::sync::oneshot;

use crate::game::pot::SeatIndex;
use crate::game::state_machine::{Action, GameEvent, Identity};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TableError {
    #[error(transparent)]
    Game(#[from] crate::game::state_machine::UserError),
    #[error("the table is shutting down")]
    Closed,
}

pub type TableResult<T> = Result<T, TableError>;

/// Everything the table actor's single ordered inbox accepts. The
/// `join-table`, `observe-table`, `action`, `sit-out`, `sit-back-in`,
/// `rebuy`, `leave-table`, and `chat-message` operations map one-to-one
/// onto variants here. Timer and run-out deadlines never enter this inbox —
/// the actor's `run` loop selects over them directly alongside it.
#[derive(Debug)]
pub enum TableMessage {
    JoinTable {
        identity: Identity,
        handle: String,
        buy_in: i64,
        preferred_seat: Option<SeatIndex>,
        respond_to: oneshot::Sender<TableResult<SeatIndex>>,
    },
    ObserveTable {
        respond_to: oneshot::Sender<TableResult<()>>,
    },
    LeaveTable {
        identity: Identity,
        respond_to: oneshot::Sender<TableResult<()>>,
    },
    TakeAction {
        identity: Identity,
        action: Action,
        respond_to: oneshot::Sender<TableResult<()>>,
    },
    SitOut {
        identity: Identity,
        respond_to: oneshot::Sender<TableResult<()>>,
    },
    SitBackIn {
        identity: Identity,
        respond_to: oneshot::Sender<TableResult<()>>,
    },
    Rebuy {
        identity: Identity,
        amount: i64,
        respond_to: oneshot::Sender<TableResult<i64>>,
    },
    ChatMessage {
        identity: Option<Identity>,
        text: String,
    },
    GetSnapshot {
        respond_to: oneshot::Sender<TableSnapshot>,
    },
    Subscribe {
        subscriber_id: u64,
        sender: tokio::sync::mpsc::Sender<TableResponse>,
    },
    Unsubscribe {
        subscriber_id: u64,
    },
    Close,
}

/// Broadcast to every subscriber after processing a message: the raw event
/// stream plus an invitation for the receiver (the session coordinator) to
/// pull a fresh, personalised snapshot.
#[derive(Debug, Clone)]
pub enum TableResponse {
    Events(Vec<GameEvent>),
    Closed,
}

#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub hand_counter: u64,
    pub phase: crate::game::state_machine::Phase,
    pub dealer_seat: SeatIndex,
    pub current_actor: Option<SeatIndex>,
    pub community: Vec<crate::game::cards::Card>,
    pub pot: i64,
    pub seats: Vec<Option<SeatSnapshot>>,
}

#[derive(Debug, Clone)]
pub struct SeatSnapshot {
    pub identity: Identity,
    pub handle: String,
    pub stack: i64,
    pub street_committed: i64,
    pub folded: bool,
    pub all_in: bool,
    pub sitting_out: bool,
    pub disconnected: bool,
    /// Hole cards are always present here; visibility filtering happens in
    /// the session coordinator, never in the engine (spec 4.5 "Broadcast").
    pub hole_cards: Option<[crate::game::cards::Card; 2]>,
}
