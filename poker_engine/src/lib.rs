//! A server-authoritative No-Limit Texas Hold'em engine: card/hand
//! primitives, a per-table betting state machine driven by a single
//! ordered actor inbox, and the session coordinator / adapter traits that
//! bind it to an outside transport and persistence layer.
//!
//! A transport-free core with `table` as the concurrency boundary and
//! `adapters` as the trait seam to the outside world.

pub mod adapters;
pub mod game;
pub mod session;
pub mod table;

pub use game::state_machine::{Action, GameData, GameEvent, GameSettings, Identity, Phase, SeatedPlayer, UserError};
pub use session::{CoordinatorEvent, SessionCoordinator, SessionTimings};
pub use table::{TableConfig, TableHandle, TableManager};
