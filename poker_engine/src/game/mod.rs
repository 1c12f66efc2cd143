//! Core game logic: cards, hand evaluation, pot construction, and the
//! per-table betting state machine.
//!
//! `state_machine` holds the shared data/error/event types; `states` bodies
//! the phase transitions (see its module doc for why `Phase` is a plain
//! runtime field here rather than the teacher's `enum_dispatch` type-state
//! wrapper).

pub mod cards;
pub mod eval;
pub mod pot;
pub mod rng;
pub mod state_machine;
pub mod states;

pub use cards::{Card, Deck, Rank, Suit};
pub use eval::{HandRank, evaluate_best};
pub use pot::{PotEngine, PotTier};
pub use rng::SecureRng;
pub use state_machine::{GameData, GameEvent, Phase, UserError};
