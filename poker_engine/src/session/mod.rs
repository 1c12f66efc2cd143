//! The session coordinator: identity/transport/seat bookkeeping and
//! personalised broadcast, sitting above the per-table actors (spec 4.5).

pub mod coordinator;
pub mod messages;

pub use coordinator::{CoordinatorError, SessionCoordinator, SessionTimings};
pub use messages::{CoordinatorEvent, GameView, SeatView};
