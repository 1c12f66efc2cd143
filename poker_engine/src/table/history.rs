//! Per-hand log construction and per-player personalisation (spec 4.4).
//!
//! Grounded on the teacher's `hand_log`-style append pattern in
//! `game/entities.rs`'s `PlayerView`/`GameView` construction (build one
//! shared structure, then filter per viewer) generalized from a single
//! current-state snapshot into a full ordered transcript plus a private
//! "dealt to" line spliced in per recipient.

use serde::{Deserialize, Serialize};

use crate::game::cards::Card;
use crate::game::pot::{Chips, SeatIndex};
use crate::game::state_machine::Identity;

/// One completed hand's persisted record (spec 6's `hands`/`hand_players`
/// abstract tables).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandRecord {
    pub hand_id: u64,
    pub table_id: String,
    pub started_at: i64,
    pub completed_at: i64,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub button_seat: SeatIndex,
    pub pot_total: Chips,
    pub community_cards: Vec<Card>,
    pub hand_history: String,
    pub participants: Vec<HandParticipant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandParticipant {
    pub identity: Identity,
    pub handle: String,
    pub seat: SeatIndex,
    pub starting_stack: Chips,
    pub ending_stack: Chips,
    pub total_committed: Chips,
    pub hole_cards: Option<[Card; 2]>,
    pub final_hand: Option<String>,
    pub position: String,
    pub actions: Vec<String>,
    /// Derived from the conservation identity, never stored independently
    /// of it (spec 9's open question resolution — see `DESIGN.md`).
    pub won_amount: Chips,
}

impl HandParticipant {
    pub fn compute_won_amount(ending_stack: Chips, starting_stack: Chips, total_committed: Chips) -> Chips {
        ending_stack - starting_stack + total_committed
    }
}

/// Builds the public transcript plus each participant's private "dealt to"
/// splice, matching spec 4.4's "personalised copy... includes only that
/// player's private dealt-to line plus every public line".
#[derive(Debug, Clone)]
pub struct HandLogBuilder {
    public_lines: Vec<String>,
    private_deals: std::collections::HashMap<SeatIndex, String>,
}

impl Default for HandLogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HandLogBuilder {
    pub fn new() -> Self {
        Self {
            public_lines: Vec::new(),
            private_deals: std::collections::HashMap::new(),
        }
    }

    pub fn push_public(&mut self, line: impl Into<String>) {
        self.public_lines.push(line.into());
    }

    pub fn push_private_deal(&mut self, seat: SeatIndex, cards: [Card; 2]) {
        self.private_deals
            .insert(seat, format!("dealt to seat {seat}: {} {}", cards[0], cards[1]));
    }

    /// The personalised log for `seat`: its own private deal line (if any)
    /// followed by every public line, in hand order.
    pub fn personalised_for(&self, seat: SeatIndex) -> String {
        let mut lines = Vec::new();
        if let Some(deal) = self.private_deals.get(&seat) {
            lines.push(deal.clone());
        }
        lines.extend(self.public_lines.iter().cloned());
        lines.join("\n")
    }

    /// The fully public transcript (no private deal lines), as archived.
    pub fn public_transcript(&self) -> String {
        self.public_lines.join("\n")
    }
}
