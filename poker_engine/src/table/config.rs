//! Table configuration.
//!
//! Grounded on the teacher's `table/config.rs` `TableConfig` (field list,
//! `validate()`/`Default` shape) trimmed of wallet/bot/invite fields
//! (`bots_enabled`, `bot_difficulty`, `invite_token`, ...) and expanded with
//! every timer/buy-in/session option spec 6 names.

use serde::{Deserialize, Serialize};

use crate::game::pot::Chips;
use crate::game::state_machine::GameSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    pub name: String,
    pub num_seats: usize,
    pub small_blind: Chips,
    pub big_blind: Chips,

    pub min_buyin: Chips,
    pub max_buyin: Chips,

    pub base_action_ms: u64,
    pub default_time_bank_ms: u64,
    pub time_bank_cap_ms: u64,
    pub time_bank_growth_ms: u64,
    pub time_bank_growth_hands: u32,

    pub sit_out_kick_ms: u64,
    pub disconnect_grace_ms: u64,
    pub reconnect_swap_grace_ms: u64,
    pub rathole_window_ms: u64,

    /// Slack before an `idle -> preflop` transition fires once two or more
    /// eligible players are seated, to let a burst of joins settle.
    pub hand_start_delay_ms: u64,

    /// Dramatic run-out pacing (spec 4.4): delay from hole-card reveal to
    /// the first missing street, then between each subsequent street.
    pub runout_reveal_delay_ms: u64,
    pub runout_flop_delay_ms: u64,
    pub runout_turn_delay_ms: u64,
    pub runout_river_delay_ms: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "Table 1".to_string(),
            num_seats: 6,
            small_blind: 50,
            big_blind: 100,
            min_buyin: 2_000,
            max_buyin: 10_000,
            base_action_ms: 15_000,
            default_time_bank_ms: 15_000,
            time_bank_cap_ms: 60_000,
            time_bank_growth_ms: 5_000,
            time_bank_growth_hands: 10,
            sit_out_kick_ms: 300_000,
            disconnect_grace_ms: 60_000,
            reconnect_swap_grace_ms: 10_000,
            rathole_window_ms: 7_200_000,
            hand_start_delay_ms: 2_000,
            runout_reveal_delay_ms: 2_000,
            runout_flop_delay_ms: 2_000,
            runout_turn_delay_ms: 3_000,
            runout_river_delay_ms: 2_000,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.big_blind <= self.small_blind {
            return Err("big_blind must be greater than small_blind".to_string());
        }
        if self.max_buyin <= self.min_buyin {
            return Err("max_buyin must be greater than min_buyin".to_string());
        }
        if self.num_seats == 0 || self.num_seats > 10 {
            return Err("num_seats must be between 1 and 10".to_string());
        }
        if self.time_bank_cap_ms < self.default_time_bank_ms {
            return Err("time_bank_cap_ms must be >= default_time_bank_ms".to_string());
        }
        Ok(())
    }

    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            num_seats: self.num_seats,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            default_time_bank_ms: self.default_time_bank_ms,
            time_bank_cap_ms: self.time_bank_cap_ms,
            time_bank_growth_ms: self.time_bank_growth_ms,
            time_bank_growth_hands: self.time_bank_growth_hands,
        }
    }

    /// Delay before dealing `phase`'s community cards during a dramatic
    /// run-out, keyed by the street being dealt (spec 4.4's default
    /// "2s reveal, 2s to flop, 3s to turn, 2s to river" pattern).
    pub fn runout_delay_for(&self, phase: crate::game::state_machine::Phase) -> u64 {
        use crate::game::state_machine::Phase;
        match phase {
            Phase::Flop => self.runout_flop_delay_ms,
            Phase::Turn => self.runout_turn_delay_ms,
            Phase::River => self.runout_river_delay_ms,
            _ => self.runout_flop_delay_ms,
        }
    }

    /// Anti-ratholing clamp (spec 4.4): a re-buy after a recent departure
    /// with `prior_stack > 0` is clamped up to at least that prior stack.
    pub fn clamp_buyin(&self, requested: Chips, prior_stack: Option<Chips>) -> Chips {
        let floor = match prior_stack {
            Some(prior) if prior > 0 => self.min_buyin.max(prior),
            _ => self.min_buyin,
        };
        requested.clamp(floor, self.max_buyin.max(floor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_blinds() {
        let mut cfg = TableConfig::default();
        cfg.small_blind = 200;
        cfg.big_blind = 100;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn anti_ratholing_clamp_uses_prior_stack_as_floor() {
        let cfg = TableConfig::default();
        assert_eq!(cfg.clamp_buyin(2_000, Some(8_000)), 8_000);
        assert_eq!(cfg.clamp_buyin(2_000, None), 2_000);
        assert_eq!(cfg.clamp_buyin(50_000, Some(8_000)), cfg.max_buyin);
    }

    #[test]
    fn a_big_winners_prior_stack_above_max_buyin_floors_without_panicking() {
        let cfg = TableConfig::default();
        let prior = cfg.max_buyin + 25_000;
        assert_eq!(cfg.clamp_buyin(2_000, Some(prior)), prior);
        assert_eq!(cfg.clamp_buyin(prior + 5_000, Some(prior)), prior);
    }
}
