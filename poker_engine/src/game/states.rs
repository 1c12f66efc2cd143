//! Phase transition bodies: seating, blinds, dealing, betting-round
//! validation, street advancement, and showdown.
//!
//! This is the module the teacher declared (`game/mod.rs` re-exports
//! `implementation::*`) but whose source (`game/implementation.rs`) was not
//! present in the retrieved pack — only the phase *shapes* in
//! `game/states/mod.rs` and the shared `GameData` in `game/state_machine.rs`
//! were retrievable. Everything below is authored fresh against spec 4.4,
//! using those retrievable shapes as the substrate.

use super::cards::Card;
use super::eval::{HandRank, evaluate_best};
use super::pot::{Chips, PotEngine, SeatIndex};
use super::rng::SecureRng;
use super::state_machine::{Action, GameData, GameEvent, Phase, SeatedPlayer, UserError};
use crate::table::history::HandLogBuilder;

/// How many community cards are burned/dealt when a street opens.
fn street_deal_count(phase: Phase) -> Option<(usize, usize)> {
    // (burn, deal)
    match phase {
        Phase::Flop => Some((1, 3)),
        Phase::Turn => Some((1, 1)),
        Phase::River => Some((1, 1)),
        _ => None,
    }
}

impl GameData {
    // ---- Seating ----

    pub fn seat_player(&mut self, seat: SeatIndex, player: SeatedPlayer) -> Result<(), UserError> {
        if self
            .seats
            .iter()
            .flatten()
            .any(|p| p.identity == player.identity)
        {
            let existing = self
                .seats
                .iter()
                .position(|s| s.as_ref().is_some_and(|p| p.identity == player.identity))
                .unwrap();
            return Err(UserError::AlreadySeated(existing));
        }
        match self.seats.get_mut(seat) {
            Some(slot @ None) => {
                *slot = Some(player);
                Ok(())
            }
            Some(Some(_)) => Err(UserError::TableFull),
            None => Err(UserError::TableFull),
        }
    }

    pub fn lowest_empty_seat(&self) -> Option<SeatIndex> {
        self.seats.iter().position(|s| s.is_none())
    }

    pub fn seat_of(&self, identity: &str) -> Option<SeatIndex> {
        self.seats
            .iter()
            .position(|s| s.as_ref().is_some_and(|p| p.identity == identity))
    }

    /// Remove a player, deferring to `pending_removal` if a hand is live.
    pub fn remove_player(&mut self, seat: SeatIndex) {
        let in_hand = self.phase != Phase::Idle
            && self.seats[seat]
                .as_ref()
                .is_some_and(|p| p.participated_this_hand && !p.folded);
        if in_hand {
            if let Some(p) = self.seats[seat].as_mut() {
                p.pending_removal = true;
            }
        } else {
            self.seats[seat] = None;
        }
    }

    fn sweep_pending_removals(&mut self) {
        for slot in self.seats.iter_mut() {
            if slot.as_ref().is_some_and(|p| p.pending_removal) {
                *slot = None;
            }
        }
    }

    // ---- Hand start ----

    /// Attempts `idle -> preflop`. Returns `false` (no-op) if fewer than two
    /// eligible players remain once `sitting_out_next_hand` flags are
    /// applied, per spec 4.4.
    pub fn try_start_hand(&mut self, rng: &mut impl SecureRng) -> bool {
        assert_eq!(self.phase, Phase::Idle);
        self.sweep_pending_removals();
        for slot in self.seats.iter_mut().flatten() {
            if slot.sitting_out_next_hand {
                slot.sitting_out = true;
                slot.sitting_out_next_hand = false;
            }
        }

        if self.eligible_seats().len() < 2 {
            return false;
        }

        self.hand_counter += 1;
        self.community.clear();
        self.chip_pile.clear();
        self.pot = 0;
        self.last_raise = self.settings.big_blind;
        self.last_aggressor = None;
        self.acted_this_round.clear();
        self.hand_log.clear();
        self.current_hand_log = HandLogBuilder::new();
        for actions in self.seat_actions.iter_mut() {
            actions.clear();
        }
        for position in self.seat_positions.iter_mut() {
            position.clear();
        }
        self.final_hand_names.clear();

        for (i, slot) in self.seats.iter_mut().enumerate() {
            if let Some(p) = slot {
                let eligible = p.is_eligible_for_next_hand();
                p.participated_this_hand = eligible;
                p.folded = !eligible;
                p.all_in = false;
                p.street_committed = 0;
                p.total_committed = 0;
                p.hole_cards = None;
                if eligible {
                    p.stack_at_hand_start = p.stack;
                }
                if eligible {
                    p.hands_dealt += 1;
                    if p.hands_dealt.is_multiple_of(self.settings.time_bank_growth_hands) {
                        p.time_bank_preflop_ms = (p.time_bank_preflop_ms
                            + self.settings.time_bank_growth_ms)
                            .min(self.settings.time_bank_cap_ms);
                        p.time_bank_postflop_ms = (p.time_bank_postflop_ms
                            + self.settings.time_bank_growth_ms)
                            .min(self.settings.time_bank_cap_ms);
                    }
                }
                let _ = i;
            }
        }

        self.deck = super::cards::Deck::shuffled(rng);
        self.advance_dealer_button();
        self.post_blinds_and_deal(rng);
        true
    }

    fn advance_dealer_button(&mut self) {
        let eligible = self.eligible_seats();
        if self.hand_counter == 1 {
            self.dealer_seat = eligible.first().copied().unwrap_or(0);
            return;
        }
        self.dealer_seat = self
            .next_seat_from(self.dealer_seat, |p| p.is_eligible_for_next_hand())
            .unwrap_or(self.dealer_seat);
    }

    /// Clockwise search for the next occupied seat (after `from`) whose
    /// player satisfies `pred`.
    fn next_seat_from(
        &self,
        from: SeatIndex,
        pred: impl Fn(&SeatedPlayer) -> bool,
    ) -> Option<SeatIndex> {
        let n = self.seats.len();
        for step in 1..=n {
            let i = (from + step) % n;
            if self.seats[i].as_ref().is_some_and(&pred) {
                return Some(i);
            }
        }
        None
    }

    fn post_blinds_and_deal(&mut self, rng: &mut impl SecureRng) {
        let eligible = self.eligible_seats();
        let heads_up = eligible.len() == 2;

        let (sb_seat, bb_seat, first_to_act) = if heads_up {
            let sb = self.dealer_seat;
            let bb = self
                .next_seat_from(sb, |p| p.is_eligible_for_next_hand())
                .unwrap();
            (sb, bb, sb)
        } else {
            let sb = self
                .next_seat_from(self.dealer_seat, |p| p.is_eligible_for_next_hand())
                .unwrap();
            let bb = self.next_seat_from(sb, |p| p.is_eligible_for_next_hand()).unwrap();
            let first = self
                .next_seat_from(bb, |p| p.is_eligible_for_next_hand())
                .unwrap();
            (sb, bb, first)
        };

        self.sb_seat = Some(sb_seat);
        self.bb_seat = Some(bb_seat);
        self.assign_position_tags(&eligible, heads_up, sb_seat, bb_seat);

        self.post_blind(sb_seat, self.settings.small_blind);
        self.post_blind(bb_seat, self.settings.big_blind);

        self.emit(GameEvent::HandStarted {
            hand_id: self.hand_counter,
            sb_seat,
            bb_seat,
        });
        self.log(format!(
            "-- hand #{} -- sb {} / bb {}",
            self.hand_counter, self.settings.small_blind, self.settings.big_blind
        ));

        // Deal two hole cards per eligible seat in order.
        for &seat in &eligible {
            let a = self.deck.draw().expect("deck underflow dealing hole card 1");
            let b = self.deck.draw().expect("deck underflow dealing hole card 2");
            let p = self.seats[seat].as_mut().unwrap();
            p.hole_cards = Some([a, b]);
            self.emit(GameEvent::HoleCardsDealt { seat });
            self.current_hand_log.push_private_deal(seat, [a, b]);
            self.log(format!("dealt to seat {seat}: private"));
        }

        self.phase = Phase::Preflop;
        self.acted_this_round.clear();
        self.current_actor = Some(first_to_act);
        self.emit(GameEvent::StreetStarted {
            phase: Phase::Preflop,
            board: self.community.clone(),
        });
    }

    /// Labels every eligible seat with its standard position tag for the
    /// hand (spec 6's archived `position` column): the dealer is "BTN", the
    /// blinds are "SB"/"BB" (merged to "BTN/SB" heads-up, where the dealer
    /// posts small blind), and the rest are numbered "UTG", "UTG+1", ...
    /// clockwise from the big blind.
    fn assign_position_tags(&mut self, eligible: &[SeatIndex], heads_up: bool, sb_seat: SeatIndex, bb_seat: SeatIndex) {
        for &seat in eligible {
            self.seat_positions[seat] = if seat == self.dealer_seat && heads_up {
                "BTN/SB".to_string()
            } else if seat == self.dealer_seat {
                "BTN".to_string()
            } else if seat == sb_seat {
                "SB".to_string()
            } else if seat == bb_seat {
                "BB".to_string()
            } else {
                String::new()
            };
        }
        if heads_up {
            return;
        }
        let after_bb: Vec<SeatIndex> = eligible
            .iter()
            .copied()
            .cycle()
            .skip_while(|&s| s != bb_seat)
            .skip(1)
            .take(eligible.len().saturating_sub(3))
            .collect();
        for (i, seat) in after_bb.into_iter().enumerate() {
            self.seat_positions[seat] = if i == 0 {
                "UTG".to_string()
            } else {
                format!("UTG+{i}")
            };
        }
    }

    fn post_blind(&mut self, seat: SeatIndex, amount: Chips) {
        let p = self.seats[seat].as_mut().unwrap();
        let posted = amount.min(p.stack);
        p.stack -= posted;
        p.street_committed += posted;
        p.total_committed += posted;
        if p.stack == 0 {
            p.all_in = true;
        }
        self.emit(GameEvent::BlindPosted { seat, amount: posted });
    }

    // ---- Betting ----

    pub fn legal_min_raise_total(&self) -> Chips {
        self.max_street_bet() + self.last_raise.max(self.settings.big_blind)
    }

    fn acting_seats(&self) -> Vec<SeatIndex> {
        self.seats
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().filter(|p| p.can_act()).map(|_| i))
            .collect()
    }

    /// Validates and applies a single action from the current actor. The
    /// action is validated *before* any mutation, per spec 4.4.
    pub fn apply_action(&mut self, identity: &str, action: Action) -> Result<(), UserError> {
        let seat = self.current_actor.ok_or(UserError::NotInHand)?;
        let player = self.seats[seat].as_ref().ok_or(UserError::NotSeated)?;
        if player.identity != identity {
            return Err(UserError::NotYourTurn);
        }
        if !player.can_act() {
            return Err(UserError::CannotAct);
        }

        let max_bet = self.max_street_bet();
        match action {
            Action::Check => {
                if player.street_committed != max_bet {
                    return Err(UserError::CannotCheck);
                }
            }
            Action::Call => {}
            Action::Fold => {}
            Action::Raise { total } => {
                let min_total = self.legal_min_raise_total();
                let opponents_capped = self.opponents_all_capped_below(seat, max_bet);
                if !opponents_capped && total < min_total {
                    let stack_all_in_total = player.street_committed + player.stack;
                    if total < stack_all_in_total {
                        return Err(UserError::RaiseTooSmall {
                            total,
                            minimum: min_total,
                        });
                    }
                }
                if total <= max_bet {
                    return Err(UserError::RaiseTooSmall {
                        total,
                        minimum: min_total,
                    });
                }
            }
        }

        self.do_apply_action(seat, action);
        Ok(())
    }

    /// True when every not-folded opponent of `seat` is already all-in for
    /// an amount `<= max_bet`, so a "raise" collapses to a capped call
    /// (spec 4.4's "uncontestable excess" exception).
    fn opponents_all_capped_below(&self, seat: SeatIndex, max_bet: Chips) -> bool {
        self.seats.iter().enumerate().all(|(i, s)| {
            i == seat
                || s.as_ref().is_none_or(|p| {
                    p.folded || (p.all_in && p.street_committed <= max_bet)
                })
        })
    }

    fn do_apply_action(&mut self, seat: SeatIndex, action: Action) {
        let max_bet = self.max_street_bet();
        let reopens_action = matches!(action, Action::Raise { total } if {
            let min_total = self.legal_min_raise_total();
            total >= min_total
        });

        {
            let p = self.seats[seat].as_mut().unwrap();
            match action {
                Action::Fold => p.folded = true,
                Action::Check => {}
                Action::Call => {
                    let owed = (max_bet - p.street_committed).min(p.stack);
                    p.stack -= owed;
                    p.street_committed += owed;
                    p.total_committed += owed;
                    if p.stack == 0 {
                        p.all_in = true;
                    }
                }
                Action::Raise { total } => {
                    let capped_total = if self.opponents_all_capped_below(seat, max_bet) && total > max_bet {
                        max_bet
                    } else {
                        total
                    };
                    let owed = (capped_total - p.street_committed).min(p.stack);
                    p.stack -= owed;
                    p.street_committed += owed;
                    p.total_committed += owed;
                    if p.stack == 0 {
                        p.all_in = true;
                    }
                }
            }
        }

        self.emit(GameEvent::ActionTaken { seat, action });
        self.log(format!("seat {seat}: {action:?}"));
        self.seat_actions[seat].push(format!("{:?}:{action:?}", self.phase));

        if let Action::Raise { total } = action {
            let new_max = self.max_street_bet();
            self.last_raise = (new_max - max_bet).max(self.last_raise);
            let _ = total;
            if reopens_action {
                self.last_aggressor = Some(seat);
                self.acted_this_round.clear();
            }
        }
        self.acted_this_round.insert(seat);

        self.advance_after_action();
    }

    fn advance_after_action(&mut self) {
        if self.not_folded_seats().len() <= 1 {
            self.award_uncontested();
            return;
        }

        if self.round_done() {
            if self.needs_dramatic_runout() {
                self.enter_dramatic_runout();
            } else {
                self.advance_street();
            }
            return;
        }

        self.current_actor = self.next_seat_from(
            self.current_actor.unwrap_or(self.dealer_seat),
            |p| p.can_act(),
        );
        if self.current_actor.is_none() {
            // No one left who can act this round even though it's not
            // "done" by the literal predicate (e.g. everyone else all-in).
            if self.needs_dramatic_runout() {
                self.enter_dramatic_runout();
            } else {
                self.advance_street();
            }
        }
    }

    /// Spec 4.4's round-done predicate: every not-folded, not-all-in,
    /// not-sitting-out seat has acted this round and matches the max bet.
    fn round_done(&self) -> bool {
        let max_bet = self.max_street_bet();
        self.seats.iter().enumerate().all(|(i, s)| {
            s.as_ref().is_none_or(|p| {
                p.folded
                    || p.all_in
                    || p.sitting_out
                    || (self.acted_this_round.contains(&i) && p.street_committed == max_bet)
            })
        })
    }

    /// True when at most one not-folded seat can still voluntarily act.
    fn needs_dramatic_runout(&self) -> bool {
        self.acting_seats().len() <= 1 && self.phase != Phase::River && self.phase != Phase::Showdown
    }

    fn award_uncontested(&mut self) {
        let winner = self.not_folded_seats()[0];
        self.collect_street_bets();
        let amount = self.pot;
        if let Some(p) = self.seats[winner].as_mut() {
            p.stack += amount;
        }
        self.emit(GameEvent::PotAwarded {
            tier_index: 0,
            awards: vec![(winner, amount)],
        });
        self.log(format!("seat {winner} wins {amount} (all others folded)"));
        self.end_hand();
    }

    fn collect_street_bets(&mut self) {
        let mut total = 0;
        for s in self.seats.iter_mut().flatten() {
            total += s.street_committed;
            s.street_committed = 0;
        }
        self.pot += total;
        self.chip_pile.collect(total);
    }

    // ---- Street advancement ----

    /// Advances to the next street, dealing its community cards. Called
    /// once the current street's betting round is done.
    pub fn advance_street(&mut self) {
        self.collect_street_bets();
        self.acted_this_round.clear();

        let next_phase = match self.phase {
            Phase::Preflop => Phase::Flop,
            Phase::Flop => Phase::Turn,
            Phase::Turn => Phase::River,
            Phase::River => Phase::Showdown,
            other => other,
        };
        self.phase = next_phase;

        if next_phase == Phase::Showdown {
            self.run_showdown();
            return;
        }

        if let Some((burn, deal)) = street_deal_count(next_phase) {
            for _ in 0..burn {
                self.deck.burn();
            }
            for _ in 0..deal {
                if let Some(c) = self.deck.draw() {
                    self.community.push(c);
                }
            }
        }

        self.emit(GameEvent::StreetStarted {
            phase: next_phase,
            board: self.community.clone(),
        });
        self.log(format!("-- {next_phase:?} -- board: {:?}", self.community));

        self.current_actor = self.next_seat_from(self.dealer_seat, |p| p.can_act());
        self.last_raise = self.settings.big_blind;
        self.last_aggressor = None;
    }

    /// Enters showdown immediately to reveal hole cards (spec 4.4's
    /// "dramatic run-out"), but leaves any still-missing community cards
    /// queued in `runout_queue` rather than dealing them here. The table
    /// actor drains that queue one street at a time on its own
    /// human-perceivable, cancellable schedule (`deal_next_runout_street`),
    /// then calls `finish_runout_showdown` once the board is complete.
    fn enter_dramatic_runout(&mut self) {
        self.collect_street_bets();
        self.phase = Phase::Showdown;
        self.current_actor = None;
        self.emit(GameEvent::DramaticRunoutStarted);
        self.log("-- all action complete, running out the board --".to_string());
        self.reveal_showdown_hands();
        self.runout_queue = self.missing_runout_streets();
    }

    fn missing_runout_streets(&self) -> Vec<Phase> {
        let mut queue = Vec::new();
        if self.community.len() < 3 {
            queue.push(Phase::Flop);
        }
        if self.community.len() < 4 {
            queue.push(Phase::Turn);
        }
        if self.community.len() < 5 {
            queue.push(Phase::River);
        }
        queue
    }

    /// Deals the next queued run-out street (burn-and-deal discipline
    /// preserved) and emits its `StreetStarted`. Returns the phase dealt,
    /// or `None` if the queue was already empty.
    pub fn deal_next_runout_street(&mut self) -> Option<Phase> {
        if self.runout_queue.is_empty() {
            return None;
        }
        let phase = self.runout_queue.remove(0);
        if let Some((burn, deal)) = street_deal_count(phase) {
            for _ in 0..burn {
                self.deck.burn();
            }
            for _ in 0..deal {
                if let Some(c) = self.deck.draw() {
                    self.community.push(c);
                }
            }
        }
        self.emit(GameEvent::StreetStarted {
            phase,
            board: self.community.clone(),
        });
        self.log(format!("-- {phase:?} -- board: {:?}", self.community));
        Some(phase)
    }

    pub fn runout_pending(&self) -> bool {
        !self.runout_queue.is_empty()
    }

    /// The street at the front of the run-out queue, i.e. the one that will
    /// be dealt by the *next* call to `deal_next_runout_street`. Lets the
    /// table actor look up the right pacing delay before that call happens.
    pub fn peek_next_runout_phase(&self) -> Option<Phase> {
        self.runout_queue.first().copied()
    }

    /// Evaluates hands and awards the pot(s) once a dramatic run-out's board
    /// is complete. Hole cards were already revealed by
    /// `enter_dramatic_runout`, so this only does the evaluation/award half
    /// of what `run_showdown` does for a showdown reached by normal betting.
    pub fn finish_runout_showdown(&mut self) {
        self.evaluate_and_award();
    }

    // ---- Showdown ----

    fn run_showdown(&mut self) {
        self.reveal_showdown_hands();
        self.evaluate_and_award();
    }

    fn reveal_showdown_hands(&mut self) {
        for &seat in &self.not_folded_seats() {
            if let Some(p) = self.seats[seat].as_ref() {
                if let Some(cards) = p.hole_cards {
                    self.emit(GameEvent::ShowdownRevealed { seat, cards });
                }
            }
        }
    }

    fn evaluate_and_award(&mut self) {
        let contenders = self.not_folded_seats();
        let mut hands: std::collections::HashMap<SeatIndex, HandRank> = std::collections::HashMap::new();
        for &seat in &contenders {
            let p = self.seats[seat].as_ref().unwrap();
            if let Some(hole) = p.hole_cards {
                let mut all: Vec<Card> = hole.to_vec();
                all.extend(self.community.iter().copied());
                let rank = evaluate_best(&all);
                self.final_hand_names.insert(seat, rank.name.clone());
                hands.insert(seat, rank);
                self.log(format!(
                    "seat {seat} shows {} {}",
                    hole[0], hole[1]
                ));
            }
        }

        let commitments: Vec<(SeatIndex, Chips, bool)> = self
            .seats
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|p| (i, p.total_committed, p.folded)))
            .collect();
        let tiers = PotEngine::build_pots(&commitments);

        for (idx, tier) in tiers.iter().enumerate() {
            let award = PotEngine::award(tier, &hands, self.dealer_seat, self.seats.len());
            let mut awards: Vec<(SeatIndex, Chips)> = award.into_iter().collect();
            awards.sort_unstable_by_key(|(seat, _)| *seat);
            for &(seat, amount) in &awards {
                if let Some(p) = self.seats[seat].as_mut() {
                    p.stack += amount;
                }
            }
            self.log(format!("pot {idx}: {awards:?}"));
            self.emit(GameEvent::PotAwarded {
                tier_index: idx,
                awards,
            });
        }

        self.pot = 0;
        self.chip_pile.clear();
        self.end_hand();
    }

    fn end_hand(&mut self) {
        for p in self.seats.iter_mut().flatten() {
            if p.stack == 0 && p.participated_this_hand {
                p.busted = true;
            }
        }
        self.phase = Phase::Idle;
        self.current_actor = None;
        for (seat, slot) in self.seats.iter().enumerate() {
            if slot.as_ref().is_some_and(|p| p.participated_this_hand) {
                self.events.push(GameEvent::PersonalizedHandLog {
                    seat,
                    text: self.current_hand_log.personalised_for(seat),
                });
            }
        }
        self.emit(GameEvent::HandComplete {
            hand_id: self.hand_counter,
        });
        self.sweep_pending_removals();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::rng::DeterministicRng;
    use crate::game::state_machine::GameSettings;

    fn seated(data: &mut GameData, seat: SeatIndex, handle: &str, stack: Chips) {
        let settings = data.settings;
        data.seat_player(seat, SeatedPlayer::new(handle.to_string(), handle.to_string(), stack, &settings))
            .unwrap();
    }

    #[test]
    fn heads_up_fold_to_blinds_matches_spec_scenario_one() {
        let mut data = GameData::new(GameSettings {
            small_blind: 50,
            big_blind: 100,
            ..Default::default()
        });
        seated(&mut data, 0, "a", 1000);
        seated(&mut data, 1, "b", 1000);
        let mut rng = DeterministicRng::from_seed(1);
        assert!(data.try_start_hand(&mut rng));

        assert_eq!(data.sb_seat, Some(0));
        assert_eq!(data.bb_seat, Some(1));
        assert_eq!(data.current_actor, Some(0));

        data.apply_action("a", Action::Fold).unwrap();

        assert_eq!(data.phase, Phase::Idle);
        let b = data.seats[1].as_ref().unwrap();
        assert_eq!(b.stack, 1050);
        let a = data.seats[0].as_ref().unwrap();
        assert_eq!(a.stack, 950);
    }

    #[test]
    fn all_in_runout_conserves_chips() {
        let mut data = GameData::new(GameSettings {
            small_blind: 50,
            big_blind: 100,
            ..Default::default()
        });
        seated(&mut data, 0, "a", 2000);
        seated(&mut data, 1, "b", 2000);
        let mut rng = DeterministicRng::from_seed(7);
        data.try_start_hand(&mut rng);

        data.apply_action("a", Action::Raise { total: 2000 }).unwrap();
        data.apply_action("b", Action::Call).unwrap();

        // Both players are now all-in preflop, so the hand enters the
        // dramatic run-out: phase sits in Showdown with the remaining
        // streets queued until the table actor drains them.
        assert_eq!(data.phase, Phase::Showdown);
        assert!(data.runout_pending());
        while data.runout_pending() {
            data.deal_next_runout_street();
        }
        data.finish_runout_showdown();

        assert_eq!(data.phase, Phase::Idle);
        assert_eq!(data.community.len(), 5);
        let total: Chips = data.seats.iter().flatten().map(|p| p.stack).sum();
        assert_eq!(total, 4000);
    }

    #[test]
    fn min_raise_is_enforced() {
        let mut data = GameData::new(GameSettings {
            small_blind: 50,
            big_blind: 100,
            ..Default::default()
        });
        seated(&mut data, 0, "a", 1000);
        seated(&mut data, 1, "b", 1000);
        seated(&mut data, 2, "c", 1000);
        let mut rng = DeterministicRng::from_seed(3);
        data.try_start_hand(&mut rng);

        // First to act after BB in 3-way is seat 0 (dealer), facing bb=100.
        let result = data.apply_action("a", Action::Raise { total: 150 });
        assert!(result.is_err());
    }

    #[test]
    fn checking_without_outstanding_bet_is_legal() {
        let mut data = GameData::new(GameSettings {
            small_blind: 50,
            big_blind: 100,
            ..Default::default()
        });
        seated(&mut data, 0, "a", 1000);
        seated(&mut data, 1, "b", 1000);
        seated(&mut data, 2, "c", 1000);
        let mut rng = DeterministicRng::from_seed(11);
        data.try_start_hand(&mut rng);

        data.apply_action("a", Action::Call).unwrap();
        data.apply_action("b", Action::Call).unwrap();
        data.apply_action("c", Action::Check).unwrap();

        assert_eq!(data.phase, Phase::Flop);
        assert_eq!(data.community.len(), 3);
    }
}
