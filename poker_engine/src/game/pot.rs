//! Side-pot tier construction and award, plus the visual chip pile.
//!
//! The teacher's `Pot` (in `game/entities.rs`) only tracks a flat
//! `investments: HashMap<usize, Usd>` and a `get_call`/`get_min_raise`
//! pair — no side-pot splitting at all. `PotEngine` keeps that
//! investments-by-seat shape but adds spec 4.2's tiered side-pot algorithm,
//! which has no teacher counterpart to generalize from; the clockwise
//! odd-chip distribution is grounded on the general "collect investments,
//! then compute an ordering" pattern the teacher uses for blind rotation.

use std::collections::{BTreeSet, HashMap};

use super::eval::HandRank;

pub type SeatIndex = usize;
pub type Chips = i64;

/// One tier of the pot: an amount and the seats eligible to win it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotTier {
    pub amount: Chips,
    pub eligible: BTreeSet<SeatIndex>,
}

/// Result of awarding a single tier: seat -> chips won from that tier.
pub type TierAward = HashMap<SeatIndex, Chips>;

pub struct PotEngine;

impl PotEngine {
    /// Build the tiered side pots from each participant's total commitment
    /// and fold status, per spec 4.2.
    ///
    /// `commitments` must include every seat that put a chip in this hand,
    /// folded or not. Tiers with zero amount are dropped. Order is
    /// ascending by level: the lowest (main) pot first, then each side pot.
    pub fn build_pots(commitments: &[(SeatIndex, Chips, bool)]) -> Vec<PotTier> {
        let mut levels: Vec<Chips> = commitments
            .iter()
            .filter(|(_, _, folded)| !folded)
            .map(|(_, commit, _)| *commit)
            .collect();
        levels.sort_unstable();
        levels.dedup();

        let mut tiers = Vec::new();
        let mut prev = 0;
        for &level in &levels {
            let mut amount = 0;
            let mut eligible = BTreeSet::new();
            for &(seat, commit, folded) in commitments {
                amount += commit.min(level) - commit.min(prev);
                if !folded && commit >= level {
                    eligible.insert(seat);
                }
            }
            if amount > 0 {
                tiers.push(PotTier { amount, eligible });
            }
            prev = level;
        }
        tiers
    }

    /// Award a single tier to the best hand(s) among its eligible seats.
    ///
    /// `dealer_seat` and `num_seats` establish the clockwise order used to
    /// hand out odd chips one at a time, starting from the dealer's left.
    /// `hands` need not contain an entry for a folded-out or non-eligible
    /// seat. If only one eligible seat remains (everyone else folded), that
    /// seat wins the whole tier without consulting `hands` at all.
    pub fn award(
        tier: &PotTier,
        hands: &HashMap<SeatIndex, HandRank>,
        dealer_seat: SeatIndex,
        num_seats: usize,
    ) -> TierAward {
        let mut award = TierAward::new();
        if tier.eligible.len() == 1 {
            let only = *tier.eligible.iter().next().unwrap();
            award.insert(only, tier.amount);
            return award;
        }

        let best = tier
            .eligible
            .iter()
            .filter_map(|seat| hands.get(seat).map(|h| (seat, h)))
            .max_by(|(_, a), (_, b)| a.cmp(b))
            .map(|(_, h)| h.clone())
            .expect("a tier with >1 eligible seat must have evaluable hands");

        let mut winners: Vec<SeatIndex> = tier
            .eligible
            .iter()
            .copied()
            .filter(|seat| hands.get(seat) == Some(&best))
            .collect();
        winners.sort_unstable_by_key(|&seat| clockwise_distance(dealer_seat, seat, num_seats));

        let share = tier.amount / winners.len() as Chips;
        let mut remainder = tier.amount % winners.len() as Chips;
        for &seat in &winners {
            let mut amount = share;
            if remainder > 0 {
                amount += 1;
                remainder -= 1;
            }
            award.insert(seat, amount);
        }
        award
    }
}

/// Distance clockwise from the dealer's left (`dealer_seat + 1`) to `seat`,
/// used to break odd-chip ties in ascending "closest to the dealer's left
/// first" order.
fn clockwise_distance(dealer_seat: SeatIndex, seat: SeatIndex, num_seats: usize) -> usize {
    let left_of_dealer = (dealer_seat + 1) % num_seats;
    (seat + num_seats - left_of_dealer) % num_seats
}

/// The visual, display-only chip pile: a multiset of denominations that
/// must always sum to the scalar pot (spec 4.4 "Chip pile").
#[derive(Debug, Clone, Default)]
pub struct ChipPile {
    denominations: Vec<Chips>,
}

const DENOMINATION_STEPS: [Chips; 6] = [10_000, 5_000, 1_000, 500, 100, 25];

impl ChipPile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> Chips {
        self.denominations.iter().sum()
    }

    /// Greedy high-to-low breakdown of a collected amount into display
    /// chips, appended to the pile.
    pub fn collect(&mut self, mut amount: Chips) {
        for &step in &DENOMINATION_STEPS {
            while amount >= step {
                self.denominations.push(step);
                amount -= step;
            }
        }
        if amount > 0 {
            self.denominations.push(amount);
        }
    }

    pub fn clear(&mut self) {
        self.denominations.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::eval::HandCategory;

    fn rank(cat: HandCategory, tb: &[u8]) -> HandRank {
        HandRank {
            category: cat,
            tiebreakers: tb.to_vec(),
            name: "test".to_string(),
        }
    }

    #[test]
    fn two_player_case_is_a_single_pot() {
        let commitments = vec![(0, 2000, false), (1, 2000, false)];
        let tiers = PotEngine::build_pots(&commitments);
        assert_eq!(tiers.len(), 1);
        assert_eq!(tiers[0].amount, 4000);
        assert_eq!(tiers[0].eligible, BTreeSet::from([0, 1]));
    }

    #[test]
    fn three_way_side_pot_matches_spec_example() {
        // A=1000, B=3000, C=3000, all not folded.
        let commitments = vec![(0, 1000, false), (1, 3000, false), (2, 3000, false)];
        let tiers = PotEngine::build_pots(&commitments);
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0].amount, 3000);
        assert_eq!(tiers[0].eligible, BTreeSet::from([0, 1, 2]));
        assert_eq!(tiers[1].amount, 4000);
        assert_eq!(tiers[1].eligible, BTreeSet::from([1, 2]));
    }

    #[test]
    fn three_way_side_pot_award_matches_spec_example() {
        let commitments = vec![(0, 1000, false), (1, 3000, false), (2, 3000, false)];
        let tiers = PotEngine::build_pots(&commitments);
        let mut hands = HashMap::new();
        hands.insert(0, rank(HandCategory::TwoPair, &[10, 5, 2]));
        hands.insert(1, rank(HandCategory::Pair, &[9]));
        hands.insert(2, rank(HandCategory::Straight, &[8]));

        let main_award = PotEngine::award(&tiers[0], &hands, 0, 6);
        assert_eq!(main_award.get(&0), Some(&3000));

        let side_award = PotEngine::award(&tiers[1], &hands, 0, 6);
        assert_eq!(side_award.get(&2), Some(&4000));
        assert_eq!(side_award.get(&1), None);
    }

    #[test]
    fn folded_players_still_contribute_to_lower_tiers() {
        // Seat 0 folded after committing 500; seats 1 and 2 stayed in at
        // distinct levels (2000 and 3000), so two real tiers emerge even
        // though seat 0 is never eligible for either.
        let commitments = vec![(0, 500, true), (1, 2000, false), (2, 3000, false)];
        let tiers = PotEngine::build_pots(&commitments);
        assert_eq!(tiers.len(), 2);
        // Up to the 2000 level: 500 from seat 0, 2000 from seat 1, 2000 from seat 2.
        assert_eq!(tiers[0].amount, 4500);
        assert_eq!(tiers[0].eligible, BTreeSet::from([1, 2]));
        // Above 2000 up to 3000: only seat 2 still has chips in.
        assert_eq!(tiers[1].amount, 1000);
        assert_eq!(tiers[1].eligible, BTreeSet::from([2]));
    }

    #[test]
    fn single_eligible_seat_wins_without_evaluation() {
        let tier = PotTier {
            amount: 150,
            eligible: BTreeSet::from([2]),
        };
        let award = PotEngine::award(&tier, &HashMap::new(), 0, 6);
        assert_eq!(award.get(&2), Some(&150));
    }

    #[test]
    fn odd_chip_goes_to_seat_closest_to_dealer_left() {
        let tier = PotTier {
            amount: 101,
            eligible: BTreeSet::from([3, 5]),
        };
        let mut hands = HashMap::new();
        hands.insert(3, rank(HandCategory::Pair, &[9]));
        hands.insert(5, rank(HandCategory::Pair, &[9]));
        // Dealer at seat 0: left-of-dealer is 1, so clockwise order is 3 then 5.
        let award = PotEngine::award(&tier, &hands, 0, 6);
        assert_eq!(award.get(&3), Some(&51));
        assert_eq!(award.get(&5), Some(&50));
    }

    #[test]
    fn chip_pile_always_sums_to_collected_total() {
        let mut pile = ChipPile::new();
        pile.collect(1537);
        assert_eq!(pile.total(), 1537);
        pile.collect(88);
        assert_eq!(pile.total(), 1625);
    }
}
