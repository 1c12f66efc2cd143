//! Property-based tests for `evaluate_best` across randomly generated card
//! combinations, plus the fixed category-ordering checks a hand evaluator
//! has to get right no matter how it's implemented.

use std::collections::BTreeSet;

use poker_engine::game::cards::{Card, Rank, Suit};
use poker_engine::game::eval::{HandCategory, evaluate_best};
use proptest::prelude::*;

fn card_strategy() -> impl Strategy<Value = Card> {
    (0usize..13, 0usize..4).prop_map(|(rank_idx, suit_idx)| Card::new(Rank::ALL[rank_idx], Suit::ALL[suit_idx]))
}

fn unique_cards_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(card_strategy(), min..=max)
        .prop_filter("cards must be unique", |cards| {
            let set: BTreeSet<_> = cards.iter().collect();
            set.len() == cards.len()
        })
}

fn five_card_hand() -> impl Strategy<Value = Vec<Card>> {
    unique_cards_strategy(5, 5)
}

fn seven_card_hand() -> impl Strategy<Value = Vec<Card>> {
    unique_cards_strategy(7, 7)
}

proptest! {
    #[test]
    fn evaluate_best_is_deterministic(cards in seven_card_hand()) {
        let a = evaluate_best(&cards);
        let b = evaluate_best(&cards);
        prop_assert_eq!(a.category, b.category);
        prop_assert_eq!(a.tiebreakers, b.tiebreakers);
    }

    #[test]
    fn evaluate_best_is_invariant_under_input_order(cards in seven_card_hand()) {
        let forward = evaluate_best(&cards);
        let mut reversed = cards.clone();
        reversed.reverse();
        let backward = evaluate_best(&reversed);
        prop_assert_eq!(forward.category, backward.category);
        prop_assert_eq!(forward.tiebreakers, backward.tiebreakers);
    }

    #[test]
    fn evaluate_best_never_beats_a_strictly_worse_of_its_own_five_card_subsets(cards in seven_card_hand()) {
        let best = evaluate_best(&cards);
        let first_five = evaluate_best(&cards[..5]);
        prop_assert!(best >= first_five);
    }

    #[test]
    fn five_card_tiebreakers_are_never_empty(cards in five_card_hand()) {
        let rank = evaluate_best(&cards);
        prop_assert!(!rank.tiebreakers.is_empty());
    }

    #[test]
    fn category_index_matches_the_derived_ordinal(cards in five_card_hand()) {
        let rank = evaluate_best(&cards);
        prop_assert_eq!(rank.category.category_index(), rank.category as u8);
    }
}

fn card(rank: Rank, suit: Suit) -> Card {
    Card::new(rank, suit)
}

#[test]
fn royal_flush_beats_quads() {
    let royal = vec![
        card(Rank::Ten, Suit::Spades),
        card(Rank::Jack, Suit::Spades),
        card(Rank::Queen, Suit::Spades),
        card(Rank::King, Suit::Spades),
        card(Rank::Ace, Suit::Spades),
    ];
    let quads = vec![
        card(Rank::Nine, Suit::Clubs),
        card(Rank::Nine, Suit::Diamonds),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::Nine, Suit::Spades),
        card(Rank::Eight, Suit::Clubs),
    ];
    assert!(evaluate_best(&royal) > evaluate_best(&quads));
}

#[test]
fn straight_flush_beats_quads() {
    let straight_flush = vec![
        card(Rank::Five, Suit::Hearts),
        card(Rank::Six, Suit::Hearts),
        card(Rank::Seven, Suit::Hearts),
        card(Rank::Eight, Suit::Hearts),
        card(Rank::Nine, Suit::Hearts),
    ];
    let quads = vec![
        card(Rank::King, Suit::Clubs),
        card(Rank::King, Suit::Diamonds),
        card(Rank::King, Suit::Hearts),
        card(Rank::King, Suit::Spades),
        card(Rank::Queen, Suit::Clubs),
    ];
    assert!(evaluate_best(&straight_flush) > evaluate_best(&quads));
}

#[test]
fn quads_beats_full_house() {
    let quads = vec![
        card(Rank::Four, Suit::Clubs),
        card(Rank::Four, Suit::Diamonds),
        card(Rank::Four, Suit::Hearts),
        card(Rank::Four, Suit::Spades),
        card(Rank::Three, Suit::Clubs),
    ];
    let full_house = vec![
        card(Rank::Three, Suit::Clubs),
        card(Rank::Three, Suit::Diamonds),
        card(Rank::Three, Suit::Hearts),
        card(Rank::Four, Suit::Clubs),
        card(Rank::Four, Suit::Diamonds),
    ];
    assert!(evaluate_best(&quads) > evaluate_best(&full_house));
}

#[test]
fn full_house_beats_flush() {
    let full_house = vec![
        card(Rank::Eight, Suit::Clubs),
        card(Rank::Eight, Suit::Diamonds),
        card(Rank::Eight, Suit::Hearts),
        card(Rank::Five, Suit::Clubs),
        card(Rank::Five, Suit::Diamonds),
    ];
    let flush = vec![
        card(Rank::Two, Suit::Spades),
        card(Rank::Four, Suit::Spades),
        card(Rank::Seven, Suit::Spades),
        card(Rank::Ten, Suit::Spades),
        card(Rank::King, Suit::Spades),
    ];
    assert!(evaluate_best(&full_house) > evaluate_best(&flush));
}

#[test]
fn flush_beats_straight() {
    let flush = vec![
        card(Rank::Two, Suit::Clubs),
        card(Rank::Five, Suit::Clubs),
        card(Rank::Eight, Suit::Clubs),
        card(Rank::Ten, Suit::Clubs),
        card(Rank::King, Suit::Clubs),
    ];
    let straight = vec![
        card(Rank::Seven, Suit::Clubs),
        card(Rank::Eight, Suit::Diamonds),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::Ten, Suit::Spades),
        card(Rank::Jack, Suit::Clubs),
    ];
    assert!(evaluate_best(&flush) > evaluate_best(&straight));
}

#[test]
fn straight_beats_trips() {
    let straight = vec![
        card(Rank::Three, Suit::Clubs),
        card(Rank::Four, Suit::Diamonds),
        card(Rank::Five, Suit::Hearts),
        card(Rank::Six, Suit::Spades),
        card(Rank::Seven, Suit::Clubs),
    ];
    let trips = vec![
        card(Rank::King, Suit::Clubs),
        card(Rank::King, Suit::Diamonds),
        card(Rank::King, Suit::Hearts),
        card(Rank::Two, Suit::Clubs),
        card(Rank::Four, Suit::Clubs),
    ];
    assert!(evaluate_best(&straight) > evaluate_best(&trips));
}

#[test]
fn trips_beats_two_pair() {
    let trips = vec![
        card(Rank::Six, Suit::Clubs),
        card(Rank::Six, Suit::Diamonds),
        card(Rank::Six, Suit::Hearts),
        card(Rank::Two, Suit::Clubs),
        card(Rank::Three, Suit::Diamonds),
    ];
    let two_pair = vec![
        card(Rank::King, Suit::Clubs),
        card(Rank::King, Suit::Diamonds),
        card(Rank::Queen, Suit::Hearts),
        card(Rank::Queen, Suit::Spades),
        card(Rank::Six, Suit::Clubs),
    ];
    assert!(evaluate_best(&trips) > evaluate_best(&two_pair));
}

#[test]
fn two_pair_beats_pair() {
    let two_pair = vec![
        card(Rank::Four, Suit::Clubs),
        card(Rank::Four, Suit::Diamonds),
        card(Rank::Nine, Suit::Hearts),
        card(Rank::Nine, Suit::Spades),
        card(Rank::King, Suit::Clubs),
    ];
    let pair = vec![
        card(Rank::King, Suit::Clubs),
        card(Rank::King, Suit::Diamonds),
        card(Rank::Ace, Suit::Hearts),
        card(Rank::Queen, Suit::Spades),
        card(Rank::Jack, Suit::Clubs),
    ];
    assert!(evaluate_best(&two_pair) > evaluate_best(&pair));
}

#[test]
fn pair_beats_high_card() {
    let pair = vec![
        card(Rank::Seven, Suit::Clubs),
        card(Rank::Seven, Suit::Diamonds),
        card(Rank::Two, Suit::Hearts),
        card(Rank::Five, Suit::Spades),
        card(Rank::Ten, Suit::Clubs),
    ];
    let high_card = vec![
        card(Rank::Ace, Suit::Clubs),
        card(Rank::King, Suit::Diamonds),
        card(Rank::Queen, Suit::Hearts),
        card(Rank::Jack, Suit::Spades),
        card(Rank::Nine, Suit::Clubs),
    ];
    assert!(evaluate_best(&pair) > evaluate_best(&high_card));
}

#[test]
fn wheel_straight_loses_to_six_high_straight() {
    let wheel = vec![
        card(Rank::Ace, Suit::Clubs),
        card(Rank::Two, Suit::Diamonds),
        card(Rank::Three, Suit::Hearts),
        card(Rank::Four, Suit::Spades),
        card(Rank::Five, Suit::Clubs),
    ];
    let six_high = vec![
        card(Rank::Two, Suit::Clubs),
        card(Rank::Three, Suit::Diamonds),
        card(Rank::Four, Suit::Hearts),
        card(Rank::Five, Suit::Spades),
        card(Rank::Six, Suit::Clubs),
    ];
    let wheel_rank = evaluate_best(&wheel);
    assert_eq!(wheel_rank.category, HandCategory::Straight);
    assert!(evaluate_best(&six_high) > wheel_rank);
}
