//! Integration tests for edge cases that are easy to get wrong in a
//! from-scratch betting engine: deck exhaustion, the min-raise floor, the
//! all-in "uncontestable excess" exception, and the anti-ratholing buy-in
//! clamp.

use poker_engine::game::cards::Deck;
use poker_engine::game::rng::DeterministicRng;
use poker_engine::table::TableConfig;
use poker_engine::{Action, GameData, GameSettings, Phase, SeatedPlayer};

fn seat(data: &mut GameData, seat: usize, handle: &str, stack: i64) {
    let settings = data.settings;
    data.seat_player(seat, SeatedPlayer::new(handle.to_string(), handle.to_string(), stack, &settings))
        .unwrap();
}

/// A single deck only ever deals 52 cards; drawing past that returns `None`
/// rather than silently reshuffling a fresh deck into play mid-hand.
#[test]
fn drawing_past_fifty_two_cards_yields_none_instead_of_reshuffling() {
    let mut rng = DeterministicRng::from_seed(5);
    let mut deck = Deck::shuffled(&mut rng);
    for _ in 0..52 {
        assert!(deck.draw().is_some());
    }
    assert_eq!(deck.draw(), None);
    assert_eq!(deck.burn(), None);
}

/// A three-handed hand deals 6 hole cards and can run a full board (5 more)
/// without coming close to exhausting the deck.
#[test]
fn a_full_hand_never_exhausts_the_deck() {
    let mut data = GameData::new(GameSettings {
        small_blind: 50,
        big_blind: 100,
        ..Default::default()
    });
    seat(&mut data, 0, "a", 1000);
    seat(&mut data, 1, "b", 1000);
    seat(&mut data, 2, "c", 1000);
    let mut rng = DeterministicRng::from_seed(13);
    data.try_start_hand(&mut rng);
    assert_eq!(data.deck.len(), 52 - 6);

    data.apply_action("a", Action::Call).unwrap();
    data.apply_action("b", Action::Call).unwrap();
    data.apply_action("c", Action::Check).unwrap();
    assert_eq!(data.deck.len(), 52 - 6 - 1 - 3); // burn + flop

    for _ in 0..2 {
        data.apply_action("b", Action::Check).unwrap();
        data.apply_action("c", Action::Check).unwrap();
        data.apply_action("a", Action::Check).unwrap();
    }
    assert_eq!(data.deck.len(), 52 - 6 - 3 - 3); // two more burn-and-deal-ones
}

/// A raise below the legal minimum is rejected with the amount and the
/// minimum it should have met, not silently rounded up.
#[test]
fn undersized_raise_is_rejected_with_the_legal_minimum() {
    let mut data = GameData::new(GameSettings {
        small_blind: 50,
        big_blind: 100,
        ..Default::default()
    });
    seat(&mut data, 0, "a", 1000);
    seat(&mut data, 1, "b", 1000);
    seat(&mut data, 2, "c", 1000);
    let mut rng = DeterministicRng::from_seed(21);
    data.try_start_hand(&mut rng);

    let err = data.apply_action("a", Action::Raise { total: 150 }).unwrap_err();
    match err {
        poker_engine::UserError::RaiseTooSmall { total, minimum } => {
            assert_eq!(total, 150);
            assert_eq!(minimum, 200); // bb(100) + last_raise(100)
        }
        other => panic!("expected RaiseTooSmall, got {other:?}"),
    }
}

/// When every opponent is already all-in at or below the current bet,
/// nobody remains who could call a larger raise — so a declared raise past
/// that bet is accepted but collapses to a capped call of the current bet
/// rather than committing the full declared amount.
#[test]
fn raise_over_all_capped_opponents_collapses_to_the_current_bet() {
    let mut data = GameData::new(GameSettings {
        small_blind: 50,
        big_blind: 100,
        ..Default::default()
    });
    seat(&mut data, 0, "a", 1000);
    seat(&mut data, 1, "b", 150);
    seat(&mut data, 2, "c", 1100);
    let mut rng = DeterministicRng::from_seed(33);
    data.try_start_hand(&mut rng);

    data.apply_action("a", Action::Raise { total: 1000 }).unwrap();
    assert!(data.seats[0].as_ref().unwrap().all_in);
    data.apply_action("b", Action::Call).unwrap();
    assert!(data.seats[1].as_ref().unwrap().all_in);
    assert_eq!(data.seats[1].as_ref().unwrap().street_committed, 150);

    // Both opponents are now all-in at or below the 1000 bet, so c's
    // declared raise to 1200 is accepted but capped down to 1000.
    data.apply_action("c", Action::Raise { total: 1200 }).unwrap();
    let c = data.seats[2].as_ref().unwrap();
    assert_eq!(c.street_committed, 1000);
    assert_eq!(c.stack, 100);
}

/// A returning player's buy-in is clamped to at least their prior stack (no
/// dumping chips to rebuy small) and never above the table max.
#[test]
fn rebuy_is_clamped_between_prior_stack_and_table_max() {
    let cfg = TableConfig::default();
    assert_eq!(cfg.clamp_buyin(500, Some(6_000)), 6_000);
    assert_eq!(cfg.clamp_buyin(500, None), cfg.min_buyin);
    assert_eq!(cfg.clamp_buyin(999_999, Some(6_000)), cfg.max_buyin);
}

#[test]
fn phase_starts_idle_until_a_hand_is_dealt() {
    let data = GameData::new(GameSettings::default());
    assert_eq!(data.phase, Phase::Idle);
}
