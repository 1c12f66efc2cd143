//! Exercises a complete three-handed hand end to end: blind posting, a
//! preflop calling round, three streets of checking, and the automatic
//! showdown that `advance_street` triggers once the river closes without
//! anyone going all-in.

use poker_engine::game::rng::DeterministicRng;
use poker_engine::{Action, GameData, GameSettings, Phase, SeatedPlayer};

fn new_game() -> GameData {
    let mut data = GameData::new(GameSettings {
        small_blind: 50,
        big_blind: 100,
        ..Default::default()
    });
    for (seat, handle, stack) in [(0, "a", 1000), (1, "b", 1000), (2, "c", 1000)] {
        let settings = data.settings;
        data.seat_player(seat, SeatedPlayer::new(handle.to_string(), handle.to_string(), stack, &settings))
            .unwrap();
    }
    data
}

#[test]
fn a_full_hand_reaches_showdown_and_conserves_chips() {
    let mut data = new_game();
    let mut rng = DeterministicRng::from_seed(42);
    assert!(data.try_start_hand(&mut rng));

    // Three-handed: dealer is seat 0, sb seat 1, bb seat 2, first to act
    // preflop is the dealer.
    assert_eq!(data.dealer_seat, 0);
    assert_eq!(data.sb_seat, Some(1));
    assert_eq!(data.bb_seat, Some(2));
    assert_eq!(data.current_actor, Some(0));

    data.apply_action("a", Action::Call).unwrap();
    data.apply_action("b", Action::Call).unwrap();
    data.apply_action("c", Action::Check).unwrap();

    assert_eq!(data.phase, Phase::Flop);
    assert_eq!(data.community.len(), 3);
    assert_eq!(data.current_actor, Some(1));

    for street in [Phase::Turn, Phase::River] {
        data.apply_action("b", Action::Check).unwrap();
        data.apply_action("c", Action::Check).unwrap();
        data.apply_action("a", Action::Check).unwrap();
        if street != Phase::River {
            assert_eq!(data.phase, street);
        }
    }

    // The river's closing check transitions straight through to showdown:
    // no dramatic run-out, no external draining required, since nobody
    // went all-in and the board was already complete.
    data.apply_action("b", Action::Check).unwrap();
    data.apply_action("c", Action::Check).unwrap();
    data.apply_action("a", Action::Check).unwrap();

    assert_eq!(data.phase, Phase::Idle);
    assert_eq!(data.community.len(), 5);
    assert_eq!(data.pot, 0);
    assert!(!data.runout_pending());

    let total: i64 = data.seats.iter().flatten().map(|p| p.stack).sum();
    assert_eq!(total, 3000);
}

#[test]
fn folding_preflop_awards_the_pot_without_a_showdown() {
    let mut data = new_game();
    let mut rng = DeterministicRng::from_seed(7);
    data.try_start_hand(&mut rng);

    data.apply_action("a", Action::Fold).unwrap();
    data.apply_action("b", Action::Fold).unwrap();

    assert_eq!(data.phase, Phase::Idle);
    assert_eq!(data.community.len(), 0);
    let c = data.seats[2].as_ref().unwrap();
    assert_eq!(c.stack, 1100);
    let total: i64 = data.seats.iter().flatten().map(|p| p.stack).sum();
    assert_eq!(total, 3000);
}

#[test]
fn a_raised_pot_still_conserves_chips_through_showdown() {
    let mut data = new_game();
    let mut rng = DeterministicRng::from_seed(99);
    data.try_start_hand(&mut rng);

    data.apply_action("a", Action::Raise { total: 300 }).unwrap();
    data.apply_action("b", Action::Call).unwrap();
    data.apply_action("c", Action::Call).unwrap();
    assert_eq!(data.phase, Phase::Flop);

    for _ in 0..3 {
        data.apply_action("b", Action::Check).unwrap();
        data.apply_action("c", Action::Check).unwrap();
        data.apply_action("a", Action::Check).unwrap();
    }

    assert_eq!(data.phase, Phase::Idle);
    let total: i64 = data.seats.iter().flatten().map(|p| p.stack).sum();
    assert_eq!(total, 3000);
}
