//! Verifies the `won_amount = ending_stack - starting_stack + total_committed`
//! identity against hand records archived by a real table, not just the
//! arithmetic in isolation.

use std::sync::Arc;
use std::time::Duration;

use poker_engine::adapters::persistence::{InMemoryPersistenceAdapter, PersistenceAdapter};
use poker_engine::table::history::HandParticipant;
use poker_engine::{TableConfig, TableManager};

fn fast_start_config() -> TableConfig {
    TableConfig {
        hand_start_delay_ms: 20,
        ..Default::default()
    }
}

#[tokio::test]
async fn a_completed_hand_s_participants_satisfy_the_conservation_identity() {
    let persistence = Arc::new(InMemoryPersistenceAdapter::new());
    let manager = Arc::new(TableManager::new(Arc::clone(&persistence) as Arc<dyn PersistenceAdapter>));
    let table = manager.spawn_table("t1".to_string(), fast_start_config()).await;

    table.join_table("alice".to_string(), "Alice".to_string(), 2_000, None).await.unwrap();
    table.join_table("bob".to_string(), "Bob".to_string(), 2_000, None).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Heads-up: the small blind acts first preflop. Folding ends the hand
    // uncontested and triggers archival without needing to play it out.
    let snapshot = table.snapshot().await.unwrap();
    let current_identity = snapshot.seats[snapshot.current_actor.unwrap()].as_ref().unwrap().identity.clone();
    table.take_action(current_identity, poker_engine::Action::Fold).await.unwrap();

    tokio::time::sleep(Duration::from_millis(50)).await;

    let hands = persistence.hands_by_identity("alice", 10).await.unwrap();
    assert_eq!(hands.len(), 1);
    let record = &hands[0];
    assert_eq!(record.participants.len(), 2);

    let mut total_won = 0i64;
    for participant in &record.participants {
        let recomputed = HandParticipant::compute_won_amount(
            participant.ending_stack,
            participant.starting_stack,
            participant.total_committed,
        );
        assert_eq!(recomputed, participant.won_amount);
        total_won += participant.won_amount;
    }

    // A hand with no rake is zero-sum: one player's gain is exactly the
    // other's loss.
    assert_eq!(total_won, 0);
}

#[tokio::test]
async fn a_played_out_three_way_hand_also_conserves_chips_across_participants() {
    let persistence = Arc::new(InMemoryPersistenceAdapter::new());
    let manager = Arc::new(TableManager::new(Arc::clone(&persistence) as Arc<dyn PersistenceAdapter>));
    let table = manager.spawn_table("t1".to_string(), fast_start_config()).await;

    table.join_table("alice".to_string(), "Alice".to_string(), 1_000, None).await.unwrap();
    table.join_table("bob".to_string(), "Bob".to_string(), 1_000, None).await.unwrap();
    table.join_table("carol".to_string(), "Carol".to_string(), 1_000, None).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Everyone folds around to the big blind, who wins uncontested.
    for _ in 0..2 {
        let snapshot = table.snapshot().await.unwrap();
        let current_identity = snapshot.seats[snapshot.current_actor.unwrap()].as_ref().unwrap().identity.clone();
        table.take_action(current_identity, poker_engine::Action::Fold).await.unwrap();
    }

    tokio::time::sleep(Duration::from_millis(50)).await;

    let hands = persistence.hands_by_identity("alice", 10).await.unwrap();
    let record = hands.last().unwrap();
    assert_eq!(record.participants.len(), 3);

    let mut total_won = 0i64;
    for participant in &record.participants {
        let recomputed = HandParticipant::compute_won_amount(
            participant.ending_stack,
            participant.starting_stack,
            participant.total_committed,
        );
        assert_eq!(recomputed, participant.won_amount);
        total_won += participant.won_amount;
    }
    assert_eq!(total_won, 0);
}
