//! WebSocket integration tests for real-time poker gameplay: connection,
//! session-token authentication, join/action/chat message handling, and the
//! observer-only anonymous path.
//!
//! Grounded on the teacher's `pp_client` (the one sibling crate in this
//! pack that actually speaks this protocol as a client), which reaches for
//! `tokio-tungstenite` to drive a real WebSocket connection rather than
//! faking the upgrade in-process.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::Extension;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use poker_engine::adapters::auth::{IdentityProfile, InMemoryAuthAdapter};
use poker_engine::adapters::persistence::InMemoryPersistenceAdapter;
use poker_engine::session::{SessionCoordinator, SessionTimings};
use poker_engine::table::{TableConfig, TableManager};
use poker_server::api::{self, AppState};

const DEFAULT_BUY_IN: i64 = 2_000;

/// Spawns a real server on an ephemeral port with one table and one
/// pre-seeded authenticated session, returning the base `ws://` URL and
/// the session token.
async fn spawn_test_server() -> (String, String) {
    let persistence = Arc::new(InMemoryPersistenceAdapter::new());
    let auth = Arc::new(InMemoryAuthAdapter::new(300));
    let tables = Arc::new(TableManager::new(persistence.clone()));
    tables.spawn_table("t1".to_string(), TableConfig::default()).await;
    let coordinator = SessionCoordinator::new(auth.clone(), persistence.clone(), tables.clone(), SessionTimings::default());

    let session_token = "test-session-token".to_string();
    auth.seed_session(
        session_token.clone(),
        IdentityProfile {
            identity: "alice".to_string(),
            handle: "Alice".to_string(),
            avatar_url: None,
            lightning_address: None,
            current_chips: 0,
        },
    );

    let state = AppState {
        auth,
        persistence,
        tables,
        coordinator,
        admin_token: "admin-token".to_string(),
    };
    let app = api::create_router(state, &["*".to_string()]).layer(Extension(DEFAULT_BUY_IN));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("ws://{addr}"), session_token)
}

async fn next_json<S>(stream: &mut S) -> Value
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("timed out waiting for a server message")
            .expect("stream ended before a message arrived")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn authenticated_join_receives_seat_assignment_and_game_state() {
    let (base_url, session_token) = spawn_test_server().await;
    let url = format!("{base_url}/ws/t1?session_token={session_token}");
    let (mut socket, _) = connect_async(url).await.unwrap();

    socket
        .send(Message::Text(json!({"type": "join-table", "buy_in": 2000, "preferred_seat": null}).to_string().into()))
        .await
        .unwrap();

    let seat_assigned = next_json(&mut socket).await;
    assert_eq!(seat_assigned["type"], "seat-assigned");
    assert_eq!(seat_assigned["seat"], 0);

    let game_state = next_json(&mut socket).await;
    assert_eq!(game_state["type"], "game-state");
    assert_eq!(game_state["your_seat"], 0);
}

#[tokio::test]
async fn joining_without_a_session_token_yields_an_auth_error() {
    let (base_url, _) = spawn_test_server().await;
    let url = format!("{base_url}/ws/t1");
    let (mut socket, _) = connect_async(url).await.unwrap();

    socket
        .send(Message::Text(json!({"type": "join-table", "buy_in": 2000, "preferred_seat": null}).to_string().into()))
        .await
        .unwrap();

    let event = next_json(&mut socket).await;
    assert_eq!(event["type"], "auth-error");
}

#[tokio::test]
async fn observer_sees_game_state_but_cannot_join() {
    let (base_url, _) = spawn_test_server().await;
    let url = format!("{base_url}/ws/t1");
    let (mut socket, _) = connect_async(url).await.unwrap();

    socket.send(Message::Text(json!({"type": "observe-table"}).to_string().into())).await.unwrap();

    let game_state = next_json(&mut socket).await;
    assert_eq!(game_state["type"], "game-state");
    assert!(game_state["your_seat"].is_null());
}

#[tokio::test]
async fn malformed_frames_produce_an_error_event_without_closing_the_connection() {
    let (base_url, session_token) = spawn_test_server().await;
    let url = format!("{base_url}/ws/t1?session_token={session_token}");
    let (mut socket, _) = connect_async(url).await.unwrap();

    socket.send(Message::Text("not valid json at all".into())).await.unwrap();
    let event = next_json(&mut socket).await;
    assert_eq!(event["type"], "error");

    // The connection is still alive: a well-formed command still works.
    socket.send(Message::Text(json!({"type": "observe-table"}).to_string().into())).await.unwrap();
    let game_state = next_json(&mut socket).await;
    assert_eq!(game_state["type"], "game-state");
}

#[tokio::test]
async fn chat_message_is_broadcast_to_other_connections_in_the_room() {
    let (base_url, session_token) = spawn_test_server().await;
    let join_url = format!("{base_url}/ws/t1?session_token={session_token}");
    let (mut joiner, _) = connect_async(join_url).await.unwrap();
    joiner
        .send(Message::Text(json!({"type": "join-table", "buy_in": 2000, "preferred_seat": null}).to_string().into()))
        .await
        .unwrap();
    let _ = next_json(&mut joiner).await; // seat-assigned
    let _ = next_json(&mut joiner).await; // game-state

    let observer_url = format!("{base_url}/ws/t1");
    let (mut observer, _) = connect_async(observer_url).await.unwrap();
    observer.send(Message::Text(json!({"type": "observe-table"}).to_string().into())).await.unwrap();
    let _ = next_json(&mut observer).await; // game-state

    joiner
        .send(Message::Text(json!({"type": "chat-message", "text": "good luck"}).to_string().into()))
        .await
        .unwrap();

    let chat = next_json(&mut observer).await;
    assert_eq!(chat["type"], "chat");
    assert_eq!(chat["text"], "good luck");
    assert_eq!(chat["is_observer"], false);
}
