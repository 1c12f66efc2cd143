//! The Session Coordinator (spec 4.5): maps identities and anonymous
//! observers onto transports and table seats, computes personalised
//! broadcasts, and owns the disconnect-grace / auto-sit-out / kick
//! cascade.
//!
//! Grounded on the teacher's `AppState` (`pp_server/src/api/mod.rs`): a
//! `Clone`-able bundle of `Arc`-wrapped shared services threaded through
//! every handler. `pp_server/src/api/websocket.rs`'s per-connection send
//! task (spawn a forwarding loop, push to the transport until the channel
//! closes) is generalized from a fixed 1-second poll into a per-table
//! forwarder that reacts to the table actor's own event broadcasts.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{RwLock, mpsc};

use crate::adapters::auth::{AuthAdapter, AuthError, IdentityProfile};
use crate::adapters::persistence::{PersistenceAdapter, PersistenceError};
use crate::game::pot::{Chips, SeatIndex};
use crate::game::state_machine::{Action, GameEvent, Identity, Phase};
use crate::table::manager::TableManager;
use crate::table::messages::{TableError, TableResponse, TableSnapshot};

use super::messages::{CoordinatorEvent, GameView, SeatView};

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("table not found")]
    TableNotFound,
    #[error("identity is banned")]
    Banned,
    #[error("identity is already seated at a different table")]
    AlreadyElsewhere,
    #[error("not seated at any table")]
    NotSeated,
}

#[derive(Debug, Clone, Copy)]
pub struct SessionTimings {
    pub disconnect_grace_ms: u64,
    pub auto_sit_out_ms: u64,
    pub kick_ms: u64,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            disconnect_grace_ms: 10_000,
            auto_sit_out_ms: 60_000,
            kick_ms: 300_000,
        }
    }
}

struct IdentitySession {
    table_id: String,
    seat: SeatIndex,
    sender: mpsc::Sender<CoordinatorEvent>,
    disconnected: bool,
    generation: u64,
}

struct Room {
    subscribers: HashMap<u64, (Option<Identity>, mpsc::Sender<CoordinatorEvent>)>,
    next_sub_id: u64,
}

impl Room {
    fn new() -> Self {
        Self {
            subscribers: HashMap::new(),
            next_sub_id: 0,
        }
    }

    fn insert(&mut self, identity: Option<Identity>, sender: mpsc::Sender<CoordinatorEvent>) -> u64 {
        let id = self.next_sub_id;
        self.next_sub_id += 1;
        self.subscribers.insert(id, (identity, sender));
        id
    }

    /// Drops this identity's existing subscriber entry, if any (stale sender
    /// from the dropped transport, or already evicted by the grace-timer
    /// `retain`), and inserts a fresh one on the reconnected sender.
    fn replace_for_identity(&mut self, identity: &Identity, sender: mpsc::Sender<CoordinatorEvent>) -> u64 {
        self.subscribers.retain(|_, (id, _)| id.as_deref() != Some(identity.as_str()));
        self.insert(Some(identity.clone()), sender)
    }
}

#[derive(Clone)]
pub struct SessionCoordinator {
    auth: Arc<dyn AuthAdapter>,
    persistence: Arc<dyn PersistenceAdapter>,
    tables: Arc<TableManager>,
    rooms: Arc<RwLock<HashMap<String, Room>>>,
    identities: Arc<RwLock<HashMap<Identity, IdentitySession>>>,
    observer_counter: Arc<AtomicU64>,
    timings: SessionTimings,
}

impl SessionCoordinator {
    pub fn new(
        auth: Arc<dyn AuthAdapter>,
        persistence: Arc<dyn PersistenceAdapter>,
        tables: Arc<TableManager>,
        timings: SessionTimings,
    ) -> Self {
        Self {
            auth,
            persistence,
            tables,
            rooms: Arc::new(RwLock::new(HashMap::new())),
            identities: Arc::new(RwLock::new(HashMap::new())),
            observer_counter: Arc::new(AtomicU64::new(0)),
            timings,
        }
    }

    pub async fn authenticate(&self, session_token: &str) -> Result<IdentityProfile, CoordinatorError> {
        self.auth
            .resolve_session(session_token)
            .await?
            .ok_or(CoordinatorError::Auth(AuthError::InvalidChallenge))
    }

    /// Ensures a per-table forwarder task is running: it subscribes to the
    /// table actor's broadcast channel and turns every `TableResponse`
    /// into a fresh personalised push per room subscriber.
    async fn ensure_room(&self, table_id: &str) -> Result<(), CoordinatorError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(table_id) {
            return Ok(());
        }
        let handle = self.tables.get_table(table_id).await.ok_or(CoordinatorError::TableNotFound)?;
        rooms.insert(table_id.to_string(), Room::new());
        drop(rooms);

        let (tx, mut rx) = mpsc::channel(256);
        // A forwarder-only subscription; its identity slot is unused.
        handle.subscribe(u64::MAX, tx).await;

        let coordinator = self.clone();
        let table_id = table_id.to_string();
        tokio::spawn(async move {
            while let Some(response) = rx.recv().await {
                match response {
                    TableResponse::Events(events) => {
                        coordinator.broadcast_table_events(&table_id, events).await;
                    }
                    TableResponse::Closed => {
                        coordinator.rooms.write().await.remove(&table_id);
                        break;
                    }
                }
            }
        });
        Ok(())
    }

    pub async fn join_table(
        &self,
        identity: Identity,
        handle_name: String,
        table_id: &str,
        buy_in: Chips,
        preferred_seat: Option<SeatIndex>,
        sender: mpsc::Sender<CoordinatorEvent>,
    ) -> Result<SeatIndex, CoordinatorError> {
        if let Some(player) = self.persistence.find_player(&identity).await? {
            if player.is_banned {
                return Err(CoordinatorError::Banned);
            }
        }

        let table_handle = self.tables.get_table(table_id).await.ok_or(CoordinatorError::TableNotFound)?;

        let mut identities = self.identities.write().await;
        if let Some(existing) = identities.get_mut(&identity) {
            if existing.table_id != table_id {
                return Err(CoordinatorError::AlreadyElsewhere);
            }
            // Reconnection: swap the transport, clear disconnected.
            existing.sender = sender.clone();
            existing.disconnected = false;
            existing.generation += 1;
            let seat = existing.seat;
            drop(identities);

            if let Some(room) = self.rooms.write().await.get_mut(table_id) {
                room.replace_for_identity(&identity, sender.clone());
            }

            let _ = sender.send(CoordinatorEvent::SeatAssigned { seat }).await;
            self.push_view_to(table_id, table_handle.snapshot().await?, Some(&identity), Some(seat), &sender)
                .await;
            return Ok(seat);
        }
        drop(identities);

        self.ensure_room(table_id).await?;
        let seat = table_handle
            .join_table(identity.clone(), handle_name, buy_in, preferred_seat)
            .await?;

        let mut rooms = self.rooms.write().await;
        let room = rooms.entry(table_id.to_string()).or_insert_with(Room::new);
        room.insert(Some(identity.clone()), sender.clone());
        drop(rooms);

        self.identities.write().await.insert(
            identity.clone(),
            IdentitySession {
                table_id: table_id.to_string(),
                seat,
                sender: sender.clone(),
                disconnected: false,
                generation: 0,
            },
        );

        let _ = sender.send(CoordinatorEvent::SeatAssigned { seat }).await;
        self.broadcast_snapshot(table_id).await;
        Ok(seat)
    }

    /// `observe-table`: no authentication, a generated pseudonym, and a
    /// subscription to the room's broadcasts.
    pub async fn observe_table(
        &self,
        table_id: &str,
        sender: mpsc::Sender<CoordinatorEvent>,
    ) -> Result<String, CoordinatorError> {
        self.tables.get_table(table_id).await.ok_or(CoordinatorError::TableNotFound)?;
        self.ensure_room(table_id).await?;

        let n = self.observer_counter.fetch_add(1, Ordering::Relaxed);
        let pseudonym = format!("Observer-{n}");

        let mut rooms = self.rooms.write().await;
        let room = rooms.entry(table_id.to_string()).or_insert_with(Room::new);
        room.insert(None, sender);
        drop(rooms);

        self.broadcast_snapshot(table_id).await;
        Ok(pseudonym)
    }

    pub async fn take_action(&self, identity: &str, action: Action) -> Result<(), CoordinatorError> {
        let table_handle = self.table_for(identity).await?;
        table_handle.take_action(identity.to_string(), action).await?;
        Ok(())
    }

    pub async fn sit_out(&self, identity: &str) -> Result<(), CoordinatorError> {
        let table_handle = self.table_for(identity).await?;
        table_handle.sit_out(identity.to_string()).await?;
        Ok(())
    }

    pub async fn sit_back_in(&self, identity: &str) -> Result<(), CoordinatorError> {
        let table_handle = self.table_for(identity).await?;
        table_handle.sit_back_in(identity.to_string()).await?;
        Ok(())
    }

    pub async fn rebuy(&self, identity: &str, amount: Chips) -> Result<Chips, CoordinatorError> {
        let table_handle = self.table_for(identity).await?;
        let stack = table_handle.rebuy(identity.to_string(), amount).await?;
        self.persistence.update_player_chips(identity, 0).await.ok();
        Ok(stack)
    }

    pub async fn leave_table(&self, identity: &str) -> Result<(), CoordinatorError> {
        let table_id = {
            let identities = self.identities.read().await;
            identities.get(identity).map(|s| s.table_id.clone())
        };
        let Some(table_id) = table_id else {
            return Err(CoordinatorError::NotSeated);
        };
        let table_handle = self.tables.get_table(&table_id).await.ok_or(CoordinatorError::TableNotFound)?;
        table_handle.leave_table(identity.to_string()).await?;
        self.identities.write().await.remove(identity);
        Ok(())
    }

    /// Never mutates game state (spec 4.5): a plain tagged broadcast.
    pub async fn chat_message(&self, table_id: &str, from: Option<&str>, text: String) {
        const MAX_CHAT_LEN: usize = 500;
        let text: String = text.chars().take(MAX_CHAT_LEN).collect();
        let is_observer = from.is_none();
        let from_label = from.map(|s| s.to_string()).unwrap_or_else(|| "observer".to_string());

        if let Some(room) = self.rooms.read().await.get(table_id) {
            for (_, sender) in room.subscribers.values() {
                let _ = sender
                    .send(CoordinatorEvent::Chat {
                        from: from_label.clone(),
                        is_observer,
                        text: text.clone(),
                    })
                    .await;
            }
        }
    }

    /// Transport dropped: start the disconnect-grace / auto-sit-out / kick
    /// cascade (spec 5's cancellable scheduled callbacks, using the same
    /// generation-counter stale-callback defence as the action timer).
    pub async fn on_transport_disconnected(&self, identity: &str) {
        let generation = {
            let mut identities = self.identities.write().await;
            let Some(session) = identities.get_mut(identity) else {
                return;
            };
            session.disconnected = true;
            session.generation += 1;
            session.generation
        };

        let coordinator = self.clone();
        let identity = identity.to_string();
        let timings = self.timings;
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(timings.disconnect_grace_ms)).await;
            if !coordinator.still_disconnected_at_generation(&identity, generation).await {
                return;
            }
            {
                let mut rooms = coordinator.rooms.write().await;
                if let Some(table_id) = coordinator.identities.read().await.get(&identity).map(|s| s.table_id.clone()) {
                    if let Some(room) = rooms.get_mut(&table_id) {
                        room.subscribers.retain(|_, (id, _)| id.as_deref() != Some(identity.as_str()));
                    }
                }
            }

            tokio::time::sleep(Duration::from_millis(timings.auto_sit_out_ms - timings.disconnect_grace_ms)).await;
            if !coordinator.still_disconnected_at_generation(&identity, generation).await {
                return;
            }
            let _ = coordinator.sit_out(&identity).await;

            tokio::time::sleep(Duration::from_millis(timings.kick_ms - timings.auto_sit_out_ms)).await;
            if !coordinator.still_disconnected_at_generation(&identity, generation).await {
                return;
            }
            let _ = coordinator.leave_table(&identity).await;
        });
    }

    async fn still_disconnected_at_generation(&self, identity: &str, generation: u64) -> bool {
        let identities = self.identities.read().await;
        identities
            .get(identity)
            .is_some_and(|s| s.disconnected && s.generation == generation)
    }

    async fn table_for(&self, identity: &str) -> Result<crate::table::actor::TableHandle, CoordinatorError> {
        let table_id = {
            let identities = self.identities.read().await;
            identities.get(identity).map(|s| s.table_id.clone())
        };
        let table_id = table_id.ok_or(CoordinatorError::NotSeated)?;
        self.tables.get_table(&table_id).await.ok_or(CoordinatorError::TableNotFound)
    }

    async fn broadcast_table_events(&self, table_id: &str, events: Vec<GameEvent>) {
        let Some(table_handle) = self.tables.get_table(table_id).await else {
            return;
        };
        let Ok(snapshot) = table_handle.snapshot().await else {
            return;
        };

        let rooms = self.rooms.read().await;
        let Some(room) = rooms.get(table_id) else { return };
        let subscribers: Vec<(Option<Identity>, mpsc::Sender<CoordinatorEvent>)> =
            room.subscribers.values().cloned().collect();
        drop(rooms);

        for event in &events {
            if let GameEvent::LogLine(line) = event {
                for (_, sender) in &subscribers {
                    let _ = sender.send(CoordinatorEvent::HandLog { line: line.clone() }).await;
                }
            }
            if let GameEvent::ActionTimerStart { seat, ms } = event {
                if let Some((identity, sender)) = subscribers.iter().find(|(id, _)| {
                    id.as_deref()
                        .is_some_and(|i| snapshot.seats.get(*seat).and_then(|s| s.as_ref()).is_some_and(|p| p.identity == i))
                }) {
                    let _ = identity;
                    let _ = sender.send(CoordinatorEvent::ActionTimerStart { seat: *seat, ms: *ms }).await;
                }
            }
            if let GameEvent::TimeBankStart { seat, ms } = event {
                for (_, sender) in &subscribers {
                    let _ = sender.send(CoordinatorEvent::TimeBankStart { seat: *seat, ms: *ms }).await;
                }
            }
            if let GameEvent::HandComplete { hand_id } = event {
                for (_, sender) in &subscribers {
                    let _ = sender.send(CoordinatorEvent::HandComplete { hand_id: *hand_id }).await;
                }
            }
            if let GameEvent::PersonalizedHandLog { seat, text } = event {
                let owner = snapshot
                    .seats
                    .get(*seat)
                    .and_then(|s| s.as_ref())
                    .map(|p| p.identity.as_str());
                if let Some(owner) = owner {
                    if let Some((_, sender)) = subscribers
                        .iter()
                        .find(|(id, _)| id.as_deref() == Some(owner))
                    {
                        let _ = sender
                            .send(CoordinatorEvent::PersonalizedHandLog { text: text.clone() })
                            .await;
                    }
                }
            }
        }

        for (identity, sender) in &subscribers {
            let seat = identity.as_deref().and_then(|i| {
                snapshot
                    .seats
                    .iter()
                    .position(|s| s.as_ref().is_some_and(|p| p.identity == i))
            });
            self.push_view_to(table_id, snapshot.clone(), identity.as_deref(), seat, sender).await;
        }
    }

    async fn broadcast_snapshot(&self, table_id: &str) {
        let Some(table_handle) = self.tables.get_table(table_id).await else {
            return;
        };
        let Ok(snapshot) = table_handle.snapshot().await else {
            return;
        };
        let rooms = self.rooms.read().await;
        let Some(room) = rooms.get(table_id) else { return };
        let subscribers: Vec<(Option<Identity>, mpsc::Sender<CoordinatorEvent>)> =
            room.subscribers.values().cloned().collect();
        drop(rooms);

        for (identity, sender) in &subscribers {
            let seat = identity.as_deref().and_then(|i| {
                snapshot
                    .seats
                    .iter()
                    .position(|s| s.as_ref().is_some_and(|p| p.identity == i))
            });
            self.push_view_to(table_id, snapshot.clone(), identity.as_deref(), seat, sender).await;
        }
    }

    async fn push_view_to(
        &self,
        table_id: &str,
        snapshot: TableSnapshot,
        viewer_identity: Option<&str>,
        viewer_seat: Option<SeatIndex>,
        sender: &mpsc::Sender<CoordinatorEvent>,
    ) {
        let showdown = snapshot.phase == Phase::Showdown;
        let seats = snapshot
            .seats
            .iter()
            .enumerate()
            .map(|(seat, slot)| {
                slot.as_ref().map(|p| {
                    let reveal = viewer_seat == Some(seat) || (showdown && !p.folded);
                    SeatView {
                        seat,
                        handle: p.handle.clone(),
                        stack: p.stack,
                        street_committed: p.street_committed,
                        folded: p.folded,
                        all_in: p.all_in,
                        sitting_out: p.sitting_out,
                        disconnected: p.disconnected,
                        hole_cards: if reveal { p.hole_cards } else { None },
                    }
                })
            })
            .collect();
        let _ = viewer_identity;

        let view = GameView {
            table_id: table_id.to_string(),
            hand_counter: snapshot.hand_counter,
            phase: snapshot.phase,
            dealer_seat: snapshot.dealer_seat,
            current_actor: snapshot.current_actor,
            community: snapshot.community,
            pot: snapshot.pot,
            seats,
            your_seat: viewer_seat,
        };
        let _ = sender.send(CoordinatorEvent::GameState(view)).await;
    }
}
