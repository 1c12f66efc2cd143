//! The per-table actor: owns `GameData` exclusively and drives it from a
//! single ordered inbox plus its own scheduled timer futures.
//!
//! Grounded on the teacher's `table/actor.rs` `TableActor`: a `run()` loop
//! built on `tokio::select!` between the inbox and a periodic wakeup,
//! `handle_message` dispatching every inbound variant, and a
//! `TableHandle` (`Clone`, wraps an `mpsc::Sender`) as the public entry
//! point. Wallet escrow, bot turns, and pause/resume are dropped; the
//! periodic 1-second tick is replaced with a small set of recomputed
//! deadlines (action timer, hand-start debounce, per-seat kick timers,
//! dramatic-run-out steps) selected over together each loop iteration,
//! matching spec 5's "every scheduled effect owns a cancel handle" by
//! cancelling same-slot deadlines whenever a new one of that kind is armed.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant as TokioInstant;

use crate::adapters::persistence::PersistenceAdapter;
use crate::game::pot::{Chips, SeatIndex};
use crate::game::rng::SecureRng;
use crate::game::state_machine::{
    Action, GameData, GameEvent, Identity, Phase, SeatedPlayer, UserError,
};
use crate::table::config::TableConfig;
use crate::table::history::{HandParticipant, HandRecord};
use crate::table::messages::{
    SeatSnapshot, TableError, TableMessage, TableResponse, TableResult, TableSnapshot,
};
use crate::table::timer::{ActionTimer, TimerOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeadlineKind {
    BaseTimer { generation: u64, seat: SeatIndex },
    TimeBank { generation: u64, seat: SeatIndex },
    HandStart,
    KickPlayer { seat: SeatIndex, generation: u64 },
    RunoutStep { generation: u64 },
}

impl DeadlineKind {
    /// Whether two deadlines occupy the same "slot" — arming a new one of
    /// the same kind should cancel any earlier one still pending, per spec
    /// 5's "every scheduled effect owns a cancel handle".
    fn same_slot(&self, other: &DeadlineKind) -> bool {
        matches!(
            (self, other),
            (DeadlineKind::BaseTimer { .. }, DeadlineKind::BaseTimer { .. })
                | (DeadlineKind::BaseTimer { .. }, DeadlineKind::TimeBank { .. })
                | (DeadlineKind::TimeBank { .. }, DeadlineKind::TimeBank { .. })
                | (DeadlineKind::TimeBank { .. }, DeadlineKind::BaseTimer { .. })
                | (DeadlineKind::HandStart, DeadlineKind::HandStart)
                | (DeadlineKind::RunoutStep { .. }, DeadlineKind::RunoutStep { .. })
        ) || matches!(
            (self, other),
            (DeadlineKind::KickPlayer { seat: a, .. }, DeadlineKind::KickPlayer { seat: b, .. }) if a == b
        )
    }
}

/// Cheaply cloneable handle to a running table actor.
#[derive(Clone)]
pub struct TableHandle {
    pub table_id: String,
    sender: mpsc::Sender<TableMessage>,
}

impl TableHandle {
    pub async fn join_table(
        &self,
        identity: String,
        handle: String,
        buy_in: i64,
        preferred_seat: Option<SeatIndex>,
    ) -> TableResult<SeatIndex> {
        let (tx, rx) = oneshot::channel();
        self.send(TableMessage::JoinTable {
            identity,
            handle,
            buy_in,
            preferred_seat,
            respond_to: tx,
        })
        .await?;
        rx.await.map_err(|_| TableError::Closed)?
    }

    pub async fn take_action(&self, identity: String, action: Action) -> TableResult<()> {
        let (tx, rx) = oneshot::channel();
        self.send(TableMessage::TakeAction {
            identity,
            action,
            respond_to: tx,
        })
        .await?;
        rx.await.map_err(|_| TableError::Closed)?
    }

    pub async fn leave_table(&self, identity: String) -> TableResult<()> {
        let (tx, rx) = oneshot::channel();
        self.send(TableMessage::LeaveTable {
            identity,
            respond_to: tx,
        })
        .await?;
        rx.await.map_err(|_| TableError::Closed)?
    }

    pub async fn sit_out(&self, identity: String) -> TableResult<()> {
        let (tx, rx) = oneshot::channel();
        self.send(TableMessage::SitOut {
            identity,
            respond_to: tx,
        })
        .await?;
        rx.await.map_err(|_| TableError::Closed)?
    }

    pub async fn sit_back_in(&self, identity: String) -> TableResult<()> {
        let (tx, rx) = oneshot::channel();
        self.send(TableMessage::SitBackIn {
            identity,
            respond_to: tx,
        })
        .await?;
        rx.await.map_err(|_| TableError::Closed)?
    }

    pub async fn rebuy(&self, identity: String, amount: i64) -> TableResult<i64> {
        let (tx, rx) = oneshot::channel();
        self.send(TableMessage::Rebuy {
            identity,
            amount,
            respond_to: tx,
        })
        .await?;
        rx.await.map_err(|_| TableError::Closed)?
    }

    pub async fn snapshot(&self) -> TableResult<TableSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(TableMessage::GetSnapshot { respond_to: tx }).await?;
        rx.await.map_err(|_| TableError::Closed)
    }

    pub async fn subscribe(&self, subscriber_id: u64, sender: mpsc::Sender<TableResponse>) {
        let _ = self
            .sender
            .send(TableMessage::Subscribe {
                subscriber_id,
                sender,
            })
            .await;
    }

    pub async fn unsubscribe(&self, subscriber_id: u64) {
        let _ = self.sender.send(TableMessage::Unsubscribe { subscriber_id }).await;
    }

    pub async fn close(&self) {
        let _ = self.sender.send(TableMessage::Close).await;
    }

    async fn send(&self, msg: TableMessage) -> TableResult<()> {
        self.sender.send(msg).await.map_err(|_| TableError::Closed)
    }
}

pub struct TableActor {
    table_id: String,
    config: TableConfig,
    data: GameData,
    timer: ActionTimer,
    kick_generation: HashMap<SeatIndex, u64>,
    /// Stack and departure time of every identity that has `leave`-d
    /// recently, consulted by the anti-ratholing clamp on rejoin/rebuy
    /// (spec 4.4 "Anti-ratholing").
    recent_departures: HashMap<Identity, (Chips, TokioInstant)>,
    inbox: mpsc::Receiver<TableMessage>,
    subscribers: HashMap<u64, mpsc::Sender<TableResponse>>,
    rng: Box<dyn SecureRng + Send>,
    persistence: Arc<dyn PersistenceAdapter>,
    /// Every scheduled effect currently armed. Picking the earliest each
    /// loop iteration lets the action timer, the hand-start debounce, a
    /// run-out step, and any number of per-seat kick timers coexist without
    /// a dedicated future per kind (spec 5's suspension points).
    pending_deadlines: Vec<(TokioInstant, DeadlineKind)>,
    hand_start_armed: bool,
    hand_started_at: i64,
    runout_generation: u64,
    is_closed: bool,
}

impl TableActor {
    pub fn new(
        table_id: String,
        config: TableConfig,
        rng: Box<dyn SecureRng + Send>,
        persistence: Arc<dyn PersistenceAdapter>,
    ) -> (Self, TableHandle) {
        let (tx, rx) = mpsc::channel(256);
        let data = GameData::new(config.game_settings());
        let actor = Self {
            table_id: table_id.clone(),
            config,
            data,
            timer: ActionTimer::new(),
            kick_generation: HashMap::new(),
            recent_departures: HashMap::new(),
            inbox: rx,
            subscribers: HashMap::new(),
            rng,
            persistence,
            pending_deadlines: Vec::new(),
            hand_start_armed: false,
            hand_started_at: 0,
            runout_generation: 0,
            is_closed: false,
        };
        (actor, TableHandle { table_id, sender: tx })
    }

    /// Cancels any pending deadline occupying the same slot as `kind`, then
    /// arms a new one `ms` milliseconds out.
    fn arm_deadline(&mut self, ms: u64, kind: DeadlineKind) {
        self.pending_deadlines.retain(|(_, k)| !k.same_slot(&kind));
        self.pending_deadlines
            .push((TokioInstant::now() + Duration::from_millis(ms), kind));
    }

    pub async fn run(mut self) {
        while !self.is_closed {
            let next = self.pending_deadlines.iter().map(|(i, _)| *i).min();
            let deadline_fut = async {
                match next {
                    Some(instant) => tokio::time::sleep_until(instant).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                msg = self.inbox.recv() => {
                    match msg {
                        Some(msg) => self.handle_message(msg).await,
                        None => break,
                    }
                }
                _ = deadline_fut => {
                    self.handle_deadline().await;
                }
            }
        }
        self.broadcast(TableResponse::Closed);
    }

    async fn handle_message(&mut self, msg: TableMessage) {
        match msg {
            TableMessage::JoinTable {
                identity,
                handle,
                buy_in,
                preferred_seat,
                respond_to,
            } => {
                let result = self.handle_join(identity, handle, buy_in, preferred_seat);
                let _ = respond_to.send(result);
                self.after_mutation();
            }
            TableMessage::ObserveTable { respond_to } => {
                let _ = respond_to.send(Ok(()));
            }
            TableMessage::LeaveTable { identity, respond_to } => {
                let result = self.handle_leave(&identity);
                let _ = respond_to.send(result);
                self.after_mutation();
            }
            TableMessage::TakeAction {
                identity,
                action,
                respond_to,
            } => {
                // Validation happens inside `apply_action` before any
                // mutation; the timer is only touched once that validation
                // has actually succeeded, so a repeated invalid action never
                // resets or burns the current actor's countdown (spec 4.4).
                // The acting seat is captured up front because a successful
                // call advances `current_actor` to the *next* seat before we
                // get a chance to look it up again.
                let acting_seat = self.data.current_actor;
                let acting_phase = self.data.phase;
                let result = self
                    .data
                    .apply_action(&identity, action)
                    .map_err(TableError::from);
                if result.is_ok() {
                    if let Some(seat) = acting_seat {
                        self.deduct_time_bank_on_action(seat, acting_phase);
                    }
                }
                let _ = respond_to.send(result);
                self.after_mutation();
            }
            TableMessage::SitOut { identity, respond_to } => {
                let result = self.handle_sit_out(&identity);
                let _ = respond_to.send(result);
                self.after_mutation();
            }
            TableMessage::SitBackIn { identity, respond_to } => {
                let result = self.handle_sit_back_in(&identity);
                let _ = respond_to.send(result);
                self.after_mutation();
            }
            TableMessage::Rebuy {
                identity,
                amount,
                respond_to,
            } => {
                let result = self.handle_rebuy(&identity, amount);
                let _ = respond_to.send(result);
                self.after_mutation();
            }
            TableMessage::ChatMessage { .. } => {
                // Chat never mutates game state (spec 4.5); the session
                // coordinator is the one that fans it out to transports.
            }
            TableMessage::GetSnapshot { respond_to } => {
                let _ = respond_to.send(self.snapshot());
            }
            TableMessage::Subscribe { subscriber_id, sender } => {
                self.subscribers.insert(subscriber_id, sender);
            }
            TableMessage::Unsubscribe { subscriber_id } => {
                self.subscribers.remove(&subscriber_id);
            }
            TableMessage::Close => {
                self.is_closed = true;
            }
        }
    }

    fn handle_join(
        &mut self,
        identity: String,
        handle: String,
        buy_in: i64,
        preferred_seat: Option<SeatIndex>,
    ) -> TableResult<SeatIndex> {
        if let Some(existing) = self.data.seat_of(&identity) {
            return Ok(existing); // already-seated is a soft no-op (spec 7)
        }
        let seat = preferred_seat
            .filter(|s| self.data.seats.get(*s).is_some_and(Option::is_none))
            .or_else(|| self.data.lowest_empty_seat())
            .ok_or(UserError::TableFull)?;
        let clamped = self
            .config
            .clamp_buyin(buy_in, self.prior_stack_within_window(&identity));
        let settings = self.data.settings;
        let player = SeatedPlayer::new(identity, handle, clamped, &settings);
        self.data
            .seat_player(seat, player)
            .map_err(TableError::from)?;
        Ok(seat)
    }

    /// Looks up a recent departure still inside `rathole_window_ms`, used to
    /// floor a rejoin/rebuy's clamp (spec 4.4's anti-ratholing rule).
    fn prior_stack_within_window(&self, identity: &str) -> Option<Chips> {
        let (stack, left_at) = self.recent_departures.get(identity)?;
        let window = Duration::from_millis(self.config.rathole_window_ms);
        if left_at.elapsed() <= window {
            Some(*stack)
        } else {
            None
        }
    }

    fn handle_leave(&mut self, identity: &str) -> TableResult<()> {
        let seat = self.data.seat_of(identity).ok_or(UserError::NotSeated)?;
        if let Some(player) = self.data.seats[seat].as_ref() {
            self.recent_departures
                .insert(identity.to_string(), (player.stack, TokioInstant::now()));
        }
        self.data.remove_player(seat);
        self.pending_deadlines
            .retain(|(_, k)| !matches!(k, DeadlineKind::KickPlayer { seat: s, .. } if *s == seat));
        self.kick_generation.remove(&seat);
        Ok(())
    }

    fn handle_sit_out(&mut self, identity: &str) -> TableResult<()> {
        let seat = self.data.seat_of(identity).ok_or(UserError::NotSeated)?;
        let player = self.data.seats[seat].as_mut().unwrap();
        if self.data.phase != Phase::Idle && self.data.current_actor != Some(seat) {
            player.sitting_out_next_hand = true;
        } else if !player.participated_this_hand || player.folded {
            player.sitting_out = true;
            player.sitting_out_next_hand = false;
        } else {
            player.sitting_out_next_hand = true;
        }
        let generation = self.kick_generation.get(&seat).copied().unwrap_or(0) + 1;
        self.kick_generation.insert(seat, generation);
        self.arm_deadline(
            self.config.sit_out_kick_ms,
            DeadlineKind::KickPlayer { seat, generation },
        );
        Ok(())
    }

    fn handle_sit_back_in(&mut self, identity: &str) -> TableResult<()> {
        let seat = self.data.seat_of(identity).ok_or(UserError::NotSeated)?;
        let player = self.data.seats[seat].as_mut().unwrap();
        player.sitting_out = false;
        player.sitting_out_next_hand = false;
        self.kick_generation.remove(&seat);
        self.pending_deadlines
            .retain(|(_, k)| !matches!(k, DeadlineKind::KickPlayer { seat: s, .. } if *s == seat));
        Ok(())
    }

    fn handle_rebuy(&mut self, identity: &str, amount: i64) -> TableResult<i64> {
        let seat = self.data.seat_of(identity).ok_or(UserError::NotSeated)?;
        let player = self.data.seats[seat].as_ref().unwrap();
        if self.data.phase != Phase::Idle && !player.folded && player.participated_this_hand {
            return Err(TableError::Game(UserError::NotInHand));
        }
        let clamped = self
            .config
            .clamp_buyin(amount, self.prior_stack_within_window(identity));
        let player = self.data.seats[seat].as_mut().unwrap();
        player.stack += clamped;
        player.busted = false;
        player.sitting_out = false;
        Ok(player.stack)
    }

    fn handle_base_timer_expiry(&mut self, generation: u64, seat: SeatIndex) {
        let Some(player) = self.data.seats[seat].as_ref() else {
            return;
        };
        let has_investment = player.total_committed > 0;
        let pool_ms = match ActionTimer::pool_for_phase(self.data.phase) {
            crate::table::timer::TimeBankPool::Preflop => player.time_bank_preflop_ms,
            crate::table::timer::TimeBankPool::Postflop => player.time_bank_postflop_ms,
        };
        match self
            .timer
            .on_base_expiry(generation, seat, has_investment, pool_ms)
        {
            TimerOutcome::Stale => {}
            TimerOutcome::EnterTimeBank { seat, ms } => {
                if let Some(generation) = self.timer.armed_generation() {
                    self.arm_deadline(ms, DeadlineKind::TimeBank { generation, seat });
                }
                self.data.emit(GameEvent::TimeBankStart { seat, ms });
            }
            TimerOutcome::ForceAction { seat } => {
                self.force_action_and_penalize(seat);
            }
            TimerOutcome::TimeBankExpired { .. } => unreachable!("base expiry never yields this"),
        }
    }

    fn handle_time_bank_expiry(&mut self, generation: u64, seat: SeatIndex) {
        if let TimerOutcome::TimeBankExpired { seat } = self.timer.on_time_bank_expiry(generation, seat) {
            if let Some(player) = self.data.seats[seat].as_mut() {
                match ActionTimer::pool_for_phase(self.data.phase) {
                    crate::table::timer::TimeBankPool::Preflop => player.time_bank_preflop_ms = 0,
                    crate::table::timer::TimeBankPool::Postflop => player.time_bank_postflop_ms = 0,
                }
            }
            self.force_action_and_penalize(seat);
        }
    }

    /// Timeout path (spec 4.4): auto-check if legal, else auto-fold; mark
    /// `sitting_out_next_hand` (one timeout = one hand penalty).
    fn force_action_and_penalize(&mut self, seat: SeatIndex) {
        if self.data.current_actor != Some(seat) {
            return;
        }
        let identity = self.data.seats[seat].as_ref().map(|p| p.identity.clone());
        let Some(identity) = identity else { return };
        let max_bet = self.data.max_street_bet();
        let street_committed = self.data.seats[seat].as_ref().map(|p| p.street_committed).unwrap_or(0);
        let action = if street_committed == max_bet {
            Action::Check
        } else {
            Action::Fold
        };
        let _ = self.data.apply_action(&identity, action);
        if let Some(p) = self.data.seats[seat].as_mut() {
            p.sitting_out_next_hand = true;
        }
    }

    /// Called once a just-validated action from `seat` has been applied:
    /// cancels the timer that was armed for it and, if that timer was
    /// mid-time-bank, deducts the elapsed duration from the player's
    /// relevant pool (spec 4.3 "On action arrival").
    fn deduct_time_bank_on_action(&mut self, seat: SeatIndex, phase: Phase) {
        let Some(elapsed) = self.timer.on_action_taken(seat) else {
            return;
        };
        let ms = elapsed.as_millis() as u64;
        if let Some(p) = self.data.seats[seat].as_mut() {
            match ActionTimer::pool_for_phase(phase) {
                crate::table::timer::TimeBankPool::Preflop => {
                    p.time_bank_preflop_ms = p.time_bank_preflop_ms.saturating_sub(ms);
                }
                crate::table::timer::TimeBankPool::Postflop => {
                    p.time_bank_postflop_ms = p.time_bank_postflop_ms.saturating_sub(ms);
                }
            }
        }
    }

    async fn handle_deadline(&mut self) {
        let Some(earliest) = self.pending_deadlines.iter().map(|(i, _)| *i).min() else {
            return;
        };
        let Some(pos) = self.pending_deadlines.iter().position(|(i, _)| *i == earliest) else {
            return;
        };
        let (_, kind) = self.pending_deadlines.remove(pos);
        match kind {
            DeadlineKind::BaseTimer { generation, seat } => {
                self.handle_base_timer_expiry(generation, seat);
            }
            DeadlineKind::TimeBank { generation, seat } => {
                self.handle_time_bank_expiry(generation, seat);
            }
            DeadlineKind::HandStart => {
                self.hand_start_armed = false;
                if self.data.phase == Phase::Idle {
                    self.hand_started_at = current_unix_seconds();
                    self.data.try_start_hand(&mut *self.rng);
                }
            }
            DeadlineKind::KickPlayer { seat, generation } => {
                if self.kick_generation.get(&seat) == Some(&generation) {
                    self.data.remove_player(seat);
                    self.kick_generation.remove(&seat);
                }
            }
            DeadlineKind::RunoutStep { generation } => {
                if generation == self.runout_generation {
                    self.advance_runout_step();
                }
            }
        }
        self.after_mutation();
    }

    /// Deals the next queued run-out street (or finishes the showdown once
    /// the board is complete), then schedules the following step on its own
    /// human-perceivable delay (spec 4.4's "Dramatic run-out").
    fn advance_runout_step(&mut self) {
        self.data.deal_next_runout_street();
        if self.data.runout_pending() {
            let next_phase = self.next_queued_runout_phase();
            let ms = self.config.runout_delay_for(next_phase);
            self.runout_generation += 1;
            let generation = self.runout_generation;
            self.arm_deadline(ms, DeadlineKind::RunoutStep { generation });
        } else {
            self.data.finish_runout_showdown();
        }
    }

    fn next_queued_runout_phase(&self) -> Phase {
        self.data.peek_next_runout_phase().unwrap_or(Phase::River)
    }

    /// Recomputes deadlines that depend on the post-mutation state: rearms
    /// the action timer if the current actor changed, kicks off a dramatic
    /// run-out's first step, schedules a hand start if conditions hold,
    /// archives a just-completed hand, and broadcasts accumulated events.
    fn after_mutation(&mut self) {
        let events = self.data.drain_events();
        let hand_completed = events
            .iter()
            .any(|e| matches!(e, GameEvent::HandComplete { .. }));
        let runout_started = events
            .iter()
            .any(|e| matches!(e, GameEvent::DramaticRunoutStarted));

        if let Some(seat) = self.data.current_actor {
            if self.timer.armed_seat() != Some(seat) {
                let generation = self.timer.arm_base(seat, self.config.base_action_ms);
                self.arm_deadline(
                    self.config.base_action_ms,
                    DeadlineKind::BaseTimer { generation, seat },
                );
                self.data.emit(GameEvent::ActionTimerStart {
                    seat,
                    ms: self.config.base_action_ms,
                });
            }
        } else {
            self.timer.cancel();
            self.pending_deadlines
                .retain(|(_, k)| !matches!(k, DeadlineKind::BaseTimer { .. } | DeadlineKind::TimeBank { .. }));
        }

        if runout_started {
            self.runout_generation += 1;
            let generation = self.runout_generation;
            self.arm_deadline(
                self.config.runout_reveal_delay_ms,
                DeadlineKind::RunoutStep { generation },
            );
        }

        if self.data.phase == Phase::Idle && self.data.eligible_seats().len() >= 2 && !self.hand_start_armed {
            self.hand_start_armed = true;
            self.arm_deadline(self.config.hand_start_delay_ms, DeadlineKind::HandStart);
        }

        if hand_completed {
            self.archive_hand();
        }

        let trailing = self.data.drain_events();
        let mut all_events = events;
        all_events.extend(trailing);
        if !all_events.is_empty() {
            self.broadcast(TableResponse::Events(all_events));
        }
    }

    fn archive_hand(&mut self) {
        let completed_at = current_unix_seconds();
        let participants: Vec<HandParticipant> = self
            .data
            .seats
            .iter()
            .enumerate()
            .filter_map(|(seat, slot)| {
                let p = slot.as_ref()?;
                if !p.participated_this_hand {
                    return None;
                }
                let won = HandParticipant::compute_won_amount(
                    p.stack,
                    p.stack_at_hand_start,
                    p.total_committed,
                );
                Some(HandParticipant {
                    identity: p.identity.clone(),
                    handle: p.handle.clone(),
                    seat,
                    starting_stack: p.stack_at_hand_start,
                    ending_stack: p.stack,
                    total_committed: p.total_committed,
                    hole_cards: p.hole_cards,
                    final_hand: self.data.final_hand_names.get(&seat).cloned(),
                    position: self.data.seat_positions.get(seat).cloned().unwrap_or_default(),
                    actions: self.data.seat_actions.get(seat).cloned().unwrap_or_default(),
                    won_amount: won,
                })
            })
            .collect();

        let pot_total = participants.iter().map(|p| p.total_committed).sum();

        let record = HandRecord {
            hand_id: self.data.hand_counter,
            table_id: self.table_id.clone(),
            started_at: self.hand_started_at,
            completed_at,
            small_blind: self.data.settings.small_blind,
            big_blind: self.data.settings.big_blind,
            button_seat: self.data.dealer_seat,
            pot_total,
            community_cards: self.data.community.clone(),
            hand_history: self.data.current_hand_log.public_transcript(),
            participants,
        };

        let persistence = Arc::clone(&self.persistence);
        tokio::spawn(async move {
            // Persistence failures are logged and swallowed (spec 7): the
            // live game must continue even if archiving fails.
            if let Err(err) = persistence.save_hand(record).await {
                log::warn!("failed to archive hand: {err}");
            }
        });
    }

    fn snapshot(&self) -> TableSnapshot {
        TableSnapshot {
            hand_counter: self.data.hand_counter,
            phase: self.data.phase,
            dealer_seat: self.data.dealer_seat,
            current_actor: self.data.current_actor,
            community: self.data.community.clone(),
            pot: self.data.pot,
            seats: self
                .data
                .seats
                .iter()
                .map(|slot| {
                    slot.as_ref().map(|p| SeatSnapshot {
                        identity: p.identity.clone(),
                        handle: p.handle.clone(),
                        stack: p.stack,
                        street_committed: p.street_committed,
                        folded: p.folded,
                        all_in: p.all_in,
                        sitting_out: p.sitting_out,
                        disconnected: p.disconnected,
                        hole_cards: p.hole_cards,
                    })
                })
                .collect(),
        }
    }

    fn broadcast(&mut self, response: TableResponse) {
        self.subscribers
            .retain(|_, sender| sender.try_send(response.clone()).is_ok());
    }
}

fn current_unix_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}
