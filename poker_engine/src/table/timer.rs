//! The two-phase per-actor action timer (spec 4.3).
//!
//! No direct teacher counterpart exists — the teacher's table relies on
//! bots to auto-act and has no action clock at all. Grounded instead on the
//! teacher's actor concurrency idiom: `TableActor::run` (`table/actor.rs`)
//! already runs a `tokio::select!` between an inbox `mpsc::Receiver` and a
//! periodic `tokio::time::interval` tick. The timer subsystem reuses that
//! idiom — each table actor owns a `tokio::time::Sleep`-backed countdown
//! selected over in the same loop — with a generation counter standing in
//! for the "stale callback" defence spec 4.3/5 requires.

use std::time::Duration;

use tokio::time::Instant as TokioInstant;

use crate::game::pot::SeatIndex;

/// Which pool a time-bank burn draws from, chosen by current street.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBankPool {
    Preflop,
    Postflop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerStage {
    Base,
    TimeBank,
}

/// Tracks the live countdown for the table's current actor.
///
/// `generation` increments every time a new timer is armed; an expiry
/// callback carries the generation it was armed with, and `is_stale`
/// reports whether that generation (and the targeted seat) still matches —
/// the mandatory stale-callback defence of spec 4.3.
#[derive(Debug, Clone)]
pub struct ActionTimer {
    generation: u64,
    current: Option<ArmedTimer>,
}

#[derive(Debug, Clone, Copy)]
struct ArmedTimer {
    seat: SeatIndex,
    stage: TimerStage,
    generation: u64,
    duration: Duration,
    armed_at: TokioInstant,
}

/// What the table actor should do after a timer expiry is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    /// Callback targeted a stale generation/seat; no-op.
    Stale,
    /// Base timer expired and the actor has chips at risk and time-bank
    /// remaining: start the time-bank phase for `ms` milliseconds.
    EnterTimeBank { seat: SeatIndex, ms: u64 },
    /// Base timer expired with no time-bank available (or no investment):
    /// force a check if legal, otherwise a fold.
    ForceAction { seat: SeatIndex },
    /// Time-bank phase expired: force a check/fold and burn the pool.
    TimeBankExpired { seat: SeatIndex },
}

impl Default for ActionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionTimer {
    pub fn new() -> Self {
        Self {
            generation: 0,
            current: None,
        }
    }

    /// Arm the base timer for `seat`, returning the generation to tag the
    /// scheduled sleep future with.
    pub fn arm_base(&mut self, seat: SeatIndex, base_ms: u64) -> u64 {
        self.generation += 1;
        self.current = Some(ArmedTimer {
            seat,
            stage: TimerStage::Base,
            generation: self.generation,
            duration: Duration::from_millis(base_ms),
            armed_at: TokioInstant::now(),
        });
        self.generation
    }

    fn arm_time_bank(&mut self, seat: SeatIndex, ms: u64) -> u64 {
        self.generation += 1;
        self.current = Some(ArmedTimer {
            seat,
            stage: TimerStage::TimeBank,
            generation: self.generation,
            duration: Duration::from_millis(ms),
            armed_at: TokioInstant::now(),
        });
        self.generation
    }

    /// Called when an action arrives for `seat`. If the timer currently
    /// armed for that seat was in its time-bank phase, returns the elapsed
    /// duration (capped at the armed duration) to deduct from the player's
    /// pool, per spec 4.3's "on action arrival, deduct time-bank-phase
    /// elapsed". Cancels whatever timer was armed either way.
    pub fn on_action_taken(&mut self, seat: SeatIndex) -> Option<Duration> {
        let armed = self.current.take()?;
        if armed.seat != seat || armed.stage != TimerStage::TimeBank {
            return None;
        }
        Some(armed.armed_at.elapsed().min(armed.duration))
    }

    /// Cancel whatever timer is armed (on action arrival or teardown). A
    /// cancelled timer's expiry callback is a no-op by construction: its
    /// generation no longer matches.
    pub fn cancel(&mut self) {
        self.current = None;
    }

    pub fn armed_seat(&self) -> Option<SeatIndex> {
        self.current.map(|t| t.seat)
    }

    pub fn armed_duration(&self) -> Option<Duration> {
        self.current.map(|t| t.duration)
    }

    /// The generation tag of whatever timer is currently armed, if any.
    /// Callers use this right after `on_base_expiry` returns
    /// `EnterTimeBank` to pick up the generation `arm_time_bank` just
    /// assigned, since that call happens internally and isn't returned.
    pub fn armed_generation(&self) -> Option<u64> {
        self.current.map(|t| t.generation)
    }

    /// Process a base-timer expiry callback tagged with `generation` for
    /// `seat`. `has_investment` and `bank_remaining_ms` determine whether
    /// the time-bank phase opens per spec 4.3.
    pub fn on_base_expiry(
        &mut self,
        generation: u64,
        seat: SeatIndex,
        has_investment: bool,
        bank_remaining_ms: u64,
    ) -> TimerOutcome {
        let Some(armed) = self.current else {
            return TimerOutcome::Stale;
        };
        if armed.generation != generation || armed.seat != seat || armed.stage != TimerStage::Base {
            return TimerOutcome::Stale;
        }

        if has_investment && bank_remaining_ms > 0 {
            self.arm_time_bank(seat, bank_remaining_ms);
            TimerOutcome::EnterTimeBank {
                seat,
                ms: bank_remaining_ms,
            }
        } else {
            self.current = None;
            TimerOutcome::ForceAction { seat }
        }
    }

    pub fn on_time_bank_expiry(&mut self, generation: u64, seat: SeatIndex) -> TimerOutcome {
        let Some(armed) = self.current else {
            return TimerOutcome::Stale;
        };
        if armed.generation != generation || armed.seat != seat || armed.stage != TimerStage::TimeBank {
            return TimerOutcome::Stale;
        }
        self.current = None;
        TimerOutcome::TimeBankExpired { seat }
    }

    pub fn pool_for_phase(phase: crate::game::state_machine::Phase) -> TimeBankPool {
        match phase {
            crate::game::state_machine::Phase::Preflop => TimeBankPool::Preflop,
            _ => TimeBankPool::Postflop,
        }
    }
}
