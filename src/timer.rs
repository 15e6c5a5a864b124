//! Countdown state machine.
//!
//! The timer has no thread of its own. While running it owns a [`TickHandle`]
//! and the event loop calls [`Timer::advance_to`] with the current instant;
//! every whole second that has come due fires one [`Timer::tick`].
//!
//! ```text
//! Idle(Work) <-> Running(Work)
//!     |               | 0s
//! Idle(Break) <-> Running(Break)
//! ```

use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
pub const WARNING_THRESHOLD_SECS: u32 = 10;

pub const WORK_MINUTES: RangeInclusive<u32> = 1..=60;
pub const BREAK_MINUTES: RangeInclusive<u32> = 1..=30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Work,
    Break,
}

impl SessionKind {
    pub fn other(self) -> Self {
        match self {
            Self::Work => Self::Break,
            Self::Break => Self::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Work => "🎯 WORK TIME",
            Self::Break => "☕ BREAK TIME",
        }
    }

    /// Title and body announced when a session of this kind runs out.
    pub fn ended_message(self) -> (&'static str, &'static str) {
        match self {
            Self::Work => ("Work session over", "Time for a break!"),
            Self::Break => ("Break over", "Ready to get back to work!"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle(SessionKind),
    Running(SessionKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    work_minutes: u32,
    break_minutes: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { work_minutes: 25, break_minutes: 5 }
    }
}

impl SessionConfig {
    pub fn new(work_minutes: u32, break_minutes: u32) -> Self {
        Self {
            work_minutes: clamp_into(work_minutes as i64, &WORK_MINUTES),
            break_minutes: clamp_into(break_minutes as i64, &BREAK_MINUTES),
        }
    }

    pub fn minutes(&self, kind: SessionKind) -> u32 {
        match kind {
            SessionKind::Work => self.work_minutes,
            SessionKind::Break => self.break_minutes,
        }
    }

    pub fn seconds(&self, kind: SessionKind) -> u32 {
        self.minutes(kind) * 60
    }

    /// Moves one duration by `delta` minutes, clamped to its range.
    pub fn adjust(&mut self, kind: SessionKind, delta: i32) -> u32 {
        let (slot, range) = match kind {
            SessionKind::Work => (&mut self.work_minutes, &WORK_MINUTES),
            SessionKind::Break => (&mut self.break_minutes, &BREAK_MINUTES),
        };
        *slot = clamp_into(*slot as i64 + delta as i64, range);
        *slot
    }
}

fn clamp_into(value: i64, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start() as i64, *range.end() as i64) as u32
}

/// The scheduled recurring tick. Dropping it cancels every future tick.
#[derive(Debug)]
pub struct TickHandle {
    next_due: Instant,
}

impl TickHandle {
    fn starting_at(now: Instant) -> Self {
        Self { next_due: now + TICK_INTERVAL }
    }

    fn fire_if_due(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due += TICK_INTERVAL;
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionBoundary {
    pub ended: SessionKind,
    pub started: SessionKind,
}

#[derive(Debug)]
pub struct Timer {
    kind: SessionKind,
    remaining_secs: u32,
    config: SessionConfig,
    tick: Option<TickHandle>,
    completed_pomodoros: u32,
}

impl Timer {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            kind: SessionKind::Work,
            remaining_secs: config.seconds(SessionKind::Work),
            config,
            tick: None,
            completed_pomodoros: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        if self.is_running() {
            TimerState::Running(self.kind)
        } else {
            TimerState::Idle(self.kind)
        }
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_some()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn completed_pomodoros(&self) -> u32 {
        self.completed_pomodoros
    }

    pub fn clock(&self) -> String {
        format_clock(self.remaining_secs)
    }

    pub fn is_warning(&self) -> bool {
        is_warning(self.remaining_secs)
    }

    /// How long the event loop may sleep before the next tick is due.
    pub fn until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.tick.as_ref().map(|h| h.next_due.saturating_duration_since(now))
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn toggle(&mut self, now: Instant) {
        if self.is_running() {
            self.stop();
        } else {
            self.start(now);
        }
    }

    pub fn start(&mut self, now: Instant) {
        if self.tick.is_none() {
            self.tick = Some(TickHandle::starting_at(now));
        }
    }

    pub fn stop(&mut self) {
        self.tick = None;
    }

    /// One second of countdown. Returns the boundary when the session ran out.
    pub fn tick(&mut self) -> Option<SessionBoundary> {
        if !self.is_running() {
            return None;
        }
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            return None;
        }

        let ended = self.kind;
        if ended == SessionKind::Work {
            self.completed_pomodoros += 1;
        }
        self.kind = ended.other();
        self.remaining_secs = self.config.seconds(self.kind);
        Some(SessionBoundary { ended, started: self.kind })
    }

    /// Fires every tick due at `now`, in order.
    pub fn advance_to(&mut self, now: Instant) -> Vec<SessionBoundary> {
        let mut boundaries = Vec::new();
        while self.tick.as_mut().is_some_and(|h| h.fire_if_due(now)) {
            boundaries.extend(self.tick());
        }
        boundaries
    }

    pub fn reset(&mut self) {
        self.stop();
        self.kind = SessionKind::Work;
        self.remaining_secs = self.config.seconds(SessionKind::Work);
    }

    pub fn switch_session(&mut self) {
        self.stop();
        self.kind = self.kind.other();
        self.remaining_secs = self.config.seconds(self.kind);
    }

    /// Returns false when the timer is running and nothing changed.
    pub fn adjust(&mut self, kind: SessionKind, delta: i32) -> bool {
        if self.is_running() {
            return false;
        }
        self.config.adjust(kind, delta);
        if kind == self.kind {
            self.remaining_secs = self.config.seconds(kind);
        }
        true
    }
}

pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn is_warning(secs: u32) -> bool {
    secs <= WARNING_THRESHOLD_SECS
}
