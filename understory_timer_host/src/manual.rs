// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A deterministic host driven by explicit time steps.

use core::fmt;
use core::num::NonZeroU64;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::host::{Clock, DeferredFn, FrameFn, FrameHost, RepeatFn, TimerHost};
use crate::tokens::{FrameToken, IntervalToken, TimerToken};

struct TimerEntry {
    due: u64,
    callback: DeferredFn,
}

struct RepeatingEntry {
    period: u64,
    next_due: u64,
    callback: RepeatFn,
}

#[derive(Copy, Clone)]
enum DueWork {
    Timer { raw: u64, due: u64 },
    Repeating { raw: u64, due: u64 },
}

impl DueWork {
    fn key(self) -> (u64, u64) {
        match self {
            Self::Timer { raw, due } | Self::Repeating { raw, due } => (due, raw),
        }
    }
}

/// A [`TimerHost`] and [`FrameHost`] whose clock only moves when told to.
///
/// Nothing runs spontaneously: [`advance`][Self::advance] and
/// [`advance_to`][Self::advance_to] step the clock and fire due timers,
/// while [`run_frame`][Self::run_frame] delivers one frame to every armed
/// frame callback. This makes timing-sensitive logic testable without
/// sleeping or a real event loop.
///
/// Timers due in the same step fire in `(due time, arm order)` order, and
/// time moves through each due point in turn, so a repeating timer re-arms
/// relative to its due time rather than the step target. A large step fires
/// each missed period exactly once.
///
/// ## Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use understory_timer_host::{Clock, ManualHost, TimerHost};
///
/// let mut host = ManualHost::new();
/// let ticks = Rc::new(Cell::new(0));
/// let sink = Rc::clone(&ticks);
/// let token = host.schedule_repeating(100, Box::new(move || sink.set(sink.get() + 1)));
///
/// host.advance(350);
/// assert_eq!(ticks.get(), 3);
/// assert_eq!(host.now_ms(), 350);
///
/// host.cancel_repeating(token);
/// host.advance(1000);
/// assert_eq!(ticks.get(), 3);
/// ```
pub struct ManualHost {
    now: u64,
    /// The next raw token value. Tokens are minted from a single counter,
    /// so arm order is recoverable from token order.
    next_token: NonZeroU64,
    timers: HashMap<u64, TimerEntry>,
    repeating: HashMap<u64, RepeatingEntry>,
    frames: SmallVec<[(u64, FrameFn); 4]>,
}

impl ManualHost {
    /// Creates a host with the clock at zero.
    pub fn new() -> Self {
        Self::with_now(0)
    }

    /// Creates a host with the clock at `now_ms`.
    pub fn with_now(now_ms: u64) -> Self {
        Self {
            now: now_ms,
            next_token: NonZeroU64::MIN,
            timers: HashMap::new(),
            repeating: HashMap::new(),
            frames: SmallVec::new(),
        }
    }

    /// Moves the clock forward by `delta_ms`, firing everything that comes
    /// due along the way.
    pub fn advance(&mut self, delta_ms: u64) {
        self.advance_to(self.now.saturating_add(delta_ms));
    }

    /// Moves the clock to `target_ms`, firing everything that comes due
    /// along the way.
    ///
    /// The clock never moves backwards; a target in the past is clamped to
    /// the current time.
    pub fn advance_to(&mut self, target_ms: u64) {
        debug_assert!(
            target_ms >= self.now,
            "advance_to target must not be before the current time"
        );
        let target = target_ms.max(self.now);
        while let Some(work) = self.next_due(target) {
            match work {
                DueWork::Timer { raw, due } => {
                    self.now = due;
                    if let Some(entry) = self.timers.remove(&raw) {
                        (entry.callback)();
                    }
                }
                DueWork::Repeating { raw, due } => {
                    self.now = due;
                    // The entry leaves the registry while its callback runs
                    // and returns re-armed one period past its due time.
                    if let Some(mut entry) = self.repeating.remove(&raw) {
                        (entry.callback)();
                        entry.next_due = due.saturating_add(entry.period);
                        self.repeating.insert(raw, entry);
                    }
                }
            }
        }
        self.now = target;
    }

    /// Delivers one frame with the given timestamp.
    ///
    /// Every frame callback armed before this call runs once, in arm order,
    /// and receives `frame_time_ms`. The clock catches up to the frame
    /// timestamp if it is ahead of the current time; due timers do not fire,
    /// matching hosts that interleave frame and timer queues independently.
    pub fn run_frame(&mut self, frame_time_ms: u64) {
        self.now = self.now.max(frame_time_ms);
        let armed = core::mem::take(&mut self.frames);
        for (_raw, callback) in armed {
            callback(frame_time_ms);
        }
    }

    /// The number of armed one-shot timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// The number of armed repeating timers.
    #[must_use]
    pub fn pending_repeating(&self) -> usize {
        self.repeating.len()
    }

    /// The number of callbacks armed for the next frame.
    #[must_use]
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    fn mint(&mut self) -> NonZeroU64 {
        let raw = self.next_token;
        // Never reused; saturation is unreachable in practice.
        self.next_token = raw.saturating_add(1);
        raw
    }

    fn next_due(&self, target_ms: u64) -> Option<DueWork> {
        let mut best: Option<DueWork> = None;
        for (&raw, entry) in &self.timers {
            if entry.due <= target_ms {
                let candidate = DueWork::Timer { raw, due: entry.due };
                if best.is_none_or(|b| candidate.key() < b.key()) {
                    best = Some(candidate);
                }
            }
        }
        for (&raw, entry) in &self.repeating {
            if entry.next_due <= target_ms {
                let candidate = DueWork::Repeating { raw, due: entry.next_due };
                if best.is_none_or(|b| candidate.key() < b.key()) {
                    best = Some(candidate);
                }
            }
        }
        best
    }
}

impl Default for ManualHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualHost {
    fn now_ms(&self) -> u64 {
        self.now
    }
}

impl TimerHost for ManualHost {
    fn schedule(&mut self, delay_ms: u64, callback: DeferredFn) -> TimerToken {
        let raw = self.mint();
        let due = self.now.saturating_add(delay_ms);
        self.timers.insert(raw.get(), TimerEntry { due, callback });
        TimerToken::from_raw(raw)
    }

    fn cancel(&mut self, token: TimerToken) {
        let _ = self.timers.remove(&token.raw().get());
    }

    fn schedule_repeating(&mut self, period_ms: u64, callback: RepeatFn) -> IntervalToken {
        let raw = self.mint();
        // A zero period would never let the clock reach its target.
        let period = period_ms.max(1);
        let next_due = self.now.saturating_add(period);
        let entry = RepeatingEntry { period, next_due, callback };
        self.repeating.insert(raw.get(), entry);
        IntervalToken::from_raw(raw)
    }

    fn cancel_repeating(&mut self, token: IntervalToken) {
        let _ = self.repeating.remove(&token.raw().get());
    }
}

impl FrameHost for ManualHost {
    fn schedule_frame(&mut self, callback: FrameFn) -> FrameToken {
        let raw = self.mint();
        self.frames.push((raw.get(), callback));
        FrameToken::from_raw(raw)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let raw = token.raw().get();
        self.frames.retain(|(armed, _)| *armed != raw);
    }
}

impl fmt::Debug for ManualHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualHost")
            .field("now_ms", &self.now)
            .field("pending_timers", &self.timers.len())
            .field("pending_repeating", &self.repeating.len())
            .field("pending_frames", &self.frames.len())
            .finish_non_exhaustive()
    }
}
