// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scheduling traits a host event loop provides.

use alloc::boxed::Box;

use crate::tokens::{FrameToken, IntervalToken, TimerToken};

/// A deferred one-shot callback.
pub type DeferredFn = Box<dyn FnOnce()>;

/// A repeating callback.
pub type RepeatFn = Box<dyn FnMut()>;

/// A frame callback. The argument is the frame timestamp in milliseconds,
/// on the same clock as [`Clock::now_ms`].
pub type FrameFn = Box<dyn FnOnce(u64)>;

/// A monotonic millisecond clock.
///
/// The epoch is arbitrary but fixed for the lifetime of the clock; only
/// differences between readings are meaningful. Successive readings never
/// decrease.
pub trait Clock {
    /// The current time in milliseconds.
    fn now_ms(&self) -> u64;
}

/// Time-based scheduling provided by a host event loop.
///
/// Hosts are single-threaded: scheduled callbacks run on the host's own
/// loop, never concurrently with the code that scheduled them. A callback
/// armed with [`schedule`][Self::schedule] runs at most once; one armed with
/// [`schedule_repeating`][Self::schedule_repeating] runs until cancelled.
///
/// Cancelling a token that has already fired, or that this host never
/// issued, is a no-op.
pub trait TimerHost: Clock {
    /// Arms `callback` to run once, `delay_ms` milliseconds from now.
    ///
    /// A delay of zero arms the callback for the host's next scheduling
    /// opportunity rather than running it inside this call.
    fn schedule(&mut self, delay_ms: u64, callback: DeferredFn) -> TimerToken;

    /// Disarms a one-shot callback if it has not fired yet.
    fn cancel(&mut self, token: TimerToken);

    /// Arms `callback` to run every `period_ms` milliseconds, starting one
    /// period from now.
    ///
    /// Hosts clamp a zero period to their minimum resolution rather than
    /// running the callback without bound.
    fn schedule_repeating(&mut self, period_ms: u64, callback: RepeatFn) -> IntervalToken;

    /// Disarms a repeating callback.
    fn cancel_repeating(&mut self, token: IntervalToken);
}

/// Frame-synced scheduling provided by a host.
///
/// A frame callback runs once, when the host next produces a frame, and
/// receives that frame's timestamp. Callbacks armed while a frame is being
/// delivered run on a subsequent frame, not the current one.
pub trait FrameHost {
    /// Arms `callback` for the next frame.
    fn schedule_frame(&mut self, callback: FrameFn) -> FrameToken;

    /// Disarms a frame callback if its frame has not run yet.
    ///
    /// Cancelling a spent or foreign token is a no-op.
    fn cancel_frame(&mut self, token: FrameToken);
}
