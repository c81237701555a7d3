// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rate limiting with an optional trailing call.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::marker::PhantomData;

use understory_timer_host::{TimerHost, TimerToken};

use crate::DEFAULT_TIMEOUT_MS;

struct ThrottleInner<F> {
    callback: F,
    /// Time of the last leading invocation. Trailing fires do not update it.
    last_fire: Option<u64>,
    pending: Option<TimerToken>,
}

/// Limits a callback to at most one leading call per cooldown window.
///
/// The first call after a quiet stretch runs the callback immediately and
/// opens a cooldown window of [`timeout_ms`][Self::timeout_ms]
/// milliseconds. Calls inside the window do not run the callback; instead,
/// unless the wrapper was built with [`leading_only`][Self::leading_only],
/// the first such call arms one deferred trailing call that runs
/// `timeout_ms` after it was armed. A call that lands after the window
/// closed runs immediately again, disarming any trailing call still
/// pending.
///
/// Two details are easy to miss:
/// - The trailing call keeps the arguments of the call that *armed* it.
///   Later in-window calls are dropped entirely, arguments included.
/// - A trailing fire does not open a new cooldown window. Only leading
///   invocations move the window, so a call arriving right after a trailing
///   fire can still run immediately.
///
/// Elapsed time is compared with strict inequality: a call exactly
/// `timeout_ms` after the last leading invocation is still throttled.
///
/// ## Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use understory_event_pacing::Throttle;
/// use understory_timer_host::ManualHost;
///
/// let mut host = ManualHost::new();
/// let log = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&log);
/// let mut throttle = Throttle::with_timeout(move |x: i32| sink.borrow_mut().push(x), 100);
///
/// throttle.call(&mut host, 1); // leading call, runs immediately
/// throttle.call(&mut host, 2); // inside the window, arms the trailing call
/// throttle.call(&mut host, 3); // dropped; the armed call keeps 2
/// assert_eq!(*log.borrow(), vec![1]);
///
/// host.advance(100);
/// assert_eq!(*log.borrow(), vec![1, 2]);
/// ```
pub struct Throttle<A, F> {
    inner: Rc<RefCell<ThrottleInner<F>>>,
    timeout: u64,
    trailing: bool,
    _args: PhantomData<fn(A)>,
}

impl<A, F> Throttle<A, F> {
    /// Creates a throttle with the default window of
    /// [`DEFAULT_TIMEOUT_MS`] and a trailing call.
    pub fn new(callback: F) -> Self {
        Self::with_timeout(callback, DEFAULT_TIMEOUT_MS)
    }

    /// Creates a throttle with the given cooldown window and a trailing
    /// call.
    pub fn with_timeout(callback: F, timeout_ms: u64) -> Self {
        Self::with_behavior(callback, timeout_ms, true)
    }

    /// Creates a throttle that only ever fires leading calls.
    ///
    /// Calls inside the cooldown window are dropped without arming a
    /// trailing call.
    pub fn leading_only(callback: F, timeout_ms: u64) -> Self {
        Self::with_behavior(callback, timeout_ms, false)
    }

    fn with_behavior(callback: F, timeout_ms: u64, trailing: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ThrottleInner {
                callback,
                last_fire: None,
                pending: None,
            })),
            timeout: timeout_ms,
            trailing,
            _args: PhantomData,
        }
    }

    /// The cooldown window in milliseconds.
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout
    }

    /// Whether in-window calls arm a trailing call.
    #[must_use]
    pub fn trailing_enabled(&self) -> bool {
        self.trailing
    }

    /// Whether a trailing call is currently armed.
    #[must_use]
    pub fn trailing_pending(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    /// The time of the last leading invocation, if any.
    #[must_use]
    pub fn last_fire_ms(&self) -> Option<u64> {
        self.inner.borrow().last_fire
    }
}

impl<A: 'static, F: FnMut(A) + 'static> Throttle<A, F> {
    /// Feeds one call through the throttle.
    ///
    /// Runs the callback immediately when the cooldown window has passed
    /// (or was never opened), otherwise arms the trailing call if one is
    /// enabled and none is armed yet. Immediate invocations run before this
    /// method returns; deferred ones run from the host when their timer
    /// fires. The callback must not re-enter this wrapper instance.
    pub fn call<H: TimerHost>(&mut self, host: &mut H, args: A) {
        let now = host.now_ms();
        let mut inner = self.inner.borrow_mut();
        let fire_now = match inner.last_fire {
            None => true,
            Some(last) => now.saturating_sub(last) > self.timeout,
        };
        if fire_now {
            inner.last_fire = Some(now);
            if let Some(token) = inner.pending.take() {
                host.cancel(token);
            }
            (inner.callback)(args);
            return;
        }
        if !self.trailing || inner.pending.is_some() {
            return;
        }
        let shared = Rc::clone(&self.inner);
        let token = host.schedule(
            self.timeout,
            Box::new(move || {
                let mut inner = shared.borrow_mut();
                inner.pending = None;
                (inner.callback)(args);
            }),
        );
        inner.pending = Some(token);
    }
}

impl<A, F> fmt::Debug for Throttle<A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Throttle")
            .field("timeout_ms", &self.timeout)
            .field("trailing", &self.trailing)
            .field("last_fire_ms", &inner.last_fire)
            .field("trailing_pending", &inner.pending.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use understory_timer_host::ManualHost;

    use super::*;

    fn throttled(timeout_ms: u64) -> (Rc<RefCell<Vec<i32>>>, Throttle<i32, impl FnMut(i32)>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let throttle = Throttle::with_timeout(move |x| sink.borrow_mut().push(x), timeout_ms);
        (log, throttle)
    }

    #[test]
    fn first_call_fires_immediately() {
        let mut host = ManualHost::new();
        let (log, mut throttle) = throttled(500);

        throttle.call(&mut host, 1);
        assert_eq!(*log.borrow(), vec![1]);
        assert_eq!(throttle.last_fire_ms(), Some(0));
    }

    #[test]
    fn a_burst_yields_one_leading_and_one_trailing_call() {
        let mut host = ManualHost::new();
        let (log, mut throttle) = throttled(500);

        throttle.call(&mut host, 1);
        host.advance(100);
        throttle.call(&mut host, 2);
        host.advance(100);
        throttle.call(&mut host, 3);
        assert_eq!(*log.borrow(), vec![1]);

        // Armed at t=100, so due at t=600.
        host.advance_to(599);
        assert_eq!(*log.borrow(), vec![1]);
        host.advance_to(600);
        assert_eq!(*log.borrow(), vec![1, 2]);

        host.advance_to(5000);
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn trailing_uses_arming_call_arguments() {
        let mut host = ManualHost::new();
        let (log, mut throttle) = throttled(500);

        throttle.call(&mut host, 10);
        host.advance(10);
        throttle.call(&mut host, 20);
        host.advance(10);
        throttle.call(&mut host, 30);
        host.advance(10);
        throttle.call(&mut host, 40);

        host.advance(1000);
        assert_eq!(*log.borrow(), vec![10, 20]);
    }

    #[test]
    fn boundary_elapsed_equal_to_timeout_is_still_throttled() {
        let mut host = ManualHost::new();
        let (log, mut throttle) = throttled(500);

        throttle.call(&mut host, 1);
        host.advance(500);
        throttle.call(&mut host, 2);
        assert_eq!(*log.borrow(), vec![1]);
        assert!(throttle.trailing_pending());

        // The boundary call armed the trailing path instead.
        host.advance(500);
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn a_leading_fire_disarms_the_pending_trailing_call() {
        let mut host = ManualHost::new();
        let (log, mut throttle) = throttled(500);

        throttle.call(&mut host, 1);
        host.advance(100);
        throttle.call(&mut host, 2);
        assert!(throttle.trailing_pending());

        // Past the window before the trailing due time of t=600.
        host.advance_to(501);
        throttle.call(&mut host, 3);
        assert_eq!(*log.borrow(), vec![1, 3]);
        assert!(!throttle.trailing_pending());
        assert_eq!(host.pending_timers(), 0);

        host.advance_to(5000);
        assert_eq!(*log.borrow(), vec![1, 3]);
    }

    #[test]
    fn trailing_fire_does_not_open_a_new_window() {
        let mut host = ManualHost::new();
        let (log, mut throttle) = throttled(500);

        throttle.call(&mut host, 1);
        host.advance(100);
        throttle.call(&mut host, 2);
        host.advance_to(600);
        assert_eq!(*log.borrow(), vec![1, 2]);

        // Only the leading fire at t=0 counts for the window, so t=601
        // is already past it.
        host.advance_to(601);
        throttle.call(&mut host, 3);
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn window_re_arms_after_each_leading_call() {
        let mut host = ManualHost::new();
        let (log, mut throttle) = throttled(500);

        throttle.call(&mut host, 1);
        host.advance(100);
        throttle.call(&mut host, 2);
        host.advance_to(600);

        host.advance_to(601);
        throttle.call(&mut host, 3);
        host.advance_to(700);
        throttle.call(&mut host, 4);
        assert!(throttle.trailing_pending());

        host.advance_to(1200);
        assert_eq!(*log.borrow(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn spaced_calls_all_fire_immediately() {
        let mut host = ManualHost::new();
        let (log, mut throttle) = throttled(500);

        throttle.call(&mut host, 1);
        host.advance_to(501);
        throttle.call(&mut host, 2);
        host.advance_to(1002);
        throttle.call(&mut host, 3);

        assert_eq!(*log.borrow(), vec![1, 2, 3]);
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn leading_only_drops_in_window_calls() {
        let mut host = ManualHost::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let mut throttle = Throttle::leading_only(move |x: i32| sink.borrow_mut().push(x), 500);
        assert!(!throttle.trailing_enabled());

        throttle.call(&mut host, 1);
        host.advance(100);
        throttle.call(&mut host, 2);
        host.advance(100);
        throttle.call(&mut host, 3);

        host.advance_to(10_000);
        assert_eq!(*log.borrow(), vec![1]);
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn zero_timeout_throttles_only_same_millisecond_calls() {
        let mut host = ManualHost::new();
        let (log, mut throttle) = throttled(0);

        throttle.call(&mut host, 1);
        throttle.call(&mut host, 2);
        assert_eq!(*log.borrow(), vec![1]);

        host.advance(1);
        throttle.call(&mut host, 3);
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn instances_do_not_share_state() {
        let mut host = ManualHost::new();
        let (log_a, mut a) = throttled(500);
        let (log_b, mut b) = throttled(500);

        a.call(&mut host, 1);
        host.advance(100);
        a.call(&mut host, 2);

        // `b` has never fired, so its first call is a leading call even
        // though `a` is mid-window with a trailing call armed.
        b.call(&mut host, 7);
        assert_eq!(*log_b.borrow(), vec![7]);
        assert!(!b.trailing_pending());
        assert!(a.trailing_pending());

        host.advance_to(700);
        assert_eq!(*log_a.borrow(), vec![1, 2]);
        assert_eq!(*log_b.borrow(), vec![7]);
    }

    #[test]
    fn getters_track_configuration_and_state() {
        let mut host = ManualHost::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let mut throttle = Throttle::new(move |x: i32| sink.borrow_mut().push(x));

        assert_eq!(throttle.timeout_ms(), DEFAULT_TIMEOUT_MS);
        assert!(throttle.trailing_enabled());
        assert_eq!(throttle.last_fire_ms(), None);
        assert!(!throttle.trailing_pending());

        host.advance_to(42);
        throttle.call(&mut host, 1);
        assert_eq!(throttle.last_fire_ms(), Some(42));
        throttle.call(&mut host, 2);
        assert!(throttle.trailing_pending());

        host.advance(DEFAULT_TIMEOUT_MS);
        assert!(!throttle.trailing_pending());
        assert_eq!(throttle.last_fire_ms(), Some(42));
    }
}
