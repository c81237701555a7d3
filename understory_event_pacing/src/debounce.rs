// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trailing and leading debounce.
//!
//! Both wrappers reduce a burst of calls to a single callback invocation;
//! they differ in which end of the burst survives. [`TrailingDebounce`]
//! waits for the burst to settle and then fires with the last call's
//! arguments. [`LeadingDebounce`] fires with the first call's arguments and
//! suppresses the rest of the burst.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::marker::PhantomData;

use understory_timer_host::{Clock, TimerHost, TimerToken};

use crate::DEFAULT_TIMEOUT_MS;

struct TrailingInner<F> {
    callback: F,
    pending: Option<TimerToken>,
}

/// Defers a callback until a burst of calls settles.
///
/// Every call disarms the previously armed deferred invocation and arms a
/// new one [`timeout_ms`][Self::timeout_ms] milliseconds out, capturing that
/// call's arguments. The callback therefore runs exactly once per burst,
/// with the final call's arguments, one timeout after the final call. There
/// is no leading invocation.
///
/// ## Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use understory_event_pacing::TrailingDebounce;
/// use understory_timer_host::ManualHost;
///
/// let mut host = ManualHost::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// let mut debounce =
///     TrailingDebounce::with_timeout(move |q: &'static str| sink.borrow_mut().push(q), 500);
///
/// debounce.call(&mut host, "u");
/// host.advance(100);
/// debounce.call(&mut host, "un");
/// host.advance(100);
/// debounce.call(&mut host, "und");
///
/// // Settles 500ms after the last call, with the last arguments.
/// host.advance(500);
/// assert_eq!(*seen.borrow(), vec!["und"]);
/// ```
pub struct TrailingDebounce<A, F> {
    inner: Rc<RefCell<TrailingInner<F>>>,
    timeout: u64,
    _args: PhantomData<fn(A)>,
}

impl<A, F> TrailingDebounce<A, F> {
    /// Creates a trailing debounce with the default quiet period of
    /// [`DEFAULT_TIMEOUT_MS`].
    pub fn new(callback: F) -> Self {
        Self::with_timeout(callback, DEFAULT_TIMEOUT_MS)
    }

    /// Creates a trailing debounce with the given quiet period.
    pub fn with_timeout(callback: F, timeout_ms: u64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TrailingInner { callback, pending: None })),
            timeout: timeout_ms,
            _args: PhantomData,
        }
    }

    /// The quiet period in milliseconds.
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout
    }

    /// Whether a deferred invocation is currently armed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }
}

impl<A: 'static, F: FnMut(A) + 'static> TrailingDebounce<A, F> {
    /// Feeds one call through the debounce, restarting the quiet period.
    ///
    /// The callback runs from the host when the timer fires, never from
    /// inside this method. The callback must not re-enter this wrapper
    /// instance.
    pub fn call<H: TimerHost>(&mut self, host: &mut H, args: A) {
        let mut inner = self.inner.borrow_mut();
        if let Some(token) = inner.pending.take() {
            host.cancel(token);
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

impl<A, F> fmt::Debug for TrailingDebounce<A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrailingDebounce")
            .field("timeout_ms", &self.timeout)
            .field("pending", &self.inner.borrow().pending.is_some())
            .finish_non_exhaustive()
    }
}

/// Fires a callback at the start of a burst and suppresses the rest.
///
/// A call runs the callback immediately when more than
/// [`timeout_ms`][Self::timeout_ms] milliseconds have passed since the
/// *previous call*, fired or not. Every call updates that stamp, so a
/// stream of calls spaced closer than the timeout keeps sliding the
/// suppression window forward and only the first of them fires. Nothing is
/// ever deferred, which is why this wrapper needs only a [`Clock`] rather
/// than a full timer host.
///
/// The gap is compared with strict inequality: a call exactly `timeout_ms`
/// after the previous one is still suppressed.
///
/// ## Example
///
/// ```rust
/// use understory_event_pacing::LeadingDebounce;
/// use understory_timer_host::ManualHost;
///
/// let mut host = ManualHost::new();
/// let mut hits = 0;
/// let mut debounce = LeadingDebounce::with_timeout(|()| hits += 1, 500);
///
/// debounce.call(&host, ()); // fires
/// host.advance(400);
/// debounce.call(&host, ()); // suppressed, stamp moves to t=400
/// host.advance(400);
/// debounce.call(&host, ()); // still suppressed: only 400ms since t=400
/// host.advance(600);
/// debounce.call(&host, ()); // quiet long enough, fires
/// drop(debounce);
/// assert_eq!(hits, 2);
/// ```
pub struct LeadingDebounce<A, F> {
    callback: F,
    last_call: Option<u64>,
    timeout: u64,
    _args: PhantomData<fn(A)>,
}

impl<A, F> LeadingDebounce<A, F> {
    /// Creates a leading debounce with the default quiet period of
    /// [`DEFAULT_TIMEOUT_MS`].
    pub fn new(callback: F) -> Self {
        Self::with_timeout(callback, DEFAULT_TIMEOUT_MS)
    }

    /// Creates a leading debounce with the given quiet period.
    pub fn with_timeout(callback: F, timeout_ms: u64) -> Self {
        Self {
            callback,
            last_call: None,
            timeout: timeout_ms,
            _args: PhantomData,
        }
    }

    /// The quiet period in milliseconds.
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout
    }

    /// The time of the previous call, fired or suppressed.
    #[must_use]
    pub fn last_call_ms(&self) -> Option<u64> {
        self.last_call
    }
}

impl<A, F: FnMut(A)> LeadingDebounce<A, F> {
    /// Feeds one call through the debounce.
    ///
    /// Runs the callback immediately when the quiet period has passed, and
    /// moves the call stamp forward either way.
    pub fn call<C: Clock>(&mut self, clock: &C, args: A) {
        let now = clock.now_ms();
        let quiet = match self.last_call {
            None => true,
            Some(prev) => now.saturating_sub(prev) > self.timeout,
        };
        self.last_call = Some(now);
        if quiet {
            (self.callback)(args);
        }
    }
}

impl<A, F> fmt::Debug for LeadingDebounce<A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeadingDebounce")
            .field("timeout_ms", &self.timeout)
            .field("last_call_ms", &self.last_call)
            .finish_non_exhaustive()
    }
}
