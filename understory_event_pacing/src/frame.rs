// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coalescing calls onto rendering frames.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::marker::PhantomData;

use understory_timer_host::{FrameHost, FrameToken};

struct CoalescerInner<F> {
    callback: F,
    pending: Option<FrameToken>,
}

/// Coalesces a burst of calls into one invocation on the next frame.
///
/// Every call disarms any invocation already waiting for a frame and arms a
/// new one with the current arguments, so however many calls arrive between
/// two frames, the callback runs once per frame at most, with the latest
/// arguments. When it runs, the callback also receives the frame's
/// timestamp in milliseconds as its second argument.
///
/// This is the frame-synced sibling of
/// [`TrailingDebounce`][crate::TrailingDebounce]: the settling point is the
/// host's next frame rather than a quiet period.
///
/// ## Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use understory_event_pacing::FrameCoalescer;
/// use understory_timer_host::ManualHost;
///
/// let mut host = ManualHost::new();
/// let drawn = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&drawn);
/// let mut coalescer = FrameCoalescer::new(move |pos: (f64, f64), frame_ms| {
///     sink.borrow_mut().push((pos, frame_ms));
/// });
///
/// // A burst of pointer positions between frames.
/// coalescer.call(&mut host, (1.0, 1.0));
/// coalescer.call(&mut host, (2.0, 4.0));
/// coalescer.call(&mut host, (3.0, 9.0));
///
/// host.run_frame(16);
/// assert_eq!(*drawn.borrow(), vec![((3.0, 9.0), 16)]);
/// ```
pub struct FrameCoalescer<A, F> {
    inner: Rc<RefCell<CoalescerInner<F>>>,
    _args: PhantomData<fn(A)>,
}

impl<A, F> FrameCoalescer<A, F> {
    /// Creates a coalescer around `callback`.
    ///
    /// The callback's second argument is the timestamp of the frame it runs
    /// on.
    pub fn new(callback: F) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CoalescerInner { callback, pending: None })),
            _args: PhantomData,
        }
    }

    /// Whether an invocation is currently waiting for a frame.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }
}

impl<A: 'static, F: FnMut(A, u64) + 'static> FrameCoalescer<A, F> {
    /// Feeds one call through the coalescer.
    ///
    /// Replaces any invocation already armed for the next frame, arguments
    /// included. The callback runs from the host's frame delivery, never
    /// from inside this method, and must not re-enter this wrapper
    /// instance.
    pub fn call<H: FrameHost>(&mut self, host: &mut H, args: A) {
        let mut inner = self.inner.borrow_mut();
        if let Some(token) = inner.pending.take() {
            host.cancel_frame(token);
        }
        let shared = Rc::clone(&self.inner);
        let token = host.schedule_frame(Box::new(move |frame_time_ms| {
            let mut inner = shared.borrow_mut();
            inner.pending = None;
            (inner.callback)(args, frame_time_ms);
        }));
        inner.pending = Some(token);
    }
}

impl<A, F> fmt::Debug for FrameCoalescer<A, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameCoalescer")
            .field("pending", &self.inner.borrow().pending.is_some())
            .finish_non_exhaustive()
    }
}
