// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Immediate-first periodic invocation.

use alloc::boxed::Box;

use understory_timer_host::{IntervalToken, TimerHost};

/// Runs `handler` once right away, then every `period_ms` milliseconds.
///
/// The first invocation happens synchronously, before this function
/// returns; the host only ever sees the periodic part. Each invocation,
/// immediate and periodic alike, receives a clone of `args`. Pass `()` when
/// the handler takes no data.
///
/// There is no wrapper state to hold on to. The returned token is the only
/// way to stop the repetition, via
/// [`TimerHost::cancel_repeating`].
///
/// ## Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use understory_event_pacing::start_interval;
/// use understory_timer_host::{ManualHost, TimerHost};
///
/// let mut host = ManualHost::new();
/// let beats = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&beats);
///
/// let token = start_interval(&mut host, 1000, "beat", move |tag| {
///     sink.borrow_mut().push(tag);
/// });
/// // The first invocation already happened.
/// assert_eq!(beats.borrow().len(), 1);
///
/// host.advance(2000);
/// assert_eq!(beats.borrow().len(), 3);
///
/// host.cancel_repeating(token);
/// host.advance(5000);
/// assert_eq!(beats.borrow().len(), 3);
/// ```
pub fn start_interval<H, A, F>(
    host: &mut H,
    period_ms: u64,
    args: A,
    mut handler: F,
) -> IntervalToken
where
    H: TimerHost,
    A: Clone + 'static,
    F: FnMut(A) + 'static,
{
    handler(args.clone());
    host.schedule_repeating(period_ms, Box::new(move || handler(args.clone())))
}
