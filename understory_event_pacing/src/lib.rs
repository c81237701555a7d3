// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_pacing --heading-base-level=0

//! Understory Event Pacing: temporal shaping for event callbacks.
//!
//! High-frequency event sources (pointer movement, scrolling, resize
//! streams, sensor polls) routinely outpace the work hanging off them. This
//! crate provides small, independent wrappers that reshape *when* a
//! callback runs without changing what it receives:
//!
//! - [`Throttle`]: at most one leading call per cooldown window, with an
//!   optional trailing call carrying the burst's remainder.
//! - [`TrailingDebounce`]: one call per burst, after the burst settles,
//!   with the last call's arguments.
//! - [`LeadingDebounce`]: one call per burst, immediately, suppressing the
//!   rest of the burst.
//! - [`FrameCoalescer`]: at most one call per rendering frame, with the
//!   latest arguments plus the frame timestamp.
//! - [`start_interval`]: run now, then repeat on a fixed period until the
//!   returned token is cancelled.
//!
//! Wrappers never talk to the platform directly. They are written against
//! the traits in `understory_timer_host` and receive the host on every
//! call, so the same logic runs against a real event loop or against that
//! crate's manually stepped host for tests and headless use.
//!
//! ## Minimal example
//!
//! Throttling pointer-move handling to one update per 100ms window:
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use kurbo::Point;
//! use understory_event_pacing::Throttle;
//! use understory_timer_host::ManualHost;
//!
//! let mut host = ManualHost::new();
//!
//! let applied = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&applied);
//! let mut on_move = Throttle::with_timeout(move |p: Point| sink.borrow_mut().push(p), 100);
//!
//! // A burst of pointer positions within one window.
//! on_move.call(&mut host, Point::new(0.0, 0.0));
//! host.advance(30);
//! on_move.call(&mut host, Point::new(3.0, 0.0));
//! host.advance(30);
//! on_move.call(&mut host, Point::new(6.0, 0.0));
//! host.advance(30);
//! on_move.call(&mut host, Point::new(9.0, 0.0));
//!
//! // The leading call ran immediately. The trailing call runs one window
//! // after it was armed, keeping the arguments that armed it.
//! host.advance_to(130);
//! assert_eq!(
//!     *applied.borrow(),
//!     vec![Point::new(0.0, 0.0), Point::new(3.0, 0.0)],
//! );
//! ```
//!
//! ## Timing model
//!
//! Everything is single-threaded and cooperative. A wrapper call returns
//! immediately; deferred work is expressed by scheduling against the host
//! and runs when the host fires the timer or produces the frame. Deferred
//! invocations from one wrapper instance are serialized by construction:
//! re-arming cancels the previous arming, so at most one deferred
//! invocation is pending per instance at any time. Instances never share
//! state, even when created around the same callback.
//!
//! Deferred arming has two visible consequences:
//!
//! - An armed invocation keeps the wrapper's shared state alive. Dropping
//!   a wrapper does not disarm a deferred call that is already scheduled;
//!   it still runs.
//! - Callback panics propagate to whoever is running: the wrapper's caller
//!   on leading paths, the host's firing context on deferred paths.
//!   Wrappers neither catch nor suppress them. A callback must not
//!   re-enter the wrapper instance that is invoking it.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod debounce;
mod frame;
mod interval;
mod throttle;

pub use debounce::{LeadingDebounce, TrailingDebounce};
pub use frame::FrameCoalescer;
pub use interval::start_interval;
pub use throttle::Throttle;

/// The default cooldown and quiet period, in milliseconds, used by the
/// `new` constructors of [`Throttle`], [`TrailingDebounce`], and
/// [`LeadingDebounce`].
pub const DEFAULT_TIMEOUT_MS: u64 = 500;
