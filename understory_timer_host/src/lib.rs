// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Timer Host: the scheduling seam for callback-timing primitives.
//!
//! This crate defines the narrow interface between timing logic and the event
//! loop that ultimately runs it:
//! - A monotonic millisecond [`Clock`].
//! - [`TimerHost`] for one-shot and repeating callbacks, disarmed through the
//!   opaque [`TimerToken`] and [`IntervalToken`] handles the host issues.
//! - [`FrameHost`] for callbacks that run when the host next produces a frame
//!   and receive that frame's timestamp.
//!
//! Hosts are single-threaded and cooperative: a scheduled callback never runs
//! while the code that scheduled it is still on the stack, and callbacks do
//! not need to be `Send`. Implement the traits over a platform event loop to
//! integrate, or use [`ManualHost`] to drive timing logic deterministically
//! from tests and headless simulations. The `understory_event_pacing` crate
//! builds throttling, debouncing, and frame coalescing on top of these
//! traits.
//!
//! ## Minimal example
//!
//! Scheduling against a [`ManualHost`], where time only moves when stepped:
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use understory_timer_host::{Clock, ManualHost, TimerHost};
//!
//! let mut host = ManualHost::new();
//!
//! let fired = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&fired);
//! let _token = host.schedule(250, Box::new(move || sink.borrow_mut().push("saved")));
//!
//! // Nothing runs until the clock is stepped past the due time.
//! host.advance(249);
//! assert!(fired.borrow().is_empty());
//!
//! host.advance(1);
//! assert_eq!(*fired.borrow(), vec!["saved"]);
//! assert_eq!(host.now_ms(), 250);
//! ```
//!
//! ## Features
//!
//! - `manual_host` (default): enables [`ManualHost`], a deterministic host
//!   driven by explicit time steps; intended for tests and headless hosts.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod host;
mod tokens;

#[cfg(feature = "manual_host")]
mod manual;

pub use host::{Clock, DeferredFn, FrameFn, FrameHost, RepeatFn, TimerHost};
pub use tokens::{FrameToken, IntervalToken, TimerToken};

#[cfg(feature = "manual_host")]
pub use manual::ManualHost;
