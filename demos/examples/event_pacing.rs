// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pacing one pointer drag four ways: throttle, debounce, and frames.
//!
//! This example feeds a simulated 160ms pointer drag through:
//! - `FrameCoalescer` to repaint at most once per 16ms frame,
//! - `Throttle` to publish the tooltip anchor at most once per 100ms,
//! - `LeadingDebounce` to fire drag-start feedback once per burst,
//! - `TrailingDebounce` to detect the pointer settling,
//! - `start_interval` for a heartbeat that outlives the drag.
//!
//! Everything runs against `ManualHost`, so the timeline below is
//! deterministic and printable without sleeping.
//!
//! Run:
//! - `cargo run -p understory_demos --example event_pacing`

use kurbo::Point;
use understory_event_pacing::{
    FrameCoalescer, LeadingDebounce, Throttle, TrailingDebounce, start_interval,
};
use understory_timer_host::{Clock, ManualHost, TimerHost};

fn main() {
    let mut host = ManualHost::new();

    // Repaint: at most once per frame, with the latest pointer position and
    // the frame timestamp the host hands over.
    let mut repaint = FrameCoalescer::new(|p: Point, frame_ms: u64| {
        println!("    paint      frame at {frame_ms}ms, cursor ({:.0}, {:.0})", p.x, p.y);
    });

    // Tooltip anchor: one leading publish per 100ms window, plus one
    // trailing publish carrying the call that armed it.
    let mut publish = Throttle::with_timeout(
        |p: Point| println!("    publish    tooltip anchor ({:.0}, {:.0})", p.x, p.y),
        100,
    );

    // Drag-start feedback: the first call of a burst fires, the rest of the
    // burst keeps sliding the suppression window.
    let mut feedback = LeadingDebounce::with_timeout(
        |p: Point| println!("    feedback   drag started at ({:.0}, {:.0})", p.x, p.y),
        150,
    );

    // Settle detection: fires once the pointer has been quiet for 150ms.
    let mut settled = TrailingDebounce::with_timeout(
        |p: Point| println!("    settled    drag rests at ({:.0}, {:.0})", p.x, p.y),
        150,
    );

    // Heartbeat: immediately, then every 80ms until cancelled.
    println!("-- drag begins at 0ms --");
    let heartbeat = start_interval(&mut host, 80, (), |()| println!("    heartbeat"));

    // Pointer samples every 8ms, one frame every 16ms.
    while host.now_ms() < 160 {
        let t = host.now_ms();
        let pos = Point::new(0.9 * t as f64, 120.0 - 0.25 * t as f64);

        feedback.call(&host, pos);
        publish.call(&mut host, pos);
        settled.call(&mut host, pos);
        repaint.call(&mut host, pos);

        host.advance(8);
        if host.now_ms().is_multiple_of(16) {
            host.run_frame(host.now_ms());
        }
    }

    // The pointer stops. Stepping onward drains the deferred work: the
    // throttle's armed trailing publish, the settle callback 150ms after
    // the last sample, and two more heartbeats.
    println!("-- pointer stops at {}ms --", host.now_ms());
    host.advance(200);

    host.cancel_repeating(heartbeat);
    println!("-- heartbeat cancelled at {}ms --", host.now_ms());
    host.advance(400);
    println!("-- done --");
}
