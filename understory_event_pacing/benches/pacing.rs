// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Criterion benchmarks for the pacing wrappers.
//!
//! Wrapper calls sit on pointer-move hot paths, so the interesting number
//! is the per-call overhead against an in-memory host, both when a call
//! passes straight through and when it arms or re-arms deferred work.

use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{Criterion, criterion_group, criterion_main};
use understory_event_pacing::{FrameCoalescer, Throttle, TrailingDebounce};
use understory_timer_host::ManualHost;

fn bench_throttle(c: &mut Criterion) {
    c.bench_function("throttle_leading_path", |b| {
        let mut host = ManualHost::new();
        let hits = Rc::new(Cell::new(0_u64));
        let sink = Rc::clone(&hits);
        let mut throttle = Throttle::with_timeout(move |x: u64| sink.set(sink.get() + x), 10);
        b.iter(|| {
            // Step past the window so every call takes the leading path.
            host.advance(11);
            throttle.call(&mut host, black_box(1));
        });
    });

    c.bench_function("throttle_in_window_drop", |b| {
        let mut host = ManualHost::new();
        let hits = Rc::new(Cell::new(0_u64));
        let sink = Rc::clone(&hits);
        let mut throttle =
            Throttle::with_timeout(move |x: u64| sink.set(sink.get() + x), 1_000_000);
        throttle.call(&mut host, 1);
        throttle.call(&mut host, 1);
        b.iter(|| {
            // A trailing call is already armed, so these are dropped.
            throttle.call(&mut host, black_box(1));
        });
    });
}

fn bench_trailing_debounce(c: &mut Criterion) {
    c.bench_function("trailing_debounce_rearm", |b| {
        let mut host = ManualHost::new();
        let hits = Rc::new(Cell::new(0_u64));
        let sink = Rc::clone(&hits);
        let mut debounce =
            TrailingDebounce::with_timeout(move |x: u64| sink.set(sink.get() + x), 500);
        b.iter(|| {
            // Every call cancels and re-arms a one-shot timer.
            debounce.call(&mut host, black_box(1));
        });
    });
}

fn bench_frame_coalescer(c: &mut Criterion) {
    c.bench_function("frame_coalescer_rearm", |b| {
        let mut host = ManualHost::new();
        let hits = Rc::new(Cell::new(0_u64));
        let sink = Rc::clone(&hits);
        let mut coalescer = FrameCoalescer::new(move |x: u64, _ts| sink.set(sink.get() + x));
        b.iter(|| {
            coalescer.call(&mut host, black_box(1));
        });
    });
}

criterion_group!(benches, bench_throttle, bench_trailing_debounce, bench_frame_coalescer);
criterion_main!(benches);
