// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Opaque handles for cancelling host-scheduled work.

use core::num::NonZeroU64;

/// Handle to a scheduled one-shot callback.
///
/// Issued by [`TimerHost::schedule`][crate::TimerHost::schedule] and redeemed
/// by [`TimerHost::cancel`][crate::TimerHost::cancel]. Tokens are opaque to
/// callers: only the host that issued a token can interpret it, and a host
/// never hands out the same value twice within its own lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping the token makes the scheduled call impossible to cancel"]
pub struct TimerToken(NonZeroU64);

impl TimerToken {
    /// Creates a token from a raw host-assigned value.
    ///
    /// Intended for host implementations. Code that merely schedules work
    /// should treat tokens as opaque.
    #[inline]
    pub const fn from_raw(raw: NonZeroU64) -> Self {
        Self(raw)
    }

    /// The raw host-assigned value.
    #[inline]
    pub const fn raw(self) -> NonZeroU64 {
        self.0
    }
}

/// Handle to a repeating callback.
///
/// Issued by
/// [`TimerHost::schedule_repeating`][crate::TimerHost::schedule_repeating].
/// A repeating callback stays armed until the token is passed to
/// [`TimerHost::cancel_repeating`][crate::TimerHost::cancel_repeating].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping the token makes the repeating call run forever"]
pub struct IntervalToken(NonZeroU64);

impl IntervalToken {
    /// Creates a token from a raw host-assigned value.
    #[inline]
    pub const fn from_raw(raw: NonZeroU64) -> Self {
        Self(raw)
    }

    /// The raw host-assigned value.
    #[inline]
    pub const fn raw(self) -> NonZeroU64 {
        self.0
    }
}

/// Handle to a callback armed for the next frame.
///
/// Issued by [`FrameHost::schedule_frame`][crate::FrameHost::schedule_frame]
/// and redeemed by
/// [`FrameHost::cancel_frame`][crate::FrameHost::cancel_frame].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping the token makes the frame callback impossible to cancel"]
pub struct FrameToken(NonZeroU64);

impl FrameToken {
    /// Creates a token from a raw host-assigned value.
    #[inline]
    pub const fn from_raw(raw: NonZeroU64) -> Self {
        Self(raw)
    }

    /// The raw host-assigned value.
    #[inline]
    pub const fn raw(self) -> NonZeroU64 {
        self.0
    }
}
