// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Engine configuration: centering default and animation timing.

/// Duration of the enter and exit animations, in host time units.
pub const DURATION: u64 = 550;

/// Delay before a touch-initiated ripple is committed.
///
/// A touch that turns into a scroll within this window never shows a ripple.
pub const DELAY_RIPPLE: u64 = 80;

/// Period of one pulse cycle for pulsating ripples.
pub const PULSATE_DURATION: u64 = 2500;

/// Delay between mounting a pulsating ripple and its first pulse.
pub const PULSATE_DELAY: u64 = 200;

/// Animation and deferral timings, in host time units (milliseconds in practice).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RippleTiming {
    /// Enter animation length.
    pub enter: u64,
    /// Exit animation length; the instance unmounts when it elapses.
    pub exit: u64,
    /// Length of one pulse cycle.
    pub pulse_period: u64,
    /// Delay before the first pulse.
    pub pulse_delay: u64,
    /// Touch deferral window.
    pub touch_delay: u64,
}

impl Default for RippleTiming {
    fn default() -> Self {
        Self {
            enter: DURATION,
            exit: DURATION,
            pulse_period: PULSATE_DURATION,
            pulse_delay: PULSATE_DELAY,
            touch_delay: DELAY_RIPPLE,
        }
    }
}

/// Configuration for a [`RippleEngine`](crate::RippleEngine).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RippleConfig {
    /// Center every ripple unless a call overrides it via [`StartOptions::center`](crate::StartOptions::center).
    pub center: bool,
    /// Animation and deferral timings.
    pub timing: RippleTiming,
}

impl RippleConfig {
    /// Sets the default centering.
    #[must_use]
    pub const fn with_center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Replaces the timings.
    #[must_use]
    pub const fn with_timing(mut self, timing: RippleTiming) -> Self {
        self.timing = timing;
        self
    }
}
