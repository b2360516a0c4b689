// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single ripple: identity, geometry, phase, and animation sampling.
//!
//! Instances are created and mutated only by the [`RippleEngine`](crate::RippleEngine).
//! Renderers read them (for example through [`RippleHost::render`](crate::RippleHost::render))
//! and sample [`RippleInstance::frame`] to draw the current animation state.

use kurbo::{CubicBez, ParamCurve, Point};

use crate::config::RippleTiming;
use crate::geometry::RippleGeometry;

/// Stable identity of a ripple, used as the key by rendering layers.
///
/// Ids increase monotonically per engine and are never reused. They are unrelated to
/// an instance's position in the engine's collection, which shifts as older ripples leave.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RippleId(pub u64);

/// Lifecycle phase of a [`RippleInstance`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RipplePhase {
    /// Created but not yet mounted.
    Entering,
    /// Mounted and running its enter (and possibly pulse) animation.
    Visible,
    /// Stopped; running the exit animation until it unmounts.
    Leaving,
}

/// One ripple as seen by the rendering layer.
#[derive(Clone, Debug, PartialEq)]
pub struct RippleInstance {
    /// Identity key.
    pub id: RippleId,
    /// Placement, fixed at creation.
    pub geometry: RippleGeometry,
    /// Whether the pulse animation loops while visible.
    pub pulsate: bool,
    phase: RipplePhase,
    mounted_at: u64,
    leaving_since: Option<u64>,
}

/// Sampled animation state of a ripple at one instant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RippleFrame {
    /// Grow progress of the outer circle, `0.0..=1.0`.
    pub scale: f64,
    /// Effective opacity, including the exit fade.
    pub opacity: f64,
    /// Extra scale of the pulsing inner circle; `1.0` when not pulsing.
    pub pulse_scale: f64,
}

/// Opacity of a ripple when its enter animation begins.
const ENTER_OPACITY: f64 = 0.1;
/// Opacity of a fully entered ripple.
const VISIBLE_OPACITY: f64 = 0.3;
/// Smallest scale reached halfway through a pulse.
const PULSE_MIN_SCALE: f64 = 0.92;

impl RippleInstance {
    pub(crate) fn new(id: RippleId, geometry: RippleGeometry, pulsate: bool) -> Self {
        Self {
            id,
            geometry,
            pulsate,
            phase: RipplePhase::Entering,
            mounted_at: 0,
            leaving_since: None,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> RipplePhase {
        self.phase
    }

    /// `true` until the owning interaction is stopped.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        !matches!(self.phase, RipplePhase::Leaving)
    }

    /// Time the enter animation started.
    #[must_use]
    pub const fn mounted_at(&self) -> u64 {
        self.mounted_at
    }

    /// Time the exit animation started, if leaving.
    #[must_use]
    pub const fn leaving_since(&self) -> Option<u64> {
        self.leaving_since
    }

    /// Time at which the exit animation finishes, if leaving.
    #[must_use]
    pub fn exit_deadline(&self, timing: &RippleTiming) -> Option<u64> {
        self.leaving_since.map(|t| t.saturating_add(timing.exit))
    }

    /// Returns `true` once the exit animation has run its full duration.
    #[must_use]
    pub fn is_exit_complete(&self, now: u64, timing: &RippleTiming) -> bool {
        self.exit_deadline(timing).is_some_and(|deadline| now >= deadline)
    }

    pub(crate) fn mount(&mut self, now: u64) {
        debug_assert_eq!(self.phase, RipplePhase::Entering, "ripple mounted twice");
        self.mounted_at = now;
        self.phase = RipplePhase::Visible;
    }

    pub(crate) fn leave(&mut self, now: u64) {
        if self.phase != RipplePhase::Leaving {
            self.phase = RipplePhase::Leaving;
            self.leaving_since = Some(now);
        }
    }

    /// Samples the animation state at `now`.
    ///
    /// ```
    /// use kurbo::Rect;
    /// use understory_ripple::{RippleConfig, RippleEngine, RippleHost, SurfaceBox};
    ///
    /// struct Host;
    /// impl RippleHost for Host {
    ///     fn measure(&self) -> Option<SurfaceBox> {
    ///         Some(SurfaceBox::from_rect(Rect::new(0.0, 0.0, 40.0, 40.0)))
    ///     }
    /// }
    ///
    /// let mut engine = RippleEngine::new(Host, RippleConfig::default());
    /// engine.pulsate(0);
    /// let ripple = engine.ripples().next().unwrap();
    /// let timing = engine.config().timing;
    /// assert_eq!(ripple.frame(0, &timing).scale, 0.0);
    /// assert_eq!(ripple.frame(timing.enter, &timing).scale, 1.0);
    /// ```
    #[must_use]
    pub fn frame(&self, now: u64, timing: &RippleTiming) -> RippleFrame {
        let entered = ease(progress(now.saturating_sub(self.mounted_at), timing.enter));
        let scale = entered;
        let mut opacity = ENTER_OPACITY + (VISIBLE_OPACITY - ENTER_OPACITY) * entered;

        let mut pulse_scale = 1.0;
        match self.leaving_since {
            Some(since) => {
                let faded = ease(progress(now.saturating_sub(since), timing.exit));
                opacity *= 1.0 - faded;
            }
            None if self.pulsate => {
                pulse_scale = self.pulse_scale(now, timing);
            }
            None => {}
        }

        RippleFrame {
            scale,
            opacity,
            pulse_scale,
        }
    }

    fn pulse_scale(&self, now: u64, timing: &RippleTiming) -> f64 {
        let start = self.mounted_at.saturating_add(timing.pulse_delay);
        if now < start || timing.pulse_period == 0 {
            return 1.0;
        }
        let period = timing.pulse_period;
        let into_cycle = (now - start) % period;
        // Two eased legs per cycle: shrink to the minimum, then grow back.
        let half = period as f64 / 2.0;
        let t = into_cycle as f64;
        let (from, to, leg) = if t < half {
            (1.0, PULSE_MIN_SCALE, t / half)
        } else {
            (PULSE_MIN_SCALE, 1.0, (t - half) / half)
        };
        from + (to - from) * ease(leg)
    }
}

fn progress(elapsed: u64, duration: u64) -> f64 {
    if duration == 0 {
        return 1.0;
    }
    (elapsed as f64 / duration as f64).clamp(0.0, 1.0)
}

/// The standard "ease in out" curve, `cubic-bezier(0.4, 0, 0.2, 1)`.
fn ease(x: f64) -> f64 {
    const ITERATIONS: usize = 32;
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let curve = CubicBez::new(
        Point::ZERO,
        Point::new(0.4, 0.0),
        Point::new(0.2, 1.0),
        Point::new(1.0, 1.0),
    );
    // x(t) is monotonic for this curve, so bisection on t converges.
    let (mut lo, mut hi) = (0.0, 1.0);
    for _ in 0..ITERATIONS {
        let mid = (lo + hi) / 2.0;
        if curve.eval(mid).x < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    curve.eval((lo + hi) / 2.0).y
}
