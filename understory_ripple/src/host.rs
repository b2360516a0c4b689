// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the engine and the surface it decorates.

use crate::geometry::SurfaceBox;
use crate::instance::{RippleId, RippleInstance};

/// Surface measurement and rendering sink for a [`RippleEngine`](crate::RippleEngine).
///
/// The engine calls [`measure`](Self::measure) on every start, so a host that moves or
/// resizes between interactions is always measured fresh. Rendering is push-based: the
/// engine calls [`render`](Self::render) whenever the rendered collection changes and
/// [`ripple_exited`](Self::ripple_exited) when a ripple's exit animation has finished and
/// its node can be unmounted.
pub trait RippleHost {
    /// Current bounding box of the surface, or `None` if nothing is mounted.
    fn measure(&self) -> Option<SurfaceBox>;

    /// Called with every ripple that should be drawn, in stacking order (oldest first).
    fn render(&mut self, ripples: &[RippleInstance]) {
        let _ = ripples;
    }

    /// Called once per ripple when its exit animation completes.
    fn ripple_exited(&mut self, id: RippleId) {
        let _ = id;
    }
}
