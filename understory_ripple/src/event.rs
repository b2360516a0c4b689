// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events and per-call options consumed by the ripple engine.

use kurbo::Point;
use smallvec::SmallVec;

/// What kind of interaction produced a [`RippleEvent`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    /// Primary mouse button pressed.
    MouseDown,
    /// Mouse button released.
    MouseUp,
    /// Pointer left the surface.
    MouseLeave,
    /// Context menu requested.
    ContextMenu,
    /// A drag left the surface.
    DragLeave,
    /// A touch point touched the surface.
    TouchStart,
    /// A touch point moved, usually the start of a scroll.
    TouchMove,
    /// A touch point was lifted.
    TouchEnd,
    /// A key was pressed while the control had focus.
    KeyDown,
    /// A key was released while the control had focus.
    KeyUp,
    /// The control lost focus.
    Blur,
    /// No native event; generated by the host (for example [`pulsate`](crate::RippleEngine::pulsate)).
    Synthetic,
}

impl InteractionKind {
    /// Returns `true` for touch-originated interactions.
    #[must_use]
    pub const fn is_touch(self) -> bool {
        matches!(self, Self::TouchStart | Self::TouchMove | Self::TouchEnd)
    }
}

/// A raw interaction handed to [`RippleEngine::start`](crate::RippleEngine::start) or
/// [`RippleEngine::stop`](crate::RippleEngine::stop).
///
/// Coordinates are client (viewport) coordinates, the same space as
/// [`SurfaceBox::rect`](crate::SurfaceBox::rect).
#[derive(Clone, Debug, PartialEq)]
pub struct RippleEvent {
    /// Interaction kind.
    pub kind: InteractionKind,
    /// Pointer position for mouse events.
    pub client: Option<Point>,
    /// Active touch points for touch events; the first one places the ripple.
    pub touches: SmallVec<[Point; 2]>,
    /// Skip surface measurement and use a zero-sized rectangle instead.
    pub use_fake_element: bool,
}

impl RippleEvent {
    /// An event with no coordinates, as used by [`pulsate`](crate::RippleEngine::pulsate).
    #[must_use]
    pub fn synthetic() -> Self {
        Self::key(InteractionKind::Synthetic)
    }

    /// A coordinate-free event of the given kind (keyboard, blur, or synthetic).
    #[must_use]
    pub fn key(kind: InteractionKind) -> Self {
        Self {
            kind,
            client: None,
            touches: SmallVec::new(),
            use_fake_element: false,
        }
    }

    /// A mouse event at `client`.
    #[must_use]
    pub fn mouse(kind: InteractionKind, client: Point) -> Self {
        Self {
            kind,
            client: Some(client),
            touches: SmallVec::new(),
            use_fake_element: false,
        }
    }

    /// A touch event carrying the current touch points.
    #[must_use]
    pub fn touch(kind: InteractionKind, touches: impl IntoIterator<Item = Point>) -> Self {
        Self {
            kind,
            client: None,
            touches: touches.into_iter().collect(),
            use_fake_element: false,
        }
    }

    /// Marks the event so that surface measurement is skipped.
    #[must_use]
    pub fn with_fake_element(mut self) -> Self {
        self.use_fake_element = true;
        self
    }

    /// Position the ripple should grow from, if the event carries a usable one.
    ///
    /// The first touch point wins. A client position of exactly `(0, 0)` is what
    /// keyboard-initiated clicks report, so it counts as "no position".
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        if let Some(first) = self.touches.first() {
            return Some(*first);
        }
        self.client.filter(|p| *p != Point::ZERO)
    }
}

impl Default for RippleEvent {
    fn default() -> Self {
        Self::synthetic()
    }
}

/// Options for a single [`start`](crate::RippleEngine::start) call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StartOptions {
    /// Loop the pulse animation instead of a one-shot grow.
    pub pulsate: bool,
    /// Force centered placement; `None` uses [`RippleConfig::center`](crate::RippleConfig::center).
    pub center: Option<bool>,
}

impl StartOptions {
    /// Options for a pulsating ripple.
    pub const PULSATE: Self = Self {
        pulsate: true,
        center: None,
    };

    /// Overrides the engine's default centering for this call.
    #[must_use]
    pub const fn centered(mut self, center: bool) -> Self {
        self.center = Some(center);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_classified() {
        assert!(!InteractionKind::MouseDown.is_touch());
        assert!(InteractionKind::TouchEnd.is_touch());
        assert!(!InteractionKind::KeyDown.is_touch());
        assert!(!InteractionKind::Synthetic.is_touch());
    }

    #[test]
    fn first_touch_point_wins() {
        let ev = RippleEvent::touch(
            InteractionKind::TouchStart,
            [Point::new(3.0, 4.0), Point::new(9.0, 9.0)],
        );
        assert_eq!(ev.position(), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn origin_client_position_is_unusable() {
        let ev = RippleEvent::mouse(InteractionKind::MouseDown, Point::ZERO);
        assert_eq!(ev.position(), None);
        assert_eq!(RippleEvent::synthetic().position(), None);
        let empty_touch = RippleEvent::touch(InteractionKind::TouchStart, []);
        assert_eq!(empty_touch.position(), None);
    }

    #[test]
    fn start_options_helpers() {
        assert!(StartOptions::PULSATE.pulsate);
        assert_eq!(StartOptions::default().centered(true).center, Some(true));
    }
}
