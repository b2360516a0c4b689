// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ripple placement: where a ripple is centered and how large it grows.
//!
//! Geometry is computed once per ripple from a fresh [`SurfaceBox`] measurement and the
//! pointer position of the triggering event (if any). Coordinates are surface-local: the
//! origin is the top-left corner of the surface's bounding box.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Circle, Point, Rect, Size};

/// Measured layout of the surface that hosts ripples.
///
/// `rect` is the bounding box in client (viewport) coordinates and is used both to
/// translate pointer positions into surface-local space and to size centered ripples.
/// `client_size` is the element's content box size, used when sizing a ripple that grows
/// from the pointer. The two usually agree; they differ when the surface has borders or
/// is transformed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceBox {
    /// Bounding box in client coordinates.
    pub rect: Rect,
    /// Client (content) size of the surface element.
    pub client_size: Size,
}

impl SurfaceBox {
    /// The zero-sized box used when no surface is mounted or measurement is skipped.
    pub const ZERO: Self = Self {
        rect: Rect::ZERO,
        client_size: Size::ZERO,
    };

    /// Creates a box whose client size matches the bounding box.
    #[must_use]
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            rect,
            client_size: rect.size(),
        }
    }

    /// Sets a client size that differs from the bounding box.
    #[must_use]
    pub fn with_client_size(mut self, client_size: Size) -> Self {
        self.client_size = client_size;
        self
    }
}

impl Default for SurfaceBox {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Center and span of a single ripple, in surface-local coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RippleGeometry {
    /// Center of the ripple circle.
    pub center: Point,
    /// Diameter of the fully grown ripple.
    pub diameter: f64,
}

impl RippleGeometry {
    /// Computes ripple geometry for a surface and an optional pointer position.
    ///
    /// When `center` is set or there is no usable `position`, the ripple sits at the
    /// geometric center of the surface and its diameter is `sqrt((2w² + h²) / 3)`, bumped
    /// by one when that value is an exact even integer. Otherwise the ripple starts under
    /// the pointer and is large enough to cover the farthest corner of the surface.
    ///
    /// ```
    /// use kurbo::{Point, Rect};
    /// use understory_ripple::{RippleGeometry, SurfaceBox};
    ///
    /// let surface = SurfaceBox::from_rect(Rect::new(10.0, 10.0, 110.0, 60.0));
    /// let g = RippleGeometry::resolve(&surface, Some(Point::new(60.0, 30.0)), false);
    /// assert_eq!(g.center, Point::new(50.0, 20.0));
    /// ```
    #[must_use]
    pub fn resolve(surface: &SurfaceBox, position: Option<Point>, center: bool) -> Self {
        match position {
            Some(position) if !center => Self::from_pointer(surface, position),
            _ => Self::centered(surface),
        }
    }

    /// Geometry of a ripple forced to the center of `surface`.
    #[must_use]
    pub fn centered(surface: &SurfaceBox) -> Self {
        let width = surface.rect.width();
        let height = surface.rect.height();
        let center = Point::new(round_half_up(width / 2.0), round_half_up(height / 2.0));

        let mut diameter = ((2.0 * width * width + height * height) / 3.0).sqrt();
        // Even integer diameters render with a visible seam on some mobile engines.
        if diameter % 2.0 == 0.0 {
            diameter += 1.0;
        }
        Self { center, diameter }
    }

    /// Geometry of a ripple growing from `position` (client coordinates).
    #[must_use]
    pub fn from_pointer(surface: &SurfaceBox, position: Point) -> Self {
        let origin = surface.rect.origin();
        let x = round_half_up(position.x - origin.x);
        let y = round_half_up(position.y - origin.y);

        let size_x = reach(surface.client_size.width, x);
        let size_y = reach(surface.client_size.height, y);
        Self {
            center: Point::new(x, y),
            diameter: (size_x * size_x + size_y * size_y).sqrt(),
        }
    }

    /// Radius of the fully grown ripple.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    /// The fully grown ripple as a circle.
    #[must_use]
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius())
    }

    /// Axis-aligned bounds of the fully grown ripple.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, Size::new(self.diameter, self.diameter))
    }
}

/// Span needed along one axis to reach the far edge from `offset`, plus a pixel of slack
/// on each side.
fn reach(extent: f64, offset: f64) -> f64 {
    (extent - offset).abs().max(offset) * 2.0 + 2.0
}

/// Rounds halves toward positive infinity, the way layout engines round client offsets.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}
