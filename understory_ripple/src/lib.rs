// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_ripple --heading-base-level=0

//! Understory Ripple: a deterministic, `no_std` ripple feedback lifecycle.
//!
//! A ripple is the transient circle that grows from the point where a surface was pressed
//! (or pulses at its center while it has keyboard focus). This crate decides which ripples
//! exist at any moment, where they sit, and when they enter and leave. Drawing them is left
//! to the host.
//!
//! ## Overview
//!
//! - [`RippleEngine`]: the lifecycle core. It accepts `start`, `stop`, and `pulsate`
//!   commands, defers touch ripples to tell taps from scrolls, ignores the emulated
//!   mouse-down that follows a touch, and retires ripples first-in, first-out.
//! - [`RippleInstance`]: one ripple with a stable [`RippleId`], immutable
//!   [`RippleGeometry`], and a [`RipplePhase`]. Sample [`RippleInstance::frame`] to animate it.
//! - [`RippleHost`]: what the engine needs from its surroundings: a fresh [`SurfaceBox`]
//!   measurement per start and a push-style render sink.
//! - [`control::RippleControl`]: optional button wiring from native events to commands.
//! - [`timer::TimerQueue`]: the host-clocked timers behind deferral and exit animations.
//!
//! ## Time
//!
//! The engine never reads a clock. Every command takes the current time in host units
//! (milliseconds in practice), and the host calls [`RippleEngine::advance`] on each frame or
//! when [`RippleEngine::next_deadline`] passes. Callbacks passed with commands run inside
//! `advance`, never inside the command that queued them.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_ripple::{
//!     InteractionKind, RippleConfig, RippleEngine, RippleEvent, RippleHost, SurfaceBox,
//!     StartOptions,
//! };
//!
//! struct Button;
//! impl RippleHost for Button {
//!     fn measure(&self) -> Option<SurfaceBox> {
//!         Some(SurfaceBox::from_rect(Rect::new(0.0, 0.0, 120.0, 36.0)))
//!     }
//! }
//!
//! let mut engine = RippleEngine::new(Button, RippleConfig::default());
//!
//! // A quick tap: the ripple is deferred, then force-fired by the touch end.
//! let at = [Point::new(30.0, 18.0)];
//! engine.start(0, &RippleEvent::touch(InteractionKind::TouchStart, at), StartOptions::default());
//! assert!(engine.is_empty());
//! engine.stop(40, &RippleEvent::touch(InteractionKind::TouchEnd, at));
//! assert_eq!(engine.len(), 1);
//!
//! // The next turn retires it; it keeps rendering until the exit animation ends.
//! engine.advance(40);
//! assert!(engine.is_empty());
//! assert_eq!(engine.rendered().len(), 1);
//! engine.advance(40 + understory_ripple::DURATION);
//! assert!(engine.rendered().is_empty());
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo` and `tracing`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! Diagnostics are emitted through [`tracing`]; integrator warnings (such as starting a
//! ripple on a host without a mounted surface) only in builds with debug assertions.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod control;
pub mod timer;

mod config;
mod engine;
mod event;
mod geometry;
mod host;
mod instance;

#[cfg(test)]
mod testing;

pub use config::{
    DELAY_RIPPLE, DURATION, PULSATE_DELAY, PULSATE_DURATION, RippleConfig, RippleTiming,
};
pub use engine::{RippleCallback, RippleEngine};
pub use event::{InteractionKind, RippleEvent, StartOptions};
pub use geometry::{RippleGeometry, SurfaceBox};
pub use host::RippleHost;
pub use instance::{RippleFrame, RippleId, RippleInstance, RipplePhase};
