// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wiring native interaction events of a button-like control to ripple commands.
//!
//! [`RippleControl`] owns a [`RippleEngine`] and applies the usual button rules:
//! pointer presses start ripples and releases, leaves, drags, and scrolls stop them;
//! gaining keyboard-visible focus pulsates; holding Space swaps the pulse for a pressed
//! ripple and releasing it swaps back.
//!
//! Whether focus is "visible" (keyboard-driven) is decided by the host and passed in as a
//! boolean; this module does not track input modality itself.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_ripple::control::{Key, RippleControl, RippleFlags};
//! use understory_ripple::{InteractionKind, RippleEvent, RippleHost, SurfaceBox};
//!
//! struct Host;
//! impl RippleHost for Host {
//!     fn measure(&self) -> Option<SurfaceBox> {
//!         Some(SurfaceBox::from_rect(Rect::new(0.0, 0.0, 64.0, 32.0)))
//!     }
//! }
//!
//! let mut button = RippleControl::new(Host, RippleFlags::FOCUS_RIPPLE);
//! button.handle_focus(0, true);
//! assert!(button.engine().ripples().next().unwrap().pulsate);
//!
//! button.handle_key_down(100, Key::Space);
//! button.advance(100);
//! assert!(!button.engine().ripples().next().unwrap().pulsate);
//! ```

use crate::config::RippleConfig;
use crate::engine::RippleEngine;
use crate::event::{InteractionKind, RippleEvent, StartOptions};
use crate::host::RippleHost;

bitflags::bitflags! {
    /// Per-control ripple behavior switches.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RippleFlags: u8 {
        /// The control is disabled: no ripples, and focus is never visible.
        const DISABLED             = 0b0000_0001;
        /// No ripples at all.
        const DISABLE_RIPPLE       = 0b0000_0010;
        /// No pointer- or touch-driven ripples; focus ripples still work.
        const DISABLE_TOUCH_RIPPLE = 0b0000_0100;
        /// Pulsate while focus is keyboard-visible.
        const FOCUS_RIPPLE         = 0b0000_1000;
        /// Center every ripple on the control.
        const CENTER_RIPPLE        = 0b0001_0000;
    }
}

/// Keys the control reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// The space bar, which presses a focused button.
    Space,
    /// Any other key.
    Other,
}

/// A button-like control driving a [`RippleEngine`].
#[derive(Debug)]
pub struct RippleControl<H> {
    engine: RippleEngine<H>,
    flags: RippleFlags,
    focus_visible: bool,
    space_down: bool,
}

impl<H: RippleHost + 'static> RippleControl<H> {
    /// Creates a control with default timings.
    pub fn new(host: H, flags: RippleFlags) -> Self {
        Self::with_config(host, flags, RippleConfig::default())
    }

    /// Creates a control with custom timings; centering follows [`RippleFlags::CENTER_RIPPLE`].
    pub fn with_config(host: H, flags: RippleFlags, config: RippleConfig) -> Self {
        let config = config.with_center(flags.contains(RippleFlags::CENTER_RIPPLE));
        Self {
            engine: RippleEngine::new(host, config),
            flags,
            focus_visible: false,
            space_down: false,
        }
    }

    /// Current flags.
    #[must_use]
    pub fn flags(&self) -> RippleFlags {
        self.flags
    }

    /// Updates the flags. Disabling the control drops keyboard-visible focus.
    ///
    /// Centering is fixed when the control is created.
    pub fn set_flags(&mut self, flags: RippleFlags) {
        self.flags = flags;
        if flags.contains(RippleFlags::DISABLED) {
            self.focus_visible = false;
        }
    }

    /// Returns `true` while focus is keyboard-visible.
    #[must_use]
    pub fn is_focus_visible(&self) -> bool {
        self.focus_visible
    }

    /// Routes a pointer or touch event. Returns `true` if it issued a ripple command.
    pub fn handle_pointer(&mut self, now: u64, event: &RippleEvent) -> bool {
        if !self.ripples_enabled() || self.flags.contains(RippleFlags::DISABLE_TOUCH_RIPPLE) {
            return false;
        }
        match event.kind {
            InteractionKind::MouseDown | InteractionKind::TouchStart => {
                self.engine.start(now, event, StartOptions::default());
                true
            }
            InteractionKind::MouseUp
            | InteractionKind::MouseLeave
            | InteractionKind::ContextMenu
            | InteractionKind::DragLeave
            | InteractionKind::TouchEnd
            | InteractionKind::TouchMove => {
                self.engine.stop(now, event);
                true
            }
            _ => false,
        }
    }

    /// The control gained focus; `focus_visible` is the host's keyboard-modality verdict.
    pub fn handle_focus(&mut self, now: u64, focus_visible: bool) {
        if !focus_visible || self.focus_visible || self.flags.contains(RippleFlags::DISABLED) {
            return;
        }
        self.focus_visible = true;
        if self.flags.contains(RippleFlags::FOCUS_RIPPLE) && self.ripples_enabled() {
            self.engine.pulsate(now);
        }
    }

    /// The control lost focus.
    pub fn handle_blur(&mut self, now: u64) {
        if self.ripples_enabled() {
            self.engine.stop(now, &RippleEvent::key(InteractionKind::Blur));
        }
        self.focus_visible = false;
        self.space_down = false;
    }

    /// A key was pressed. Space on a keyboard-focused control shows a pressed ripple.
    pub fn handle_key_down(&mut self, now: u64, key: Key) {
        if !self.space_ripple_applies(key) || self.space_down {
            return;
        }
        self.space_down = true;
        let event = RippleEvent::key(InteractionKind::KeyDown);
        let press = event.clone();
        self.engine.stop_then(now, &event, move |engine, now| {
            engine.start(now, &press, StartOptions::default());
        });
    }

    /// A key was released. Releasing Space returns to the focus pulse.
    pub fn handle_key_up(&mut self, now: u64, key: Key, default_prevented: bool) {
        if default_prevented || !self.space_ripple_applies(key) {
            return;
        }
        self.space_down = false;
        let event = RippleEvent::key(InteractionKind::KeyUp);
        self.engine.stop_then(now, &event, |engine, now| engine.pulsate(now));
    }

    /// Runs the engine's next turn. See [`RippleEngine::advance`].
    pub fn advance(&mut self, now: u64) {
        self.engine.advance(now);
    }

    /// Tears the engine down; the control is inert afterwards.
    pub fn teardown(&mut self) {
        self.engine.teardown();
        self.focus_visible = false;
        self.space_down = false;
    }

    /// The underlying engine.
    #[must_use]
    pub fn engine(&self) -> &RippleEngine<H> {
        &self.engine
    }

    /// Mutable access to the underlying engine, for imperative `start`/`stop`/`pulsate`.
    pub fn engine_mut(&mut self) -> &mut RippleEngine<H> {
        &mut self.engine
    }

    fn ripples_enabled(&self) -> bool {
        !self
            .flags
            .intersects(RippleFlags::DISABLED | RippleFlags::DISABLE_RIPPLE)
    }

    fn space_ripple_applies(&self, key: Key) -> bool {
        key == Key::Space
            && self.focus_visible
            && self.flags.contains(RippleFlags::FOCUS_RIPPLE)
            && self.ripples_enabled()
    }
}
