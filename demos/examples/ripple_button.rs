// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A ripple button driven through a scripted interaction.
//!
//! This example shows how to:
//! - implement `RippleHost` for a surface that can move between interactions,
//! - feed pointer, touch, focus, and keyboard events through `RippleControl`,
//! - drive the engine's clock with `advance` and sample ripple frames for drawing.
//!
//! Run:
//! - `cargo run -p understory_demos --example ripple_button`

use kurbo::{Point, Rect};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use understory_ripple::control::{Key, RippleControl, RippleFlags};
use understory_ripple::{
    InteractionKind, RippleEvent, RippleHost, RippleId, RippleInstance, SurfaceBox,
};

/// A button laid out somewhere in a window; logs what it would draw.
struct Button {
    bounds: Rect,
    drawn: usize,
}

impl RippleHost for Button {
    fn measure(&self) -> Option<SurfaceBox> {
        Some(SurfaceBox::from_rect(self.bounds))
    }

    fn render(&mut self, ripples: &[RippleInstance]) {
        self.drawn = ripples.len();
        let ids: Vec<u64> = ripples.iter().map(|r| r.id.0).collect();
        info!(?ids, "render");
    }

    fn ripple_exited(&mut self, id: RippleId) {
        info!(id = id.0, "unmount ripple node");
    }
}

enum Step {
    Pointer(RippleEvent),
    Focus,
    Blur,
    KeyDown,
    KeyUp,
    Idle,
}

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter("understory_ripple=trace,ripple_button=info")
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("install subscriber");

    let host = Button {
        bounds: Rect::new(40.0, 100.0, 200.0, 136.0),
        drawn: 0,
    };
    let mut button = RippleControl::new(host, RippleFlags::FOCUS_RIPPLE);

    let press_at = Point::new(60.0, 110.0);
    let touch_at = [Point::new(180.0, 120.0)];
    let script = [
        (0, Step::Pointer(RippleEvent::mouse(InteractionKind::MouseDown, press_at))),
        (150, Step::Pointer(RippleEvent::mouse(InteractionKind::MouseUp, press_at))),
        (800, Step::Pointer(RippleEvent::touch(InteractionKind::TouchStart, touch_at))),
        (830, Step::Pointer(RippleEvent::touch(InteractionKind::TouchEnd, touch_at))),
        // The browser's emulated mouse-down after the tap is ignored.
        (840, Step::Pointer(RippleEvent::mouse(InteractionKind::MouseDown, touch_at[0]))),
        (1500, Step::Focus),
        (2000, Step::KeyDown),
        (2100, Step::KeyUp),
        (3000, Step::Blur),
        (4000, Step::Idle),
    ];

    let mut now = 0;
    for (at, step) in script {
        // Advance frame by frame so timers fire close to their deadlines.
        while now < at {
            now = (now + 16).min(at);
            button.advance(now);
        }
        match step {
            Step::Pointer(event) => {
                button.handle_pointer(now, &event);
            }
            Step::Focus => button.handle_focus(now, true),
            Step::Blur => button.handle_blur(now),
            Step::KeyDown => button.handle_key_down(now, Key::Space),
            Step::KeyUp => button.handle_key_up(now, Key::Space, false),
            Step::Idle => {}
        }
        button.advance(now);

        let engine = button.engine();
        let timing = engine.config().timing;
        for ripple in engine.rendered() {
            let frame = ripple.frame(now, &timing);
            info!(
                t = now,
                id = ripple.id.0,
                phase = ?ripple.phase(),
                center = ?ripple.geometry.center,
                diameter = ripple.geometry.diameter,
                scale = frame.scale,
                opacity = frame.opacity,
                pulse = frame.pulse_scale,
                "frame"
            );
        }
    }

    info!(drawn = button.engine().host().drawn, "done");
    button.teardown();
}
