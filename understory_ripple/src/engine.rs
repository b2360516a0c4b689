// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The ripple lifecycle engine.
//!
//! [`RippleEngine`] turns a stream of `start`/`stop`/`pulsate` commands into a FIFO
//! collection of [`RippleInstance`]s. It resolves three timing concerns:
//!
//! - **Touch deferral**: a touch start only shows a ripple after
//!   [`RippleTiming::touch_delay`](crate::RippleTiming::touch_delay), so a touch that turns
//!   into a scroll (and is stopped by a `TouchMove`) never flashes. A `TouchEnd` inside the
//!   window force-fires the deferred ripple so quick taps still show feedback.
//! - **Emulated mouse events**: browsers follow a touch with a synthetic mouse-down; the first
//!   mouse-down after a touch start is ignored.
//! - **Callback ordering**: a callback passed with a command runs on the next
//!   [`advance`](RippleEngine::advance) turn, after the change it belongs to has been rendered,
//!   never synchronously inside the command.
//!
//! Stopping always retires the *oldest* active ripple, regardless of which interaction
//! started it. Retired ripples stay in [`RippleEngine::rendered`] until their exit animation
//! completes.
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_ripple::{
//!     InteractionKind, RippleConfig, RippleEngine, RippleEvent, RippleHost, StartOptions,
//!     SurfaceBox,
//! };
//!
//! struct Host;
//! impl RippleHost for Host {
//!     fn measure(&self) -> Option<SurfaceBox> {
//!         Some(SurfaceBox::from_rect(Rect::new(0.0, 0.0, 100.0, 40.0)))
//!     }
//! }
//!
//! let mut engine = RippleEngine::new(Host, RippleConfig::default());
//! let down = RippleEvent::mouse(InteractionKind::MouseDown, Point::new(20.0, 20.0));
//! engine.start(0, &down, StartOptions::default());
//! assert_eq!(engine.len(), 1);
//!
//! let up = RippleEvent::mouse(InteractionKind::MouseUp, Point::new(20.0, 20.0));
//! engine.stop(120, &up);
//! assert!(engine.is_empty());
//! // Still drawn while it fades out.
//! assert_eq!(engine.rendered().len(), 1);
//!
//! engine.advance(120 + 550);
//! assert!(engine.rendered().is_empty());
//! ```

use alloc::boxed::Box;
use core::fmt;

use smallvec::SmallVec;

use crate::config::RippleConfig;
use crate::event::{InteractionKind, RippleEvent, StartOptions};
use crate::geometry::{RippleGeometry, SurfaceBox};
use crate::host::RippleHost;
use crate::instance::{RippleId, RippleInstance};
use crate::timer::{TimerHandle, TimerQueue};

/// Continuation passed with a command; receives the engine and the current time.
pub type RippleCallback<H> = Box<dyn FnOnce(&mut RippleEngine<H>, u64)>;

/// A touch start whose ripple is waiting out the deferral window.
struct PendingCommit<H> {
    pulsate: bool,
    geometry: RippleGeometry,
    callback: Option<RippleCallback<H>>,
}

enum EngineTimer<H> {
    /// The touch deferral window elapsed.
    TouchCommit,
    /// Re-run a stop once a force-fired ripple is in the collection.
    Restop {
        event: RippleEvent,
        callback: Option<RippleCallback<H>>,
    },
    /// A leaving ripple finished its exit animation.
    ExitComplete(RippleId),
}

impl<H> fmt::Debug for EngineTimer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TouchCommit => f.write_str("TouchCommit"),
            Self::Restop { event, callback } => f
                .debug_struct("Restop")
                .field("event", event)
                .field("has_callback", &callback.is_some())
                .finish(),
            Self::ExitComplete(id) => f.debug_tuple("ExitComplete").field(id).finish(),
        }
    }
}

/// Ripple lifecycle state for one surface.
///
/// See the [module docs](self) for the behavior. All methods take the current host time;
/// the engine never reads a clock itself.
pub struct RippleEngine<H> {
    host: H,
    config: RippleConfig,
    /// Active and leaving ripples, ordered by id (creation order).
    instances: SmallVec<[RippleInstance; 4]>,
    next_id: u64,
    /// Callbacks whose change has been applied; delivered on the next turn.
    ready: SmallVec<[RippleCallback<H>; 2]>,
    /// Callback from a stop that found nothing to remove; waits for the next change.
    parked: Option<RippleCallback<H>>,
    ignoring_mouse_down: bool,
    pending_touch: Option<PendingCommit<H>>,
    /// Touch deferral or re-stop timer; at most one is tracked.
    deferred: Option<TimerHandle>,
    timers: TimerQueue<EngineTimer<H>>,
    torn_down: bool,
}

impl<H> fmt::Debug for RippleEngine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RippleEngine")
            .field("config", &self.config)
            .field("instances", &self.instances)
            .field("next_id", &self.next_id)
            .field("ready", &self.ready.len())
            .field("parked", &self.parked.is_some())
            .field("ignoring_mouse_down", &self.ignoring_mouse_down)
            .field("pending_touch", &self.pending_touch.is_some())
            .field("timers", &self.timers)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl<H: RippleHost> RippleEngine<H> {
    /// Creates an engine drawing onto `host`.
    pub fn new(host: H, config: RippleConfig) -> Self {
        Self {
            host,
            config,
            instances: SmallVec::new(),
            next_id: 0,
            ready: SmallVec::new(),
            parked: None,
            ignoring_mouse_down: false,
            pending_touch: None,
            deferred: None,
            timers: TimerQueue::new(),
            torn_down: false,
        }
    }

    /// Starts a ripple for `event`.
    pub fn start(&mut self, now: u64, event: &RippleEvent, options: StartOptions) {
        self.start_inner(now, event, options, None);
    }

    /// Starts a ripple and runs `callback` on the turn after it has been rendered.
    ///
    /// If the start is ignored (emulated mouse-down) or folded into an already deferred touch,
    /// the callback is dropped.
    pub fn start_then(
        &mut self,
        now: u64,
        event: &RippleEvent,
        options: StartOptions,
        callback: impl FnOnce(&mut Self, u64) + 'static,
    ) {
        self.start_inner(now, event, options, Some(Box::new(callback)));
    }

    /// Retires the oldest active ripple.
    pub fn stop(&mut self, now: u64, event: &RippleEvent) {
        self.stop_inner(now, event, None);
    }

    /// Retires the oldest active ripple and runs `callback` on the turn after the removal.
    ///
    /// When there is no active ripple the callback is parked until the next change to the
    /// collection. Only one callback can be parked; a second one displaces the first.
    pub fn stop_then(
        &mut self,
        now: u64,
        event: &RippleEvent,
        callback: impl FnOnce(&mut Self, u64) + 'static,
    ) {
        self.stop_inner(now, event, Some(Box::new(callback)));
    }

    /// Starts a looping, centered ripple, as used for keyboard focus.
    pub fn pulsate(&mut self, now: u64) {
        self.start_inner(now, &RippleEvent::synthetic(), StartOptions::PULSATE, None);
    }

    /// Like [`pulsate`](Self::pulsate), running `callback` once the ripple is rendered.
    pub fn pulsate_then(&mut self, now: u64, callback: impl FnOnce(&mut Self, u64) + 'static) {
        self.start_inner(
            now,
            &RippleEvent::synthetic(),
            StartOptions::PULSATE,
            Some(Box::new(callback)),
        );
    }

    /// Runs the next turn: delivers callbacks for applied changes, then fires every timer due
    /// at `now`, repeating until nothing is left to do.
    pub fn advance(&mut self, now: u64) {
        while !self.torn_down {
            if !self.ready.is_empty() {
                let callback = self.ready.remove(0);
                callback(self, now);
                continue;
            }
            match self.timers.pop_due(now) {
                Some((handle, timer)) => self.fire(handle, timer, now),
                None => break,
            }
        }
    }

    /// Cancels every timer and drops all pending work and ripples.
    ///
    /// Afterwards every command and [`advance`](Self::advance) is a no-op.
    pub fn teardown(&mut self) {
        self.timers.clear();
        self.deferred = None;
        self.pending_touch = None;
        self.ready.clear();
        self.parked = None;
        self.instances.clear();
        self.torn_down = true;
    }

    /// Active ripples, oldest first. These are the ones a `stop` can retire.
    pub fn ripples(&self) -> impl Iterator<Item = &RippleInstance> + '_ {
        self.instances.iter().filter(|r| r.is_visible())
    }

    /// Every ripple that should be drawn, including those still fading out.
    #[must_use]
    pub fn rendered(&self) -> &[RippleInstance] {
        &self.instances
    }

    /// Number of active ripples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ripples().count()
    }

    /// Returns `true` if no ripple is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ripples().next().is_none()
    }

    /// Returns `true` while a touch ripple waits out the deferral window.
    #[must_use]
    pub fn has_pending_touch(&self) -> bool {
        self.pending_touch.is_some()
    }

    /// Returns `true` if the next mouse-down will be ignored.
    #[must_use]
    pub fn is_ignoring_mouse_down(&self) -> bool {
        self.ignoring_mouse_down
    }

    /// Earliest time at which [`advance`](Self::advance) has timer work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Returns `true` once [`teardown`](Self::teardown) has run.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &RippleConfig {
        &self.config
    }

    /// The host surface.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host surface.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn start_inner(
        &mut self,
        now: u64,
        event: &RippleEvent,
        options: StartOptions,
        callback: Option<RippleCallback<H>>,
    ) {
        if self.torn_down {
            tracing::debug!(kind = ?event.kind, "ripple start after teardown ignored");
            return;
        }
        if event.kind == InteractionKind::MouseDown && self.ignoring_mouse_down {
            self.ignoring_mouse_down = false;
            tracing::trace!("ignoring emulated mouse-down after touch");
            return;
        }
        // Touch starts are deferred below; the same rule arms the emulated mouse-down guard.
        let touch = event.kind.is_touch();
        if touch {
            self.ignoring_mouse_down = true;
        }

        let surface = self.measure(event);
        let center = options.center.unwrap_or(self.config.center);
        let geometry = RippleGeometry::resolve(&surface, event.position(), center);

        if !touch {
            self.commit(now, options.pulsate, geometry, callback);
            return;
        }
        // A second finger while one touch is deferred does not re-arm the timer.
        if self.pending_touch.is_none() {
            self.pending_touch = Some(PendingCommit {
                pulsate: options.pulsate,
                geometry,
                callback,
            });
            let due = now.saturating_add(self.config.timing.touch_delay);
            self.deferred = Some(self.timers.schedule(due, EngineTimer::TouchCommit));
            tracing::trace!(due, "touch ripple deferred");
        }
    }

    fn stop_inner(&mut self, now: u64, event: &RippleEvent, callback: Option<RippleCallback<H>>) {
        if self.torn_down {
            tracing::debug!(kind = ?event.kind, "ripple stop after teardown ignored");
            return;
        }
        // A cancelled re-stop still owes its callback; it rides along with this stop.
        let carried = match self.deferred.take().and_then(|h| self.timers.cancel(h)) {
            Some(EngineTimer::Restop { callback, .. }) => callback,
            _ => None,
        };

        if event.kind == InteractionKind::TouchEnd
            && let Some(pending) = self.pending_touch.take()
        {
            // A tap shorter than the deferral window: show it, then stop it on the next
            // turn once it is part of the collection.
            tracing::trace!("force-firing deferred touch ripple");
            self.ready.extend(carried);
            self.commit(now, pending.pulsate, pending.geometry, pending.callback);
            let restop = EngineTimer::Restop {
                event: event.clone(),
                callback,
            };
            self.deferred = Some(self.timers.schedule(now, restop));
            return;
        }
        self.pending_touch = None;

        let Some(oldest) = self.instances.iter_mut().find(|r| r.is_visible()) else {
            self.park(carried);
            self.park(callback);
            return;
        };
        oldest.leave(now);
        let id = oldest.id;
        let due = now.saturating_add(self.config.timing.exit);
        self.timers.schedule(due, EngineTimer::ExitComplete(id));
        self.ready.extend(carried);
        self.changed(callback);
    }

    fn commit(
        &mut self,
        now: u64,
        pulsate: bool,
        geometry: RippleGeometry,
        callback: Option<RippleCallback<H>>,
    ) {
        let id = RippleId(self.next_id);
        self.next_id += 1;
        let mut ripple = RippleInstance::new(id, geometry, pulsate);
        ripple.mount(now);
        tracing::trace!(id = id.0, pulsate, "ripple committed");
        self.instances.push(ripple);
        self.changed(callback);
    }

    /// Renders the new collection and queues the callbacks that were waiting on it.
    fn changed(&mut self, callback: Option<RippleCallback<H>>) {
        self.host.render(&self.instances);
        self.ready.extend(callback);
        self.ready.extend(self.parked.take());
    }

    fn park(&mut self, callback: Option<RippleCallback<H>>) {
        let Some(callback) = callback else {
            return;
        };
        if self.parked.replace(callback).is_some() {
            #[cfg(debug_assertions)]
            tracing::warn!("ripple stop callback displaced by a later stop; it will never run");
        }
    }

    fn fire(&mut self, handle: TimerHandle, timer: EngineTimer<H>, now: u64) {
        match timer {
            EngineTimer::TouchCommit => {
                if self.deferred == Some(handle) {
                    self.deferred = None;
                }
                if let Some(pending) = self.pending_touch.take() {
                    self.commit(now, pending.pulsate, pending.geometry, pending.callback);
                }
            }
            EngineTimer::Restop { event, callback } => {
                if self.deferred == Some(handle) {
                    self.deferred = None;
                }
                self.stop_inner(now, &event, callback);
            }
            EngineTimer::ExitComplete(id) => {
                let Some(idx) = self.instances.iter().position(|r| r.id == id) else {
                    return;
                };
                debug_assert!(!self.instances[idx].is_visible(), "exiting ripple is active");
                self.instances.remove(idx);
                self.host.ripple_exited(id);
                self.host.render(&self.instances);
            }
        }
    }

    fn measure(&self, event: &RippleEvent) -> SurfaceBox {
        if event.use_fake_element {
            return SurfaceBox::ZERO;
        }
        match self.host.measure() {
            Some(surface) => surface,
            None => {
                #[cfg(debug_assertions)]
                tracing::warn!(
                    kind = ?event.kind,
                    "ripple started on a host with no mounted surface; using an empty box"
                );
                SurfaceBox::ZERO
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DELAY_RIPPLE, DURATION};
    use crate::instance::RipplePhase;
    use crate::testing::{Recorder, ids, log, shared_log};
    use alloc::vec;
    use alloc::vec::Vec;
    use kurbo::{Point, Rect};

    fn engine() -> RippleEngine<Recorder> {
        let surface = SurfaceBox::from_rect(Rect::new(10.0, 10.0, 110.0, 60.0));
        RippleEngine::new(Recorder::new(Some(surface)), RippleConfig::default())
    }

    fn mouse(kind: InteractionKind) -> RippleEvent {
        RippleEvent::mouse(kind, Point::new(60.0, 30.0))
    }

    fn touch(kind: InteractionKind) -> RippleEvent {
        RippleEvent::touch(kind, [Point::new(60.0, 30.0)])
    }

    fn active_ids(engine: &RippleEngine<Recorder>) -> Vec<u64> {
        engine.ripples().map(|r| r.id.0).collect()
    }

    #[test]
    fn starts_accumulate_in_call_order() {
        let mut e = engine();
        for t in 0..3 {
            e.start(t, &mouse(InteractionKind::MouseDown), StartOptions::default());
        }
        assert_eq!(active_ids(&e), vec![0, 1, 2]);
        assert!(e.ripples().all(|r| r.phase() == RipplePhase::Visible));
    }

    #[test]
    fn stop_retires_oldest_first() {
        let mut e = engine();
        for t in 0..3 {
            e.start(t, &mouse(InteractionKind::MouseDown), StartOptions::default());
        }
        e.stop(10, &mouse(InteractionKind::MouseUp));
        assert_eq!(active_ids(&e), vec![1, 2]);
        e.stop(11, &mouse(InteractionKind::MouseUp));
        assert_eq!(active_ids(&e), vec![2]);
        // Retired ripples stay rendered until their exit completes.
        assert_eq!(e.rendered().len(), 3);
        assert_eq!(e.rendered()[0].phase(), RipplePhase::Leaving);
    }

    #[test]
    fn exit_completion_unmounts_once() {
        let mut e = engine();
        e.start(0, &mouse(InteractionKind::MouseDown), StartOptions::default());
        e.stop(100, &mouse(InteractionKind::MouseUp));
        assert_eq!(e.next_deadline(), Some(100 + DURATION));

        e.advance(100 + DURATION - 1);
        assert_eq!(e.rendered().len(), 1);
        e.advance(100 + DURATION);
        assert!(e.rendered().is_empty());
        assert_eq!(e.host().exited, vec![RippleId(0)]);
        e.advance(10_000);
        assert_eq!(e.host().exited.len(), 1);
    }

    #[test]
    fn stop_on_empty_engine_is_noop() {
        let mut e = engine();
        e.stop(0, &mouse(InteractionKind::MouseUp));
        assert!(e.is_empty());
        assert!(e.host().renders.is_empty());
        assert_eq!(e.next_deadline(), None);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut e = engine();
        e.start(0, &mouse(InteractionKind::MouseDown), StartOptions::default());
        e.stop(1, &mouse(InteractionKind::MouseUp));
        e.advance(1 + DURATION);
        e.start(2000, &mouse(InteractionKind::MouseDown), StartOptions::default());
        assert_eq!(active_ids(&e), vec![1]);
    }

    #[test]
    fn pointer_geometry_is_surface_local() {
        let mut e = engine();
        e.start(0, &mouse(InteractionKind::MouseDown), StartOptions::default());
        let r = e.ripples().next().unwrap();
        assert_eq!(r.geometry.center, Point::new(50.0, 20.0));
        let expected = (102.0_f64 * 102.0 + 62.0 * 62.0).sqrt();
        assert!((r.geometry.diameter - expected).abs() < 1e-9);
        assert!(!r.pulsate);
    }

    #[test]
    fn center_option_and_config_default() {
        let mut e = engine();
        let opts = StartOptions::default().centered(true);
        e.start(0, &mouse(InteractionKind::MouseDown), opts);
        assert_eq!(e.ripples().next().unwrap().geometry.center, Point::new(50.0, 25.0));

        let surface = SurfaceBox::from_rect(Rect::new(10.0, 10.0, 110.0, 60.0));
        let config = RippleConfig::default().with_center(true);
        let mut centered = RippleEngine::new(Recorder::new(Some(surface)), config);
        centered.start(0, &mouse(InteractionKind::MouseDown), StartOptions::default());
        assert_eq!(
            centered.ripples().next().unwrap().geometry.center,
            Point::new(50.0, 25.0)
        );
        // A per-call override wins over the configured default.
        centered.start(1, &mouse(InteractionKind::MouseDown), opts.centered(false));
        assert_eq!(
            centered.ripples().nth(1).unwrap().geometry.center,
            Point::new(50.0, 20.0)
        );
    }

    #[test]
    fn surface_is_measured_on_every_start() {
        let mut e = engine();
        e.start(0, &mouse(InteractionKind::MouseDown), StartOptions::default());
        e.host_mut().surface = Some(SurfaceBox::from_rect(Rect::new(40.0, 20.0, 140.0, 70.0)));
        e.start(1, &mouse(InteractionKind::MouseDown), StartOptions::default());
        let centers: Vec<Point> = e.ripples().map(|r| r.geometry.center).collect();
        assert_eq!(centers, vec![Point::new(50.0, 20.0), Point::new(20.0, 10.0)]);
        assert_eq!(e.host().measured.get(), 2);
    }

    #[test]
    fn pulsate_on_unmounted_surface_is_centered_at_origin() {
        let mut e = RippleEngine::new(Recorder::new(None), RippleConfig::default());
        e.pulsate(0);
        assert_eq!(e.len(), 1);
        let r = e.ripples().next().unwrap();
        assert!(r.pulsate);
        assert_eq!(r.geometry.center, Point::ZERO);
    }

    #[test]
    fn fake_element_skips_measurement() {
        let mut e = engine();
        let ev = mouse(InteractionKind::MouseDown).with_fake_element();
        e.start(0, &ev, StartOptions::default());
        assert_eq!(e.host().measured.get(), 0);
        let r = e.ripples().next().unwrap();
        // Zero client size: the ripple only needs to reach its own offset.
        assert_eq!(r.geometry.center, Point::new(60.0, 30.0));
    }

    #[test]
    fn touch_start_is_deferred() {
        let mut e = engine();
        e.start(0, &touch(InteractionKind::TouchStart), StartOptions::default());
        assert!(e.is_empty());
        assert!(e.has_pending_touch());
        assert_eq!(e.next_deadline(), Some(DELAY_RIPPLE));

        e.advance(DELAY_RIPPLE - 1);
        assert!(e.is_empty());
        e.advance(DELAY_RIPPLE);
        assert_eq!(e.len(), 1);
        assert!(!e.has_pending_touch());
        assert_eq!(e.ripples().next().unwrap().mounted_at(), DELAY_RIPPLE);
    }

    #[test]
    fn touch_move_cancels_deferred_ripple() {
        let mut e = engine();
        e.start(0, &touch(InteractionKind::TouchStart), StartOptions::default());
        e.stop(30, &touch(InteractionKind::TouchMove));
        assert!(!e.has_pending_touch());
        e.advance(1_000);
        assert!(e.is_empty());
        assert!(e.rendered().is_empty());
    }

    #[test]
    fn quick_tap_force_fires_then_stops() {
        let mut e = engine();
        let calls = shared_log();
        let c = calls.clone();
        e.start(0, &touch(InteractionKind::TouchStart), StartOptions::default());
        e.stop_then(20, &touch(InteractionKind::TouchEnd), move |_, _| {
            log(&c, "stopped");
        });

        // Committed immediately so the tap is visible...
        assert_eq!(e.len(), 1);
        assert!(calls.borrow().is_empty());

        // ...and retired on the next turn.
        e.advance(20);
        assert!(e.is_empty());
        assert_eq!(e.rendered().len(), 1);
        assert_eq!(*calls.borrow(), vec!["stopped"]);

        e.advance(20 + DURATION);
        assert!(e.rendered().is_empty());
        assert_eq!(*calls.borrow(), vec!["stopped"]);
        assert_eq!(ids(&e.host().renders), vec![vec![0], vec![0], vec![]]);
    }

    #[test]
    fn second_touch_does_not_rearm_deferral() {
        let mut e = engine();
        e.start(0, &touch(InteractionKind::TouchStart), StartOptions::default());
        e.start(50, &touch(InteractionKind::TouchStart), StartOptions::default());
        assert_eq!(e.next_deadline(), Some(DELAY_RIPPLE));
        e.advance(DELAY_RIPPLE);
        assert_eq!(e.len(), 1);
        e.advance(1_000);
        assert_eq!(e.len(), 1);
    }

    #[test]
    fn emulated_mouse_down_after_touch_is_ignored_once() {
        let mut e = engine();
        e.start(0, &touch(InteractionKind::TouchStart), StartOptions::default());
        assert!(e.is_ignoring_mouse_down());
        e.advance(DELAY_RIPPLE);

        e.start(100, &mouse(InteractionKind::MouseDown), StartOptions::default());
        assert_eq!(e.len(), 1);
        assert!(!e.is_ignoring_mouse_down());

        e.start(200, &mouse(InteractionKind::MouseDown), StartOptions::default());
        assert_eq!(e.len(), 2);
    }

    #[test]
    fn callbacks_run_after_render_not_inside_command() {
        let mut e = engine();
        let calls = shared_log();
        let c = calls.clone();
        e.start_then(
            0,
            &mouse(InteractionKind::MouseDown),
            StartOptions::default(),
            move |engine, _| {
                assert_eq!(engine.len(), 1, "callback sees the new ripple");
                log(&c, "started");
            },
        );
        assert!(calls.borrow().is_empty());
        assert_eq!(e.host().renders.len(), 1);

        e.advance(0);
        assert_eq!(*calls.borrow(), vec!["started"]);
        e.advance(1);
        assert_eq!(*calls.borrow(), vec!["started"]);
    }

    #[test]
    fn callbacks_from_back_to_back_commands_each_fire_once() {
        let mut e = engine();
        let calls = shared_log();
        let (a, b) = (calls.clone(), calls.clone());
        e.start_then(
            0,
            &mouse(InteractionKind::MouseDown),
            StartOptions::default(),
            move |_, _| log(&a, "start"),
        );
        e.stop_then(0, &mouse(InteractionKind::MouseUp), move |_, _| {
            log(&b, "stop");
        });
        e.advance(0);
        assert_eq!(*calls.borrow(), vec!["start", "stop"]);
    }

    #[test]
    fn callback_can_issue_follow_up_commands() {
        let mut e = engine();
        e.pulsate(0);
        e.stop_then(10, &RippleEvent::key(InteractionKind::KeyDown), |engine, now| {
            engine.start(now, &RippleEvent::key(InteractionKind::KeyDown), StartOptions::default());
        });
        assert!(e.is_empty());
        e.advance(10);
        assert_eq!(e.len(), 1);
        let r = e.ripples().next().unwrap();
        assert!(!r.pulsate);
        assert_eq!(r.id, RippleId(1));
    }

    #[test]
    fn stop_without_ripples_parks_callback_until_next_change() {
        let mut e = engine();
        let calls = shared_log();
        let c = calls.clone();
        e.stop_then(0, &mouse(InteractionKind::MouseUp), move |_, _| {
            log(&c, "parked");
        });
        e.advance(100);
        assert!(calls.borrow().is_empty());

        e.start(200, &mouse(InteractionKind::MouseDown), StartOptions::default());
        e.advance(200);
        assert_eq!(*calls.borrow(), vec!["parked"]);
    }

    #[test]
    fn parked_callback_is_displaced_by_later_stop() {
        let mut e = engine();
        let calls = shared_log();
        let (a, b) = (calls.clone(), calls.clone());
        e.stop_then(0, &mouse(InteractionKind::MouseUp), move |_, _| {
            log(&a, "first");
        });
        e.stop_then(1, &mouse(InteractionKind::MouseUp), move |_, _| {
            log(&b, "second");
        });
        e.start(2, &mouse(InteractionKind::MouseDown), StartOptions::default());
        e.advance(2);
        assert_eq!(*calls.borrow(), vec!["second"]);
    }

    #[test]
    fn teardown_cancels_everything() {
        let mut e = engine();
        let calls = shared_log();
        let c = calls.clone();
        e.start_then(
            0,
            &mouse(InteractionKind::MouseDown),
            StartOptions::default(),
            move |_, _| log(&c, "late"),
        );
        e.start(1, &touch(InteractionKind::TouchStart), StartOptions::default());
        e.stop(2, &mouse(InteractionKind::MouseUp));
        let renders = e.host().renders.len();

        e.teardown();
        assert!(e.is_torn_down());
        assert_eq!(e.next_deadline(), None);
        e.advance(10_000);
        e.start(10_001, &mouse(InteractionKind::MouseDown), StartOptions::default());
        e.pulsate(10_002);
        e.stop(10_003, &mouse(InteractionKind::MouseUp));

        assert!(calls.borrow().is_empty());
        assert!(e.rendered().is_empty());
        assert!(e.host().exited.is_empty());
        assert_eq!(e.host().renders.len(), renders);
    }

    #[test]
    fn cancelled_restop_still_delivers_tap_callback() {
        let mut e = engine();
        let calls = shared_log();
        let (a, b) = (calls.clone(), calls.clone());
        e.start(0, &touch(InteractionKind::TouchStart), StartOptions::default());
        e.stop_then(20, &touch(InteractionKind::TouchEnd), move |_, _| {
            log(&a, "tap-stop");
        });
        e.stop_then(20, &mouse(InteractionKind::MouseLeave), move |_, _| {
            log(&b, "leave-stop");
        });
        e.advance(10_000);
        assert_eq!(*calls.borrow(), vec!["tap-stop", "leave-stop"]);
        assert!(e.is_empty());
        assert!(e.rendered().is_empty());
    }

    #[test]
    fn every_touch_kind_defers_and_guards_mouse_down() {
        for kind in [
            InteractionKind::TouchStart,
            InteractionKind::TouchMove,
            InteractionKind::TouchEnd,
        ] {
            let mut e = engine();
            e.start(0, &touch(kind), StartOptions::default());
            assert!(e.has_pending_touch(), "{kind:?} should defer");
            assert!(e.is_ignoring_mouse_down(), "{kind:?} should arm the guard");
        }
        let mut e = engine();
        e.start(0, &mouse(InteractionKind::MouseDown), StartOptions::default());
        assert!(!e.has_pending_touch());
        assert!(!e.is_ignoring_mouse_down());
    }

    #[test]
    fn restop_is_cancelled_by_a_later_stop() {
        let mut e = engine();
        e.start(0, &mouse(InteractionKind::MouseDown), StartOptions::default());
        e.start(1, &touch(InteractionKind::TouchStart), StartOptions::default());
        e.stop(2, &touch(InteractionKind::TouchEnd));
        assert_eq!(active_ids(&e), vec![0, 1]);

        // A stop before the next turn cancels the pending re-stop and retires the oldest.
        e.stop(2, &mouse(InteractionKind::MouseLeave));
        e.advance(2);
        assert_eq!(active_ids(&e), vec![1]);
    }
}
