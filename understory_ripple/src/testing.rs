// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording host shared by the unit tests.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::geometry::SurfaceBox;
use crate::host::RippleHost;
use crate::instance::{RippleId, RippleInstance};

pub(crate) struct Recorder {
    pub(crate) surface: Option<SurfaceBox>,
    pub(crate) measured: Cell<usize>,
    pub(crate) renders: Vec<Vec<RippleId>>,
    pub(crate) exited: Vec<RippleId>,
}

impl Recorder {
    pub(crate) fn new(surface: Option<SurfaceBox>) -> Self {
        Self {
            surface,
            measured: Cell::new(0),
            renders: Vec::new(),
            exited: Vec::new(),
        }
    }
}

impl RippleHost for Recorder {
    fn measure(&self) -> Option<SurfaceBox> {
        self.measured.set(self.measured.get() + 1);
        self.surface
    }

    fn render(&mut self, ripples: &[RippleInstance]) {
        self.renders.push(ripples.iter().map(|r| r.id).collect());
    }

    fn ripple_exited(&mut self, id: RippleId) {
        self.exited.push(id);
    }
}

pub(crate) type SharedLog = Rc<RefCell<Vec<&'static str>>>;

pub(crate) fn shared_log() -> SharedLog {
    Rc::new(RefCell::new(Vec::new()))
}

pub(crate) fn log(log: &SharedLog, entry: &'static str) {
    log.borrow_mut().push(entry);
}

pub(crate) fn ids(renders: &[Vec<RippleId>]) -> Vec<Vec<u64>> {
    renders
        .iter()
        .map(|frame| frame.iter().map(|id| id.0).collect())
        .collect()
}
