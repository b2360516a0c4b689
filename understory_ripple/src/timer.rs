// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A host-clocked, single-threaded timer queue.
//!
//! Nothing here reads a clock. The host passes the current time into
//! [`TimerQueue::schedule`] and [`TimerQueue::pop_due`], which keeps behavior
//! deterministic and trivially testable.
//!
//! ```
//! use understory_ripple::timer::TimerQueue;
//!
//! let mut q: TimerQueue<&str> = TimerQueue::new();
//! let a = q.schedule(80, "touch");
//! q.schedule(0, "restop");
//! assert_eq!(q.next_deadline(), Some(0));
//! assert_eq!(q.pop_due(10).map(|(_, p)| p), Some("restop"));
//! assert_eq!(q.cancel(a), Some("touch"));
//! assert!(q.is_empty());
//! ```

use smallvec::SmallVec;

/// Handle identifying a scheduled timer; never reused within one queue.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

#[derive(Clone, Debug)]
struct Entry<T> {
    handle: TimerHandle,
    due: u64,
    payload: T,
}

/// Pending one-shot timers, fired in deadline order.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    next_handle: u64,
    entries: SmallVec<[Entry<T>; 4]>,
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_handle: 0,
            entries: SmallVec::new(),
        }
    }

    /// Schedules `payload` to fire once `now >= due`.
    pub fn schedule(&mut self, due: u64, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Entry {
            handle,
            due,
            payload,
        });
        handle
    }

    /// Cancels a timer, returning its payload if it had not fired yet.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let idx = self.entries.iter().position(|e| e.handle == handle)?;
        Some(self.entries.remove(idx).payload)
    }

    /// Returns `true` if `handle` is still scheduled.
    #[must_use]
    pub fn contains(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Removes and returns the earliest timer due at `now`.
    ///
    /// Timers sharing a deadline fire in the order they were scheduled.
    pub fn pop_due(&mut self, now: u64) -> Option<(TimerHandle, T)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.handle))
            .map(|(idx, _)| idx)?;
        let entry = self.entries.remove(idx);
        Some((entry.handle, entry.payload))
    }

    /// Earliest pending deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every pending timer without firing it.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
