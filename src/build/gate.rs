//! Single-flight build gate.
//!
//! At most one build runs at a time. A trigger that arrives while a build
//! runs marks the gate pending and returns; the running caller then builds
//! once more. Any number of pending triggers collapse into that one rebuild.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct BuildGate {
    busy: AtomicBool,
    pending: AtomicBool,
}

impl BuildGate {
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            pending: AtomicBool::new(false),
        }
    }

    /// Run `build`, or hand it to the caller already building.
    ///
    /// Returns the result of the last build this caller ran, or `None` when
    /// the trigger was coalesced into another caller's follow-up.
    pub fn run<T>(&self, mut build: impl FnMut() -> T) -> Option<T> {
        if !self.acquire() {
            self.pending.store(true, Ordering::Release);
            // the holder may have released between the two steps
            if !self.acquire() {
                return None;
            }
        }

        loop {
            self.pending.store(false, Ordering::Release);
            let result = build();
            self.busy.store(false, Ordering::Release);

            if !self.pending.load(Ordering::Acquire) || !self.acquire() {
                return Some(result);
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn acquire(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
