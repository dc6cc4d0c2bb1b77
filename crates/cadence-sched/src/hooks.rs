// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Timing instrumentation hooks
//!
//! When registered, `start` runs immediately before and `stop` immediately
//! after every priority-task dispatch, typically toggling a GPIO or reading
//! the DWT cycle counter.

/// Profiling callbacks wrapped around each priority-task dispatch
#[derive(Debug, Clone, Copy)]
pub struct TimingHooks {
    /// Called before the task body
    pub start: fn(),
    /// Called after the task body returns
    pub stop: fn(),
}

impl TimingHooks {
    /// Create a hook pair
    #[must_use]
    pub const fn new(start: fn(), stop: fn()) -> Self {
        Self { start, stop }
    }

    /// Run `f` between the two hooks
    pub fn measure<R>(&self, f: impl FnOnce() -> R) -> R {
        (self.start)();
        let result = f();
        (self.stop)();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_measure_brackets_body() {
        static SEQ: AtomicU32 = AtomicU32::new(0);
        static STARTED_AT: AtomicU32 = AtomicU32::new(0);
        static STOPPED_AT: AtomicU32 = AtomicU32::new(0);

        fn start() {
            STARTED_AT.store(SEQ.fetch_add(1, Ordering::SeqCst), Ordering::SeqCst);
        }
        fn stop() {
            STOPPED_AT.store(SEQ.fetch_add(1, Ordering::SeqCst), Ordering::SeqCst);
        }

        let hooks = TimingHooks::new(start, stop);
        let body_at = hooks.measure(|| SEQ.fetch_add(1, Ordering::SeqCst));

        assert_eq!(STARTED_AT.load(Ordering::SeqCst), 0);
        assert_eq!(body_at, 1);
        assert_eq!(STOPPED_AT.load(Ordering::SeqCst), 2);
    }
}
