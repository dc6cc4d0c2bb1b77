// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Tick accounting
//!
//! The timer interrupt increments a shared counter; the dispatcher drains
//! it. Both sides go through a critical section so an increment can never
//! land between the dispatcher's read and its subtraction.
//!
//! # Usage
//!
//! ```rust,ignore
//! static TICKS: TickCounter = TickCounter::new();
//!
//! #[exception]
//! fn SysTick() {
//!     TICKS.tick();
//! }
//! ```

use core::cell::Cell;

use critical_section::Mutex;

/// Ticks that have occurred but not yet been attributed to any task
pub struct TickCounter {
    pending: Mutex<Cell<u32>>,
}

impl TickCounter {
    /// Create an empty counter (usable in a `static`)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: Mutex::new(Cell::new(0)),
        }
    }

    /// Record one tick. Safe to call from interrupt context.
    pub fn tick(&self) {
        self.add_ticks(1);
    }

    /// Record several ticks at once (coarse timers, catch-up after sleep)
    pub fn add_ticks(&self, ticks: u32) {
        critical_section::with(|cs| {
            let pending = self.pending.borrow(cs);
            pending.set(pending.get().saturating_add(ticks));
        });
    }

    /// Take every pending tick, returning how many there were
    pub fn drain(&self) -> u32 {
        // Read and clear in one critical section
        critical_section::with(|cs| self.pending.borrow(cs).replace(0))
    }

    /// Pending ticks, without draining them
    #[must_use]
    pub fn pending(&self) -> u32 {
        critical_section::with(|cs| self.pending.borrow(cs).get())
    }

    /// Discard pending ticks
    pub fn clear(&self) {
        let _ = self.drain();
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}
