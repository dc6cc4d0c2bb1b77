// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Time units for Cadence
//!
//! A running tick total for statistics and log timestamps, and the
//! millisecond-to-tick conversion used to express task intervals in
//! wall-clock time.

use core::ops::Add;

/// Running total of drained ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ticks(u64);

impl Ticks {
    /// Create from a raw tick count
    #[must_use]
    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    /// Low 32 bits, used as a log timestamp
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn as_timestamp(&self) -> u32 {
        self.0 as u32
    }
}

impl Add<u64> for Ticks {
    type Output = Self;

    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0.saturating_add(rhs))
    }
}

/// Task period in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Millis(u32);

impl Millis {
    /// Create from milliseconds
    #[must_use]
    pub const fn new(ms: u32) -> Self {
        Self(ms)
    }

    /// Get as milliseconds
    #[must_use]
    pub const fn as_millis(&self) -> u32 {
        self.0
    }
}

/// Rate at which the timer interrupt ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickFrequency {
    hz: u32,
}

impl TickFrequency {
    /// Create from frequency in Hz
    #[must_use]
    pub const fn from_hz(hz: u32) -> Self {
        Self { hz }
    }

    /// Ticks in `millis` milliseconds (rounded down, saturating)
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn millis_to_ticks(&self, millis: u32) -> u32 {
        let ticks = (millis as u64 * self.hz as u64) / 1_000;
        if ticks > u32::MAX as u64 {
            u32::MAX
        } else {
            ticks as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_saturate() {
        assert_eq!(Ticks::new(10) + 15, Ticks::new(25));
        assert_eq!(Ticks::new(u64::MAX) + 1, Ticks::new(u64::MAX));
    }

    #[test]
    fn test_millis_to_ticks() {
        let freq = TickFrequency::from_hz(100);
        assert_eq!(freq.millis_to_ticks(1_000), 100);
        assert_eq!(freq.millis_to_ticks(15), 1);
        assert_eq!(TickFrequency::from_hz(0).millis_to_ticks(500), 0);
        assert_eq!(TickFrequency::from_hz(u32::MAX).millis_to_ticks(u32::MAX), u32::MAX);
    }
}
