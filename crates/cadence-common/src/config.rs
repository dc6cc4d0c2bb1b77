// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Scheduler configuration for Cadence
//!
//! Configuration is fixed when the scheduler is created. Presets are `const`
//! so a configuration can live in flash alongside the firmware.

use crate::constants::DEFAULT_TICK_RATE_HZ;
use crate::log::LogLevel;
use crate::time::TickFrequency;

/// Scheduler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Rate at which the timer interrupt calls `tick`
    pub tick_rate_hz: u32,
    /// Halt on start unless timing hooks have been registered
    pub require_timing_hooks: bool,
    /// Minimum level recorded in the scheduler's log buffer
    pub log_level: LogLevel,
    /// Usable slots (`None` = the whole backing storage)
    pub capacity: Option<usize>,
}

impl SchedulerConfig {
    /// Default configuration (1 kHz tick, hooks optional, `Info` logging)
    pub const DEFAULT: Self = Self {
        tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        require_timing_hooks: false,
        log_level: LogLevel::Info,
        capacity: None,
    };

    /// Instrumented configuration: timing hooks are mandatory
    pub const DEBUG: Self = Self {
        tick_rate_hz: DEFAULT_TICK_RATE_HZ,
        require_timing_hooks: true,
        log_level: LogLevel::Debug,
        capacity: None,
    };

    /// Set the tick rate
    #[must_use]
    pub const fn with_tick_rate(mut self, hz: u32) -> Self {
        self.tick_rate_hz = hz;
        self
    }

    /// Require (or stop requiring) timing hooks before the dispatcher starts
    #[must_use]
    pub const fn with_required_timing_hooks(mut self, required: bool) -> Self {
        self.require_timing_hooks = required;
        self
    }

    /// Set the minimum log level
    #[must_use]
    pub const fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Limit the number of usable slots
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Tick frequency for converting intervals between ticks and time
    #[must_use]
    pub const fn tick_frequency(&self) -> TickFrequency {
        TickFrequency::from_hz(self.tick_rate_hz)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
