// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! System-wide constants for Cadence
//!
//! Compile-time defaults for the scheduler and its logging. All sizes are
//! chosen for small single-core microcontrollers.

// =============================================================================
// Scheduler Constants
// =============================================================================

/// Default tick rate (1000 Hz = 1ms tick)
pub const DEFAULT_TICK_RATE_HZ: u32 = 1000;

/// Suggested task list size for a statically allocated store
pub const DEFAULT_TASK_CAPACITY: usize = 64;

// =============================================================================
// Logging Constants
// =============================================================================

/// Log buffer size (number of entries)
pub const LOG_BUFFER_SIZE: usize = 16;

/// Maximum log message length
pub const MAX_LOG_MESSAGE_LEN: usize = 64;

/// Module tag used by the task store
pub const MODULE_STORE: &str = "store";

/// Module tag used by the dispatcher
pub const MODULE_DISPATCH: &str = "dispatch";
