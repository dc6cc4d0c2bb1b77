// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Cadence Cooperative Scheduler
//!
//! A priority-ordered, interval-based, run-to-completion task scheduler for
//! single-core microcontrollers:
//!
//! - **Task**: Task records, priorities and bound arguments
//! - **Store**: Ordered, fixed-capacity task storage
//! - **Tick**: Interrupt-safe tick accounting
//! - **Scheduler**: The dispatch loop and its run state
//! - **Hooks**: Optional timing instrumentation
//!
//! # Usage
//!
//! ```rust,ignore
//! use cadence_common::constants::DEFAULT_TASK_CAPACITY;
//! use cadence_sched::{Scheduler, Task, TaskCode, TaskId, TaskPriority, TickCounter};
//!
//! static TICKS: TickCounter = TickCounter::new();
//!
//! #[exception]
//! fn SysTick() {
//!     TICKS.tick();
//! }
//!
//! #[entry]
//! fn main() -> ! {
//!     let mut storage = [Task::EMPTY; DEFAULT_TASK_CAPACITY];
//!     let mut sched = Scheduler::new(&mut storage, &TICKS);
//!
//!     sched.add(Task::new(TaskId::new(0), TaskCode::NoArg(blink), 500, TaskPriority::Normal))
//!         .expect("add blink");
//!     sched.add(Task::idle(TaskId::new(1), TaskCode::NoArg(poll_uart))).expect("add uart poll");
//!
//!     // Returns only if the pre-flight check fails
//!     let err = sched.run();
//!     panic!("scheduler halted: {}", err);
//! }
//! ```
//!
//! # Features
//!
//! - `cortex-m`: Critical sections by interrupt masking on Cortex-M
//! - `riscv`: Critical sections by interrupt masking on a single RISC-V hart
//! - `std`: Host critical sections (tests, simulation)
//! - `defmt`: defmt formatting for ids, priorities and errors

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Linked for their `critical-section` implementations
#[cfg(feature = "cortex-m")]
use cortex_m as _;
#[cfg(feature = "riscv")]
use riscv as _;

pub mod hooks;
pub mod scheduler;
pub mod store;
pub mod task;
pub mod tick;

// Re-export commonly used types
pub use hooks::TimingHooks;
pub use scheduler::{Cycle, Scheduler, SchedulerState, SchedulerStats};
pub use store::{InvariantViolation, TaskStore};
pub use task::{ArgValue, PriorityClass, Task, TaskArg, TaskArgFn, TaskCode, TaskFn, TaskId, TaskPriority};
pub use tick::TickCounter;

pub use cadence_common::{Error, Result, SchedulerConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build info
pub const BUILD_INFO: &str = concat!(
    env!("CARGO_PKG_NAME"),
    " v",
    env!("CARGO_PKG_VERSION"),
    " - Cadence cooperative scheduler"
);
