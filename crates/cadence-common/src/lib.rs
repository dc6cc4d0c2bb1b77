// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Cadence Common Library
//!
//! This crate provides the error type, logging buffer, configuration
//! structures, constants and tick time units shared by the Cadence
//! cooperative scheduler.
//!
//! # Features
//!
//! - `defmt`: Enable defmt logging support for embedded debugging
//!
//! No heap allocations are performed - all buffers use fixed-size arrays or
//! heapless collections.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod errors;
pub mod config;
pub mod log;
pub mod constants;
pub mod time;

// Re-export commonly used items
pub use errors::{Error, Result};
pub use config::SchedulerConfig;
pub use log::{LogBuffer, LogLevel};
pub use time::{Millis, TickFrequency, Ticks};
