// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Error types for Cadence
//!
//! A single error enum is shared by the task store, the tick counter and
//! the dispatcher. Every error is `Copy` and carries a numeric code so it
//! can be reported over a debug probe without formatting.

use core::fmt;

/// Result type alias for Cadence operations
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for Cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Task Store Errors (0x01xx)
    // =========================================================================
    /// Neither the no-argument nor the with-argument call shape can be built
    InvalidCallable,
    /// A task with the same id or the same callable/argument pair is registered
    DuplicateIdentity,
    /// Every slot of the backing storage is occupied
    StoreFull,
    /// Raw priority value outside the recognized set
    UnknownPriority,
    /// No registered task matches the requested identity
    NotFound,
    /// Requested capacity exceeds the supplied backing storage
    InvalidCapacity,

    // =========================================================================
    // Dispatcher Errors (0x02xx)
    // =========================================================================
    /// Timing hooks are required but were not registered before start
    TimingHooksMissing,

    // =========================================================================
    // General Errors (0xFFxx)
    // =========================================================================
    /// Invalid state for the operation
    InvalidState,
    /// Invalid parameter provided
    InvalidParameter,
}

impl Error {
    /// Get the error code for this error
    ///
    /// Error codes are organized by category:
    /// - 0x01xx: Task store errors
    /// - 0x02xx: Dispatcher errors
    /// - 0xFFxx: General errors
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            // Task store errors (0x01xx)
            Self::InvalidCallable => 0x0101,
            Self::DuplicateIdentity => 0x0102,
            Self::StoreFull => 0x0103,
            Self::UnknownPriority => 0x0104,
            Self::NotFound => 0x0105,
            Self::InvalidCapacity => 0x0106,

            // Dispatcher errors (0x02xx)
            Self::TimingHooksMissing => 0x0201,

            // General errors (0xFFxx)
            Self::InvalidState => 0xFF01,
            Self::InvalidParameter => 0xFF02,
        }
    }

    /// Check if the error stops the dispatcher for good
    ///
    /// Every other error is recoverable by retrying with corrected input.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::TimingHooksMissing)
    }

    /// Get a short description of the error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidCallable => "invalid task callable",
            Self::DuplicateIdentity => "task already registered",
            Self::StoreFull => "task store full",
            Self::UnknownPriority => "unknown task priority",
            Self::NotFound => "task not found",
            Self::InvalidCapacity => "capacity exceeds storage",
            Self::TimingHooksMissing => "timing hooks not registered",
            Self::InvalidState => "invalid state",
            Self::InvalidParameter => "invalid parameter",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0x{:04X}] {}", self.code(), self.description())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[0x{:04X}] {}", self.code(), self.description());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_categorized() {
        assert_eq!(Error::StoreFull.code() & 0xFF00, 0x0100);
        assert_eq!(Error::TimingHooksMissing.code() & 0xFF00, 0x0200);
        assert_eq!(Error::InvalidState.code() & 0xFF00, 0xFF00);
    }

    #[test]
    fn test_only_missing_hooks_is_fatal() {
        assert!(Error::TimingHooksMissing.is_fatal());
        assert!(!Error::StoreFull.is_fatal());
        assert!(!Error::NotFound.is_fatal());
    }

    #[test]
    fn test_display_includes_code() {
        use core::fmt::Write;
        let mut out = heapless::String::<32>::new();
        write!(out, "{}", Error::NotFound).unwrap();
        assert_eq!(out.as_str(), "[0x0105] task not found");
    }
}
