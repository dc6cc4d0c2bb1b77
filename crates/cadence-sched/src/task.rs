// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Task records for the Cadence scheduler
//!
//! A task is plain data: an identifier, a callable, a priority and the
//! interval/elapsed tick pair the dispatcher uses to decide when it is due.
//! Records are copied freely when the store reorders itself, so nothing in
//! a record refers to its own storage location.

use core::any::Any;
use core::fmt;
use core::ptr;

use cadence_common::{Error, Millis, Result, TickFrequency};

/// Caller-assigned task identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskId(pub u8);

impl TaskId {
    /// Invalid task ID (marks an unused slot)
    pub const INVALID: TaskId = TaskId(0xFF);

    /// Create a new task ID
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Check if this is a valid task ID
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.0 != 0xFF
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Task priority levels (higher number = higher priority)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TaskPriority {
    /// Runs only when no ticks are pending; has no interval
    Idle = 0,
    /// Low priority - background work
    Low = 1,
    /// Normal priority - application tasks
    #[default]
    Normal = 2,
    /// High priority - time-sensitive work
    High = 3,
    /// Highest priority - serviced first on every drain
    Critical = 4,
}

impl TaskPriority {
    /// Check if this is the idle class
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Scheduling class of this priority
    #[must_use]
    pub const fn class(&self) -> PriorityClass {
        if self.is_idle() {
            PriorityClass::Idle
        } else {
            PriorityClass::Interval
        }
    }
}

impl TryFrom<u8> for TaskPriority {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Idle),
            1 => Ok(Self::Low),
            2 => Ok(Self::Normal),
            3 => Ok(Self::High),
            4 => Ok(Self::Critical),
            _ => Err(Error::UnknownPriority),
        }
    }
}

/// The two scheduling classes a priority falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityClass {
    /// Low..=Critical: dispatched when their interval elapses
    Interval,
    /// Idle: dispatched when no ticks are pending
    Idle,
}

/// Argument bound to a task at registration
#[derive(Clone, Copy)]
pub enum TaskArg {
    /// Opaque reference to application state
    Ref(&'static (dyn Any + Sync)),
    /// The task's own elapsed-tick counter, resolved at dispatch time
    ElapsedTicks,
}

impl TaskArg {
    /// Two bindings are the same if they name the same object
    #[must_use]
    pub fn same_binding(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Ref(a), Self::Ref(b)) => ptr::addr_eq(ptr::from_ref(*a), ptr::from_ref(*b)),
            (Self::ElapsedTicks, Self::ElapsedTicks) => true,
            _ => false,
        }
    }

    fn resolve(self, elapsed: u32) -> ArgValue {
        match self {
            Self::Ref(r) => ArgValue::Ref(r),
            Self::ElapsedTicks => ArgValue::ElapsedTicks(elapsed),
        }
    }
}

impl fmt::Debug for TaskArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ref(r) => f.debug_tuple("Ref").field(&ptr::from_ref(*r).cast::<()>()).finish(),
            Self::ElapsedTicks => f.write_str("ElapsedTicks"),
        }
    }
}

/// Value handed to a with-argument task when it is dispatched
#[derive(Clone, Copy)]
pub enum ArgValue {
    /// The bound application reference
    Ref(&'static (dyn Any + Sync)),
    /// Ticks accumulated since the previous dispatch (0 for idle tasks)
    ElapsedTicks(u32),
}

impl ArgValue {
    /// Downcast the bound reference to its concrete type
    #[must_use]
    pub fn downcast<T: Any>(&self) -> Option<&'static T> {
        match *self {
            Self::Ref(r) => {
                let any: &'static dyn Any = r;
                any.downcast_ref::<T>()
            }
            Self::ElapsedTicks(_) => None,
        }
    }

    /// Elapsed ticks, if the task was bound to its own counter
    #[must_use]
    pub const fn elapsed_ticks(&self) -> Option<u32> {
        match *self {
            Self::ElapsedTicks(ticks) => Some(ticks),
            Self::Ref(_) => None,
        }
    }
}

impl fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ref(r) => f.debug_tuple("Ref").field(&ptr::from_ref(*r).cast::<()>()).finish(),
            Self::ElapsedTicks(ticks) => f.debug_tuple("ElapsedTicks").field(ticks).finish(),
        }
    }
}

/// Task body taking no argument
pub type TaskFn = fn();

/// Task body taking its bound argument
pub type TaskArgFn = fn(ArgValue);

/// A task's executable code together with its call shape
#[derive(Debug, Clone, Copy)]
pub enum TaskCode {
    /// Called as `f()`
    NoArg(TaskFn),
    /// Called as `f(arg)` with the bound argument resolved at dispatch
    WithArg(TaskArgFn, TaskArg),
}

impl TaskCode {
    /// Task body bound to a static application object
    #[must_use]
    pub const fn with_ref(f: TaskArgFn, arg: &'static (dyn Any + Sync)) -> Self {
        Self::WithArg(f, TaskArg::Ref(arg))
    }

    /// Task body that receives its own elapsed-tick count
    #[must_use]
    pub const fn with_elapsed(f: TaskArgFn) -> Self {
        Self::WithArg(f, TaskArg::ElapsedTicks)
    }

    /// Build a callable from nullable parts.
    ///
    /// The with-argument shape wins when both its function and an argument
    /// are present; otherwise the no-argument function is used.
    ///
    /// # Errors
    /// `InvalidCallable` if neither shape can be satisfied.
    pub fn from_parts(no_arg: Option<TaskFn>, with_arg: Option<TaskArgFn>, arg: Option<TaskArg>) -> Result<Self> {
        match (with_arg, arg, no_arg) {
            (Some(f), Some(arg), _) => Ok(Self::WithArg(f, arg)),
            (_, _, Some(f)) => Ok(Self::NoArg(f)),
            _ => Err(Error::InvalidCallable),
        }
    }

    /// Bound argument, if any
    #[must_use]
    pub const fn arg(&self) -> Option<TaskArg> {
        match *self {
            Self::NoArg(_) => None,
            Self::WithArg(_, arg) => Some(arg),
        }
    }

    /// Same callable and same argument binding.
    ///
    /// Arguments match when both are absent, or both are present and name
    /// the same object.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NoArg(a), Self::NoArg(b)) => ptr::fn_addr_eq(*a, *b),
            (Self::WithArg(a, x), Self::WithArg(b, y)) => ptr::fn_addr_eq(*a, *b) && x.same_binding(y),
            _ => false,
        }
    }

    /// Run the task body once
    pub(crate) fn invoke(&self, elapsed: u32) {
        match *self {
            Self::NoArg(f) => f(),
            Self::WithArg(f, arg) => f(arg.resolve(elapsed)),
        }
    }
}

fn unused_slot() {}

/// Task record
#[derive(Debug, Clone, Copy)]
pub struct Task {
    /// Unique task identifier
    pub id: TaskId,
    /// Task body and call shape
    pub code: TaskCode,
    /// Scheduling priority
    pub priority: TaskPriority,
    /// Ticks between dispatches (ignored for idle tasks)
    pub interval: u32,
    /// Ticks accumulated since the last dispatch
    pub elapsed: u32,
    /// Number of times the task has been dispatched
    pub runs: u32,
}

impl Task {
    /// Contents of an unused slot
    pub const EMPTY: Task = Task {
        id: TaskId::INVALID,
        code: TaskCode::NoArg(unused_slot),
        priority: TaskPriority::Idle,
        interval: 0,
        elapsed: 0,
        runs: 0,
    };

    /// Create a task dispatched every `interval` ticks
    #[must_use]
    pub const fn new(id: TaskId, code: TaskCode, interval: u32, priority: TaskPriority) -> Self {
        Self {
            id,
            code,
            priority,
            interval,
            elapsed: 0,
            runs: 0,
        }
    }

    /// Create an idle task
    #[must_use]
    pub const fn idle(id: TaskId, code: TaskCode) -> Self {
        Self::new(id, code, 0, TaskPriority::Idle)
    }

    /// Create a task whose interval is given in milliseconds
    #[must_use]
    pub const fn every_millis(
        id: TaskId,
        code: TaskCode,
        period: Millis,
        priority: TaskPriority,
        freq: TickFrequency,
    ) -> Self {
        Self::new(id, code, freq.millis_to_ticks(period.as_millis()), priority)
    }

    /// Check if the interval has elapsed
    #[must_use]
    pub const fn is_due(&self) -> bool {
        self.elapsed >= self.interval
    }
}

impl Default for Task {
    fn default() -> Self {
        Self::EMPTY
    }
}
