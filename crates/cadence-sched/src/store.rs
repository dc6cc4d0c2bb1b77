// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Ordered task store
//!
//! Tasks live in caller-supplied storage, partitioned into two regions:
//!
//! ```text
//! [0, P)          priority tasks, non-increasing priority (FIFO within a level)
//! [P, P + I)      idle tasks, insertion order
//! [P + I, N)      Task::EMPTY
//! ```
//!
//! Insertion appends and bubbles the new record toward index 0; removal
//! shifts the tail left by one. Both keep the layout above intact, so the
//! dispatcher can walk each region without sorting or skipping holes.

use cadence_common::{Error, Result};

use crate::task::{PriorityClass, Task, TaskCode, TaskId, TaskPriority};

/// Layout rule broken by a store, as reported by [`TaskStore::check_invariants`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Class counts exceed the backing storage
    CountsExceedCapacity,
    /// Slot in the priority region has a higher priority than its predecessor
    PriorityOrder(usize),
    /// Idle task inside the priority region
    IdleInPriorityRegion(usize),
    /// Priority task inside the idle region
    PriorityInIdleRegion(usize),
    /// Occupied slot carries the invalid id
    InvalidId(usize),
    /// Slot past the occupied regions is not empty
    OccupiedTail(usize),
    /// Id already used by an earlier slot
    DuplicateId(usize),
    /// Callable and argument already used by an earlier slot
    DuplicateCode(usize),
}

/// Fixed-capacity ordered task store
pub struct TaskStore<'a> {
    slots: &'a mut [Task],
    priority_count: usize,
    idle_count: usize,
}

impl<'a> TaskStore<'a> {
    /// Bind `storage` and mark every slot empty
    #[must_use]
    pub fn new(storage: &'a mut [Task]) -> Self {
        let mut store = Self {
            slots: storage,
            priority_count: 0,
            idle_count: 0,
        };
        store.init();
        store
    }

    /// Bind the first `capacity` slots of `storage`
    ///
    /// # Errors
    /// `InvalidCapacity` if `capacity` exceeds `storage.len()`.
    pub fn with_capacity(storage: &'a mut [Task], capacity: usize) -> Result<Self> {
        if capacity > storage.len() {
            return Err(Error::InvalidCapacity);
        }
        let (slots, _) = storage.split_at_mut(capacity);
        Ok(Self::new(slots))
    }

    /// Discard every task
    pub fn init(&mut self) {
        self.slots.fill(Task::EMPTY);
        self.priority_count = 0;
        self.idle_count = 0;
    }

    /// Number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots
    #[must_use]
    pub const fn len(&self) -> usize {
        self.priority_count + self.idle_count
    }

    /// No tasks registered
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every slot occupied
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() >= self.slots.len()
    }

    /// Number of priority-class tasks
    #[must_use]
    pub const fn priority_count(&self) -> usize {
        self.priority_count
    }

    /// Number of idle tasks
    #[must_use]
    pub const fn idle_count(&self) -> usize {
        self.idle_count
    }

    /// Priority tasks in dispatch order
    #[must_use]
    pub fn priority_tasks(&self) -> &[Task] {
        &self.slots[..self.priority_count]
    }

    /// Idle tasks in dispatch order
    #[must_use]
    pub fn idle_tasks(&self) -> &[Task] {
        &self.slots[self.priority_count..self.len()]
    }

    pub(crate) fn priority_tasks_mut(&mut self) -> &mut [Task] {
        &mut self.slots[..self.priority_count]
    }

    pub(crate) fn idle_tasks_mut(&mut self) -> &mut [Task] {
        let end = self.len();
        &mut self.slots[self.priority_count..end]
    }

    /// Occupied slots, priority region first
    pub fn iter(&self) -> core::slice::Iter<'_, Task> {
        self.slots[..self.len()].iter()
    }

    /// Look up a task by id
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.iter().find(|task| task.id == id)
    }

    /// Check whether a task with `id` is registered
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Resolve a (callable, argument) identity to its task id
    #[must_use]
    pub fn find_by_code(&self, code: &TaskCode) -> Option<TaskId> {
        self.iter().find(|task| task.code.same_identity(code)).map(|task| task.id)
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.iter().position(|task| task.id == id)
    }

    /// Check whether `task` could be added without changing the store
    ///
    /// # Errors
    /// - `InvalidParameter` if the id is [`TaskId::INVALID`]
    /// - `DuplicateIdentity` if the id or the callable/argument pair is taken
    /// - `StoreFull` if no slot is free
    pub fn admit(&self, task: &Task) -> Result<()> {
        if !task.id.is_valid() {
            return Err(Error::InvalidParameter);
        }
        if self
            .iter()
            .any(|existing| existing.id == task.id || existing.code.same_identity(&task.code))
        {
            return Err(Error::DuplicateIdentity);
        }
        if self.is_full() {
            return Err(Error::StoreFull);
        }
        Ok(())
    }

    /// Insert a task, returning the slot it settled in
    ///
    /// The record's `elapsed` and `runs` are reset. On error the store is
    /// unchanged.
    ///
    /// # Errors
    /// See [`admit`](Self::admit).
    pub fn add(&mut self, mut task: Task) -> Result<usize> {
        self.admit(&task)?;
        task.elapsed = 0;
        task.runs = 0;

        let index = self.place(task);
        debug_assert_eq!(self.check_invariants(), Ok(()));
        Ok(index)
    }

    /// Remove a task, returning its record
    ///
    /// # Errors
    /// `NotFound` if no task has `id`.
    pub fn remove(&mut self, id: TaskId) -> Result<Task> {
        let index = self.position(id).ok_or(Error::NotFound)?;
        let task = self.take(index);
        debug_assert_eq!(self.check_invariants(), Ok(()));
        Ok(task)
    }

    /// Change a task's interval and priority, restarting its elapsed count
    ///
    /// A priority change moves the record to the back of its new level.
    /// Returns the slot the task now occupies.
    ///
    /// # Errors
    /// `NotFound` if no task has `id`.
    pub fn update(&mut self, id: TaskId, interval: u32, priority: TaskPriority) -> Result<usize> {
        let index = self.position(id).ok_or(Error::NotFound)?;

        let slot = &mut self.slots[index];
        slot.interval = interval;
        slot.elapsed = 0;
        if slot.priority == priority {
            return Ok(index);
        }

        let mut task = self.take(index);
        task.priority = priority;
        let index = self.place(task);
        debug_assert_eq!(self.check_invariants(), Ok(()));
        Ok(index)
    }

    /// Add `ticks` to the elapsed count of every priority task
    pub fn credit_elapsed(&mut self, ticks: u32) {
        if ticks == 0 {
            return;
        }
        for task in self.priority_tasks_mut() {
            task.elapsed = task.elapsed.saturating_add(ticks);
        }
    }

    /// Append `task` and bubble it into position. Caller guarantees a free slot.
    fn place(&mut self, task: Task) -> usize {
        let mut index = self.len();
        self.slots[index] = task;
        match task.priority.class() {
            PriorityClass::Interval => self.priority_count += 1,
            PriorityClass::Idle => self.idle_count += 1,
        }

        // Strictly greater: equal priorities keep insertion order
        while index > 0 && self.slots[index].priority > self.slots[index - 1].priority {
            self.slots.swap(index, index - 1);
            index -= 1;
        }
        index
    }

    /// Remove the record at `index` and close the gap
    fn take(&mut self, index: usize) -> Task {
        let len = self.len();
        let task = self.slots[index];
        match task.priority.class() {
            PriorityClass::Interval => self.priority_count -= 1,
            PriorityClass::Idle => self.idle_count -= 1,
        }

        self.slots.copy_within(index + 1..len, index);
        self.slots[len - 1] = Task::EMPTY;
        task
    }

    /// Verify the region layout and uniqueness rules
    ///
    /// # Errors
    /// The first violation found.
    pub fn check_invariants(&self) -> core::result::Result<(), InvariantViolation> {
        let len = self.len();
        if len > self.slots.len() {
            return Err(InvariantViolation::CountsExceedCapacity);
        }

        for (index, task) in self.priority_tasks().iter().enumerate() {
            if task.priority.is_idle() {
                return Err(InvariantViolation::IdleInPriorityRegion(index));
            }
            if index > 0 && task.priority > self.slots[index - 1].priority {
                return Err(InvariantViolation::PriorityOrder(index));
            }
        }

        for (offset, task) in self.idle_tasks().iter().enumerate() {
            if !task.priority.is_idle() {
                return Err(InvariantViolation::PriorityInIdleRegion(self.priority_count + offset));
            }
        }

        for (offset, task) in self.slots[len..].iter().enumerate() {
            if task.id.is_valid() {
                return Err(InvariantViolation::OccupiedTail(len + offset));
            }
        }

        let occupied = &self.slots[..len];
        for (index, task) in occupied.iter().enumerate() {
            if !task.id.is_valid() {
                return Err(InvariantViolation::InvalidId(index));
            }
            for earlier in &occupied[..index] {
                if earlier.id == task.id {
                    return Err(InvariantViolation::DuplicateId(index));
                }
                if earlier.code.same_identity(&task.code) {
                    return Err(InvariantViolation::DuplicateCode(index));
                }
            }
        }

        Ok(())
    }
}

impl core::fmt::Debug for TaskStore<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TaskStore")
            .field("capacity", &self.capacity())
            .field("priority", &self.priority_tasks())
            .field("idle", &self.idle_tasks())
            .finish()
    }
}
