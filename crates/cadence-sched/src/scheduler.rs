// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Cooperative Interval Scheduler
//!
//! Run-to-completion dispatcher for single-core targets:
//!
//! - **Interval tasks**: each priority task runs once its accumulated
//!   ticks reach its interval, highest priority first
//! - **Idle tasks**: run once per cycle whenever no ticks are pending
//! - **No preemption**: a task returns before the next one starts
//!
//! # Dispatch Cycle
//!
//! 1. Drain the pending tick count from the [`TickCounter`]
//! 2. Non-zero: credit it to every priority task and invoke those now due
//! 3. Zero: invoke every idle task once
//!
//! Tasks are added, removed and updated through `&mut Scheduler`, so the
//! store can never change underneath a running cycle.

use cadence_common::constants::{MODULE_DISPATCH, MODULE_STORE};
use cadence_common::{log_debug, log_error, log_info, log_trace, log_warn};
use cadence_common::{Error, LogBuffer, Result, SchedulerConfig, Ticks};

use crate::hooks::TimingHooks;
use crate::store::TaskStore;
use crate::task::{Task, TaskCode, TaskId, TaskPriority};
use crate::tick::TickCounter;

/// Scheduler statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Ticks drained since the scheduler was created or reset
    pub total_ticks: Ticks,
    /// Cycles that found pending ticks
    pub priority_cycles: u64,
    /// Cycles that found no pending ticks
    pub idle_cycles: u64,
    /// Priority task invocations
    pub priority_dispatches: u64,
    /// Idle task invocations
    pub idle_dispatches: u64,
}

/// Scheduler state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Accepting tasks, dispatcher not yet started
    Initialized,
    /// Dispatcher running
    Running,
    /// Pre-flight check failed; the dispatcher will not run
    Halted(Error),
}

/// Outcome of one dispatch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// Ticks were pending and credited to the priority tasks
    Priority {
        /// Ticks drained this cycle
        ticks: u32,
        /// Priority tasks invoked
        dispatched: usize,
    },
    /// No ticks were pending
    Idle {
        /// Idle tasks invoked
        dispatched: usize,
    },
}

/// Cooperative scheduler
pub struct Scheduler<'a> {
    /// Registered tasks
    store: TaskStore<'a>,
    /// Tick source shared with the timer interrupt
    ticks: &'a TickCounter,
    /// Configuration fixed at construction
    config: SchedulerConfig,
    /// Optional profiling callbacks
    hooks: Option<TimingHooks>,
    /// Current scheduler state
    state: SchedulerState,
    /// Scheduler statistics
    stats: SchedulerStats,
    /// Recent scheduler events
    log: LogBuffer,
}

impl<'a> Scheduler<'a> {
    /// Create a scheduler over `storage` with the default configuration
    #[must_use]
    pub fn new(storage: &'a mut [Task], ticks: &'a TickCounter) -> Self {
        let config = SchedulerConfig::DEFAULT;
        Self {
            store: TaskStore::new(storage),
            ticks,
            config,
            hooks: None,
            state: SchedulerState::Initialized,
            stats: SchedulerStats::default(),
            log: LogBuffer::with_level(config.log_level),
        }
    }

    /// Create a scheduler with an explicit configuration
    ///
    /// # Errors
    /// `InvalidCapacity` if `config.capacity` exceeds `storage.len()`.
    pub fn with_config(storage: &'a mut [Task], ticks: &'a TickCounter, config: SchedulerConfig) -> Result<Self> {
        let store = match config.capacity {
            Some(capacity) => TaskStore::with_capacity(storage, capacity)?,
            None => TaskStore::new(storage),
        };

        Ok(Self {
            store,
            ticks,
            config,
            hooks: None,
            state: SchedulerState::Initialized,
            stats: SchedulerStats::default(),
            log: LogBuffer::with_level(config.log_level),
        })
    }

    /// Discard every task, pending tick, hook and statistic
    pub fn reset(&mut self) {
        self.store.init();
        self.ticks.clear();
        self.hooks = None;
        self.state = SchedulerState::Initialized;
        self.stats = SchedulerStats::default();
        self.log.clear();
    }

    /// Register callbacks run around every priority-task dispatch
    pub fn register_timing_hooks(&mut self, start: fn(), stop: fn()) {
        self.hooks = Some(TimingHooks::new(start, stop));
        let ts = self.timestamp();
        log_debug!(self.log, ts, MODULE_DISPATCH, "timing hooks registered");
    }

    /// Register a task
    ///
    /// Ticks pending at the time of the call are credited to the tasks
    /// already registered; the new task starts counting from zero.
    ///
    /// # Errors
    /// - `InvalidParameter` if the id is [`TaskId::INVALID`]
    /// - `DuplicateIdentity` if the id or the callable/argument pair is taken
    /// - `StoreFull` if no slot is free
    pub fn add(&mut self, task: Task) -> Result<()> {
        if let Err(err) = self.store.admit(&task) {
            let ts = self.timestamp();
            log_warn!(self.log, ts, MODULE_STORE, "add {} rejected: {}", task.id, err);
            return Err(err);
        }

        let pending = self.ticks.drain();
        self.credit(pending);

        let index = self.store.add(task)?;
        let ts = self.timestamp();
        log_info!(
            self.log,
            ts,
            MODULE_STORE,
            "added {} {:?} every {} at slot {}",
            task.id,
            task.priority,
            task.interval,
            index
        );
        Ok(())
    }

    /// Register a task whose priority is given as a raw level (0 = idle ..= 4)
    ///
    /// # Errors
    /// `UnknownPriority` for a level above 4, otherwise as [`add`](Self::add).
    pub fn add_raw(&mut self, id: TaskId, code: TaskCode, interval: u32, priority: u8) -> Result<()> {
        let priority = match TaskPriority::try_from(priority) {
            Ok(priority) => priority,
            Err(err) => {
                let ts = self.timestamp();
                log_warn!(self.log, ts, MODULE_STORE, "add {} rejected: level {}", id, priority);
                return Err(err);
            }
        };
        self.add(Task::new(id, code, interval, priority))
    }

    /// Unregister a task, returning its record
    ///
    /// # Errors
    /// `NotFound` if no task has `id`.
    pub fn remove(&mut self, id: TaskId) -> Result<Task> {
        let ts = self.timestamp();
        match self.store.remove(id) {
            Ok(task) => {
                log_info!(self.log, ts, MODULE_STORE, "removed {}", id);
                Ok(task)
            }
            Err(err) => {
                log_warn!(self.log, ts, MODULE_STORE, "remove {}: {}", id, err);
                Err(err)
            }
        }
    }

    /// Unregister the task registered with this callable and argument
    ///
    /// # Errors
    /// `NotFound` if no task matches.
    pub fn remove_by_code(&mut self, code: &TaskCode) -> Result<Task> {
        let id = self.find(code)?;
        self.remove(id)
    }

    /// Change a task's interval and priority and restart its elapsed count
    ///
    /// # Errors
    /// `NotFound` if no task has `id`.
    pub fn update(&mut self, id: TaskId, interval: u32, priority: TaskPriority) -> Result<()> {
        let ts = self.timestamp();
        match self.store.update(id, interval, priority) {
            Ok(index) => {
                log_info!(
                    self.log,
                    ts,
                    MODULE_STORE,
                    "updated {} {:?} every {} at slot {}",
                    id,
                    priority,
                    interval,
                    index
                );
                Ok(())
            }
            Err(err) => {
                log_warn!(self.log, ts, MODULE_STORE, "update {}: {}", id, err);
                Err(err)
            }
        }
    }

    /// Update the task registered with this callable and argument
    ///
    /// # Errors
    /// `NotFound` if no task matches.
    pub fn update_by_code(&mut self, code: &TaskCode, interval: u32, priority: TaskPriority) -> Result<()> {
        let id = self.find(code)?;
        self.update(id, interval, priority)
    }

    /// Copy of a task's record
    ///
    /// # Errors
    /// `NotFound` if no task has `id`.
    pub fn get(&self, id: TaskId) -> Result<Task> {
        self.store.get(id).copied().ok_or(Error::NotFound)
    }

    /// Id of the task registered with this callable and argument
    ///
    /// # Errors
    /// `NotFound` if no task matches.
    pub fn find(&self, code: &TaskCode) -> Result<TaskId> {
        self.store.find_by_code(code).ok_or(Error::NotFound)
    }

    /// Run the pre-flight check and enter `Running`
    ///
    /// Ticks counted before this call are discarded. Called implicitly by
    /// the first [`poll`](Self::poll).
    ///
    /// # Errors
    /// - `TimingHooksMissing` if the configuration requires hooks and none
    ///   are registered; the scheduler is then halted
    /// - `InvalidState` if already running
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            SchedulerState::Initialized => {}
            SchedulerState::Running => return Err(Error::InvalidState),
            SchedulerState::Halted(err) => return Err(err),
        }

        let ts = self.timestamp();
        if self.config.require_timing_hooks && self.hooks.is_none() {
            let err = Error::TimingHooksMissing;
            self.state = SchedulerState::Halted(err);
            log_error!(self.log, ts, MODULE_DISPATCH, "halted: {}", err);
            return Err(err);
        }

        self.ticks.clear();
        self.state = SchedulerState::Running;
        log_info!(
            self.log,
            ts,
            MODULE_DISPATCH,
            "started with {} priority and {} idle tasks",
            self.store.priority_count(),
            self.store.idle_count()
        );
        Ok(())
    }

    /// Run one dispatch cycle
    ///
    /// # Errors
    /// The halting error once the scheduler has halted.
    pub fn poll(&mut self) -> Result<Cycle> {
        match self.state {
            SchedulerState::Initialized => self.start()?,
            SchedulerState::Running => {}
            SchedulerState::Halted(err) => return Err(err),
        }

        let ticks = self.ticks.drain();
        if ticks > 0 {
            Ok(self.run_priority(ticks))
        } else {
            Ok(self.run_idle())
        }
    }

    /// Dispatch forever
    ///
    /// Returns only if the scheduler halts, with the error that halted it.
    pub fn run(&mut self) -> Error {
        loop {
            if let Err(err) = self.poll() {
                return err;
            }
        }
    }

    fn run_priority(&mut self, ticks: u32) -> Cycle {
        self.credit(ticks);
        self.stats.priority_cycles += 1;

        let ts = self.timestamp();
        let hooks = self.hooks;
        let mut dispatched = 0;

        for task in self.store.priority_tasks_mut() {
            if !task.is_due() {
                continue;
            }

            let elapsed = task.elapsed;
            match hooks {
                Some(hooks) => hooks.measure(|| task.code.invoke(elapsed)),
                None => task.code.invoke(elapsed),
            }
            task.elapsed = 0;
            task.runs = task.runs.saturating_add(1);
            dispatched += 1;

            log_trace!(self.log, ts, MODULE_DISPATCH, "ran {} after {} ticks", task.id, elapsed);
        }

        self.stats.priority_dispatches += dispatched as u64;
        Cycle::Priority { ticks, dispatched }
    }

    fn run_idle(&mut self) -> Cycle {
        self.stats.idle_cycles += 1;

        let idle = self.store.idle_tasks_mut();
        for task in idle.iter_mut() {
            task.code.invoke(0);
            task.runs = task.runs.saturating_add(1);
        }

        let dispatched = idle.len();
        self.stats.idle_dispatches += dispatched as u64;
        Cycle::Idle { dispatched }
    }

    /// Account for drained ticks
    fn credit(&mut self, ticks: u32) {
        self.store.credit_elapsed(ticks);
        self.stats.total_ticks = self.stats.total_ticks + u64::from(ticks);
    }

    fn timestamp(&self) -> u32 {
        self.stats.total_ticks.as_timestamp()
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Scheduler statistics
    #[must_use]
    pub const fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    /// Recent scheduler events
    #[must_use]
    pub const fn log(&self) -> &LogBuffer {
        &self.log
    }

    /// Registered tasks
    #[must_use]
    pub const fn store(&self) -> &TaskStore<'a> {
        &self.store
    }

    /// Registered timing hooks
    #[must_use]
    pub const fn timing_hooks(&self) -> Option<&TimingHooks> {
        self.hooks.as_ref()
    }
}

impl core::fmt::Debug for Scheduler<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state)
            .field("store", &self.store)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
