// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Integration tests for cadence-sched
//!
//! These tests drive the scheduler the way firmware does: a tick source
//! shared by reference, tasks registered up front, and the dispatcher
//! polled one cycle at a time on the host.

mod store_tests {
    use cadence_sched::{ArgValue, Error, Task, TaskCode, TaskId, TaskPriority, TaskStore};

    static TOKENS: [u8; 8] = [0; 8];

    fn body(_: ArgValue) {}

    fn task(id: u8, priority: TaskPriority) -> Task {
        Task::new(
            TaskId::new(id),
            TaskCode::with_ref(body, &TOKENS[usize::from(id)]),
            10,
            priority,
        )
    }

    #[test]
    fn test_capacity_four_overflow() {
        let mut storage = [Task::EMPTY; 4];
        let mut store = TaskStore::new(&mut storage);

        for (id, priority) in [
            (0, TaskPriority::Low),
            (1, TaskPriority::Idle),
            (2, TaskPriority::Critical),
            (3, TaskPriority::Normal),
        ] {
            store.add(task(id, priority)).expect("slot available");
        }

        assert_eq!(store.add(task(4, TaskPriority::High)), Err(Error::StoreFull));
        assert_eq!(store.len(), 4);
        assert_eq!(store.check_invariants(), Ok(()));
    }

    #[test]
    fn test_normal_then_idle_counts() {
        let mut storage = [Task::EMPTY; 4];
        let mut store = TaskStore::new(&mut storage);
        store.add(task(0, TaskPriority::Normal)).unwrap();
        store.add(task(1, TaskPriority::Idle)).unwrap();

        assert_eq!(store.priority_count(), 1);
        assert_eq!(store.idle_count(), 1);
        assert_eq!(store.priority_tasks()[0].id, TaskId::new(0));
        assert_eq!(store.idle_tasks()[0].id, TaskId::new(1));
    }

    #[test]
    fn test_reinit_discards_everything() {
        let mut storage = [Task::EMPTY; 4];
        {
            let mut store = TaskStore::new(&mut storage);
            store.add(task(0, TaskPriority::Normal)).unwrap();
            store.init();
            assert!(store.is_empty());
        }
        assert!(storage.iter().all(|slot| !slot.id.is_valid()));
    }
}

mod tick_tests {
    use cadence_sched::TickCounter;

    static TICKS: TickCounter = TickCounter::new();

    #[test]
    fn test_static_counter_from_another_thread() {
        let handle = std::thread::spawn(|| {
            for _ in 0..1000 {
                TICKS.tick();
            }
        });

        let mut drained = 0;
        while !handle.is_finished() {
            drained += TICKS.drain();
        }
        handle.join().expect("ticker thread");
        drained += TICKS.drain();

        // Every increment is observed exactly once
        assert_eq!(drained, 1000);
    }
}

mod scheduler_tests {
    use cadence_common::{Millis, SchedulerConfig};
    use cadence_sched::{
        ArgValue, Cycle, Error, Scheduler, SchedulerState, Task, TaskCode, TaskId, TaskPriority, TickCounter,
    };
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_blink_and_background_work() {
        static LED: AtomicBool = AtomicBool::new(false);
        static TOGGLES: AtomicU32 = AtomicU32::new(0);
        static BACKGROUND: AtomicU32 = AtomicU32::new(0);

        fn blink(arg: ArgValue) {
            if let Some(led) = arg.downcast::<AtomicBool>() {
                led.fetch_xor(true, Ordering::SeqCst);
                TOGGLES.fetch_add(1, Ordering::SeqCst);
            }
        }
        fn background() {
            BACKGROUND.fetch_add(1, Ordering::SeqCst);
        }

        let ticks = TickCounter::new();
        let mut storage = [Task::EMPTY; 4];
        let config = SchedulerConfig::DEFAULT.with_tick_rate(1000);
        let mut sched = Scheduler::with_config(&mut storage, &ticks, config).unwrap();

        let blink_task = Task::every_millis(
            TaskId::new(0),
            TaskCode::with_ref(blink, &LED),
            Millis::new(500),
            TaskPriority::Normal,
            sched.config().tick_frequency(),
        );
        sched.add(blink_task).unwrap();
        sched.add(Task::idle(TaskId::new(1), TaskCode::NoArg(background))).unwrap();
        sched.start().unwrap();

        // 1.5 s of 1 ms ticks, with a spare cycle after each one
        for _ in 0..1500 {
            ticks.tick();
            sched.poll().unwrap();
            assert_eq!(sched.poll(), Ok(Cycle::Idle { dispatched: 1 }));
        }

        assert_eq!(TOGGLES.load(Ordering::SeqCst), 3);
        assert!(LED.load(Ordering::SeqCst));
        assert_eq!(BACKGROUND.load(Ordering::SeqCst), 1500);
        assert_eq!(sched.get(TaskId::new(0)).unwrap().runs, 3);
        assert_eq!(sched.stats().priority_cycles, 1500);
        assert_eq!(sched.stats().idle_dispatches, 1500);
    }

    #[test]
    fn test_idle_tasks_run_once_each_in_stored_order() {
        static ORDER: Mutex<Vec<u8>> = Mutex::new(Vec::new());
        static PRIORITY_RUNS: AtomicU32 = AtomicU32::new(0);

        fn record(id: u8) {
            ORDER.lock().expect("order lock").push(id);
        }
        fn idle_1() {
            record(1);
        }
        fn idle_2() {
            record(2);
        }
        fn idle_3() {
            record(3);
        }
        fn periodic() {
            PRIORITY_RUNS.fetch_add(1, Ordering::SeqCst);
        }

        let ticks = TickCounter::new();
        let mut storage = [Task::EMPTY; 4];
        let mut sched = Scheduler::new(&mut storage, &ticks);
        sched.add(Task::idle(TaskId::new(1), TaskCode::NoArg(idle_1))).unwrap();
        sched
            .add(Task::new(TaskId::new(9), TaskCode::NoArg(periodic), 1, TaskPriority::Normal))
            .unwrap();
        sched.add(Task::idle(TaskId::new(2), TaskCode::NoArg(idle_2))).unwrap();
        sched.add(Task::idle(TaskId::new(3), TaskCode::NoArg(idle_3))).unwrap();
        sched.remove(TaskId::new(2)).unwrap();

        assert_eq!(sched.poll(), Ok(Cycle::Idle { dispatched: 2 }));
        assert_eq!(ORDER.lock().unwrap().as_slice(), &[1, 3]);

        assert_eq!(sched.poll(), Ok(Cycle::Idle { dispatched: 2 }));
        assert_eq!(ORDER.lock().unwrap().as_slice(), &[1, 3, 1, 3]);
        assert_eq!(PRIORITY_RUNS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_late_poll_runs_each_due_task_once() {
        static FAST: AtomicU32 = AtomicU32::new(0);
        static SLOW: AtomicU32 = AtomicU32::new(0);

        fn fast() {
            FAST.fetch_add(1, Ordering::SeqCst);
        }
        fn slow() {
            SLOW.fetch_add(1, Ordering::SeqCst);
        }

        let ticks = TickCounter::new();
        let mut storage = [Task::EMPTY; 4];
        let mut sched = Scheduler::new(&mut storage, &ticks);
        sched
            .add(Task::new(TaskId::new(0), TaskCode::NoArg(fast), 2, TaskPriority::High))
            .unwrap();
        sched
            .add(Task::new(TaskId::new(1), TaskCode::NoArg(slow), 50, TaskPriority::Low))
            .unwrap();
        sched.start().unwrap();

        // A long task or a sleep let 20 ticks pile up
        ticks.add_ticks(20);
        assert_eq!(sched.poll(), Ok(Cycle::Priority { ticks: 20, dispatched: 1 }));

        assert_eq!(FAST.load(Ordering::SeqCst), 1);
        assert_eq!(SLOW.load(Ordering::SeqCst), 0);
        assert_eq!(sched.get(TaskId::new(1)).unwrap().elapsed, 20);
    }

    #[test]
    fn test_mutation_between_cycles() {
        static RUNS: AtomicU32 = AtomicU32::new(0);

        fn counted() {
            RUNS.fetch_add(1, Ordering::SeqCst);
        }

        let ticks = TickCounter::new();
        let mut storage = [Task::EMPTY; 2];
        let mut sched = Scheduler::new(&mut storage, &ticks);
        sched
            .add(Task::new(TaskId::new(0), TaskCode::NoArg(counted), 1, TaskPriority::Normal))
            .unwrap();

        // The implicit start on the first poll discards this tick
        ticks.tick();
        sched.poll().unwrap();
        ticks.tick();
        sched.poll().unwrap();
        assert_eq!(RUNS.load(Ordering::SeqCst), 1);

        sched.remove(TaskId::new(0)).unwrap();
        ticks.tick();
        assert_eq!(sched.poll(), Ok(Cycle::Priority { ticks: 1, dispatched: 0 }));
        assert_eq!(RUNS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_halted_scheduler_reports_through_run() {
        fn body() {}

        let ticks = TickCounter::new();
        let mut storage = [Task::EMPTY; 2];
        let mut sched = Scheduler::with_config(&mut storage, &ticks, SchedulerConfig::DEBUG).unwrap();
        sched.add(Task::idle(TaskId::new(0), TaskCode::NoArg(body))).unwrap();

        assert_eq!(sched.run(), Error::TimingHooksMissing);
        assert_eq!(sched.state(), SchedulerState::Halted(Error::TimingHooksMissing));
        assert!(sched.log().iter().any(|entry| entry.message.contains("halted")));
    }

    #[test]
    fn test_empty_scheduler_polls_idle() {
        let ticks = TickCounter::new();
        let mut storage = [Task::EMPTY; 0];
        let mut sched = Scheduler::new(&mut storage, &ticks);

        assert_eq!(sched.poll(), Ok(Cycle::Idle { dispatched: 0 }));
        ticks.tick();
        assert_eq!(sched.poll(), Ok(Cycle::Priority { ticks: 1, dispatched: 0 }));
    }
}
