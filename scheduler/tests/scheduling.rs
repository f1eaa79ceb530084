use modreg_scheduler::scheduler::{
    build_scheduler, Action, ModuleRegister, NoDelay, Policy, Process, ProcessRef, ProcessState,
    RegistrationTask, Scheduler, SchedulerConfig, SchedulerError, ScriptedProcess,
};
use std::{collections::HashSet, sync::Arc, time::Duration};

const POLICIES: [Policy; 3] = [Policy::RoundRobin, Policy::Priority, Policy::Mlfq];

fn scheduler(policy: Policy) -> Box<dyn Scheduler> {
    build_scheduler(
        policy,
        &SchedulerConfig::new(Duration::ZERO),
        Arc::new(NoDelay),
    )
}

fn scripted(cases: &[(&str, i32, u32)]) -> Vec<Arc<ScriptedProcess>> {
    cases
        .iter()
        .map(|&(name, priority, steps)| {
            Arc::new(ScriptedProcess::with_priority(name, priority, steps))
        })
        .collect()
}

fn names(processes: &[ProcessRef]) -> Vec<String> {
    processes
        .iter()
        .map(|process| process.name().to_owned())
        .collect()
}

#[test]
fn test_every_process_completes_exactly_once() {
    let cases = [
        ("A", 3, 4),
        ("B", 1, 1),
        ("C", 7, 2),
        ("D", 1, 6),
        ("E", 2, 3),
    ];

    for policy in POLICIES {
        let processes = scripted(&cases);
        let mut scheduler = scheduler(policy);
        for process in &processes {
            scheduler.enqueue(process.clone()).unwrap();
        }

        let completed = scheduler.run_to_completion();
        let mut seen = names(&completed);
        seen.sort();
        assert_eq!(seen, ["A", "B", "C", "D", "E"], "{policy:?}");

        for (process, &(_, _, steps)) in processes.iter().zip(&cases) {
            assert_eq!(process.state(), ProcessState::Terminated);
            // Nothing was started or interrupted after it terminated.
            assert_eq!(process.transitions(), steps, "{policy:?}");
        }
        assert!(scheduler.queued().is_empty());
        assert!(scheduler.completed().is_empty());
    }
}

#[test]
fn test_completed_processes_are_the_enqueued_references() {
    for policy in POLICIES {
        let process: ProcessRef = Arc::new(ScriptedProcess::new("only", 2));
        let mut scheduler = scheduler(policy);
        scheduler.enqueue(Arc::clone(&process)).unwrap();

        let completed = scheduler.run_to_completion();
        assert_eq!(completed.len(), 1);
        assert!(Arc::ptr_eq(&completed[0], &process));
    }
}

#[test]
fn test_no_process_is_held_twice() {
    let cases = [("A", 2, 3), ("B", 2, 2), ("C", 1, 4), ("D", 5, 1)];

    for policy in POLICIES {
        let mut scheduler = scheduler(policy);
        for process in scripted(&cases) {
            scheduler.enqueue(process).unwrap();
        }

        while let Some(dispatch) = scheduler.step() {
            let queued = scheduler.queued();
            let unique: HashSet<_> = queued
                .iter()
                .map(|(_, process)| process.name().to_owned())
                .collect();
            assert_eq!(unique.len(), queued.len(), "{policy:?}");
            assert_eq!(
                queued.len() + scheduler.completed().len(),
                cases.len(),
                "{policy:?}"
            );

            let retired = dispatch.action == Action::Completed;
            let requeued = queued
                .iter()
                .any(|(_, process)| Arc::ptr_eq(process, &dispatch.process));
            assert_ne!(retired, requeued, "{policy:?}");
        }
    }
}

#[test]
fn test_round_robin_scenario() {
    let mut rr = scheduler(Policy::RoundRobin);
    for process in scripted(&[("A", 5, 2), ("B", 5, 1)]) {
        rr.enqueue(process).unwrap();
    }
    assert_eq!(names(&rr.run_to_completion()), ["B", "A"]);
}

#[test]
fn test_round_robin_equal_work_keeps_enqueue_order() {
    let mut rr = scheduler(Policy::RoundRobin);
    for process in scripted(&[("P1", 9, 4), ("P2", 1, 4), ("P3", 5, 4)]) {
        rr.enqueue(process).unwrap();
    }
    assert_eq!(names(&rr.run_to_completion()), ["P1", "P2", "P3"]);
}

#[test]
fn test_priority_scenario() {
    let mut p = scheduler(Policy::Priority);
    for process in scripted(&[("P1", 1, 1), ("P2", 1, 1), ("P3", 0, 1)]) {
        p.enqueue(process).unwrap();
    }
    assert_eq!(names(&p.run_to_completion()), ["P3", "P1", "P2"]);
}

#[test]
fn test_priority_equal_peers_are_served_in_enqueue_order() {
    let mut p = scheduler(Policy::Priority);
    for process in scripted(&[("a", 2, 2), ("b", 2, 2), ("c", 2, 2)]) {
        p.enqueue(process).unwrap();
    }

    let served: Vec<_> = std::iter::from_fn(|| p.step())
        .map(|dispatch| dispatch.process.name().to_owned())
        .collect();
    assert_eq!(served, ["a", "b", "c", "a", "b", "c", "a", "b", "c"]);
}

#[test]
fn test_misuse_is_rejected_by_every_policy() {
    for policy in POLICIES {
        let mut scheduler = scheduler(policy);
        let first: ProcessRef = Arc::new(ScriptedProcess::new("first", 2));
        scheduler.enqueue(Arc::clone(&first)).unwrap();
        assert_eq!(
            scheduler.enqueue(Arc::clone(&first)),
            Err(SchedulerError::AlreadyQueued("first".to_owned()))
        );

        let started: ProcessRef = Arc::new(ScriptedProcess::new("started", 2));
        started.start().unwrap();
        assert!(matches!(
            scheduler.enqueue(started),
            Err(SchedulerError::NotNew {
                state: ProcessState::Running,
                ..
            })
        ));

        scheduler.step();
        assert_eq!(
            scheduler.enqueue(Arc::new(ScriptedProcess::new("late", 1))),
            Err(SchedulerError::Draining("late".to_owned()))
        );
        assert_eq!(names(&scheduler.run_to_completion()), ["first"]);
    }
}

#[test]
fn test_threaded_registrations_complete_under_every_policy() {
    for policy in POLICIES {
        let mut scheduler = scheduler(policy);
        for i in 0..4_i32 {
            let modules = (0..=i).map(|m| format!("CI{}", 580 + m)).collect();
            let task = RegistrationTask::new(modules, Duration::ZERO);
            let process = ModuleRegister::new(&format!("Module {i}"), 4 - i, Box::new(task));
            scheduler.enqueue(Arc::new(process)).unwrap();
        }

        let completed = scheduler.run_to_completion();
        let mut seen = names(&completed);
        seen.sort();
        assert_eq!(
            seen,
            ["Module 0", "Module 1", "Module 2", "Module 3"],
            "{policy:?}"
        );
        assert!(completed
            .iter()
            .all(|process| process.state() == ProcessState::Terminated));
    }
}
