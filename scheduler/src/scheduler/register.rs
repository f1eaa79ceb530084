use super::{
    error::{Operation, SchedulerError},
    process::{invalid_transition, Process, ProcessState},
    tasks::{Progress, Task},
};
use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    thread,
};

/// A module registration process.
///
/// `start` hands the task to a worker thread which runs it one slice at a
/// time. Between slices the worker parks in [`ProcessState::Waiting`] until
/// the next `interrupt`. The worker marks the process terminated itself once
/// the task is done.
pub struct ModuleRegister {
    name: String,
    priority: i32,
    shared: Arc<Shared>,
    task: Mutex<Option<Box<dyn Task>>>,
}

struct Shared {
    status: Mutex<Status>,
    wake: Condvar,
}

struct Status {
    state: ProcessState,
    wakeups: u64,
    cancelled: bool,
    output: String,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Status> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ModuleRegister {
    pub fn new(name: &str, priority: i32, task: Box<dyn Task>) -> Self {
        let output = task.output();
        Self {
            name: name.to_owned(),
            priority,
            shared: Arc::new(Shared {
                status: Mutex::new(Status {
                    state: ProcessState::New,
                    wakeups: 0,
                    cancelled: false,
                    output,
                }),
                wake: Condvar::new(),
            }),
            task: Mutex::new(Some(task)),
        }
    }
}

fn work(shared: Arc<Shared>, mut task: Box<dyn Task>) {
    loop {
        let progress = task.run();

        let mut status = shared.lock();
        status.output = task.output();
        if progress == Progress::Done {
            status.state = ProcessState::Terminated;
            return;
        }

        status.state = ProcessState::Waiting;
        let seen = status.wakeups;
        while status.wakeups == seen && !status.cancelled {
            status = shared
                .wake
                .wait(status)
                .unwrap_or_else(PoisonError::into_inner);
        }
        if status.cancelled {
            return;
        }
        status.state = ProcessState::Running;
    }
}

impl Process for ModuleRegister {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn state(&self) -> ProcessState {
        self.shared.lock().state
    }

    /// Output of the most recently finished slice.
    fn output(&self) -> Option<String> {
        Some(self.shared.lock().output.clone())
    }

    fn start(&self) -> Result<(), SchedulerError> {
        let mut status = self.shared.lock();
        let task = match status.state {
            ProcessState::New => self
                .task
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
            _ => None,
        };
        let Some(task) = task else {
            return Err(invalid_transition(self, status.state, Operation::Start));
        };
        status.state = ProcessState::Running;
        drop(status);

        let shared = Arc::clone(&self.shared);
        thread::spawn(move || work(shared, task));
        Ok(())
    }

    fn interrupt(&self) -> Result<(), SchedulerError> {
        let mut status = self.shared.lock();
        if status.state == ProcessState::Terminated {
            return Err(invalid_transition(
                self,
                status.state,
                Operation::Interrupt,
            ));
        }
        status.wakeups += 1;
        self.shared.wake.notify_all();
        Ok(())
    }
}

impl Drop for ModuleRegister {
    fn drop(&mut self) {
        // Release a worker still parked between slices.
        self.shared.lock().cancelled = true;
        self.shared.wake.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::RegistrationTask;
    use std::time::{Duration, Instant};

    fn register(modules: usize) -> ModuleRegister {
        let modules = (0..modules).map(|i| format!("CI{}", 500 + i)).collect();
        ModuleRegister::new(
            "Register",
            1,
            Box::new(RegistrationTask::new(modules, Duration::ZERO)),
        )
    }

    fn wait_until(condition: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !condition() {
            assert!(Instant::now() < deadline, "condition never held");
            thread::yield_now();
        }
    }

    fn wait_for(process: &ModuleRegister, wanted: ProcessState) {
        wait_until(|| process.state() == wanted);
    }

    #[test]
    fn test_parks_between_slices_until_interrupted() {
        let process = register(3);
        assert_eq!(process.state(), ProcessState::New);
        assert_eq!(process.output().as_deref(), Some("0/3"));

        process.start().unwrap();
        wait_for(&process, ProcessState::Waiting);
        assert_eq!(process.output().as_deref(), Some("1/3 CI500"));

        process.interrupt().unwrap();
        wait_until(|| process.output().as_deref() == Some("2/3 CI501"));
        wait_for(&process, ProcessState::Waiting);

        process.interrupt().unwrap();
        wait_for(&process, ProcessState::Terminated);
        assert_eq!(process.output().as_deref(), Some("3/3 CI502"));
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let process = register(2);
        process.start().unwrap();
        assert!(matches!(
            process.start(),
            Err(SchedulerError::InvalidTransition {
                operation: Operation::Start,
                ..
            })
        ));
    }

    #[test]
    fn test_interrupt_after_termination_is_rejected() {
        let process = register(1);
        process.start().unwrap();
        wait_for(&process, ProcessState::Terminated);
        assert!(matches!(
            process.interrupt(),
            Err(SchedulerError::InvalidTransition {
                state: ProcessState::Terminated,
                operation: Operation::Interrupt,
                ..
            })
        ));
    }
}
