mod config;
mod dispatch;
mod display;
mod error;
pub mod logger;
mod mlfq;
mod priority;
mod process;
mod quantum;
mod register;
mod round_robin;
mod runner;
mod scripted;
mod tasks;

use std::fmt;

pub use config::{build_scheduler, Policy, RunConfig, SchedulerConfig, DEFAULT_QUANTUM};
pub use error::{ConfigError, Operation, SchedulerError};
pub use mlfq::MlfqScheduler;
pub use priority::PriorityScheduler;
pub use process::{Priority, Process, ProcessRef, ProcessState};
pub use quantum::{InterruptedWait, NoDelay, QuantumTimer, SleepWaiter, WakeHandle, Waiter};
pub use register::ModuleRegister;
pub use round_robin::RoundRobinScheduler;
pub use runner::ProcessRunner;
pub use scripted::ScriptedProcess;
pub use tasks::{Progress, RegistrationTask, Task};

/// The logical queue a process was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// The single queue of the round robin and priority policies.
    Ready,
    Young,
    Old,
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Lane::Ready => "ready",
            Lane::Young => "young",
            Lane::Old => "old",
        };
        f.write_str(label)
    }
}

/// What a scheduling step did to the selected process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Started,
    Interrupted,
    Completed,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Started => "start",
            Action::Interrupted => "interrupt",
            Action::Completed => "complete",
        };
        f.write_str(label)
    }
}

/// Record of one scheduling step.
#[derive(Clone)]
pub struct Dispatch {
    pub process: ProcessRef,
    pub lane: Lane,
    pub action: Action,
}

/// A scheduling policy.
///
/// Processes are handed over with [`Scheduler::enqueue`] and driven with
/// [`Scheduler::step`] until every queue is empty. A process is held in at
/// most one queue position at a time, and leaves the scheduler once it has
/// been observed terminated.
pub trait Scheduler {
    fn name(&self) -> &'static str;

    /// Fails for a process that is already held, one that is not new, or
    /// while a run is in progress.
    fn enqueue(&mut self, process: ProcessRef) -> Result<(), SchedulerError>;

    /// Runs one scheduling step. Returns `None` once every queue is empty.
    fn step(&mut self) -> Option<Dispatch>;

    /// Queued processes in the order they would be served.
    fn queued(&self) -> Vec<(Lane, ProcessRef)>;

    /// Processes observed terminated, in completion order.
    fn completed(&self) -> &[ProcessRef];

    fn take_completed(&mut self) -> Vec<ProcessRef>;

    fn quantum(&self) -> &QuantumTimer;

    /// Steps until every queue is empty and returns the completed processes.
    ///
    /// Does not return if some process never terminates.
    fn run_to_completion(&mut self) -> Vec<ProcessRef> {
        while self.step().is_some() {}
        self.take_completed()
    }
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn enqueue(&mut self, process: ProcessRef) -> Result<(), SchedulerError> {
        (**self).enqueue(process)
    }

    fn step(&mut self) -> Option<Dispatch> {
        (**self).step()
    }

    fn queued(&self) -> Vec<(Lane, ProcessRef)> {
        (**self).queued()
    }

    fn completed(&self) -> &[ProcessRef] {
        (**self).completed()
    }

    fn take_completed(&mut self) -> Vec<ProcessRef> {
        (**self).take_completed()
    }

    fn quantum(&self) -> &QuantumTimer {
        (**self).quantum()
    }
}
