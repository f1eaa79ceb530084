use super::{
    error::{Operation, SchedulerError},
    process::{invalid_transition, Priority, Process, ProcessState},
};
use std::sync::{Mutex, PoisonError};

/// A process with no real work behind it: it terminates after a fixed
/// number of `start`/`interrupt` calls, which makes runs reproducible.
pub struct ScriptedProcess {
    name: String,
    priority: i32,
    steps: u32,
    script: Mutex<Script>,
}

struct Script {
    state: ProcessState,
    transitions: u32,
}

impl ScriptedProcess {
    pub fn new(name: &str, steps: u32) -> Self {
        ScriptedProcess::with_priority(name, Priority::MEDIUM, steps)
    }

    /// `steps` is clamped to at least one.
    pub fn with_priority(name: &str, priority: i32, steps: u32) -> Self {
        Self {
            name: name.to_owned(),
            priority,
            steps: steps.max(1),
            script: Mutex::new(Script {
                state: ProcessState::New,
                transitions: 0,
            }),
        }
    }

    /// Number of successful `start`/`interrupt` calls so far.
    pub fn transitions(&self) -> u32 {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .transitions
    }

    fn advance(&self, operation: Operation) -> Result<(), SchedulerError> {
        let mut script = self.script.lock().unwrap_or_else(PoisonError::into_inner);
        let allowed = match operation {
            Operation::Start => script.state == ProcessState::New,
            Operation::Interrupt => script.state != ProcessState::Terminated,
        };
        if !allowed {
            return Err(invalid_transition(self, script.state, operation));
        }

        script.transitions += 1;
        script.state = if script.transitions >= self.steps {
            ProcessState::Terminated
        } else {
            ProcessState::Running
        };
        Ok(())
    }
}

impl Process for ScriptedProcess {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn state(&self) -> ProcessState {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state
    }

    fn start(&self) -> Result<(), SchedulerError> {
        self.advance(Operation::Start)
    }

    fn interrupt(&self) -> Result<(), SchedulerError> {
        self.advance(Operation::Interrupt)
    }
}
