use std::time::Duration;

/// Outcome of running one slice of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Pending,
    Done,
}

pub trait Task: Send {
    fn run(&mut self) -> Progress;
    fn output(&self) -> String;
}

/// Registers a list of modules, one per slice.
pub struct RegistrationTask {
    modules: Vec<String>,
    registered: usize,
    work: Duration,
}

impl RegistrationTask {
    pub fn new(modules: Vec<String>, work: Duration) -> Self {
        Self {
            modules,
            registered: 0,
            work,
        }
    }
}

impl Task for RegistrationTask {
    fn run(&mut self) -> Progress {
        if self.registered < self.modules.len() {
            std::thread::sleep(self.work);
            self.registered += 1;
        }

        if self.registered >= self.modules.len() {
            Progress::Done
        } else {
            Progress::Pending
        }
    }

    fn output(&self) -> String {
        match self.registered.checked_sub(1).and_then(|i| self.modules.get(i)) {
            Some(module) => format!("{}/{} {module}", self.registered, self.modules.len()),
            None => format!("0/{}", self.modules.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_one_module_per_slice() {
        let mut task = RegistrationTask::new(
            vec!["CI583".to_owned(), "CI585".to_owned()],
            Duration::ZERO,
        );
        assert_eq!(task.output(), "0/2");

        assert_eq!(task.run(), Progress::Pending);
        assert_eq!(task.output(), "1/2 CI583");
        assert_eq!(task.run(), Progress::Done);
        assert_eq!(task.output(), "2/2 CI585");
    }

    #[test]
    fn test_empty_task_is_done_immediately() {
        let mut task = RegistrationTask::new(Vec::new(), Duration::ZERO);
        assert_eq!(task.run(), Progress::Done);
    }
}
