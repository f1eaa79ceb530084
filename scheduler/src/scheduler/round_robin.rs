use super::{
    dispatch, Action, Dispatch, Lane, ProcessRef, QuantumTimer, Scheduler, SchedulerConfig,
    SchedulerError, SleepWaiter, Waiter,
};
use std::{collections::VecDeque, sync::Arc};

/// Serves a single FIFO queue, one quantum per step.
pub struct RoundRobinScheduler {
    queue: VecDeque<ProcessRef>,
    completed: Vec<ProcessRef>,
    timer: QuantumTimer,
    draining: bool,
}

impl RoundRobinScheduler {
    const TAG: &'static str = "RR";

    pub fn new(config: &SchedulerConfig) -> Self {
        RoundRobinScheduler::with_waiter(config, Arc::new(SleepWaiter::new()))
    }

    pub fn with_waiter(config: &SchedulerConfig, waiter: Arc<dyn Waiter>) -> Self {
        Self {
            queue: VecDeque::new(),
            completed: Vec::new(),
            timer: QuantumTimer::new(config.quantum, waiter),
            draining: false,
        }
    }
}

impl Scheduler for RoundRobinScheduler {
    fn name(&self) -> &'static str {
        "Round Robin Scheduler"
    }

    fn enqueue(&mut self, process: ProcessRef) -> Result<(), SchedulerError> {
        dispatch::admit(&process, self.draining, self.queue.iter())?;
        self.queue.push_back(process);
        Ok(())
    }

    fn step(&mut self) -> Option<Dispatch> {
        let Some(process) = self.queue.pop_front() else {
            self.draining = false;
            return None;
        };
        self.draining = true;

        let action = dispatch::drive(Self::TAG, Lane::Ready, &process, &self.timer);
        match action {
            Action::Completed => self.completed.push(Arc::clone(&process)),
            _ => self.queue.push_back(Arc::clone(&process)),
        }

        Some(Dispatch {
            process,
            lane: Lane::Ready,
            action,
        })
    }

    fn queued(&self) -> Vec<(Lane, ProcessRef)> {
        self.queue
            .iter()
            .map(|process| (Lane::Ready, Arc::clone(process)))
            .collect()
    }

    fn completed(&self) -> &[ProcessRef] {
        &self.completed
    }

    fn take_completed(&mut self) -> Vec<ProcessRef> {
        std::mem::take(&mut self.completed)
    }

    fn quantum(&self) -> &QuantumTimer {
        &self.timer
    }
}
