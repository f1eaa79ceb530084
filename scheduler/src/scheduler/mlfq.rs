use super::{
    dispatch, Action, Dispatch, Lane, ProcessRef, QuantumTimer, Scheduler, SchedulerConfig,
    SchedulerError, SleepWaiter, Waiter,
};
use std::{collections::VecDeque, sync::Arc};

/// Two-level feedback queue.
///
/// New arrivals join the young queue, which is served first whenever it is
/// non-empty. After every step that does not retire it, a process moves to
/// the queue it was not drawn from, so an old process gets served as soon as
/// the young queue drains.
pub struct MlfqScheduler {
    young: VecDeque<ProcessRef>,
    old: VecDeque<ProcessRef>,
    completed: Vec<ProcessRef>,
    timer: QuantumTimer,
    draining: bool,
}

impl MlfqScheduler {
    const TAG: &'static str = "MLFQ";

    pub fn new(config: &SchedulerConfig) -> Self {
        MlfqScheduler::with_waiter(config, Arc::new(SleepWaiter::new()))
    }

    pub fn with_waiter(config: &SchedulerConfig, waiter: Arc<dyn Waiter>) -> Self {
        Self {
            young: VecDeque::new(),
            old: VecDeque::new(),
            completed: Vec::new(),
            timer: QuantumTimer::new(config.quantum, waiter),
            draining: false,
        }
    }

    fn select(&mut self) -> Option<(Lane, ProcessRef)> {
        match self.young.pop_front() {
            Some(process) => Some((Lane::Young, process)),
            None => self.old.pop_front().map(|process| (Lane::Old, process)),
        }
    }
}

impl Scheduler for MlfqScheduler {
    fn name(&self) -> &'static str {
        "Multi-Level Feedback Queue Scheduler"
    }

    fn enqueue(&mut self, process: ProcessRef) -> Result<(), SchedulerError> {
        dispatch::admit(
            &process,
            self.draining,
            self.young.iter().chain(self.old.iter()),
        )?;
        self.young.push_back(process);
        Ok(())
    }

    fn step(&mut self) -> Option<Dispatch> {
        let Some((lane, process)) = self.select() else {
            self.draining = false;
            return None;
        };
        self.draining = true;

        let action = dispatch::drive(Self::TAG, lane, &process, &self.timer);
        match (action, lane) {
            (Action::Completed, _) => self.completed.push(Arc::clone(&process)),
            (_, Lane::Old) => self.young.push_back(Arc::clone(&process)),
            _ => self.old.push_back(Arc::clone(&process)),
        }

        Some(Dispatch {
            process,
            lane,
            action,
        })
    }

    fn queued(&self) -> Vec<(Lane, ProcessRef)> {
        let young = self.young.iter().map(|p| (Lane::Young, Arc::clone(p)));
        let old = self.old.iter().map(|p| (Lane::Old, Arc::clone(p)));
        young.chain(old).collect()
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
