use super::{
    dispatch, Action, Dispatch, Lane, ProcessRef, QuantumTimer, Scheduler, SchedulerConfig,
    SchedulerError, SleepWaiter, Waiter,
};
use std::{cmp::Ordering, collections::BinaryHeap, sync::Arc};

/// A queued process with its tie-break sequence number.
struct Entry {
    priority: i32,
    sequence: u64,
    process: ProcessRef,
}

impl Entry {
    fn key(&self) -> (i32, u64) {
        (self.priority, self.sequence)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so the max-heap yields the lowest priority value, then the
    // earliest insert.
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}

/// Always serves the process with the lowest priority value.
///
/// Every insert, including a requeue, draws a fresh sequence number, so
/// processes of equal priority keep FIFO order and a requeued process lands
/// behind its peers.
pub struct PriorityScheduler {
    queue: BinaryHeap<Entry>,
    next_sequence: u64,
    completed: Vec<ProcessRef>,
    timer: QuantumTimer,
    draining: bool,
}

impl PriorityScheduler {
    const TAG: &'static str = "P";

    pub fn new(config: &SchedulerConfig) -> Self {
        PriorityScheduler::with_waiter(config, Arc::new(SleepWaiter::new()))
    }

    pub fn with_waiter(config: &SchedulerConfig, waiter: Arc<dyn Waiter>) -> Self {
        Self {
            queue: BinaryHeap::new(),
            next_sequence: 0,
            completed: Vec::new(),
            timer: QuantumTimer::new(config.quantum, waiter),
            draining: false,
        }
    }

    fn push(&mut self, process: ProcessRef) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push(Entry {
            priority: process.priority(),
            sequence,
            process,
        });
    }
}

impl Scheduler for PriorityScheduler {
    fn name(&self) -> &'static str {
        "Priority Scheduler"
    }

    fn enqueue(&mut self, process: ProcessRef) -> Result<(), SchedulerError> {
        dispatch::admit(
            &process,
            self.draining,
            self.queue.iter().map(|entry| &entry.process),
        )?;
        self.push(process);
        Ok(())
    }

    fn step(&mut self) -> Option<Dispatch> {
        let Some(Entry { process, .. }) = self.queue.pop() else {
            self.draining = false;
            return None;
        };
        self.draining = true;

        let action = dispatch::drive(Self::TAG, Lane::Ready, &process, &self.timer);
        match action {
            Action::Completed => self.completed.push(Arc::clone(&process)),
            _ => self.push(Arc::clone(&process)),
        }

        Some(Dispatch {
            process,
            lane: Lane::Ready,
            action,
        })
    }

    fn queued(&self) -> Vec<(Lane, ProcessRef)> {
        let mut entries: Vec<&Entry> = self.queue.iter().collect();
        entries.sort_by_key(|entry| entry.key());
        entries
            .into_iter()
            .map(|entry| (Lane::Ready, Arc::clone(&entry.process)))
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
