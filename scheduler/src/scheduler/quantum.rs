use std::{
    sync::{Arc, Condvar, Mutex, PoisonError},
    time::{Duration, Instant},
};

/// The pause was cut short by a wake signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptedWait;

/// Blocks the scheduler for the length of a quantum.
pub trait Waiter: Send + Sync {
    fn pause(&self, quantum: Duration) -> Result<(), InterruptedWait>;
}

/// Returns immediately. Useful with a zero quantum in tests.
pub struct NoDelay;

impl Waiter for NoDelay {
    fn pause(&self, _quantum: Duration) -> Result<(), InterruptedWait> {
        Ok(())
    }
}

#[derive(Default)]
struct Signal {
    raised: Mutex<bool>,
    wake: Condvar,
}

/// Sleeps on a condvar so that the pause can be ended early through a
/// [`WakeHandle`].
#[derive(Default)]
pub struct SleepWaiter {
    signal: Arc<Signal>,
}

/// Cuts the current (or next) pause of a [`SleepWaiter`] short.
#[derive(Clone)]
pub struct WakeHandle {
    signal: Arc<Signal>,
}

impl SleepWaiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waker(&self) -> WakeHandle {
        WakeHandle {
            signal: Arc::clone(&self.signal),
        }
    }
}

impl WakeHandle {
    pub fn wake(&self) {
        *self
            .signal
            .raised
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = true;
        self.signal.wake.notify_all();
    }
}

impl Waiter for SleepWaiter {
    fn pause(&self, quantum: Duration) -> Result<(), InterruptedWait> {
        let deadline = Instant::now() + quantum;
        let mut raised = self
            .signal
            .raised
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        loop {
            if *raised {
                *raised = false;
                return Err(InterruptedWait);
            }
            let remaining = match deadline.checked_duration_since(Instant::now()) {
                Some(remaining) if !remaining.is_zero() => remaining,
                _ => return Ok(()),
            };
            raised = self
                .signal
                .wake
                .wait_timeout(raised, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

/// A fixed quantum together with the waiter that enforces it.
#[derive(Clone)]
pub struct QuantumTimer {
    quantum: Duration,
    waiter: Arc<dyn Waiter>,
}

impl QuantumTimer {
    pub fn new(quantum: Duration, waiter: Arc<dyn Waiter>) -> Self {
        Self { quantum, waiter }
    }

    pub fn quantum(&self) -> Duration {
        self.quantum
    }

    /// Pauses for one quantum. An early wake counts as an elapsed quantum.
    pub fn expire(&self) {
        if self.waiter.pause(self.quantum).is_err() {
            log::warn!("Quantum of {:?} interrupted, continuing", self.quantum);
        }
    }
}
