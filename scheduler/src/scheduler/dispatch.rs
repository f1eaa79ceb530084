use super::{
    error::SchedulerError,
    process::{same_process, ProcessRef, ProcessState},
    quantum::QuantumTimer,
    Action, Lane,
};

/// Checks shared by every policy before a process is queued.
pub(crate) fn admit<'a>(
    process: &ProcessRef,
    draining: bool,
    mut held: impl Iterator<Item = &'a ProcessRef>,
) -> Result<(), SchedulerError> {
    if draining {
        return Err(SchedulerError::Draining(process.name().to_owned()));
    }
    if held.any(|queued| same_process(queued, process)) {
        return Err(SchedulerError::AlreadyQueued(process.name().to_owned()));
    }
    match process.state() {
        ProcessState::New => Ok(()),
        state => Err(SchedulerError::NotNew {
            process: process.name().to_owned(),
            state,
        }),
    }
}

/// Runs the state branch of a scheduling step for `process`.
///
/// A new process is started and an in-flight one interrupted, each followed
/// by one quantum. A terminated process is left alone and reported as
/// [`Action::Completed`]; the caller retires it.
pub(crate) fn drive(tag: &str, lane: Lane, process: &ProcessRef, timer: &QuantumTimer) -> Action {
    let (action, result) = match process.state() {
        ProcessState::Terminated => {
            log::info!("[{tag}] {lane} -> completed {}", process.name());
            return Action::Completed;
        }
        ProcessState::New => (Action::Started, process.start()),
        ProcessState::Running | ProcessState::Waiting => {
            (Action::Interrupted, process.interrupt())
        }
    };

    log::debug!("[{tag}] {lane} -> {action} {}", process.name());
    if let Err(err) = result {
        // The process finished between the state read and the interrupt.
        log::warn!("[{tag}] {err}");
    }
    timer.expire();
    action
}
