use super::{display::DisplayTerminal, Dispatch, ProcessRef, Scheduler, WakeHandle};
use std::io;

pub enum RunnerEvent {
    Quit,
    Pause,
    Resume,
    Step,
    None,
}

fn describe(dispatch: &Dispatch) -> String {
    let step = format!(
        "{} | {} | {}",
        dispatch.lane,
        dispatch.process.name(),
        dispatch.action
    );
    match dispatch.process.output() {
        Some(output) => format!("{step} | Output: \"{output}\""),
        None => step,
    }
}

/// Drives a scheduler one step per display tick.
pub struct ProcessRunner<S> {
    terminal: DisplayTerminal,
    scheduler: S,
    paused: bool,
    finished: bool,
    last: Option<Dispatch>,
}

impl<S: Scheduler> ProcessRunner<S> {
    /// `waker` must belong to the waiter the scheduler pauses on.
    pub fn new(scheduler: S, waker: WakeHandle) -> Result<Self, io::Error> {
        let terminal = DisplayTerminal::new(waker)?;

        Ok(Self {
            terminal,
            scheduler,
            paused: false,
            finished: false,
            last: None,
        })
    }

    fn run_step(&mut self) {
        if self.finished {
            return;
        }
        match self.scheduler.step() {
            Some(dispatch) => self.last = Some(dispatch),
            None => {
                self.finished = true;
                log::info!(
                    "All {} processes completed",
                    self.scheduler.completed().len()
                );
            }
        }
    }

    fn status(&self) -> String {
        let status = if self.finished {
            format!(
                "All {} processes registered. Press q to quit.",
                self.scheduler.completed().len()
            )
        } else {
            match &self.last {
                Some(dispatch) => describe(dispatch),
                None => "Waiting for the first step.".to_owned(),
            }
        };

        if self.paused {
            format!("{status} (paused: r resume, s step)")
        } else {
            status
        }
    }

    // Returns false if the program should quit
    pub fn run(&mut self) -> Result<bool, io::Error> {
        if !self.paused {
            self.run_step();
        }
        let status = self.status();
        self.terminal.draw(&self.scheduler, &status)?;

        match self.terminal.get_input() {
            RunnerEvent::Quit => return Ok(false),
            RunnerEvent::Pause if !self.paused => self.paused = true,
            RunnerEvent::Resume if self.paused => self.paused = false,
            RunnerEvent::Step if self.paused => self.run_step(),
            _ => {}
        }
        Ok(true)
    }

    /// Processes completed so far, in completion order.
    pub fn into_completed(mut self) -> Vec<ProcessRef> {
        self.scheduler.take_completed()
    }
}
