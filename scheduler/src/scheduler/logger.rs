//! `log` backend that keeps the latest lines in memory for the display.
//!
//! With echo enabled every line is also written to stderr, which is what the
//! headless mode uses.

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, PoisonError,
    },
};

const CAPACITY: usize = 128;

struct RingLogger {
    lines: Mutex<VecDeque<String>>,
    echo: AtomicBool,
}

impl RingLogger {
    const fn new() -> Self {
        Self {
            lines: Mutex::new(VecDeque::new()),
            echo: AtomicBool::new(false),
        }
    }

    fn recent(&self, count: usize) -> Vec<String> {
        let lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        let skip = lines.len().saturating_sub(count);
        lines.iter().skip(skip).cloned().collect()
    }
}

impl Log for RingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format!("{:<5} {}", record.level(), record.args());
        if self.echo.load(Ordering::Relaxed) {
            eprintln!("{line}");
        }

        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        if lines.len() == CAPACITY {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    fn flush(&self) {}
}

static LOGGER: RingLogger = RingLogger::new();

pub fn init(level: LevelFilter, echo: bool) -> Result<(), SetLoggerError> {
    LOGGER.echo.store(echo, Ordering::Relaxed);
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// The last `count` lines, oldest first.
pub fn recent(count: usize) -> Vec<String> {
    LOGGER.recent(count)
}
