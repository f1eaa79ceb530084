use super::{logger, runner::RunnerEvent, Scheduler, WakeHandle};
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use std::{
    io::{self, Stdout},
    sync::mpsc::{self, Receiver},
    thread,
    time::{Duration, Instant},
};
use tui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Terminal,
};

pub enum DisplayEvent {
    Input(KeyEvent),
    Tick,
}

const TICK_RATE: Duration = Duration::from_millis(200);
const LOG_LINES: usize = 12;

fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.is_empty() && key.code == KeyCode::Char('q')
}

pub struct DisplayTerminal {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    input_rx: Receiver<DisplayEvent>,
}

impl DisplayTerminal {
    /// `waker` ends the scheduler's current quantum early when `q` is pressed.
    pub fn new(waker: WakeHandle) -> Result<Self, io::Error> {
        crossterm::terminal::enable_raw_mode()?;

        // Input is read on its own thread since the scheduler blocks for a
        // whole quantum on every step.
        let (input_tx, input_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = TICK_RATE
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        if let Ok(Event::Key(key)) = event::read() {
                            if is_quit(&key) {
                                waker.wake();
                            }
                            if input_tx.send(DisplayEvent::Input(key)).is_err() {
                                return;
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(_) => return,
                }

                if last_tick.elapsed() >= TICK_RATE && input_tx.send(DisplayEvent::Tick).is_ok() {
                    last_tick = Instant::now();
                }
            }
        });

        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, input_rx })
    }

    pub fn draw<S>(&mut self, scheduler: &S, status: &str) -> Result<(), io::Error>
    where
        S: Scheduler + ?Sized,
    {
        let queued = scheduler.queued();
        let completed: Vec<String> = scheduler
            .completed()
            .iter()
            .enumerate()
            .map(|(index, process)| format!("{:>2}. {}", index + 1, process.name()))
            .collect();
        let logs = logger::recent(LOG_LINES);
        let title = format!(
            "{} | quantum {} ms",
            scheduler.name(),
            scheduler.quantum().quantum().as_millis()
        );

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(5),
                    Constraint::Length(LOG_LINES as u16 + 2),
                ])
                .split(f.size());

            let current = Paragraph::new(status.to_owned())
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .fg(Color::LightBlue),
                )
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Current Step")
                        .border_type(BorderType::Rounded),
                );

            f.render_widget(current, chunks[0]);

            let middle = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
                .split(chunks[1]);

            let items = queued.iter().map(|(lane, process)| {
                Row::new(vec![
                    Cell::from(lane.to_string())
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from("|"),
                    Cell::from(process.name().to_owned()),
                    Cell::from("|"),
                    Cell::from(process.priority().to_string()),
                    Cell::from("|"),
                    Cell::from(process.state().to_string()),
                ])
            });

            let table = Table::new(items)
                .header(
                    Row::new(vec!["Queue", "|", "Name", "|", "Priority", "|", "State"])
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .widths(&[
                    Constraint::Length(5),
                    Constraint::Length(1),
                    Constraint::Length(20),
                    Constraint::Length(1),
                    Constraint::Length(8),
                    Constraint::Length(1),
                    Constraint::Length(10),
                ])
                .block(Block::default().title(title).borders(Borders::ALL))
                .style(Style::default().fg(Color::LightGreen))
                .column_spacing(1);

            f.render_widget(table, middle[0]);

            let done = Paragraph::new(completed.join("\n"))
                .style(Style::default().fg(Color::LightYellow))
                .block(Block::default().title("Completed").borders(Borders::ALL));

            f.render_widget(done, middle[1]);

            let log = Paragraph::new(logs.join("\n"))
                .block(Block::default().title("Log").borders(Borders::ALL));

            f.render_widget(log, chunks[2]);
        })?;
        Ok(())
    }

    pub fn get_input(&self) -> RunnerEvent {
        // Get the user's input and return a matching event
        match self.input_rx.recv() {
            Ok(DisplayEvent::Input(key)) => {
                if is_quit(&key) {
                    return RunnerEvent::Quit;
                }
                if key.modifiers.is_empty() {
                    match key.code {
                        KeyCode::Char('p') => return RunnerEvent::Pause,
                        KeyCode::Char('r') => return RunnerEvent::Resume,
                        KeyCode::Char('s') => return RunnerEvent::Step,
                        _ => {}
                    };
                }
            }
            Ok(DisplayEvent::Tick) => {}
            Err(_) => return RunnerEvent::Quit,
        }
        RunnerEvent::None
    }
}

impl Drop for DisplayTerminal {
    fn drop(&mut self) {
        let _ = crossterm::terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_quit_requires_a_bare_q() {
        assert!(is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(!is_quit(&KeyEvent::new(
            KeyCode::Char('q'),
            KeyModifiers::CONTROL
        )));
        assert!(!is_quit(&KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE)));
    }
}
