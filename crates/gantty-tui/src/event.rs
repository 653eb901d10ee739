//! Terminal event pump.
//!
//! Crossterm input is blocking, so a dedicated thread polls the
//! terminal and forwards key, mouse and resize events over a channel.
//! When a poll window lapses with no input the thread emits a tick
//! instead; ticks drive the spinner and notice expiry.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
    Resize(u16, u16),
}

/// Receiving side of the input pump.
pub struct EventHandler {
    events: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Start the input thread. `tick_rate_ms` bounds how long the pump
    /// waits for input before emitting [`Event::Tick`].
    pub fn new(tick_rate_ms: u64) -> Self {
        let (sender, events) = mpsc::unbounded_channel();
        std::thread::spawn(move || pump(&sender, Duration::from_millis(tick_rate_ms)));
        Self { events }
    }

    /// The next event, or `None` once the input thread has shut down.
    pub async fn next(&mut self) -> Option<Event> {
        self.events.recv().await
    }
}

/// Blocking poll loop. Ends when the receiver goes away or the
/// terminal stops answering polls.
fn pump(sender: &mpsc::UnboundedSender<Event>, tick_rate: Duration) {
    loop {
        let event = match event::poll(tick_rate) {
            Ok(true) => match event::read() {
                Ok(CrosstermEvent::Key(key)) => Event::Key(key),
                Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
                Ok(CrosstermEvent::Resize(width, height)) => Event::Resize(width, height),
                Ok(_) => continue,
                Err(_) => return,
            },
            Ok(false) => Event::Tick,
            Err(_) => return,
        };
        if sender.send(event).is_err() {
            return;
        }
    }
}

/// A command produced by the key map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    AddRow,
    RemoveRow,
    ClearAll,
    Generate,
    Save,
    Reload,
    Import,
    Export,
    Settings,
    Back,
    Select,
    Up,
    Down,
    Left,
    Right,
    NextField,
    PrevField,
    StepForward,
    StepBack,
    None,
}

/// Map a key event to an action. Ctrl+C quits from anywhere; plain
/// letters are only commands while no text input is open (the run loop
/// routes keys to the input first).
pub fn key_to_action(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') => Action::Help,
        KeyCode::Char('a') => Action::AddRow,
        KeyCode::Char('d') => Action::RemoveRow,
        KeyCode::Char('c') => Action::ClearAll,
        KeyCode::Char('g') => Action::Generate,
        KeyCode::Char('w') => Action::Save,
        KeyCode::Char('r') => Action::Reload,
        KeyCode::Char('i') => Action::Import,
        KeyCode::Char('e') => Action::Export,
        KeyCode::Char('s') => Action::Settings,
        KeyCode::Char('+' | '=') => Action::StepForward,
        KeyCode::Char('-') => Action::StepBack,
        KeyCode::Esc => Action::Back,
        KeyCode::Enter => Action::Select,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Left | KeyCode::Char('h') => Action::Left,
        KeyCode::Right | KeyCode::Char('l') => Action::Right,
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                Action::PrevField
            } else {
                Action::NextField
            }
        }
        // Most terminals report Shift+Tab as BackTab
        KeyCode::BackTab => Action::PrevField,
        _ => Action::None,
    }
}
