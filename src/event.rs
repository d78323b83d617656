use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::command::Command;
use crate::config::{Config, normalize_key_event};

pub enum Event {
  Key(KeyEvent),
  Resize(u16, u16),
  Tick,
}

/// Blocking terminal event reader. Prompts and the main loop share it, so
/// every keystroke is consumed by exactly one of them.
#[derive(Debug, Clone, Copy)]
pub struct EventSource {
  tick_rate: Duration,
}

impl EventSource {
  pub fn new(tick_rate: Duration) -> Self {
    Self { tick_rate }
  }

  /// Waits up to one tick for the next key press or resize.
  pub fn next(&self) -> Result<Event> {
    if !event::poll(self.tick_rate)? {
      return Ok(Event::Tick);
    }
    match event::read()? {
      CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
      CrosstermEvent::Resize(w, h) => Ok(Event::Resize(w, h)),
      _ => Ok(Event::Tick),
    }
  }

  /// Discards input that queued up while an external program ran.
  pub fn drain() {
    while event::poll(Duration::ZERO).unwrap_or(false) {
      let _ = event::read();
    }
  }
}

pub fn map_key(key: KeyEvent, config: &Config) -> Command {
  if let Some(command) = config.keys.get(&normalize_key_event(key)) {
    return *command;
  }
  match key.code {
    KeyCode::Char(c) if (key.modifiers - KeyModifiers::SHIFT).is_empty() => Command::Input(c),
    KeyCode::Backspace => Command::Backspace,
    _ => Command::None,
  }
}
