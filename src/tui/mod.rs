//! Terminal host: runs one browser session on top of ratatui.

pub mod editor;
pub mod prompt;
pub mod render;
pub mod view;

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Stdout;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::command::Command;
use crate::config::Config;
use crate::event::{Event, EventSource, map_key};
use crate::fs::LocalFs;
use crate::host::Button;
use crate::path::Path;
use crate::session::Sessions;
use editor::{Outbox, TerminalEditor};
use render::Hint;
use view::TuiView;

pub type Term = Terminal<CrosstermBackend<Stdout>>;

/// Where the session starts, as passed on the command line.
#[derive(Debug)]
pub struct Launch {
  pub workspace: Option<Path>,
  pub document: Option<Path>,
}

fn button_command(button: Button) -> Command {
  match button {
    Button::Actions => Command::Actions,
    Button::StepOut => Command::StepOut,
    Button::StepIn => Command::StepIn,
  }
}

fn hints(buttons: &[Button], keys: &HashMap<Command, Vec<String>>) -> Vec<Hint> {
  buttons
    .iter()
    .filter_map(|&b| {
      let key = keys.get(&button_command(b))?.first()?;
      Some((key.clone(), b.tooltip()))
    })
    .collect()
}

/// Swallows keys while errors are shown; Esc or Enter dismisses them all.
fn dismiss_errors(outbox: &RefCell<Outbox>, key: KeyEvent) -> bool {
  let mut outbox = outbox.borrow_mut();
  if outbox.errors.is_empty() {
    return false;
  }
  if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
    outbox.errors.clear();
  }
  true
}

/// Runs a session until it closes and returns what it left for the shell.
pub fn run(terminal: Rc<RefCell<Term>>, config: &Config, launch: Launch, errors: Vec<String>) -> Result<Outbox> {
  let events = EventSource::new(Duration::from_millis(config.tick_rate_ms));
  let outbox = Rc::new(RefCell::new(Outbox { errors, requests: Vec::new() }));
  let editor = TerminalEditor::new(terminal.clone(), events, outbox.clone(), launch.workspace, launch.document);
  let keys = config.reverse_lookup();

  let mut sessions = Sessions::default();
  let fs = LocalFs::new(config.browser.use_trash);
  if let Err(e) = sessions.open(fs, editor, TuiView::new(), config.browser.clone()) {
    tracing::warn!("session failed to start: {e}");
    outbox.borrow_mut().errors.push(format!("Failed to open the file browser: {e}"));
  }

  while let Some(browser) = sessions.current() {
    let view = browser.view();
    let hints = hints(view.buttons(), &keys);
    {
      let pending = outbox.borrow();
      terminal.borrow_mut().draw(|frame| render::draw(frame, view, &hints, &pending.errors))?;
    }

    let Event::Key(key) = events.next()? else {
      continue;
    };
    if dismiss_errors(&outbox, key) {
      continue;
    }
    let command = map_key(key, config);
    let event = sessions.current_mut().and_then(|b| b.view_mut().apply(command));
    let result = match event {
      Some(event) => sessions.handle(event),
      None if command.is_session_command() => sessions.run(command),
      None => Ok(()),
    };
    if let Err(e) = result {
      tracing::warn!("refresh failed: {e}");
      outbox.borrow_mut().errors.push(format!("Failed to read folder: {e}"));
    }
  }

  // Errors raised by the request that closed the session.
  while !outbox.borrow().errors.is_empty() {
    {
      let pending = outbox.borrow();
      terminal
        .borrow_mut()
        .draw(|frame| render::render_error(&pending.errors, frame.area(), frame.buffer_mut()))?;
    }
    if let Event::Key(key) = events.next()? {
      dismiss_errors(&outbox, key);
    }
  }

  Ok(outbox.take())
}
