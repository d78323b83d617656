use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use ratatui::backend::Backend;
use ratatui::{Frame, Terminal};

use super::prompt::{ChoicePrompt, Outcome, TextPrompt};
use super::render;
use crate::error::FsError;
use crate::event::{Event, EventSource};
use crate::host::{Editor, InputBox, ViewColumn};
use crate::path::Path;

/// Work that needs the real terminal back, run after the TUI exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
  /// `$EDITOR path`, or `$EDITOR +LINE path` when a line is given.
  Edit { path: PathBuf, line: Option<String> },
  /// Print the folder so a calling shell can `cd` into it.
  PrintFolder(PathBuf),
}

/// What the editor hands back to the main loop.
#[derive(Debug, Default)]
pub struct Outbox {
  pub errors: Vec<String>,
  pub requests: Vec<HostRequest>,
}

pub struct TerminalEditor<B: Backend> {
  terminal: Rc<RefCell<Terminal<B>>>,
  events: EventSource,
  outbox: Rc<RefCell<Outbox>>,
  workspace: Option<Path>,
  document: Option<Path>,
}

impl<B: Backend> TerminalEditor<B> {
  pub fn new(
    terminal: Rc<RefCell<Terminal<B>>>,
    events: EventSource,
    outbox: Rc<RefCell<Outbox>>,
    workspace: Option<Path>,
    document: Option<Path>,
  ) -> Self {
    Self { terminal, events, outbox, workspace, document }
  }

  fn request(&self, request: HostRequest) {
    tracing::debug!("queued {request:?}");
    self.outbox.borrow_mut().requests.push(request);
  }

  /// Draws `state` and feeds it keys until it settles. Terminal failures
  /// count as a dismissal.
  fn modal<P, T>(
    &self,
    state: &mut P,
    draw: fn(&mut Frame, &P),
    handle: fn(&mut P, crossterm::event::KeyEvent) -> Outcome<T>,
  ) -> Option<T> {
    loop {
      if let Err(e) = self.terminal.borrow_mut().draw(|frame| draw(frame, &*state)) {
        tracing::warn!("prompt draw failed: {e}");
        return None;
      }
      match self.events.next() {
        Ok(Event::Key(key)) => {
          if let Outcome::Done(result) = handle(state, key) {
            return result;
          }
        }
        Ok(_) => {}
        Err(e) => {
          tracing::warn!("prompt input failed: {e}");
          return None;
        }
      }
    }
  }
}

fn detached(path: &Path) -> Result<(), FsError> {
  open::that_detached(path.fs_path())?;
  Ok(())
}

impl<B: Backend> Editor for TerminalEditor<B> {
  fn open_document(&mut self, path: &Path, column: ViewColumn) -> Result<(), FsError> {
    match column {
      ViewColumn::Active => {
        self.request(HostRequest::Edit { path: path.fs_path(), line: None });
        Ok(())
      }
      ViewColumn::Beside => detached(path),
    }
  }

  fn open_untitled(&mut self, path: &Path) -> Result<(), FsError> {
    self.request(HostRequest::Edit { path: path.fs_path(), line: None });
    Ok(())
  }

  fn open_folder(&mut self, path: &Path, new_window: bool) -> Result<(), FsError> {
    if new_window {
      return detached(path);
    }
    self.request(HostRequest::PrintFolder(path.fs_path()));
    Ok(())
  }

  fn goto_line(&mut self, target: &str) -> Result<(), FsError> {
    let Some(document) = &self.document else {
      return Err(FsError::Unknown("no active document".to_string()));
    };
    let line = target.split(':').next().unwrap_or_default().trim();
    if line.is_empty() || line.parse::<u32>().is_err() {
      return Err(FsError::Unknown(format!("\"{target}\" is not a line number")));
    }
    self.request(HostRequest::Edit { path: document.fs_path(), line: Some(line.to_string()) });
    Ok(())
  }

  fn search_symbols(&mut self, _query: &str) -> Result<(), FsError> {
    Err(FsError::Unknown("symbol search is not available in the terminal".to_string()))
  }

  fn show_error(&mut self, message: &str) {
    self.outbox.borrow_mut().errors.push(message.to_string());
  }

  fn show_choice(&mut self, options: &[String]) -> Option<usize> {
    let mut prompt = ChoicePrompt::new(options);
    self.modal(&mut prompt, render::draw_choice, ChoicePrompt::handle_key)
  }

  fn show_text_input(&mut self, input: &InputBox) -> Option<String> {
    let mut prompt = TextPrompt::new(input);
    self.modal(&mut prompt, render::draw_text_prompt, TextPrompt::handle_key)
  }

  fn workspace_folder(&self, path: &Path) -> Option<Path> {
    self.workspace.clone().filter(|ws| path.starts_with(ws))
  }

  fn workspace_root(&self) -> Option<Path> {
    self.workspace.clone()
  }

  fn active_document(&self) -> Option<Path> {
    self.document.clone()
  }

  fn home_dir(&self) -> Option<Path> {
    dirs::home_dir().map(Path::from_file_path)
  }
}
