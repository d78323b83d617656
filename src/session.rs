//! Registry of the one live browser session.

use crate::browser::Browser;
use crate::command::Command;
use crate::config::BrowserOptions;
use crate::error::FsError;
use crate::fs::FileSystem;
use crate::host::{Editor, PickList, ViewEvent};
use crate::path::Path;

/// Where a new session starts: the active document's folder with the
/// document preselected, else the workspace root, else home, else `/`.
pub fn start_location(editor: &impl Editor) -> (Path, Option<String>) {
  if let Some(mut document) = editor.active_document()
    && !document.at_top()
  {
    let file = document.pop();
    return (document, file);
  }
  let start = editor
    .workspace_root()
    .or_else(|| editor.home_dir())
    .unwrap_or_else(|| Path::from_file_path("/"));
  (start, None)
}

pub struct Sessions<F, E, V> {
  active: Option<Browser<F, E, V>>,
}

impl<F, E, V> Default for Sessions<F, E, V> {
  fn default() -> Self {
    Sessions { active: None }
  }
}

impl<F: FileSystem, E: Editor, V: PickList> Sessions<F, E, V> {
  /// Starts a session at [`start_location`], replacing any current one.
  pub fn open(&mut self, fs: F, editor: E, view: V, options: BrowserOptions) -> Result<(), FsError> {
    let (start, file) = start_location(&editor);
    let browser = Browser::open(fs, editor, view, options, start, file)?;
    self.register(browser);
    Ok(())
  }

  pub fn register(&mut self, browser: Browser<F, E, V>) {
    if let Some(mut old) = self.active.replace(browser) {
      old.dispose();
    }
  }

  pub fn clear(&mut self) {
    if let Some(mut old) = self.active.take() {
      old.dispose();
    }
  }

  pub fn current(&self) -> Option<&Browser<F, E, V>> {
    self.active.as_ref()
  }

  pub fn current_mut(&mut self) -> Option<&mut Browser<F, E, V>> {
    self.active.as_mut()
  }

  pub fn is_active(&self) -> bool {
    self.active.is_some()
  }

  /// Runs `command` against the current session. Without one this does
  /// nothing.
  pub fn run(&mut self, command: Command) -> Result<(), FsError> {
    let Some(browser) = self.active.as_mut() else {
      return Ok(());
    };
    let result = browser.run(command);
    self.reap();
    result
  }

  pub fn handle(&mut self, event: ViewEvent) -> Result<(), FsError> {
    let Some(browser) = self.active.as_mut() else {
      return Ok(());
    };
    let result = browser.handle(event);
    self.reap();
    result
  }

  fn reap(&mut self) {
    if self.active.as_ref().is_some_and(Browser::is_disposed) {
      self.active = None;
    }
  }
}
