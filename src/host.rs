//! Contracts between the browser core and the editor hosting it.

use crate::error::FsError;
use crate::fs::Entry;
use crate::path::Path;

/// Where a document is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewColumn {
  Active,
  Beside,
}

/// A free-text prompt. `selection` is a half-open range of character
/// indices into `value` that starts out selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBox {
  pub prompt: String,
  pub value: String,
  pub selection: (usize, usize),
}

/// Buttons the picklist offers next to its text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
  Actions,
  StepOut,
  StepIn,
}

impl Button {
  pub const ALL: [Button; 3] = [Button::Actions, Button::StepOut, Button::StepIn];

  pub fn tooltip(self) -> &'static str {
    match self {
      Button::Actions => "Actions on selected folder/file",
      Button::StepOut => "Step out of folder",
      Button::StepIn => "Step into folder",
    }
  }
}

/// Notifications the picklist forwards to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
  TextChanged(String),
  Accept,
  ButtonTriggered(Button),
  /// The user moved the highlight; the index refers to the last item list
  /// handed to [`PickList::set_items`].
  ActiveChanged(Option<usize>),
  Hidden,
}

/// The host's incremental, live-filtered picklist widget.
pub trait PickList {
  fn set_items(&mut self, items: &[Entry]);
  fn set_active(&mut self, active: Option<usize>);
  fn set_value(&mut self, value: &str);
  fn set_title(&mut self, title: &str);
  fn set_placeholder(&mut self, placeholder: &str);
  fn set_buttons(&mut self, buttons: &[Button]);
  fn set_busy(&mut self, busy: bool);
  fn set_enabled(&mut self, enabled: bool);
  fn show(&mut self);
  fn hide(&mut self);
  fn dispose(&mut self);
}

/// Editor-side capabilities: documents, workspace, and modal prompts.
pub trait Editor {
  fn open_document(&mut self, path: &Path, column: ViewColumn) -> Result<(), FsError>;
  /// Opens an unsaved buffer that will be written to `path` on save.
  fn open_untitled(&mut self, path: &Path) -> Result<(), FsError>;
  fn open_folder(&mut self, path: &Path, new_window: bool) -> Result<(), FsError>;
  /// Moves the cursor of the current document; `target` is `line[:column]`.
  fn goto_line(&mut self, target: &str) -> Result<(), FsError>;
  fn search_symbols(&mut self, query: &str) -> Result<(), FsError>;
  fn show_error(&mut self, message: &str);
  /// Returns the index of the chosen option, `None` when dismissed.
  fn show_choice(&mut self, options: &[String]) -> Option<usize>;
  fn show_text_input(&mut self, input: &InputBox) -> Option<String>;
  /// The workspace folder containing `path`, if any.
  fn workspace_folder(&self, path: &Path) -> Option<Path>;
  fn workspace_root(&self) -> Option<Path>;
  fn active_document(&self) -> Option<Path>;
  fn home_dir(&self) -> Option<Path>;
}
