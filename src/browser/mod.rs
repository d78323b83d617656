//! The navigation state machine behind one picklist session.

mod dispatch;
pub mod input;

use std::collections::HashMap;

pub use dispatch::FILE_TYPES;
use input::{Interpretation, NavTarget, Prefixes, classify, completion_candidates};

use crate::command::Command;
use crate::config::BrowserOptions;
use crate::error::FsError;
use crate::fs::entry::{file_actions, folder_actions};
use crate::fs::{Action, Entry, FileSystem, listing};
use crate::host::{Button, Editor, PickList, ViewColumn, ViewEvent};
use crate::ignore::IgnoreCache;
use crate::path::Path;

pub const PREPARING_PLACEHOLDER: &str = "Preparing the file list...";
pub const READY_PLACEHOLDER: &str = "Select a file or folder to open or create a new one";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Browsing,
  /// `path` points at the file or folder being acted on.
  ActingOnSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
  pub index: usize,
  pub candidates: Vec<Entry>,
}

#[derive(Debug, Clone)]
pub struct NavigationState {
  pub path: Path,
  pub mode: Mode,
  /// Name to activate on the next refresh.
  pub file: Option<String>,
  /// Listing or action entries for the current path.
  pub items: Vec<Entry>,
  /// `items` plus any synthetic entries derived from the text field.
  pub shown: Vec<Entry>,
  /// Index into `shown`.
  pub active: Option<usize>,
  pub value: String,
  /// Directory id to the name that was active when it was last left.
  pub history: HashMap<String, Option<String>>,
  pub completion: Option<Completion>,
  pub busy: bool,
}

impl NavigationState {
  fn new(path: Path, file: Option<String>) -> Self {
    let mut history = HashMap::new();
    history.insert(path.id(), file.clone());
    NavigationState {
      path,
      mode: Mode::Browsing,
      file,
      items: Vec::new(),
      shown: Vec::new(),
      active: None,
      value: String::new(),
      history,
      completion: None,
      busy: false,
    }
  }

  pub fn active_entry(&self) -> Option<&Entry> {
    self.active.and_then(|i| self.shown.get(i))
  }
}

pub struct Browser<F, E, V> {
  fs: F,
  editor: E,
  view: V,
  options: BrowserOptions,
  state: NavigationState,
  ignore_cache: IgnoreCache,
  /// Set while a modal prompt hides the picklist on purpose.
  keep_alive: bool,
  disposed: bool,
}

impl<F: FileSystem, E: Editor, V: PickList> Browser<F, E, V> {
  /// Opens a session at `start`, preselecting `file` if it is listed.
  pub fn open(
    fs: F,
    editor: E,
    mut view: V,
    options: BrowserOptions,
    start: Path,
    file: Option<String>,
  ) -> Result<Self, FsError> {
    view.set_buttons(&Button::ALL);
    view.set_placeholder(PREPARING_PLACEHOLDER);
    let mut browser = Browser {
      fs,
      editor,
      view,
      options,
      state: NavigationState::new(start, file),
      ignore_cache: IgnoreCache::default(),
      keep_alive: false,
      disposed: false,
    };
    if let Err(e) = browser.update() {
      browser.dispose();
      return Err(e);
    }
    browser.view.set_placeholder(READY_PLACEHOLDER);
    Ok(browser)
  }

  pub fn state(&self) -> &NavigationState {
    &self.state
  }

  pub fn view(&self) -> &V {
    &self.view
  }

  pub fn view_mut(&mut self) -> &mut V {
    &mut self.view
  }

  pub fn editor(&self) -> &E {
    &self.editor
  }

  pub fn editor_mut(&mut self) -> &mut E {
    &mut self.editor
  }

  pub fn fs(&self) -> &F {
    &self.fs
  }

  pub fn options(&self) -> &BrowserOptions {
    &self.options
  }

  pub fn is_disposed(&self) -> bool {
    self.disposed
  }

  pub fn handle(&mut self, event: ViewEvent) -> Result<(), FsError> {
    if self.disposed {
      return Ok(());
    }
    match event {
      ViewEvent::TextChanged(value) => self.on_text_changed(&value, false),
      ViewEvent::Accept => self.accept(),
      ViewEvent::ButtonTriggered(Button::StepIn) => self.step_in(),
      ViewEvent::ButtonTriggered(Button::StepOut) => self.step_out(),
      ViewEvent::ButtonTriggered(Button::Actions) => self.enter_actions(),
      ViewEvent::ActiveChanged(active) => {
        self.state.active = active.filter(|&i| i < self.state.shown.len());
        Ok(())
      }
      ViewEvent::Hidden => {
        if !self.keep_alive {
          self.dispose();
        }
        Ok(())
      }
    }
  }

  /// Runs a session command. Widget-level commands are left to the host.
  pub fn run(&mut self, command: Command) -> Result<(), FsError> {
    if self.disposed {
      return Ok(());
    }
    match command {
      Command::StepIn => self.step_in(),
      Command::StepOut => self.step_out(),
      Command::Actions => self.enter_actions(),
      Command::TabNext => self.tab_complete(true),
      Command::TabPrev => self.tab_complete(false),
      Command::Accept => self.accept(),
      _ => Ok(()),
    }
  }

  pub fn dispose(&mut self) {
    if self.disposed {
      return;
    }
    self.disposed = true;
    self.keep_alive = false;
    self.view.dispose();
    tracing::debug!("browser session disposed at {}", self.state.path.id());
  }

  fn prefixes(&self) -> Prefixes<'_> {
    Prefixes {
      line_jump: &self.options.line_jump_prefix,
      symbol_search: self.options.symbol_search_prefix.as_deref(),
    }
  }

  fn show_entries(&mut self, shown: Vec<Entry>, active: Option<usize>) {
    self.view.set_items(&shown);
    self.view.set_active(active);
    self.state.shown = shown;
    self.state.active = active;
  }

  fn with_extra(&self, extra: impl IntoIterator<Item = Entry>) -> Vec<Entry> {
    self.state.items.iter().cloned().chain(extra).collect()
  }

  fn on_text_changed(&mut self, value: &str, from_completion: bool) -> Result<(), FsError> {
    self.state.value = value.to_string();
    if self.state.mode == Mode::ActingOnSelection {
      return Ok(());
    }
    if !from_completion {
      self.state.completion = None;
    }

    match classify(value, &self.state.items, self.prefixes()) {
      Interpretation::Clear => {
        let shown = self.state.items.clone();
        self.show_entries(shown, None);
      }
      Interpretation::Existing(idx) => {
        let shown = self.state.items.clone();
        self.show_entries(shown, Some(idx));
      }
      Interpretation::JumpToLine(arg) => {
        let shown = self.with_extra([Entry::jump_to_line(&arg)]);
        let active = shown.len() - 1;
        self.show_entries(shown, Some(active));
      }
      Interpretation::SymbolSearch(query) => {
        self.dispose();
        if let Err(e) = self.editor.search_symbols(&query) {
          self.report(&format!("Failed to search symbols \"{query}\""), &e);
        }
      }
      Interpretation::Navigate(NavTarget::Home) => {
        if let Some(home) = self.editor.home_dir() {
          self.step_into_folder(home)?;
        }
      }
      Interpretation::Navigate(NavTarget::Parent) => self.step_out()?,
      Interpretation::Navigate(NavTarget::Into(segment)) => {
        let folder = self.state.path.append([segment]);
        self.step_into_folder(folder)?;
      }
      Interpretation::Create { name, prefer_file } => {
        let shown = self.with_extra([Entry::new_file(&name), Entry::new_folder(&name)]);
        let folder = shown.len() - 1;
        let active = if prefer_file { folder - 1 } else { folder };
        self.show_entries(shown, Some(active));
      }
    }
    Ok(())
  }

  fn step_into_folder(&mut self, folder: Path) -> Result<(), FsError> {
    if folder == self.state.path {
      return Ok(());
    }
    tracing::debug!("stepping into {}", folder.id());
    self.state.file = self.state.history.get(&folder.id()).cloned().flatten();
    self.state.path = folder;
    self.state.mode = Mode::Browsing;
    self.update()
  }

  pub fn step_in(&mut self) -> Result<(), FsError> {
    let Some(entry) = self.state.active_entry().cloned() else {
      return Ok(());
    };
    if entry.action().is_some() {
      self.run_action(&entry);
      return Ok(());
    }
    if entry.is_dir() {
      let folder = self.state.path.append([entry.name()]);
      self.step_into_folder(folder)
    } else if entry.kind().is_file() {
      self.state.path.push([entry.name()]);
      self.state.file = None;
      self.state.mode = Mode::ActingOnSelection;
      self.update()
    } else {
      Ok(())
    }
  }

  pub fn step_out(&mut self) -> Result<(), FsError> {
    if self.state.path.at_top() {
      if self.state.mode == Mode::ActingOnSelection {
        self.state.mode = Mode::Browsing;
        self.state.file = None;
        return self.update();
      }
      return Ok(());
    }
    if self.state.mode == Mode::Browsing {
      let selected = match self.state.active_entry() {
        Some(Entry::Listed { name, .. }) => Some(name.clone()),
        _ => None,
      };
      self.state.history.insert(self.state.path.id(), selected);
    }
    self.state.file = self.state.path.pop();
    self.state.mode = Mode::Browsing;
    tracing::debug!("stepped out to {}", self.state.path.id());
    self.update()
  }

  pub fn enter_actions(&mut self) -> Result<(), FsError> {
    if self.state.mode == Mode::ActingOnSelection {
      return Ok(());
    }
    if let Some(Entry::Listed { name, .. }) = self.state.active_entry() {
      let name = name.clone();
      self.state.path.push([name]);
    }
    self.state.file = None;
    self.state.mode = Mode::ActingOnSelection;
    self.update()
  }

  pub fn accept(&mut self) -> Result<(), FsError> {
    self.state.completion = None;
    let Some(entry) = self.state.active_entry().cloned() else {
      return Ok(());
    };
    if entry.action().is_some() {
      self.run_action(&entry);
      Ok(())
    } else if entry.is_dir() {
      self.step_in()
    } else {
      let target = self.state.path.append([entry.name()]);
      self.dispose();
      if let Err(e) = self.editor.open_document(&target, ViewColumn::Active) {
        self.report(&format!("Failed to open file \"{}\"", entry.name()), &e);
      }
      Ok(())
    }
  }

  pub fn tab_complete(&mut self, forward: bool) -> Result<(), FsError> {
    if self.state.mode == Mode::ActingOnSelection {
      return Ok(());
    }
    match self.state.completion.as_mut() {
      Some(c) if !c.candidates.is_empty() => {
        let len = c.candidates.len();
        c.index = if forward { (c.index + 1) % len } else { (c.index + len - 1) % len };
      }
      Some(_) => {}
      None => {
        let candidates: Vec<Entry> = completion_candidates(&self.state.value, &self.state.items)
          .into_iter()
          .map(|i| self.state.items[i].clone())
          .collect();
        let index = if forward { 0 } else { candidates.len().saturating_sub(1) };
        self.state.completion = Some(Completion { index, candidates });
      }
    }

    let Some(c) = &self.state.completion else {
      return Ok(());
    };
    let Some(entry) = c.candidates.get(c.index) else {
      return Ok(());
    };
    let mut value = entry.name().to_string();
    if c.candidates.len() == 1 && entry.is_dir() {
      value.push('/');
    }
    self.view.set_value(&value);
    self.on_text_changed(&value, true)
  }

  /// Re-stats the current path and rebuilds the entry list. Input is
  /// disabled while this runs and re-enabled whatever the outcome.
  fn update(&mut self) -> Result<(), FsError> {
    self.view.set_enabled(false);
    self.view.show();
    self.state.busy = true;
    self.view.set_busy(true);
    self.view.set_title(&self.state.path.to_string());
    self.state.value.clear();
    self.view.set_value("");
    self.state.completion = None;

    let result = self.rebuild();

    self.state.busy = false;
    self.view.set_busy(false);
    self.view.set_enabled(true);
    result
  }

  fn rebuild(&mut self) -> Result<(), FsError> {
    let acting = self.state.mode == Mode::ActingOnSelection;
    let items = match self.fs.stat(&self.state.path) {
      Ok(kind) if acting && kind.is_dir() => folder_actions(),
      Ok(_) if acting => file_actions(),
      Ok(kind) if kind.is_dir() => self.listing()?,
      Ok(_) => {
        self.state.mode = Mode::ActingOnSelection;
        file_actions()
      }
      Err(FsError::NotFound) => {
        self.state.mode = Mode::Browsing;
        vec![Entry::synthetic(Action::NewFolder, "Create this folder")]
      }
      Err(e) => {
        tracing::warn!("cannot refresh {}: {e}", self.state.path.id());
        return Err(e);
      }
    };

    let pending = self.state.file.take();
    let active = pending.and_then(|name| {
      items
        .iter()
        .position(|e| matches!(e, Entry::Listed { .. }) && e.name() == name)
    });
    self.state.items = items;
    let shown = self.state.items.clone();
    self.show_entries(shown, active);
    Ok(())
  }

  fn listing(&mut self) -> Result<Vec<Entry>, FsError> {
    let opts = &self.options;
    let path = &self.state.path;
    let mut entries = listing::list(&self.fs, path, opts.case_insensitive_sort)?;
    if opts.hide_dotfiles {
      entries.retain(|e| !e.name().starts_with('.'));
    }
    if !opts.hide_ignored_files {
      return Ok(entries);
    }

    let rules = self.ignore_cache.rules(&self.fs, path, opts);
    if opts.remove_ignored_files {
      return Ok(rules.filter(path, entries));
    }
    rules.mark(path, &mut entries);
    let (mut kept, mut ignored): (Vec<Entry>, Vec<Entry>) =
      entries.into_iter().partition(|e| !e.is_ignored());
    if !opts.label_ignored_files {
      for entry in &mut ignored {
        if let Entry::Listed { ignored, .. } = entry {
          *ignored = false;
        }
      }
    }
    kept.append(&mut ignored);
    Ok(kept)
  }
}
