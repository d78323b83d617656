use super::{Browser, Mode};
use crate::error::FsError;
use crate::fs::{Action, Entry, FileSystem};
use crate::host::{Editor, InputBox, PickList, ViewColumn};
use crate::path::extension_of;

/// Languages offered when a new file is typed without an extension.
pub const FILE_TYPES: &[(&str, &str)] = &[
  ("Plain text", "txt"),
  ("Markdown", "md"),
  ("Rust", "rs"),
  ("TOML", "toml"),
  ("JSON", "json"),
  ("YAML", "yaml"),
  ("Python", "py"),
  ("JavaScript", "js"),
  ("TypeScript", "ts"),
  ("HTML", "html"),
  ("CSS", "css"),
  ("C", "c"),
  ("C++", "cpp"),
  ("Go", "go"),
  ("Java", "java"),
  ("Shell script", "sh"),
];

impl<F: FileSystem, E: Editor, V: PickList> Browser<F, E, V> {
  /// Runs the action attached to a synthetic entry. Failures are reported
  /// to the user here and never reach the caller.
  pub(super) fn run_action(&mut self, entry: &Entry) {
    let Some(action) = entry.action() else {
      return;
    };
    let name = entry.name();
    tracing::debug!("running {action:?} on {:?} at {}", name, self.state.path.id());
    match action {
      Action::NewFolder => self.new_folder(name),
      Action::NewFile => self.new_file(name),
      Action::OpenFile => self.open_file(name, ViewColumn::Active),
      Action::OpenFileBeside => self.open_file(name, ViewColumn::Beside),
      Action::RenameFile => self.rename(),
      Action::DeleteFile => self.delete(),
      Action::OpenFolder => self.open_folder(false),
      Action::OpenFolderInNewWindow => self.open_folder(true),
      Action::JumpToLine => self.jump_to_line(name),
    }
  }

  pub(super) fn report(&mut self, what: &str, err: &FsError) {
    if *err == FsError::Cancelled {
      return;
    }
    tracing::warn!("{what}: {err}");
    self.editor.show_error(&format!("{what}: {err}"));
  }

  /// Rebuilds the list after an action, reporting instead of returning.
  fn refresh(&mut self) {
    if let Err(e) = self.update() {
      let what = format!("Failed to read \"{}\"", self.state.path);
      self.report(&what, &e);
    }
  }

  /// Hides the picklist for a modal prompt without ending the session.
  fn suspend(&mut self) {
    self.keep_alive = true;
    self.view.hide();
  }

  fn resume(&mut self) {
    self.view.show();
    self.keep_alive = false;
    self.state.mode = Mode::Browsing;
    self.refresh();
  }

  fn new_folder(&mut self, name: &str) {
    let target = if name.is_empty() {
      self.state.path.clone()
    } else {
      self.state.path.append([name])
    };
    match self.fs.create_directory(&target) {
      Ok(()) => {
        self.ignore_cache.clear();
        self.state.file = name.split('/').find(|s| !s.is_empty()).map(str::to_string);
        self.refresh();
      }
      Err(e) => {
        let shown = target.file_name().unwrap_or(name).to_string();
        self.report(&format!("Failed to create folder \"{shown}\""), &e);
      }
    }
  }

  fn new_file(&mut self, name: &str) {
    let mut name = name.to_string();
    if !name.contains('.') && self.options.prompt_file_type {
      let labels: Vec<String> = FILE_TYPES
        .iter()
        .map(|(language, ext)| format!("{language} ({ext})"))
        .collect();
      self.suspend();
      match self.editor.show_choice(&labels) {
        Some(i) if i < FILE_TYPES.len() => {
          name = format!("{name}.{}", FILE_TYPES[i].1);
        }
        _ => {
          self.resume();
          return;
        }
      }
    }
    let target = self.state.path.append([&name]);
    self.dispose();
    if let Err(e) = self.editor.open_untitled(&target) {
      self.report(&format!("Failed to create file \"{name}\""), &e);
    }
  }

  fn open_file(&mut self, name: &str, column: ViewColumn) {
    let mut target = self.state.path.clone();
    if !name.is_empty() {
      target.push([name]);
    }
    self.dispose();
    if let Err(e) = self.editor.open_document(&target, column) {
      let shown = target.file_name().unwrap_or_default().to_string();
      self.report(&format!("Failed to open file \"{shown}\""), &e);
    }
  }

  fn rename(&mut self) {
    self.suspend();
    let old = self.state.path.clone();
    let kind = self.fs.stat(&old).unwrap_or_default();
    let noun = kind.noun();
    let Some(name) = self.state.path.pop() else {
      self.resume();
      return;
    };
    self.state.file = Some(name.clone());

    let workspace = self.editor.workspace_folder(&old).filter(|ws| ws != &old);
    let value = workspace
      .as_ref()
      .and_then(|ws| old.relative_to(ws))
      .unwrap_or_else(|| name.clone());
    let start = value.chars().count() - name.chars().count();
    let stem = name.chars().count() - extension_of(&name).chars().count();
    let input = InputBox {
      prompt: format!("Enter the new {noun} name"),
      value,
      selection: (start, start + stem),
    };

    if let Some(result) = self.editor.show_text_input(&input).filter(|r| !r.is_empty()) {
      let base = workspace.unwrap_or_else(|| self.state.path.clone());
      let dest = base.append([result.as_str()]);
      match self.fs.rename(&old, &dest) {
        Ok(()) => {
          tracing::debug!("renamed {} to {}", old.id(), dest.id());
          self.ignore_cache.clear();
          self.state.file = dest.file_name().map(str::to_string);
        }
        Err(e) => self.report(&format!("Failed to rename {noun} \"{name}\""), &e),
      }
    }
    self.resume();
  }

  fn delete(&mut self) {
    self.suspend();
    let old = self.state.path.clone();
    let kind = self.fs.stat(&old).unwrap_or_default();
    let noun = kind.noun();
    let Some(name) = self.state.path.pop() else {
      self.resume();
      return;
    };
    self.state.file = Some(name.clone());

    let options = ["Cancel".to_string(), format!("Delete the {noun} \"{name}\"")];
    if self.editor.show_choice(&options) == Some(1) {
      match self.fs.delete(&old, kind.is_dir()) {
        Ok(()) => {
          tracing::debug!("deleted {}", old.id());
          self.ignore_cache.clear();
        }
        Err(e) => self.report(&format!("Failed to delete {noun} \"{name}\""), &e),
      }
    }
    self.resume();
  }

  fn open_folder(&mut self, new_window: bool) {
    let target = self.state.path.clone();
    if !new_window {
      self.dispose();
    }
    if let Err(e) = self.editor.open_folder(&target, new_window) {
      let shown = target.to_string();
      self.report(&format!("Failed to open folder \"{shown}\""), &e);
    }
    if new_window && !self.disposed {
      self.state.mode = Mode::Browsing;
      self.refresh();
    }
  }

  fn jump_to_line(&mut self, target: &str) {
    self.dispose();
    if let Err(e) = self.editor.goto_line(target) {
      self.report(&format!("Failed to jump to line \"{target}\""), &e);
    }
  }
}
