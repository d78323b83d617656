//! In-memory host doubles shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

use crate::error::FsError;
use crate::fs::{Entry, FileKind, FileSystem};
use crate::host::{Button, Editor, InputBox, PickList, ViewColumn};
use crate::path::Path;

#[derive(Debug, Clone)]
enum Node {
  Dir,
  File(Vec<u8>),
}

/// Filesystem keyed by display path. Paths given to [`MemFs::with`] that end
/// in `/` are directories; parents are created implicitly.
#[derive(Debug, Default)]
pub struct MemFs {
  nodes: RefCell<BTreeMap<String, Node>>,
  pub fail_rename: Cell<bool>,
  pub fail_delete: Cell<bool>,
  pub stat_error: RefCell<Option<FsError>>,
  pub mutations: Cell<usize>,
}

impl MemFs {
  pub fn with(paths: &[&str]) -> Self {
    let fs = MemFs::default();
    fs.nodes.borrow_mut().insert("/".to_string(), Node::Dir);
    for raw in paths {
      let path = Path::from_file_path(raw);
      fs.insert_parents(&path);
      let node = if raw.ends_with('/') { Node::Dir } else { Node::File(Vec::new()) };
      fs.nodes.borrow_mut().insert(path.display_path(), node);
    }
    fs
  }

  pub fn write(&self, raw: &str, contents: &str) {
    let path = Path::from_file_path(raw);
    self.insert_parents(&path);
    self
      .nodes
      .borrow_mut()
      .insert(path.display_path(), Node::File(contents.as_bytes().to_vec()));
  }

  pub fn exists(&self, raw: &str) -> bool {
    self.nodes.borrow().contains_key(&Path::from_file_path(raw).display_path())
  }

  fn insert_parents(&self, path: &Path) {
    let mut parent = path.parent();
    loop {
      self.nodes.borrow_mut().entry(parent.display_path()).or_insert(Node::Dir);
      if parent.at_top() {
        break;
      }
      parent = parent.parent();
    }
  }

  fn descendants(&self, key: &str) -> Vec<String> {
    let prefix = format!("{key}/");
    self
      .nodes
      .borrow()
      .keys()
      .filter(|k| k.as_str() == key || k.starts_with(&prefix))
      .cloned()
      .collect()
  }
}

impl FileSystem for MemFs {
  fn stat(&self, path: &Path) -> Result<FileKind, FsError> {
    if let Some(err) = self.stat_error.borrow().clone() {
      return Err(err);
    }
    match self.nodes.borrow().get(&path.display_path()) {
      Some(Node::Dir) => Ok(FileKind::DIRECTORY),
      Some(Node::File(_)) => Ok(FileKind::FILE),
      None => Err(FsError::NotFound),
    }
  }

  fn read_directory(&self, path: &Path) -> Result<Vec<(String, FileKind)>, FsError> {
    let key = path.display_path();
    match self.nodes.borrow().get(&key) {
      Some(Node::Dir) => {}
      Some(Node::File(_)) => return Err(FsError::NotADirectory),
      None => return Err(FsError::NotFound),
    }
    let prefix = if key == "/" { key.clone() } else { format!("{key}/") };
    Ok(
      self
        .nodes
        .borrow()
        .iter()
        .filter_map(|(k, node)| {
          let rest = k.strip_prefix(&prefix)?;
          if rest.is_empty() || rest.contains('/') {
            return None;
          }
          let kind = match node {
            Node::Dir => FileKind::DIRECTORY,
            Node::File(_) => FileKind::FILE,
          };
          Some((rest.to_string(), kind))
        })
        .collect(),
    )
  }

  fn read_file(&self, path: &Path) -> Result<Vec<u8>, FsError> {
    match self.nodes.borrow().get(&path.display_path()) {
      Some(Node::File(bytes)) => Ok(bytes.clone()),
      Some(Node::Dir) => Err(FsError::Unknown("is a directory".to_string())),
      None => Err(FsError::NotFound),
    }
  }

  fn create_directory(&self, path: &Path) -> Result<(), FsError> {
    let key = path.display_path();
    if let Some(Node::File(_)) = self.nodes.borrow().get(&key) {
      return Err(FsError::AlreadyExists);
    }
    let mut parent = path.parent();
    while !parent.at_top() {
      if let Some(Node::File(_)) = self.nodes.borrow().get(&parent.display_path()) {
        return Err(FsError::NotADirectory);
      }
      parent = parent.parent();
    }
    self.insert_parents(path);
    self.nodes.borrow_mut().insert(key, Node::Dir);
    self.mutations.set(self.mutations.get() + 1);
    Ok(())
  }

  fn delete(&self, path: &Path, recursive: bool) -> Result<(), FsError> {
    if self.fail_delete.get() {
      return Err(FsError::PermissionDenied);
    }
    let key = path.display_path();
    let doomed = self.descendants(&key);
    if doomed.is_empty() {
      return Err(FsError::NotFound);
    }
    if doomed.len() > 1 && !recursive {
      return Err(FsError::Unknown("directory not empty".to_string()));
    }
    let mut nodes = self.nodes.borrow_mut();
    for k in doomed {
      nodes.remove(&k);
    }
    self.mutations.set(self.mutations.get() + 1);
    Ok(())
  }

  fn rename(&self, from: &Path, to: &Path) -> Result<(), FsError> {
    if self.fail_rename.get() {
      return Err(FsError::PermissionDenied);
    }
    let src = from.display_path();
    let dest = to.display_path();
    let moving = self.descendants(&src);
    if moving.is_empty() {
      return Err(FsError::NotFound);
    }
    if self.nodes.borrow().contains_key(&dest) {
      return Err(FsError::AlreadyExists);
    }
    self.insert_parents(to);
    let mut nodes = self.nodes.borrow_mut();
    for k in moving {
      if let Some(node) = nodes.remove(&k) {
        nodes.insert(format!("{dest}{}", &k[src.len()..]), node);
      }
    }
    self.mutations.set(self.mutations.get() + 1);
    Ok(())
  }
}

/// Editor double: scripted prompt answers, recorded requests.
#[derive(Debug, Default)]
pub struct RecordingEditor {
  pub choices: VecDeque<Option<usize>>,
  pub inputs: VecDeque<Option<String>>,
  pub choice_prompts: Vec<Vec<String>>,
  pub input_prompts: Vec<InputBox>,
  pub errors: Vec<String>,
  pub opened: Vec<(String, ViewColumn)>,
  pub untitled: Vec<String>,
  pub folders: Vec<(String, bool)>,
  pub lines: Vec<String>,
  pub symbols: Vec<String>,
  pub workspace: Option<Path>,
  pub home: Option<Path>,
  pub document: Option<Path>,
}

impl Editor for RecordingEditor {
  fn open_document(&mut self, path: &Path, column: ViewColumn) -> Result<(), FsError> {
    self.opened.push((path.display_path(), column));
    Ok(())
  }

  fn open_untitled(&mut self, path: &Path) -> Result<(), FsError> {
    self.untitled.push(path.id());
    Ok(())
  }

  fn open_folder(&mut self, path: &Path, new_window: bool) -> Result<(), FsError> {
    self.folders.push((path.display_path(), new_window));
    Ok(())
  }

  fn goto_line(&mut self, target: &str) -> Result<(), FsError> {
    self.lines.push(target.to_string());
    Ok(())
  }

  fn search_symbols(&mut self, query: &str) -> Result<(), FsError> {
    self.symbols.push(query.to_string());
    Ok(())
  }

  fn show_error(&mut self, message: &str) {
    self.errors.push(message.to_string());
  }

  fn show_choice(&mut self, options: &[String]) -> Option<usize> {
    self.choice_prompts.push(options.to_vec());
    self.choices.pop_front().flatten()
  }

  fn show_text_input(&mut self, input: &InputBox) -> Option<String> {
    self.input_prompts.push(input.clone());
    self.inputs.pop_front().flatten()
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
    self.home.clone()
  }
}

/// Picklist double that keeps the last value of every setter.
#[derive(Debug, Default)]
pub struct RecordingView {
  pub items: Vec<Entry>,
  pub active: Option<usize>,
  pub value: String,
  pub title: String,
  pub placeholder: String,
  pub buttons: Vec<Button>,
  pub busy: bool,
  pub enabled: bool,
  pub visible: bool,
  pub disposed: bool,
  pub hides: usize,
}

impl RecordingView {
  pub fn names(&self) -> Vec<&str> {
    self.items.iter().map(Entry::name).collect()
  }

  pub fn active_entry(&self) -> Option<&Entry> {
    self.active.and_then(|i| self.items.get(i))
  }
}

impl PickList for RecordingView {
  fn set_items(&mut self, items: &[Entry]) {
    self.items = items.to_vec();
  }

  fn set_active(&mut self, active: Option<usize>) {
    self.active = active;
  }

  fn set_value(&mut self, value: &str) {
    self.value = value.to_string();
  }

  fn set_title(&mut self, title: &str) {
    self.title = title.to_string();
  }

  fn set_placeholder(&mut self, placeholder: &str) {
    self.placeholder = placeholder.to_string();
  }

  fn set_buttons(&mut self, buttons: &[Button]) {
    self.buttons = buttons.to_vec();
  }

  fn set_busy(&mut self, busy: bool) {
    self.busy = busy;
  }

  fn set_enabled(&mut self, enabled: bool) {
    self.enabled = enabled;
  }

  fn show(&mut self) {
    self.visible = true;
  }

  fn hide(&mut self) {
    self.visible = false;
    self.hides += 1;
  }

  fn dispose(&mut self) {
    self.visible = false;
    self.disposed = true;
  }
}
