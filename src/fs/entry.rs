use std::cmp::Ordering;

use bitflags::bitflags;

bitflags! {
  /// What a path points at. Flags combine, so a symlink to a directory is
  /// `DIRECTORY | SYMLINK`; no flags at all means unknown.
  #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
  pub struct FileKind: u8 {
    const FILE = 1;
    const DIRECTORY = 1 << 1;
    const SYMLINK = 1 << 6;
  }
}

impl FileKind {
  pub fn is_dir(self) -> bool {
    self.contains(FileKind::DIRECTORY)
  }

  pub fn is_file(self) -> bool {
    self.contains(FileKind::FILE)
  }

  pub fn is_symlink(self) -> bool {
    self.contains(FileKind::SYMLINK)
  }

  pub fn noun(self) -> &'static str {
    if self.is_dir() { "folder" } else { "file" }
  }
}

/// Operation attached to a synthetic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
  NewFile,
  NewFolder,
  OpenFile,
  OpenFileBeside,
  RenameFile,
  DeleteFile,
  OpenFolder,
  OpenFolderInNewWindow,
  JumpToLine,
}

/// One row of the picklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
  /// A real directory listing row. `ignored` is set when an ignore rule
  /// matched and the row is kept only to be labelled.
  Listed {
    name: String,
    kind: FileKind,
    ignored: bool,
  },
  /// A placeholder that runs an action. `name` carries the argument: the
  /// typed name, the line to jump to, or empty for "the current path".
  Synthetic {
    action: Action,
    name: String,
    label: String,
    description: Option<String>,
  },
}

impl Entry {
  pub fn listed(name: impl Into<String>, kind: FileKind) -> Self {
    Entry::Listed {
      name: name.into(),
      kind,
      ignored: false,
    }
  }

  pub fn synthetic(action: Action, label: impl Into<String>) -> Self {
    Entry::Synthetic {
      action,
      name: String::new(),
      label: label.into(),
      description: None,
    }
  }

  pub fn new_file(value: &str) -> Self {
    Entry::Synthetic {
      action: Action::NewFile,
      name: value.to_string(),
      label: value.to_string(),
      description: Some("New file".to_string()),
    }
  }

  pub fn new_folder(value: &str) -> Self {
    Entry::Synthetic {
      action: Action::NewFolder,
      name: value.to_string(),
      label: value.to_string(),
      description: Some("New folder".to_string()),
    }
  }

  pub fn jump_to_line(argument: &str) -> Self {
    Entry::Synthetic {
      action: Action::JumpToLine,
      name: argument.to_string(),
      label: argument.to_string(),
      description: Some("Jump to a specific line".to_string()),
    }
  }

  pub fn name(&self) -> &str {
    match self {
      Entry::Listed { name, .. } | Entry::Synthetic { name, .. } => name,
    }
  }

  pub fn kind(&self) -> FileKind {
    match self {
      Entry::Listed { kind, .. } => *kind,
      Entry::Synthetic { .. } => FileKind::empty(),
    }
  }

  pub fn action(&self) -> Option<Action> {
    match self {
      Entry::Synthetic { action, .. } => Some(*action),
      Entry::Listed { .. } => None,
    }
  }

  pub fn is_dir(&self) -> bool {
    self.kind().is_dir()
  }

  pub fn is_ignored(&self) -> bool {
    matches!(self, Entry::Listed { ignored: true, .. })
  }

  /// Synthetic entries bypass ignore filtering and text filtering.
  pub fn always_show(&self) -> bool {
    matches!(self, Entry::Synthetic { .. })
  }

  pub fn label(&self) -> &str {
    match self {
      Entry::Listed { name, .. } => name,
      Entry::Synthetic { label, .. } => label,
    }
  }

  pub fn description(&self) -> Option<&str> {
    match self {
      Entry::Listed { ignored: true, .. } => Some("ignored"),
      Entry::Listed { .. } => None,
      Entry::Synthetic { description, .. } => description.as_deref(),
    }
  }
}

/// Entries shown when acting on a file.
pub fn file_actions() -> Vec<Entry> {
  vec![
    Entry::synthetic(Action::OpenFile, "Open this file"),
    Entry::synthetic(Action::OpenFileBeside, "Open this file to the side"),
    Entry::synthetic(Action::RenameFile, "Rename this file"),
    Entry::synthetic(Action::DeleteFile, "Delete this file"),
  ]
}

/// Entries shown when acting on a folder.
pub fn folder_actions() -> Vec<Entry> {
  vec![
    Entry::synthetic(Action::OpenFolder, "Open this folder"),
    Entry::synthetic(Action::OpenFolderInNewWindow, "Open this folder in a new window"),
    Entry::synthetic(Action::RenameFile, "Rename this folder"),
    Entry::synthetic(Action::DeleteFile, "Delete this folder"),
  ]
}

/// Directories first, then by name. Case-insensitive ordering falls back to
/// a case-sensitive comparison so the result stays total.
pub fn compare_entries(a: &Entry, b: &Entry, case_insensitive: bool) -> Ordering {
  b.is_dir().cmp(&a.is_dir()).then_with(|| {
    if case_insensitive {
      a.name()
        .to_lowercase()
        .cmp(&b.name().to_lowercase())
        .then_with(|| a.name().cmp(b.name()))
    } else {
      a.name().cmp(b.name())
    }
  })
}
