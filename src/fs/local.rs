use std::path::PathBuf;

use super::{FileKind, FileSystem};
use crate::error::FsError;
use crate::path::Path;

/// [`FileSystem`] backed by `std::fs` for `file://` paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs {
  /// Send deletions to the platform trash instead of unlinking.
  pub use_trash: bool,
}

impl LocalFs {
  pub fn new(use_trash: bool) -> Self {
    Self { use_trash }
  }

  fn local(path: &Path) -> Result<PathBuf, FsError> {
    if path.scheme() != "file" || !path.authority().is_empty() {
      return Err(FsError::Unknown(format!("unsupported location: {}", path.id())));
    }
    Ok(path.fs_path())
  }
}

fn kind_of(path: &std::path::Path) -> Result<FileKind, FsError> {
  let link = std::fs::symlink_metadata(path)?;
  let mut kind = FileKind::empty();
  if link.is_symlink() {
    kind |= FileKind::SYMLINK;
  }
  // Broken links keep only the SYMLINK flag.
  let target = if link.is_symlink() {
    std::fs::metadata(path).ok()
  } else {
    Some(link)
  };
  if let Some(meta) = target {
    if meta.is_dir() {
      kind |= FileKind::DIRECTORY;
    } else if meta.is_file() {
      kind |= FileKind::FILE;
    }
  }
  Ok(kind)
}

impl FileSystem for LocalFs {
  fn stat(&self, path: &Path) -> Result<FileKind, FsError> {
    kind_of(&Self::local(path)?)
  }

  fn read_directory(&self, path: &Path) -> Result<Vec<(String, FileKind)>, FsError> {
    let dir = Self::local(path)?;
    let mut out = Vec::new();
    for entry in std::fs::read_dir(&dir)?.flatten() {
      let name = entry.file_name().to_string_lossy().to_string();
      let kind = kind_of(&entry.path()).unwrap_or_default();
      out.push((name, kind));
    }
    Ok(out)
  }

  fn read_file(&self, path: &Path) -> Result<Vec<u8>, FsError> {
    Ok(std::fs::read(Self::local(path)?)?)
  }

  fn create_directory(&self, path: &Path) -> Result<(), FsError> {
    let dir = Self::local(path)?;
    if dir.exists() && !dir.is_dir() {
      return Err(FsError::AlreadyExists);
    }
    Ok(std::fs::create_dir_all(dir)?)
  }

  fn delete(&self, path: &Path, recursive: bool) -> Result<(), FsError> {
    let target = Self::local(path)?;
    if self.use_trash {
      return trash::delete(&target).map_err(|e| FsError::Unknown(e.to_string()));
    }
    let meta = std::fs::symlink_metadata(&target)?;
    if meta.is_dir() {
      if recursive {
        std::fs::remove_dir_all(&target)?;
      } else {
        std::fs::remove_dir(&target)?;
      }
    } else {
      std::fs::remove_file(&target)?;
    }
    Ok(())
  }

  fn rename(&self, from: &Path, to: &Path) -> Result<(), FsError> {
    let source = Self::local(from)?;
    let dest = Self::local(to)?;
    if dest.symlink_metadata().is_ok() {
      return Err(FsError::AlreadyExists);
    }
    if let Some(parent) = dest.parent() {
      std::fs::create_dir_all(parent)?;
    }
    Ok(std::fs::rename(source, dest)?)
  }
}
