pub mod entry;
pub mod listing;
pub mod local;

pub use entry::{Action, Entry, FileKind};
pub use local::LocalFs;

use crate::error::FsError;
use crate::path::Path;

/// Filesystem capabilities the browser needs from its host.
///
/// Every operation is fallible; `stat` on a missing path must report
/// [`FsError::NotFound`] so the browser can offer to create it.
pub trait FileSystem {
  fn stat(&self, path: &Path) -> Result<FileKind, FsError>;
  /// Unsorted `(name, kind)` pairs of a directory's children.
  fn read_directory(&self, path: &Path) -> Result<Vec<(String, FileKind)>, FsError>;
  fn read_file(&self, path: &Path) -> Result<Vec<u8>, FsError>;
  /// Creates the directory and any missing parents.
  fn create_directory(&self, path: &Path) -> Result<(), FsError>;
  fn delete(&self, path: &Path, recursive: bool) -> Result<(), FsError>;
  fn rename(&self, from: &Path, to: &Path) -> Result<(), FsError>;
}
