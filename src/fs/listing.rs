use super::entry::{Entry, compare_entries};
use super::FileSystem;
use crate::error::FsError;
use crate::path::Path;

/// Lists `path` through the host and sorts it: directories first, then by
/// name. Host failures propagate untouched.
pub fn list<F: FileSystem + ?Sized>(
  fs: &F,
  path: &Path,
  case_insensitive: bool,
) -> Result<Vec<Entry>, FsError> {
  let mut entries: Vec<Entry> = fs
    .read_directory(path)?
    .into_iter()
    .map(|(name, kind)| Entry::listed(name, kind))
    .collect();
  entries.sort_by(|a, b| compare_entries(a, b, case_insensitive));
  Ok(entries)
}
