use std::io;

use thiserror::Error;

/// Failure taxonomy for host filesystem and editor operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
  #[error("not found")]
  NotFound,
  #[error("not a directory")]
  NotADirectory,
  #[error("permission denied")]
  PermissionDenied,
  #[error("already exists")]
  AlreadyExists,
  /// The user dismissed a prompt. Never reported as a failure.
  #[error("cancelled")]
  Cancelled,
  #[error("{0}")]
  Unknown(String),
}

impl From<io::Error> for FsError {
  fn from(err: io::Error) -> Self {
    match err.kind() {
      io::ErrorKind::NotFound => FsError::NotFound,
      io::ErrorKind::NotADirectory => FsError::NotADirectory,
      io::ErrorKind::PermissionDenied => FsError::PermissionDenied,
      io::ErrorKind::AlreadyExists => FsError::AlreadyExists,
      _ => FsError::Unknown(err.to_string()),
    }
  }
}
