use std::fmt;
use std::path::PathBuf;

/// An absolute location: scheme, authority and an ordered list of segments.
///
/// Two paths are equal when their canonical string forms (see [`Path::id`])
/// match. Joining resolves `.` and `..` the way a URI join does; popping at
/// the root yields nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
  scheme: String,
  authority: String,
  segments: Vec<String>,
}

impl Path {
  pub fn new(scheme: &str, authority: &str, path: &str) -> Self {
    let mut p = Self {
      scheme: scheme.to_string(),
      authority: authority.to_string(),
      segments: Vec::new(),
    };
    p.push([path]);
    p
  }

  /// Parses `scheme://authority/path`. A string without `://` is not a URI.
  pub fn parse(uri: &str) -> Option<Self> {
    let (scheme, rest) = uri.split_once("://")?;
    if scheme.is_empty() {
      return None;
    }
    let (authority, path) = match rest.find('/') {
      Some(i) => (&rest[..i], &rest[i..]),
      None => (rest, ""),
    };
    Some(Self::new(scheme, authority, path))
  }

  pub fn from_file_path(path: impl AsRef<std::path::Path>) -> Self {
    let raw = path.as_ref().to_string_lossy().replace('\\', "/");
    Self::new("file", "", &raw)
  }

  pub fn root(&self) -> Self {
    Self {
      scheme: self.scheme.clone(),
      authority: self.authority.clone(),
      segments: Vec::new(),
    }
  }

  pub fn scheme(&self) -> &str {
    &self.scheme
  }

  pub fn authority(&self) -> &str {
    &self.authority
  }

  pub fn segments(&self) -> &[String] {
    &self.segments
  }

  pub fn with_scheme(&self, scheme: &str) -> Self {
    Self {
      scheme: scheme.to_string(),
      ..self.clone()
    }
  }

  /// Canonical identity, used as the history key.
  pub fn id(&self) -> String {
    format!("{}://{}{}", self.scheme, self.authority, self.display_path())
  }

  /// The slash-separated path part, always starting with `/`.
  pub fn display_path(&self) -> String {
    format!("/{}", self.segments.join("/"))
  }

  pub fn fs_path(&self) -> PathBuf {
    // Drive-letter paths ("C:/...") must not gain a leading slash.
    if let Some(drive) = self.segments.first()
      && drive.len() == 2
      && drive.ends_with(':')
    {
      if self.segments.len() == 1 {
        return PathBuf::from(format!("{drive}/"));
      }
      return PathBuf::from(self.segments.join("/"));
    }
    PathBuf::from(self.display_path())
  }

  pub fn file_name(&self) -> Option<&str> {
    self.segments.last().map(String::as_str)
  }

  pub fn at_top(&self) -> bool {
    self.segments.is_empty()
  }

  pub fn append<I, S>(&self, segments: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut p = self.clone();
    p.push(segments);
    p
  }

  pub fn push<I, S>(&mut self, segments: I)
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    for segment in segments {
      for part in segment.as_ref().split('/') {
        match part {
          "" | "." => {}
          ".." => {
            self.segments.pop();
          }
          _ => self.segments.push(part.to_string()),
        }
      }
    }
  }

  /// Removes the last segment and returns it; `None` at the root.
  pub fn pop(&mut self) -> Option<String> {
    self.segments.pop()
  }

  pub fn parent(&self) -> Self {
    self.append([".."])
  }

  /// Relative textual path from `base` to `self`, or `None` when the two
  /// live on different filesystems (scheme or authority differ).
  pub fn relative_to(&self, base: &Path) -> Option<String> {
    if self.scheme != base.scheme || self.authority != base.authority {
      return None;
    }
    let common = self
      .segments
      .iter()
      .zip(&base.segments)
      .take_while(|(a, b)| a == b)
      .count();
    let parts: Vec<&str> = std::iter::repeat_n("..", base.segments.len() - common)
      .chain(self.segments[common..].iter().map(String::as_str))
      .collect();
    Some(parts.join("/"))
  }

  /// Whether `self` is `other` or lives below it.
  pub fn starts_with(&self, other: &Path) -> bool {
    self.scheme == other.scheme
      && self.authority == other.authority
      && self.segments.starts_with(&other.segments)
  }
}

impl fmt::Display for Path {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.scheme == "file" {
      write!(f, "{}", self.fs_path().display())
    } else {
      write!(f, "{}", self.id())
    }
  }
}

/// Extension of a file name including the dot; empty for dotfiles and names
/// without one.
pub fn extension_of(name: &str) -> &str {
  match name.rfind('.') {
    Some(0) | None => "",
    Some(i) => &name[i..],
  }
}

/// Strips one trailing path separator, if present.
pub fn strip_trailing_separator(value: &str) -> Option<&str> {
  value
    .strip_suffix('/')
    .or_else(|| value.strip_suffix(std::path::MAIN_SEPARATOR))
}
