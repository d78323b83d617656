use std::collections::HashMap;

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};

use crate::config::{BrowserOptions, IgnoreScope};
use crate::fs::{Entry, FileSystem};
use crate::path::Path;

/// One line of a gitignore-style file, compiled against the directory the
/// file lives in.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
  origin: Path,
  pattern: String,
  negated: bool,
  dir_only: bool,
  matcher: GlobMatcher,
}

impl IgnoreRule {
  /// Parses one line. Blank lines, comments and invalid globs yield `None`.
  pub fn parse(origin: &Path, line: &str) -> Option<IgnoreRule> {
    let line = line.trim_end();
    if line.is_empty() || line.starts_with('#') {
      return None;
    }

    let (negated, body) = if let Some(rest) = line.strip_prefix('!') {
      (true, rest)
    } else if let Some(rest) = line.strip_prefix('\\') {
      // "\#" and "\!" match a literal leading character
      (false, rest)
    } else {
      (false, line)
    };

    let (dir_only, body) = match body.strip_suffix('/') {
      Some(rest) => (true, rest),
      None => (false, body),
    };
    if body.is_empty() {
      return None;
    }

    let anchored = body.contains('/');
    let body = body.strip_prefix('/').unwrap_or(body);
    let glob = if anchored { body.to_string() } else { format!("**/{body}") };

    match GlobBuilder::new(&glob).literal_separator(true).build() {
      Ok(compiled) => Some(IgnoreRule {
        origin: origin.clone(),
        pattern: line.to_string(),
        negated,
        dir_only,
        matcher: compiled.compile_matcher(),
      }),
      Err(e) => {
        tracing::warn!("skipping ignore pattern {line:?} in {}: {e}", origin.display_path());
        None
      }
    }
  }

  pub fn pattern(&self) -> &str {
    &self.pattern
  }

  pub fn is_negated(&self) -> bool {
    self.negated
  }

  /// `Some(ignored)` when the rule applies to `path`, `None` otherwise.
  fn verdict(&self, path: &Path, is_dir: bool) -> Option<bool> {
    if self.dir_only && !is_dir {
      return None;
    }
    if path == &self.origin || !path.starts_with(&self.origin) {
      return None;
    }
    let relative = path.segments()[self.origin.segments().len()..].join("/");
    self.matcher.is_match(relative.as_str()).then_some(!self.negated)
  }
}

/// Ordered rules, outermost first. The last matching rule decides.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
  rules: Vec<IgnoreRule>,
}

impl RuleSet {
  pub fn from_lines(origin: &Path, text: &str) -> RuleSet {
    let mut set = RuleSet::default();
    set.extend(origin, text);
    set
  }

  fn extend(&mut self, origin: &Path, text: &str) {
    self.rules.extend(text.lines().filter_map(|line| IgnoreRule::parse(origin, line)));
  }

  /// Collects the rules that govern the children of `path`. Ignore files
  /// that are missing or unreadable contribute nothing.
  pub fn for_path<F: FileSystem + ?Sized>(fs: &F, path: &Path, options: &BrowserOptions) -> RuleSet {
    let names = file_name_set(&options.ignore_file_types);
    let mut set = RuleSet::default();

    let dirs = match options.ignore_scope {
      IgnoreScope::Directory => vec![path.clone()],
      IgnoreScope::Ancestors => {
        let mut dirs = vec![path.clone()];
        let mut cur = path.clone();
        while cur.pop().is_some() {
          dirs.push(cur.clone());
        }
        dirs.reverse();
        dirs
      }
    };

    for dir in dirs {
      let Ok(children) = fs.read_directory(&dir) else {
        continue;
      };
      let mut files: Vec<String> = children
        .into_iter()
        .filter(|(name, kind)| !kind.is_dir() && names.is_match(name))
        .map(|(name, _)| name)
        .collect();
      files.sort();
      for name in files {
        match fs.read_file(&dir.append([&name])) {
          Ok(bytes) => set.extend(&dir, &String::from_utf8_lossy(&bytes)),
          Err(e) => tracing::debug!("cannot read {name} in {}: {e}", dir.display_path()),
        }
      }
    }
    set
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  fn decide(&self, path: &Path, is_dir: bool) -> bool {
    self
      .rules
      .iter()
      .rev()
      .find_map(|rule| rule.verdict(path, is_dir))
      .unwrap_or(false)
  }

  /// Whether `name` inside `base` is ignored. An ignored parent directory
  /// hides everything below it.
  pub fn is_ignored(&self, base: &Path, name: &str, is_dir: bool) -> bool {
    if self.rules.is_empty() {
      return false;
    }
    let mut prefix = base.root();
    for segment in base.segments() {
      prefix.push([segment]);
      if self.decide(&prefix, true) {
        return true;
      }
    }
    self.decide(&base.append([name]), is_dir)
  }

  /// Flags ignored listed entries in place.
  pub fn mark(&self, base: &Path, entries: &mut [Entry]) {
    for entry in entries {
      if let Entry::Listed { name, kind, ignored } = entry {
        *ignored = self.is_ignored(base, name, kind.is_dir());
      }
    }
  }

  /// Drops ignored entries; synthetic entries always survive.
  pub fn filter(&self, base: &Path, entries: Vec<Entry>) -> Vec<Entry> {
    entries
      .into_iter()
      .filter(|e| e.always_show() || !self.is_ignored(base, e.name(), e.is_dir()))
      .collect()
  }
}

fn file_name_set(patterns: &[String]) -> GlobSet {
  let mut builder = GlobSetBuilder::new();
  for pattern in patterns {
    match Glob::new(pattern) {
      Ok(glob) => {
        builder.add(glob);
      }
      Err(e) => tracing::warn!("invalid ignore file pattern {pattern:?}: {e}"),
    }
  }
  builder.build().unwrap_or_else(|e| {
    tracing::warn!("failed to build ignore file matcher: {e}");
    GlobSet::empty()
  })
}

/// Rule sets per directory for the lifetime of one session.
#[derive(Debug, Default)]
pub struct IgnoreCache {
  sets: HashMap<String, RuleSet>,
}

impl IgnoreCache {
  pub fn rules<F: FileSystem + ?Sized>(
    &mut self,
    fs: &F,
    path: &Path,
    options: &BrowserOptions,
  ) -> &RuleSet {
    self
      .sets
      .entry(path.id())
      .or_insert_with(|| RuleSet::for_path(fs, path, options))
  }

  pub fn clear(&mut self) {
    self.sets.clear();
  }

  pub fn len(&self) -> usize {
    self.sets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sets.is_empty()
  }
}
