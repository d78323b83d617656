use crate::fs::Entry;
use crate::path::strip_trailing_separator;

/// Where a typed `segment/` leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavTarget {
  Home,
  Parent,
  Into(String),
}

/// What the text field currently asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
  Clear,
  Existing(usize),
  JumpToLine(String),
  SymbolSearch(String),
  Navigate(NavTarget),
  /// Offer to create `name`; `prefer_file` picks which offer is active.
  Create { name: String, prefer_file: bool },
}

/// Reserved prefixes of the text field.
#[derive(Debug, Clone, Copy)]
pub struct Prefixes<'a> {
  pub line_jump: &'a str,
  pub symbol_search: Option<&'a str>,
}

/// Classifies the text field against the current listing. Earlier rules win.
pub fn classify(value: &str, items: &[Entry], prefixes: Prefixes<'_>) -> Interpretation {
  if value.is_empty() {
    return Interpretation::Clear;
  }
  if let Some(idx) = items.iter().position(|e| e.name() == value) {
    return Interpretation::Existing(idx);
  }
  if let Some(rest) = value.strip_prefix(prefixes.line_jump) {
    return Interpretation::JumpToLine(rest.to_string());
  }
  if let Some(prefix) = prefixes.symbol_search
    && let Some(rest) = value.strip_prefix(prefix)
  {
    return Interpretation::SymbolSearch(rest.to_string());
  }
  if let Some(segment) = strip_trailing_separator(value) {
    let target = match segment {
      "~" => NavTarget::Home,
      ".." => NavTarget::Parent,
      _ => NavTarget::Into(segment.to_string()),
    };
    return Interpretation::Navigate(target);
  }
  if value == ".." {
    return Interpretation::Navigate(NavTarget::Parent);
  }
  Interpretation::Create {
    name: value.to_string(),
    prefer_file: value.contains('.') && value != ".",
  }
}

/// Indices of listed entries whose name starts with `value`, ignoring case.
pub fn completion_candidates(value: &str, items: &[Entry]) -> Vec<usize> {
  let needle = value.to_lowercase();
  items
    .iter()
    .enumerate()
    .filter(|(_, e)| !e.always_show() && e.name().to_lowercase().starts_with(&needle))
    .map(|(i, _)| i)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fs::FileKind;

  const DEFAULT: Prefixes<'static> = Prefixes { line_jump: ":", symbol_search: None };

  fn items() -> Vec<Entry> {
    vec![
      Entry::listed("src", FileKind::DIRECTORY),
      Entry::listed("Cargo.toml", FileKind::FILE),
      Entry::listed("cargo.lock", FileKind::FILE),
    ]
  }

  #[test]
  fn test_empty_clears() {
    assert_eq!(classify("", &items(), DEFAULT), Interpretation::Clear);
  }

  #[test]
  fn test_exact_name_selects_existing() {
    assert_eq!(classify("Cargo.toml", &items(), DEFAULT), Interpretation::Existing(1));
    // exact means exact
    assert!(matches!(classify("cargo.toml", &items(), DEFAULT), Interpretation::Create { .. }));
  }

  #[test]
  fn test_existing_beats_prefixes() {
    let list = vec![Entry::listed(":memo", FileKind::FILE)];
    assert_eq!(classify(":memo", &list, DEFAULT), Interpretation::Existing(0));
  }

  #[test]
  fn test_line_jump_prefix() {
    assert_eq!(
      classify(":42", &items(), DEFAULT),
      Interpretation::JumpToLine("42".to_string())
    );
    assert_eq!(
      classify(":", &items(), DEFAULT),
      Interpretation::JumpToLine(String::new())
    );
  }

  #[test]
  fn test_symbol_prefix_only_when_enabled() {
    let with_symbols = Prefixes { line_jump: ":", symbol_search: Some("@") };
    assert_eq!(
      classify("@main", &items(), with_symbols),
      Interpretation::SymbolSearch("main".to_string())
    );
    assert!(matches!(classify("@main", &items(), DEFAULT), Interpretation::Create { .. }));
  }

  #[test]
  fn test_trailing_separator_navigates() {
    assert_eq!(classify("~/", &items(), DEFAULT), Interpretation::Navigate(NavTarget::Home));
    assert_eq!(classify("../", &items(), DEFAULT), Interpretation::Navigate(NavTarget::Parent));
    assert_eq!(
      classify("docs/", &items(), DEFAULT),
      Interpretation::Navigate(NavTarget::Into("docs".to_string()))
    );
    assert_eq!(classify("..", &items(), DEFAULT), Interpretation::Navigate(NavTarget::Parent));
  }

  #[test]
  fn test_create_prefers_file_when_dotted() {
    assert_eq!(
      classify("notes.md", &items(), DEFAULT),
      Interpretation::Create { name: "notes.md".to_string(), prefer_file: true }
    );
    assert_eq!(
      classify("notes", &items(), DEFAULT),
      Interpretation::Create { name: "notes".to_string(), prefer_file: false }
    );
    assert_eq!(
      classify(".", &items(), DEFAULT),
      Interpretation::Create { name: ".".to_string(), prefer_file: false }
    );
  }

  #[test]
  fn test_completion_candidates_case_insensitive() {
    let list = items();
    assert_eq!(completion_candidates("car", &list), [1, 2]);
    assert_eq!(completion_candidates("S", &list), [0]);
    assert!(completion_candidates("zzz", &list).is_empty());
  }

  #[test]
  fn test_completion_skips_synthetic() {
    let mut list = items();
    list.push(Entry::new_file("src2"));
    assert_eq!(completion_candidates("src", &list), [0]);
  }
}
