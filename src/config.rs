use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::command::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
  pub code: KeyCode,
  pub modifiers: KeyModifiers,
}

impl KeyBinding {
  pub fn display_key(&self) -> String {
    let key_name = match self.code {
      KeyCode::Char(' ') => "Space".to_string(),
      KeyCode::Char(c) => c.to_string(),
      KeyCode::Enter => "Enter".to_string(),
      KeyCode::Esc => "Esc".to_string(),
      KeyCode::Backspace => "Backspace".to_string(),
      KeyCode::Tab => "Tab".to_string(),
      KeyCode::BackTab => "Shift+Tab".to_string(),
      KeyCode::Up => "Up".to_string(),
      KeyCode::Down => "Down".to_string(),
      KeyCode::Left => "Left".to_string(),
      KeyCode::Right => "Right".to_string(),
      KeyCode::F(n) => format!("F{n}"),
      _ => format!("{:?}", self.code),
    };

    if self.modifiers.contains(KeyModifiers::CONTROL) {
      format!("Ctrl+{key_name}")
    } else if self.modifiers.contains(KeyModifiers::ALT) {
      format!("Alt+{key_name}")
    } else {
      key_name
    }
  }
}

/// Where ignore files are collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IgnoreScope {
  /// Only the directory being listed.
  #[default]
  Directory,
  /// Every directory from the root down to the one being listed.
  Ancestors,
}

impl IgnoreScope {
  fn from_name(name: &str) -> Option<IgnoreScope> {
    match name {
      "directory" => Some(IgnoreScope::Directory),
      "ancestors" => Some(IgnoreScope::Ancestors),
      _ => None,
    }
  }
}

/// Options consulted by the browser core on every refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserOptions {
  pub hide_ignored_files: bool,
  pub remove_ignored_files: bool,
  pub label_ignored_files: bool,
  pub hide_dotfiles: bool,
  /// Glob patterns selecting which files in a directory hold ignore rules.
  pub ignore_file_types: Vec<String>,
  pub ignore_scope: IgnoreScope,
  pub case_insensitive_sort: bool,
  pub line_jump_prefix: String,
  pub symbol_search_prefix: Option<String>,
  pub prompt_file_type: bool,
  pub use_trash: bool,
}

impl Default for BrowserOptions {
  fn default() -> Self {
    BrowserOptions {
      hide_ignored_files: true,
      remove_ignored_files: false,
      label_ignored_files: true,
      hide_dotfiles: false,
      ignore_file_types: vec![".gitignore".to_string()],
      ignore_scope: IgnoreScope::Directory,
      case_insensitive_sort: false,
      line_jump_prefix: ":".to_string(),
      symbol_search_prefix: None,
      prompt_file_type: true,
      use_trash: false,
    }
  }
}

pub struct Config {
  pub tick_rate_ms: u64,
  pub browser: BrowserOptions,
  pub keys: HashMap<KeyBinding, Command>,
}

#[derive(Deserialize, Default)]
struct TomlConfig {
  general: Option<GeneralConfig>,
  browser: Option<BrowserConfig>,
  keys: Option<HashMap<String, String>>,
}

#[derive(Deserialize, Default)]
struct GeneralConfig {
  tick_rate_ms: Option<u64>,
}

#[derive(Deserialize, Default)]
struct BrowserConfig {
  #[serde(alias = "hideIgnoredFiles")]
  hide_ignored_files: Option<bool>,
  #[serde(alias = "removeIgnoredFiles")]
  remove_ignored_files: Option<bool>,
  #[serde(alias = "labelIgnoredFiles")]
  label_ignored_files: Option<bool>,
  #[serde(alias = "hideDotfiles")]
  hide_dotfiles: Option<bool>,
  #[serde(alias = "ignoreFileTypes")]
  ignore_file_types: Option<Vec<String>>,
  #[serde(alias = "ignoreScope")]
  ignore_scope: Option<String>,
  #[serde(alias = "caseInsensitiveSort")]
  case_insensitive_sort: Option<bool>,
  #[serde(alias = "lineJumpPrefix")]
  line_jump_prefix: Option<String>,
  #[serde(alias = "symbolSearchPrefix")]
  symbol_search_prefix: Option<String>,
  #[serde(alias = "promptFileType")]
  prompt_file_type: Option<bool>,
  #[serde(alias = "useTrash")]
  use_trash: Option<bool>,
}

pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
  if s.is_empty() {
    return None;
  }

  let parts: Vec<&str> = s.split('+').collect();

  if parts.len() == 1 {
    let key = parts[0];
    if let Some(code) = named_key(key) {
      return Some(KeyBinding { code, modifiers: KeyModifiers::NONE });
    }
    let mut chars = key.chars();
    return match (chars.next(), chars.next()) {
      (Some(c), None) => Some(KeyBinding { code: KeyCode::Char(c), modifiers: KeyModifiers::NONE }),
      _ => None,
    };
  }

  if parts.len() == 2 {
    let key_str = parts[1];
    let modifiers = match parts[0].to_lowercase().as_str() {
      "ctrl" => KeyModifiers::CONTROL,
      "alt" => KeyModifiers::ALT,
      "shift" => {
        if key_str.eq_ignore_ascii_case("tab") {
          return Some(KeyBinding { code: KeyCode::BackTab, modifiers: KeyModifiers::NONE });
        }
        let mut chars = key_str.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
          let upper = c.to_uppercase().next().unwrap_or(c);
          return Some(KeyBinding { code: KeyCode::Char(upper), modifiers: KeyModifiers::NONE });
        }
        return named_key(key_str).map(|code| KeyBinding { code, modifiers: KeyModifiers::SHIFT });
      }
      _ => return None,
    };

    if let Some(code) = named_key(key_str) {
      return Some(KeyBinding { code, modifiers });
    }
    let mut chars = key_str.chars();
    return match (chars.next(), chars.next()) {
      (Some(c), None) => Some(KeyBinding { code: KeyCode::Char(c), modifiers }),
      _ => None,
    };
  }

  None
}

fn named_key(s: &str) -> Option<KeyCode> {
  match s.to_lowercase().as_str() {
    "enter" => Some(KeyCode::Enter),
    "space" => Some(KeyCode::Char(' ')),
    "esc" => Some(KeyCode::Esc),
    "up" => Some(KeyCode::Up),
    "down" => Some(KeyCode::Down),
    "left" => Some(KeyCode::Left),
    "right" => Some(KeyCode::Right),
    "backspace" => Some(KeyCode::Backspace),
    "tab" => Some(KeyCode::Tab),
    "backtab" => Some(KeyCode::BackTab),
    s if s.starts_with('f') && s.len() > 1 => {
      s[1..].parse::<u8>().ok().filter(|&n| (1..=24).contains(&n)).map(KeyCode::F)
    }
    _ => None,
  }
}

pub fn normalize_key_event(key: KeyEvent) -> KeyBinding {
  let mut modifiers = key.modifiers;
  if let KeyCode::Char(c) = key.code
    && c.is_uppercase()
  {
    modifiers -= KeyModifiers::SHIFT;
  }
  // Terminals report Shift+Tab as BackTab with SHIFT set.
  if key.code == KeyCode::BackTab {
    modifiers -= KeyModifiers::SHIFT;
  }
  KeyBinding { code: key.code, modifiers }
}

impl Default for Config {
  fn default() -> Self {
    let mut config = Config::empty();
    let mut errors = Vec::new();
    config.apply_toml_str(Config::default_toml(), &mut errors);
    config
  }
}

impl Config {
  fn empty() -> Self {
    Config {
      tick_rate_ms: 100,
      browser: BrowserOptions::default(),
      keys: HashMap::new(),
    }
  }

  fn apply_toml_str(&mut self, s: &str, errors: &mut Vec<String>) {
    let toml_config: TomlConfig = match toml::from_str(s) {
      Ok(c) => c,
      Err(e) => {
        errors.push(format!("failed to parse config.toml: {e}"));
        return;
      }
    };

    if let Some(general) = toml_config.general
      && let Some(tick) = general.tick_rate_ms
    {
      self.tick_rate_ms = tick;
    }

    if let Some(browser) = toml_config.browser {
      self.apply_browser(browser, errors);
    }

    if let Some(keys) = toml_config.keys {
      self.keys.clear();
      for (key_str, command_str) in &keys {
        let Some(kb) = parse_key_binding(key_str) else {
          errors.push(format!("invalid key binding: {key_str:?}"));
          continue;
        };
        let Some(command) = Command::from_name(command_str) else {
          errors.push(format!("invalid command: {command_str:?}"));
          continue;
        };
        self.keys.insert(kb, command);
      }
    }
  }

  fn apply_browser(&mut self, b: BrowserConfig, errors: &mut Vec<String>) {
    let opts = &mut self.browser;
    if let Some(v) = b.hide_ignored_files {
      opts.hide_ignored_files = v;
    }
    if let Some(v) = b.remove_ignored_files {
      opts.remove_ignored_files = v;
    }
    if let Some(v) = b.label_ignored_files {
      opts.label_ignored_files = v;
    }
    if let Some(v) = b.hide_dotfiles {
      opts.hide_dotfiles = v;
    }
    if let Some(v) = b.ignore_file_types {
      let (valid, invalid): (Vec<_>, Vec<_>) = v
        .into_iter()
        .partition(|p| globset::Glob::new(p).is_ok());
      for pattern in invalid {
        errors.push(format!("invalid ignore file pattern: {pattern:?}"));
      }
      opts.ignore_file_types = valid;
    }
    if let Some(name) = b.ignore_scope {
      match IgnoreScope::from_name(&name) {
        Some(scope) => opts.ignore_scope = scope,
        None => errors.push(format!("invalid ignore_scope: {name:?}")),
      }
    }
    if let Some(v) = b.case_insensitive_sort {
      opts.case_insensitive_sort = v;
    }
    if let Some(prefix) = b.line_jump_prefix {
      if prefix.is_empty() {
        errors.push("line_jump_prefix must not be empty".to_string());
      } else {
        opts.line_jump_prefix = prefix;
      }
    }
    if let Some(prefix) = b.symbol_search_prefix {
      opts.symbol_search_prefix = Some(prefix).filter(|p| !p.is_empty());
    }
    if let Some(v) = b.prompt_file_type {
      opts.prompt_file_type = v;
    }
    if let Some(v) = b.use_trash {
      opts.use_trash = v;
    }
  }

  pub fn default_toml() -> &'static str {
    r#"[general]
tick_rate_ms = 100              # event loop tick rate in ms

[browser]
hide_ignored_files = true       # apply ignore rules to listings
remove_ignored_files = false    # drop ignored entries instead of moving them last
label_ignored_files = true      # describe moved entries as "ignored"
hide_dotfiles = false
ignore_file_types = [".gitignore"]
ignore_scope = "directory"      # "directory" or "ancestors"
case_insensitive_sort = false
line_jump_prefix = ":"
symbol_search_prefix = ""       # e.g. "@"; empty disables symbol search
prompt_file_type = true         # ask for a language when a new file has no extension
use_trash = false               # delete to the system trash

[keys]
enter = "accept"
tab = "tab_next"
backtab = "tab_prev"
right = "step_in"
"ctrl+l" = "step_in"
left = "step_out"
"ctrl+h" = "step_out"
"ctrl+o" = "actions"
up = "move_up"
down = "move_down"
esc = "close"
"ctrl+c" = "close"
"#
  }

  pub fn reverse_lookup(&self) -> HashMap<Command, Vec<String>> {
    let mut map: HashMap<Command, Vec<String>> = HashMap::new();
    for (kb, command) in &self.keys {
      map.entry(*command).or_default().push(kb.display_key());
    }
    for keys in map.values_mut() {
      keys.sort();
    }
    map
  }

  pub fn config_path() -> Result<std::path::PathBuf, String> {
    dirs::config_dir()
      .map(|d| d.join("qbrowse").join("config.toml"))
      .ok_or_else(|| "could not determine config directory".to_string())
  }

  pub fn dump_default_config(path: &std::path::Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
    }

    std::fs::write(path, Self::default_toml())
      .map_err(|e| format!("failed to write {}: {e}", path.display()))?;

    Ok(())
  }

  pub fn load() -> (Config, Vec<String>) {
    let mut errors = Vec::new();
    let content = Self::config_path()
      .ok()
      .and_then(|p| std::fs::read_to_string(p).ok());

    let config = match content {
      Some(s) => Self::load_from_str_with_errors(&s, &mut errors),
      None => Config::default(),
    };
    (config, errors)
  }

  pub fn load_from_str(s: &str) -> Config {
    let mut errors = Vec::new();
    Self::load_from_str_with_errors(s, &mut errors)
  }

  fn load_from_str_with_errors(s: &str, errors: &mut Vec<String>) -> Config {
    let mut config = Config::default();
    config.apply_toml_str(s, errors);
    config
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::{KeyEventKind, KeyEventState};

  fn kb(code: KeyCode) -> KeyBinding {
    KeyBinding { code, modifiers: KeyModifiers::NONE }
  }

  fn load_with_errors(s: &str) -> (Config, Vec<String>) {
    let mut errors = Vec::new();
    let config = Config::load_from_str_with_errors(s, &mut errors);
    (config, errors)
  }

  // --- parse_key_binding tests ---

  #[test]
  fn test_parse_single_char() {
    assert_eq!(parse_key_binding("j"), Some(kb(KeyCode::Char('j'))));
    assert_eq!(parse_key_binding("ø"), Some(kb(KeyCode::Char('ø'))));
  }

  #[test]
  fn test_parse_shift_char_is_uppercase() {
    assert_eq!(parse_key_binding("shift+j"), parse_key_binding("J"));
  }

  #[test]
  fn test_parse_shift_tab_is_backtab() {
    assert_eq!(parse_key_binding("shift+tab"), Some(kb(KeyCode::BackTab)));
    assert_eq!(parse_key_binding("backtab"), Some(kb(KeyCode::BackTab)));
  }

  #[test]
  fn test_parse_ctrl_modifier() {
    let binding = parse_key_binding("ctrl+o").unwrap();
    assert_eq!(binding.code, KeyCode::Char('o'));
    assert_eq!(binding.modifiers, KeyModifiers::CONTROL);
  }

  #[test]
  fn test_parse_named_keys() {
    assert_eq!(parse_key_binding("enter").unwrap().code, KeyCode::Enter);
    assert_eq!(parse_key_binding("Esc").unwrap().code, KeyCode::Esc);
    assert_eq!(parse_key_binding("tab").unwrap().code, KeyCode::Tab);
    assert_eq!(parse_key_binding("f2").unwrap().code, KeyCode::F(2));
  }

  #[test]
  fn test_parse_invalid() {
    assert!(parse_key_binding("").is_none());
    assert!(parse_key_binding("foobar").is_none());
    assert!(parse_key_binding("meta+x").is_none());
    assert!(parse_key_binding("ctrl+alt+x").is_none());
  }

  // --- normalize_key_event tests ---

  fn key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
      code,
      modifiers,
      kind: KeyEventKind::Press,
      state: KeyEventState::NONE,
    }
  }

  #[test]
  fn test_normalize_uppercase_strips_shift() {
    let binding = normalize_key_event(key_event(KeyCode::Char('J'), KeyModifiers::SHIFT));
    assert_eq!(binding, kb(KeyCode::Char('J')));
  }

  #[test]
  fn test_normalize_backtab_strips_shift() {
    let binding = normalize_key_event(key_event(KeyCode::BackTab, KeyModifiers::SHIFT));
    assert_eq!(binding, kb(KeyCode::BackTab));
  }

  // --- defaults ---

  #[test]
  fn test_default_browser_options_match_toml() {
    let config = Config::default();
    assert_eq!(config.browser, BrowserOptions::default());
    assert_eq!(config.tick_rate_ms, 100);
  }

  #[test]
  fn test_default_key_bindings() {
    let config = Config::default();
    let ctrl = |c| KeyBinding { code: KeyCode::Char(c), modifiers: KeyModifiers::CONTROL };
    let expected = [
      (kb(KeyCode::Enter), Command::Accept),
      (kb(KeyCode::Tab), Command::TabNext),
      (kb(KeyCode::BackTab), Command::TabPrev),
      (kb(KeyCode::Right), Command::StepIn),
      (ctrl('l'), Command::StepIn),
      (kb(KeyCode::Left), Command::StepOut),
      (ctrl('h'), Command::StepOut),
      (ctrl('o'), Command::Actions),
      (kb(KeyCode::Up), Command::MoveUp),
      (kb(KeyCode::Down), Command::MoveDown),
      (kb(KeyCode::Esc), Command::Close),
      (ctrl('c'), Command::Close),
    ];
    for (binding, command) in expected {
      assert_eq!(config.keys.get(&binding), Some(&command), "missing binding for {binding:?}");
    }
    assert_eq!(config.keys.len(), expected.len());
  }

  #[test]
  fn test_default_derives_from_toml_not_hardcoded() {
    assert!(Config::empty().keys.is_empty());
    assert!(!Config::default().keys.is_empty());
  }

  #[test]
  fn test_default_toml_has_no_errors() {
    let (_, errors) = load_with_errors(Config::default_toml());
    assert!(errors.is_empty(), "{errors:?}");
  }

  // --- load_from_str tests ---

  #[test]
  fn test_load_browser_overrides() {
    let toml = r##"
[browser]
hide_dotfiles = true
remove_ignored_files = true
ignore_file_types = [".gitignore", ".*ignore"]
ignore_scope = "ancestors"
case_insensitive_sort = true
line_jump_prefix = "#"
symbol_search_prefix = "@"
use_trash = true
"##;
    let config = Config::load_from_str(toml);
    let b = &config.browser;
    assert!(b.hide_dotfiles);
    assert!(b.remove_ignored_files);
    assert_eq!(b.ignore_file_types, [".gitignore", ".*ignore"]);
    assert_eq!(b.ignore_scope, IgnoreScope::Ancestors);
    assert!(b.case_insensitive_sort);
    assert_eq!(b.line_jump_prefix, "#");
    assert_eq!(b.symbol_search_prefix.as_deref(), Some("@"));
    assert!(b.use_trash);
    // untouched keys keep their defaults
    assert!(b.hide_ignored_files);
    assert!(b.label_ignored_files);
  }

  #[test]
  fn test_load_accepts_camel_case_names() {
    let toml = r#"
[browser]
hideDotfiles = true
labelIgnoredFiles = false
ignoreFileTypes = [".npmignore"]
"#;
    let config = Config::load_from_str(toml);
    assert!(config.browser.hide_dotfiles);
    assert!(!config.browser.label_ignored_files);
    assert_eq!(config.browser.ignore_file_types, [".npmignore"]);
  }

  #[test]
  fn test_invalid_browser_values_reported_and_skipped() {
    let toml = r#"
[browser]
ignore_scope = "everywhere"
line_jump_prefix = ""
ignore_file_types = ["[bad", ".gitignore"]
"#;
    let (config, errors) = load_with_errors(toml);
    assert_eq!(config.browser.ignore_scope, IgnoreScope::Directory);
    assert_eq!(config.browser.line_jump_prefix, ":");
    assert_eq!(config.browser.ignore_file_types, [".gitignore"]);
    assert_eq!(errors.len(), 3);
  }

  #[test]
  fn test_empty_symbol_prefix_disables() {
    let config = Config::load_from_str("[browser]\nsymbol_search_prefix = \"\"\n");
    assert_eq!(config.browser.symbol_search_prefix, None);
  }

  #[test]
  fn test_keys_section_replaces_defaults() {
    let toml = r#"
[keys]
"ctrl+j" = "move_down"
enter = "accept"
"#;
    let config = Config::load_from_str(toml);
    assert_eq!(config.keys.len(), 2);
    let ctrl_j = KeyBinding { code: KeyCode::Char('j'), modifiers: KeyModifiers::CONTROL };
    assert_eq!(config.keys.get(&ctrl_j), Some(&Command::MoveDown));
    assert_eq!(config.keys.get(&kb(KeyCode::Tab)), None);
  }

  #[test]
  fn test_invalid_key_or_command_skipped() {
    let toml = r#"
[keys]
"" = "accept"
x = "explode"
y = "close"
"#;
    let (config, errors) = load_with_errors(toml);
    assert_eq!(config.keys.len(), 1);
    assert_eq!(config.keys.get(&kb(KeyCode::Char('y'))), Some(&Command::Close));
    assert_eq!(errors.len(), 2);
  }

  #[test]
  fn test_load_malformed_toml_returns_default() {
    let (config, errors) = load_with_errors("this is not [valid toml");
    assert_eq!(config.tick_rate_ms, 100);
    assert_eq!(config.browser, BrowserOptions::default());
    assert_eq!(errors.len(), 1);
  }

  #[test]
  fn test_reverse_lookup() {
    let lookup = Config::default().reverse_lookup();
    let close = lookup.get(&Command::Close).unwrap();
    assert_eq!(close, &["Ctrl+c".to_string(), "Esc".to_string()]);
  }

  #[test]
  fn test_display_key() {
    assert_eq!(kb(KeyCode::Char(' ')).display_key(), "Space");
    assert_eq!(kb(KeyCode::BackTab).display_key(), "Shift+Tab");
    let ctrl = KeyBinding { code: KeyCode::Char('o'), modifiers: KeyModifiers::CONTROL };
    assert_eq!(ctrl.display_key(), "Ctrl+o");
  }
}
