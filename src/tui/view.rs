use crate::command::Command;
use crate::fs::Entry;
use crate::host::{Button, PickList, ViewEvent};

/// Picklist state for the terminal. Rows are the items whose name contains
/// the typed text, ignoring case; synthetic items are always rows.
#[derive(Debug, Default)]
pub struct TuiView {
  items: Vec<Entry>,
  /// Indices into `items` that pass the filter.
  rows: Vec<usize>,
  /// Index into `rows`.
  cursor: Option<usize>,
  value: String,
  title: String,
  placeholder: String,
  buttons: Vec<Button>,
  busy: bool,
  enabled: bool,
  visible: bool,
  disposed: bool,
}

impl TuiView {
  pub fn new() -> Self {
    Self::default()
  }

  /// Applies a widget-level command and returns the event the browser
  /// should see, if any.
  pub fn apply(&mut self, command: Command) -> Option<ViewEvent> {
    if self.disposed {
      return None;
    }
    if command == Command::Close {
      self.hide();
      return Some(ViewEvent::Hidden);
    }
    if !self.enabled {
      return None;
    }
    match command {
      Command::Input(c) => {
        self.value.push(c);
        self.refilter();
        Some(ViewEvent::TextChanged(self.value.clone()))
      }
      Command::Backspace => {
        self.value.pop()?;
        self.refilter();
        Some(ViewEvent::TextChanged(self.value.clone()))
      }
      Command::MoveUp => self.move_cursor(false),
      Command::MoveDown => self.move_cursor(true),
      Command::Accept => Some(ViewEvent::Accept),
      Command::StepIn => self.trigger(Button::StepIn),
      Command::StepOut => self.trigger(Button::StepOut),
      Command::Actions => self.trigger(Button::Actions),
      _ => None,
    }
  }

  fn trigger(&self, button: Button) -> Option<ViewEvent> {
    self.buttons.contains(&button).then_some(ViewEvent::ButtonTriggered(button))
  }

  fn move_cursor(&mut self, down: bool) -> Option<ViewEvent> {
    if self.rows.is_empty() {
      return None;
    }
    let last = self.rows.len() - 1;
    let next = match (self.cursor, down) {
      (None, true) => 0,
      (None, false) => last,
      (Some(c), true) => (c + 1).min(last),
      (Some(c), false) => c.saturating_sub(1),
    };
    if self.cursor == Some(next) {
      return None;
    }
    self.cursor = Some(next);
    Some(ViewEvent::ActiveChanged(self.active()))
  }

  fn refilter(&mut self) {
    let active = self.active();
    let needle = self.value.to_lowercase();
    self.rows = self
      .items
      .iter()
      .enumerate()
      .filter(|(_, e)| e.always_show() || e.name().to_lowercase().contains(&needle))
      .map(|(i, _)| i)
      .collect();
    self.cursor = active.and_then(|a| self.rows.iter().position(|&r| r == a));
  }

  /// Index into the items of the highlighted row.
  pub fn active(&self) -> Option<usize> {
    self.cursor.and_then(|c| self.rows.get(c).copied())
  }

  pub fn rows(&self) -> impl Iterator<Item = &Entry> {
    self.rows.iter().map(|&i| &self.items[i])
  }

  pub fn row_count(&self) -> usize {
    self.rows.len()
  }

  pub fn cursor(&self) -> Option<usize> {
    self.cursor
  }

  pub fn value(&self) -> &str {
    &self.value
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn placeholder(&self) -> &str {
    &self.placeholder
  }

  pub fn buttons(&self) -> &[Button] {
    &self.buttons
  }

  pub fn is_busy(&self) -> bool {
    self.busy
  }

  pub fn is_visible(&self) -> bool {
    self.visible
  }

  pub fn is_disposed(&self) -> bool {
    self.disposed
  }
}

impl PickList for TuiView {
  fn set_items(&mut self, items: &[Entry]) {
    self.items = items.to_vec();
    self.cursor = None;
    self.refilter();
  }

  fn set_active(&mut self, active: Option<usize>) {
    self.cursor = active.and_then(|a| self.rows.iter().position(|&r| r == a));
  }

  fn set_value(&mut self, value: &str) {
    self.value = value.to_string();
    self.refilter();
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
  }

  fn dispose(&mut self) {
    self.visible = false;
    self.disposed = true;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fs::FileKind;

  fn view() -> TuiView {
    let mut v = TuiView::new();
    v.set_items(&[
      Entry::listed("src", FileKind::DIRECTORY),
      Entry::listed("Cargo.toml", FileKind::FILE),
      Entry::listed("README.md", FileKind::FILE),
    ]);
    v.set_enabled(true);
    v.show();
    v
  }

  fn names(v: &TuiView) -> Vec<&str> {
    v.rows().map(Entry::name).collect()
  }

  #[test]
  fn test_typing_filters_case_insensitively() {
    let mut v = view();
    assert_eq!(v.apply(Command::Input('c')), Some(ViewEvent::TextChanged("c".to_string())));
    assert_eq!(names(&v), ["src", "Cargo.toml"]);
    v.apply(Command::Input('A'));
    assert_eq!(names(&v), ["Cargo.toml"]);
  }

  #[test]
  fn test_backspace_widens_filter() {
    let mut v = view();
    v.apply(Command::Input('r'));
    v.apply(Command::Input('e'));
    assert_eq!(names(&v), ["README.md"]);
    assert_eq!(v.apply(Command::Backspace), Some(ViewEvent::TextChanged("r".to_string())));
    assert_eq!(names(&v), ["src", "Cargo.toml", "README.md"]);
    v.apply(Command::Backspace);
    assert_eq!(v.apply(Command::Backspace), None);
  }

  #[test]
  fn test_synthetic_rows_survive_filter() {
    let mut v = view();
    v.set_value("zzz");
    assert_eq!(v.row_count(), 0);
    let mut items: Vec<Entry> = v.items.clone();
    items.push(Entry::jump_to_line("42"));
    v.set_items(&items);
    assert_eq!(names(&v), ["42"]);
  }

  #[test]
  fn test_cursor_reports_item_indices() {
    let mut v = view();
    v.set_value("m");
    // rows: Cargo.toml (1), README.md (2)
    assert_eq!(v.apply(Command::MoveDown), Some(ViewEvent::ActiveChanged(Some(1))));
    assert_eq!(v.apply(Command::MoveDown), Some(ViewEvent::ActiveChanged(Some(2))));
    assert_eq!(v.apply(Command::MoveDown), None);
    assert_eq!(v.apply(Command::MoveUp), Some(ViewEvent::ActiveChanged(Some(1))));
  }

  #[test]
  fn test_move_up_from_nothing_selects_last() {
    let mut v = view();
    assert_eq!(v.apply(Command::MoveUp), Some(ViewEvent::ActiveChanged(Some(2))));
    assert_eq!(v.cursor(), Some(2));
  }

  #[test]
  fn test_set_active_maps_to_row() {
    let mut v = view();
    v.set_value("md");
    v.set_active(Some(2));
    assert_eq!(v.cursor(), Some(0));
    v.set_active(Some(0));
    assert_eq!(v.cursor(), None);
    assert_eq!(v.active(), None);
  }

  #[test]
  fn test_close_hides() {
    let mut v = view();
    assert_eq!(v.apply(Command::Close), Some(ViewEvent::Hidden));
    assert!(!v.is_visible());
  }

  #[test]
  fn test_buttons_only_when_installed() {
    let mut v = view();
    assert_eq!(v.apply(Command::Actions), None);
    v.set_buttons(&Button::ALL);
    assert_eq!(v.apply(Command::Actions), Some(ViewEvent::ButtonTriggered(Button::Actions)));
    assert_eq!(v.apply(Command::StepOut), Some(ViewEvent::ButtonTriggered(Button::StepOut)));
    assert_eq!(v.apply(Command::Accept), Some(ViewEvent::Accept));
    assert_eq!(v.apply(Command::TabNext), None);
  }

  #[test]
  fn test_disabled_ignores_input() {
    let mut v = view();
    v.set_enabled(false);
    assert_eq!(v.apply(Command::Input('x')), None);
    assert_eq!(v.value(), "");
  }

  #[test]
  fn test_disposed_is_inert() {
    let mut v = view();
    v.dispose();
    assert!(v.is_disposed());
    assert_eq!(v.apply(Command::Close), None);
  }
}
