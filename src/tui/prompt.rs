//! Key handling for the modal prompts the terminal editor shows.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::host::InputBox;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
  Pending,
  Done(Option<T>),
}

fn is_cancel(key: &KeyEvent) -> bool {
  key.code == KeyCode::Esc
    || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// A vertical list of options; Enter picks, Esc dismisses.
#[derive(Debug, Clone)]
pub struct ChoicePrompt {
  pub options: Vec<String>,
  pub cursor: usize,
}

impl ChoicePrompt {
  pub fn new(options: &[String]) -> Self {
    Self { options: options.to_vec(), cursor: 0 }
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> Outcome<usize> {
    if is_cancel(&key) {
      return Outcome::Done(None);
    }
    let last = self.options.len().saturating_sub(1);
    match key.code {
      KeyCode::Enter if !self.options.is_empty() => return Outcome::Done(Some(self.cursor)),
      KeyCode::Up | KeyCode::BackTab => self.cursor = self.cursor.saturating_sub(1),
      KeyCode::Down | KeyCode::Tab => self.cursor = (self.cursor + 1).min(last),
      KeyCode::Home => self.cursor = 0,
      KeyCode::End => self.cursor = last,
      _ => {}
    }
    Outcome::Pending
  }
}

/// Single-line text field with a cursor and an optional selection, both in
/// characters.
#[derive(Debug, Clone)]
pub struct TextPrompt {
  pub prompt: String,
  chars: Vec<char>,
  cursor: usize,
  selection: Option<(usize, usize)>,
}

impl TextPrompt {
  pub fn new(input: &InputBox) -> Self {
    let chars: Vec<char> = input.value.chars().collect();
    let (start, end) = input.selection;
    let end = end.min(chars.len());
    let start = start.min(end);
    Self {
      prompt: input.prompt.clone(),
      cursor: end,
      selection: (start < end).then_some((start, end)),
      chars,
    }
  }

  pub fn value(&self) -> String {
    self.chars.iter().collect()
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn selection(&self) -> Option<(usize, usize)> {
    self.selection
  }

  fn delete_selection(&mut self) -> bool {
    let Some((start, end)) = self.selection.take() else {
      return false;
    };
    self.chars.drain(start..end);
    self.cursor = start;
    true
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> Outcome<String> {
    if is_cancel(&key) {
      return Outcome::Done(None);
    }
    match key.code {
      KeyCode::Enter => return Outcome::Done(Some(self.value())),
      KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
        self.delete_selection();
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
      }
      KeyCode::Backspace => {
        if !self.delete_selection() && self.cursor > 0 {
          self.cursor -= 1;
          self.chars.remove(self.cursor);
        }
      }
      KeyCode::Delete => {
        if !self.delete_selection() && self.cursor < self.chars.len() {
          self.chars.remove(self.cursor);
        }
      }
      KeyCode::Left => match self.selection.take() {
        Some((start, _)) => self.cursor = start,
        None => self.cursor = self.cursor.saturating_sub(1),
      },
      KeyCode::Right => match self.selection.take() {
        Some((_, end)) => self.cursor = end,
        None => self.cursor = (self.cursor + 1).min(self.chars.len()),
      },
      KeyCode::Home => {
        self.selection = None;
        self.cursor = 0;
      }
      KeyCode::End => {
        self.selection = None;
        self.cursor = self.chars.len();
      }
      _ => {}
    }
    Outcome::Pending
  }
}
