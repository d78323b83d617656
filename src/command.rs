/// Commands a host can run against the active browser session, plus the
/// widget-level commands the terminal host handles itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
  StepIn,
  StepOut,
  Actions,
  TabNext,
  TabPrev,
  Accept,
  MoveUp,
  MoveDown,
  Close,
  /// Typed character for the text field. Not bindable.
  Input(char),
  Backspace,
  None,
}

impl Command {
  pub fn from_name(name: &str) -> Option<Command> {
    match name {
      "step_in" => Some(Command::StepIn),
      "step_out" => Some(Command::StepOut),
      "actions" => Some(Command::Actions),
      "tab_next" => Some(Command::TabNext),
      "tab_prev" => Some(Command::TabPrev),
      "accept" => Some(Command::Accept),
      "move_up" => Some(Command::MoveUp),
      "move_down" => Some(Command::MoveDown),
      "close" => Some(Command::Close),
      "backspace" => Some(Command::Backspace),
      "none" => Some(Command::None),
      _ => None,
    }
  }

  /// Whether the command is routed to the browser rather than the widget.
  pub fn is_session_command(self) -> bool {
    matches!(
      self,
      Command::StepIn
        | Command::StepOut
        | Command::Actions
        | Command::TabNext
        | Command::TabPrev
        | Command::Accept
    )
  }
}
