use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use super::prompt::{ChoicePrompt, TextPrompt};
use super::view::TuiView;
use crate::fs::Entry;

/// Key label and tooltip for each installed button.
pub type Hint = (String, &'static str);

pub fn draw(frame: &mut Frame, view: &TuiView, hints: &[Hint], errors: &[String]) {
  let area = frame.area();

  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // title
      Constraint::Length(3), // text field
      Constraint::Min(1),    // entries
      Constraint::Length(1), // button hints
    ])
    .split(area);

  render_header(view, chunks[0], frame.buffer_mut());
  render_input(view, chunks[1], frame);
  render_list(view, chunks[2], frame.buffer_mut());
  render_status(view, hints, chunks[3], frame.buffer_mut());

  if !errors.is_empty() {
    render_error(errors, area, frame.buffer_mut());
  }
}

fn render_header(view: &TuiView, area: Rect, buf: &mut Buffer) {
  let mut spans = vec![
    Span::styled(" ", Style::default().fg(Color::Indexed(75))),
    Span::styled(
      view.title().to_string(),
      Style::default().fg(Color::Indexed(252)).add_modifier(Modifier::BOLD),
    ),
  ];
  if view.is_busy() {
    spans.push(Span::styled("  ...", Style::default().fg(Color::Indexed(241))));
  }
  Paragraph::new(Line::from(spans))
    .style(Style::default().bg(Color::Indexed(236)))
    .render(area, buf);
}

fn render_input(view: &TuiView, area: Rect, frame: &mut Frame) {
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Indexed(75)));
  let inner = block.inner(area);

  let line = if view.value().is_empty() {
    Line::from(Span::styled(view.placeholder().to_string(), Style::default().fg(Color::Indexed(241))))
  } else {
    Line::from(Span::styled(view.value().to_string(), Style::default().fg(Color::Indexed(252))))
  };
  Paragraph::new(line).block(block).render(area, frame.buffer_mut());

  let offset = (view.value().width() as u16).min(inner.width.saturating_sub(1));
  frame.set_cursor_position((inner.x + offset, inner.y));
}

fn entry_line(entry: &Entry, selected: bool) -> Line<'static> {
  let base = if entry.always_show() {
    Style::default().fg(Color::Indexed(150))
  } else if entry.is_dir() {
    Style::default().fg(Color::Indexed(75))
  } else {
    Style::default().fg(Color::Indexed(252))
  };
  let base = if entry.is_ignored() { base.add_modifier(Modifier::DIM) } else { base };
  let (name_style, desc_style) = if selected {
    let sel = Style::default()
      .fg(Color::Indexed(234))
      .bg(Color::Indexed(75))
      .add_modifier(Modifier::BOLD);
    (sel, sel)
  } else {
    (base, Style::default().fg(Color::Indexed(241)))
  };

  let mut label = format!(" {}", entry.label());
  if entry.is_dir() {
    label.push('/');
  }
  let mut spans = vec![Span::styled(label, name_style)];
  if let Some(desc) = entry.description() {
    spans.push(Span::styled(format!("  {desc}"), desc_style));
  }
  Line::from(spans)
}

fn render_list(view: &TuiView, area: Rect, buf: &mut Buffer) {
  let height = area.height as usize;
  if height == 0 {
    return;
  }
  let scroll = view.cursor().map_or(0, |c| c.saturating_sub(height - 1));

  let lines: Vec<Line> = view
    .rows()
    .enumerate()
    .skip(scroll)
    .take(height)
    .map(|(i, entry)| entry_line(entry, view.cursor() == Some(i)))
    .collect();

  if lines.is_empty() && !view.is_busy() {
    Paragraph::new(Line::from(Span::styled(" No matching entries", Style::default().fg(Color::DarkGray))))
      .render(area, buf);
    return;
  }
  Paragraph::new(lines).render(area, buf);
}

fn render_status(view: &TuiView, hints: &[Hint], area: Rect, buf: &mut Buffer) {
  let mut spans = Vec::new();
  for (key, tooltip) in hints {
    spans.push(Span::styled(
      format!(" {key}"),
      Style::default().fg(Color::Indexed(75)).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(format!(" {tooltip} "), Style::default().fg(Color::DarkGray)));
  }
  if let Some(cursor) = view.cursor() {
    spans.push(Span::styled(
      format!(" {}/{} ", cursor + 1, view.row_count()),
      Style::default().fg(Color::DarkGray),
    ));
  }
  Paragraph::new(Line::from(spans))
    .style(Style::default().bg(Color::Indexed(236)))
    .render(area, buf);
}

/// Centered popup of `width` x `height`, clipped to `area`. `None` when
/// the terminal is too small to show anything useful.
fn popup_area(area: Rect, width: u16, height: u16) -> Option<Rect> {
  let width = width.min(area.width.saturating_sub(4));
  let height = height.min(area.height.saturating_sub(2));
  if width < 10 || height < 3 {
    return None;
  }
  let x = area.x + (area.width.saturating_sub(width)) / 2;
  let y = area.y + (area.height.saturating_sub(height)) / 2;
  Some(Rect::new(x, y, width, height))
}

pub fn render_error(messages: &[String], area: Rect, buf: &mut Buffer) {
  let inner_width = 60.min(area.width.saturating_sub(4)).saturating_sub(2) as usize;

  let mut line_count: u16 = 0;
  for msg in messages {
    line_count += ((msg.width() + 1) / inner_width.max(1)) as u16 + 1;
  }
  // borders, blank line and hint
  let Some(popup) = popup_area(area, 60, line_count + 4) else {
    return;
  };

  Clear.render(popup, buf);

  let mut lines: Vec<Line> = messages
    .iter()
    .map(|msg| Line::from(Span::styled(format!(" {msg}"), Style::default().fg(Color::Indexed(252)))))
    .collect();
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(" [Esc] dismiss", Style::default().fg(Color::Indexed(241)))));

  let block = Block::default()
    .borders(Borders::ALL)
    .title(" Error ")
    .border_style(Style::default().fg(Color::Indexed(167)))
    .style(Style::default().bg(Color::Indexed(235)));

  Paragraph::new(lines).block(block).wrap(Wrap { trim: false }).render(popup, buf);
}

pub fn draw_choice(frame: &mut Frame, prompt: &ChoicePrompt) {
  let area = frame.area();
  let widest = prompt.options.iter().map(|o| o.width()).max().unwrap_or(0) as u16;
  let Some(popup) = popup_area(area, (widest + 6).max(30), prompt.options.len() as u16 + 2) else {
    return;
  };
  let buf = frame.buffer_mut();
  Clear.render(popup, buf);

  let lines: Vec<Line> = prompt
    .options
    .iter()
    .enumerate()
    .map(|(i, option)| {
      if i == prompt.cursor {
        Line::from(Span::styled(
          format!(" > {option}"),
          Style::default().fg(Color::Indexed(75)).add_modifier(Modifier::BOLD),
        ))
      } else {
        Line::from(Span::styled(format!("   {option}"), Style::default().fg(Color::Indexed(252))))
      }
    })
    .collect();

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Indexed(75)))
    .style(Style::default().bg(Color::Indexed(235)));
  Paragraph::new(lines).block(block).render(popup, buf);
}

pub fn draw_text_prompt(frame: &mut Frame, prompt: &TextPrompt) {
  let area = frame.area();
  let Some(popup) = popup_area(area, 60, 4) else {
    return;
  };
  Clear.render(popup, frame.buffer_mut());

  let value = prompt.value();
  let chars: Vec<char> = value.chars().collect();
  let text = Style::default().fg(Color::Indexed(252));
  let selected = Style::default().fg(Color::Indexed(234)).bg(Color::Indexed(75));
  let spans = match prompt.selection() {
    Some((start, end)) => vec![
      Span::styled(chars[..start].iter().collect::<String>(), text),
      Span::styled(chars[start..end].iter().collect::<String>(), selected),
      Span::styled(chars[end..].iter().collect::<String>(), text),
    ],
    None => vec![Span::styled(value.clone(), text)],
  };

  let block = Block::default()
    .borders(Borders::ALL)
    .title(format!(" {} ", prompt.prompt))
    .border_style(Style::default().fg(Color::Indexed(75)))
    .style(Style::default().bg(Color::Indexed(235)));
  let inner = block.inner(popup);
  let lines = vec![
    Line::from(spans),
    Line::from(Span::styled("[Enter] confirm  [Esc] cancel", Style::default().fg(Color::Indexed(241)))),
  ];
  Paragraph::new(lines).block(block).render(popup, frame.buffer_mut());

  let before: String = chars[..prompt.cursor()].iter().collect();
  let offset = (before.width() as u16).min(inner.width.saturating_sub(1));
  frame.set_cursor_position((inner.x + offset, inner.y));
}
