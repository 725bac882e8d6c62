//! Login and registration form.

use ratatui::{
  Frame,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Clear, Paragraph},
};

use super::pane;
use crate::app::{App, AuthMode, LoginField};

/// Render the centred login box into `area`.
pub fn draw<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let form = &app.login;
  let title = match form.mode {
    AuthMode::SignIn => "Sign in",
    AuthMode::Register => "Create account",
  };

  let [row] = Layout::vertical([Constraint::Length(16)])
    .flex(Flex::Center)
    .areas(area);
  let [boxed] = Layout::horizontal([Constraint::Length(56)])
    .flex(Flex::Center)
    .areas(row);

  let block = pane(title);
  let inner = block.inner(boxed);
  f.render_widget(Clear, boxed);
  f.render_widget(block, boxed);

  let mut lines: Vec<Line> = vec![Line::from("")];
  let focused = form.focused();
  for &field in form.fields() {
    let value = match field {
      LoginField::FullName => form.full_name.clone(),
      LoginField::Email => form.email.clone(),
      LoginField::Password => "•".repeat(form.password.chars().count()),
      LoginField::Role => format!("< {} >", form.role),
    };
    let is_focused = field == focused;
    let label_style = if is_focused {
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    let cursor = if is_focused && field != LoginField::Role { "_" } else { "" };
    lines.push(Line::from(vec![
      Span::styled(format!(" {:<11}", field.label()), label_style),
      Span::raw(format!("{value}{cursor}")),
    ]));
    lines.push(Line::from(""));
  }

  if let Some(err) = &form.error {
    lines.push(Line::from(Span::styled(
      format!(" {err}"),
      Style::default().fg(Color::Red),
    )));
  } else if let Some(pending) = &app.pending {
    lines.push(Line::from(Span::styled(
      format!(" {}", pending.label()),
      Style::default().fg(Color::Yellow),
    )));
  } else {
    lines.push(Line::from(""));
  }

  let toggle = match form.mode {
    AuthMode::SignIn => "Ctrl-R register",
    AuthMode::Register => "Ctrl-R back to sign in",
  };
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    format!(" Tab next  Enter submit  {toggle}  Esc quit"),
    Style::default().fg(Color::DarkGray),
  )));

  f.render_widget(Paragraph::new(lines), inner);
}
