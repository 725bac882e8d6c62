//! Settings: the signed-in profile and the user directory.

use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Cell, Paragraph, Row, Table},
};
use stockroom_core::profile::Role;

use super::{format_date, is_loading, pane, placeholder};
use crate::app::{App, Tab};

pub fn draw<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let [top, bottom] = Layout::vertical([Constraint::Length(6), Constraint::Min(0)]).areas(area);

  let block = pane("Profile");
  let inner = block.inner(top);
  f.render_widget(block, top);

  let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
  let lines = match (&app.profile, &app.session) {
    (Some(p), _) => vec![
      Line::from(vec![Span::styled(" Name   ", label), Span::raw(p.full_name.clone())]),
      Line::from(vec![Span::styled(" Email  ", label), Span::raw(p.email.clone())]),
      Line::from(vec![Span::styled(" Role   ", label), Span::raw(p.role.to_string())]),
      Line::from(vec![Span::styled(" Since  ", label), Span::raw(format_date(p.created_at))]),
    ],
    (None, Some(s)) => vec![
      Line::from(vec![Span::styled(" Email  ", label), Span::raw(s.email.clone())]),
      Line::from(Span::styled(" No profile found.", Style::default().fg(Color::DarkGray))),
    ],
    (None, None) => Vec::new(),
  };
  f.render_widget(Paragraph::new(lines), inner);

  let block = pane(&format!("Users ({})", app.users.len()));
  let inner = block.inner(bottom);
  f.render_widget(block, bottom);

  if is_loading(app, Tab::Settings) {
    placeholder(f, inner, "Loading…");
    return;
  }
  if app.users.is_empty() {
    placeholder(f, inner, "No users.");
    return;
  }

  let header = Row::new(["Name", "Email", "Role", "Joined"])
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
  let rows = app.users.iter().skip(app.scroll).map(|p| {
    let role_style = match p.role {
      Role::Admin => Style::default().fg(Color::Magenta),
      Role::Staff => Style::default(),
    };
    Row::new(vec![
      Cell::from(p.full_name.clone()),
      Cell::from(p.email.clone()),
      Cell::from(p.role.to_string()).style(role_style),
      Cell::from(format_date(p.created_at)),
    ])
  });
  let widths = [
    Constraint::Fill(2),
    Constraint::Fill(3),
    Constraint::Length(7),
    Constraint::Length(13),
  ];
  f.render_widget(Table::new(rows, widths).header(header), inner);
}
