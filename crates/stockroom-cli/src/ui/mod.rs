//! TUI rendering: orchestrates the header, the active view and the status bar.

pub mod dashboard;
pub mod inventory;
pub mod login;
pub mod reports;
pub mod settings;

use chrono::{DateTime, Local, Utc};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::app::{App, Screen, Tab};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<S>(f: &mut Frame, app: &App<S>) {
  let area = f.area();

  if app.screen == Screen::Login {
    login::draw(f, area, app);
    return;
  }

  // Vertical stack: header, tabs, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(1), // tabs
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_tabs(f, rows[1], app);
  draw_body(f, rows[2], app);
  draw_status(f, rows[3], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let user = match &app.profile {
    Some(p) => format!("{} ({}) ", p.full_name, p.role),
    None => app
      .session
      .as_ref()
      .map(|s| format!("{} ", s.email))
      .unwrap_or_default(),
  };

  let left = Span::styled(
    " stockroom",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(user, Style::default().fg(Color::Gray));

  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

fn draw_tabs<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let titles = Tab::ALL
    .iter()
    .enumerate()
    .map(|(i, t)| format!("{} {}", i + 1, t.title()));
  let tabs = Tabs::new(titles)
    .select(app.tab.index())
    .style(Style::default().fg(Color::DarkGray))
    .highlight_style(
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    );
  f.render_widget(tabs, area);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  match app.tab {
    Tab::Dashboard => dashboard::draw(f, area, app),
    Tab::Inventory => inventory::draw(f, area, app),
    Tab::Reports => reports::draw(f, area, app),
    Tab::Settings => settings::draw(f, area, app),
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let (mode_label, hints) = if let Some(pending) = &app.pending {
    ("BUSY", pending.label())
  } else if app.editor.is_some() {
    ("EDIT", "Tab next field  Enter save  Esc cancel")
  } else if app.confirm_delete.is_some() {
    ("DELETE", "y confirm  n cancel")
  } else if app.filter_active {
    ("SEARCH", "Type to filter  Esc clear  Enter keep")
  } else {
    match app.tab {
      Tab::Inventory => (
        "NORMAL",
        "↑↓/jk move  / search  a add  e edit  d delete  r reload  o sign out  q quit",
      ),
      _ => ("NORMAL", "1-4/Tab switch  ↑↓/jk scroll  r reload  o sign out  q quit"),
    }
  };

  let status = if app.pending.is_none() && !app.status_msg.is_empty() {
    app.status_msg.clone()
  } else {
    hints.to_string()
  };

  let mode_bg = if app.pending.is_some() { Color::Yellow } else { Color::Cyan };
  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(mode_bg)
      .add_modifier(Modifier::BOLD),
  );
  let status_style = if app.status_msg.starts_with("Error") && app.pending.is_none() {
    Style::default().fg(Color::Red)
  } else {
    Style::default().fg(Color::DarkGray)
  };
  let hint_span = Span::styled(format!("  {status}"), status_style);

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

/// A bordered block with a dim border, used by every view.
pub(crate) fn pane(title: &str) -> Block<'static> {
  Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}

/// Whether `tab` is being (re)loaded. Views show a placeholder meanwhile.
pub(crate) fn is_loading<S>(app: &App<S>, tab: Tab) -> bool {
  matches!(app.pending, Some(crate::app::Pending::Load(t)) if t == tab)
}

/// Render a dim one-line message inside `area`.
pub(crate) fn placeholder(f: &mut Frame, area: Rect, text: &str) {
  f.render_widget(
    Paragraph::new(text.to_string()).style(Style::default().fg(Color::DarkGray)),
    area,
  );
}

/// Local date and time, e.g. `Mar 4, 2025, 2:05 PM`.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
  at.with_timezone(&Local).format("%b %-d, %Y, %-I:%M %p").to_string()
}

/// Local date, e.g. `Mar 4, 2025`.
pub(crate) fn format_date(at: DateTime<Utc>) -> String {
  at.with_timezone(&Local).format("%b %-d, %Y").to_string()
}
