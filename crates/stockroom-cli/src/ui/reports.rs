//! Reports: the recent activity feed.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};
use stockroom_core::activity::{Action, ActivityEntry};

use super::{format_timestamp, is_loading, pane, placeholder};
use crate::app::{App, Tab};

pub fn draw<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let block = pane(&format!("Recent Activity ({})", app.activity.len()));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if is_loading(app, Tab::Reports) {
    placeholder(f, inner, "Loading…");
    return;
  }
  if app.activity.is_empty() {
    placeholder(f, inner, "No activity logs yet");
    return;
  }

  let mut lines: Vec<Line> = Vec::new();
  for entry in &app.activity {
    lines.extend(entry_lines(entry));
    lines.push(Line::from(""));
  }

  // Each entry takes three lines plus a blank separator.
  let offset = (app.scroll * 4).min(u16::MAX as usize) as u16;
  f.render_widget(Paragraph::new(lines).scroll((offset, 0)), inner);
}

fn action_color(action: &Action) -> Color {
  match action {
    Action::Create => Color::Green,
    Action::Update => Color::Blue,
    Action::Delete => Color::Red,
    Action::Other(_) => Color::Gray,
  }
}

fn entry_lines(entry: &ActivityEntry) -> [Line<'static>; 3] {
  let log = &entry.log;
  [
    Line::from(vec![
      Span::styled(
        format!(" {:<7}", log.action.as_str().to_uppercase()),
        Style::default()
          .fg(action_color(&log.action))
          .add_modifier(Modifier::BOLD),
      ),
      Span::styled(
        log.item_name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
      ),
    ]),
    Line::from(format!("         {}", log.description)),
    Line::from(Span::styled(
      format!(
        "         by {}  ·  {}",
        entry.attribution(),
        format_timestamp(log.created_at)
      ),
      Style::default().fg(Color::DarkGray),
    )),
  ]
}
