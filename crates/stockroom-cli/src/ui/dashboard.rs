//! Dashboard: summary cards and the low-stock list.

use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, Paragraph},
};

use super::{is_loading, pane, placeholder};
use crate::app::{App, Tab};

pub fn draw<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let [cards, rest] = Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);

  if is_loading(app, Tab::Dashboard) {
    let block = pane("Dashboard");
    let inner = block.inner(area);
    f.render_widget(block, area);
    placeholder(f, inner, "Loading…");
    return;
  }

  let s = &app.summary;
  let stats = [
    ("Total Items", s.total_items.to_string(), Color::Cyan),
    ("Low Stock", s.low_stock.to_string(), Color::Yellow),
    ("Total Value", format!("${}", s.display_value()), Color::Green),
  ];
  let cols = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(cards);
  for ((label, value, color), col) in stats.into_iter().zip(cols.iter()) {
    let block = pane(label);
    let inner = block.inner(*col);
    f.render_widget(block, *col);
    f.render_widget(
      Paragraph::new(Line::from(Span::styled(
        format!(" {value}"),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
      ))),
      inner,
    );
  }

  let block = pane("Low Stock Items");
  let inner = block.inner(rest);
  f.render_widget(block, rest);

  if app.low_stock.is_empty() {
    placeholder(f, inner, "All items are above their minimum quantity.");
    return;
  }

  let items: Vec<ListItem> = app
    .low_stock
    .iter()
    .map(|item| {
      ListItem::new(Line::from(vec![
        Span::styled(
          format!("{:<28}", item.name),
          Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{:<14}", item.sku), Style::default().fg(Color::DarkGray)),
        Span::styled(
          format!("{} / min {}", item.quantity, item.min_quantity),
          Style::default().fg(Color::Yellow),
        ),
      ]))
    })
    .collect();
  f.render_widget(List::new(items), inner);
}
