//! Inventory table with search, the item editor and the delete prompt.

use ratatui::{
  Frame,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Cell, Clear, Paragraph, Row, Table, TableState},
};
use stockroom_core::summary::format_amount;

use super::{format_date, is_loading, pane, placeholder};
use crate::app::{App, Editor, ItemField, Tab};

pub fn draw<S>(f: &mut Frame, area: Rect, app: &App<S>) {
  let filtered = app.filtered_items();
  let total = app.items.len();

  let title = if app.filter_active || !app.filter.is_empty() {
    format!("Inventory ({}/{})", filtered.len(), total)
  } else {
    format!("Inventory ({total})")
  };
  let block = pane(&title);
  let mut inner = block.inner(area);
  f.render_widget(block, area);

  if is_loading(app, Tab::Inventory) {
    placeholder(f, inner, "Loading…");
    return;
  }

  // Filter bar along the bottom edge.
  if (app.filter_active || !app.filter.is_empty()) && inner.height > 2 {
    let filter_area = Rect {
      x:      inner.x,
      y:      inner.y + inner.height - 1,
      width:  inner.width,
      height: 1,
    };
    inner.height = inner.height.saturating_sub(1);

    let filter_text = if app.filter_active {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  if filtered.is_empty() {
    let msg = if total == 0 { "No items yet. Press a to add one." } else { "No matches." };
    placeholder(f, inner, msg);
  } else {
    let header = Row::new(["Name", "SKU", "Category", "Qty", "Min", "Unit Price", "Supplier", "Updated"])
      .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows = filtered.iter().map(|item| {
      let qty_style = if item.is_low_stock() {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };
      Row::new(vec![
        Cell::from(item.name.clone()),
        Cell::from(item.sku.clone()),
        Cell::from(item.category.clone()),
        Cell::from(item.quantity.to_string()).style(qty_style),
        Cell::from(item.min_quantity.to_string()),
        Cell::from(format!("${}", format_amount(item.unit_price))),
        Cell::from(item.supplier.clone()),
        Cell::from(format_date(item.updated_at)),
      ])
    });

    let widths = [
      Constraint::Fill(3),
      Constraint::Fill(2),
      Constraint::Fill(2),
      Constraint::Length(6),
      Constraint::Length(6),
      Constraint::Length(11),
      Constraint::Fill(2),
      Constraint::Length(13),
    ];
    let table = Table::new(rows, widths).header(header).row_highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    state.select(Some(app.list_cursor));
    f.render_stateful_widget(table, inner, &mut state);
  }

  if let Some(editor) = &app.editor {
    draw_editor(f, area, editor);
  } else if let Some(item) = &app.confirm_delete {
    draw_confirm(f, area, &item.name);
  }
}

fn popup(area: Rect, width: u16, height: u16) -> Rect {
  let [row] = Layout::vertical([Constraint::Length(height)])
    .flex(Flex::Center)
    .areas(area);
  let [boxed] = Layout::horizontal([Constraint::Length(width)])
    .flex(Flex::Center)
    .areas(row);
  boxed
}

fn draw_editor(f: &mut Frame, area: Rect, editor: &Editor) {
  let title = match &editor.target {
    Some(item) => format!("Edit {}", item.name),
    None => "Add item".to_string(),
  };
  let boxed = popup(area, 60, ItemField::ALL.len() as u16 + 6);
  let block = pane(&title);
  let inner = block.inner(boxed);
  f.render_widget(Clear, boxed);
  f.render_widget(block, boxed);

  let focused = editor.focused();
  let mut lines: Vec<Line> = ItemField::ALL
    .iter()
    .map(|&field| {
      let is_focused = field == focused;
      let label_style = if is_focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(Color::Gray)
      };
      let cursor = if is_focused { "_" } else { "" };
      Line::from(vec![
        Span::styled(format!(" {:<14}", field.label()), label_style),
        Span::raw(format!("{}{cursor}", field.value(&editor.form))),
      ])
    })
    .collect();

  lines.push(Line::from(""));
  if let Some(err) = &editor.error {
    lines.push(Line::from(Span::styled(format!(" {err}"), Style::default().fg(Color::Red))));
  }

  f.render_widget(Paragraph::new(lines), inner);
}

fn draw_confirm(f: &mut Frame, area: Rect, name: &str) {
  let boxed = popup(area, 50, 5);
  let block = pane("Delete item");
  let inner = block.inner(boxed);
  f.render_widget(Clear, boxed);
  f.render_widget(block, boxed);
  f.render_widget(
    Paragraph::new(vec![
      Line::from(format!(" Delete {name}?")),
      Line::from(""),
      Line::from(Span::styled(" y confirm  n cancel", Style::default().fg(Color::DarkGray))),
    ]),
    inner,
  );
}
