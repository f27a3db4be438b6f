//! Catalog pane: record list on the left, cursor preview on the right.

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use uniformpal_core::record::{UniformRecord, WearKind};

use crate::{
  app::{App, Focus},
  client::join_url,
};

pub const LOADING_TEXT: &str = "Loading uniforms…";
pub const EMPTY_TEXT: &str = "No uniforms available";

/// Render the catalog into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
    .split(area);

  draw_list(f, cols[0], app);
  draw_preview(f, cols[1], app);
}

fn draw_list(f: &mut Frame, area: Rect, app: &App) {
  let view = &app.catalog;
  let visible = view.visible();

  let title = format!(
    " Uniforms ({}/{}) · {} · {} ",
    visible.len(),
    view.uniforms.len(),
    view.filter.label(),
    view.order.label(),
  );
  let border = if app.focus() == Focus::Catalog { Color::Cyan } else { Color::DarkGray };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));
  let inner = block.inner(area);
  f.render_widget(block, area);

  if view.loading {
    f.render_widget(
      Paragraph::new(LOADING_TEXT).style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }
  if visible.is_empty() {
    f.render_widget(
      Paragraph::new(EMPTY_TEXT).style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  }

  let items: Vec<ListItem> = visible
    .iter()
    .map(|record| {
      let mut spans = vec![
        Span::styled(record.school.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
          format!("  {}", record.school_type),
          Style::default().fg(Color::DarkGray),
        ),
      ];
      if view.is_deleting(&record.id) {
        spans.push(Span::styled("  deleting…", Style::default().fg(Color::Red)));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(view.cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner,
    &mut state,
  );
}

fn draw_preview(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Preview ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(record) = app.catalog.cursor_record() else {
    f.render_widget(
      Paragraph::new("Select a uniform and press Enter.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  f.render_widget(
    Paragraph::new(preview_lines(record, &app.base_url)).wrap(Wrap { trim: false }),
    inner,
  );
}

fn preview_lines<'a>(record: &'a UniformRecord, base_url: &str) -> Vec<Line<'a>> {
  let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
  let mut lines = vec![
    Line::from(Span::styled(
      record.school.as_str(),
      Style::default().add_modifier(Modifier::BOLD),
    )),
    Line::from(vec![Span::styled("Type      ", label), Span::raw(record.school_type.as_str())]),
    Line::from(vec![Span::styled("Uniform   ", label), Span::raw(record.uniform_combo.as_str())]),
  ];
  if let Some(path) = record.image_path(WearKind::Uniform) {
    lines.push(Line::from(vec![
      Span::styled("Image     ", label),
      Span::styled(join_url(base_url, path), Style::default().fg(Color::DarkGray)),
    ]));
  }
  let extras = record.wear_sections().len() - 1;
  if extras > 0 {
    lines.push(Line::from(Span::styled(
      format!("+{extras} more wear section(s), press Enter"),
      Style::default().fg(Color::DarkGray),
    )));
  }
  lines
}
