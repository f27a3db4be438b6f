use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use super::dialog;
use crate::{
  app::{App, Focus},
  surface::search::SearchFocus,
};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let search = &app.search;
  let inner = dialog(f, area, "Search uniforms", app.focus() == Focus::Search);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(0)])
    .split(inner);

  // Query box.
  let query_focused = search.focus == SearchFocus::Query;
  let cursor = if query_focused { "_" } else { "" };
  let query_block = Block::default()
    .title(" School name ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(if query_focused { Color::Yellow } else { Color::DarkGray }));
  f.render_widget(
    Paragraph::new(format!("{}{cursor}", search.query)).block(query_block),
    rows[0],
  );

  if search.loading {
    f.render_widget(
      Paragraph::new("Loading uniforms…").style(Style::default().fg(Color::DarkGray)),
      rows[1],
    );
    return;
  }
  if let Some(text) = search.guidance() {
    f.render_widget(
      Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true }),
      rows[1],
    );
    return;
  }

  let items: Vec<ListItem> = search
    .results
    .iter()
    .map(|record| {
      let mut lines = vec![Line::from(vec![
        Span::styled(record.school.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
          format!("  {}", record.school_type),
          Style::default().fg(Color::DarkGray),
        ),
      ])];
      for kind in record.wear_sections() {
        lines.push(Line::from(vec![
          Span::styled(format!("  {}: ", kind.label()), Style::default().fg(Color::Cyan)),
          Span::raw(record.wear_text(kind).unwrap_or_default().to_string()),
        ]));
      }
      if search.is_deleting(&record.id) {
        lines.push(Line::from(Span::styled("  deleting…", Style::default().fg(Color::Red))));
      }
      ListItem::new(lines)
    })
    .collect();

  let mut state = ListState::default();
  if search.focus == SearchFocus::Results {
    state.select(Some(search.cursor));
  }

  f.render_stateful_widget(
    List::new(items).highlight_style(Style::default().bg(Color::Blue).fg(Color::White)),
    rows[1],
    &mut state,
  );
}
