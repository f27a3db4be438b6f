//! TUI rendering: orchestrates the catalog and the dialogs stacked on it.

pub mod catalog;
pub mod detail;
pub mod form;
pub mod search;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{
  app::{App, Focus},
  notice::{Notice, NoticeKind},
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  catalog::draw(f, rows[1], app);
  draw_status(f, rows[2], app);

  // Dialogs, bottom to top.
  if app.search.open {
    search::draw(f, centered(rows[1], 80, 85), app);
  }
  if app.form.open {
    form::draw(f, centered(rows[1], 70, 85), app);
  }
  if app.detail.is_open() {
    detail::draw(f, centered(rows[1], 70, 80), app);
  }
  if app.confirm.is_some() {
    draw_confirm(f, centered(rows[1], 50, 20), app);
  }
}

/// A rectangle `pct_x` × `pct_y` percent of `area`, centred in it.
pub fn centered(area: Rect, pct_x: u16, pct_y: u16) -> Rect {
  let vertical = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Percentage((100 - pct_y) / 2),
      Constraint::Percentage(pct_y),
      Constraint::Percentage((100 - pct_y) / 2),
    ])
    .split(area);
  Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Percentage((100 - pct_x) / 2),
      Constraint::Percentage(pct_x),
      Constraint::Percentage((100 - pct_x) / 2),
    ])
    .split(vertical[1])[1]
}

/// Clear `area` and draw a bordered dialog frame; returns the inner area.
pub fn dialog(f: &mut Frame, area: Rect, title: &str, focused: bool) -> Rect {
  let border = if focused { Color::Cyan } else { Color::DarkGray };
  let block = Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));
  let inner = block.inner(area);
  f.render_widget(Clear, area);
  f.render_widget(block, area);
  inner
}

pub fn notice_style(kind: NoticeKind) -> Style {
  let color = match kind {
    NoticeKind::Success => Color::Green,
    NoticeKind::Failure => Color::Red,
    NoticeKind::Warning => Color::Yellow,
    NoticeKind::Info => Color::Cyan,
  };
  Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub fn notice_line(notice: &Notice) -> Line<'_> {
  Line::from(Span::styled(notice.text.as_str(), notice_style(notice.kind)))
}

/// Human-readable byte count.
pub fn format_size(bytes: usize) -> String {
  if bytes < 1024 {
    format!("{bytes} B")
  } else if bytes < 1024 * 1024 {
    format!("{:.1} KB", bytes as f64 / 1024.0)
  } else {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    " UniformPal  [/] search  [n] add  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{}  {date} ", app.base_url),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let pad = area
    .width
    .saturating_sub(left.width() as u16)
    .saturating_sub(right.width() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Confirm ──────────────────────────────────────────────────────────────────

fn draw_confirm(f: &mut Frame, area: Rect, app: &App) {
  let Some(pending) = &app.confirm else {
    return;
  };
  let inner = dialog(f, area, "Delete uniform", true);
  let lines = vec![
    Line::from(format!("Are you sure you want to delete {}?", pending.school)),
    Line::from(""),
    Line::from(vec![
      Span::styled("[y]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
      Span::raw(" delete   "),
      Span::styled("[n]", Style::default().add_modifier(Modifier::BOLD)),
      Span::raw(" cancel"),
    ]),
  ];
  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.focus() {
    Focus::Confirm => ("CONFIRM", "y delete  n/Esc cancel"),
    Focus::Detail => ("DETAIL", "↑↓/jk scroll  d delete  Esc close"),
    Focus::Form => (
      "ADD",
      "Tab/↑↓ field  ←→ type  Enter attach image  Del remove image  Ctrl-S save  Esc close",
    ),
    Focus::Search => ("SEARCH", "Enter search  Tab results  d delete  Esc close"),
    Focus::Catalog => (
      "CATALOG",
      "↑↓/jk move  Enter detail  d delete  f filter  o sort  r reload  / search  n add  q quit",
    ),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let status_span = match app.status.current() {
    Some(notice) => Span::styled(format!("  {}", notice.text), notice_style(notice.kind)),
    None => Span::styled(format!("  {hints}"), Style::default().fg(Color::DarkGray)),
  };

  f.render_widget(
    Paragraph::new(Line::from(vec![mode_span, status_span])).style(Style::default().bg(Color::Black)),
    area,
  );
}
