use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Paragraph, Wrap},
};

use super::{dialog, format_size};
use crate::{
  app::{App, Focus},
  client::join_url,
  surface::detail::ImageState,
};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let detail = &app.detail;
  let Some(record) = detail.record() else {
    return;
  };
  let inner = dialog(f, area, &record.school, app.focus() == Focus::Detail);

  let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
  let mut lines = vec![Line::from(vec![
    Span::styled("School type  ", label),
    Span::raw(record.school_type.to_string()),
  ])];

  for kind in record.wear_sections() {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(kind.label(), label)));
    lines.push(Line::from(record.wear_text(kind).unwrap_or_default().to_string()));

    if let Some(path) = record.image_path(kind) {
      let state = match detail.images.get(path) {
        Some(ImageState::Loaded { size, mime }) => Span::styled(
          format!("{} {}", mime.unwrap_or("unknown type"), format_size(*size)),
          Style::default().fg(Color::Green),
        ),
        Some(ImageState::Failed(e)) => {
          Span::styled(format!("unavailable: {e}"), Style::default().fg(Color::Red))
        }
        Some(ImageState::Loading) | None => {
          Span::styled("loading…", Style::default().fg(Color::DarkGray))
        }
      };
      lines.push(Line::from(vec![
        Span::styled(
          format!("{}  ", join_url(&app.base_url, path)),
          Style::default().fg(Color::DarkGray),
        ),
        state,
      ]));
    }
  }

  if detail.deleting {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Deleting…", Style::default().fg(Color::Red))));
  }

  f.render_widget(
    Paragraph::new(lines)
      .wrap(Wrap { trim: false })
      .scroll((detail.scroll, 0)),
    inner,
  );
}
