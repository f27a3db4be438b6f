use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Paragraph, Wrap},
};
use uniformpal_core::record::SchoolType;

use super::{dialog, format_size, notice_line};
use crate::{
  app::{App, Focus},
  surface::{
    CreateForm,
    form::{Attachment, FormField},
  },
};

/// Characters of the data URL shown before it is elided.
const PREVIEW_CHARS: usize = 48;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let form = &app.form;
  let inner = dialog(f, area, "Add uniform", app.focus() == Focus::Form);

  let mut lines = Vec::new();
  for field in form.visible_fields() {
    let focused = field == form.focus;
    let marker = if focused { "▸ " } else { "  " };
    let label_style = if focused {
      Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Cyan)
    };

    let mut spans = vec![
      Span::raw(marker),
      Span::styled(format!("{:<20}", field.label()), label_style),
    ];
    spans.extend(field_value(form, field, focused));
    lines.push(Line::from(spans));

    if let FormField::Image(kind) = field {
      if let Some(attachment) = form.attachments.get(&kind) {
        lines.push(attachment_line(attachment));
      }
    }
  }

  lines.push(Line::from(""));
  if form.submitting {
    lines.push(Line::from(Span::styled(
      "Submitting…",
      Style::default().fg(Color::DarkGray),
    )));
  }
  if let Some(notice) = form.notice.current() {
    lines.push(notice_line(notice));
  }

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn field_value(form: &CreateForm, field: FormField, focused: bool) -> Vec<Span<'static>> {
  let cursor = if focused { "_" } else { "" };
  match field {
    FormField::SchoolType => [SchoolType::Primary, SchoolType::Secondary]
      .into_iter()
      .map(|t| {
        let chosen = form.school_type == Some(t);
        let mark = if chosen { "(•)" } else { "( )" };
        let style = if chosen {
          Style::default().add_modifier(Modifier::BOLD)
        } else {
          Style::default().fg(Color::DarkGray)
        };
        Span::styled(format!("{mark} {t}  "), style)
      })
      .collect(),
    FormField::School => vec![Span::raw(format!("{}{cursor}", form.school))],
    FormField::UniformCombo => vec![Span::raw(format!("{}{cursor}", form.uniform_combo))],
    FormField::CompoundWear => vec![Span::raw(format!("{}{cursor}", form.compound_wear))],
    FormField::ChurchWear => vec![Span::raw(format!("{}{cursor}", form.church_wear))],
    FormField::Image(kind) => {
      let typed = form.path_inputs.get(&kind).map(String::as_str).unwrap_or("");
      if typed.is_empty() && !focused {
        let hint = if form.attachments.contains_key(&kind) { "" } else { "no file" };
        vec![Span::styled(hint, Style::default().fg(Color::DarkGray))]
      } else {
        vec![Span::raw(format!("{typed}{cursor}"))]
      }
    }
  }
}

fn attachment_line(attachment: &Attachment) -> Line<'static> {
  let preview: String = attachment.preview.chars().take(PREVIEW_CHARS).collect();
  Line::from(vec![
    Span::raw("    "),
    Span::styled(
      format!(
        "{} ({}, {}) ",
        attachment.upload.file_name,
        format_size(attachment.upload.bytes.len()),
        attachment.upload.mime,
      ),
      Style::default().fg(Color::Green),
    ),
    Span::styled(format!("{preview}…"), Style::default().fg(Color::DarkGray)),
  ])
}
