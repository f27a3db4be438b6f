//! Create form: collects a new record and submits it as one request.

use std::{collections::BTreeMap, path::PathBuf, time::Instant};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use uniformpal_core::{
  Error, Result,
  record::{SchoolType, WearKind},
  submission::{CreateReceipt, ImageUpload, NewUniform},
};

use crate::{
  command::Command,
  notice::{FAILURE_TTL, NoticeKind, NoticeSlot, SUCCESS_CLOSE_DELAY, WARNING_TTL},
};

pub const REQUIRED_TEXT: &str = "Please fill in school name and uniform combination.";
pub const TYPE_REQUIRED_TEXT: &str = "Please select a school type first.";
pub const SUCCESS_TEXT: &str = "Uniform added successfully!";
pub const FAILURE_TEXT: &str = "Failed to add uniform.";
pub const NETWORK_FAILURE_TEXT: &str = "Network error. Could not add uniform.";

const FALLBACK_MIME: &str = "application/octet-stream";

/// One input of the form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
  SchoolType,
  School,
  UniformCombo,
  CompoundWear,
  ChurchWear,
  Image(WearKind),
}

impl FormField {
  pub fn label(&self) -> &'static str {
    match self {
      Self::SchoolType => "School type",
      Self::School => "School name",
      Self::UniformCombo => "Uniform combination",
      Self::CompoundWear => "Compound wear",
      Self::ChurchWear => "Church wear",
      Self::Image(WearKind::Uniform) => "Uniform image",
      Self::Image(WearKind::Compound) => "Compound image",
      Self::Image(WearKind::Church) => "Church image",
    }
  }
}

/// An image picked from disk, with its inline preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
  pub path:    PathBuf,
  pub upload:  ImageUpload,
  /// `data:` URL of the file, built locally on selection.
  pub preview: String,
}

impl Attachment {
  pub fn from_bytes(path: PathBuf, bytes: Bytes) -> Self {
    let file_name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_else(|| "image".to_string());
    let mime = infer::get(&bytes)
      .map(|t| t.mime_type())
      .unwrap_or(FALLBACK_MIME)
      .to_string();
    let preview = format!("data:{mime};base64,{}", STANDARD.encode(&bytes));
    Self {
      path,
      upload: ImageUpload {
        file_name,
        mime,
        bytes,
      },
      preview,
    }
  }
}

#[derive(Debug)]
pub struct CreateForm {
  pub open:          bool,
  /// Unset until the user picks one; gates every other field.
  pub school_type:   Option<SchoolType>,
  pub school:        String,
  pub uniform_combo: String,
  pub compound_wear: String,
  pub church_wear:   String,
  pub attachments:   BTreeMap<WearKind, Attachment>,
  /// Paths being typed into the image fields, not yet attached.
  pub path_inputs:   BTreeMap<WearKind, String>,
  pub focus:         FormField,
  pub notice:        NoticeSlot,
  pub submitting:    bool,
  close_at:          Option<Instant>,
  generation:        u64,
}

impl Default for CreateForm {
  fn default() -> Self {
    Self {
      open:          false,
      school_type:   None,
      school:        String::new(),
      uniform_combo: String::new(),
      compound_wear: String::new(),
      church_wear:   String::new(),
      attachments:   BTreeMap::new(),
      path_inputs:   BTreeMap::new(),
      focus:         FormField::SchoolType,
      notice:        NoticeSlot::default(),
      submitting:    false,
      close_at:      None,
      generation:    0,
    }
  }
}

impl CreateForm {
  // ── Lifecycle ─────────────────────────────────────────────────────────────

  /// Open the dialog. Entered data from a previous session is kept.
  pub fn open(&mut self) {
    self.generation += 1;
    self.open = true;
  }

  /// Close without clearing, unless a successful submit is waiting to
  /// auto-close, in which case the form is cleared now. Responses still in
  /// flight are dropped.
  pub fn close(&mut self) {
    if self.close_at.is_some() {
      self.reset();
    }
    self.generation += 1;
    self.open = false;
    self.submitting = false;
    self.close_at = None;
    self.notice.clear();
  }

  /// Clear every field, attachment and preview.
  pub fn reset(&mut self) {
    self.school_type = None;
    self.school.clear();
    self.uniform_combo.clear();
    self.compound_wear.clear();
    self.church_wear.clear();
    self.attachments.clear();
    self.path_inputs.clear();
    self.focus = FormField::SchoolType;
  }

  /// Advance timers. Returns `true` when the form closed itself after a
  /// successful submit.
  pub fn tick(&mut self, now: Instant) -> bool {
    self.notice.tick(now);
    match self.close_at {
      Some(at) if now >= at => {
        self.close();
        true
      }
      _ => false,
    }
  }

  // ── Fields ────────────────────────────────────────────────────────────────

  /// Fields shown for the current school type, in tab order.
  pub fn visible_fields(&self) -> Vec<FormField> {
    let mut fields = vec![FormField::SchoolType];
    let Some(school_type) = self.school_type else {
      return fields;
    };
    fields.extend([
      FormField::School,
      FormField::UniformCombo,
      FormField::Image(WearKind::Uniform),
    ]);
    if school_type == SchoolType::Secondary {
      fields.extend([
        FormField::CompoundWear,
        FormField::Image(WearKind::Compound),
        FormField::ChurchWear,
        FormField::Image(WearKind::Church),
      ]);
    }
    fields
  }

  pub fn focus_next(&mut self) { self.step_focus(1); }

  pub fn focus_prev(&mut self) { self.step_focus(-1); }

  fn step_focus(&mut self, delta: isize) {
    let fields = self.visible_fields();
    let len = fields.len() as isize;
    let at = fields.iter().position(|f| *f == self.focus).unwrap_or(0) as isize;
    self.focus = fields[(at + delta).rem_euclid(len) as usize];
  }

  pub fn choose_type(&mut self, school_type: SchoolType) {
    self.school_type = Some(school_type);
    if !self.visible_fields().contains(&self.focus) {
      self.focus = FormField::SchoolType;
    }
  }

  pub fn toggle_type(&mut self) {
    let next = self
      .school_type
      .map(SchoolType::toggled)
      .unwrap_or(SchoolType::Primary);
    self.choose_type(next);
  }

  fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
    match field {
      FormField::School => Some(&mut self.school),
      FormField::UniformCombo => Some(&mut self.uniform_combo),
      FormField::CompoundWear => Some(&mut self.compound_wear),
      FormField::ChurchWear => Some(&mut self.church_wear),
      FormField::Image(kind) => Some(self.path_inputs.entry(kind).or_default()),
      FormField::SchoolType => None,
    }
  }

  pub fn input_char(&mut self, c: char) {
    match self.focus {
      FormField::SchoolType => match c.to_ascii_lowercase() {
        'p' => self.choose_type(SchoolType::Primary),
        's' => self.choose_type(SchoolType::Secondary),
        _ => {}
      },
      field => {
        if let Some(text) = self.text_mut(field) {
          text.push(c);
        }
      }
    }
  }

  pub fn backspace(&mut self) {
    if let Some(text) = self.text_mut(self.focus) {
      text.pop();
    }
  }

  // ── Images ────────────────────────────────────────────────────────────────

  /// Ask for the typed path of `kind` to be read from disk.
  pub fn request_attach(&mut self, kind: WearKind, now: Instant) -> Option<Command> {
    let typed = self
      .path_inputs
      .get(&kind)
      .map(|p| p.trim().to_string())
      .unwrap_or_default();
    if typed.is_empty() {
      self.notice.show(
        NoticeKind::Warning,
        format!("Type a path for the {} first.", kind.label().to_lowercase()),
        WARNING_TTL,
        now,
      );
      return None;
    }
    Some(Command::ReadImageFile {
      generation: self.generation,
      kind,
      path: PathBuf::from(typed),
    })
  }

  pub fn finish_attach(
    &mut self,
    generation: u64,
    kind: WearKind,
    path: PathBuf,
    result: std::io::Result<Bytes>,
    now: Instant,
  ) {
    if generation != self.generation {
      return;
    }
    match result {
      Ok(bytes) => {
        self.attachments.insert(kind, Attachment::from_bytes(path, bytes));
        self.path_inputs.remove(&kind);
      }
      Err(e) => self.notice.show(
        NoticeKind::Warning,
        format!("Could not read {}: {e}", path.display()),
        WARNING_TTL,
        now,
      ),
    }
  }

  pub fn detach(&mut self, kind: WearKind) { self.attachments.remove(&kind); }

  // ── Submit ────────────────────────────────────────────────────────────────

  /// The submission the current fields describe. Compound and church data
  /// are only carried for secondary schools.
  pub fn submission(&self) -> Option<NewUniform> {
    let school_type = self.school_type?;
    let mut new = NewUniform::new(self.school.trim(), school_type, self.uniform_combo.trim());
    new.uniform_image = self.upload(WearKind::Uniform);
    if school_type == SchoolType::Secondary {
      new.compound_wear = non_blank(&self.compound_wear);
      new.church_wear = non_blank(&self.church_wear);
      new.compound_image = self.upload(WearKind::Compound);
      new.church_image = self.upload(WearKind::Church);
    }
    Some(new)
  }

  fn upload(&self, kind: WearKind) -> Option<ImageUpload> {
    self.attachments.get(&kind).map(|a| a.upload.clone())
  }

  /// Validate and produce the create request, or show a warning and
  /// produce nothing.
  pub fn submit(&mut self, now: Instant) -> Option<Command> {
    if self.submitting || self.close_at.is_some() {
      return None;
    }
    if self.school.trim().is_empty() || self.uniform_combo.trim().is_empty() {
      self.notice.show(NoticeKind::Warning, REQUIRED_TEXT, WARNING_TTL, now);
      return None;
    }
    let Some(new) = self.submission() else {
      self.notice.show(NoticeKind::Warning, TYPE_REQUIRED_TEXT, WARNING_TTL, now);
      return None;
    };
    self.submitting = true;
    Some(Command::Create {
      generation: self.generation,
      new,
    })
  }

  /// Apply the create response. Returns `false` when the response belongs
  /// to a session that has since been closed.
  pub fn finish_submit(&mut self, generation: u64, result: Result<CreateReceipt>, now: Instant) -> bool {
    if generation != self.generation {
      return false;
    }
    self.submitting = false;
    match result {
      Ok(_) => {
        self.notice.show(NoticeKind::Success, SUCCESS_TEXT, SUCCESS_CLOSE_DELAY, now);
        self.close_at = Some(now + SUCCESS_CLOSE_DELAY);
      }
      Err(e) => {
        let text = match &e {
          Error::Transport(_) => NETWORK_FAILURE_TEXT.to_string(),
          other => other.backend_message().unwrap_or(FAILURE_TEXT).to_string(),
        };
        self.notice.show(NoticeKind::Failure, text, FAILURE_TTL, now);
      }
    }
    true
  }
}

fn non_blank(s: &str) -> Option<String> {
  let trimmed = s.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_string())
}
