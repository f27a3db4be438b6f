//! Application state machine and event dispatcher.
//!
//! [`App`] owns every surface and routes keys to whichever one has focus.
//! It performs no I/O: requests queue up as [`Command`]s for the event loop
//! to hand to the [`crate::command::Dispatcher`], and their [`Outcome`]s
//! come back through [`App::apply`].

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};
use uniformpal_core::{Error, record::UniformRecord};

use crate::{
  command::{Command, DeleteOrigin, Outcome},
  events::{self, RecordEvent, RecordSubscriber},
  notice::{NoticeKind, NoticeSlot, STATUS_TTL},
  surface::{
    CatalogView, CreateForm, DetailOverlay, Owner, SearchSurface,
    form::FormField,
    search::SearchFocus,
  },
};

// ─── Focus ────────────────────────────────────────────────────────────────────

/// Which layer receives keyboard input, topmost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Confirm,
  Detail,
  Form,
  Search,
  Catalog,
}

/// Where a confirmed delete should be routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteVia {
  Catalog,
  Search,
  Detail,
}

/// A delete waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
  pub id:     String,
  pub school: String,
  pub via:    DeleteVia,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub catalog:  CatalogView,
  pub search:   SearchSurface,
  pub form:     CreateForm,
  pub detail:   DetailOverlay,
  /// Delete prompt, when one is showing.
  pub confirm:  Option<PendingDelete>,
  /// One-line message shown in the status bar.
  pub status:   NoticeSlot,
  /// Backend the client talks to, for the header.
  pub base_url: String,
  commands:     Vec<Command>,
}

impl App {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self {
      catalog:  CatalogView::default(),
      search:   SearchSurface::default(),
      form:     CreateForm::default(),
      detail:   DetailOverlay::default(),
      confirm:  None,
      status:   NoticeSlot::default(),
      base_url: base_url.into(),
      commands: Vec::new(),
    }
  }

  /// Mount the catalog: queue its first fetch.
  pub fn start(&mut self) {
    let load = self.catalog.begin_load();
    self.commands.push(load);
  }

  /// Drain the commands queued since the last call.
  pub fn take_commands(&mut self) -> Vec<Command> { std::mem::take(&mut self.commands) }

  pub fn focus(&self) -> Focus {
    if self.confirm.is_some() {
      Focus::Confirm
    } else if self.detail.is_open() {
      Focus::Detail
    } else if self.form.open {
      Focus::Form
    } else if self.search.open {
      Focus::Search
    } else {
      Focus::Catalog
    }
  }

  fn report(&mut self, kind: NoticeKind, text: impl Into<String>, now: Instant) {
    self.status.show(kind, text, STATUS_TTL, now);
  }

  // ── Outcomes ──────────────────────────────────────────────────────────────

  /// Fold a finished command back into state.
  pub fn apply(&mut self, outcome: Outcome, now: Instant) {
    match outcome {
      Outcome::CatalogLoaded { generation, result } => {
        if let Some(e) = self.catalog.finish_load(generation, result) {
          self.report(NoticeKind::Failure, format!("Could not load uniforms: {e}"), now);
        }
      }
      Outcome::SearchLoaded { generation, result } => {
        if let Some(e) = self.search.finish_load(generation, result) {
          self.report(NoticeKind::Failure, format!("Could not load uniforms: {e}"), now);
        }
      }
      Outcome::Deleted { id, origin, result } => self.finish_delete(id, origin, result, now),
      Outcome::Created { generation, result } => {
        if !self.form.finish_submit(generation, result, now) {
          debug!("create response arrived after the form closed");
        }
      }
      Outcome::ImageFetched {
        generation,
        path,
        result,
      } => self.detail.finish_image(generation, &path, result),
      Outcome::ImageFileRead {
        generation,
        kind,
        path,
        result,
      } => self.form.finish_attach(generation, kind, path, result, now),
    }
  }

  fn finish_delete(&mut self, id: String, origin: DeleteOrigin, result: Result<(), Error>, now: Instant) {
    match origin {
      DeleteOrigin::Catalog => self.catalog.finish_delete(&id),
      DeleteOrigin::Search => self.search.finish_delete(&id),
    }
    self.detail.finish_delete(&id);

    match result {
      Ok(()) => {
        info!(%id, "uniform deleted");
        let event = RecordEvent::Deleted(id);
        let mut holders: [&mut dyn RecordSubscriber; 3] =
          [&mut self.catalog, &mut self.search, &mut self.detail];
        events::publish(&event, &mut holders);
        self.report(NoticeKind::Success, "Uniform deleted successfully!", now);
      }
      Err(e) => {
        let text = match &e {
          Error::Transport(_) => "Error deleting uniform.".to_string(),
          other => match other.backend_message() {
            Some(m) => format!("Failed to delete uniform: {m}"),
            None => "Failed to delete uniform.".to_string(),
          },
        };
        self.report(NoticeKind::Failure, text, now);
      }
    }
  }

  /// Advance every timer-driven notice.
  pub fn tick(&mut self, now: Instant) {
    self.status.tick(now);
    if self.form.tick(now) {
      debug!("create form closed after a successful submit");
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match self.focus() {
      Focus::Confirm => self.handle_confirm_key(key),
      Focus::Detail => self.handle_detail_key(key, now),
      Focus::Form => self.handle_form_key(key, now),
      Focus::Search => self.handle_search_key(key, now),
      Focus::Catalog => return self.handle_catalog_key(key, now),
    }
    true
  }

  fn ask_delete(&mut self, record: Option<&UniformRecord>, via: DeleteVia, in_flight: bool, now: Instant) {
    let Some(record) = record else {
      return;
    };
    if in_flight {
      self.report(NoticeKind::Info, "Delete already in progress.", now);
      return;
    }
    self.confirm = Some(PendingDelete {
      id: record.id.clone(),
      school: record.school.clone(),
      via,
    });
  }

  fn open_detail(&mut self, record: UniformRecord, owner: Owner) {
    let fetches = self.detail.show(record, owner);
    self.commands.extend(fetches);
  }

  fn handle_confirm_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
        if let Some(pending) = self.confirm.take() {
          self.confirm_delete(pending);
        }
      }
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.confirm = None,
      _ => {}
    }
  }

  /// Route a confirmed delete through the owning surface's handler.
  fn confirm_delete(&mut self, pending: PendingDelete) {
    let command = match pending.via {
      DeleteVia::Catalog => self.catalog.begin_delete(&pending.id),
      DeleteVia::Search => self.search.begin_delete(&pending.id),
      DeleteVia::Detail => match self.detail.begin_delete() {
        Some((id, Owner::Catalog)) => self.catalog.begin_delete(&id),
        Some((id, Owner::Search)) => self.search.begin_delete(&id),
        None => None,
      },
    };
    self.commands.extend(command);
  }

  fn handle_catalog_key(&mut self, key: KeyEvent, now: Instant) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Down | KeyCode::Char('j') => self.catalog.move_down(),
      KeyCode::Up | KeyCode::Char('k') => self.catalog.move_up(),

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(record) = self.catalog.cursor_record().cloned() {
          self.open_detail(record, Owner::Catalog);
        }
      }

      KeyCode::Char('d') | KeyCode::Delete => {
        let record = self.catalog.cursor_record().cloned();
        let in_flight = record.as_ref().is_some_and(|r| self.catalog.is_deleting(&r.id));
        self.ask_delete(record.as_ref(), DeleteVia::Catalog, in_flight, now);
      }

      KeyCode::Char('f') => self.catalog.cycle_filter(),
      KeyCode::Char('o') => self.catalog.toggle_sort(),
      KeyCode::Char('r') => {
        let load = self.catalog.begin_load();
        self.commands.push(load);
      }
      KeyCode::Char('/') => {
        let load = self.search.open();
        self.commands.push(load);
      }
      KeyCode::Char('n') => self.form.open(),

      _ => {}
    }
    true
  }

  fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
    match (key.code, self.search.focus) {
      (KeyCode::Esc, _) => self.search.close(),
      (KeyCode::Tab, _) | (KeyCode::BackTab, _) => self.search.toggle_focus(),

      (KeyCode::Enter, SearchFocus::Query) => self.search.run(),
      (KeyCode::Backspace, SearchFocus::Query) => self.search.pop_char(),
      (KeyCode::Down, SearchFocus::Query) => self.search.toggle_focus(),
      (KeyCode::Char(c), SearchFocus::Query) => self.search.push_char(c),

      (KeyCode::Down | KeyCode::Char('j'), SearchFocus::Results) => self.search.move_down(),
      (KeyCode::Up | KeyCode::Char('k'), SearchFocus::Results) => self.search.move_up(),
      (KeyCode::Enter, SearchFocus::Results) => {
        if let Some(record) = self.search.cursor_record().cloned() {
          self.open_detail(record, Owner::Search);
        }
      }
      (KeyCode::Char('d') | KeyCode::Delete, SearchFocus::Results) => {
        let record = self.search.cursor_record().cloned();
        let in_flight = record.as_ref().is_some_and(|r| self.search.is_deleting(&r.id));
        self.ask_delete(record.as_ref(), DeleteVia::Search, in_flight, now);
      }
      _ => {}
    }
  }

  fn handle_form_key(&mut self, key: KeyEvent, now: Instant) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
      let create = self.form.submit(now);
      self.commands.extend(create);
      return;
    }

    match (key.code, self.form.focus) {
      (KeyCode::Esc, _) => self.form.close(),
      (KeyCode::Tab | KeyCode::Down, _) => self.form.focus_next(),
      (KeyCode::BackTab | KeyCode::Up, _) => self.form.focus_prev(),

      (KeyCode::Left | KeyCode::Right, FormField::SchoolType) => self.form.toggle_type(),

      (KeyCode::Enter, FormField::Image(kind)) => {
        let read = self.form.request_attach(kind, now);
        self.commands.extend(read);
      }
      (KeyCode::Delete, FormField::Image(kind)) => self.form.detach(kind),
      (KeyCode::Enter, _) => self.form.focus_next(),

      (KeyCode::Backspace, _) => self.form.backspace(),
      (KeyCode::Char(c), _) => self.form.input_char(c),
      _ => {}
    }
  }

  fn handle_detail_key(&mut self, key: KeyEvent, now: Instant) {
    match key.code {
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => self.detail.close(),
      KeyCode::Down | KeyCode::Char('j') => self.detail.scroll_down(),
      KeyCode::Up | KeyCode::Char('k') => self.detail.scroll_up(),
      KeyCode::Char('d') | KeyCode::Delete => {
        let record = self.detail.record().cloned();
        let owner_busy = record.as_ref().is_some_and(|r| match self.detail.owner() {
          Some(Owner::Catalog) => self.catalog.is_deleting(&r.id),
          Some(Owner::Search) => self.search.is_deleting(&r.id),
          None => false,
        });
        let in_flight = self.detail.deleting || owner_busy;
        self.ask_delete(record.as_ref(), DeleteVia::Detail, in_flight, now);
      }
      _ => {}
    }
  }
}
