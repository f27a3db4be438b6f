//! End-to-end tests for the app state machine, driven through the real
//! dispatcher against an in-memory backend.

use std::{
  collections::HashSet,
  sync::{Arc, Mutex},
  time::{Duration, Instant},
};

use bytes::Bytes;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};
use tokio::sync::mpsc::UnboundedReceiver;
use uniformpal_core::{
  Error, Result,
  backend::UniformBackend,
  record::{SchoolType, UniformRecord},
  submission::{CreateReceipt, NewUniform},
};

use crate::{
  app::{App, Focus},
  command::{Command, Dispatcher, Outcome},
  notice::SUCCESS_CLOSE_DELAY,
  surface::{
    detail::ImageState,
    form::{FormField, REQUIRED_TEXT, SUCCESS_TEXT},
    search::NO_MATCHES_TEXT,
  },
  ui,
};

/// A primary or secondary record with only the required fields set.
pub fn record(id: &str, school: &str, school_type: SchoolType) -> UniformRecord {
  UniformRecord {
    id: id.to_string(),
    school: school.to_string(),
    school_type,
    uniform_combo: format!("{school} uniform"),
    uniform_image: None,
    compound_wear: None,
    compound_image: None,
    church_wear: None,
    church_image: None,
  }
}

// ─── Fake backend ────────────────────────────────────────────────────────────

const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

#[derive(Default)]
struct FakeState {
  records:       Vec<UniformRecord>,
  failing:       HashSet<String>,
  reject_create: Option<String>,
  created:       Vec<NewUniform>,
  deleted:       Vec<String>,
}

#[derive(Default)]
struct FakeBackend {
  state: Mutex<FakeState>,
}

impl FakeBackend {
  fn with_records(records: Vec<UniformRecord>) -> Self {
    Self {
      state: Mutex::new(FakeState {
        records,
        ..FakeState::default()
      }),
    }
  }

  fn fail_delete(&self, id: &str) { self.state.lock().unwrap().failing.insert(id.to_string()); }

  fn reject_creates(&self, message: &str) {
    self.state.lock().unwrap().reject_create = Some(message.to_string());
  }

  fn created(&self) -> Vec<NewUniform> { self.state.lock().unwrap().created.clone() }

  fn deleted(&self) -> Vec<String> { self.state.lock().unwrap().deleted.clone() }
}

impl UniformBackend for FakeBackend {
  async fn list_uniforms(&self) -> Result<Vec<UniformRecord>> {
    Ok(self.state.lock().unwrap().records.clone())
  }

  async fn create_uniform(&self, new: NewUniform) -> Result<CreateReceipt> {
    let mut state = self.state.lock().unwrap();
    state.created.push(new);
    match &state.reject_create {
      Some(message) => Err(Error::Rejected {
        status:  409,
        message: Some(message.clone()),
      }),
      None => Ok(CreateReceipt {
        message: Some("Uniform added".into()),
        uniform: None,
      }),
    }
  }

  async fn delete_uniform<'a>(&'a self, id: &'a str) -> Result<()> {
    let mut state = self.state.lock().unwrap();
    if state.failing.contains(id) {
      return Err(Error::Rejected {
        status:  500,
        message: Some("boom".into()),
      });
    }
    state.records.retain(|r| r.id != id);
    state.deleted.push(id.to_string());
    Ok(())
  }

  async fn fetch_image<'a>(&'a self, path: &'a str) -> Result<Bytes> {
    if path.contains("missing") {
      return Err(Error::Rejected {
        status:  404,
        message: None,
      });
    }
    Ok(Bytes::from_static(PNG))
  }
}

// ─── Harness ─────────────────────────────────────────────────────────────────

struct Harness {
  app:        App,
  backend:    Arc<FakeBackend>,
  dispatcher: Dispatcher<FakeBackend>,
  outcomes:   UnboundedReceiver<Outcome>,
  now:        Instant,
}

impl Harness {
  fn new(backend: FakeBackend) -> Self {
    let backend = Arc::new(backend);
    let (dispatcher, outcomes) = Dispatcher::new(Arc::clone(&backend));
    Self {
      app: App::new("http://localhost:5000"),
      backend,
      dispatcher,
      outcomes,
      now: Instant::now(),
    }
  }

  /// Started with the catalog loaded.
  async fn started(records: Vec<UniformRecord>) -> Self {
    let mut h = Self::new(FakeBackend::with_records(records));
    h.app.start();
    h.settle().await;
    h
  }

  /// Run every queued command and apply its outcome.
  async fn settle(&mut self) {
    let commands = self.app.take_commands();
    let n = commands.len();
    self.dispatcher.dispatch_all(commands);
    for _ in 0..n {
      let outcome = self.outcomes.recv().await.expect("outcome");
      self.app.apply(outcome, self.now);
    }
  }

  fn key(&mut self, code: KeyCode) -> bool { self.app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), self.now) }

  fn ctrl(&mut self, c: char) -> bool {
    self
      .app
      .handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL), self.now)
  }

  fn type_text(&mut self, text: &str) {
    for c in text.chars() {
      self.key(KeyCode::Char(c));
    }
  }

  fn status(&self) -> Option<&str> { self.app.status.text() }
}

fn schools(records: &[UniformRecord]) -> Vec<&str> { records.iter().map(|r| r.school.as_str()).collect() }

fn three() -> Vec<UniformRecord> {
  vec![
    record("g", "Gamma Grammar", SchoolType::Secondary),
    record("a", "Alpha Primary", SchoolType::Primary),
    record("b", "Beta College", SchoolType::Secondary),
  ]
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn start_loads_the_catalog() {
  let h = Harness::started(three()).await;
  assert!(!h.app.catalog.loading);
  let visible: Vec<_> = h.app.catalog.visible().iter().map(|r| r.school.as_str()).collect();
  assert_eq!(visible, vec!["Alpha Primary", "Beta College", "Gamma Grammar"]);
  assert_eq!(h.app.focus(), Focus::Catalog);
}

#[tokio::test]
async fn q_quits_and_ctrl_c_quits_anywhere() {
  let mut h = Harness::started(three()).await;
  assert!(h.key(KeyCode::Char('j')));
  assert!(!h.key(KeyCode::Char('q')));

  h.key(KeyCode::Char('n'));
  assert_eq!(h.app.focus(), Focus::Form);
  assert!(!h.ctrl('c'));
}

#[tokio::test]
async fn catalog_delete_asks_first_and_removes_on_success() {
  let mut h = Harness::started(three()).await;

  h.key(KeyCode::Char('d'));
  assert_eq!(h.app.focus(), Focus::Confirm);
  h.key(KeyCode::Char('n'));
  assert!(h.app.confirm.is_none());
  assert!(h.app.take_commands().is_empty());

  h.key(KeyCode::Char('d'));
  h.key(KeyCode::Char('y'));
  assert!(h.app.catalog.is_deleting("a"));
  h.settle().await;

  assert_eq!(h.backend.deleted(), vec!["a"]);
  assert_eq!(schools(&h.app.catalog.uniforms), vec!["Gamma Grammar", "Beta College"]);
  assert!(!h.app.catalog.is_deleting("a"));
  assert_eq!(h.status(), Some("Uniform deleted successfully!"));
}

#[tokio::test]
async fn failed_delete_leaves_the_record() {
  let mut h = Harness::started(three()).await;
  h.backend.fail_delete("a");

  h.key(KeyCode::Char('d'));
  h.key(KeyCode::Char('y'));
  h.settle().await;

  assert_eq!(h.app.catalog.uniforms.len(), 3);
  assert!(!h.app.catalog.is_deleting("a"));
  assert_eq!(h.status(), Some("Failed to delete uniform: boom"));
}

#[tokio::test]
async fn concurrent_deletes_resolve_independently() {
  let mut h = Harness::started(three()).await;
  h.backend.fail_delete("b");

  h.key(KeyCode::Char('d'));
  h.key(KeyCode::Char('y'));
  h.key(KeyCode::Char('j'));
  h.key(KeyCode::Char('d'));
  h.key(KeyCode::Char('y'));

  assert!(h.app.catalog.is_deleting("a"));
  assert!(h.app.catalog.is_deleting("b"));

  // A second request for an id already in flight is refused.
  h.key(KeyCode::Char('d'));
  assert!(h.app.confirm.is_none());

  h.settle().await;

  assert!(h.app.catalog.deleting.is_empty());
  assert_eq!(schools(&h.app.catalog.uniforms), vec!["Gamma Grammar", "Beta College"]);
  assert_eq!(h.backend.deleted(), vec!["a"]);
}

// ─── Search and detail ───────────────────────────────────────────────────────

#[tokio::test]
async fn detail_refuses_a_delete_its_owner_already_started() {
  let mut h = Harness::started(three()).await;

  h.key(KeyCode::Char('d'));
  h.key(KeyCode::Char('y'));
  assert!(h.app.catalog.is_deleting("a"));

  h.key(KeyCode::Enter);
  assert!(h.app.detail.is_showing("a"));

  h.key(KeyCode::Char('d'));
  assert!(h.app.confirm.is_none());
  assert!(!h.app.detail.deleting);
  assert_eq!(h.status(), Some("Delete already in progress."));

  h.settle().await;
  assert!(!h.app.detail.is_open());
  assert_eq!(h.backend.deleted(), vec!["a"]);
}

#[tokio::test]
async fn delete_from_search_detail_reaches_every_surface() {
  let mut h = Harness::started(three()).await;

  h.key(KeyCode::Char('/'));
  assert_eq!(h.app.focus(), Focus::Search);
  h.settle().await;
  assert_eq!(h.app.search.uniforms.len(), 3);

  h.type_text("beta");
  h.key(KeyCode::Enter);
  assert_eq!(schools(&h.app.search.results), vec!["Beta College"]);

  h.key(KeyCode::Enter);
  assert_eq!(h.app.focus(), Focus::Detail);
  assert!(h.app.detail.is_showing("b"));

  h.key(KeyCode::Char('d'));
  h.key(KeyCode::Char('y'));
  assert!(h.app.detail.deleting);
  assert!(h.app.search.is_deleting("b"));
  h.settle().await;

  assert!(!h.app.detail.is_open());
  assert!(h.app.search.results.is_empty());
  assert!(h.app.search.uniforms.iter().all(|r| r.id != "b"));
  assert!(h.app.catalog.uniforms.iter().all(|r| r.id != "b"));
  assert_eq!(h.app.focus(), Focus::Search);
}

#[tokio::test]
async fn late_search_load_after_close_is_ignored() {
  let mut h = Harness::started(three()).await;

  h.key(KeyCode::Char('/'));
  let commands = h.app.take_commands();
  assert!(matches!(commands.as_slice(), [Command::LoadSearch { .. }]));

  h.key(KeyCode::Esc);
  assert!(!h.app.search.open);

  h.dispatcher.dispatch_all(commands);
  let outcome = h.outcomes.recv().await.expect("outcome");
  h.app.apply(outcome, h.now);

  assert!(h.app.search.uniforms.is_empty());
  assert!(!h.app.search.loading);
}

#[tokio::test]
async fn blank_search_and_reopen_reset() {
  let mut h = Harness::started(three()).await;
  h.key(KeyCode::Char('/'));
  h.settle().await;

  h.type_text("   ");
  h.key(KeyCode::Enter);
  assert!(h.app.search.results.is_empty());

  h.key(KeyCode::Esc);
  h.key(KeyCode::Char('/'));
  assert!(h.app.search.query.is_empty());
  assert!(!h.app.search.searched);
}

#[tokio::test]
async fn detail_fetches_and_sniffs_images() {
  let mut records = three();
  records[1].uniform_image = Some("/uploads/alpha.png".into());
  let mut h = Harness::started(records).await;

  h.key(KeyCode::Enter);
  assert!(h.app.detail.is_showing("a"));
  h.settle().await;

  assert_eq!(
    h.app.detail.images["/uploads/alpha.png"],
    ImageState::Loaded {
      size: PNG.len(),
      mime: Some("image/png"),
    }
  );

  h.key(KeyCode::Esc);
  assert_eq!(h.app.focus(), Focus::Catalog);
}

// ─── Create form ─────────────────────────────────────────────────────────────

fn fill_primary(h: &mut Harness, school: &str, combo: &str) {
  h.key(KeyCode::Char('n'));
  h.key(KeyCode::Char('p'));
  h.key(KeyCode::Tab);
  h.type_text(school);
  h.key(KeyCode::Tab);
  h.type_text(combo);
}

#[tokio::test]
async fn empty_school_is_rejected_locally() {
  let mut h = Harness::started(three()).await;
  fill_primary(&mut h, "", "White shirt");

  h.ctrl('s');
  assert!(h.app.take_commands().is_empty());
  assert_eq!(h.app.form.notice.text(), Some(REQUIRED_TEXT));
  assert!(h.backend.created().is_empty());
}

#[tokio::test]
async fn rejected_create_keeps_the_form_open() {
  let mut h = Harness::started(three()).await;
  h.backend.reject_creates("duplicate school");
  fill_primary(&mut h, "Alpha Primary", "Blue");

  h.ctrl('s');
  h.settle().await;

  assert!(h.app.form.open);
  assert!(!h.app.form.submitting);
  assert_eq!(h.app.form.notice.text(), Some("duplicate school"));
  assert_eq!(h.app.form.school, "Alpha Primary");
}

#[tokio::test]
async fn successful_create_closes_after_delay() {
  let mut h = Harness::started(three()).await;
  fill_primary(&mut h, "  Delta Primary ", "Green");

  h.ctrl('s');
  h.settle().await;
  assert_eq!(h.app.form.notice.text(), Some(SUCCESS_TEXT));

  let created = h.backend.created();
  assert_eq!(created.len(), 1);
  assert_eq!(created[0].school, "Delta Primary");
  assert_eq!(created[0].uniform_combo, "Green");

  h.app.tick(h.now + Duration::from_millis(500));
  assert!(h.app.form.open);

  h.app.tick(h.now + SUCCESS_CLOSE_DELAY);
  assert!(!h.app.form.open);
  assert!(h.app.form.school.is_empty());
  assert_eq!(h.app.focus(), Focus::Catalog);
}

#[tokio::test]
async fn esc_before_auto_close_still_clears_the_form() {
  let mut h = Harness::started(three()).await;
  fill_primary(&mut h, "Delta Primary", "Green");

  h.ctrl('s');
  h.settle().await;
  assert_eq!(h.app.form.notice.text(), Some(SUCCESS_TEXT));

  h.key(KeyCode::Esc);
  assert!(!h.app.form.open);
  h.app.tick(h.now + SUCCESS_CLOSE_DELAY);

  h.key(KeyCode::Char('n'));
  assert!(h.app.form.school.is_empty());
  assert!(h.app.form.uniform_combo.is_empty());
  assert!(h.app.form.school_type.is_none());

  // Resubmitting the reopened form sends nothing.
  h.ctrl('s');
  h.settle().await;
  assert_eq!(h.backend.created().len(), 1);
}

#[tokio::test]
async fn switching_to_primary_excludes_secondary_extras() {
  let mut h = Harness::started(three()).await;
  h.key(KeyCode::Char('n'));
  h.key(KeyCode::Char('s'));
  assert_eq!(h.app.form.visible_fields().len(), 8);

  h.app.form.school = "Epsilon".into();
  h.app.form.uniform_combo = "Grey".into();
  h.app.form.compound_wear = "House tee".into();
  h.app.form.church_wear = "Whites".into();

  // Back on the type field, flip to primary.
  h.app.form.focus = FormField::SchoolType;
  h.key(KeyCode::Left);
  assert_eq!(h.app.form.school_type, Some(SchoolType::Primary));

  h.ctrl('s');
  h.settle().await;

  let created = h.backend.created();
  let fields: Vec<_> = created[0].text_fields().into_iter().map(|(k, _)| k).collect();
  assert_eq!(fields, vec!["school", "schoolType", "uniformCombo"]);
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn render(app: &App) -> String {
  let mut terminal = Terminal::new(TestBackend::new(120, 32)).unwrap();
  terminal.draw(|f| ui::draw(f, app)).unwrap();
  terminal
    .backend()
    .buffer()
    .content()
    .iter()
    .map(|cell| cell.symbol())
    .collect()
}

#[tokio::test]
async fn renders_catalog_and_dialogs() {
  let mut h = Harness::started(three()).await;
  let screen = render(&h.app);
  assert!(screen.contains("Alpha Primary"));
  assert!(screen.contains("CATALOG"));

  h.key(KeyCode::Char('/'));
  h.settle().await;
  h.type_text("zzz");
  h.key(KeyCode::Enter);
  assert!(render(&h.app).contains(NO_MATCHES_TEXT));

  h.key(KeyCode::Esc);
  h.key(KeyCode::Char('n'));
  assert!(render(&h.app).contains("School type"));
}

#[tokio::test]
async fn relative_image_paths_render_as_fetched() {
  let mut records = three();
  records[1].uniform_image = Some("uploads/alpha.png".into());
  let mut h = Harness::started(records).await;
  assert!(render(&h.app).contains("http://localhost:5000/uploads/alpha.png"));

  h.key(KeyCode::Enter);
  h.settle().await;
  let screen = render(&h.app);
  assert!(screen.contains("http://localhost:5000/uploads/alpha.png"));
  assert!(!screen.contains("5000uploads"));
}

#[tokio::test]
async fn renders_empty_and_loading_catalog() {
  let mut h = Harness::new(FakeBackend::default());
  h.app.start();
  assert!(render(&h.app).contains("Loading uniforms"));

  h.settle().await;
  assert!(render(&h.app).contains("No uniforms available"));
}
