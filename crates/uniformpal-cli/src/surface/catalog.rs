//! Catalog view: the main list with type filter and school sort.

use std::collections::HashSet;

use uniformpal_core::{
  Result,
  catalog::{self, SortOrder, TypeFilter},
  record::UniformRecord,
};

use crate::{
  command::{Command, DeleteOrigin},
  events::{RecordEvent, RecordSubscriber},
};

#[derive(Debug, Default)]
pub struct CatalogView {
  /// The catalog's own copy of the collection, in backend order.
  pub uniforms: Vec<UniformRecord>,
  pub loading:  bool,
  pub filter:   TypeFilter,
  pub order:    SortOrder,
  /// Cursor within [`Self::visible`].
  pub cursor:   usize,
  /// Ids with a delete in flight from this view.
  pub deleting: HashSet<String>,
  /// Ids deleted while a load was in flight; the load may still list them.
  tombstones:   HashSet<String>,
  generation:   u64,
}

impl CatalogView {
  /// Start a fresh fetch. Any load still in flight becomes stale.
  pub fn begin_load(&mut self) -> Command {
    self.generation += 1;
    self.loading = true;
    self.tombstones.clear();
    Command::LoadCatalog {
      generation: self.generation,
    }
  }

  /// Apply a list response. Returns the error for the caller to report, or
  /// `None` on success and for stale responses.
  pub fn finish_load(
    &mut self,
    generation: u64,
    result: Result<Vec<UniformRecord>>,
  ) -> Option<uniformpal_core::Error> {
    if generation != self.generation {
      return None;
    }
    self.loading = false;
    match result {
      Ok(mut uniforms) => {
        let tombstones = std::mem::take(&mut self.tombstones);
        uniforms.retain(|r| !tombstones.contains(&r.id));
        self.uniforms = uniforms;
        self.clamp_cursor();
        None
      }
      Err(e) => Some(e),
    }
  }

  /// Records after filter and sort, as rendered.
  pub fn visible(&self) -> Vec<&UniformRecord> {
    catalog::filter_and_sort(&self.uniforms, self.filter, self.order)
  }

  pub fn cursor_record(&self) -> Option<&UniformRecord> { self.visible().get(self.cursor).copied() }

  pub fn move_down(&mut self) {
    if self.cursor + 1 < self.visible().len() {
      self.cursor += 1;
    }
  }

  pub fn move_up(&mut self) { self.cursor = self.cursor.saturating_sub(1); }

  pub fn cycle_filter(&mut self) {
    self.filter = self.filter.next();
    self.cursor = 0;
  }

  pub fn toggle_sort(&mut self) {
    self.order = self.order.toggled();
    self.cursor = 0;
  }

  pub fn is_deleting(&self, id: &str) -> bool { self.deleting.contains(id) }

  /// Mark `id` in flight and produce the request. `None` when a delete for
  /// the same id is already pending.
  pub fn begin_delete(&mut self, id: &str) -> Option<Command> {
    if !self.deleting.insert(id.to_string()) {
      return None;
    }
    Some(Command::Delete {
      id:     id.to_string(),
      origin: DeleteOrigin::Catalog,
    })
  }

  /// Clear the in-flight marker. Removal on success arrives separately as a
  /// [`RecordEvent::Deleted`].
  pub fn finish_delete(&mut self, id: &str) { self.deleting.remove(id); }

  fn clamp_cursor(&mut self) {
    let len = self.visible().len();
    if self.cursor >= len {
      self.cursor = len.saturating_sub(1);
    }
  }
}

impl RecordSubscriber for CatalogView {
  fn on_record_event(&mut self, event: &RecordEvent) {
    match event {
      RecordEvent::Deleted(id) => {
        if self.loading {
          self.tombstones.insert(id.clone());
        }
        if catalog::remove_by_id(&mut self.uniforms, id) {
          self.clamp_cursor();
        }
      }
    }
  }
}
