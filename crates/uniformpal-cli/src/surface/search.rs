//! Search dialog: explicit substring search over its own fetched copy.

use std::collections::HashSet;

use uniformpal_core::{Result, catalog, record::UniformRecord};

use crate::{
  command::{Command, DeleteOrigin},
  events::{RecordEvent, RecordSubscriber},
};

pub const PROMPT_TEXT: &str = "Type a school name to begin your search.";
pub const NO_MATCHES_TEXT: &str = "No matching uniforms found.";

/// Which of the three result states the dialog is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
  NotSearched,
  Found,
  NoMatches,
}

/// Keyboard focus inside the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFocus {
  #[default]
  Query,
  Results,
}

#[derive(Debug, Default)]
pub struct SearchSurface {
  pub open:     bool,
  pub query:    String,
  /// The dialog's own copy of the collection, fetched on open.
  pub uniforms: Vec<UniformRecord>,
  /// Matches from the last explicit search.
  pub results:  Vec<UniformRecord>,
  pub searched: bool,
  pub loading:  bool,
  pub focus:    SearchFocus,
  pub cursor:   usize,
  pub deleting: HashSet<String>,
  /// Ids deleted while the open-time load was in flight.
  tombstones:   HashSet<String>,
  generation:   u64,
}

impl SearchSurface {
  /// Open the dialog and request a fresh copy of the collection.
  pub fn open(&mut self) -> Command {
    self.generation += 1;
    self.open = true;
    self.loading = true;
    self.tombstones.clear();
    Command::LoadSearch {
      generation: self.generation,
    }
  }

  /// Close and reset query, results and selection. A load still in flight
  /// for this session will be dropped on arrival.
  pub fn close(&mut self) {
    self.generation += 1;
    self.open = false;
    self.loading = false;
    self.query.clear();
    self.results.clear();
    self.searched = false;
    self.focus = SearchFocus::Query;
    self.cursor = 0;
  }

  pub fn finish_load(
    &mut self,
    generation: u64,
    result: Result<Vec<UniformRecord>>,
  ) -> Option<uniformpal_core::Error> {
    if generation != self.generation || !self.open {
      return None;
    }
    self.loading = false;
    match result {
      Ok(mut uniforms) => {
        let tombstones = std::mem::take(&mut self.tombstones);
        uniforms.retain(|r| !tombstones.contains(&r.id));
        self.uniforms = uniforms;
        None
      }
      Err(e) => Some(e),
    }
  }

  /// Run the query against the local copy. A blank query yields no results.
  pub fn run(&mut self) {
    self.searched = true;
    self.results = catalog::search(&self.uniforms, &self.query)
      .into_iter()
      .cloned()
      .collect();
    self.cursor = 0;
    if !self.results.is_empty() {
      self.focus = SearchFocus::Results;
    }
  }

  pub fn state(&self) -> SearchState {
    match (self.searched, self.results.is_empty()) {
      (false, _) => SearchState::NotSearched,
      (true, false) => SearchState::Found,
      (true, true) => SearchState::NoMatches,
    }
  }

  /// Guidance line for the states that have no result list.
  pub fn guidance(&self) -> Option<&'static str> {
    match self.state() {
      SearchState::NotSearched => Some(PROMPT_TEXT),
      SearchState::NoMatches => Some(NO_MATCHES_TEXT),
      SearchState::Found => None,
    }
  }

  pub fn push_char(&mut self, c: char) { self.query.push(c); }

  pub fn pop_char(&mut self) { self.query.pop(); }

  pub fn toggle_focus(&mut self) {
    self.focus = match self.focus {
      SearchFocus::Query if !self.results.is_empty() => SearchFocus::Results,
      _ => SearchFocus::Query,
    };
  }

  pub fn cursor_record(&self) -> Option<&UniformRecord> { self.results.get(self.cursor) }

  pub fn move_down(&mut self) {
    if self.cursor + 1 < self.results.len() {
      self.cursor += 1;
    }
  }

  pub fn move_up(&mut self) { self.cursor = self.cursor.saturating_sub(1); }

  pub fn is_deleting(&self, id: &str) -> bool { self.deleting.contains(id) }

  pub fn begin_delete(&mut self, id: &str) -> Option<Command> {
    if !self.deleting.insert(id.to_string()) {
      return None;
    }
    Some(Command::Delete {
      id:     id.to_string(),
      origin: DeleteOrigin::Search,
    })
  }

  pub fn finish_delete(&mut self, id: &str) { self.deleting.remove(id); }
}

impl RecordSubscriber for SearchSurface {
  fn on_record_event(&mut self, event: &RecordEvent) {
    match event {
      RecordEvent::Deleted(id) => {
        if self.loading {
          self.tombstones.insert(id.clone());
        }
        catalog::remove_by_id(&mut self.uniforms, id);
        if catalog::remove_by_id(&mut self.results, id) {
          if self.cursor >= self.results.len() {
            self.cursor = self.results.len().saturating_sub(1);
          }
          if self.results.is_empty() {
            self.focus = SearchFocus::Query;
          }
        }
      }
    }
  }
}
