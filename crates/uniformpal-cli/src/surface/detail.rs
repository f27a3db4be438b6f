//! Detail overlay: a read view over one record handed to it.

use std::collections::BTreeMap;

use bytes::Bytes;
use uniformpal_core::{Result, record::UniformRecord};

use crate::{
  command::Command,
  events::{RecordEvent, RecordSubscriber},
};

/// Load state of one referenced image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
  Loading,
  Loaded {
    size: usize,
    mime: Option<&'static str>,
  },
  Failed(String),
}

/// The surface that opened the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
  Catalog,
  Search,
}

#[derive(Debug, Default)]
pub struct DetailOverlay {
  record:       Option<UniformRecord>,
  owner:        Option<Owner>,
  pub deleting: bool,
  pub scroll:   u16,
  /// Keyed by image path as it appears on the record.
  pub images:   BTreeMap<String, ImageState>,
  generation:   u64,
}

impl DetailOverlay {
  /// Show `record`, returning the image fetches it needs.
  pub fn show(&mut self, record: UniformRecord, owner: Owner) -> Vec<Command> {
    self.generation += 1;
    self.deleting = false;
    self.scroll = 0;
    self.images.clear();
    let commands = record
      .image_paths()
      .into_iter()
      .map(|path| {
        self.images.insert(path.to_string(), ImageState::Loading);
        Command::FetchImage {
          generation: self.generation,
          path:       path.to_string(),
        }
      })
      .collect();
    self.record = Some(record);
    self.owner = Some(owner);
    commands
  }

  pub fn close(&mut self) {
    self.generation += 1;
    self.record = None;
    self.owner = None;
    self.deleting = false;
    self.images.clear();
  }

  pub fn record(&self) -> Option<&UniformRecord> { self.record.as_ref() }

  pub fn owner(&self) -> Option<Owner> { self.owner }

  pub fn is_open(&self) -> bool { self.record.is_some() }

  pub fn is_showing(&self, id: &str) -> bool { self.record.as_ref().is_some_and(|r| r.id == id) }

  pub fn finish_image(&mut self, generation: u64, path: &str, result: Result<Bytes>) {
    if generation != self.generation {
      return;
    }
    let Some(state) = self.images.get_mut(path) else {
      return;
    };
    *state = match result {
      Ok(bytes) => ImageState::Loaded {
        size: bytes.len(),
        mime: infer::get(&bytes).map(|t| t.mime_type()),
      },
      Err(e) => ImageState::Failed(e.to_string()),
    };
  }

  /// Mark the shown record as being deleted and name the surface whose
  /// delete handler should issue the request. `None` when nothing is shown
  /// or a delete is already pending.
  pub fn begin_delete(&mut self) -> Option<(String, Owner)> {
    if self.deleting {
      return None;
    }
    let id = self.record.as_ref()?.id.clone();
    let owner = self.owner?;
    self.deleting = true;
    Some((id, owner))
  }

  /// Called when any delete for `id` resolves. Success closes the overlay
  /// through the deleted event as well.
  pub fn finish_delete(&mut self, id: &str) {
    if self.is_showing(id) {
      self.deleting = false;
    }
  }

  pub fn scroll_down(&mut self) { self.scroll = self.scroll.saturating_add(1); }

  pub fn scroll_up(&mut self) { self.scroll = self.scroll.saturating_sub(1); }
}

impl RecordSubscriber for DetailOverlay {
  fn on_record_event(&mut self, event: &RecordEvent) {
    match event {
      RecordEvent::Deleted(id) => {
        if self.is_showing(id) {
          self.close();
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use uniformpal_core::record::SchoolType;

  use super::*;
  use crate::tests::record;

  const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

  #[test]
  fn show_requests_each_image_once() {
    let mut detail = DetailOverlay::default();
    let mut rec = record("1", "Kings College", SchoolType::Secondary);
    rec.uniform_image = Some("/uploads/u.png".into());
    rec.compound_wear = Some("House tee".into());
    rec.compound_image = Some("/uploads/c.png".into());
    rec.church_image = Some("/uploads/orphan.png".into());

    let commands = detail.show(rec, Owner::Catalog);
    let paths: Vec<_> = commands
      .iter()
      .map(|c| match c {
        Command::FetchImage { path, .. } => path.as_str(),
        other => panic!("unexpected {other:?}"),
      })
      .collect();
    assert_eq!(paths, vec!["/uploads/u.png", "/uploads/c.png"]);
    assert_eq!(detail.images.len(), 2);
  }

  #[test]
  fn image_results_for_a_previous_record_are_dropped() {
    let mut detail = DetailOverlay::default();
    let mut first = record("1", "A", SchoolType::Primary);
    first.uniform_image = Some("/uploads/a.png".into());
    let Some(Command::FetchImage { generation, .. }) = detail.show(first, Owner::Catalog).pop() else {
      panic!("expected an image fetch");
    };

    let mut second = record("2", "B", SchoolType::Primary);
    second.uniform_image = Some("/uploads/a.png".into());
    detail.show(second, Owner::Search);

    detail.finish_image(generation, "/uploads/a.png", Ok(Bytes::from_static(PNG)));
    assert_eq!(detail.images["/uploads/a.png"], ImageState::Loading);
  }

  #[test]
  fn image_mime_is_sniffed() {
    let mut detail = DetailOverlay::default();
    let mut rec = record("1", "A", SchoolType::Primary);
    rec.uniform_image = Some("/uploads/a.png".into());
    let Some(Command::FetchImage { generation, path }) = detail.show(rec, Owner::Catalog).pop() else {
      panic!("expected an image fetch");
    };

    detail.finish_image(generation, &path, Ok(Bytes::from_static(PNG)));
    assert_eq!(
      detail.images[&path],
      ImageState::Loaded {
        size: PNG.len(),
        mime: Some("image/png"),
      }
    );
  }

  #[test]
  fn deleted_event_closes_only_the_matching_record() {
    let mut detail = DetailOverlay::default();
    detail.show(record("1", "A", SchoolType::Primary), Owner::Search);

    detail.on_record_event(&RecordEvent::Deleted("2".into()));
    assert!(detail.is_open());

    detail.on_record_event(&RecordEvent::Deleted("1".into()));
    assert!(!detail.is_open());
    assert!(detail.owner.is_none());
  }

  #[test]
  fn delete_is_single_flight() {
    let mut detail = DetailOverlay::default();
    assert!(detail.begin_delete().is_none());

    detail.show(record("1", "A", SchoolType::Primary), Owner::Search);
    assert_eq!(detail.begin_delete(), Some(("1".to_string(), Owner::Search)));
    assert!(detail.begin_delete().is_none());

    detail.finish_delete("1");
    assert!(!detail.deleting);
  }
}
