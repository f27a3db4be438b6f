//! Transient notices: a single message slot that expires on its own.
//!
//! Time is passed in explicitly so state transitions stay deterministic.

use std::time::{Duration, Instant};

/// Required-field warning lifetime.
pub const WARNING_TTL: Duration = Duration::from_millis(2000);
/// Failed-create message lifetime.
pub const FAILURE_TTL: Duration = Duration::from_millis(2000);
/// Delay between a successful create and the form clearing itself.
pub const SUCCESS_CLOSE_DELAY: Duration = Duration::from_millis(1500);
/// Status bar messages (delete results, load errors).
pub const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
  Success,
  Failure,
  Warning,
  Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub kind:   NoticeKind,
  pub text:   String,
  expires_at: Instant,
}

/// Holds at most one notice. Showing a new one supersedes the old.
#[derive(Debug, Default)]
pub struct NoticeSlot {
  current: Option<Notice>,
}

impl NoticeSlot {
  pub fn show(&mut self, kind: NoticeKind, text: impl Into<String>, ttl: Duration, now: Instant) {
    self.current = Some(Notice {
      kind,
      text: text.into(),
      expires_at: now + ttl,
    });
  }

  /// Drop the notice once its deadline has passed.
  pub fn tick(&mut self, now: Instant) {
    if self.current.as_ref().is_some_and(|n| now >= n.expires_at) {
      self.current = None;
    }
  }

  pub fn clear(&mut self) { self.current = None; }

  pub fn current(&self) -> Option<&Notice> { self.current.as_ref() }

  pub fn text(&self) -> Option<&str> { self.current.as_ref().map(|n| n.text.as_str()) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn expires_after_ttl() {
    let t0 = Instant::now();
    let mut slot = NoticeSlot::default();
    slot.show(NoticeKind::Warning, "fill it in", WARNING_TTL, t0);

    slot.tick(t0 + Duration::from_millis(1999));
    assert_eq!(slot.text(), Some("fill it in"));

    slot.tick(t0 + WARNING_TTL);
    assert!(slot.current().is_none());
  }

  #[test]
  fn newer_notice_supersedes_and_resets_deadline() {
    let t0 = Instant::now();
    let mut slot = NoticeSlot::default();
    slot.show(NoticeKind::Warning, "first", WARNING_TTL, t0);
    slot.show(NoticeKind::Failure, "second", FAILURE_TTL, t0 + Duration::from_millis(1500));

    slot.tick(t0 + Duration::from_millis(2500));
    let notice = slot.current().unwrap();
    assert_eq!(notice.kind, NoticeKind::Failure);
    assert_eq!(notice.text, "second");
  }
}
