//! Record lifecycle events shared between surfaces.
//!
//! A surface that completes a delete publishes [`RecordEvent::Deleted`];
//! every holder of a copy of the record drops it on receipt.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordEvent {
  /// The backend confirmed the record with this id is gone.
  Deleted(String),
}

/// Anything that holds records, or a view of one.
pub trait RecordSubscriber {
  /// Must be a no-op for ids the subscriber does not hold.
  fn on_record_event(&mut self, event: &RecordEvent);
}

/// Deliver `event` to each subscriber in turn.
pub fn publish(event: &RecordEvent, subscribers: &mut [&mut dyn RecordSubscriber]) {
  for subscriber in subscribers.iter_mut() {
    subscriber.on_record_event(event);
  }
}
