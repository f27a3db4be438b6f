//! Error types for `uniformpal-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The backend answered with a non-2xx status.
  #[error("backend rejected request ({status}){}", detail(.message))]
  Rejected {
    status:  u16,
    /// The `message` field of the JSON error body, when one was sent.
    message: Option<String>,
  },

  /// The request never produced a response.
  #[error("transport error: {0}")]
  Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("unexpected response: {0}")]
  Decode(String),
}

impl Error {
  /// The backend-provided reason, if the backend gave one.
  pub fn backend_message(&self) -> Option<&str> {
    match self {
      Self::Rejected { message, .. } => message.as_deref(),
      _ => None,
    }
  }

  pub fn is_transport(&self) -> bool { matches!(self, Self::Transport(_)) }
}

fn detail(message: &Option<String>) -> String {
  message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
