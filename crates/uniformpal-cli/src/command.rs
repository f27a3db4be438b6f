//! Side effects requested by the surfaces, and the dispatcher that runs them.
//!
//! Surfaces never perform I/O themselves. They hand back [`Command`]s; the
//! [`Dispatcher`] spawns each one as a tokio task and reports an [`Outcome`]
//! on a channel the event loop drains. Load, create and image outcomes carry
//! the generation of the session that asked for them so a closed surface can
//! recognise and drop a late answer.

use std::{path::PathBuf, sync::Arc};

use bytes::Bytes;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, warn};
use uniformpal_core::{
  Result,
  backend::UniformBackend,
  record::{UniformRecord, WearKind},
  submission::{CreateReceipt, NewUniform},
};

/// Which surface's delete handler issued a delete. Deletes started from
/// the detail overlay go through the handler of the surface that opened it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOrigin {
  Catalog,
  Search,
}

#[derive(Debug)]
pub enum Command {
  LoadCatalog { generation: u64 },
  LoadSearch { generation: u64 },
  Delete { id: String, origin: DeleteOrigin },
  Create { generation: u64, new: NewUniform },
  FetchImage { generation: u64, path: String },
  ReadImageFile { generation: u64, kind: WearKind, path: PathBuf },
}

impl Command {
  pub fn name(&self) -> &'static str {
    match self {
      Self::LoadCatalog { .. } => "load-catalog",
      Self::LoadSearch { .. } => "load-search",
      Self::Delete { .. } => "delete",
      Self::Create { .. } => "create",
      Self::FetchImage { .. } => "fetch-image",
      Self::ReadImageFile { .. } => "read-image-file",
    }
  }
}

#[derive(Debug)]
pub enum Outcome {
  CatalogLoaded {
    generation: u64,
    result:     Result<Vec<UniformRecord>>,
  },
  SearchLoaded {
    generation: u64,
    result:     Result<Vec<UniformRecord>>,
  },
  Deleted {
    id:     String,
    origin: DeleteOrigin,
    result: Result<()>,
  },
  Created {
    generation: u64,
    result:     Result<CreateReceipt>,
  },
  ImageFetched {
    generation: u64,
    path:       String,
    result:     Result<Bytes>,
  },
  ImageFileRead {
    generation: u64,
    kind:       WearKind,
    path:       PathBuf,
    result:     std::io::Result<Bytes>,
  },
}

// ─── Dispatcher ───────────────────────────────────────────────────────────────

/// Runs commands against a backend, one task per command.
pub struct Dispatcher<B> {
  backend: Arc<B>,
  tx:      UnboundedSender<Outcome>,
}

impl<B> Dispatcher<B>
where
  B: UniformBackend + 'static,
{
  pub fn new(backend: Arc<B>) -> (Self, UnboundedReceiver<Outcome>) {
    let (tx, rx) = unbounded_channel();
    (Self { backend, tx }, rx)
  }

  pub fn dispatch(&self, command: Command) {
    debug!(command = command.name(), "dispatching");
    let backend = Arc::clone(&self.backend);
    let tx = self.tx.clone();
    tokio::spawn(async move {
      let outcome = run(backend.as_ref(), command).await;
      if tx.send(outcome).is_err() {
        debug!("outcome receiver closed; dropping result");
      }
    });
  }

  pub fn dispatch_all(&self, commands: impl IntoIterator<Item = Command>) {
    for command in commands {
      self.dispatch(command);
    }
  }
}

async fn run<B: UniformBackend>(backend: &B, command: Command) -> Outcome {
  match command {
    Command::LoadCatalog { generation } => {
      let result = backend.list_uniforms().await;
      if let Err(e) = &result {
        warn!(error = %e, "fetching uniforms for the catalog failed");
      }
      Outcome::CatalogLoaded { generation, result }
    }
    Command::LoadSearch { generation } => {
      let result = backend.list_uniforms().await;
      if let Err(e) = &result {
        warn!(error = %e, "fetching uniforms for search failed");
      }
      Outcome::SearchLoaded { generation, result }
    }
    Command::Delete { id, origin } => {
      let result = backend.delete_uniform(&id).await;
      if let Err(e) = &result {
        warn!(error = %e, %id, ?origin, "deleting uniform failed");
      }
      Outcome::Deleted { id, origin, result }
    }
    Command::Create { generation, new } => {
      let school = new.school.clone();
      let result = backend.create_uniform(new).await;
      if let Err(e) = &result {
        warn!(error = %e, %school, "creating uniform failed");
      }
      Outcome::Created { generation, result }
    }
    Command::FetchImage { generation, path } => {
      let result = backend.fetch_image(&path).await;
      if let Err(e) = &result {
        warn!(error = %e, %path, "fetching image failed");
      }
      Outcome::ImageFetched {
        generation,
        path,
        result,
      }
    }
    Command::ReadImageFile {
      generation,
      kind,
      path,
    } => {
      let result = tokio::fs::read(&path).await.map(Bytes::from);
      if let Err(e) = &result {
        warn!(error = %e, path = %path.display(), "reading image file failed");
      }
      Outcome::ImageFileRead {
        generation,
        kind,
        path,
        result,
      }
    }
  }
}
