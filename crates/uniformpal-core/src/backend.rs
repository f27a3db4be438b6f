//! The `UniformBackend` trait: the seam between the client and the REST
//! service that owns the records.
//!
//! The CLI implements it over HTTP; tests implement it in memory.

use std::future::Future;

use bytes::Bytes;

use crate::{
  Result,
  record::UniformRecord,
  submission::{CreateReceipt, NewUniform},
};

/// Abstraction over the uniform catalog service.
///
/// All methods return `Send` futures so callers can spawn them onto a
/// multi-threaded tokio runtime.
pub trait UniformBackend: Send + Sync {
  /// `GET /uniforms`: the full collection.
  fn list_uniforms(&self) -> impl Future<Output = Result<Vec<UniformRecord>>> + Send + '_;

  /// `POST /add-uniform`: one multipart request carrying every present
  /// field and image.
  fn create_uniform(
    &self,
    new: NewUniform,
  ) -> impl Future<Output = Result<CreateReceipt>> + Send + '_;

  /// `DELETE /delete-uniform/{id}`.
  fn delete_uniform<'a>(&'a self, id: &'a str) -> impl Future<Output = Result<()>> + Send + 'a;

  /// `GET {path}`: raw image bytes for a path taken from a record.
  fn fetch_image<'a>(&'a self, path: &'a str) -> impl Future<Output = Result<Bytes>> + Send + 'a;
}
