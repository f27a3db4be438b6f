//! Async HTTP client for the UniformPal REST backend.

use anyhow::Context;
use bytes::Bytes;
use reqwest::{
  Client, Response,
  multipart::{Form, Part},
};
use serde::Deserialize;
use uniformpal_core::{
  Error, Result,
  backend::UniformBackend,
  record::UniformRecord,
  submission::{CreateReceipt, NewUniform},
};

/// Connection settings for the backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the uniform catalog API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

/// Body of a non-2xx response.
#[derive(Deserialize)]
struct ErrorBody {
  #[serde(default)]
  message: Option<String>,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
    let client = Client::builder()
      .user_agent(concat!("uniformpal/", env!("CARGO_PKG_VERSION")))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  pub fn base_url(&self) -> &str { self.config.base_url.trim_end_matches('/') }

  fn url(&self, path: &str) -> String { join_url(self.base_url(), path) }

  fn multipart(new: &NewUniform) -> Result<Form> {
    let mut form = Form::new();
    for (name, value) in new.text_fields() {
      form = form.text(name, value);
    }
    for (name, image) in new.file_parts() {
      let part = Part::bytes(image.bytes.to_vec())
        .file_name(image.file_name.clone())
        .mime_str(&image.mime)
        .map_err(transport)?;
      form = form.part(name, part);
    }
    Ok(form)
  }
}

/// Resolve `path` against `base_url`. Absolute URLs are returned as-is and
/// exactly one `/` separates base and path.
pub fn join_url(base_url: &str, path: &str) -> String {
  if path.starts_with("http://") || path.starts_with("https://") {
    return path.to_string();
  }
  format!(
    "{}/{}",
    base_url.trim_end_matches('/'),
    path.trim_start_matches('/')
  )
}

fn transport(e: reqwest::Error) -> Error { Error::Transport(Box::new(e)) }

/// Turn a non-2xx response into [`Error::Rejected`], keeping the backend's
/// `message` when the body carries one.
async fn rejection(resp: Response) -> Error {
  let status = resp.status().as_u16();
  let message = match resp.bytes().await {
    Ok(body) => serde_json::from_slice::<ErrorBody>(&body)
      .ok()
      .and_then(|b| b.message)
      .filter(|m| !m.trim().is_empty()),
    Err(_) => None,
  };
  Error::Rejected { status, message }
}

impl UniformBackend for ApiClient {
  /// `GET /uniforms`
  async fn list_uniforms(&self) -> Result<Vec<UniformRecord>> {
    let resp = self
      .client
      .get(self.url("/uniforms"))
      .send()
      .await
      .map_err(transport)?;

    if !resp.status().is_success() {
      return Err(rejection(resp).await);
    }
    let body = resp.bytes().await.map_err(transport)?;
    serde_json::from_slice(&body).map_err(|e| Error::Decode(format!("uniform list: {e}")))
  }

  /// `POST /add-uniform` (multipart)
  async fn create_uniform(&self, new: NewUniform) -> Result<CreateReceipt> {
    let form = Self::multipart(&new)?;
    let resp = self
      .client
      .post(self.url("/add-uniform"))
      .multipart(form)
      .send()
      .await
      .map_err(transport)?;

    if !resp.status().is_success() {
      return Err(rejection(resp).await);
    }
    let body = resp.bytes().await.map_err(transport)?;
    Ok(serde_json::from_slice(&body).unwrap_or_default())
  }

  /// `DELETE /delete-uniform/{id}`
  async fn delete_uniform<'a>(&'a self, id: &'a str) -> Result<()> {
    let path = format!("/delete-uniform/{}", urlencoding::encode(id));
    let resp = self
      .client
      .delete(self.url(&path))
      .send()
      .await
      .map_err(transport)?;

    if !resp.status().is_success() {
      return Err(rejection(resp).await);
    }
    Ok(())
  }

  /// `GET {path}`
  async fn fetch_image<'a>(&'a self, path: &'a str) -> Result<Bytes> {
    let resp = self
      .client
      .get(self.url(path))
      .send()
      .await
      .map_err(transport)?;

    if !resp.status().is_success() {
      return Err(rejection(resp).await);
    }
    resp.bytes().await.map_err(transport)
  }
}
