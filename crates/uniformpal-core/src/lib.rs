//! Core types and the backend seam for the UniformPal catalog client.
//!
//! This crate is free of HTTP and terminal dependencies. The CLI crate
//! supplies a reqwest-backed [`backend::UniformBackend`] and the surfaces
//! that use it.

// Native `async fn` in traits; the futures carry explicit `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod backend;
pub mod catalog;
pub mod error;
pub mod record;
pub mod submission;

pub use error::{Error, Result};
