//! The surfaces: plain state machines that turn input into [`Command`]s and
//! fold [`Outcome`]s back in.
//!
//! [`Command`]: crate::command::Command
//! [`Outcome`]: crate::command::Outcome

pub mod catalog;
pub mod detail;
pub mod form;
pub mod search;

pub use catalog::CatalogView;
pub use detail::{DetailOverlay, Owner};
pub use form::CreateForm;
pub use search::SearchSurface;
