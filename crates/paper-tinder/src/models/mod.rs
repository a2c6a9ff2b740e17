//! Data models for Semantic Scholar entities and gateway envelopes.
//!
//! API-facing models use `#[serde(default)]` for optional fields and
//! camelCase renames to match API naming.

mod author;
mod inputs;
mod paper;

pub use author::{Author, AuthorRef, RawAuthor, RawAuthorSearch};
pub use inputs::*;
pub use paper::{OpenAccessPdf, Paper, PublicationVenue};
