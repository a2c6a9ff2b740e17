//! Output formatters for the terminal session: Markdown cards and JSON export.

mod json;
mod markdown;

pub use self::json::*;
pub use markdown::*;
