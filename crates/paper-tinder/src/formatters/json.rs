//! Compact JSON output for exporting a session's decisions.

use serde_json::{Value, json};

use crate::models::Paper;
use crate::session::SessionState;

/// Create a compact paper representation for JSON output.
#[must_use]
pub fn compact_paper(paper: &Paper) -> Value {
    let mut obj = json!({
        "id": paper.paper_id,
        "title": paper.title_or_default(),
        "year": paper.year,
        "citations": paper.citations(),
        "url": paper.link(),
    });

    if !paper.authors.is_empty() {
        obj["authors"] =
            json!(paper.authors.iter().filter_map(|a| a.name.as_ref()).collect::<Vec<_>>());
    }

    if let Some(venue) = paper.venue_name() {
        obj["venue"] = json!(venue);
    }

    if let Some(doi) = paper.doi() {
        obj["doi"] = json!(doi);
    }

    if let Some(pdf) = paper.pdf_url() {
        obj["pdf"] = json!(pdf);
    }

    obj
}

/// Liked and disliked papers for the selected author.
#[must_use]
pub fn export_decisions(state: &SessionState) -> Value {
    json!({
        "author": state.author().map(|a| json!({"id": a.author_id, "name": a.name})),
        "liked": state.liked().iter().map(compact_paper).collect::<Vec<_>>(),
        "disliked": state.disliked().iter().map(compact_paper).collect::<Vec<_>>(),
    })
}
