//! Markdown output for the terminal session.

use std::borrow::Cow;

use crate::models::{Author, Paper};
use crate::session::SessionState;

/// Abstract length shown on a card, in characters.
const ABSTRACT_PREVIEW: usize = 400;

/// Format a paper as a swipe card.
#[must_use]
pub fn format_paper_card(paper: &Paper) -> String {
    let mut output = String::new();

    output.push_str(&format!("## {}\n\n", paper.title_or_default()));

    if !paper.authors.is_empty() {
        output.push_str(&format!(
            "**Authors** ({}): {}\n\n",
            paper.authors.len(),
            paper.author_names()
        ));
    }

    // Year, venue and citation metrics
    let mut meta = Vec::new();
    if let Some(year) = paper.year {
        meta.push(format!("**Year**: {year}"));
    }
    if let Some(venue) = paper.venue_name() {
        meta.push(format!("**Venue**: {venue}"));
    }
    meta.push(format!("**Citations**: {}", paper.citations()));
    if let Some(influential) = paper.influential_citation_count {
        meta.push(format!("**Influential**: {influential}"));
    }
    if let Some(refs) = paper.reference_count {
        meta.push(format!("**References**: {refs}"));
    }
    output.push_str(&format!("{}\n\n", meta.join(" | ")));

    if let Some(fields) = &paper.fields_of_study {
        if !fields.is_empty() {
            output.push_str(&format!("**Fields**: {}\n\n", fields.join(", ")));
        }
    }

    if let Some(abs) = &paper.r#abstract {
        output.push_str(&format!("{}\n\n", truncate_chars(abs, ABSTRACT_PREVIEW)));
    }

    output.push_str(&format!("**Links**: {}\n", format_links(paper)));

    output
}

/// Paper page, DOI and open access links joined with `|`.
#[must_use]
pub fn format_links(paper: &Paper) -> String {
    let mut links = vec![format!("[S2]({})", paper.link())];
    if let Some(doi) = paper.doi() {
        links.push(format!("[DOI](https://doi.org/{doi})"));
    }
    if let Some(arxiv) = paper.arxiv_id() {
        links.push(format!("[arXiv](https://arxiv.org/abs/{arxiv})"));
    }
    if let Some(pdf) = paper.pdf_url() {
        links.push(format!("[PDF]({pdf})"));
    } else if paper.is_open_access == Some(true) {
        links.push("Open Access".to_string());
    }
    links.join(" | ")
}

/// Format author search results as a numbered list.
#[must_use]
pub fn format_authors_markdown(authors: &[Author]) -> String {
    if authors.is_empty() {
        return "No authors found.".to_string();
    }

    let mut output = format!("# Authors ({} results)\n\n", authors.len());

    for (i, author) in authors.iter().enumerate() {
        output.push_str(&format!("{}. **{}**", i + 1, author.name_or_default()));
        if let Some(affiliation) = author.primary_affiliation() {
            output.push_str(&format!(" ({affiliation})"));
        }
        output.push_str(&format!(
            "\n   h-index {} | {} citations | {} papers | {}\n",
            author.h_index, author.citation_count, author.paper_count, author.url
        ));
    }

    output
}

/// Format the liked list, numbered from 1.
#[must_use]
pub fn format_liked_markdown(liked: &[Paper]) -> String {
    if liked.is_empty() {
        return "You haven't liked any papers yet.".to_string();
    }

    let mut output = format!("# Liked papers ({})\n\n", liked.len());
    for (i, paper) in liked.iter().enumerate() {
        output.push_str(&format!("{}. {}", i + 1, paper.title_or_default()));
        if let Some(year) = paper.year {
            output.push_str(&format!(" ({year})"));
        }
        output.push_str(&format!("\n   {}\n", paper.link()));
    }
    output
}

/// One-line session summary.
#[must_use]
pub fn format_status(state: &SessionState) -> String {
    let author = state.author().map_or("no author", |a| a.name_or_default());
    format!(
        "{author} | {} in queue | {} liked | {} disliked | auto-refresh in {} swipes",
        state.queue().len(),
        state.liked().len(),
        state.disliked().len(),
        state.swipes_until_refresh()
    )
}

fn truncate_chars(text: &str, max: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}
