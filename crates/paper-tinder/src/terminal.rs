//! Interactive swipe session over a line-based terminal.
//!
//! Reads one command per line and writes Markdown back. Generic over the
//! reader and writer so the loop can be driven from tests.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::formatters;
use crate::gateway::MetadataGateway;
use crate::models::Author;
use crate::session::{AutoRefresh, Phase, SessionController, Verdict};

const HELP: &str = "\
Commands:
  l / like        like the current paper
  d / dislike     skip the current paper
  r / refresh     fetch new recommendations
  s / liked       show liked papers
  u N             remove liked paper N
  x / export      print liked and disliked papers as JSON
  n / new         start over with a new author
  ? / help        show this help
  q / quit        exit
Before an author is selected, type a name to search and a number to pick;
only q and ? are commands then.";

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search authors by name.
    Search(String),
    /// Pick an author from the last search, 1-based.
    Pick(usize),
    /// Decide on the current paper.
    Decide(Verdict),
    /// Fetch new recommendations.
    Refresh,
    /// List liked papers.
    ShowLiked,
    /// Remove liked paper N, 1-based.
    RemoveLiked(usize),
    /// Dump decisions as JSON.
    Export,
    /// Start over.
    Reset,
    /// Print help.
    Help,
    /// Leave.
    Quit,
    /// Nothing to do.
    Empty,
    /// Unrecognized input.
    Unknown(String),
}

/// Parse a line.
///
/// While no author is selected only `q`, `quit` and `?` are commands; a
/// number picks from the last search and anything else is a name to search.
#[must_use]
pub fn parse_command(line: &str, phase: Phase) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }

    let lower = line.to_lowercase();
    if phase == Phase::NoAuthor {
        return match lower.as_str() {
            "q" | "quit" => Command::Quit,
            "?" => Command::Help,
            _ => line.parse().map_or_else(|_| Command::Search(line.to_string()), Command::Pick),
        };
    }

    let mut parts = lower.split_whitespace();
    let head = parts.next().unwrap_or_default();
    let arg = parts.next();

    match (head, arg) {
        ("q" | "quit" | "exit", None) => Command::Quit,
        ("?" | "h" | "help", None) => Command::Help,
        ("n" | "new", None) => Command::Reset,
        ("s" | "liked", None) => Command::ShowLiked,
        ("x" | "export", None) => Command::Export,
        ("u" | "unlike", Some(n)) => {
            n.parse().map_or_else(|_| Command::Unknown(line.to_string()), Command::RemoveLiked)
        }
        ("l" | "like" | "y", None) => Command::Decide(Verdict::Like),
        ("d" | "dislike" | "skip", None) => Command::Decide(Verdict::Dislike),
        ("r" | "refresh", None) => Command::Refresh,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Run the interactive loop until `quit` or end of input.
///
/// `initial_query` runs as a search before the first prompt.
pub async fn run_terminal<G, R, W>(
    controller: &mut SessionController<G>,
    initial_query: Option<String>,
    mut reader: R,
    mut writer: W,
) -> anyhow::Result<()>
where
    G: MetadataGateway,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut candidates: Vec<Author> = Vec::new();
    let mut line = String::new();

    emit(&mut writer, "Paper Tinder - type an author name to begin, ? for help.").await?;

    if let Some(query) = initial_query.filter(|q| !q.trim().is_empty()) {
        let out = handle(controller, Command::Search(query), &mut candidates).await;
        emit(&mut writer, &out).await?;
    }

    loop {
        writer.write_all(b"> ").await?;
        writer.flush().await?;

        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            tracing::info!("Input closed, ending session");
            break;
        }

        let command = parse_command(&line, controller.state().phase());
        if command == Command::Quit {
            break;
        }

        let out = handle(controller, command, &mut candidates).await;
        if !out.is_empty() {
            emit(&mut writer, &out).await?;
        }
    }

    emit(&mut writer, "Bye.").await?;
    Ok(())
}

async fn handle<G: MetadataGateway>(
    controller: &mut SessionController<G>,
    command: Command,
    candidates: &mut Vec<Author>,
) -> String {
    match command {
        Command::Empty | Command::Quit => String::new(),
        Command::Help => HELP.to_string(),
        Command::Unknown(input) => format!("Unknown command: {input}. Type ? for help."),
        Command::Search(query) => match controller.search_authors(&query).await {
            Ok(result) => {
                *candidates = result.authors;
                let mut out = formatters::format_authors_markdown(candidates);
                if let Some(total) = result.total.filter(|t| *t > candidates.len() as i64) {
                    out.push_str(&format!("\nShowing {} of {total} matches.", candidates.len()));
                }
                if !candidates.is_empty() {
                    out.push_str("\nPick an author by number.");
                }
                out
            }
            Err(e) => format!("Search failed: {}", e.to_user_message()),
        },
        Command::Pick(n) => {
            let Some(author) = n.checked_sub(1).and_then(|i| candidates.get(i)).cloned() else {
                return format!("No author #{n}; search first or pick from the list.");
            };
            let name = author.name_or_default().to_string();
            match controller.select_author(author).await {
                Ok(loaded) => {
                    let mut out = format!("Loaded {} papers by {name}.\n", loaded.paper_count);
                    match loaded.recommendations {
                        AutoRefresh::NotNeeded => out.push_str(
                            "No papers to base recommendations on yet.\n",
                        ),
                        AutoRefresh::Refreshed(_) => {}
                        AutoRefresh::Failed(e) => out.push_str(&format!(
                            "Recommendation error: {}\n",
                            e.to_user_message()
                        )),
                    }
                    out.push_str(&current_view(controller));
                    out
                }
                Err(e) => format!("Failed to load papers: {}", e.to_user_message()),
            }
        }
        Command::Decide(verdict) => match controller.swipe(verdict).await {
            Ok(outcome) => {
                let mut out = match verdict {
                    Verdict::Like => "Paper added to your liked list.\n".to_string(),
                    Verdict::Dislike => "Paper skipped.\n".to_string(),
                };
                if let AutoRefresh::Failed(e) = outcome.auto_refresh {
                    out.push_str(&format!(
                        "Failed to refresh recommendations: {}\n",
                        e.to_user_message()
                    ));
                }
                out.push_str(&current_view(controller));
                out
            }
            Err(e) => e.to_user_message(),
        },
        Command::Refresh => match controller.refresh().await {
            Ok(_) => current_view(controller),
            Err(e) => format!("Failed to refresh recommendations: {}", e.to_user_message()),
        },
        Command::ShowLiked => formatters::format_liked_markdown(controller.state().liked()),
        Command::RemoveLiked(n) => {
            let id = n
                .checked_sub(1)
                .and_then(|i| controller.state().liked().get(i))
                .map(|p| p.paper_id.clone());
            let removed = id.is_some_and(|id| controller.remove_liked(&id));
            if removed {
                format!("Removed liked paper #{n}.")
            } else {
                format!("No liked paper #{n}.")
            }
        }
        Command::Export => {
            let export = formatters::export_decisions(controller.state());
            serde_json::to_string_pretty(&export).unwrap_or_else(|e| format!("Export failed: {e}"))
        }
        Command::Reset => {
            controller.reset();
            candidates.clear();
            "Starting over. Type an author name to search.".to_string()
        }
    }
}

fn current_view<G: MetadataGateway>(controller: &SessionController<G>) -> String {
    let state = controller.state();
    let body = match state.current() {
        Some(paper) => formatters::format_paper_card(paper),
        None if state.is_depleted() => {
            "No new recommendations found. Like more papers or type r to try again.\n".to_string()
        }
        None => "No recommendations yet. Type r to fetch some.\n".to_string(),
    };
    format!("{body}\n{}", formatters::format_status(state))
}

async fn emit<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> std::io::Result<()> {
    writer.write_all(text.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}
