//! Session controller: the single owner of a [`SessionState`].
//!
//! Every gateway call runs under the processing flag. Results are applied
//! only after the call resolves, so a failure leaves the state as it was
//! (author selection excepted, which rolls back to no author).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::state::{RefreshOutcome, SessionState, Verdict, should_auto_refresh};
use crate::config::limits;
use crate::error::{SessionError, SessionResult};
use crate::gateway::MetadataGateway;
use crate::models::{Author, AuthorSearchResponse, Paper};

/// Shared "a request is in flight" flag.
///
/// Cloned handles observe the same flag, so a UI can render a busy state or
/// hold the flag itself to keep the controller from starting new calls.
#[derive(Debug, Clone, Default)]
pub struct ProcessingFlag(Arc<AtomicBool>);

impl ProcessingFlag {
    /// Whether a call currently holds the flag.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Take the flag, or `None` if someone else holds it.
    #[must_use]
    pub fn try_acquire(&self) -> Option<ProcessingGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard(Arc::clone(&self.0)))
    }
}

/// Holds the processing flag; clears it on drop, including when the owning
/// future is dropped mid-call.
#[derive(Debug)]
pub struct ProcessingGuard(Arc<AtomicBool>);

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Result of the automatic refresh check after a decision.
#[derive(Debug)]
pub enum AutoRefresh {
    /// Counter and queue were fine; no call made.
    NotNeeded,
    /// A refresh ran and replaced the queue.
    Refreshed(RefreshOutcome),
    /// A refresh was due but failed; state is unchanged.
    Failed(SessionError),
}

/// What a decision did.
#[derive(Debug)]
pub struct SwipeOutcome {
    /// The paper decided on.
    pub paper: Paper,
    /// The verdict recorded.
    pub verdict: Verdict,
    /// Whether the liked/disliked set gained the paper.
    pub newly_added: bool,
    /// The follow-up refresh check.
    pub auto_refresh: AutoRefresh,
}

/// What selecting an author did.
#[derive(Debug)]
pub struct AuthorLoaded {
    /// Papers stored for the author.
    pub paper_count: usize,
    /// The first batch of recommendations; `NotNeeded` when the author has
    /// no papers to seed from.
    pub recommendations: AutoRefresh,
}

/// Drives one swipe session against a gateway.
#[derive(Debug)]
pub struct SessionController<G> {
    gateway: G,
    state: SessionState,
    processing: ProcessingFlag,
}

impl<G: MetadataGateway> SessionController<G> {
    /// Create a controller with an empty session.
    #[must_use]
    pub fn new(gateway: G) -> Self {
        Self { gateway, state: SessionState::new(), processing: ProcessingFlag::default() }
    }

    /// Read-only view of the session.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// The gateway this controller calls.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Handle on the processing flag.
    #[must_use]
    pub fn processing_flag(&self) -> ProcessingFlag {
        self.processing.clone()
    }

    /// Whether a gateway call is in flight.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing.is_set()
    }

    /// Search authors. Does not touch the session.
    pub async fn search_authors(&self, query: &str) -> SessionResult<AuthorSearchResponse> {
        let _guard = self.begin()?;
        Ok(self.gateway.search_authors(query, Some(limits::SEARCH_DEFAULT)).await?)
    }

    /// Select an author, load their papers and fetch a first batch of
    /// recommendations.
    ///
    /// If the papers cannot be loaded the session goes back to no author
    /// and the error is returned.
    pub async fn select_author(&mut self, author: Author) -> SessionResult<AuthorLoaded> {
        let guard = self.begin()?;
        let author_id = author.author_id.clone();
        tracing::info!(author_id = %author_id, name = %author.name, "Author selected");
        self.state.select_author(author);

        let response = match self
            .gateway
            .get_author_papers(&author_id, Some(limits::PAPERS_DEFAULT), &[])
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    author_id = %author_id,
                    error = %e,
                    "Loading papers failed, clearing selection"
                );
                self.state.reset();
                return Err(e.into());
            }
        };

        let paper_count = response.papers.len();
        self.state.set_author_papers(response.papers)?;
        drop(guard);

        let recommendations = if paper_count == 0 {
            tracing::info!(author_id = %author_id, "Author has no papers; waiting for likes");
            AutoRefresh::NotNeeded
        } else {
            match self.refresh().await {
                Ok(outcome) => AutoRefresh::Refreshed(outcome),
                Err(e) => AutoRefresh::Failed(e),
            }
        };

        Ok(AuthorLoaded { paper_count, recommendations })
    }

    /// Store papers for the selected author without fetching them.
    pub fn set_author_papers(&mut self, papers: Vec<Paper>) -> SessionResult<()> {
        self.state.set_author_papers(papers)
    }

    /// Fetch a new batch of recommendations and replace the queue.
    ///
    /// Fails with [`SessionError::EmptyBasis`] without calling the gateway
    /// when there is nothing to seed from.
    pub async fn refresh(&mut self) -> SessionResult<RefreshOutcome> {
        let _guard = self.begin()?;
        let basis = self.state.recommendation_basis()?;

        tracing::info!(
            positive = basis.positive_ids.len(),
            negative = basis.negative_ids.len(),
            "Refreshing recommendations"
        );
        let papers = self
            .gateway
            .get_recommendations(
                &basis.positive_ids,
                &basis.negative_ids,
                Some(limits::RECOMMENDATIONS_MAX),
                &[],
            )
            .await?;

        let outcome = self.state.apply_recommendations(papers);
        if outcome.is_depleted() {
            tracing::info!(received = outcome.received, "No new recommendations found");
        } else {
            tracing::info!(queued = outcome.queued, "Recommendations queued");
        }
        Ok(outcome)
    }

    /// Decide on the current paper.
    pub async fn swipe(&mut self, verdict: Verdict) -> SessionResult<SwipeOutcome> {
        let paper = self.state.current().cloned().ok_or(SessionError::EmptyQueue)?;
        self.record_decision(paper, verdict).await
    }

    /// Record a decision on any paper, then run the auto-refresh check.
    pub async fn record_decision(
        &mut self,
        paper: Paper,
        verdict: Verdict,
    ) -> SessionResult<SwipeOutcome> {
        if self.is_processing() {
            return Err(SessionError::Busy);
        }

        let newly_added = self.state.record_decision(paper.clone(), verdict);
        tracing::debug!(
            paper_id = %paper.paper_id,
            %verdict,
            newly_added,
            swipe_count = self.state.swipe_count(),
            "Decision recorded"
        );

        let auto_refresh =
            if should_auto_refresh(self.state.swipe_count(), self.state.queue().len()) {
                tracing::info!(
                    swipe_count = self.state.swipe_count(),
                    queue = self.state.queue().len(),
                    "Auto-refreshing recommendations"
                );
                match self.refresh().await {
                    Ok(outcome) => AutoRefresh::Refreshed(outcome),
                    Err(e) => {
                        tracing::warn!(error = %e, "Auto-refresh failed");
                        AutoRefresh::Failed(e)
                    }
                }
            } else {
                AutoRefresh::NotNeeded
            };

        Ok(SwipeOutcome { paper, verdict, newly_added, auto_refresh })
    }

    /// Remove a paper from the liked set.
    pub fn remove_liked(&mut self, paper_id: &str) -> bool {
        self.state.remove_liked(paper_id)
    }

    /// Start over.
    pub fn reset(&mut self) {
        tracing::info!("Session reset");
        self.state.reset();
    }

    fn begin(&self) -> SessionResult<ProcessingGuard> {
        self.processing.try_acquire().ok_or(SessionError::Busy)
    }
}
