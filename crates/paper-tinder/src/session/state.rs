//! Recommendation session state.
//!
//! Pure, synchronous state transitions. Network calls live in the
//! controller; this type only ever sees their results.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};
use crate::models::{Author, Paper};

/// Number of most recent author papers used as positive examples.
pub const RECENT_AUTHOR_PAPERS: usize = 5;

/// Decisions between automatic refreshes.
pub const AUTO_REFRESH_THRESHOLD: u32 = 5;

/// Queue length at or below which a refresh is triggered proactively.
pub const LOW_QUEUE_MARK: usize = 2;

/// A user's decision on a paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Swipe right.
    Like,
    /// Swipe left.
    Dislike,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Like => write!(f, "like"),
            Self::Dislike => write!(f, "dislike"),
        }
    }
}

/// Coarse lifecycle phase, derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing selected.
    NoAuthor,
    /// Author chosen, papers not yet stored.
    LoadingPapers,
    /// Papers stored; the queue may be empty or populated.
    Ready,
}

/// Example sets sent with a recommendation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationBasis {
    /// Recent author papers followed by liked papers, without duplicates.
    pub positive_ids: Vec<String>,
    /// Disliked papers.
    pub negative_ids: Vec<String>,
}

/// What a completed refresh did to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Papers the gateway returned.
    pub received: usize,
    /// Papers left after removing already-decided ones.
    pub queued: usize,
}

impl RefreshOutcome {
    /// True when nothing new came back.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.queued == 0
    }
}

/// Auto-refresh policy: refresh after enough decisions or when the queue
/// is about to run dry.
#[must_use]
pub const fn should_auto_refresh(swipe_count: u32, queue_len: usize) -> bool {
    swipe_count >= AUTO_REFRESH_THRESHOLD || queue_len <= LOW_QUEUE_MARK
}

/// The `n` most recent papers, newest first.
///
/// A missing year counts as 0. The sort is stable, so papers from the same
/// year keep their original order.
#[must_use]
pub fn most_recent(papers: &[Paper], n: usize) -> Vec<&Paper> {
    let mut sorted: Vec<&Paper> = papers.iter().collect();
    sorted.sort_by_key(|p| std::cmp::Reverse(p.year_or_zero()));
    sorted.truncate(n);
    sorted
}

/// Everything one swipe session knows.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    author: Option<Author>,
    author_papers: Option<Vec<Paper>>,
    queue: VecDeque<Paper>,
    liked: Vec<Paper>,
    disliked: Vec<Paper>,
    swipe_count: u32,
    has_refreshed: bool,
}

impl SessionState {
    /// An empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        match (&self.author, &self.author_papers) {
            (None, _) => Phase::NoAuthor,
            (Some(_), None) => Phase::LoadingPapers,
            (Some(_), Some(_)) => Phase::Ready,
        }
    }

    /// Selected author, if any.
    #[must_use]
    pub const fn author(&self) -> Option<&Author> {
        self.author.as_ref()
    }

    /// The selected author's papers (empty until loaded).
    #[must_use]
    pub fn author_papers(&self) -> &[Paper] {
        self.author_papers.as_deref().unwrap_or(&[])
    }

    /// Papers waiting to be decided on, head first.
    #[must_use]
    pub const fn queue(&self) -> &VecDeque<Paper> {
        &self.queue
    }

    /// The paper being shown: the head of the queue.
    #[must_use]
    pub fn current(&self) -> Option<&Paper> {
        self.queue.front()
    }

    /// Liked papers in the order they were liked.
    #[must_use]
    pub fn liked(&self) -> &[Paper] {
        &self.liked
    }

    /// Disliked papers in the order they were disliked.
    #[must_use]
    pub fn disliked(&self) -> &[Paper] {
        &self.disliked
    }

    /// Decisions since the last successful refresh.
    #[must_use]
    pub const fn swipe_count(&self) -> u32 {
        self.swipe_count
    }

    /// Decisions left before the counter triggers a refresh.
    #[must_use]
    pub const fn swipes_until_refresh(&self) -> u32 {
        AUTO_REFRESH_THRESHOLD.saturating_sub(self.swipe_count)
    }

    /// True once a refresh has completed and left nothing to show.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.has_refreshed && self.queue.is_empty()
    }

    /// Whether a paper ID is in the liked or disliked set.
    #[must_use]
    pub fn is_decided(&self, paper_id: &str) -> bool {
        contains(&self.liked, paper_id) || contains(&self.disliked, paper_id)
    }

    /// Start over with a new author. Clears everything else.
    pub fn select_author(&mut self, author: Author) {
        *self = Self { author: Some(author), ..Self::default() };
    }

    /// Store the selected author's papers. Does not touch the queue.
    pub fn set_author_papers(&mut self, papers: Vec<Paper>) -> SessionResult<()> {
        if self.author.is_none() {
            return Err(SessionError::NoAuthor);
        }
        self.author_papers = Some(papers);
        Ok(())
    }

    /// Build the example sets for a refresh.
    ///
    /// Fails with [`SessionError::EmptyBasis`] when there are neither author
    /// papers nor liked papers.
    pub fn recommendation_basis(&self) -> SessionResult<RecommendationBasis> {
        let author_papers = self.author_papers();
        if author_papers.is_empty() && self.liked.is_empty() {
            return Err(SessionError::EmptyBasis);
        }

        let mut positive_ids: Vec<String> = Vec::new();
        let recent = most_recent(author_papers, RECENT_AUTHOR_PAPERS);
        for paper in recent.into_iter().chain(self.liked.iter()) {
            if !positive_ids.contains(&paper.paper_id) {
                positive_ids.push(paper.paper_id.clone());
            }
        }
        let negative_ids = self.disliked.iter().map(|p| p.paper_id.clone()).collect();

        Ok(RecommendationBasis { positive_ids, negative_ids })
    }

    /// Replace the queue with a refresh result, minus anything already
    /// decided, and reset the swipe counter.
    pub fn apply_recommendations(&mut self, papers: Vec<Paper>) -> RefreshOutcome {
        let received = papers.len();
        let mut queue: VecDeque<Paper> = VecDeque::with_capacity(received);
        for paper in papers {
            let queued = queue.iter().any(|p| p.paper_id == paper.paper_id);
            if queued || self.is_decided(&paper.paper_id) {
                continue;
            }
            queue.push_back(paper);
        }

        self.queue = queue;
        self.swipe_count = 0;
        self.has_refreshed = true;

        RefreshOutcome { received, queued: self.queue.len() }
    }

    /// Record a like or dislike.
    ///
    /// Adds the paper to the verdict's set unless already there, moving it
    /// out of the opposite set. Always counts as one swipe and drops the
    /// paper from the queue. Returns whether the set gained the paper.
    pub fn record_decision(&mut self, paper: Paper, verdict: Verdict) -> bool {
        let (target, opposite) = match verdict {
            Verdict::Like => (&mut self.liked, &mut self.disliked),
            Verdict::Dislike => (&mut self.disliked, &mut self.liked),
        };

        opposite.retain(|p| p.paper_id != paper.paper_id);
        self.queue.retain(|p| p.paper_id != paper.paper_id);
        self.swipe_count += 1;

        if contains(target, &paper.paper_id) {
            return false;
        }
        target.push(paper);
        true
    }

    /// Drop a paper from the liked set. Returns whether it was there.
    pub fn remove_liked(&mut self, paper_id: &str) -> bool {
        let before = self.liked.len();
        self.liked.retain(|p| p.paper_id != paper_id);
        self.liked.len() != before
    }

    /// Back to an empty session.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn contains(papers: &[Paper], paper_id: &str) -> bool {
    papers.iter().any(|p| p.paper_id == paper_id)
}
