//! Recommendation session: queue, likes, dislikes and the refresh policy.

mod controller;
mod state;

pub use controller::{
    AuthorLoaded, AutoRefresh, ProcessingFlag, ProcessingGuard, SessionController, SwipeOutcome,
};
pub use state::{
    AUTO_REFRESH_THRESHOLD, LOW_QUEUE_MARK, Phase, RECENT_AUTHOR_PAPERS, RecommendationBasis,
    RefreshOutcome, SessionState, Verdict, most_recent, should_auto_refresh,
};
