//! Paper Tinder
//!
//! Swipe through paper recommendations seeded by an author's recent work.
//! Search for an author, load their papers from the Semantic Scholar Graph
//! API, then like or dislike one recommended paper at a time while the queue
//! refills itself from your decisions.
//!
//! # Features
//!
//! - **Metadata gateway**: author search, author papers and recommendations
//!   behind one API key, with default field lists and normalized responses
//! - **HTTP routes**: `/search`, `/papers`, `/recommendations` for browser clients
//! - **Session state machine**: queue, likes, dislikes and auto refresh
//! - **Cached**: 60-second TTL cache for search and paper listings
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use paper_tinder::{Config, ScholarGateway, SemanticScholarClient, SessionController};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = SemanticScholarClient::new(config)?;
//!     let mut session = SessionController::new(ScholarGateway::new(Arc::new(client)));
//!
//!     let found = session.search_authors("Jane Doe").await?;
//!     if let Some(author) = found.authors.into_iter().next() {
//!         session.select_author(author).await?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod formatters;
pub mod gateway;
pub mod models;
pub mod server;
pub mod session;
pub mod terminal;

pub use client::SemanticScholarClient;
pub use config::Config;
pub use error::{ClientError, GatewayError, SessionError};
pub use gateway::{MetadataGateway, ScholarGateway};
pub use session::{SessionController, SessionState, Verdict};
