//! Fuzzing library for paper-tinder.
//!
//! Targets cover everything that decodes untrusted JSON: upstream paper
//! payloads and the `/recommendations` request body.
//!
//! # Usage
//!
//! ```bash
//! cd crates/paper-tinder-fuzz
//! cargo +nightly fuzz run fuzz_normalize -- -max_total_time=60
//! ```

pub use paper_tinder::gateway::normalize_papers;
pub use paper_tinder::models;
