#![no_main]

use libfuzzer_sys::fuzz_target;
use paper_tinder::gateway::normalize_papers;

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(data) {
        let response = normalize_papers(json);
        assert!(response.papers.iter().all(|p| !p.paper_id.is_empty()));
    }
});
