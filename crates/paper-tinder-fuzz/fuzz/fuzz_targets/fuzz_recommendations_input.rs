#![no_main]

use libfuzzer_sys::fuzz_target;
use paper_tinder::models::RecommendationsInput;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = serde_json::from_slice::<RecommendationsInput>(data) {
        if let Some(fields) = input.fields {
            assert!(fields.to_vec().iter().all(|f| !f.is_empty() && f.trim() == f));
        }
    }
});
