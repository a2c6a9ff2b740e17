#![no_main]

use libfuzzer_sys::fuzz_target;
use paper_tinder::models::{Paper, RawAuthorSearch};

fuzz_target!(|data: &[u8]| {
    // Should never panic, only return Ok or Err
    let _ = serde_json::from_slice::<Paper>(data);
    let _ = serde_json::from_slice::<RawAuthorSearch>(data);
});
