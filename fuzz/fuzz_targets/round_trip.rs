#![no_main]

use libfuzzer_sys::fuzz_target;
use maskup::{PipelineConfig, reconstruct_document, tokenize_and_template};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let config = PipelineConfig::default();
    let result = match tokenize_and_template(0, input, &config) {
        Ok(result) => result,
        Err(_) => return,
    };
    assert!(
        result.reconstruction.is_match(),
        "reconstruction diverged for {input:?}: {:?}",
        result.reconstruction
    );
    let restored = reconstruct_document(&result.templated_document, &result.mapping);
    assert_eq!(restored, input.as_bytes());
});
