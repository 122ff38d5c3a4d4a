#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{
    ClassifyConfig, PairConfig, ScanConfig, classify_brackets, pair_elements, scan_brackets,
};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let mut events = scan_brackets(input, &ScanConfig::default());
    classify_brackets(input, &mut events, &ClassifyConfig::default());
    let (elements, _) = pair_elements(input, &events, &PairConfig::default());
    // Structural invariants must hold for arbitrary input.
    assert!(events.windows(2).all(|w| w[0].position < w[1].position));
    assert!(elements.iter().all(|e| e.pos_open() < e.pos_close()));
    assert!(
        elements
            .windows(2)
            .all(|w| w[0].pos_open() < w[1].pos_open())
    );
});
