//! Shared corpus and assertion helpers for integration tests.
//!
//! Not a public stable surface; intended for in-workspace tests only.

use maskup::{PipelineConfig, PipelineResult, tokenize_and_template};

/// Behaviors a corpus document is expected to exhibit.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Invariant {
    RoundTripExact,
    HasCommentElement,
    HasAnchorValues,
    HasImageValues,
    HasBetweenRecords,
    HasOrphanBrackets,
}

impl Invariant {
    pub const fn label(self) -> &'static str {
        match self {
            Self::RoundTripExact => "round trip exact",
            Self::HasCommentElement => "has comment element",
            Self::HasAnchorValues => "has anchor values",
            Self::HasImageValues => "has image values",
            Self::HasBetweenRecords => "has between records",
            Self::HasOrphanBrackets => "has orphan brackets",
        }
    }

    pub fn holds(self, result: &PipelineResult) -> bool {
        match self {
            Self::RoundTripExact => result.reconstruction.is_match(),
            Self::HasCommentElement => result.elements.iter().any(|e| e.is_comment()),
            Self::HasAnchorValues => result
                .content_items
                .iter()
                .any(|i| i.element_type == "a" && i.attribute_name == "href"),
            Self::HasImageValues => result
                .content_items
                .iter()
                .any(|i| i.element_type == "img"),
            Self::HasBetweenRecords => result.content_records.iter().any(|r| r.is_between()),
            Self::HasOrphanBrackets => {
                let validation = &result.validation;
                !validation.sequence.bracket.orphan_opens.is_empty()
                    || !validation.sequence.bracket.orphan_closes.is_empty()
                    || !validation.classify.orphan_opens.is_empty()
                    || !validation.classify.orphan_closes.is_empty()
                    || !validation.pair.unterminated_opens.is_empty()
                    || !validation.pair.unmatched_closes.is_empty()
            }
        }
    }
}

impl std::fmt::Display for Invariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CorpusCase {
    pub label: &'static str,
    pub input: &'static str,
    pub invariants: &'static [Invariant],
}

use Invariant::*;

/// Fixed document corpus exercising the structural and templating paths.
pub const CORPUS: &[CorpusCase] = &[
    CorpusCase {
        label: "minimal page",
        input: "<html><body><p>hello</p></body></html>",
        invariants: &[RoundTripExact, HasBetweenRecords],
    },
    CorpusCase {
        label: "anchor with title",
        input: "<a href=\"/docs\" title=\"Docs\">read</a>",
        invariants: &[RoundTripExact, HasAnchorValues, HasBetweenRecords],
    },
    CorpusCase {
        label: "image with srcset",
        input: "<img src=\"hero.jpg\" alt=\"Hero\" srcset=\"hero.jpg 1x, hero@2x.jpg 2x\" sizes=\"100vw\">",
        invariants: &[RoundTripExact, HasImageValues],
    },
    CorpusCase {
        label: "meta description",
        input: "<head><meta name=\"description\" content=\"profile of a user\" rel=\"x\"></head>",
        invariants: &[RoundTripExact],
    },
    CorpusCase {
        label: "comment between paragraphs",
        input: "<p>a</p><!-- internal note --><p>b</p>",
        invariants: &[RoundTripExact, HasCommentElement, HasBetweenRecords],
    },
    CorpusCase {
        label: "pseudo nested comment",
        input: "<!-- a <!-- b --> c -->",
        invariants: &[RoundTripExact, HasCommentElement, HasOrphanBrackets],
    },
    CorpusCase {
        label: "multibyte text and attributes",
        input: "caf\u{e9} <a href=\"/caf\u{e9}\" title=\"\u{65e5}\u{672c}\u{8a9e}\">\u{1f600}</a> fin",
        invariants: &[RoundTripExact, HasAnchorValues, HasBetweenRecords],
    },
    CorpusCase {
        label: "unterminated tag",
        input: "<p>text <a href=\"x",
        invariants: &[RoundTripExact, HasOrphanBrackets, HasBetweenRecords],
    },
    CorpusCase {
        label: "script body left alone",
        input: "<script src=\"app.js\">var x = 1 < 2;</script>",
        invariants: &[RoundTripExact, HasOrphanBrackets],
    },
    CorpusCase {
        label: "stray close and custom tag",
        input: "x > y <my-widget data-src=\"z\">w</my-widget>",
        invariants: &[RoundTripExact, HasOrphanBrackets, HasBetweenRecords],
    },
];

/// Run the pipeline with default configuration.
pub fn run_default(input: &str) -> PipelineResult {
    tokenize_and_template(1, input, &PipelineConfig::default())
        .expect("pipeline must not fail on corpus input")
}

/// Assert the full round trip for one document, with a readable diff.
pub fn assert_round_trip(label: &str, input: &str) {
    let result = run_default(input);
    assert!(
        result.reconstruction.is_match(),
        "{label}: reconstruction diverged: {:?}\n{}",
        result.reconstruction,
        divergence_context(input.as_bytes(), &maskup::reconstruct_document(
            &result.templated_document,
            &result.mapping,
        )),
    );
}

/// Byte offset of the first divergence, if any.
pub fn first_divergence(expected: &[u8], actual: &[u8]) -> Option<usize> {
    let shared = expected
        .iter()
        .zip(actual.iter())
        .position(|(a, b)| a != b);
    shared.or_else(|| {
        (expected.len() != actual.len()).then(|| expected.len().min(actual.len()))
    })
}

/// Human-readable context around the first divergence.
pub fn divergence_context(expected: &[u8], actual: &[u8]) -> String {
    let Some(offset) = first_divergence(expected, actual) else {
        return "buffers are identical".to_string();
    };
    let start = offset.saturating_sub(20);
    let window = |bytes: &[u8]| -> String {
        let end = (offset + 20).min(bytes.len());
        String::from_utf8_lossy(&bytes[start.min(bytes.len())..end]).into_owned()
    };
    format!(
        "first divergence at byte {offset}:\n expected ...{:?}...\n actual   ...{:?}...",
        window(expected),
        window(actual)
    )
}
