//! End-to-end round-trip coverage over the shared corpus.

use markup_test_support::{CORPUS, assert_round_trip, run_default};
use maskup::{PipelineConfig, reconstruct_document, tokenize_and_template};

#[test]
fn corpus_invariants_hold() {
    for case in CORPUS {
        let result = run_default(case.input);
        for invariant in case.invariants {
            assert!(
                invariant.holds(&result),
                "{}: expected `{invariant}`, got: {result:#?}",
                case.label
            );
        }
    }
}

#[test]
fn corpus_round_trips_byte_for_byte() {
    for case in CORPUS {
        assert_round_trip(case.label, case.input);
    }
}

#[test]
fn reconstruction_restores_the_exact_input_bytes() {
    for case in CORPUS {
        let result = run_default(case.input);
        let restored = reconstruct_document(&result.templated_document, &result.mapping);
        assert_eq!(
            restored,
            case.input.as_bytes(),
            "{}: restored bytes differ",
            case.label
        );
    }
}

#[test]
fn template_substitution_reverses_for_anchor_example() {
    let input = "<a href=\"#x\" title=\"Go\">";
    let result = run_default(input);
    let href = result
        .content_items
        .iter()
        .find(|i| i.attribute_name == "href")
        .expect("href item");
    let title = result
        .content_items
        .iter()
        .find(|i| i.attribute_name == "title")
        .expect("title item");
    assert_eq!(
        result.templates[0].template_body,
        format!("<a href=\"{}\" title=\"{}\">", href.uuid, title.uuid)
    );
    assert_round_trip("anchor example", input);
}

#[test]
fn attribute_extraction_examples() {
    let result = run_default("<img src=\"a.jpg\" alt=\"Logo\">");
    let items: Vec<(&str, &str, &str)> = result
        .content_items
        .iter()
        .map(|i| {
            (
                i.element_type.as_str(),
                i.attribute_name.as_str(),
                i.value.as_str(),
            )
        })
        .collect();
    assert_eq!(
        items,
        vec![("img", "src", "a.jpg"), ("img", "alt", "Logo")]
    );

    let result = run_default("<a href=\"#x\">");
    let items: Vec<(&str, &str, &str)> = result
        .content_items
        .iter()
        .map(|i| {
            (
                i.element_type.as_str(),
                i.attribute_name.as_str(),
                i.value.as_str(),
            )
        })
        .collect();
    assert_eq!(items, vec![("a", "href", "#x")]);
}

#[test]
fn srcset_with_repeated_descriptors_round_trips() {
    // Two URLs sharing a descriptor used to collapse under value-based
    // replacement; span-targeted substitution keeps them apart.
    assert_round_trip(
        "srcset duplicate descriptors",
        "<img srcset=\"a.png 2x, b.png 2x\" alt=\"2x, 2x\">",
    );
}

#[test]
fn repeated_identical_values_round_trip() {
    assert_round_trip(
        "same value in two attributes",
        "<img src=\"logo.png\" alt=\"logo.png\"> <a href=\"logo.png\" title=\"logo.png\">x</a>",
    );
}

#[test]
fn pseudo_nested_comment_matches_exactly_one_pair() {
    let result = run_default("<!-- a <!-- b --> c -->");
    let comments: Vec<_> = result.elements.iter().filter(|e| e.is_comment()).collect();
    assert_eq!(comments.len(), 1, "got: {:?}", result.elements);
    assert_eq!(comments[0].body(), " a <!-- b ");
    assert_eq!(result.validation.classify.orphan_closes.len(), 1);
    assert!(result.reconstruction.is_match());
}

#[test]
fn rerun_produces_identical_structure_with_fresh_identifiers() {
    let input = "intro <a href=\"/a\">x</a> <img src=\"i.png\" alt=\"i\"> outro";
    let first = run_default(input);
    let second = run_default(input);
    assert_eq!(first.brackets, second.brackets);
    assert_eq!(first.elements, second.elements);
    assert_eq!(first.content_records, second.content_records);
    let first_uuids: Vec<_> = first.content_items.iter().map(|i| i.uuid).collect();
    let second_uuids: Vec<_> = second.content_items.iter().map(|i| i.uuid).collect();
    assert_eq!(first_uuids.len(), second_uuids.len());
    assert!(first_uuids.iter().all(|u| !second_uuids.contains(u)));
}

#[test]
fn shared_uuid_space_never_collides_across_parallel_workers() {
    use std::sync::Arc;

    let uuids = Arc::new(maskup::UuidSet::new());
    let config = PipelineConfig::default();
    let handles: Vec<_> = (0..4u64)
        .map(|file_id| {
            let uuids = Arc::clone(&uuids);
            let config = config.clone();
            std::thread::spawn(move || {
                let input = "<a href=\"/w\">w</a> text <img src=\"x\" alt=\"y\">";
                tokenize_and_template_shared_helper(file_id, input, &config, &uuids)
            })
        })
        .collect();
    for handle in handles {
        let result = handle.join().expect("worker panicked");
        assert!(result.reconstruction.is_match());
    }
}

fn tokenize_and_template_shared_helper(
    file_id: u64,
    input: &str,
    config: &PipelineConfig,
    uuids: &maskup::UuidSet,
) -> maskup::PipelineResult {
    maskup::tokenize_and_template_shared(file_id, input, config, uuids)
        .expect("pipeline must not fail")
}

#[test]
fn whole_result_survives_json() {
    for case in CORPUS {
        let result = run_default(case.input);
        let json = maskup::result_to_json(&result).expect("serializes");
        let back: maskup::PipelineResult = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, result, "{}: JSON round trip", case.label);
    }
}

#[test]
fn reconstruction_works_from_a_reloaded_mapping() {
    let input = "<meta name=\"author\" content=\"someone\" rel=\"me\">";
    let result = tokenize_and_template(9, input, &PipelineConfig::default()).expect("pipeline");
    let json = maskup::mapping_to_json(&result.mapping).expect("serializes");
    let mapping = maskup::mapping_from_json(&json).expect("deserializes");
    assert_eq!(
        reconstruct_document(&result.templated_document, &mapping),
        input.as_bytes()
    );
}
