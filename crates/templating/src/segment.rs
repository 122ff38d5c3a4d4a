//! Content segmentation: one forward walk over the sorted element stream.
//!
//! Emits `BetweenElements` records for the text between elements (dropping
//! empty and whitespace-only runs) and `Element` records for elements that
//! pass the inclusion filter. Spans that end up in no record are unmodeled:
//! the coverage check reports them and substitution never touches them.

use crate::types::{ContentRecord, RecordId};
use core_types::FileId;
use markup::Element;

/// Configuration for the inclusion filter.
#[derive(Clone, Debug)]
pub struct SegmentConfig {
    /// Tag names whose element bodies are never templated.
    pub excluded_tags: Vec<String>,
    /// Body substrings that mark an element as carrying extractable values.
    pub include_markers: Vec<String>,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            excluded_tags: vec!["script".to_string(), "style".to_string()],
            include_markers: vec![
                "href".to_string(),
                "src".to_string(),
                "alt".to_string(),
                "rel".to_string(),
            ],
        }
    }
}

/// Walk `elements` in document order and emit content records.
pub fn segment_document(
    file_id: FileId,
    input: &str,
    elements: &[Element],
    config: &SegmentConfig,
) -> Vec<ContentRecord> {
    let mut records: Vec<ContentRecord> = Vec::new();
    let mut prev_close_pos = 0usize;
    let mut prev_element_id = None;
    let mut next_id: RecordId = 0;

    for element in elements {
        let pos_open = element.pos_open();
        if pos_open < prev_close_pos {
            // Overlapping element (crossed pairs in malformed input); skip it
            // so the record stream stays non-overlapping. The adjacency check
            // reports the overlap.
            log::debug!(
                target: "templating.segment",
                "skipping element {} overlapping previous span at {}",
                element.id(),
                pos_open
            );
            continue;
        }
        if pos_open > prev_close_pos {
            let body = &input[prev_close_pos..pos_open];
            if !body.trim().is_empty() {
                records.push(ContentRecord::BetweenElements {
                    id: next_id,
                    file_id,
                    element_id_start: prev_element_id,
                    element_id_end: Some(element.id()),
                    pos_start: prev_close_pos,
                    pos_end: pos_open,
                    body: body.to_string(),
                });
                next_id += 1;
            }
        }
        if includes_element(element, config) {
            let pos_end = element.pos_close() + 1;
            records.push(ContentRecord::Element {
                id: next_id,
                file_id,
                element_id_start: element.id(),
                element_id_end: element.id(),
                pos_start: pos_open,
                pos_end,
                body: input[pos_open..pos_end].to_string(),
            });
            next_id += 1;
        }
        prev_close_pos = element.pos_close() + 1;
        prev_element_id = Some(element.id());
    }

    if prev_close_pos < input.len() {
        let body = &input[prev_close_pos..];
        if !body.trim().is_empty() {
            records.push(ContentRecord::BetweenElements {
                id: next_id,
                file_id,
                element_id_start: prev_element_id,
                element_id_end: None,
                pos_start: prev_close_pos,
                pos_end: input.len(),
                body: body.to_string(),
            });
        }
    }

    debug_assert!(
        records
            .windows(2)
            .all(|w| w[0].pos_end() <= w[1].pos_start()),
        "records must be sorted and non-overlapping"
    );
    log::trace!(
        target: "templating.segment",
        "segmented {} records from {} elements",
        records.len(),
        elements.len()
    );
    records
}

fn includes_element(element: &Element, config: &SegmentConfig) -> bool {
    if element.is_comment() {
        return false;
    }
    if let Some(name) = element.tag_name()
        && config.excluded_tags.iter().any(|t| t == name)
    {
        return false;
    }
    let body = element.body();
    config
        .include_markers
        .iter()
        .any(|marker| contains_ignore_ascii_case(body, marker))
}

fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || hay.len() < needle.len() {
        return needle.is_empty();
    }
    hay.windows(needle.len())
        .any(|w| w.eq_ignore_ascii_case(needle))
}
