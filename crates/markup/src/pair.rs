//! Element pairing: classified brackets to a position-sorted element stream.
//!
//! Two passes. Comment pairs are rebuilt first with the same single-level
//! stack discipline as the classifier; tag pairs are then formed from only
//! the `Regular` brackets, pairing each `<` with the next `>`.
//!
//! Invariants:
//! - Elements come out sorted by `pos_open` with dense ids in that order.
//! - A tag pair never spans another unconsumed regular bracket of the same
//!   category: a second `<` before any `>` supersedes the pending open, and
//!   the superseded open stays unpaired.
//! - Unterminated opens and unmatched closes are dropped from pairing and
//!   reported; downstream validation surfaces them as gaps.

use crate::tag_names::REFERENCE_TAGS;
use crate::types::{BracketChar, BracketClass, BracketEvent, BracketId, Element, TagKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for element pairing.
#[derive(Clone, Debug)]
pub struct PairConfig {
    /// Tag names that classify as `StandardNamed`.
    pub reference_tags: Vec<String>,
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            reference_tags: REFERENCE_TAGS.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

/// Outcome of the pairing passes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairReport {
    pub comment_pairs: usize,
    pub tag_pairs: usize,
    pub unterminated_opens: Vec<BracketId>,
    pub unmatched_closes: Vec<BracketId>,
}

struct RawPair<'e> {
    open: &'e BracketEvent,
    close: &'e BracketEvent,
    comment: bool,
}

/// Pair classified brackets into the canonical element stream.
pub fn pair_elements(
    input: &str,
    events: &[BracketEvent],
    config: &PairConfig,
) -> (Vec<Element>, PairReport) {
    let mut report = PairReport::default();
    let mut raw: Vec<RawPair<'_>> = Vec::new();

    // Comment pass: same stack discipline as classification.
    let mut comment_stack: Vec<&BracketEvent> = Vec::new();
    for ev in events {
        match ev.class {
            BracketClass::CommentOpen => {
                if comment_stack.is_empty() {
                    comment_stack.push(ev);
                }
            }
            BracketClass::CommentClose => {
                if let Some(open) = comment_stack.pop() {
                    report.comment_pairs += 1;
                    raw.push(RawPair {
                        open,
                        close: ev,
                        comment: true,
                    });
                }
            }
            _ => {}
        }
    }
    for open in comment_stack {
        report.unterminated_opens.push(open.sequence_id);
    }

    // Tag pass over regular brackets only.
    let mut pending: Option<&BracketEvent> = None;
    for ev in events.iter().filter(|e| e.class == BracketClass::Regular) {
        match ev.ch {
            BracketChar::Open => {
                if let Some(superseded) = pending.replace(ev) {
                    report.unterminated_opens.push(superseded.sequence_id);
                }
            }
            BracketChar::Close => {
                if let Some(open) = pending.take() {
                    report.tag_pairs += 1;
                    raw.push(RawPair {
                        open,
                        close: ev,
                        comment: false,
                    });
                } else {
                    report.unmatched_closes.push(ev.sequence_id);
                }
            }
        }
    }
    if let Some(open) = pending {
        report.unterminated_opens.push(open.sequence_id);
    }

    raw.sort_by_key(|p| p.open.position);
    let reference: HashSet<&str> = config.reference_tags.iter().map(String::as_str).collect();
    let mut elements: Vec<Element> = raw
        .iter()
        .map(|p| build_element(input, p, &reference))
        .collect();
    for (i, element) in elements.iter_mut().enumerate() {
        element.set_id(i as u32);
    }

    log::trace!(
        target: "markup.pair",
        "paired {} comment and {} tag elements ({} unterminated, {} unmatched)",
        report.comment_pairs,
        report.tag_pairs,
        report.unterminated_opens.len(),
        report.unmatched_closes.len()
    );
    (elements, report)
}

fn build_element(input: &str, pair: &RawPair<'_>, reference: &HashSet<&str>) -> Element {
    let pos_open = pair.open.position;
    let pos_close = pair.close.position;
    debug_assert!(pos_open < pos_close);
    let between = &input[pos_open + 1..pos_close];

    if pair.comment {
        let body = between.strip_prefix("!--").unwrap_or(between);
        let body = body.strip_suffix("--").unwrap_or(body);
        return Element::Comment {
            id: 0,
            open_bracket_id: pair.open.sequence_id,
            close_bracket_id: pair.close.sequence_id,
            pos_open,
            pos_close,
            body: body.to_string(),
        };
    }

    let (tag_name, kind) = derive_tag(between, reference);
    Element::Tag {
        id: 0,
        open_bracket_id: pair.open.sequence_id,
        close_bracket_id: pair.close.sequence_id,
        pos_open,
        pos_close,
        tag_name,
        kind,
        body: between.to_string(),
    }
}

fn derive_tag(body: &str, reference: &HashSet<&str>) -> (String, TagKind) {
    let Some(token) = body.split_whitespace().next() else {
        return (String::new(), TagKind::Unnamed);
    };
    let token = token.strip_prefix('/').unwrap_or(token);
    if token.is_empty() {
        return (String::new(), TagKind::Unnamed);
    }
    let name = token.to_ascii_lowercase();
    if name.starts_with('!') {
        // DOCTYPE and other declarations carry no tag name.
        return (name, TagKind::Unnamed);
    }
    let kind = if reference.contains(name.as_str()) {
        TagKind::StandardNamed
    } else {
        TagKind::Custom
    };
    (name, kind)
}
