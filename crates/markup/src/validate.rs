//! Sequence validation: advisory consistency checks over brackets and
//! elements.
//!
//! Two independent checks combine into a score in `[0, 1]`. A failing score
//! never aborts the pipeline; callers read the report for diagnostics.

use crate::types::{BracketChar, BracketEvent, BracketId, Element, ElementId};
use serde::{Deserialize, Serialize};

/// Plain-stack pairing over all brackets, ignoring comment semantics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BracketCheck {
    pub valid_pairs: usize,
    pub orphan_opens: Vec<BracketId>,
    pub orphan_closes: Vec<BracketId>,
    pub score: f64,
}

/// One adjacency violation between consecutive elements.
///
/// `size` is signed: positive for a gap, negative for an overlap.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyIssue {
    pub pair_index: usize,
    pub left_element: ElementId,
    pub right_element: ElementId,
    pub size: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyCheck {
    pub checked_pairs: usize,
    pub issues: Vec<AdjacencyIssue>,
    pub score: f64,
}

/// Combined sequence report.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceReport {
    pub bracket: BracketCheck,
    pub adjacency: AdjacencyCheck,
    pub score: f64,
}

/// Run both consistency checks over one document's streams.
pub fn validate_sequence(events: &[BracketEvent], elements: &[Element]) -> SequenceReport {
    let bracket = check_brackets(events);
    let adjacency = check_adjacency(elements);
    let score = (bracket.score + adjacency.score) / 2.0;
    log::trace!(
        target: "markup.validate",
        "sequence score {:.3} (brackets {:.3}, adjacency {:.3})",
        score,
        bracket.score,
        adjacency.score
    );
    SequenceReport {
        bracket,
        adjacency,
        score,
    }
}

fn check_brackets(events: &[BracketEvent]) -> BracketCheck {
    let mut check = BracketCheck::default();
    let mut stack: Vec<BracketId> = Vec::new();
    for ev in events {
        match ev.ch {
            BracketChar::Open => stack.push(ev.sequence_id),
            BracketChar::Close => {
                if stack.pop().is_some() {
                    check.valid_pairs += 1;
                } else {
                    check.orphan_closes.push(ev.sequence_id);
                }
            }
        }
    }
    check.orphan_opens = stack;
    check.score = if events.is_empty() {
        1.0
    } else {
        (check.valid_pairs * 2) as f64 / events.len() as f64
    };
    check
}

fn check_adjacency(elements: &[Element]) -> AdjacencyCheck {
    let mut check = AdjacencyCheck::default();
    for (pair_index, pair) in elements.windows(2).enumerate() {
        check.checked_pairs += 1;
        let expected = pair[0].pos_close() as i64 + 1;
        let actual = pair[1].pos_open() as i64;
        if actual != expected {
            check.issues.push(AdjacencyIssue {
                pair_index,
                left_element: pair[0].id(),
                right_element: pair[1].id(),
                size: actual - expected,
            });
        }
    }
    check.score = if check.checked_pairs == 0 {
        1.0
    } else {
        (check.checked_pairs - check.issues.len()) as f64 / check.checked_pairs as f64
    };
    check
}
