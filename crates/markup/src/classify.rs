//! Comment-aware bracket classification.
//!
//! A `<` whose trailing window starts with `!--` is a comment open; a `>`
//! whose preceding window ends with `--` is a comment close; everything else
//! stays `Regular`. Matching runs over an explicit bounded stack.
//!
//! Invariants:
//! - Single-level semantics: a comment open seen while a comment is already
//!   open is content of that comment (`InnerComment`), not a new nesting
//!   level. The first close therefore always pairs with the outermost open.
//! - A close with no open on the stack, and opens still on the stack at
//!   end-of-input, are orphans: recorded, never fatal.
//! - Regular brackets strictly between a matched open/close pair are
//!   reclassified `InnerComment` so the pairer never treats them as tag
//!   delimiters.

use crate::types::{BracketChar, BracketClass, BracketEvent, BracketId};
use serde::{Deserialize, Serialize};

const COMMENT_OPEN_MARKER: &str = "!--";
const COMMENT_CLOSE_MARKER: &str = "--";

/// Configuration for comment matching.
#[derive(Clone, Copy, Debug)]
pub struct ClassifyConfig {
    /// Defensive bound on the open-marker stack. Current single-level
    /// semantics never push past one frame; the cap guards the structure
    /// itself.
    pub max_comment_depth: usize,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            max_comment_depth: 32,
        }
    }
}

/// Outcome of the classification pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifyReport {
    pub matched_pairs: usize,
    pub orphan_opens: Vec<BracketId>,
    pub orphan_closes: Vec<BracketId>,
    pub depth_cap_hits: usize,
}

struct Frame {
    event_index: usize,
}

/// Classify `events` in place and report comment pairing.
pub fn classify_brackets(
    input: &str,
    events: &mut [BracketEvent],
    config: &ClassifyConfig,
) -> ClassifyReport {
    for ev in events.iter_mut() {
        ev.class = match ev.ch {
            BracketChar::Open
                if ev.context.after.slice(input).starts_with(COMMENT_OPEN_MARKER) =>
            {
                BracketClass::CommentOpen
            }
            BracketChar::Close
                if ev.context.before.slice(input).ends_with(COMMENT_CLOSE_MARKER) =>
            {
                BracketClass::CommentClose
            }
            _ => BracketClass::Regular,
        };
    }

    let mut report = ClassifyReport::default();
    let mut stack: Vec<Frame> = Vec::new();
    for idx in 0..events.len() {
        match events[idx].class {
            BracketClass::CommentOpen => {
                if !stack.is_empty() {
                    // Already inside an open comment; the marker is comment
                    // content, not a new level.
                    events[idx].class = BracketClass::InnerComment;
                } else if stack.len() >= config.max_comment_depth {
                    report.depth_cap_hits += 1;
                    report.orphan_opens.push(events[idx].sequence_id);
                } else {
                    stack.push(Frame { event_index: idx });
                }
            }
            BracketClass::CommentClose => {
                if let Some(frame) = stack.pop() {
                    report.matched_pairs += 1;
                    for ev in &mut events[frame.event_index + 1..idx] {
                        if ev.class == BracketClass::Regular {
                            ev.class = BracketClass::InnerComment;
                        }
                    }
                } else {
                    report.orphan_closes.push(events[idx].sequence_id);
                }
            }
            _ => {}
        }
    }
    for frame in stack {
        report.orphan_opens.push(events[frame.event_index].sequence_id);
    }

    log::trace!(
        target: "markup.classify",
        "matched {} comment pairs, {} orphan opens, {} orphan closes",
        report.matched_pairs,
        report.orphan_opens.len(),
        report.orphan_closes.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{ScanConfig, scan_brackets};

    fn classify(input: &str) -> (Vec<BracketEvent>, ClassifyReport) {
        let mut events = scan_brackets(input, &ScanConfig::default());
        let report = classify_brackets(input, &mut events, &ClassifyConfig::default());
        (events, report)
    }

    fn classes(events: &[BracketEvent]) -> Vec<BracketClass> {
        events.iter().map(|e| e.class).collect()
    }

    #[test]
    fn plain_tags_stay_regular() {
        let (events, report) = classify("<p>x</p>");
        assert!(events.iter().all(|e| e.class == BracketClass::Regular));
        assert_eq!(report.matched_pairs, 0);
        assert!(report.orphan_opens.is_empty());
    }

    #[test]
    fn simple_comment_is_matched() {
        let (events, report) = classify("<!-- note -->");
        assert_eq!(
            classes(&events),
            vec![BracketClass::CommentOpen, BracketClass::CommentClose]
        );
        assert_eq!(report.matched_pairs, 1);
    }

    #[test]
    fn regular_brackets_inside_comment_become_inner_content() {
        let (events, report) = classify("<!-- a <b> c -->");
        assert_eq!(
            classes(&events),
            vec![
                BracketClass::CommentOpen,
                BracketClass::InnerComment,
                BracketClass::InnerComment,
                BracketClass::CommentClose,
            ]
        );
        assert_eq!(report.matched_pairs, 1);
    }

    #[test]
    fn comment_nesting_first_close_wins() {
        // Single-level semantics: exactly one pair, the inner open is
        // swallowed as content, the trailing close is orphaned.
        let input = "<!-- a <!-- b --> c -->";
        let (events, report) = classify(input);
        assert_eq!(report.matched_pairs, 1, "got: {report:?}");
        assert_eq!(events[0].class, BracketClass::CommentOpen);
        assert_eq!(events[1].class, BracketClass::InnerComment);
        assert_eq!(events[2].class, BracketClass::CommentClose);
        assert_eq!(events[3].class, BracketClass::CommentClose);
        assert_eq!(report.orphan_closes, vec![3]);
        assert!(report.orphan_opens.is_empty());
    }

    #[test]
    fn close_without_open_is_orphaned() {
        let (events, report) = classify("text --> more");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].class, BracketClass::CommentClose);
        assert_eq!(report.orphan_closes, vec![0]);
        assert_eq!(report.matched_pairs, 0);
    }

    #[test]
    fn unterminated_comment_leaves_orphan_open() {
        let (events, report) = classify("<!-- never closed <p>");
        assert_eq!(events[0].class, BracketClass::CommentOpen);
        assert_eq!(report.orphan_opens, vec![0]);
        // The tag brackets inside the dangling comment stay regular: no
        // close ever ran the inner-content marking.
        assert_eq!(events[1].class, BracketClass::Regular);
        assert_eq!(events[2].class, BracketClass::Regular);
    }

    #[test]
    fn zero_depth_cap_orphans_every_open() {
        let input = "<!-- x -->";
        let mut events = scan_brackets(input, &ScanConfig::default());
        let report = classify_brackets(
            input,
            &mut events,
            &ClassifyConfig {
                max_comment_depth: 0,
            },
        );
        assert_eq!(report.depth_cap_hits, 1);
        assert_eq!(report.orphan_opens, vec![0]);
        assert_eq!(report.orphan_closes, vec![1]);
        assert_eq!(report.matched_pairs, 0);
    }

    #[test]
    fn classification_is_deterministic() {
        let input = "<a><!-- c --><b>";
        let (first, first_report) = classify(input);
        let (second, second_report) = classify(input);
        assert_eq!(first, second);
        assert_eq!(first_report, second_report);
    }
}
