//! Bracket scanner: one linear pass over the document emitting `<`/`>` events.
//!
//! Invariants:
//! - Positions are byte offsets into the original buffer (not code points),
//!   strictly increasing, unique per scan.
//! - Context window spans lie on UTF-8 char boundaries, so window slices are
//!   always valid `&str`.
//! - Nothing is allocated beyond the event list itself; windows are spans
//!   into the buffer, not copies.

use crate::types::{BracketChar, BracketClass, BracketEvent, BracketId, ContextWindow, Span};
use memchr::memchr2;

/// Configuration for the bracket scan.
#[derive(Clone, Copy, Debug)]
pub struct ScanConfig {
    /// Number of characters captured on each side of a bracket. Windows
    /// shorter than the comment markers (`!--`, `--`) make the classifier
    /// blind to comments, so keep this at 3 or more.
    pub context_window: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self { context_window: 5 }
    }
}

/// Scan `input` for `<`/`>` occurrences.
///
/// Every event starts out classified `Regular`; the comment-aware pass
/// rewrites classifications afterwards.
pub fn scan_brackets(input: &str, config: &ScanConfig) -> Vec<BracketEvent> {
    let bytes = input.as_bytes();
    let mut events = Vec::new();
    let mut i = 0usize;
    while let Some(rel) = memchr2(b'<', b'>', &bytes[i..]) {
        let pos = i + rel;
        let ch = if bytes[pos] == b'<' {
            BracketChar::Open
        } else {
            BracketChar::Close
        };
        // `<`/`>` are ASCII, so `pos` and `pos + 1` are char boundaries.
        let before_start = walk_back(input, pos, config.context_window);
        let after_end = walk_forward(input, pos + 1, config.context_window);
        debug_assert!(input.is_char_boundary(before_start));
        debug_assert!(input.is_char_boundary(after_end));
        events.push(BracketEvent {
            sequence_id: events.len() as BracketId,
            position: pos,
            ch,
            class: BracketClass::Regular,
            context: ContextWindow {
                before: Span::new(before_start, pos),
                after: Span::new(pos + 1, after_end),
            },
        });
        i = pos + 1;
    }
    log::trace!(
        target: "markup.scan",
        "scanned {} bracket events over {} bytes",
        events.len(),
        bytes.len()
    );
    events
}

fn walk_back(input: &str, mut idx: usize, chars: usize) -> usize {
    for _ in 0..chars {
        if idx == 0 {
            break;
        }
        idx -= 1;
        while idx > 0 && !input.is_char_boundary(idx) {
            idx -= 1;
        }
    }
    idx
}

fn walk_forward(input: &str, mut idx: usize, chars: usize) -> usize {
    let len = input.len();
    for _ in 0..chars {
        if idx >= len {
            break;
        }
        idx += 1;
        while idx < len && !input.is_char_boundary(idx) {
            idx += 1;
        }
    }
    idx.min(len)
}
