use core_types::LocalId;
use serde::{Deserialize, Serialize};

pub type BracketId = LocalId;
pub type ElementId = LocalId;

/// Byte span into the document buffer.
///
/// Invariant: `start <= end`, and both endpoints lie on UTF-8 char boundaries
/// of the buffer the span was produced from, so spans always slice cleanly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must be <= end");
        Self { start, end }
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn slice(self, text: &str) -> &str {
        debug_assert!(text.is_char_boundary(self.start));
        debug_assert!(text.is_char_boundary(self.end));
        &text[self.start..self.end]
    }
}

/// Which of the two structural characters a bracket event records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketChar {
    Open,
    Close,
}

impl BracketChar {
    pub fn as_char(self) -> char {
        match self {
            Self::Open => '<',
            Self::Close => '>',
        }
    }
}

/// Classification assigned by the comment-aware pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketClass {
    CommentOpen,
    CommentClose,
    InnerComment,
    Regular,
}

/// Context window spans captured around a bracket for classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindow {
    pub before: Span,
    pub after: Span,
}

/// One recorded `<`/`>` occurrence.
///
/// Invariant: `position` is an exact byte offset into the original buffer;
/// positions are strictly increasing and unique across one scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketEvent {
    pub sequence_id: BracketId,
    pub position: usize,
    pub ch: BracketChar,
    pub class: BracketClass,
    pub context: ContextWindow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    StandardNamed,
    Custom,
    Unnamed,
}

/// A paired open/close bracket span.
///
/// Invariant: `pos_open < pos_close`. Tag pairs never span another unconsumed
/// bracket of the same category; comment pairs follow the single-level stack
/// semantics of the classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Tag {
        id: ElementId,
        open_bracket_id: BracketId,
        close_bracket_id: BracketId,
        pos_open: usize,
        pos_close: usize,
        tag_name: String,
        kind: TagKind,
        body: String,
    },
    Comment {
        id: ElementId,
        open_bracket_id: BracketId,
        close_bracket_id: BracketId,
        pos_open: usize,
        pos_close: usize,
        body: String,
    },
}

impl Element {
    pub fn id(&self) -> ElementId {
        match self {
            Element::Tag { id, .. } | Element::Comment { id, .. } => *id,
        }
    }

    pub fn pos_open(&self) -> usize {
        match self {
            Element::Tag { pos_open, .. } | Element::Comment { pos_open, .. } => *pos_open,
        }
    }

    pub fn pos_close(&self) -> usize {
        match self {
            Element::Tag { pos_close, .. } | Element::Comment { pos_close, .. } => *pos_close,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Element::Tag { body, .. } | Element::Comment { body, .. } => body,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Element::Comment { .. })
    }

    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Element::Tag { tag_name, .. } => Some(tag_name),
            Element::Comment { .. } => None,
        }
    }

    pub(crate) fn set_id(&mut self, new_id: ElementId) {
        match self {
            Element::Tag { id, .. } | Element::Comment { id, .. } => *id = new_id,
        }
    }
}
