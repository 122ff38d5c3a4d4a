use core_types::{FileId, LocalId};
use markup::{ElementId, Span};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub type RecordId = LocalId;
pub type ItemId = LocalId;

/// A maximal span of document text subject to templating.
///
/// Invariant: records for one document are emitted sorted by `pos_start` and
/// never overlap. Spans belonging to no record (dropped whitespace-only runs,
/// elements that fail the inclusion filter) are unmodeled: copied verbatim
/// and never substituted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentRecord {
    Element {
        id: RecordId,
        file_id: FileId,
        element_id_start: ElementId,
        element_id_end: ElementId,
        pos_start: usize,
        pos_end: usize,
        body: String,
    },
    BetweenElements {
        id: RecordId,
        file_id: FileId,
        /// Element immediately before the run; `None` at document start.
        element_id_start: Option<ElementId>,
        /// Element immediately after the run; `None` at document end.
        element_id_end: Option<ElementId>,
        pos_start: usize,
        pos_end: usize,
        body: String,
    },
}

impl ContentRecord {
    pub fn id(&self) -> RecordId {
        match self {
            ContentRecord::Element { id, .. } | ContentRecord::BetweenElements { id, .. } => *id,
        }
    }

    pub fn file_id(&self) -> FileId {
        match self {
            ContentRecord::Element { file_id, .. }
            | ContentRecord::BetweenElements { file_id, .. } => *file_id,
        }
    }

    pub fn pos_start(&self) -> usize {
        match self {
            ContentRecord::Element { pos_start, .. }
            | ContentRecord::BetweenElements { pos_start, .. } => *pos_start,
        }
    }

    pub fn pos_end(&self) -> usize {
        match self {
            ContentRecord::Element { pos_end, .. }
            | ContentRecord::BetweenElements { pos_end, .. } => *pos_end,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.pos_start(), self.pos_end())
    }

    pub fn body(&self) -> &str {
        match self {
            ContentRecord::Element { body, .. } | ContentRecord::BetweenElements { body, .. } => {
                body
            }
        }
    }

    pub fn is_between(&self) -> bool {
        matches!(self, ContentRecord::BetweenElements { .. })
    }
}

/// One substituted sub-value with its identifier.
///
/// Invariant: `value_span` locates `value` inside the owning record's body,
/// and `uuid` is unique within a processing run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ItemId,
    pub content_record_id: RecordId,
    pub element_type: String,
    pub attribute_name: String,
    pub value: String,
    pub value_span: Span,
    pub uuid: Uuid,
}

/// Provenance stored against each identifier in the mapping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub original_value: String,
    pub element_type: String,
    pub attribute_name: String,
}

/// Reversible table from identifier back to original value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateMapping {
    entries: BTreeMap<Uuid, MappingEntry>,
}

impl TemplateMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uuid: Uuid, entry: MappingEntry) {
        self.entries.insert(uuid, entry);
    }

    pub fn get(&self, uuid: &Uuid) -> Option<&MappingEntry> {
        self.entries.get(uuid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Uuid, &MappingEntry)> {
        self.entries.iter()
    }
}

/// A record body with its substitutions applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplatedRecord {
    pub record_id: RecordId,
    pub template_body: String,
}
