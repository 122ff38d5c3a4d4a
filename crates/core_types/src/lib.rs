use serde::{Deserialize, Serialize};

/// Logical identifier of a document as known to the external store.
pub type FileId = u64;

/// Per-document record identifier; unique within one record kind for one file.
pub type LocalId = u32;

/// Composite key under which an external relational store persists a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreKey {
    pub file_id: FileId,
    pub local_id: LocalId,
}

impl StoreKey {
    pub fn new(file_id: FileId, local_id: LocalId) -> Self {
        Self { file_id, local_id }
    }
}
