//! Content side of the templating pipeline: segmentation, attribute
//! extraction, identifier substitution, and byte-exact reconstruction.
//!
//! Invariants:
//! - Records for one document are ordered and non-overlapping.
//! - Identifiers are unique within a run (`UuidSet` enforces the contract).
//! - `reconstruct(template, mapping)` reproduces the templated bytes
//!   exactly; the validator reports the first divergence when it does not.

pub mod extract;
pub mod reconstruct;
pub mod segment;
pub mod template;

mod types;
mod uuid_set;

pub use crate::extract::{ExtractedValue, extract_values};
pub use crate::reconstruct::{
    ReconstructionCheck, ReconstructionMismatch, reconstruct, verify_reconstruction,
};
pub use crate::segment::{SegmentConfig, segment_document};
pub use crate::template::{TemplateError, TemplateOutcome, template_records};
pub use crate::types::{
    ContentItem, ContentRecord, ItemId, MappingEntry, RecordId, TemplateMapping, TemplatedRecord,
};
pub use crate::uuid_set::UuidSet;
