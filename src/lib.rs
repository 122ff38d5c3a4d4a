//! Reversible templating over bracket-delimited markup.
//!
//! One pass over a raw document buffer produces a structural element stream,
//! content records for the spans worth hiding, and a template in which every
//! extracted value is replaced by a unique identifier. The transform is
//! reversible: applying the mapping to the template reproduces the original
//! bytes exactly, and the pipeline verifies that before returning.
//!
//! The crate is a library only. It performs no I/O: input is a buffer plus a
//! logical file id, output is JSON-serializable records for an external
//! store.
//!
//! ```
//! use maskup::{PipelineConfig, reconstruct_document, tokenize_and_template};
//!
//! let input = "<a href=\"/account\">profile</a>";
//! let result = tokenize_and_template(1, input, &PipelineConfig::default())?;
//! assert!(result.reconstruction.is_match());
//! assert!(!result.templated_document.contains("/account"));
//! let restored = reconstruct_document(&result.templated_document, &result.mapping);
//! assert_eq!(restored, input.as_bytes());
//! # Ok::<(), maskup::PipelineError>(())
//! ```

mod export;
mod pipeline;

pub use crate::export::{mapping_from_json, mapping_to_json, record_store_keys, result_to_json};
pub use crate::pipeline::{
    CoverageReport, PipelineConfig, PipelineError, PipelineResult, ValidationReport,
    reconstruct_document, tokenize_and_template, tokenize_and_template_shared,
};

pub use core_types::{FileId, LocalId, StoreKey};
pub use markup::{
    BracketChar, BracketClass, BracketEvent, ClassifyConfig, ClassifyReport, Element, PairConfig,
    PairReport, ScanConfig, SequenceReport, Span, TagKind,
};
pub use templating::{
    ContentItem, ContentRecord, MappingEntry, ReconstructionCheck, ReconstructionMismatch,
    SegmentConfig, TemplateMapping, TemplatedRecord, UuidSet,
};
