//! Pipeline orchestration: one synchronous pass over one document.
//!
//! Stages run in order — scan, classify, pair, validate, segment, template —
//! then the per-record template bodies are spliced into the full templated
//! document, coverage is accounted, and the reconstruction check closes the
//! loop against the original bytes.
//!
//! Invariants:
//! - The pipeline holds no shared mutable state; documents are independent
//!   and may be processed by parallel workers. A uuid space spanning several
//!   documents is shared explicitly via `UuidSet`.
//! - Malformed input degrades to report entries, never an error. The only
//!   fatal condition is an identifier collision.

use core_types::FileId;
use markup::{
    BracketEvent, ClassifyConfig, ClassifyReport, Element, PairConfig, PairReport, ScanConfig,
    SequenceReport, Span, classify_brackets, pair_elements, scan_brackets, validate_sequence,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use templating::{
    ContentItem, ContentRecord, ReconstructionCheck, SegmentConfig, TemplateError,
    TemplateMapping, TemplatedRecord, UuidSet, segment_document, template_records,
    verify_reconstruction,
};
use uuid::Uuid;

/// Explicit configuration for every stage; no module-level state.
#[derive(Clone, Debug, Default)]
pub struct PipelineConfig {
    pub scan: ScanConfig,
    pub classify: ClassifyConfig,
    pub pair: PairConfig,
    pub segment: SegmentConfig,
}

/// How much of the document the record stream models.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub document_len: usize,
    pub covered_bytes: usize,
    /// Spans in no record: dropped whitespace-only runs and filtered-out
    /// elements. Copied verbatim, never substituted.
    pub unmodeled: Vec<Span>,
    /// Record spans that collided with an earlier record. Always empty for
    /// streams built by this pipeline.
    pub overlaps: Vec<Span>,
}

/// Advisory diagnostics from every stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub classify: ClassifyReport,
    pub pair: PairReport,
    pub sequence: SequenceReport,
    pub coverage: CoverageReport,
}

/// Full output of one document pass. JSON-serializable; ids are stable so an
/// external store can persist records keyed by `(file_id, local_id)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub file_id: FileId,
    pub brackets: Vec<BracketEvent>,
    pub elements: Vec<Element>,
    pub content_records: Vec<ContentRecord>,
    pub content_items: Vec<ContentItem>,
    pub templates: Vec<TemplatedRecord>,
    pub mapping: TemplateMapping,
    pub templated_document: String,
    pub validation: ValidationReport,
    pub reconstruction: ReconstructionCheck,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineError {
    UuidCollision { uuid: Uuid },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::UuidCollision { uuid } => {
                write!(f, "identifier collision on {uuid}; mapping would be ambiguous")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<TemplateError> for PipelineError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::UuidCollision { uuid } => PipelineError::UuidCollision { uuid },
        }
    }
}

/// Run the full pipeline over one document with a run-private uuid space.
pub fn tokenize_and_template(
    file_id: FileId,
    input: &str,
    config: &PipelineConfig,
) -> Result<PipelineResult, PipelineError> {
    let uuids = UuidSet::new();
    tokenize_and_template_shared(file_id, input, config, &uuids)
}

/// Run the full pipeline with an explicitly shared uuid space.
///
/// Use this when one uniqueness domain spans multiple documents processed by
/// parallel workers; `UuidSet` is `Mutex`-protected.
pub fn tokenize_and_template_shared(
    file_id: FileId,
    input: &str,
    config: &PipelineConfig,
    uuids: &UuidSet,
) -> Result<PipelineResult, PipelineError> {
    if !markup::has_brackets(input) {
        log::debug!(
            target: "maskup.pipeline",
            "file {file_id}: no structural characters in {} bytes",
            input.len()
        );
    }

    let mut brackets = scan_brackets(input, &config.scan);
    let classify = classify_brackets(input, &mut brackets, &config.classify);
    let (elements, pair) = pair_elements(input, &brackets, &config.pair);
    let sequence = validate_sequence(&brackets, &elements);
    let content_records = segment_document(file_id, input, &elements, &config.segment);
    let outcome = template_records(&content_records, uuids)?;

    let (templated_document, coverage) = splice_templates(input, &content_records, &outcome.templates);
    let reconstructed = templating::reconstruct(&templated_document, &outcome.mapping);
    let reconstruction = verify_reconstruction(input.as_bytes(), &reconstructed);
    if !reconstruction.is_match() {
        log::warn!(
            target: "maskup.pipeline",
            "file {file_id}: reconstruction diverged: {reconstruction:?}"
        );
    }

    Ok(PipelineResult {
        file_id,
        brackets,
        elements,
        content_records,
        content_items: outcome.items,
        templates: outcome.templates,
        mapping: outcome.mapping,
        templated_document,
        validation: ValidationReport {
            classify,
            pair,
            sequence,
            coverage,
        },
        reconstruction,
    })
}

/// Reverse a templated document back to original bytes.
pub fn reconstruct_document(template: &str, mapping: &TemplateMapping) -> Vec<u8> {
    templating::reconstruct(template, mapping)
}

// Splice per-record template bodies over their spans; everything else is
// copied verbatim and accounted as unmodeled.
fn splice_templates(
    input: &str,
    records: &[ContentRecord],
    templates: &[TemplatedRecord],
) -> (String, CoverageReport) {
    debug_assert_eq!(records.len(), templates.len());
    let mut templated = String::with_capacity(input.len());
    let mut coverage = CoverageReport {
        document_len: input.len(),
        ..CoverageReport::default()
    };
    let mut cursor = 0usize;
    for (record, template) in records.iter().zip(templates) {
        debug_assert_eq!(record.id(), template.record_id);
        let span = record.span();
        if span.start < cursor {
            coverage.overlaps.push(span);
            continue;
        }
        if span.start > cursor {
            coverage.unmodeled.push(Span::new(cursor, span.start));
            templated.push_str(&input[cursor..span.start]);
        }
        templated.push_str(&template.template_body);
        coverage.covered_bytes += span.len();
        cursor = span.end;
    }
    if cursor < input.len() {
        coverage.unmodeled.push(Span::new(cursor, input.len()));
        templated.push_str(&input[cursor..]);
    }
    (templated, coverage)
}
