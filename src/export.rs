//! JSON handoff to the external persistence layer.
//!
//! The core owns no storage; it serializes its record streams and lets the
//! caller persist them keyed by `(file_id, local_id)`.

use crate::pipeline::PipelineResult;
use core_types::StoreKey;
use templating::TemplateMapping;

/// Serialize a full pipeline result.
pub fn result_to_json(result: &PipelineResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Serialize just the mapping, the piece a store must retain to reverse a
/// template later.
pub fn mapping_to_json(mapping: &TemplateMapping) -> serde_json::Result<String> {
    serde_json::to_string(mapping)
}

/// Restore a mapping previously serialized with [`mapping_to_json`].
pub fn mapping_from_json(json: &str) -> serde_json::Result<TemplateMapping> {
    serde_json::from_str(json)
}

/// Store keys for every content record in `result`.
pub fn record_store_keys(result: &PipelineResult) -> Vec<StoreKey> {
    result
        .content_records
        .iter()
        .map(|record| StoreKey::new(record.file_id(), record.id()))
        .collect()
}
