//! Templating engine: substitute extracted values with unique identifiers.
//!
//! Substitution is span-targeted: each identifier replaces one specific
//! occurrence inside its record body, never a blind global replacement, so
//! identical values in different attributes stay independent.
//!
//! Invariants:
//! - Every identifier is claimed against the run's `UuidSet`; a duplicate is
//!   a programming-contract failure (`UuidCollision`), not a degraded mode.
//! - Applying the returned mapping to a template body reproduces the
//!   original record body exactly.

use crate::extract::{ExtractedValue, extract_values};
use crate::types::{
    ContentItem, ContentRecord, ItemId, MappingEntry, TemplateMapping, TemplatedRecord,
};
use crate::uuid_set::UuidSet;
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateError {
    UuidCollision { uuid: Uuid },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UuidCollision { uuid } => {
                write!(f, "generated identifier {uuid} was already claimed in this run")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// Everything the engine produces for one document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemplateOutcome {
    pub items: Vec<ContentItem>,
    pub templates: Vec<TemplatedRecord>,
    pub mapping: TemplateMapping,
}

/// Template every record: element records per extracted value, between-run
/// records wholesale.
pub fn template_records(
    records: &[ContentRecord],
    uuids: &UuidSet,
) -> Result<TemplateOutcome, TemplateError> {
    let mut outcome = TemplateOutcome::default();
    let mut next_item_id: ItemId = 0;

    for record in records {
        let template_body = match record {
            ContentRecord::BetweenElements { body, .. } => {
                let id = claim_fresh(uuids)?;
                outcome.mapping.insert(
                    id,
                    MappingEntry {
                        original_value: body.clone(),
                        element_type: "text".to_string(),
                        attribute_name: "between_elements".to_string(),
                    },
                );
                id.to_string()
            }
            ContentRecord::Element { body, .. } => template_element_body(
                body,
                record.id(),
                uuids,
                &mut next_item_id,
                &mut outcome,
            )?,
        };
        outcome.templates.push(TemplatedRecord {
            record_id: record.id(),
            template_body,
        });
    }

    log::trace!(
        target: "templating.engine",
        "templated {} records into {} items",
        records.len(),
        outcome.items.len()
    );
    Ok(outcome)
}

fn template_element_body(
    body: &str,
    record_id: u32,
    uuids: &UuidSet,
    next_item_id: &mut ItemId,
    outcome: &mut TemplateOutcome,
) -> Result<String, TemplateError> {
    let mut values = extract_values(body);
    values.sort_by_key(|v| v.span.start);
    let values = drop_overlapping(values);

    let mut template = String::with_capacity(body.len());
    let mut cursor = 0usize;
    for extracted in values {
        debug_assert!(body.is_char_boundary(extracted.span.start));
        debug_assert!(body.is_char_boundary(extracted.span.end));
        let id = claim_fresh(uuids)?;
        let original = extracted.span.slice(body);
        template.push_str(&body[cursor..extracted.span.start]);
        template.push_str(&id.to_string());
        cursor = extracted.span.end;
        outcome.mapping.insert(
            id,
            MappingEntry {
                original_value: original.to_string(),
                element_type: extracted.element_type.clone(),
                attribute_name: extracted.attribute_name.clone(),
            },
        );
        outcome.items.push(ContentItem {
            id: *next_item_id,
            content_record_id: record_id,
            element_type: extracted.element_type,
            attribute_name: extracted.attribute_name,
            value: original.to_string(),
            value_span: extracted.span,
            uuid: id,
        });
        *next_item_id += 1;
    }
    template.push_str(&body[cursor..]);
    Ok(template)
}

// A value whose span starts inside an earlier value's span cannot be
// substituted independently; keep the earlier one.
fn drop_overlapping(values: Vec<ExtractedValue>) -> Vec<ExtractedValue> {
    let mut kept: Vec<ExtractedValue> = Vec::with_capacity(values.len());
    for v in values {
        if let Some(last) = kept.last()
            && v.span.start < last.span.end
        {
            log::warn!(
                target: "templating.engine",
                "dropping {}:{} value overlapping an earlier extraction",
                v.element_type,
                v.attribute_name
            );
            continue;
        }
        kept.push(v);
    }
    kept
}

fn claim_fresh(uuids: &UuidSet) -> Result<Uuid, TemplateError> {
    let id = Uuid::new_v4();
    if !uuids.claim(id) {
        return Err(TemplateError::UuidCollision { uuid: id });
    }
    Ok(id)
}
