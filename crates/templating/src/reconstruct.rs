//! Reconstruction: reverse every identifier substitution and verify the
//! result byte-for-byte.
//!
//! Reversal is a single left-to-right pass. At each position a 36-byte
//! hyphenated-uuid shape is probed and looked up in the mapping; hits are
//! replaced by their original value and skipped over, so restored content is
//! never re-substituted. Text that merely looks like an identifier but is
//! not in the mapping is copied verbatim.

use crate::types::TemplateMapping;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const UUID_TEXT_LEN: usize = 36;

/// Reverse all substitutions in `template`.
pub fn reconstruct(template: &str, mapping: &TemplateMapping) -> Vec<u8> {
    let bytes = template.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0usize;
    while i < bytes.len() {
        if let Some(entry) = uuid_at(bytes, i).and_then(|id| mapping.get(&id)) {
            out.extend_from_slice(entry.original_value.as_bytes());
            i += UUID_TEXT_LEN;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    out
}

fn uuid_at(bytes: &[u8], i: usize) -> Option<Uuid> {
    if i + UUID_TEXT_LEN > bytes.len() {
        return None;
    }
    // Cheap shape check before a full parse.
    if bytes[i + 8] != b'-' || bytes[i + 13] != b'-' {
        return None;
    }
    let text = std::str::from_utf8(&bytes[i..i + UUID_TEXT_LEN]).ok()?;
    Uuid::try_parse(text).ok()
}

/// Result of comparing a reconstruction against the original bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconstructionCheck {
    Matches,
    Mismatch(ReconstructionMismatch),
}

impl ReconstructionCheck {
    pub fn is_match(&self) -> bool {
        matches!(self, ReconstructionCheck::Matches)
    }
}

/// First point of divergence. `None` bytes mean one side ended early.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionMismatch {
    pub offset: usize,
    pub expected: Option<u8>,
    pub actual: Option<u8>,
}

/// Byte-compare `reconstructed` against `original`.
pub fn verify_reconstruction(original: &[u8], reconstructed: &[u8]) -> ReconstructionCheck {
    if let Some(offset) = original
        .iter()
        .zip(reconstructed.iter())
        .position(|(a, b)| a != b)
    {
        return ReconstructionCheck::Mismatch(ReconstructionMismatch {
            offset,
            expected: Some(original[offset]),
            actual: Some(reconstructed[offset]),
        });
    }
    if original.len() != reconstructed.len() {
        let offset = original.len().min(reconstructed.len());
        return ReconstructionCheck::Mismatch(ReconstructionMismatch {
            offset,
            expected: original.get(offset).copied(),
            actual: reconstructed.get(offset).copied(),
        });
    }
    ReconstructionCheck::Matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MappingEntry;

    fn entry(value: &str) -> MappingEntry {
        MappingEntry {
            original_value: value.to_string(),
            element_type: "a".to_string(),
            attribute_name: "href".to_string(),
        }
    }

    #[test]
    fn substitutions_reverse_exactly() {
        let mut mapping = TemplateMapping::new();
        let id = Uuid::new_v4();
        mapping.insert(id, entry("#x"));
        let template = format!("<a href=\"{id}\">");
        assert_eq!(reconstruct(&template, &mapping), b"<a href=\"#x\">");
    }

    #[test]
    fn unmapped_uuid_shaped_text_is_copied_verbatim() {
        let mapping = TemplateMapping::new();
        let stray = Uuid::new_v4().to_string();
        assert_eq!(reconstruct(&stray, &mapping), stray.as_bytes());
    }

    #[test]
    fn restored_values_are_not_rescanned() {
        // A mapped value that itself contains another mapped identifier's
        // text must come through untouched.
        let mut mapping = TemplateMapping::new();
        let inner = Uuid::new_v4();
        mapping.insert(inner, entry("INNER"));
        let outer = Uuid::new_v4();
        mapping.insert(outer, entry(&inner.to_string()));
        let reconstructed = reconstruct(&outer.to_string(), &mapping);
        assert_eq!(reconstructed, inner.to_string().as_bytes());
    }

    #[test]
    fn empty_original_values_restore_cleanly() {
        let mut mapping = TemplateMapping::new();
        let id = Uuid::new_v4();
        mapping.insert(id, entry(""));
        let template = format!("src=\"{id}\"");
        assert_eq!(reconstruct(&template, &mapping), b"src=\"\"");
    }

    #[test]
    fn verify_reports_first_differing_byte() {
        let check = verify_reconstruction(b"abcdef", b"abXdef");
        let ReconstructionCheck::Mismatch(mismatch) = check else {
            panic!("expected mismatch, got: {check:?}");
        };
        assert_eq!(mismatch.offset, 2);
        assert_eq!(mismatch.expected, Some(b'c'));
        assert_eq!(mismatch.actual, Some(b'X'));
    }

    #[test]
    fn verify_reports_length_mismatch_at_shorter_end() {
        let check = verify_reconstruction(b"abc", b"abcd");
        let ReconstructionCheck::Mismatch(mismatch) = check else {
            panic!("expected mismatch, got: {check:?}");
        };
        assert_eq!(mismatch.offset, 3);
        assert_eq!(mismatch.expected, None);
        assert_eq!(mismatch.actual, Some(b'd'));
    }

    #[test]
    fn identical_buffers_match() {
        assert!(verify_reconstruction(b"same", b"same").is_match());
        assert!(verify_reconstruction(b"", b"").is_match());
    }

    #[test]
    fn multibyte_text_survives_the_byte_pass() {
        let mut mapping = TemplateMapping::new();
        let id = Uuid::new_v4();
        mapping.insert(id, entry("caf\u{e9} \u{1f600}"));
        let template = format!("x {id} y");
        let out = reconstruct(&template, &mapping);
        assert_eq!(out, "x caf\u{e9} \u{1f600} y".as_bytes());
    }
}
