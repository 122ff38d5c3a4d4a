//! Attribute extraction: locate the semantically loaded sub-values of an
//! element record body.
//!
//! Pure function over the record body, dispatched on the leading tag token.
//! Every extracted value carries its exact byte span inside the record body,
//! so identical values in different attributes stay distinguishable and the
//! templating engine can substitute the specific occurrence.
//!
//! Multi-value attributes are split: `srcset` yields one value per URL, with
//! width/density descriptors left literal, so repeated descriptors never
//! share an identifier.

use markup::Span;
use memchr::memmem;

/// One extracted value, positioned inside the record body it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedValue {
    pub element_type: String,
    pub attribute_name: String,
    pub span: Span,
}

/// Extract values from an element record body (brackets included).
pub fn extract_values(record_body: &str) -> Vec<ExtractedValue> {
    let (inner, offset) = tag_inner(record_body);
    let Some(tag) = leading_tag_token(inner) else {
        return Vec::new();
    };
    match tag.as_str() {
        "a" => anchor_values(inner, offset),
        "img" => image_values(inner, offset),
        "meta" => vec![whole_body_value("meta", "entire_tag", inner, offset)],
        _ => vec![whole_body_value(&tag, "general", inner, offset)],
    }
}

// Body text between the brackets, plus its offset within the record body.
fn tag_inner(record_body: &str) -> (&str, usize) {
    let bytes = record_body.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'<' && bytes[bytes.len() - 1] == b'>' {
        (&record_body[1..record_body.len() - 1], 1)
    } else {
        (record_body, 0)
    }
}

fn leading_tag_token(inner: &str) -> Option<String> {
    let token = inner.split_whitespace().next()?;
    let token = token.strip_prefix('/').unwrap_or(token);
    if token.is_empty() {
        return None;
    }
    Some(token.to_ascii_lowercase())
}

fn anchor_values(inner: &str, offset: usize) -> Vec<ExtractedValue> {
    let mut out = Vec::new();
    if let Some(span) = attribute_value_span(inner, "href") {
        out.push(value("a", "href", span, offset));
    }
    if let Some(span) = attribute_value_span(inner, "title") {
        out.push(value("a", "title", span, offset));
    }
    out
}

fn image_values(inner: &str, offset: usize) -> Vec<ExtractedValue> {
    let mut out = Vec::new();
    if let Some(span) = attribute_value_span(inner, "src") {
        out.push(value("img", "src", span, offset));
    }
    if let Some(span) = attribute_value_span(inner, "alt") {
        out.push(value("img", "alt", span, offset));
    }
    if let Some(span) = attribute_value_span(inner, "srcset") {
        for url in srcset_url_spans(inner, span) {
            out.push(value("img", "srcset", url, offset));
        }
    }
    if let Some(span) = attribute_value_span(inner, "sizes") {
        out.push(value("img", "sizes", span, offset));
    }
    out
}

fn whole_body_value(
    element_type: &str,
    attribute_name: &str,
    inner: &str,
    offset: usize,
) -> ExtractedValue {
    ExtractedValue {
        element_type: element_type.to_string(),
        attribute_name: attribute_name.to_string(),
        span: Span::new(offset, offset + inner.len()),
    }
}

fn value(element_type: &str, attribute_name: &str, span: Span, offset: usize) -> ExtractedValue {
    ExtractedValue {
        element_type: element_type.to_string(),
        attribute_name: attribute_name.to_string(),
        span: Span::new(span.start + offset, span.end + offset),
    }
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

/// Find the value span of `name="..."` (or `'...'`, or unquoted) in `body`.
///
/// `src` must not match inside `srcset`: the name match requires a
/// non-name byte on both sides before the `=` is looked for.
fn attribute_value_span(body: &str, name: &str) -> Option<Span> {
    let bytes = body.as_bytes();
    let len = bytes.len();
    for start in memmem::find_iter(bytes, name.as_bytes()) {
        if start > 0 && is_name_byte(bytes[start - 1]) {
            continue;
        }
        let mut k = start + name.len();
        if k < len && is_name_byte(bytes[k]) {
            continue;
        }
        while k < len && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        if k >= len || bytes[k] != b'=' {
            continue;
        }
        k += 1;
        while k < len && bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        if k >= len {
            continue;
        }
        if bytes[k] == b'"' || bytes[k] == b'\'' {
            let quote = bytes[k];
            k += 1;
            let vstart = k;
            while k < len && bytes[k] != quote {
                k += 1;
            }
            if k >= len {
                // Unterminated quote: no reliable value end.
                continue;
            }
            return Some(Span::new(vstart, k));
        }
        let vstart = k;
        while k < len && !bytes[k].is_ascii_whitespace() {
            k += 1;
        }
        if k > vstart {
            return Some(Span::new(vstart, k));
        }
    }
    None
}

// One span per comma-separated entry's URL; descriptors stay literal.
fn srcset_url_spans(body: &str, value: Span) -> Vec<Span> {
    let bytes = body.as_bytes();
    let mut out = Vec::new();
    let mut i = value.start;
    while i < value.end {
        while i < value.end && (bytes[i].is_ascii_whitespace() || bytes[i] == b',') {
            i += 1;
        }
        let url_start = i;
        while i < value.end && !bytes[i].is_ascii_whitespace() && bytes[i] != b',' {
            i += 1;
        }
        if i > url_start {
            out.push(Span::new(url_start, i));
        }
        while i < value.end && bytes[i] != b',' {
            i += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(body: &str) -> Vec<(String, String, String)> {
        extract_values(body)
            .into_iter()
            .map(|v| {
                (
                    v.element_type,
                    v.attribute_name,
                    v.span.slice(body).to_string(),
                )
            })
            .collect()
    }

    fn triple(a: &str, b: &str, c: &str) -> (String, String, String) {
        (a.to_string(), b.to_string(), c.to_string())
    }

    #[test]
    fn image_src_and_alt_are_extracted() {
        assert_eq!(
            extracted("<img src=\"a.jpg\" alt=\"Logo\">"),
            vec![triple("img", "src", "a.jpg"), triple("img", "alt", "Logo")]
        );
    }

    #[test]
    fn anchor_href_alone() {
        assert_eq!(
            extracted("<a href=\"#x\">"),
            vec![triple("a", "href", "#x")]
        );
    }

    #[test]
    fn anchor_href_and_title() {
        assert_eq!(
            extracted("<a href=\"#x\" title=\"Go\">"),
            vec![triple("a", "href", "#x"), triple("a", "title", "Go")]
        );
    }

    #[test]
    fn anchor_without_href_yields_nothing() {
        assert_eq!(extracted("<a name=\"top\">"), Vec::new());
    }

    #[test]
    fn meta_is_extracted_wholesale() {
        let body = "<meta name=\"description\" content=\"secret\">";
        assert_eq!(
            extracted(body),
            vec![triple(
                "meta",
                "entire_tag",
                "meta name=\"description\" content=\"secret\""
            )]
        );
    }

    #[test]
    fn unknown_tag_falls_back_to_general() {
        assert_eq!(
            extracted("<link rel=\"stylesheet\" href=\"s.css\">"),
            vec![triple("link", "general", "link rel=\"stylesheet\" href=\"s.css\"")]
        );
    }

    #[test]
    fn srcset_splits_into_one_value_per_url() {
        let body = "<img srcset=\"a.jpg 1x, b.jpg 2x, c.jpg\">";
        assert_eq!(
            extracted(body),
            vec![
                triple("img", "srcset", "a.jpg"),
                triple("img", "srcset", "b.jpg"),
                triple("img", "srcset", "c.jpg"),
            ]
        );
    }

    #[test]
    fn srcset_with_repeated_descriptors_keeps_urls_independent() {
        let body = "<img srcset=\"x.png 2x, y.png 2x\">";
        let values = extract_values(body);
        assert_eq!(values.len(), 2);
        assert_ne!(values[0].span, values[1].span);
    }

    #[test]
    fn src_does_not_match_inside_srcset() {
        let body = "<img srcset=\"a.jpg 1x\">";
        let names: Vec<String> = extract_values(body)
            .into_iter()
            .map(|v| v.attribute_name)
            .collect();
        assert_eq!(names, vec!["srcset"]);
    }

    #[test]
    fn single_quoted_and_unquoted_values_are_accepted() {
        assert_eq!(
            extracted("<a href='#y'>"),
            vec![triple("a", "href", "#y")]
        );
        assert_eq!(
            extracted("<img src=bare.png>"),
            vec![triple("img", "src", "bare.png")]
        );
    }

    #[test]
    fn spaced_equals_is_accepted() {
        assert_eq!(
            extracted("<a href = \"#z\">"),
            vec![triple("a", "href", "#z")]
        );
    }

    #[test]
    fn empty_quoted_value_yields_empty_span() {
        let values = extract_values("<img src=\"\" alt=\"x\">");
        assert_eq!(values[0].attribute_name, "src");
        assert!(values[0].span.is_empty());
    }

    #[test]
    fn unterminated_quote_is_skipped() {
        assert_eq!(extracted("<a href=\"broken>"), Vec::new());
    }

    #[test]
    fn closing_tag_dispatches_on_stripped_name() {
        // A closing anchor has no attributes; nothing comes back.
        assert_eq!(extracted("</a>"), Vec::new());
    }

    #[test]
    fn spans_are_relative_to_the_record_body() {
        let body = "<img src=\"p.png\">";
        let values = extract_values(body);
        assert_eq!(values[0].span.slice(body), "p.png");
        assert_eq!(values[0].span, Span::new(10, 15));
    }
}
