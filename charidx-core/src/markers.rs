use crate::error::{OpError, Result};
use serde::Serialize;

/// A marker-delimited region. `content_*` bound the text strictly between
/// the markers; `full_*` span the markers themselves. All offsets are
/// code-point units over the original input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerSpan {
    pub content: String,
    pub content_start: usize,
    pub content_end: usize,
    pub full_start: usize,
    pub full_end: usize,
}

/// Extract the `occurrence`-th (1-based) region between `start_marker` and
/// `end_marker`. Start markers are scanned non-overlapping, left to right;
/// each pairs with the first end marker beginning at or after its own end,
/// so two start markers may share one end marker. A start marker with no
/// end marker after it is skipped. An empty `end_marker` is the one special
/// case: the content of every span runs to the end of the text.
pub fn extract_between_markers(
    text: &str,
    start_marker: &str,
    end_marker: &str,
    occurrence: i64,
) -> Result<MarkerSpan> {
    if start_marker.is_empty() {
        return Err(OpError::invalid_argument("start_marker cannot be empty"));
    }
    if occurrence < 1 {
        return Err(OpError::invalid_argument("occurrence must be >= 1"));
    }
    let occurrence = occurrence as usize;
    let start_marker_chars = start_marker.chars().count();
    let end_marker_chars = end_marker.chars().count();

    let mut found = 0usize;
    let mut byte = 0usize;
    let mut chars_before = 0usize;
    while let Some(pos) = text[byte..].find(start_marker) {
        let abs = byte + pos;
        let full_start = chars_before + text[byte..abs].chars().count();
        let content_start = full_start + start_marker_chars;
        let content_byte = abs + start_marker.len();

        if end_marker.is_empty() {
            found += 1;
            if found == occurrence {
                let content = &text[content_byte..];
                let content_end = content_start + content.chars().count();
                return Ok(MarkerSpan {
                    content: content.to_string(),
                    content_start,
                    content_end,
                    full_start,
                    full_end: content_end,
                });
            }
        } else {
            match text[content_byte..].find(end_marker) {
                Some(rel) => {
                    found += 1;
                    if found == occurrence {
                        let content = &text[content_byte..content_byte + rel];
                        let content_end = content_start + content.chars().count();
                        return Ok(MarkerSpan {
                            content: content.to_string(),
                            content_start,
                            content_end,
                            full_start,
                            full_end: content_end + end_marker_chars,
                        });
                    }
                }
                // no end marker remains, so no later start marker can pair
                None => break,
            }
        }

        chars_before = content_start;
        byte = content_byte;
    }

    Err(OpError::not_found(format!(
        "{} complete marker span(s) found, occurrence {} requested",
        found, occurrence
    )))
}
