use crate::error::Result;
use crate::position::{byte_offset, char_len, normalize_index, normalize_range};

/// Insert `insertion` before the code point at `index`. `index == len`
/// appends; negative indices count from the end, so `-1` inserts before the
/// last code point. The input is never mutated.
pub fn insert_at_index(text: &str, index: i64, insertion: &str) -> Result<String> {
    let len = char_len(text);
    let at = normalize_index(index, len, true)?;
    let b = byte_offset(text, at);
    let mut out = String::with_capacity(text.len() + insertion.len());
    out.push_str(&text[..b]);
    out.push_str(insertion);
    out.push_str(&text[b..]);
    Ok(out)
}

/// Remove the code points in `[start, end)`.
pub fn delete_range(text: &str, start: i64, end: i64) -> Result<String> {
    replace_range(text, start, end, "")
}

/// Replace the code points in `[start, end)` with `replacement`, which may
/// be any length (including empty).
pub fn replace_range(text: &str, start: i64, end: i64, replacement: &str) -> Result<String> {
    let len = char_len(text);
    let (s, e) = normalize_range(Some(start), Some(end), len)?;
    let sb = byte_offset(text, s);
    let eb = byte_offset(text, e);
    let mut out = String::with_capacity(text.len() - (eb - sb) + replacement.len());
    out.push_str(&text[..sb]);
    out.push_str(replacement);
    out.push_str(&text[eb..]);
    Ok(out)
}
