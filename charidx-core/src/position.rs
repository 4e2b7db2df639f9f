use crate::error::{OpError, Result};

/// Length of `text` in code points (never bytes).
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the `idx`-th code point. `idx == char_len(text)` maps to
/// the end of the string.
pub fn byte_offset(text: &str, idx: usize) -> usize {
    text.char_indices().nth(idx).map(|(b, _)| b).unwrap_or(text.len())
}

/// Slice `[start, end)` in code-point units. Bounds must already be
/// normalized; `start <= end <= char_len(text)`.
pub fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let s = byte_offset(text, start);
    let e = byte_offset(text, end);
    &text[s..e]
}

/// Map `index` into `[0, len]` (insertion points) or `[0, len)` (element
/// access, `allow_equal_len = false`). Negative values count from the end:
/// `-1` is the last code point. A value that stays out of bounds fails;
/// nothing is clamped.
pub fn normalize_index(index: i64, len: usize, allow_equal_len: bool) -> Result<usize> {
    let shifted = if index < 0 { index + len as i64 } else { index };
    let upper = if allow_equal_len { len as i64 } else { len as i64 - 1 };
    if shifted < 0 || shifted > upper {
        return Err(OpError::out_of_bounds(index, len));
    }
    Ok(shifted as usize)
}

/// Normalize an optional `[start, end)` pair. Omitted bounds default to `0`
/// and `len`, so `{start: 2}` means "from 2 to the end" and `{end: -1}`
/// means "from the start up to the last code point".
pub fn normalize_range(start: Option<i64>, end: Option<i64>, len: usize) -> Result<(usize, usize)> {
    let start = match start {
        Some(v) => normalize_index(v, len, true)?,
        None => 0,
    };
    let end = match end {
        Some(v) => normalize_index(v, len, true)?,
        None => len,
    };
    if start > end {
        return Err(OpError::InvalidRange { start, end });
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_len_counts_code_points() {
        assert_eq!(char_len(""), 0);
        assert_eq!(char_len("abc"), 3);
        assert_eq!(char_len("héllo"), 5);
        assert_eq!(char_len("日本語"), 3);
    }

    #[test]
    fn slice_chars_respects_multibyte_boundaries() {
        assert_eq!(slice_chars("日本語", 1, 3), "本語");
        assert_eq!(slice_chars("héllo", 0, 2), "hé");
        assert_eq!(slice_chars("abc", 1, 1), "");
    }

    #[test]
    fn normalize_positive_in_bounds() {
        assert_eq!(normalize_index(0, 5, false).unwrap(), 0);
        assert_eq!(normalize_index(4, 5, false).unwrap(), 4);
        assert_eq!(normalize_index(5, 5, true).unwrap(), 5);
    }

    #[test]
    fn normalize_negative_counts_from_end() {
        assert_eq!(normalize_index(-1, 5, false).unwrap(), 4);
        assert_eq!(normalize_index(-5, 5, false).unwrap(), 0);
        assert_eq!(normalize_index(-1, 5, true).unwrap(), 4);
    }

    #[test]
    fn normalize_rejects_out_of_bounds() {
        assert!(matches!(normalize_index(5, 5, false), Err(OpError::IndexOutOfRange(_))));
        assert!(matches!(normalize_index(6, 5, true), Err(OpError::IndexOutOfRange(_))));
        assert!(matches!(normalize_index(-6, 5, true), Err(OpError::IndexOutOfRange(_))));
    }

    #[test]
    fn element_access_on_empty_text_always_fails() {
        assert!(normalize_index(0, 0, false).is_err());
        // but insertion point 0 on empty text is fine
        assert_eq!(normalize_index(0, 0, true).unwrap(), 0);
    }

    #[test]
    fn range_defaults_cover_whole_text() {
        assert_eq!(normalize_range(None, None, 7).unwrap(), (0, 7));
        assert_eq!(normalize_range(Some(2), None, 7).unwrap(), (2, 7));
        assert_eq!(normalize_range(None, Some(-2), 7).unwrap(), (0, 5));
    }

    #[test]
    fn range_rejects_inverted_bounds() {
        assert_eq!(
            normalize_range(Some(4), Some(2), 7),
            Err(OpError::InvalidRange { start: 4, end: 2 })
        );
        // inversion produced by normalization, not by the raw values
        assert!(normalize_range(Some(-1), Some(1), 7).is_err());
    }

    #[test]
    fn empty_range_is_valid() {
        assert_eq!(normalize_range(Some(3), Some(3), 7).unwrap(), (3, 3));
    }
}
