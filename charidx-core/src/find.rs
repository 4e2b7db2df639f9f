use crate::error::{OpError, Result};

/// Validate a needle that must be exactly one code point.
fn single_char(ch: &str) -> Result<char> {
    let mut it = ch.chars();
    match (it.next(), it.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(OpError::invalid_argument("char must be a single character")),
    }
}

/// Validate a 1-based occurrence ordinal.
fn ordinal(n: i64) -> Result<usize> {
    if n < 1 {
        return Err(OpError::invalid_argument("n must be >= 1"));
    }
    Ok(n as usize)
}

/// Code-point index of the nth (1-based) occurrence of `ch`.
pub fn find_nth_char(text: &str, ch: &str, n: i64) -> Result<usize> {
    let target = single_char(ch)?;
    let n = ordinal(n)?;
    let mut seen = 0usize;
    for (i, c) in text.chars().enumerate() {
        if c == target {
            seen += 1;
            if seen == n {
                return Ok(i);
            }
        }
    }
    Err(OpError::not_found(format!(
        "{:?} occurs {} time(s), occurrence {} requested",
        target, seen, n
    )))
}

/// Every code-point index where `ch` occurs, in order. Empty if none.
pub fn find_all_char_indices(text: &str, ch: &str) -> Result<Vec<usize>> {
    let target = single_char(ch)?;
    Ok(text
        .chars()
        .enumerate()
        .filter(|(_, c)| *c == target)
        .map(|(i, _)| i)
        .collect())
}

/// Every start index of `substring`, left to right, non-overlapping: after
/// a match the scan resumes at the match end, so "aa" occurs once in "aaa".
pub fn find_all_substring_indices(text: &str, substring: &str) -> Result<Vec<usize>> {
    if substring.is_empty() {
        return Err(OpError::invalid_argument("substring cannot be empty"));
    }
    let needle_chars = substring.chars().count();
    let mut out = Vec::new();
    let mut byte = 0usize;
    let mut chars_before = 0usize;
    while let Some(pos) = text[byte..].find(substring) {
        let abs = byte + pos;
        chars_before += text[byte..abs].chars().count();
        out.push(chars_before);
        chars_before += needle_chars;
        byte = abs + substring.len();
    }
    Ok(out)
}

/// Start index of the nth (1-based) non-overlapping occurrence of `substring`.
pub fn find_nth_substring(text: &str, substring: &str, n: i64) -> Result<usize> {
    let n = ordinal(n)?;
    let hits = find_all_substring_indices(text, substring)?;
    hits.get(n - 1).copied().ok_or_else(|| {
        OpError::not_found(format!(
            "{:?} occurs {} time(s), occurrence {} requested",
            substring,
            hits.len(),
            n
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nth_char_counts_occurrences() {
        assert_eq!(find_nth_char("hello world", "l", 1).unwrap(), 2);
        assert_eq!(find_nth_char("hello world", "l", 2).unwrap(), 3);
        assert_eq!(find_nth_char("hello world", "l", 3).unwrap(), 9);
    }

    #[test]
    fn nth_char_beyond_count_is_not_found() {
        let err = find_nth_char("hello", "l", 3).unwrap_err();
        assert_eq!(err.kind(), "NotFound");
        assert!(find_nth_char("hello", "z", 1).is_err());
    }

    #[test]
    fn nth_char_validates_needle_and_ordinal() {
        assert_eq!(find_nth_char("abc", "", 1).unwrap_err().kind(), "InvalidArgument");
        assert_eq!(find_nth_char("abc", "ab", 1).unwrap_err().kind(), "InvalidArgument");
        assert_eq!(find_nth_char("abc", "a", 0).unwrap_err().kind(), "InvalidArgument");
        assert_eq!(find_nth_char("abc", "a", -2).unwrap_err().kind(), "InvalidArgument");
    }

    #[test]
    fn char_indices_in_code_point_units() {
        assert_eq!(find_all_char_indices("日本日本", "本").unwrap(), vec![1, 3]);
        // a multi-byte needle is still one code point
        assert_eq!(find_nth_char("aé é", "é", 2).unwrap(), 3);
    }

    #[test]
    fn all_char_indices_agrees_with_nth() {
        let text = "mississippi";
        let all = find_all_char_indices(text, "s").unwrap();
        assert_eq!(all, vec![2, 3, 5, 6]);
        for (i, &idx) in all.iter().enumerate() {
            assert_eq!(find_nth_char(text, "s", i as i64 + 1).unwrap(), idx);
        }
    }

    #[test]
    fn no_occurrences_is_empty_not_error() {
        assert_eq!(find_all_char_indices("abc", "z").unwrap(), Vec::<usize>::new());
        assert_eq!(find_all_substring_indices("abc", "zz").unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn substring_scan_is_non_overlapping() {
        assert_eq!(find_all_substring_indices("aaa", "aa").unwrap(), vec![0]);
        assert_eq!(find_all_substring_indices("aaaa", "aa").unwrap(), vec![0, 2]);
        assert_eq!(find_all_substring_indices("abab", "ab").unwrap(), vec![0, 2]);
    }

    #[test]
    fn substring_indices_in_code_point_units() {
        assert_eq!(find_all_substring_indices("日本語で日本語", "日本").unwrap(), vec![0, 4]);
        assert_eq!(find_nth_substring("日本語で日本語", "日本", 2).unwrap(), 4);
    }

    #[test]
    fn empty_substring_is_invalid() {
        assert_eq!(
            find_all_substring_indices("abc", "").unwrap_err().kind(),
            "InvalidArgument"
        );
        assert_eq!(find_nth_substring("abc", "", 1).unwrap_err().kind(), "InvalidArgument");
    }

    #[test]
    fn nth_substring_beyond_count_is_not_found() {
        assert_eq!(find_nth_substring("abab", "ab", 3).unwrap_err().kind(), "NotFound");
    }
}
