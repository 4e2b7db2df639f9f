use crate::error::Result;
use crate::position::{char_len, normalize_range, slice_chars};
use serde::{Deserialize, Serialize};

/// One requested range; either bound may be omitted (`start` defaults to 0,
/// `end` to the text length) and either may be negative.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct RangeSpec {
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
}

/// One extracted range with its normalized bounds. `length` is in code
/// points, matching `end - start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extracted {
    pub start: usize,
    pub end: usize,
    pub substring: String,
    pub length: usize,
}

/// Character-class statistics. Every code point lands in exactly one of the
/// four buckets, so they sum to `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CharStats {
    pub total: usize,
    pub letters: usize,
    pub digits: usize,
    pub whitespace: usize,
    pub other: usize,
}

/// Extract every requested range in one call. The batch is atomic: if any
/// single range fails to normalize, the whole call fails with that range's
/// error and no partial results are returned.
pub fn extract_substrings(text: &str, ranges: &[RangeSpec]) -> Result<Vec<Extracted>> {
    let len = char_len(text);
    let mut out = Vec::with_capacity(ranges.len());
    for r in ranges {
        let (start, end) = normalize_range(r.start, r.end, len)?;
        out.push(Extracted {
            start,
            end,
            substring: slice_chars(text, start, end).to_string(),
            length: end - start,
        });
    }
    Ok(out)
}

/// Total code-point count plus letter/digit/whitespace/other breakdown,
/// using the Unicode character categories (`char::is_alphabetic` etc.).
pub fn count_chars(text: &str) -> CharStats {
    let mut stats = CharStats::default();
    for c in text.chars() {
        stats.total += 1;
        if c.is_alphabetic() {
            stats.letters += 1;
        } else if c.is_numeric() {
            stats.digits += 1;
        } else if c.is_whitespace() {
            stats.whitespace += 1;
        } else {
            stats.other += 1;
        }
    }
    stats
}
