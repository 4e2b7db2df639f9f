use crate::error::{OpError, Result};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

/// One regex match with its span in code-point units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexMatch {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "match")]
    pub matched: String,
}

/// Compiled-pattern size cap in bytes; tunable via CHARIDX_REGEX_SIZE_LIMIT.
const DEFAULT_SIZE_LIMIT: usize = 10 * (1 << 20);

fn size_limit() -> usize {
    std::env::var("CHARIDX_REGEX_SIZE_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SIZE_LIMIT)
}

/// All non-overlapping matches of `pattern`, left to right, with spans
/// reported over the original input. The regex engine is linear-time, so a
/// pathological pattern cannot hang a call; an oversized compilation is
/// rejected as an invalid pattern instead.
pub fn find_regex_matches(text: &str, pattern: &str) -> Result<Vec<RegexMatch>> {
    let re = RegexBuilder::new(pattern)
        .size_limit(size_limit())
        .build()
        .map_err(|e| OpError::InvalidPattern(e.to_string()))?;

    let mut out = Vec::new();
    // matches come back ordered by byte offset, so char offsets can be
    // computed incrementally instead of re-counting from the start
    let mut prev_byte = 0usize;
    let mut prev_char = 0usize;
    for m in re.find_iter(text) {
        let start = prev_char + text[prev_byte..m.start()].chars().count();
        let end = start + m.as_str().chars().count();
        out.push(RegexMatch {
            start,
            end,
            matched: m.as_str().to_string(),
        });
        prev_byte = m.end();
        prev_char = end;
    }
    Ok(out)
}
