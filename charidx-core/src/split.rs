use crate::error::{OpError, Result};
use crate::position::{char_len, normalize_index, slice_chars};

/// Split `text` at the given cut points. Raw indices are sorted and
/// deduplicated before normalization; two distinct raw indices that
/// normalize to the same position (e.g. `-1` and `len - 1`) are rejected.
/// Returns `cuts + 1` segments whose concatenation equals `text`; a cut at
/// `0` or `len` yields an empty edge segment.
pub fn split_at_indices(text: &str, indices: &[i64]) -> Result<Vec<String>> {
    let len = char_len(text);

    let mut raw: Vec<i64> = indices.to_vec();
    raw.sort_unstable();
    raw.dedup();

    // raw order does not survive normalization once negatives are involved
    let mut cuts: Vec<(i64, usize)> = Vec::with_capacity(raw.len());
    for &idx in &raw {
        cuts.push((idx, normalize_index(idx, len, true)?));
    }
    cuts.sort_by_key(|&(_, pos)| pos);
    for w in cuts.windows(2) {
        if w[0].1 == w[1].1 {
            return Err(OpError::IndexOutOfRange(format!(
                "indices {} and {} both normalize to cut point {}",
                w[0].0, w[1].0, w[0].1
            )));
        }
    }

    let mut out = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0usize;
    for &(_, pos) in &cuts {
        out.push(slice_chars(text, start, pos).to_string());
        start = pos;
    }
    out.push(slice_chars(text, start, len).to_string());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_given_positions() {
        assert_eq!(
            split_at_indices("hello world", &[2, 5, 8]).unwrap(),
            vec!["he", "llo", " wo", "rld"]
        );
    }

    #[test]
    fn no_indices_returns_whole_text() {
        assert_eq!(split_at_indices("abc", &[]).unwrap(), vec!["abc"]);
    }

    #[test]
    fn concatenation_round_trips() {
        let text = "The quick brown fox";
        for indices in [vec![0], vec![19], vec![3, 9, 15], vec![9, 3, 15, 3]] {
            let parts = split_at_indices(text, &indices).unwrap();
            assert_eq!(parts.concat(), text, "indices {:?}", indices);
        }
    }

    #[test]
    fn raw_duplicates_are_collapsed() {
        assert_eq!(split_at_indices("abcd", &[2, 2, 2]).unwrap(), vec!["ab", "cd"]);
    }

    #[test]
    fn edge_cuts_yield_empty_segments() {
        assert_eq!(split_at_indices("ab", &[0]).unwrap(), vec!["", "ab"]);
        assert_eq!(split_at_indices("ab", &[2]).unwrap(), vec!["ab", ""]);
    }

    #[test]
    fn negative_indices_cut_from_the_end() {
        assert_eq!(split_at_indices("hello", &[-2]).unwrap(), vec!["hel", "lo"]);
    }

    #[test]
    fn out_of_bounds_index_fails() {
        assert_eq!(split_at_indices("abc", &[4]).unwrap_err().kind(), "IndexOutOfRange");
        assert_eq!(split_at_indices("abc", &[-4]).unwrap_err().kind(), "IndexOutOfRange");
    }

    #[test]
    fn collision_after_normalization_fails() {
        // -1 and 3 both land on cut point 3 of "abcd"
        let err = split_at_indices("abcd", &[-1, 3]).unwrap_err();
        assert_eq!(err.kind(), "IndexOutOfRange");
    }

    #[test]
    fn cuts_count_code_points() {
        assert_eq!(split_at_indices("日本語", &[1]).unwrap(), vec!["日", "本語"]);
    }
}
