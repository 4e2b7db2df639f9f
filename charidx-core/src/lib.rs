//! Index-based text transformation engine.
//!
//! Every operation is a pure function over its input text. Offsets are
//! Unicode code points throughout (not bytes, not grapheme clusters),
//! zero-based, with range ends exclusive. Negative indices count from the
//! end of the text (`-1` is the last code point). All positions reported to
//! callers refer to the original input, never to an intermediate copy.

pub mod error;
pub mod extract;
pub mod find;
pub mod markers;
pub mod modify;
pub mod pattern;
pub mod position;
pub mod split;

pub use error::{OpError, Result};
pub use extract::{count_chars, extract_substrings, CharStats, Extracted, RangeSpec};
pub use find::{
    find_all_char_indices, find_all_substring_indices, find_nth_char, find_nth_substring,
};
pub use markers::{extract_between_markers, MarkerSpan};
pub use modify::{delete_range, insert_at_index, replace_range};
pub use pattern::{find_regex_matches, RegexMatch};
pub use position::{char_len, normalize_index, normalize_range, slice_chars};
pub use split::split_at_indices;
