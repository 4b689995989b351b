//! # Word Split Pattern

use crate::errors::BpResult;

/// The fixed pretokenization pattern.
///
/// Matches, in order: common contraction suffixes, optionally
/// space-prefixed letter runs, digit runs, punctuation runs, whitespace not
/// followed by non-whitespace, and remaining whitespace.
///
/// The `(?!\S)` lookahead is outside what a DFA engine supports, so the
/// pattern compiles under `fancy_regex`.
pub const WORD_SPLIT_PATTERN: &str =
    r"'(?:[sdmt]|ll|ve|re)| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+(?!\S)|\s+";

/// Compile [`WORD_SPLIT_PATTERN`].
pub fn compile_word_pattern() -> BpResult<fancy_regex::Regex> {
    Ok(fancy_regex::Regex::new(WORD_SPLIT_PATTERN)?)
}
