//! # Parallel Pretokenizer
//!
//! Turns corpus text into a word-frequency table: text is split on the
//! special tokens (exact substring matches), the fixed word split pattern
//! is applied to each fragment, and the resulting pretokens are counted.
//!
//! The file driver counts chunks in parallel and reduces the chunk-local
//! counters; reduction order does not affect the result.

mod corpus;
mod counter;
mod pattern;
mod splitter;

#[doc(inline)]
pub use corpus::count_words_in_path;
#[doc(inline)]
pub use counter::PretokenCounter;
#[doc(inline)]
pub use pattern::{WORD_SPLIT_PATTERN, compile_word_pattern};
#[doc(inline)]
pub use splitter::SpecialSplitter;
