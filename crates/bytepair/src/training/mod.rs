//! # Merge Engine and Trainer
//!
//! The incremental merge engine maintains, across iterations:
//!
//! * a representation per word (its current token sequence),
//! * a pair frequency table, and
//! * an index from pairs to the words containing them.
//!
//! Each iteration selects the pair maximizing `(count, pair bytes)`,
//! replaces its occurrences in every affected word, and incrementally
//! updates both tables from per-word deltas, so selection never rescans
//! the corpus.

mod merge_state;
mod pair_table;
mod trainer;
mod word_rep;

#[doc(inline)]
pub use merge_state::MergeState;
#[doc(inline)]
pub use pair_table::{PairCountMap, PairTable, PairWordMap};
#[doc(inline)]
pub use trainer::{
    DEFAULT_PARALLEL_WORD_THRESHOLD, PairVocabTrainer, PairVocabTrainerOptions, U8_SIZE,
};
#[doc(inline)]
pub use word_rep::WordRep;
