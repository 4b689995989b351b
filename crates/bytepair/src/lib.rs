#![warn(missing_docs, unused)]
//! # `bytepair` BPE Vocabulary Trainer
//!
//! This library trains a byte-pair encoding tokenizer vocabulary from a raw
//! UTF-8 text corpus.
//!
//! Given a target vocabulary size and an ordered set of special tokens, the
//! trainer produces:
//! * a vocabulary mapping integer token ids to byte strings, and
//! * an ordered list of merge rules, each a pair of byte strings whose
//!   concatenation formed a new token.
//!
//! ## Pipeline
//!
//! * [`chunking`] - partitions a corpus file into byte ranges aligned to a
//!   boundary token, so chunks can be counted independently.
//! * [`pretokenize`] - splits chunk text on special tokens, applies the
//!   fixed word split pattern, and reduces per-chunk counters into a global
//!   word count table. Chunks are counted in parallel with `rayon`.
//! * [`training`] - the incremental merge engine: maintains per-word token
//!   representations, a pair frequency table, and a pair-to-words index;
//!   repeatedly selects the best pair and re-expresses every affected word.
//! * [`vocab`] - the trained vocabulary type and its file IO.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bytepair::{PairVocabTrainer, PairVocabTrainerOptions};
//!
//! fn example() -> bytepair::BpResult<()> {
//!     let options = PairVocabTrainerOptions::new(
//!         1000,
//!         ["<|endoftext|>"],
//!     );
//!
//!     let mut trainer: PairVocabTrainer = options.init()?;
//!     trainer.update_from_path("corpus.txt", 8)?;
//!
//!     let trained = trainer.train::<u32>()?;
//!     println!("{} tokens, {} merges", trained.len(), trained.merges().len());
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod pretokenize;
pub mod training;
pub mod vocab;

mod errors;
mod types;

#[doc(inline)]
pub use errors::*;
#[doc(inline)]
pub use training::{PairVocabTrainer, PairVocabTrainerOptions};
#[doc(inline)]
pub use types::*;
#[doc(inline)]
pub use vocab::TrainedVocab;
