//! # Vocab Trainer

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use compact_str::CompactString;

use crate::errors::{BpResult, BytepairError};
use crate::pretokenize::{PretokenCounter, SpecialSplitter, count_words_in_path};
use crate::training::merge_state::MergeState;
use crate::types::{CountType, PretokenKey, TokenType};
use crate::vocab::TrainedVocab;

/// The size of the single-byte token space.
pub const U8_SIZE: usize = 256;

/// The affected-word-set size at which one merge iteration fans out to the
/// rayon pool. Below it, the per-word bookkeeping is cheaper than the
/// fork/join barrier.
pub const DEFAULT_PARALLEL_WORD_THRESHOLD: usize = 512;

/// Options for [`PairVocabTrainer`].
#[derive(Debug, Clone)]
pub struct PairVocabTrainerOptions {
    /// The target vocabulary size, counting the 256 byte tokens, the merge
    /// tokens, and the special tokens.
    pub vocab_size: usize,

    /// The special tokens, in id-assignment order. The first one is the
    /// chunk boundary token for file pretokenization.
    pub special_tokens: Vec<String>,

    /// See [`DEFAULT_PARALLEL_WORD_THRESHOLD`].
    pub parallel_word_threshold: usize,
}

impl PairVocabTrainerOptions {
    /// Create new options.
    ///
    /// ## Arguments
    /// * `vocab_size` - the target vocabulary size.
    /// * `special_tokens` - the special tokens, in id-assignment order.
    pub fn new<I, S>(
        vocab_size: usize,
        special_tokens: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            vocab_size,
            special_tokens: special_tokens
                .into_iter()
                .map(|s| s.as_ref().to_string())
                .collect(),
            parallel_word_threshold: DEFAULT_PARALLEL_WORD_THRESHOLD,
        }
    }

    /// Sets the vocab size.
    pub fn with_vocab_size(
        self,
        vocab_size: usize,
    ) -> Self {
        Self { vocab_size, ..self }
    }

    /// Sets the parallel word threshold.
    pub fn with_parallel_word_threshold(
        self,
        parallel_word_threshold: usize,
    ) -> Self {
        Self {
            parallel_word_threshold,
            ..self
        }
    }

    /// The number of merges this configuration will compute.
    ///
    /// ## Returns
    /// An error when `vocab_size` cannot hold the byte tokens plus the
    /// special tokens.
    pub fn num_merges(&self) -> BpResult<usize> {
        let floor = U8_SIZE + self.special_tokens.len();
        if self.vocab_size < floor {
            return Err(BytepairError::VocabSizeTooSmall {
                size: self.vocab_size,
                floor,
                specials: self.special_tokens.len(),
            });
        }
        Ok(self.vocab_size - floor)
    }

    /// Initializes a [`PairVocabTrainer`] from these options.
    pub fn init<K, C>(self) -> BpResult<PairVocabTrainer<K, C>>
    where
        K: PretokenKey,
        C: CountType,
    {
        PairVocabTrainer::new(self)
    }
}

/// Trainer for learning byte-pair vocabularies.
///
/// Accumulates a pretoken count table from text samples or corpus files,
/// then runs the merge loop to the target vocabulary size.
///
/// # Parameters
/// * `K` - the type used to store pretoken keys.
/// * `C` - the type used to store counts.
pub struct PairVocabTrainer<K = CompactString, C = i64>
where
    K: PretokenKey,
    C: CountType,
{
    /// Trainer options.
    pub options: PairVocabTrainerOptions,

    /// The pretoken counter.
    pub counter: PretokenCounter<K, C>,

    halt: Arc<AtomicBool>,
}

impl<K, C> PairVocabTrainer<K, C>
where
    K: PretokenKey,
    C: CountType,
{
    /// Initializes a [`PairVocabTrainer`].
    pub fn new(options: PairVocabTrainerOptions) -> BpResult<Self> {
        let splitter = SpecialSplitter::new(&options.special_tokens)?;
        let counter = PretokenCounter::new(splitter)?;

        Ok(Self {
            options,
            counter,
            halt: Arc::new(AtomicBool::new(false)),
        })
    }

    /// A cooperative cancellation handle.
    ///
    /// Setting the flag stops training after the iteration in flight; the
    /// partial result is still internally consistent.
    pub fn halt_handle(&self) -> Arc<AtomicBool> {
        self.halt.clone()
    }

    /// Update pretoken counts inplace from text.
    pub fn update_from_text(
        &mut self,
        text: &str,
    ) -> BpResult<()> {
        self.counter.update_from_text(text)
    }

    /// Update pretoken counts inplace from a sample iterator.
    pub fn update_from_samples<I>(
        &mut self,
        samples: I,
    ) -> BpResult<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.counter.update_from_samples(samples)
    }

    /// Update pretoken counts from a corpus file, chunked in parallel.
    ///
    /// Requires at least one special token to align chunk boundaries on;
    /// see [`count_words_in_path`].
    pub fn update_from_path<P: AsRef<Path>>(
        &mut self,
        path: P,
        desired_chunks: usize,
    ) -> BpResult<()> {
        let counts =
            count_words_in_path(path, &self.options.special_tokens, desired_chunks)?;
        self.counter.absorb(counts);
        Ok(())
    }

    /// Run the merge loop and produce the trained vocabulary.
    ///
    /// Merges until the vocabulary reaches the target size, or the corpus
    /// runs out of mergeable pairs (a short result, not an error), or the
    /// halt flag is raised.
    pub fn train<T>(self) -> BpResult<TrainedVocab>
    where
        T: TokenType,
    {
        let num_merges = self.options.num_merges()?;
        if T::from_usize(self.options.vocab_size.saturating_sub(1)).is_none() {
            return Err(BytepairError::VocabSizeOverflow {
                size: self.options.vocab_size,
            });
        }

        let word_counts: Vec<(Vec<u8>, C)> = self
            .counter
            .release()
            .into_iter()
            .map(|(k, c)| (k.as_ref().as_bytes().to_vec(), c))
            .collect();

        log::info!(
            "Starting BPE training: {} words, {} merges to compute",
            word_counts.len(),
            num_merges,
        );

        let mut state: MergeState<T, C> =
            MergeState::from_word_counts(word_counts, self.options.parallel_word_threshold);

        log::info!("Built pair index: {} unique pairs", state.live_pairs());

        let mut merges_done = 0;
        let mut last_log_percent = 0;

        while merges_done < num_merges {
            if self.halt.load(Ordering::Relaxed) {
                log::warn!("Training halted after {merges_done}/{num_merges} merges");
                break;
            }

            if state.step().is_none() {
                log::warn!(
                    "Corpus exhausted of mergeable pairs after {merges_done}/{num_merges} merges",
                );
                break;
            }
            merges_done += 1;

            // Log progress every 1%
            let current_percent = (merges_done * 100) / num_merges;
            if current_percent > last_log_percent {
                log::info!("Progress: {current_percent}% ({merges_done}/{num_merges} merges)");
                last_log_percent = current_percent;
            }
        }

        log::info!("Finished training: {merges_done} merges completed");
        Ok(state.into_trained(&self.options.special_tokens))
    }
}
