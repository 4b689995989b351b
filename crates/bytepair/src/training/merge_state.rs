//! # Incremental Merge Engine

use core::cmp::Ordering;

use dary_heap::OctonaryHeap;
use rayon::prelude::*;

use crate::training::pair_table::{PairCountMap, PairTable, PairWordMap};
use crate::training::word_rep::WordRep;
use crate::types::{CommonHashMap, CommonHashSet, CountType, Pair, TokenType};
use crate::vocab::{ByteTokenTable, TrainedVocab};

/// A candidate merge in the selection heap.
///
/// Max-heap by count; ties break to the lexicographically greatest pair,
/// compared by the token byte strings (not the token ids, whose order
/// reflects creation time rather than byte order).
#[derive(Debug, Eq)]
struct MergeJob<T: TokenType, C: CountType> {
    /// The number of corpus occurrences of this pair when pushed.
    count: C,

    /// The left token's byte string.
    left: Vec<u8>,

    /// The right token's byte string.
    right: Vec<u8>,

    /// The pair to merge.
    pair: Pair<T>,
}

impl<T: TokenType, C: CountType> MergeJob<T, C> {
    /// The heap ordering key.
    fn heap_key(&self) -> (C, &[u8], &[u8]) {
        (self.count, &self.left, &self.right)
    }
}

impl<T: TokenType, C: CountType> PartialEq for MergeJob<T, C> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.heap_key() == other.heap_key()
    }
}

impl<T: TokenType, C: CountType> PartialOrd for MergeJob<T, C> {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TokenType, C: CountType> Ord for MergeJob<T, C> {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.heap_key().cmp(&other.heap_key())
    }
}

/// The mutable state of one training run.
///
/// Owns the word representations, the pair statistics, the token intern
/// table, and the merge list. Workers only ever read the representations;
/// all tables are mutated here, in the serial reduction phase, so the
/// state is consistent at every iteration boundary:
///
/// 1. `pair_counts[P]` equals the corpus-weighted occurrence count of `P`
///    over all representations.
/// 2. `pair_words[P]` is exactly the set of words whose representation
///    contains `P`.
/// 3. Neither table holds zero counts or empty sets.
pub struct MergeState<T: TokenType, C: CountType> {
    table: ByteTokenTable<T>,
    word_bytes: Vec<Vec<u8>>,
    reps: Vec<WordRep<T>>,
    counts: Vec<C>,
    pair_counts: PairCountMap<T, C>,
    pair_words: PairWordMap<T>,
    merges: Vec<Pair<T>>,
    heap: OctonaryHeap<MergeJob<T, C>>,
    parallel_threshold: usize,
}

impl<T: TokenType, C: CountType> MergeState<T, C> {
    /// Initialize the engine from a word frequency table.
    ///
    /// Every word starts as its single-byte-token representation; the pair
    /// tables and the selection heap are built from those.
    ///
    /// ## Arguments
    /// * `word_counts` - distinct words and their corpus counts.
    /// * `parallel_threshold` - the affected-word-set size at which one
    ///   merge iteration fans out to the rayon pool.
    pub fn from_word_counts(
        word_counts: Vec<(Vec<u8>, C)>,
        parallel_threshold: usize,
    ) -> Self {
        let table = ByteTokenTable::new();

        let (word_bytes, counts): (Vec<Vec<u8>>, Vec<C>) = word_counts.into_iter().unzip();
        let reps: Vec<WordRep<T>> = word_bytes.iter().map(WordRep::from_bytes).collect();

        let PairTable {
            pair_counts,
            pair_words,
        } = PairTable::from_reps(&reps, &counts);

        let mut heap = OctonaryHeap::with_capacity(pair_counts.len());
        for (&pair, &count) in &pair_counts {
            if count > C::zero() {
                heap.push(MergeJob {
                    count,
                    left: table.token_bytes(pair.0).to_vec(),
                    right: table.token_bytes(pair.1).to_vec(),
                    pair,
                });
            }
        }

        Self {
            table,
            word_bytes,
            reps,
            counts,
            pair_counts,
            pair_words,
            merges: Vec::new(),
            heap,
            parallel_threshold,
        }
    }

    /// The token intern table.
    pub fn table(&self) -> &ByteTokenTable<T> {
        &self.table
    }

    /// The current word representations.
    pub fn reps(&self) -> &[WordRep<T>] {
        &self.reps
    }

    /// The word corpus counts, parallel to [`Self::reps`].
    pub fn counts(&self) -> &[C] {
        &self.counts
    }

    /// The source word byte strings, parallel to [`Self::reps`].
    pub fn word_bytes(&self) -> &[Vec<u8>] {
        &self.word_bytes
    }

    /// The current pair occurrence counts.
    pub fn pair_counts(&self) -> &PairCountMap<T, C> {
        &self.pair_counts
    }

    /// The current pair-to-word-indices index.
    pub fn pair_words(&self) -> &PairWordMap<T> {
        &self.pair_words
    }

    /// The merges recorded so far, as token pairs in creation order.
    pub fn merges(&self) -> &[Pair<T>] {
        &self.merges
    }

    /// The number of distinct live pairs.
    pub fn live_pairs(&self) -> usize {
        self.pair_counts.len()
    }

    /// Perform one merge iteration.
    ///
    /// Selects the best pair, records it, and re-expresses every affected
    /// word. Returns the merged pair, or `None` when no mergeable pair
    /// remains.
    pub fn step(&mut self) -> Option<Pair<T>> {
        let pair = self.select_next()?;
        self.apply_merge(pair);
        Some(pair)
    }

    /// The best live pair by linear scan.
    ///
    /// This is the reference selection rule: maximize
    /// `(count, left_bytes, right_bytes)`. The heap-based [`Self::step`]
    /// must select the same pair.
    pub fn scan_best_pair(&self) -> Option<Pair<T>> {
        let zero = C::zero();
        self.pair_counts
            .iter()
            .filter(|&(_, &count)| count > zero)
            .max_by(|&(&p1, &c1), &(&p2, &c2)| {
                c1.cmp(&c2)
                    .then_with(|| self.pair_bytes(p1).cmp(&self.pair_bytes(p2)))
            })
            .map(|(&pair, _)| pair)
    }

    /// The byte strings of a pair's tokens.
    pub fn pair_bytes(
        &self,
        pair: Pair<T>,
    ) -> (&[u8], &[u8]) {
        (
            self.table.token_bytes(pair.0),
            self.table.token_bytes(pair.1),
        )
    }

    /// Pop the best live pair from the heap.
    ///
    /// Stale entries (whose count changed since they were pushed) are
    /// lazily refreshed and requeued. Counts only decrease between pushes,
    /// so an entry that pops with its current count is the maximum.
    fn select_next(&mut self) -> Option<Pair<T>> {
        let zero = C::zero();
        while let Some(mut job) = self.heap.pop() {
            let current = self.pair_counts.get(&job.pair).copied().unwrap_or(zero);
            if job.count != current {
                if current > zero {
                    job.count = current;
                    self.heap.push(job);
                }
                continue;
            }
            if job.count > zero {
                return Some(job.pair);
            }
        }
        None
    }

    /// Apply one merge.
    ///
    /// Phase 1 records the merge and interns the new token. Phase 2
    /// rebuilds every word containing the pair and computes its pair count
    /// delta (fanned out to the rayon pool past the parallel threshold),
    /// then serially reduces the deltas into the global tables. Phase 3
    /// sweeps emptied entries; the merged pair itself is consumed.
    fn apply_merge(
        &mut self,
        pair: Pair<T>,
    ) {
        let zero = C::zero();

        // ---- Phase 1: record ----
        let new_bytes = [self.table.token_bytes(pair.0), self.table.token_bytes(pair.1)].concat();
        let new_token = self.table.intern(new_bytes);
        self.merges.push(pair);

        let word_ids: Vec<usize> = match self.pair_words.remove(&pair) {
            Some(set) => set.into_iter().collect(),
            None => Vec::new(),
        };

        // ---- Phase 2: per-word rebuilds ----
        // Independent across words; workers read the representations and
        // hand back owned rebuild tuples.
        let rebuilds: Vec<(usize, WordRep<T>, CommonHashMap<Pair<T>, C>)> =
            if word_ids.len() >= self.parallel_threshold {
                let reps = &self.reps;
                word_ids
                    .par_iter()
                    .map(|&idx| rebuild_word(idx, &reps[idx], pair, new_token))
                    .collect()
            } else {
                word_ids
                    .iter()
                    .map(|&idx| rebuild_word(idx, &self.reps[idx], pair, new_token))
                    .collect()
            };

        // ---- Phase 2: serial reduction ----
        let mut touched: CommonHashSet<Pair<T>> = CommonHashSet::new();
        let mut fresh: CommonHashSet<Pair<T>> = CommonHashSet::new();

        for (idx, new_rep, delta) in rebuilds {
            let count = self.counts[idx];

            // Guarded removal: the merged pair may occur several times in
            // the old representation, so the word may already be gone.
            for p in self.reps[idx].pairs() {
                if let Some(set) = self.pair_words.get_mut(&p) {
                    set.remove(&idx);
                }
            }
            for p in new_rep.pairs() {
                self.pair_words.entry(p).or_default().insert(idx);
            }

            for (p, d) in delta {
                if d == zero {
                    continue;
                }
                *self.pair_counts.entry(p).or_default() += d * count;
                touched.insert(p);
                if d > zero {
                    // Net-positive deltas always involve the new token.
                    debug_assert!(p.0 == new_token || p.1 == new_token);
                    fresh.insert(p);
                }
            }

            self.reps[idx] = new_rep;
        }

        // ---- Phase 3: cleanup ----
        // The merge consumed every occurrence of the pair.
        debug_assert!(self.pair_counts.get(&pair).is_none_or(|&c| c == zero));
        self.pair_counts.remove(&pair);
        touched.remove(&pair);
        fresh.remove(&pair);

        for p in touched {
            if self.pair_counts.get(&p).is_some_and(|&c| c <= zero) {
                self.pair_counts.remove(&p);
            }
            if self.pair_words.get(&p).is_some_and(|s| s.is_empty()) {
                self.pair_words.remove(&p);
            }
        }

        // Pairs involving the new token are not yet in the heap.
        for p in fresh {
            if let Some(&count) = self.pair_counts.get(&p) {
                if count > zero {
                    let (left, right) = self.pair_bytes(p);
                    self.heap.push(MergeJob {
                        count,
                        left: left.to_vec(),
                        right: right.to_vec(),
                        pair: p,
                    });
                }
            }
        }
    }

    /// Convert the accumulated merges into a [`TrainedVocab`].
    pub fn into_trained<S: AsRef<str>>(
        self,
        special_tokens: &[S],
    ) -> TrainedVocab {
        let merges = self
            .merges
            .iter()
            .map(|&(a, b)| {
                (
                    self.table.token_bytes(a).to_vec(),
                    self.table.token_bytes(b).to_vec(),
                )
            })
            .collect();
        TrainedVocab::from_merges(merges, special_tokens)
    }

    /// Exhaustively recheck the engine invariants.
    ///
    /// Recomputes the pair tables from the representations and compares;
    /// checks that every representation still concatenates to its word's
    /// bytes. Intended for tests and debugging; cost is proportional to
    /// the corpus.
    ///
    /// ## Panics
    /// If any invariant is violated.
    pub fn verify(&self) {
        let zero = C::zero();

        for (idx, rep) in self.reps.iter().enumerate() {
            assert_eq!(
                rep.to_bytes(&self.table),
                self.word_bytes[idx],
                "representation {idx} no longer spells its word",
            );
        }

        let expected = PairTable::from_reps(&self.reps, &self.counts);
        assert_eq!(self.pair_counts, expected.pair_counts, "pair count sum law");
        assert_eq!(self.pair_words, expected.pair_words, "pair index law");

        assert!(self.pair_counts.values().all(|&c| c > zero));
        assert!(self.pair_words.values().all(|s| !s.is_empty()));
    }
}

/// Rebuild one word for a merge and compute its pair-count delta.
///
/// The delta counts every adjacent pair of the old representation once
/// negatively and every adjacent pair of the new one once positively;
/// pairs away from the merge sites cancel. The caller scales by the
/// word's corpus count.
fn rebuild_word<T: TokenType, C: CountType>(
    idx: usize,
    rep: &WordRep<T>,
    pair: Pair<T>,
    replacement: T,
) -> (usize, WordRep<T>, CommonHashMap<Pair<T>, C>) {
    let new_rep = rep.merged(pair, replacement);

    let mut delta: CommonHashMap<Pair<T>, C> = CommonHashMap::with_capacity(8);
    for p in rep.pairs() {
        *delta.entry(p).or_default() -= C::one();
    }
    for p in new_rep.pairs() {
        *delta.entry(p).or_default() += C::one();
    }

    (idx, new_rep, delta)
}
