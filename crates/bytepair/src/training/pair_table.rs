//! # Pair Frequency Table and Pair Index

use crate::training::word_rep::WordRep;
use crate::types::{CommonHashMap, CommonHashSet, CountType, Pair, TokenType};

/// A map from [`Pair`] to its corpus-weighted occurrence count.
pub type PairCountMap<T, C> = CommonHashMap<Pair<T>, C>;

/// A map from [`Pair`] to the indices of the words containing it.
pub type PairWordMap<T> = CommonHashMap<Pair<T>, CommonHashSet<usize>>;

/// The pair statistics of a word-representation table.
///
/// For every adjacent pair `P` over all representations:
/// * `pair_counts[P]` is `sum(occurrences(P, reps[i]) * counts[i])`, and
/// * `pair_words[P]` is `{i : P occurs in reps[i]}`.
///
/// Zero-count pairs and empty word sets are never stored.
#[derive(Debug, Clone)]
pub struct PairTable<T: TokenType, C: CountType> {
    /// The pair occurrence counts.
    pub pair_counts: PairCountMap<T, C>,

    /// The pair-to-word-indices index.
    pub pair_words: PairWordMap<T>,
}

impl<T: TokenType, C: CountType> PairTable<T, C> {
    /// Build a [`PairTable`] from a representation table and word counts.
    ///
    /// # Arguments
    /// * `reps` - the word representations; assumed distinct words.
    /// * `counts` - `counts[i]` is the corpus count of `reps[i]`.
    pub fn from_reps(
        reps: &[WordRep<T>],
        counts: &[C],
    ) -> Self {
        let mut table = PairTable {
            pair_counts: PairCountMap::new(),
            pair_words: PairWordMap::new(),
        };

        let zero = C::zero();

        for (index, rep) in reps.iter().enumerate() {
            let count = counts[index];

            if count != zero && rep.len() >= 2 {
                for p in rep.pairs() {
                    *table.pair_counts.entry(p).or_default() += count;
                    table.pair_words.entry(p).or_default().insert(index);
                }
            }
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_table_from_reps() {
        type T = u32;
        type C = i64;

        let reps: Vec<WordRep<T>> = vec![
            WordRep::from_bytes(b"low"),
            WordRep::from_bytes(b" low"),
            WordRep::from_bytes(b" wow"),
            WordRep::from_bytes(b"\xE2\x98\x83"), // a single 3-byte char
        ];
        let counts: Vec<C> = vec![1, 4, 2, 5];

        let PairTable {
            pair_counts,
            pair_words,
        } = PairTable::from_reps(&reps, &counts);

        let pair = |a: u8, b: u8| (T::from(a), T::from(b));

        let expected_counts: PairCountMap<T, C> = [
            (pair(b'l', b'o'), 5),  // low, _low
            (pair(b'o', b'w'), 7),  // low, _low, _wow
            (pair(b' ', b'l'), 4),  // _low
            (pair(b' ', b'w'), 2),  // _wow
            (pair(b'w', b'o'), 2),  // _wow
            (pair(0xE2, 0x98), 5),
            (pair(0x98, 0x83), 5),
        ]
        .into_iter()
        .collect();
        assert_eq!(pair_counts, expected_counts);

        let expected_words: PairWordMap<T> = [
            (pair(b'l', b'o'), vec![0, 1]),
            (pair(b'o', b'w'), vec![0, 1, 2]),
            (pair(b' ', b'l'), vec![1]),
            (pair(b' ', b'w'), vec![2]),
            (pair(b'w', b'o'), vec![2]),
            (pair(0xE2, 0x98), vec![3]),
            (pair(0x98, 0x83), vec![3]),
        ]
        .into_iter()
        .map(|(p, s)| (p, CommonHashSet::from_iter(s)))
        .collect();
        assert_eq!(pair_words, expected_words);
    }

    #[test]
    fn test_short_and_zero_count_words_contribute_nothing() {
        type T = u32;
        type C = i64;

        let reps: Vec<WordRep<T>> = vec![
            WordRep::from_bytes(b"a"),
            WordRep::from_bytes(b""),
            WordRep::from_bytes(b"xy"),
        ];
        let counts: Vec<C> = vec![10, 10, 0];

        let table = PairTable::from_reps(&reps, &counts);
        assert!(table.pair_counts.is_empty());
        assert!(table.pair_words.is_empty());
    }
}
