//! # Trained Vocabulary

use core::fmt::Debug;

/// The result of training: a token vocabulary and its merge list.
///
/// Ids are dense:
/// * `0..=255` are the single-byte tokens,
/// * `256..256 + merges.len()` are the merge tokens, in creation order,
/// * the special tokens follow contiguously, in the order supplied.
#[derive(Clone, PartialEq, Eq)]
pub struct TrainedVocab {
    /// Table from token id (position) to byte string.
    vocab: Vec<Vec<u8>>,

    /// The merge rules, in creation order.
    merges: Vec<(Vec<u8>, Vec<u8>)>,

    /// The number of trailing special token entries in `vocab`.
    num_specials: usize,
}

impl Debug for TrainedVocab {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("TrainedVocab")
            .field("len", &self.len())
            .field("merges", &self.merges.len())
            .field("specials", &self.num_specials)
            .finish()
    }
}

impl TrainedVocab {
    /// Assemble a trained vocab from a merge list and special tokens.
    ///
    /// ## Arguments
    /// * `merges` - the byte-pair merge rules, in creation order.
    /// * `special_tokens` - the special token strings, in id order.
    pub fn from_merges<S: AsRef<str>>(
        merges: Vec<(Vec<u8>, Vec<u8>)>,
        special_tokens: &[S],
    ) -> Self {
        let mut vocab: Vec<Vec<u8>> = (0..=255u8).map(|b| vec![b]).collect();
        vocab.reserve(merges.len() + special_tokens.len());

        for (left, right) in &merges {
            vocab.push([left.as_slice(), right.as_slice()].concat());
        }
        for special in special_tokens {
            vocab.push(special.as_ref().as_bytes().to_vec());
        }

        Self {
            vocab,
            merges,
            num_specials: special_tokens.len(),
        }
    }

    /// The total number of tokens.
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    /// Is this vocab empty? (It never is; the byte tokens are always
    /// present.)
    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    /// The byte string of a token id, if assigned.
    pub fn token_bytes(
        &self,
        id: u32,
    ) -> Option<&[u8]> {
        self.vocab.get(id as usize).map(Vec::as_slice)
    }

    /// The merge rules, in creation order.
    pub fn merges(&self) -> &[(Vec<u8>, Vec<u8>)] {
        &self.merges
    }

    /// The number of trailing special tokens.
    pub fn num_specials(&self) -> usize {
        self.num_specials
    }

    /// Iterate `(id, bytes)` entries in id order.
    pub fn id_pairs(&self) -> impl Iterator<Item = (u32, &[u8])> {
        self.vocab
            .iter()
            .enumerate()
            .map(|(id, bytes)| (id as u32, bytes.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_merges_id_layout() {
        let merges = vec![
            (b"e".to_vec(), b"s".to_vec()),
            (b"es".to_vec(), b"t".to_vec()),
        ];
        let vocab = TrainedVocab::from_merges(merges.clone(), &["<|endoftext|>"]);

        assert_eq!(vocab.len(), 256 + 2 + 1);
        assert_eq!(vocab.merges(), merges.as_slice());
        assert_eq!(vocab.num_specials(), 1);

        // Byte tokens.
        assert_eq!(vocab.token_bytes(b'e' as u32), Some(b"e".as_slice()));

        // Merge tokens are the pair concatenations, in creation order.
        assert_eq!(vocab.token_bytes(256), Some(b"es".as_slice()));
        assert_eq!(vocab.token_bytes(257), Some(b"est".as_slice()));

        // Specials follow contiguously.
        assert_eq!(vocab.token_bytes(258), Some(b"<|endoftext|>".as_slice()));
        assert_eq!(vocab.token_bytes(259), None);
    }

    #[test]
    fn test_empty_training() {
        let vocab = TrainedVocab::from_merges(vec![], &["<|endoftext|>"]);

        assert_eq!(vocab.len(), 257);
        assert!(vocab.merges().is_empty());
        assert_eq!(vocab.token_bytes(256), Some(b"<|endoftext|>".as_slice()));
    }

    #[test]
    fn test_id_pairs_are_dense() {
        let vocab =
            TrainedVocab::from_merges(vec![(b"a".to_vec(), b"b".to_vec())], &[] as &[&str]);

        let ids: Vec<u32> = vocab.id_pairs().map(|(id, _)| id).collect();
        assert_eq!(ids, (0..257).collect::<Vec<u32>>());
    }
}
