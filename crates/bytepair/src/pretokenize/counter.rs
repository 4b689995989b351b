//! # Pretoken Counter

use compact_str::CompactString;

use crate::errors::BpResult;
use crate::pretokenize::pattern::compile_word_pattern;
use crate::pretokenize::splitter::SpecialSplitter;
use crate::types::{CommonHashMap, CountType, PretokenKey};

/// Pretoken counting structure.
///
/// Applies the special split and the word split pattern to incoming text
/// and accumulates pretoken counts.
///
/// # Parameters
/// * `K` - the type used to store pretoken keys.
/// * `C` - the type used to store counts.
pub struct PretokenCounter<K = CompactString, C = i64>
where
    K: PretokenKey,
    C: CountType,
{
    /// The compiled word split pattern.
    regex: fancy_regex::Regex,

    /// The special token splitter.
    splitter: SpecialSplitter,

    /// The accumulated pretoken counts.
    pub word_counts: CommonHashMap<K, C>,
}

impl<K, C> PretokenCounter<K, C>
where
    K: PretokenKey,
    C: CountType,
{
    /// Create a new pretoken counter.
    ///
    /// ## Arguments
    /// * `splitter` - the special token splitter to apply before the word
    ///   split pattern.
    pub fn new(splitter: SpecialSplitter) -> BpResult<Self> {
        Ok(Self {
            regex: compile_word_pattern()?,
            splitter,
            word_counts: CommonHashMap::new(),
        })
    }

    /// The special token splitter.
    pub fn splitter(&self) -> &SpecialSplitter {
        &self.splitter
    }

    /// Update counts inplace from text.
    ///
    /// The text is split on special tokens first; separators themselves
    /// are never counted.
    pub fn update_from_text(
        &mut self,
        text: &str,
    ) -> BpResult<()> {
        let fragments = self.splitter.split(text);
        let regex = &self.regex;
        let word_counts = &mut self.word_counts;
        for fragment in fragments {
            for mat in regex.find_iter(fragment) {
                let piece = mat?.as_str();
                let k: K = piece.into();
                *word_counts.entry(k).or_default() += C::one();
            }
        }
        Ok(())
    }

    /// Update counts inplace from a sample iterator.
    pub fn update_from_samples<I>(
        &mut self,
        samples: I,
    ) -> BpResult<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for sample in samples {
            self.update_from_text(sample.as_ref())?;
        }
        Ok(())
    }

    /// Merge another count table into this one.
    ///
    /// Addition is commutative; reduction order does not matter.
    pub fn absorb(
        &mut self,
        other: CommonHashMap<K, C>,
    ) {
        for (k, v) in other {
            *self.word_counts.entry(k).or_default() += v;
        }
    }

    /// Release the counts and return them.
    pub fn release(self) -> CommonHashMap<K, C> {
        self.word_counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts_of(samples: &[&str], specials: &[&str]) -> CommonHashMap<String, i64> {
        let splitter = SpecialSplitter::new(specials).unwrap();
        let mut counter: PretokenCounter<String, i64> = PretokenCounter::new(splitter).unwrap();
        counter.update_from_samples(samples).unwrap();
        counter.release()
    }

    #[test]
    fn test_word_counts() {
        let counts = counts_of(&["Hello world", "Foo world bar world"], &[]);

        let mut counts: Vec<(String, i64)> = counts.into_iter().collect();
        counts.sort();
        assert_eq!(
            counts,
            vec![
                (" bar".into(), 1),
                (" world".into(), 3),
                ("Foo".into(), 1),
                ("Hello".into(), 1),
            ]
        );
    }

    #[test]
    fn test_specials_are_not_counted() {
        let counts = counts_of(&["hi<|endoftext|>hi"], &["<|endoftext|>"]);

        let mut counts: Vec<(String, i64)> = counts.into_iter().collect();
        counts.sort();
        assert_eq!(counts, vec![("hi".into(), 2)]);
    }

    #[test]
    fn test_separator_blocks_adjacency() {
        // Without the split, "one<|endoftext|>two" would produce different
        // pretokens than the two documents counted apart.
        let joined = counts_of(&["one<|endoftext|>two"], &["<|endoftext|>"]);
        let apart = counts_of(&["one", "two"], &["<|endoftext|>"]);

        assert_eq!(joined, apart);
    }

    #[test]
    fn test_absorb_sums_counts() {
        let splitter = SpecialSplitter::new(&Vec::<String>::new()).unwrap();
        let mut counter: PretokenCounter<String, i64> = PretokenCounter::new(splitter).unwrap();
        counter.update_from_text("a b").unwrap();

        let other = counts_of(&["b c"], &[]);
        counter.absorb(other);

        let counts = counter.release();
        assert_eq!(counts.get("a"), Some(&1));
        assert_eq!(counts.get(" b"), Some(&1));
        assert_eq!(counts.get("b"), Some(&1));
        assert_eq!(counts.get(" c"), Some(&1));
    }
}
