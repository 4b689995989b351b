//! # Special Token Splitter

use aho_corasick::{AhoCorasick, MatchKind};

use crate::errors::BpResult;

/// Exact-match splitter over a special token alternation.
///
/// Special tokens delimit documents; text is split on them before word
/// splitting so no pretoken (and therefore no merge) spans a document
/// boundary. Matching is literal; token strings are never treated as
/// patterns.
#[derive(Debug, Clone)]
pub struct SpecialSplitter {
    ac: Option<AhoCorasick>,
}

impl SpecialSplitter {
    /// Build a splitter from a special token list.
    ///
    /// An empty list yields a pass-through splitter. Overlapping tokens
    /// resolve leftmost-longest, so a token that is a prefix of another
    /// never shadows it.
    pub fn new<S: AsRef<str>>(specials: &[S]) -> BpResult<Self> {
        let ac = if specials.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .match_kind(MatchKind::LeftmostLongest)
                    .build(specials.iter().map(AsRef::as_ref))?,
            )
        };
        Ok(Self { ac })
    }

    /// Split `text` on special-token occurrences, dropping the separators.
    ///
    /// Empty fragments (adjacent or leading/trailing separators) are
    /// omitted; they contain no pretokens.
    pub fn split<'h>(
        &self,
        text: &'h str,
    ) -> Vec<&'h str> {
        let Some(ac) = &self.ac else {
            return if text.is_empty() { vec![] } else { vec![text] };
        };

        let mut fragments = Vec::new();
        let mut last = 0;
        for m in ac.find_iter(text) {
            if m.start() > last {
                fragments.push(&text[last..m.start()]);
            }
            last = m.end();
        }
        if last < text.len() {
            fragments.push(&text[last..]);
        }
        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_on_separator() {
        let splitter = SpecialSplitter::new(&["<|endoftext|>"]).unwrap();

        assert_eq!(
            splitter.split("doc one<|endoftext|>doc two"),
            vec!["doc one", "doc two"],
        );
        assert_eq!(
            splitter.split("<|endoftext|>only<|endoftext|>"),
            vec!["only"],
        );
        assert_eq!(splitter.split("<|endoftext|><|endoftext|>"), Vec::<&str>::new());
        assert_eq!(splitter.split("no separators"), vec!["no separators"]);
    }

    #[test]
    fn test_multiple_specials() {
        let splitter = SpecialSplitter::new(&["<|eot|>", "<|pad|>"]).unwrap();

        assert_eq!(
            splitter.split("a<|eot|>b<|pad|>c"),
            vec!["a", "b", "c"],
        );
    }

    #[test]
    fn test_leftmost_longest_overlap() {
        // "<|eot|>" is a prefix of "<|eot|><|eot|>"; longest match wins.
        let splitter = SpecialSplitter::new(&["<|eot|>", "<|eot|><|eot|>"]).unwrap();

        assert_eq!(splitter.split("x<|eot|><|eot|>y"), vec!["x", "y"]);
    }

    #[test]
    fn test_specials_are_literal() {
        // Regex metacharacters in a token must not be interpreted.
        let splitter = SpecialSplitter::new(&["<|endoftext|>"]).unwrap();

        assert_eq!(
            splitter.split("a|b<c>d"),
            vec!["a|b<c>d"],
        );
    }

    #[test]
    fn test_empty_token_list_passes_through() {
        let splitter = SpecialSplitter::new(&Vec::<String>::new()).unwrap();

        assert_eq!(splitter.split("anything"), vec!["anything"]);
        assert_eq!(splitter.split(""), Vec::<&str>::new());
    }
}
