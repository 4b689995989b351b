//! # Error Types

/// Errors from bytepair operations.
#[derive(Debug, thiserror::Error)]
pub enum BytepairError {
    /// Vocab size is below the byte vocabulary plus the requested specials.
    #[error("vocab size ({size}) must be >= {floor} (256 bytes + {specials} special tokens)")]
    VocabSizeTooSmall {
        /// The vocab size that was too small.
        size: usize,
        /// The minimum admissible vocab size.
        floor: usize,
        /// The number of special tokens requested.
        specials: usize,
    },

    /// Vocab size exceeds the capacity of the target token type.
    #[error("vocab size ({size}) exceeds token type capacity")]
    VocabSizeOverflow {
        /// The vocab size that exceeded the capacity.
        size: usize,
    },

    /// Training from a file requires at least one special token to align
    /// chunk boundaries on.
    #[error("at least one special token is required to chunk a corpus file")]
    NoSpecialTokens,

    /// The word split pattern failed to compile, or matching failed.
    #[error("word split pattern: {0}")]
    Pattern(Box<fancy_regex::Error>),

    /// The special token automaton failed to build.
    #[error("special token set: {0}")]
    Specials(#[from] aho_corasick::BuildError),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Parse error in a vocab or merges dump.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<fancy_regex::Error> for BytepairError {
    fn from(err: fancy_regex::Error) -> Self {
        Self::Pattern(err.into())
    }
}

/// Result type for bytepair operations.
pub type BpResult<T> = core::result::Result<T, BytepairError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BytepairError::VocabSizeTooSmall {
            size: 100,
            floor: 257,
            specials: 1,
        };
        assert_eq!(
            err.to_string(),
            "vocab size (100) must be >= 257 (256 bytes + 1 special tokens)"
        );

        let err = BytepairError::NoSpecialTokens;
        assert_eq!(
            err.to_string(),
            "at least one special token is required to chunk a corpus file"
        );

        let err: BytepairError = fancy_regex::Regex::new("(").unwrap_err().into();
        assert!(err.to_string().starts_with("word split pattern:"));
    }
}
