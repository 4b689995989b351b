//! # Byte String / Token Intern Table

use core::fmt::Debug;

use crate::types::{CommonHashMap, TokenType};

/// Bijective intern table between token ids and byte strings.
///
/// Token identity during training is the byte string: a merge that
/// produces a byte string the table already knows reuses its id, so pair
/// statistics keyed on ids agree with pair statistics keyed on bytes.
///
/// Ids `0..=255` always map to the corresponding single-byte strings.
#[derive(Clone, PartialEq)]
pub struct ByteTokenTable<T: TokenType> {
    /// Table from token id (position) to byte string.
    token_bytes: Vec<Vec<u8>>,

    /// Hash map from byte string to token id.
    byte_tokens: CommonHashMap<Vec<u8>, T>,
}

impl<T: TokenType> Debug for ByteTokenTable<T> {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        f.debug_struct("ByteTokenTable")
            .field("len", &self.len())
            .finish()
    }
}

impl<T: TokenType> Default for ByteTokenTable<T> {
    fn default() -> Self {
        let token_bytes: Vec<Vec<u8>> = (0..=255u8).map(|b| vec![b]).collect();
        let byte_tokens = token_bytes
            .iter()
            .enumerate()
            .map(|(t, bytes)| (bytes.clone(), T::from_usize(t).unwrap()))
            .collect();

        Self {
            token_bytes,
            byte_tokens,
        }
    }
}

impl<T: TokenType> ByteTokenTable<T> {
    /// Create a table seeded with the 256 single-byte tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of distinct tokens in the table.
    pub fn len(&self) -> usize {
        self.token_bytes.len()
    }

    /// Is this table empty? (It never is; the byte tokens are always
    /// present.)
    pub fn is_empty(&self) -> bool {
        self.token_bytes.is_empty()
    }

    /// The token for a single byte.
    pub fn byte_token(
        &self,
        byte: u8,
    ) -> T {
        T::from_u8(byte).unwrap()
    }

    /// The byte string of a token.
    ///
    /// ## Panics
    /// If the token was not produced by this table.
    pub fn token_bytes(
        &self,
        token: T,
    ) -> &[u8] {
        &self.token_bytes[token.to_usize().unwrap()]
    }

    /// The token for a byte string, if interned.
    pub fn lookup(
        &self,
        bytes: &[u8],
    ) -> Option<T> {
        self.byte_tokens.get(bytes).copied()
    }

    /// Intern a byte string, returning its token.
    ///
    /// A byte string already in the table returns its existing token; a
    /// new byte string is assigned the next id.
    pub fn intern(
        &mut self,
        bytes: Vec<u8>,
    ) -> T {
        if let Some(&token) = self.byte_tokens.get(&bytes) {
            return token;
        }
        let token = T::from_usize(self.token_bytes.len())
            .expect("token id exceeds token type capacity");
        self.token_bytes.push(bytes.clone());
        self.byte_tokens.insert(bytes, token);
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_byte_tokens() {
        let table: ByteTokenTable<u32> = ByteTokenTable::new();

        assert_eq!(table.len(), 256);
        assert!(!table.is_empty());
        assert_eq!(table.token_bytes(0), &[0]);
        assert_eq!(table.token_bytes(255), &[255]);
        assert_eq!(table.byte_token(b'a'), u32::from(b'a'));
        assert_eq!(table.lookup(b"a"), Some(u32::from(b'a')));
        assert_eq!(table.lookup(b"ab"), None);
    }

    #[test]
    fn test_intern_is_idempotent() {
        let mut table: ByteTokenTable<u32> = ByteTokenTable::new();

        let ab = table.intern(b"ab".to_vec());
        assert_eq!(ab, 256);
        assert_eq!(table.len(), 257);

        // Re-interning the same bytes reuses the id.
        assert_eq!(table.intern(b"ab".to_vec()), ab);
        assert_eq!(table.len(), 257);

        let abc = table.intern(b"abc".to_vec());
        assert_eq!(abc, 257);
        assert_eq!(table.token_bytes(abc), b"abc");
    }
}
