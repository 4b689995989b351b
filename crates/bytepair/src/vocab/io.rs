//! # Vocabulary IO
//!
//! Human-readable dumps of a trained vocabulary.
//!
//! Vocab lines are:
//! ```terminaloutput
//! {BASE64 SPAN} {TOKEN ID}
//! ```
//!
//! Merge lines are:
//! ```terminaloutput
//! {BASE64 LEFT} {BASE64 RIGHT}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

use crate::errors::{BpResult, BytepairError};
use crate::vocab::trained_vocab::TrainedVocab;

/// Write the `{BASE64 SPAN} {TOKEN ID}` vocab dump.
pub fn write_vocab<W: Write>(
    vocab: &TrainedVocab,
    writer: &mut W,
) -> BpResult<()> {
    for (id, bytes) in vocab.id_pairs() {
        writeln!(writer, "{} {}", BASE64_STANDARD.encode(bytes), id)?;
    }
    Ok(())
}

/// Read a vocab dump back into `(id, bytes)` entries, in file order.
pub fn read_vocab<R: BufRead>(reader: R) -> BpResult<Vec<(u32, Vec<u8>)>> {
    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let (span, id) = split_columns(&line)?;

        let bytes = BASE64_STANDARD
            .decode(span)
            .map_err(|e| BytepairError::Parse(format!("bad span {span:?}: {e}")))?;
        let id: u32 = id
            .parse()
            .map_err(|e| BytepairError::Parse(format!("bad token id {id:?}: {e}")))?;

        entries.push((id, bytes));
    }
    Ok(entries)
}

/// Write the `{BASE64 LEFT} {BASE64 RIGHT}` merges dump, in creation order.
pub fn write_merges<W: Write>(
    vocab: &TrainedVocab,
    writer: &mut W,
) -> BpResult<()> {
    for (left, right) in vocab.merges() {
        writeln!(
            writer,
            "{} {}",
            BASE64_STANDARD.encode(left),
            BASE64_STANDARD.encode(right),
        )?;
    }
    Ok(())
}

/// Read a merges dump back into byte pairs, in file order.
pub fn read_merges<R: BufRead>(reader: R) -> BpResult<Vec<(Vec<u8>, Vec<u8>)>> {
    let mut merges = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let (left, right) = split_columns(&line)?;

        let decode = |col: &str| {
            BASE64_STANDARD
                .decode(col)
                .map_err(|e| BytepairError::Parse(format!("bad merge column {col:?}: {e}")))
        };

        merges.push((decode(left)?, decode(right)?));
    }
    Ok(merges)
}

/// Save the vocab dump to a file path.
pub fn save_vocab_path<P: AsRef<Path>>(
    vocab: &TrainedVocab,
    path: P,
) -> BpResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_vocab(vocab, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Save the merges dump to a file path.
pub fn save_merges_path<P: AsRef<Path>>(
    vocab: &TrainedVocab,
    path: P,
) -> BpResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_merges(vocab, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Load a vocab dump from a file path.
pub fn load_vocab_path<P: AsRef<Path>>(path: P) -> BpResult<Vec<(u32, Vec<u8>)>> {
    read_vocab(BufReader::new(File::open(path)?))
}

/// Load a merges dump from a file path.
pub fn load_merges_path<P: AsRef<Path>>(path: P) -> BpResult<Vec<(Vec<u8>, Vec<u8>)>> {
    read_merges(BufReader::new(File::open(path)?))
}

fn split_columns(line: &str) -> BpResult<(&str, &str)> {
    line.split_once(' ')
        .ok_or_else(|| BytepairError::Parse(format!("expected two columns: {line:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    fn sample_vocab() -> TrainedVocab {
        TrainedVocab::from_merges(
            vec![
                (b"e".to_vec(), b"s".to_vec()),
                (b"es".to_vec(), b"t".to_vec()),
            ],
            &["<|endoftext|>"],
        )
    }

    #[test]
    fn test_vocab_roundtrip() {
        let dir = TempDir::new("vocab-io").unwrap();
        let path = dir.path().join("vocab.txt");

        let vocab = sample_vocab();
        save_vocab_path(&vocab, &path).unwrap();

        let entries = load_vocab_path(&path).unwrap();
        assert_eq!(entries.len(), vocab.len());
        for (id, bytes) in &entries {
            assert_eq!(vocab.token_bytes(*id), Some(bytes.as_slice()));
        }
    }

    #[test]
    fn test_merges_roundtrip() {
        let dir = TempDir::new("vocab-io").unwrap();
        let path = dir.path().join("merges.txt");

        let vocab = sample_vocab();
        save_merges_path(&vocab, &path).unwrap();

        let merges = load_merges_path(&path).unwrap();
        assert_eq!(merges, vocab.merges());
    }

    #[test]
    fn test_dump_is_line_per_token() {
        let vocab = sample_vocab();

        let mut buf: Vec<u8> = Vec::new();
        write_vocab(&vocab, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), vocab.len());
        assert!(text.lines().next().unwrap().ends_with(" 0"));
    }

    #[test]
    fn test_bad_dump_lines() {
        assert!(matches!(
            read_vocab("one-column".as_bytes()),
            Err(BytepairError::Parse(_)),
        ));
        assert!(matches!(
            read_vocab("!!! 12".as_bytes()),
            Err(BytepairError::Parse(_)),
        ));
        assert!(matches!(
            read_merges("YQ== ???".as_bytes()),
            Err(BytepairError::Parse(_)),
        ));
    }
}
