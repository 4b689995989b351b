//! # Corpus File Pretokenization

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use rayon::prelude::*;

use crate::chunking::find_chunk_boundaries;
use crate::errors::{BpResult, BytepairError};
use crate::pretokenize::counter::PretokenCounter;
use crate::pretokenize::splitter::SpecialSplitter;
use crate::types::{CommonHashMap, CountType, PretokenKey};

/// Pretokenize a corpus file into a word-count table.
///
/// The file is partitioned into up to `desired_chunks` byte ranges aligned
/// to the first special token (see
/// [`find_chunk_boundaries`](crate::chunking::find_chunk_boundaries)), each
/// chunk is counted on its own worker with its own file handle, and the
/// chunk-local counters are reduced into a single table.
///
/// Invalid UTF-8 in the corpus is decoded lossily, not rejected.
///
/// ## Arguments
/// * `path` - the corpus file path.
/// * `special_tokens` - the document separators; must be non-empty.
/// * `desired_chunks` - the parallelism target; clamped to >= 1.
///
/// ## Returns
/// The global pretoken count table.
pub fn count_words_in_path<K, C, P>(
    path: P,
    special_tokens: &[String],
    desired_chunks: usize,
) -> BpResult<CommonHashMap<K, C>>
where
    K: PretokenKey,
    C: CountType,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let Some(boundary_token) = special_tokens.first() else {
        return Err(BytepairError::NoSpecialTokens);
    };

    let mut file = File::open(path)?;
    let boundaries = find_chunk_boundaries(&mut file, desired_chunks, boundary_token.as_bytes())?;
    drop(file);

    let ranges: Vec<(u64, u64)> = boundaries
        .windows(2)
        .map(|w| (w[0], w[1]))
        .collect();

    log::info!(
        "Pretokenizing {:?}: {} chunks over {} bytes",
        path,
        ranges.len(),
        boundaries.last().copied().unwrap_or(0),
    );

    let splitter = SpecialSplitter::new(special_tokens)?;

    let chunk_counts: Vec<BpResult<CommonHashMap<K, C>>> = ranges
        .par_iter()
        .map(|&(start, end)| count_chunk(path, start, end, &splitter))
        .collect();

    let mut counter: PretokenCounter<K, C> = PretokenCounter::new(splitter)?;
    for counts in chunk_counts {
        counter.absorb(counts?);
    }

    Ok(counter.release())
}

/// Count the pretokens of one `[start, end)` byte range of `path`.
fn count_chunk<K, C>(
    path: &Path,
    start: u64,
    end: u64,
    splitter: &SpecialSplitter,
) -> BpResult<CommonHashMap<K, C>>
where
    K: PretokenKey,
    C: CountType,
{
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(start))?;

    let mut bytes = vec![0u8; (end - start) as usize];
    file.read_exact(&mut bytes)?;

    let text = String::from_utf8_lossy(&bytes);

    // Each worker holds its own compiled pattern; sharing one regex
    // across threads contends.
    let mut counter: PretokenCounter<K, C> = PretokenCounter::new(splitter.clone())?;
    counter.update_from_text(&text)?;
    Ok(counter.release())
}
