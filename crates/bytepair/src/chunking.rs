//! # Corpus Chunk Splitter
//!
//! Partitions an input file into byte ranges that can be pretokenized
//! independently. Interior boundaries are realigned forward onto the next
//! occurrence of a boundary token (conventionally the document separator),
//! so no chunk interior splits a document where it can be helped.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use crate::errors::BpResult;

/// Read-ahead window size for boundary realignment scans.
const SCAN_WINDOW: usize = 4096;

/// Split a file into byte ranges aligned to a boundary token.
///
/// Starts from uniformly spaced boundary guesses, then slides each interior
/// guess forward to the first occurrence of `boundary_token` at or after
/// it. A guess with no following occurrence collapses to the end of the
/// file, merging chunks. The guarantee is best effort.
///
/// ## Arguments
/// * `file` - the corpus file; the cursor position is clobbered.
/// * `desired_chunks` - the number of chunks to aim for; clamped to >= 1.
/// * `boundary_token` - the non-empty byte string to align boundaries on.
///
/// ## Returns
/// A sorted, deduplicated offset list `0 = b0 < b1 < ... < bm = file_size`,
/// with `m <= desired_chunks`. Consecutive offsets delimit one chunk.
pub fn find_chunk_boundaries(
    file: &mut File,
    desired_chunks: usize,
    boundary_token: &[u8],
) -> BpResult<Vec<u64>> {
    debug_assert!(!boundary_token.is_empty());

    let file_size = file.seek(SeekFrom::End(0))?;
    let desired = desired_chunks.max(1);
    let chunk_size = file_size / desired as u64;

    let mut boundaries: Vec<u64> = (0..desired as u64).map(|i| i * chunk_size).collect();
    boundaries.push(file_size);

    for boundary in boundaries.iter_mut().take(desired).skip(1) {
        *boundary = scan_forward(file, *boundary, file_size, boundary_token)?;
    }

    boundaries.sort_unstable();
    boundaries.dedup();

    Ok(boundaries)
}

/// Find the first occurrence of `token` at or after `start`.
///
/// Reads forward in [`SCAN_WINDOW`] steps, carrying a `token.len() - 1`
/// byte tail between reads so an occurrence straddling two windows is
/// still found. Returns `file_size` when the token does not occur again.
fn scan_forward(
    file: &mut File,
    start: u64,
    file_size: u64,
    token: &[u8],
) -> BpResult<u64> {
    file.seek(SeekFrom::Start(start))?;

    let mut window = [0u8; SCAN_WINDOW];
    let mut buf: Vec<u8> = Vec::with_capacity(SCAN_WINDOW + token.len());
    let mut buf_start = start;

    loop {
        let n = file.read(&mut window)?;
        if n == 0 {
            // EOF: collapse the boundary to the end of the file.
            return Ok(file_size);
        }
        buf.extend_from_slice(&window[..n]);

        if let Some(at) = find_token(&buf, token) {
            return Ok(buf_start + at as u64);
        }

        let keep = (token.len() - 1).min(buf.len());
        let drop = buf.len() - keep;
        buf.drain(..drop);
        buf_start += drop as u64;
    }
}

fn find_token(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
