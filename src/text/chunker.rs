//! Splits long document text into bounded, overlapping chunks.
//!
//! Chunk ends prefer natural break points. Looking back from the tentative
//! end, a paragraph break (`"\n\n"`) within 500 characters wins, then a
//! sentence break (`". "`) within 300, then a space within 100. The break is
//! kept at the end of the chunk it closes. Without any break in reach the
//! chunk is cut hard at `chunk_size`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Chunk;

pub const DEFAULT_CHUNK_SIZE: usize = 10_000;
pub const DEFAULT_OVERLAP: usize = 500;

/// Break patterns in priority order, each with its look-back window.
const BREAKS: [(&[char], usize); 3] = [(&['\n', '\n'], 500), (&['.', ' '], 300), (&[' '], 100)];

/// Size limits for [`chunk`], in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkOptions {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

/// Split `text` into chunks of at most `chunk_size` characters.
///
/// Text that already fits comes back as a single chunk. Otherwise each chunk
/// after the first starts `overlap` characters before the previous end. When
/// that would not move past the previous start, the next chunk starts at the
/// previous end instead, so the scan always advances and never leaves a gap.
pub fn chunk(text: &str, options: ChunkOptions) -> Vec<Chunk> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let chunk_size = options.chunk_size.max(1);

    if len <= chunk_size {
        return vec![Chunk {
            text: text.to_string(),
            start_offset: 0,
            end_offset: len,
        }];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let mut end = (start + chunk_size).min(len);
        if end < len {
            if let Some(at) = find_break(&chars, start, end) {
                end = at;
            }
        }

        if end <= start {
            break;
        }

        chunks.push(Chunk {
            text: chars[start..end].iter().collect(),
            start_offset: start,
            end_offset: end,
        });

        if end == len {
            break;
        }

        let next = end.saturating_sub(options.overlap);
        start = if next > start { next } else { end };
    }

    debug!(
        chars = len,
        chunks = chunks.len(),
        chunk_size,
        overlap = options.overlap,
        "chunked text"
    );
    chunks
}

/// Offset just past the preferred break point in `(start, end]`, if any.
fn find_break(chars: &[char], start: usize, end: usize) -> Option<usize> {
    BREAKS.iter().find_map(|&(pattern, window)| {
        let lowest = (start + 1).max((end + 1).saturating_sub(window));
        let highest = end.checked_sub(pattern.len())?;
        (lowest..=highest)
            .rev()
            .find(|&i| chars[i..].starts_with(pattern))
            .map(|i| i + pattern.len())
    })
}
