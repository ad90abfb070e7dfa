use serde::{Deserialize, Serialize};

/// A contiguous slice of document text.
///
/// Offsets count characters (Unicode scalar values) into the source text and
/// describe the half-open range `[start_offset, end_offset)`. Neighbouring
/// chunks may overlap by the configured overlap window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    pub fn is_empty(&self) -> bool {
        self.end_offset == self.start_offset
    }
}

/// A candidate passage and its lexical relevance score. Only lives during
/// context selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredPassage<'a> {
    pub text: &'a str,
    pub score: usize,
}
