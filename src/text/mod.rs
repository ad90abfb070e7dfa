//! Text processing: chunking, lexical context selection, cleanup helpers and
//! the best-effort section classifier.

pub mod chunker;
pub mod prepare;
pub mod sections;
pub mod selector;

pub use chunker::{chunk, ChunkOptions};
pub use selector::{score_passages, select_context, tokenize_query};
