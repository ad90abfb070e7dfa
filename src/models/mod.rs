//! Domain models for docbranch.
//!
//! # Core Concepts
//!
//! - [`Chunk`]: A bounded slice of document text with character offsets.
//! - [`Branch`]: One question/answer exchange. Branches form a forest via
//!   `parent_id`; [`BranchNode`] is the nested view of that forest.
//! - [`HighlightRegion`]: A page-anchored rectangle of selected text with a
//!   colour and an optional note.
//! - [`Document`]: Extracted document text and its pages, referenced by the
//!   other entities through `document_id`.
//! - [`Summary`]: A stored, editable summary of a document or of one
//!   conversation path.
//!
//! Branches and highlights have independent lifecycles.

mod branch;
mod chunk;
mod document;
mod highlight;
mod summary;

pub use branch::*;
pub use chunk::*;
pub use document::*;
pub use highlight::*;
pub use summary::*;
