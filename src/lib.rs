//! Document question answering over long texts.
//!
//! The crate splits documents into bounded chunks, selects relevant passages
//! for a question, keeps a branching tree of question/answer exchanges, and
//! tracks page-anchored highlights. Storage, HTTP and the answer provider sit
//! around that core as replaceable collaborators.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod generator;
pub mod highlight;
pub mod models;
pub mod orchestrator;
pub mod summary;
pub mod text;
pub mod tree;

pub use error::{Error, Result};
