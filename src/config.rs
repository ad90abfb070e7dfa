//! Runtime configuration loaded from environment variables.
//!
//! - `DOCBRANCH_CHUNK_SIZE` - Characters per chunk (default: 10000)
//! - `DOCBRANCH_CHUNK_OVERLAP` - Characters shared by neighbouring chunks (default: 500)
//! - `DOCBRANCH_MAX_CONTEXT` - Context budget per question (default: 10000)
//! - `DOCBRANCH_DB` - Database file (default: platform data directory)
//! - Gemini settings, see [`GeminiConfig::from_env`]

use std::path::PathBuf;

use crate::generator::GeminiConfig;
use crate::text::chunker::{ChunkOptions, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
use crate::text::selector::DEFAULT_MAX_CONTEXT_LENGTH;

/// Chunking and context-selection budgets, in characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetrievalConfig {
    pub chunk_size: usize,
    pub overlap: usize,
    pub max_context_length: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
            max_context_length: DEFAULT_MAX_CONTEXT_LENGTH,
        }
    }
}

impl RetrievalConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            chunk_size: env_usize("DOCBRANCH_CHUNK_SIZE").unwrap_or(defaults.chunk_size),
            overlap: env_usize("DOCBRANCH_CHUNK_OVERLAP").unwrap_or(defaults.overlap),
            max_context_length: env_usize("DOCBRANCH_MAX_CONTEXT")
                .unwrap_or(defaults.max_context_length),
        }
    }

    pub fn chunk_options(&self) -> ChunkOptions {
        ChunkOptions {
            chunk_size: self.chunk_size,
            overlap: self.overlap,
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub retrieval: RetrievalConfig,
    pub gemini: GeminiConfig,
    /// Database file. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables. Missing or unparsable
    /// values fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            retrieval: RetrievalConfig::from_env(),
            gemini: GeminiConfig::from_env(),
            database_path: std::env::var("DOCBRANCH_DB").ok().map(PathBuf::from),
        }
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
