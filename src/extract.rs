//! Document text extraction.
//!
//! Extraction turns uploaded bytes into full text plus per-page text.
//! [`PlainTextExtractor`] handles UTF-8 text where pages are separated by form
//! feeds; other formats plug in through [`TextExtractor`].

use thiserror::Error;

const PAGE_SEPARATOR: char = '\u{000C}';
const PAGE_JOINER: &str = "\n\n";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("Document contains no text")]
    Empty,
}

/// Extracted document text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    /// All pages joined by a blank line.
    pub full_text: String,
    pub pages: Vec<String>,
}

impl ExtractedText {
    /// Build from per-page text, joining pages with a blank line.
    pub fn from_pages(pages: Vec<String>) -> Self {
        Self {
            full_text: pages.join(PAGE_JOINER),
            pages,
        }
    }
}

pub trait TextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<ExtractedText, ExtractError> {
        let text = String::from_utf8(bytes.to_vec())?.replace("\r\n", "\n");
        if text.trim().is_empty() {
            return Err(ExtractError::Empty);
        }

        let pages = text
            .split(PAGE_SEPARATOR)
            .map(|p| p.trim().to_string())
            .collect();
        Ok(ExtractedText::from_pages(pages))
    }
}
