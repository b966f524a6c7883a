//! Error types for deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning an article into a slide deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a local file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to fetch a remote resource (article or image).
    #[error("Fetch failed for {url}: {reason}")]
    FetchFailure { url: String, reason: String },

    /// The summarization service returned a malformed or empty response.
    #[error("Summarization failed: {0}")]
    SummarizationFailure(String),

    /// Summarization service configuration is missing or invalid.
    #[error("Summarizer not configured: {0}")]
    SummarizerConfig(String),

    /// ZIP archive error while writing the deck artifact.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML serialization error while writing the deck artifact.
    #[error("XML error: {0}")]
    XmlError(String),
}
