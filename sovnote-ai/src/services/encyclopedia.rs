//! Encyclopedia lookup seam
//!
//! The analyzer only needs two operations from a reference source: an ordered
//! title search and a fixed-length summary of one exact title. Every failure
//! mode is a [`LookupError`] variant so the caller can match on it instead of
//! catching broadly.

use async_trait::async_trait;
use thiserror::Error;

/// Reference lookup errors
///
/// All variants are recoverable from the analyzer's point of view.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("No search results for query: {0}")]
    NoResults(String),

    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Title is ambiguous (disambiguation page): {0}")]
    Ambiguous(String),

    #[error("Page has no summary text: {0}")]
    EmptySummary(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {0}: {1}")]
    Api(u16, String),

    /// Error object returned in a successful HTTP response
    #[error("Rejected query ({code}): {info}")]
    Rejected { code: String, info: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

/// External reference source (e.g. Wikipedia)
#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Source name for logging
    fn name(&self) -> &'static str;

    /// Candidate page titles for a free-text query, best match first
    ///
    /// An empty list is a valid answer; callers decide whether that is an error.
    async fn search(&self, query: &str) -> Result<Vec<String>, LookupError>;

    /// Plain-text summary of exactly `title`, limited to `sentences` sentences
    ///
    /// No auto-suggestion: the title is not rewritten to a "closest" page.
    async fn summary(&self, title: &str, sentences: u32) -> Result<String, LookupError>;
}

/// Search for `topic`, then summarise the top hit
///
/// This is the disambiguation-by-search policy: an ambiguous topic resolves to
/// its first search result rather than failing.
pub async fn resolve_summary(
    encyclopedia: &dyn Encyclopedia,
    topic: &str,
    sentences: u32,
) -> Result<(String, String), LookupError> {
    let results = encyclopedia.search(topic).await?;
    tracing::debug!(
        source = encyclopedia.name(),
        topic = %topic,
        results = ?results,
        "Encyclopedia search results"
    );

    let Some(title) = results.into_iter().next() else {
        return Err(LookupError::NoResults(topic.to_string()));
    };

    let summary = encyclopedia.summary(&title, sentences).await?;
    Ok((title, summary))
}
