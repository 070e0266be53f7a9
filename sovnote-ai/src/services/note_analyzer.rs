//! Note analysis workflow
//!
//! **Steps per request:**
//! 1. Classify the note text (infallible)
//! 2. Search the topic, summarise the top hit
//! 3. Embed note and summary, cosine similarity → completeness score
//! 4. Derive the knowledge gap level from the score
//!
//! **Failure policy:** any lookup failure (no hits, missing page,
//! disambiguation page, empty extract, network/API error) and any embedding
//! failure yield the placeholder summary with a 0.0 score. The request itself
//! always succeeds.
//!
//! The analyzer is built once at startup and shared read-only; nothing in it is
//! mutated per request.

use std::sync::Arc;
use std::time::Duration;

use crate::config::{AiConfig, EmbedderBackend, DEFAULT_PLACEHOLDER_SUMMARY, DEFAULT_SUMMARY_SENTENCES};
use crate::error::InitError;
use crate::models::{AnalysisResult, Note};
use crate::services::classifier::NoteClassifier;
use crate::services::embedder::{cosine_similarity, EmbedError, Embedder, HashingEmbedder};
use crate::services::encyclopedia::{resolve_summary, Encyclopedia};
use crate::services::fast_embedder::FastEmbedder;
use crate::services::http_embedder::HttpEmbedder;
use crate::services::wikipedia_client::WikipediaClient;

/// Characters of note/summary text included in debug logs
const LOG_PREVIEW_CHARS: usize = 100;

/// Immutable analysis service: classifier + encyclopedia + embedder
pub struct NoteAnalyzer {
    classifier: NoteClassifier,
    encyclopedia: Arc<dyn Encyclopedia>,
    embedder: Arc<dyn Embedder>,
    summary_sentences: u32,
    placeholder_summary: String,
}

impl NoteAnalyzer {
    pub fn new(
        classifier: NoteClassifier,
        encyclopedia: Arc<dyn Encyclopedia>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            classifier,
            encyclopedia,
            embedder,
            summary_sentences: DEFAULT_SUMMARY_SENTENCES,
            placeholder_summary: DEFAULT_PLACEHOLDER_SUMMARY.to_string(),
        }
    }

    pub fn with_summary_sentences(mut self, sentences: u32) -> Self {
        self.summary_sentences = sentences;
        self
    }

    pub fn with_placeholder_summary(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder_summary = placeholder.into();
        self
    }

    /// Build the production analyzer: default corpus, Wikipedia, configured embedder
    ///
    /// With the fastembed backend this loads (and on first run downloads) the
    /// sentence model, so call it off the async workers.
    pub fn from_config(config: &AiConfig) -> Result<Self, InitError> {
        let classifier = NoteClassifier::with_default_corpus()?;
        let encyclopedia = Arc::new(WikipediaClient::new(&config.wikipedia)?);

        let embedder: Arc<dyn Embedder> = match config.embedder.backend {
            EmbedderBackend::FastEmbed => {
                Arc::new(FastEmbedder::new(config.embedder.cache_dir.clone())?)
            }
            EmbedderBackend::Hashing => Arc::new(HashingEmbedder::new(config.embedder.dimensions)),
            EmbedderBackend::Http => {
                let url = config.embedder.url.as_deref().unwrap_or_default();
                let model = config.embedder.model.clone().unwrap_or_default();
                let api_key = std::env::var(&config.embedder.api_key_env)
                    .ok()
                    .filter(|k| !k.trim().is_empty());
                Arc::new(HttpEmbedder::new(
                    url,
                    model,
                    api_key,
                    config.embedder.timeout_secs.map(Duration::from_secs),
                )?)
            }
        };

        tracing::info!(
            labels = ?classifier.labels(),
            encyclopedia = encyclopedia.name(),
            embedder = embedder.name(),
            sentences = config.wikipedia.sentences,
            "Note analyzer initialized"
        );

        Ok(Self::new(classifier, encyclopedia, embedder)
            .with_summary_sentences(config.wikipedia.sentences)
            .with_placeholder_summary(config.analysis.placeholder_summary.clone()))
    }

    pub fn classifier(&self) -> &NoteClassifier {
        &self.classifier
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    pub fn placeholder_summary(&self) -> &str {
        &self.placeholder_summary
    }

    /// Run the full workflow for one note
    pub async fn analyze(&self, note: &Note) -> AnalysisResult {
        tracing::debug!(
            topic = %note.topic,
            text = %preview(&note.text),
            "Analyzing note"
        );

        let classification = self.classifier.classify(&note.text);
        tracing::debug!(
            category = %classification.category,
            confidence = classification.confidence,
            "Note classified"
        );

        let summary = match resolve_summary(
            self.encyclopedia.as_ref(),
            &note.topic,
            self.summary_sentences,
        )
        .await
        {
            Ok((title, summary)) => {
                tracing::debug!(title = %title, summary = %preview(&summary), "Summary fetched");
                summary
            }
            Err(e) => {
                tracing::warn!(
                    topic = %note.topic,
                    source = self.encyclopedia.name(),
                    "Reference lookup failed: {}",
                    e
                );
                return AnalysisResult::unavailable(
                    classification.category,
                    self.placeholder_summary.clone(),
                );
            }
        };

        match self.similarity(&note.text, &summary).await {
            Ok(similarity) => {
                let result = AnalysisResult::scored(classification.category, summary, similarity);
                tracing::debug!(
                    similarity,
                    completeness_score = result.completeness_score,
                    knowledge_gaps = %result.knowledge_gaps,
                    "Completeness scored"
                );
                result
            }
            Err(e) => {
                tracing::warn!(
                    topic = %note.topic,
                    embedder = self.embedder.name(),
                    "Embedding failed: {}",
                    e
                );
                AnalysisResult::unavailable(classification.category, self.placeholder_summary.clone())
            }
        }
    }

    async fn similarity(&self, note_text: &str, summary: &str) -> Result<f32, EmbedError> {
        let note_embedding = self.embedder.embed(note_text).await?;
        let summary_embedding = self.embedder.embed(summary).await?;
        cosine_similarity(&note_embedding, &summary_embedding)
    }
}

/// First [`LOG_PREVIEW_CHARS`] characters, with an ellipsis if truncated
fn preview(text: &str) -> String {
    match text.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
