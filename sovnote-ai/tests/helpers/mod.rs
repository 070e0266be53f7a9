//! Shared test fixtures: in-memory encyclopedia and embedders

#![allow(dead_code)]

use async_trait::async_trait;
use sovnote_ai::services::{
    EmbedError, Embedder, Encyclopedia, HashingEmbedder, LookupError, NoteAnalyzer, NoteClassifier,
};
use sovnote_ai::{build_router, AppState};
use std::collections::HashMap;
use std::sync::Arc;

pub const KUBERNETES_SUMMARY: &str = "Kubernetes is an open-source container orchestration system \
for automating deployment, scaling, and management of containerized applications. \
It is commonly used together with Docker.";

pub const MERCURY_PLANET_SUMMARY: &str =
    "Mercury is the first planet from the Sun and the smallest in the Solar System.";

pub const PHOTOSYNTHESIS_SUMMARY: &str =
    "Photosynthesis is a process used by plants to convert light energy into chemical energy.";

/// In-memory encyclopedia keyed by lowercase query and exact title
#[derive(Default)]
pub struct StubEncyclopedia {
    search: HashMap<String, Vec<String>>,
    pages: HashMap<String, Result<String, LookupError>>,
    outage: Option<LookupError>,
}

impl StubEncyclopedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, query: &str, titles: &[&str]) -> Self {
        self.search.insert(
            query.to_lowercase(),
            titles.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn with_page(mut self, title: &str, summary: &str) -> Self {
        self.pages.insert(title.to_string(), Ok(summary.to_string()));
        self
    }

    pub fn with_page_error(mut self, title: &str, error: LookupError) -> Self {
        self.pages.insert(title.to_string(), Err(error));
        self
    }

    /// Every call fails with `error`
    pub fn down(error: LookupError) -> Self {
        Self {
            outage: Some(error),
            ..Self::default()
        }
    }

    /// Topics used across the integration tests
    pub fn standard() -> Self {
        Self::new()
            .with_search("Kubernetes", &["Kubernetes", "Kubernetes (disambiguation)"])
            .with_page("Kubernetes", KUBERNETES_SUMMARY)
            .with_search("Mercury", &["Mercury (planet)", "Mercury (element)", "Mercury"])
            .with_page("Mercury (planet)", MERCURY_PLANET_SUMMARY)
            .with_page_error("Mercury", LookupError::Ambiguous("Mercury".into()))
            .with_search("Photosynthesis", &["Photosynthesis"])
            .with_page("Photosynthesis", PHOTOSYNTHESIS_SUMMARY)
            .with_search("Stub article", &["Stub article"])
            .with_page_error("Stub article", LookupError::EmptySummary("Stub article".into()))
    }
}

#[async_trait]
impl Encyclopedia for StubEncyclopedia {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, LookupError> {
        if let Some(error) = &self.outage {
            return Err(error.clone());
        }
        Ok(self.search.get(&query.to_lowercase()).cloned().unwrap_or_default())
    }

    async fn summary(&self, title: &str, _sentences: u32) -> Result<String, LookupError> {
        if let Some(error) = &self.outage {
            return Err(error.clone());
        }
        self.pages
            .get(title)
            .cloned()
            .unwrap_or_else(|| Err(LookupError::NotFound(title.to_string())))
    }
}

/// Embedder that always fails
pub struct BrokenEmbedder;

#[async_trait]
impl Embedder for BrokenEmbedder {
    fn name(&self) -> &str {
        "broken"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        Err(EmbedError::Network("connection refused".into()))
    }
}

/// Embedder returning preset vectors per exact text, `fallback` otherwise
pub struct FixedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    fallback: Vec<f32>,
}

impl FixedEmbedder {
    pub fn new(fallback: &[f32]) -> Self {
        Self {
            vectors: HashMap::new(),
            fallback: fallback.to_vec(),
        }
    }

    pub fn with_vector(mut self, text: &str, vector: &[f32]) -> Self {
        self.vectors.insert(text.to_string(), vector.to_vec());
        self
    }
}

#[async_trait]
impl Embedder for FixedEmbedder {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(self.vectors.get(text).cloned().unwrap_or_else(|| self.fallback.clone()))
    }
}

pub fn analyzer_with(encyclopedia: StubEncyclopedia, embedder: Arc<dyn Embedder>) -> NoteAnalyzer {
    NoteAnalyzer::new(
        NoteClassifier::with_default_corpus().unwrap(),
        Arc::new(encyclopedia),
        embedder,
    )
}

pub fn standard_analyzer() -> NoteAnalyzer {
    analyzer_with(StubEncyclopedia::standard(), Arc::new(HashingEmbedder::default()))
}

pub fn test_router() -> axum::Router {
    build_router(AppState::new(standard_analyzer()))
}
