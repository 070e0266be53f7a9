//! In-process sentence embeddings
//!
//! Runs all-MiniLM-L6-v2 (384 dimensions) through ONNX Runtime via
//! `fastembed`. The model files are fetched from Hugging Face on first start
//! and cached; later starts load from the cache.
//!
//! Inference is CPU-bound and synchronous, so each call runs on the blocking
//! pool rather than on a runtime worker.

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::path::PathBuf;
use std::sync::Arc;

use crate::services::embedder::{EmbedError, Embedder};

/// Model name reported in logs and `/health`
pub const MINILM_MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Sentence-transformer embedder backed by a local ONNX model
pub struct FastEmbedder {
    model: Arc<TextEmbedding>,
}

impl FastEmbedder {
    /// Load all-MiniLM-L6-v2, downloading it into `cache_dir` if absent
    pub fn new(cache_dir: Option<PathBuf>) -> Result<Self, EmbedError> {
        let mut options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        tracing::info!(model = MINILM_MODEL_NAME, "Loading sentence embedding model");
        let model = TextEmbedding::try_new(options)
            .map_err(|e| EmbedError::Model(format!("failed to load {}: {}", MINILM_MODEL_NAME, e)))?;

        Ok(Self {
            model: Arc::new(model),
        })
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    fn name(&self) -> &str {
        MINILM_MODEL_NAME
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let model = Arc::clone(&self.model);
        let text = text.to_string();

        let mut embeddings = tokio::task::spawn_blocking(move || model.embed(vec![text], None))
            .await
            .map_err(|e| EmbedError::Model(format!("embedding task failed: {}", e)))?
            .map_err(|e| EmbedError::Model(e.to_string()))?;

        embeddings
            .pop()
            .ok_or_else(|| EmbedError::Model("model returned no embedding".to_string()))
    }
}
