//! Text embedding seam and offline fallback embedder
//!
//! The note and the reference summary are embedded by the same model and
//! compared by cosine similarity. Backends:
//! - [`crate::services::fast_embedder::FastEmbedder`]: all-MiniLM-L6-v2 in
//!   process (default)
//! - [`crate::services::http_embedder::HttpEmbedder`]: OpenAI-compatible
//!   embeddings endpoint
//! - [`HashingEmbedder`]: lexical feature hashing, for air-gapped hosts and
//!   tests; it has no notion of synonyms or paraphrase

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Matches the width of all-MiniLM-L6-v2 sentence embeddings
pub const DEFAULT_DIMENSIONS: usize = 384;

/// Embedding errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmbedError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Embedding dimensions differ: {0} vs {1}")]
    DimensionMismatch(usize, usize),
}

/// Maps text to a fixed-length vector
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model or backend name for logging and `/health`
    fn name(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// Cosine similarity between two embeddings
///
/// Returns 0.0 if either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, EmbedError> {
    if a.len() != b.len() {
        return Err(EmbedError::DimensionMismatch(a.len(), b.len()));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (norm_a * norm_b))
}

/// Normalize an embedding vector in place (no-op for the zero vector)
pub fn normalize_embedding(embedding: &mut [f32]) {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in embedding.iter_mut() {
            *value /= norm;
        }
    }
}

/// Feature-hashing embedder
///
/// Lowercased word unigrams and adjacent bigrams are hashed with SHA-256 into
/// `dimensions` signed buckets, then L2-normalised. Only shared vocabulary
/// raises the score; identical texts score 1.0.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str) {
        let digest = Sha256::digest(feature.as_bytes());
        let mut bucket_bytes = [0u8; 8];
        bucket_bytes.copy_from_slice(&digest[..8]);
        let bucket = (u64::from_le_bytes(bucket_bytes) % self.dimensions as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign;
    }

    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        let mut vector = vec![0.0; self.dimensions];
        for word in &words {
            self.add_feature(&mut vector, word);
        }
        for pair in words.windows(2) {
            self.add_feature(&mut vector, &format!("{} {}", pair[0], pair[1]));
        }

        normalize_embedding(&mut vector);
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn name(&self) -> &str {
        "hashing"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        Ok(self.embed_sync(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_is_one() {
        let v = vec![0.3, -0.2, 0.9];
        assert!((cosine_similarity(&v, &v).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        assert_eq!(
            cosine_similarity(&[1.0], &[1.0, 2.0]),
            Err(EmbedError::DimensionMismatch(1, 2))
        );
    }

    #[test]
    fn test_normalize_embedding() {
        let mut v = vec![3.0, 4.0];
        normalize_embedding(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_hashing_is_deterministic_and_normalised() {
        let embedder = HashingEmbedder::default();
        let a = embedder.embed_sync("Kubernetes orchestrates containers");
        let b = embedder.embed_sync("kubernetes ORCHESTRATES containers!");
        assert_eq!(a.len(), DEFAULT_DIMENSIONS);
        assert_eq!(a, b);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hashing_shared_vocabulary_scores_higher() {
        let embedder = HashingEmbedder::default();
        let note = embedder.embed_sync("docker containers kubernetes orchestration");
        let related = embedder.embed_sync("kubernetes is a container orchestration system for docker");
        let unrelated = embedder.embed_sync("photosynthesis converts light into chemical energy");

        let related_score = cosine_similarity(&note, &related).unwrap();
        let unrelated_score = cosine_similarity(&note, &unrelated).unwrap();
        assert!(related_score > unrelated_score);
    }

    #[test]
    fn test_hashing_empty_text_is_zero_vector() {
        let v = HashingEmbedder::new(16).embed_sync("  ...  ");
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn test_trait_embed_matches_sync() {
        let embedder = HashingEmbedder::new(64);
        let via_trait = embedder.embed("note text").await.unwrap();
        assert_eq!(via_trait, embedder.embed_sync("note text"));
        assert_eq!(embedder.name(), "hashing");
    }
}
