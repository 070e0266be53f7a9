//! Analysis services
//!
//! Classifier, reference lookup, embedding, and the workflow tying them together.

pub mod classifier;
pub mod embedder;
pub mod encyclopedia;
pub mod fast_embedder;
pub mod http_embedder;
pub mod note_analyzer;
pub mod wikipedia_client;

pub use classifier::{Classification, NoteClassifier, TRAINING_CORPUS};
pub use embedder::{cosine_similarity, EmbedError, Embedder, HashingEmbedder};
pub use encyclopedia::{Encyclopedia, LookupError};
pub use fast_embedder::FastEmbedder;
pub use http_embedder::HttpEmbedder;
pub use note_analyzer::NoteAnalyzer;
pub use wikipedia_client::WikipediaClient;
